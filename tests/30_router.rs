mod common;

use anyhow::Result;
use axum::http::{header, StatusCode};
use uuid::Uuid;

use common::{bearer_token, get, test_app};

#[tokio::test]
async fn root_lists_endpoints() -> Result<()> {
    let (status, _, body) = get(test_app()?, "/", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["endpoints"]["home"].as_str().unwrap_or_default().contains("/api/v1/timelines/home"));
    Ok(())
}

#[tokio::test]
async fn protected_timelines_require_a_bearer_token() -> Result<()> {
    for path in ["/api/v1/timelines/home", "/api/v1/mutes", "/api/v1/blocks"] {
        let (status, headers, body) = get(test_app()?, path, None).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", path);
        assert_eq!(body["code"], "UNAUTHORIZED");
        assert!(headers.get(header::LINK).is_none());
    }

    let (status, _, _) = get(test_app()?, "/api/v1/timelines/home", Some("not-a-jwt")).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn limit_above_endpoint_maximum_is_rejected() -> Result<()> {
    let token = bearer_token(Uuid::now_v7())?;

    let (status, _, body) = get(test_app()?, "/api/v1/timelines/home?limit=81", Some(&token)).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["details"]["limit"].is_string());

    let (status, _, _) = get(test_app()?, "/api/v1/mutes?limit=0", Some(&token)).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let account = Uuid::now_v7();
    let (status, _, _) = get(test_app()?, &format!("/api/v1/accounts/{}/statuses?limit=41", account), None).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    Ok(())
}

#[tokio::test]
async fn malformed_identifiers_are_rejected() -> Result<()> {
    let token = bearer_token(Uuid::now_v7())?;
    let (status, _, body) = get(test_app()?, "/api/v1/blocks?max_id=12%3B%20drop", Some(&token)).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["details"]["max_id"].is_string());
    Ok(())
}

#[tokio::test]
async fn unknown_accounts_and_routes_are_not_found() -> Result<()> {
    let (status, _, body) = get(test_app()?, "/api/v1/accounts/not-a-uuid/statuses", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, _, _) = get(test_app()?, "/api/v1/timelines/public", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn malformed_query_string_gets_json_error() -> Result<()> {
    let token = bearer_token(Uuid::now_v7())?;
    let (status, _, body) = get(test_app()?, "/api/v1/timelines/home?max_id=1&max_id=2", Some(&token)).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["details"]["query"].is_string());

    let account = Uuid::now_v7();
    let uri = format!("/api/v1/accounts/{}/statuses?limit=1&limit=2", account);
    let (status, _, body) = get(test_app()?, &uri, None).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    Ok(())
}

#[tokio::test]
async fn unreachable_storage_is_service_unavailable() -> Result<()> {
    let token = bearer_token(Uuid::now_v7())?;
    let (status, headers, body) = get(test_app()?, "/api/v1/timelines/home?limit=2", Some(&token)).await?;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "SERVICE_UNAVAILABLE");
    assert!(headers.get(header::LINK).is_none());
    // Storage details stay in the logs
    assert!(!body["error"].as_str().unwrap_or_default().contains("localhost"));
    Ok(())
}
