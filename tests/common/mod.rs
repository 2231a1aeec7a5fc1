#![allow(dead_code)]

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use serde::Serialize;
use serde_json::Value;
use tower::ServiceExt;
use url::Url;
use uuid::Uuid;

use timeline_api_rust::auth::{generate_jwt, Claims};
use timeline_api_rust::config::{AppConfig, LimitPolicy};
use timeline_api_rust::database::DatabaseManager;
use timeline_api_rust::pagination::{
    find_link, paginate, Keyed, LinkBase, Matcher, MemoryTimeline, PageQuery, PageRequest, Rel,
};
use timeline_api_rust::server::{app, AppState};

pub const JWT_SECRET: &str = "integration-test-secret";
pub const BASE_URL: &str = "https://social.example";
pub const POLICY: LimitPolicy = LimitPolicy::new(20, 80);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub id: u64,
    pub author: u32,
}

impl Keyed for Note {
    type Key = u64;

    fn key(&self) -> u64 {
        self.id
    }
}

/// Notes with the given ids, authored round-robin by three accounts
pub fn timeline(ids: impl IntoIterator<Item = u64>) -> MemoryTimeline<Note> {
    MemoryTimeline::from_items(ids.into_iter().map(|id| Note { id, author: (id % 3) as u32 }))
}

pub fn base() -> LinkBase {
    LinkBase::new(BASE_URL, "/api/v1/timelines/home").expect("valid base")
}

pub struct FetchedPage {
    pub ids: Vec<u64>,
    pub link: Option<String>,
}

impl FetchedPage {
    pub fn next(&self) -> Option<String> {
        self.link.as_deref().and_then(|l| find_link(l, Rel::Next))
    }

    pub fn prev(&self) -> Option<String> {
        self.link.as_deref().and_then(|l| find_link(l, Rel::Prev))
    }
}

pub async fn fetch(
    source: &MemoryTimeline<Note>,
    predicate: &Matcher<Note>,
    request: PageRequest<u64>,
) -> Result<FetchedPage> {
    let (items, link) = paginate(source, predicate, &request, &base()).await?;
    Ok(FetchedPage {
        ids: items.iter().map(|n| n.id).collect(),
        link,
    })
}

/// Turn a `Link` target back into the request a client following it would send
pub fn request_from_link(link: &str) -> Result<PageRequest<u64>> {
    let url = Url::parse(link).context("link target is not an absolute URL")?;
    let mut query = PageQuery::default();
    for (k, v) in url.query_pairs() {
        let v = Some(v.into_owned());
        match k.as_ref() {
            "max_id" => query.max_id = v,
            "since_id" => query.since_id = v,
            "min_id" => query.min_id = v,
            "limit" => query.limit = v,
            other => anyhow::bail!("unexpected query parameter {}", other),
        }
    }
    Ok(query.resolve(POLICY)?)
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.http.base_url = BASE_URL.to_string();
    config.security.jwt_secret = JWT_SECRET.to_string();
    // The test pool points at a closed port; fail acquisition quickly
    config.database.connection_timeout = 1;
    config
}

/// Router over a pool that can never connect: requests either fail validation
/// before storage or surface the storage failure
pub fn test_app() -> Result<Router> {
    let config = test_config();
    let pool = DatabaseManager::connect_lazy_with("postgres://localhost:1/unused", &config.database)?;
    Ok(app(AppState::new(pool, config)))
}

pub fn bearer_token(account_id: Uuid) -> Result<String> {
    let claims = Claims::new(account_id, "tester", chrono::Duration::hours(1));
    Ok(generate_jwt(&claims, JWT_SECRET)?)
}

pub async fn get(app: Router, uri: &str, token: Option<&str>) -> Result<(StatusCode, HeaderMap, Value)> {
    let mut request = Request::builder().uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let response = app.oneshot(request.body(Body::empty())?).await?;

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, headers, body))
}
