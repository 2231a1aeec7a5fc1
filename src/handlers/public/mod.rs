pub mod accounts;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::database::DatabaseManager;
use crate::server::AppState;

pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Timeline API (Rust)",
        "version": version,
        "description": "Keyset-paginated timelines with Mastodon-style Link headers",
        "endpoints": {
            "home": "/api/v1/timelines/home (protected)",
            "account_statuses": "/api/v1/accounts/:id/statuses (public)",
            "mutes": "/api/v1/mutes (protected)",
            "blocks": "/api/v1/blocks (protected)",
            "health": "/health (public)",
        },
        "pagination": ["max_id", "since_id", "min_id", "limit"],
    }))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}
