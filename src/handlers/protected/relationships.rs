use axum::extract::{Extension, OriginalUri, State};
use serde_json::Value;
use uuid::Uuid;

use crate::database::models::Account;
use crate::database::{predicates, PgTimeline};
use crate::handlers::{timeline_page, PageParams};
use crate::middleware::{ApiResult, AuthUser, TimelineResponse};
use crate::pagination::PageQuery;
use crate::server::AppState;

/// GET /api/v1/mutes - Accounts the viewer has muted
pub async fn mutes(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    OriginalUri(uri): OriginalUri,
    PageParams(query): PageParams,
) -> ApiResult<TimelineResponse<Account>> {
    account_list(&state, &uri, &query, predicates::muted_by(auth_user.account_id)).await
}

/// GET /api/v1/blocks - Accounts the viewer has blocked
pub async fn blocks(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    OriginalUri(uri): OriginalUri,
    PageParams(query): PageParams,
) -> ApiResult<TimelineResponse<Account>> {
    account_list(&state, &uri, &query, predicates::blocked_by(auth_user.account_id)).await
}

// Paged by account id, newest account first
async fn account_list(
    state: &AppState,
    uri: &axum::http::Uri,
    query: &PageQuery,
    predicate: Value,
) -> ApiResult<TimelineResponse<Account>> {
    let request = query.resolve::<Uuid>(state.config.pagination.accounts)?;
    let accounts = PgTimeline::<Account>::accounts(state.pool.clone(), &state.config);
    timeline_page(&state.config, uri, &accounts, &predicate, request).await
}
