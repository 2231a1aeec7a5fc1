use axum::extract::{OriginalUri, Path, State};
use serde_json::json;
use uuid::Uuid;

use crate::database::models::{Account, Status};
use crate::database::{predicates, PgTimeline};
use crate::error::ApiError;
use crate::handlers::{timeline_page, PageParams};
use crate::middleware::{ApiResult, TimelineResponse};
use crate::pagination::{KeyRange, TimelineSource};
use crate::server::AppState;

/// GET /api/v1/accounts/:id/statuses - Notes authored by one account
pub async fn statuses(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
    PageParams(query): PageParams,
) -> ApiResult<TimelineResponse<Status>> {
    let account_id = Uuid::parse_str(&id).map_err(|_| ApiError::not_found("Record not found"))?;
    let request = query.resolve::<Uuid>(state.config.pagination.account_statuses)?;

    let accounts = PgTimeline::<Account>::accounts(state.pool.clone(), &state.config);
    if !accounts.exists(&json!({ "id": account_id }), &KeyRange::unbounded()).await? {
        return Err(ApiError::not_found("Record not found"));
    }

    let notes = PgTimeline::<Status>::notes(state.pool.clone(), &state.config);
    timeline_page(&state.config, &uri, &notes, &predicates::authored_by(account_id), request).await
}
