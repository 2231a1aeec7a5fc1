use axum::extract::{Extension, OriginalUri, State};
use uuid::Uuid;

use crate::database::models::Status;
use crate::database::{predicates, PgTimeline};
use crate::handlers::{timeline_page, PageParams};
use crate::middleware::{ApiResult, AuthUser, TimelineResponse};
use crate::server::AppState;

/// GET /api/v1/timelines/home - The viewer's notes, mentions and followed accounts' notes
pub async fn home(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    OriginalUri(uri): OriginalUri,
    PageParams(query): PageParams,
) -> ApiResult<TimelineResponse<Status>> {
    let request = query.resolve::<Uuid>(state.config.pagination.statuses)?;
    let notes = PgTimeline::<Status>::notes(state.pool.clone(), &state.config);
    timeline_page(&state.config, &uri, &notes, &predicates::home_timeline(auth_user.account_id), request).await
}
