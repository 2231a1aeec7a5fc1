// Handlers are split by authentication tier:
// public (no auth) and protected (bearer JWT)
pub mod protected;
pub mod public;

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::{request::Parts, Uri},
};
use serde::Serialize;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::middleware::{ApiResult, TimelineResponse};
use crate::pagination::{paginate, LinkBase, PageQuery, PageRequest, TimelineSource};

/// `max_id` / `since_id` / `min_id` / `limit` from the query string.
///
/// Malformed query strings (e.g. a repeated `max_id`) are reported as an
/// `ApiError` JSON body like every other validation failure.
#[derive(Debug, Clone, Default)]
pub struct PageParams(pub PageQuery);

#[async_trait]
impl<S> FromRequestParts<S> for PageParams
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<PageQuery>::from_request_parts(parts, state).await?;
        Ok(PageParams(query))
    }
}

/// Run one page of `source` and render it with `Link` URLs rooted at the
/// configured public origin and the path the client actually requested.
pub(crate) async fn timeline_page<S>(
    config: &AppConfig,
    uri: &Uri,
    source: &S,
    predicate: &S::Predicate,
    request: PageRequest<S::Key>,
) -> ApiResult<TimelineResponse<S::Item>>
where
    S: TimelineSource,
    S::Item: Serialize,
{
    let base = LinkBase::new(&config.http.base_url, uri.path())?;
    let (items, link) = paginate(source, predicate, &request, &base).await?;
    Ok(TimelineResponse::new(items, link))
}
