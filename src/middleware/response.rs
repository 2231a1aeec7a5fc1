use axum::{
    http::{header, HeaderValue},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

/// A JSON array plus its optional `Link` navigation header
#[derive(Debug)]
pub struct TimelineResponse<T: Serialize> {
    pub items: Vec<T>,
    pub link: Option<String>,
}

impl<T: Serialize> TimelineResponse<T> {
    pub fn new(items: Vec<T>, link: Option<String>) -> Self {
        Self { items, link }
    }
}

impl<T: Serialize> IntoResponse for TimelineResponse<T> {
    fn into_response(self) -> Response {
        // Empty timelines are a plain 200 with `[]`
        let mut response = Json(self.items).into_response();

        if let Some(link) = self.link {
            match HeaderValue::from_str(&link) {
                Ok(value) => {
                    response.headers_mut().insert(header::LINK, value);
                }
                Err(e) => tracing::error!("Dropping unencodable Link header {:?}: {}", link, e),
            }
        }

        response
    }
}

pub type ApiResult<T> = Result<T, crate::error::ApiError>;
