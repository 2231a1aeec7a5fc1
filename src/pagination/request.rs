use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::config::LimitPolicy;
use super::range::KeyRange;

/// A validated page request. Limits are trusted as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest<K> {
    pub max_id: Option<K>,
    pub since_id: Option<K>,
    pub min_id: Option<K>,
    pub limit: u32,
}

impl<K: Ord + Clone> PageRequest<K> {
    pub fn new(limit: u32) -> Self {
        Self { max_id: None, since_id: None, min_id: None, limit }
    }

    pub fn max_id(mut self, key: K) -> Self {
        self.max_id = Some(key);
        self
    }

    pub fn since_id(mut self, key: K) -> Self {
        self.since_id = Some(key);
        self
    }

    pub fn min_id(mut self, key: K) -> Self {
        self.min_id = Some(key);
        self
    }

    pub fn range(&self) -> KeyRange<K> {
        KeyRange {
            max_id: self.max_id.clone(),
            since_id: self.since_id.clone(),
            min_id: self.min_id.clone(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageQueryError {
    #[error("{field} is not a valid identifier: {value}")]
    InvalidId { field: &'static str, value: String },

    #[error("limit must be an integer: {0}")]
    InvalidLimit(String),

    #[error("limit must be between 1 and {max}, got {value}")]
    LimitOutOfRange { value: i64, max: u32 },
}

impl PageQueryError {
    pub fn field(&self) -> &'static str {
        match self {
            PageQueryError::InvalidId { field, .. } => field,
            PageQueryError::InvalidLimit(_) | PageQueryError::LimitOutOfRange { .. } => "limit",
        }
    }
}

/// Raw `max_id` / `since_id` / `min_id` / `limit` query-string parameters.
///
/// Everything is kept as text so malformed input is reported per field
/// instead of failing the whole extractor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub max_id: Option<String>,
    pub since_id: Option<String>,
    pub min_id: Option<String>,
    pub limit: Option<String>,
}

impl PageQuery {
    pub fn resolve<K>(&self, policy: LimitPolicy) -> Result<PageRequest<K>, PageQueryError>
    where
        K: FromStr + Ord + Clone,
    {
        let limit = match self.limit.as_deref().map(str::trim) {
            None | Some("") => policy.default_limit(),
            Some(raw) => {
                let value: i64 = raw.parse().map_err(|_| PageQueryError::InvalidLimit(raw.to_string()))?;
                if value < 1 || value > i64::from(policy.max) {
                    return Err(PageQueryError::LimitOutOfRange { value, max: policy.max });
                }
                value as u32
            }
        };

        Ok(PageRequest {
            max_id: parse_id("max_id", self.max_id.as_deref())?,
            since_id: parse_id("since_id", self.since_id.as_deref())?,
            min_id: parse_id("min_id", self.min_id.as_deref())?,
            limit,
        })
    }
}

fn parse_id<K: FromStr>(field: &'static str, raw: Option<&str>) -> Result<Option<K>, PageQueryError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| PageQueryError::InvalidId { field, value: value.to_string() }),
    }
}
