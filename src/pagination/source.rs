use std::fmt::{Debug, Display};

use async_trait::async_trait;
use thiserror::Error;

use super::range::KeyRange;

/// Failure of the backing store. Always surfaces as "storage unavailable" to clients.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage query failed: {0}")]
    Query(String),
}

/// Anything that carries its own sortable identifier
pub trait Keyed {
    type Key;

    fn key(&self) -> Self::Key;
}

/// Ordered, filterable collection the paginator reads from.
///
/// `Predicate` is opaque here; implementations AND it with the identifier range.
#[async_trait]
pub trait TimelineSource: Send + Sync {
    type Key: Ord + Clone + Display + Debug + Send + Sync;
    type Item: Keyed<Key = Self::Key> + Send;
    type Predicate: Send + Sync;

    /// Up to `limit` items matching `predicate` within `range`, newest first
    async fn fetch(
        &self,
        predicate: &Self::Predicate,
        range: &KeyRange<Self::Key>,
        limit: u32,
    ) -> Result<Vec<Self::Item>, StorageError>;

    /// Whether at least one item matches `predicate` within `range`
    async fn exists(&self, predicate: &Self::Predicate, range: &KeyRange<Self::Key>) -> Result<bool, StorageError>;
}
