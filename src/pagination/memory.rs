use std::collections::BTreeMap;
use std::fmt::{Debug, Display};
use std::ops::Bound;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::range::KeyRange;
use super::source::{Keyed, StorageError, TimelineSource};

/// Predicate over in-memory items
pub struct Matcher<T>(Arc<dyn Fn(&T) -> bool + Send + Sync>);

impl<T> Matcher<T> {
    pub fn new(f: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn all() -> Self {
        Self(Arc::new(|_| true))
    }

    pub fn matches(&self, item: &T) -> bool {
        (self.0)(item)
    }
}

impl<T> Clone for Matcher<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

/// Sorted in-memory timeline, keyed by identifier
pub struct MemoryTimeline<T: Keyed> {
    entries: RwLock<BTreeMap<T::Key, T>>,
}

impl<T> MemoryTimeline<T>
where
    T: Keyed + Clone,
    T::Key: Ord,
{
    pub fn new() -> Self {
        Self { entries: RwLock::new(BTreeMap::new()) }
    }

    pub fn from_items(items: impl IntoIterator<Item = T>) -> Self {
        let entries = items.into_iter().map(|item| (item.key(), item)).collect();
        Self { entries: RwLock::new(entries) }
    }

    /// Insert or replace the item with the same identifier
    pub async fn insert(&self, item: T) {
        self.entries.write().await.insert(item.key(), item);
    }

    pub async fn remove(&self, key: &T::Key) -> Option<T> {
        self.entries.write().await.remove(key)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    fn scan<'a>(
        entries: &'a BTreeMap<T::Key, T>,
        predicate: &'a Matcher<T>,
        range: &'a KeyRange<T::Key>,
    ) -> impl Iterator<Item = &'a T> + 'a
    where
        T::Key: Clone,
    {
        let upper = match &range.max_id {
            Some(max) => Bound::Excluded(max.clone()),
            None => Bound::Unbounded,
        };
        entries
            .range((Bound::Unbounded, upper))
            .rev()
            .take_while(move |(key, _)| range.admits_lower(key))
            .map(|(_, item)| item)
            .filter(move |item| predicate.matches(item))
    }
}

impl<T> Default for MemoryTimeline<T>
where
    T: Keyed + Clone,
    T::Key: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T> TimelineSource for MemoryTimeline<T>
where
    T: Keyed + Clone + Send + Sync + 'static,
    T::Key: Ord + Clone + Display + Debug + Send + Sync,
{
    type Key = T::Key;
    type Item = T;
    type Predicate = Matcher<T>;

    async fn fetch(
        &self,
        predicate: &Matcher<T>,
        range: &KeyRange<T::Key>,
        limit: u32,
    ) -> Result<Vec<T>, StorageError> {
        let entries = self.entries.read().await;
        Ok(Self::scan(&entries, predicate, range).take(limit as usize).cloned().collect())
    }

    async fn exists(&self, predicate: &Matcher<T>, range: &KeyRange<T::Key>) -> Result<bool, StorageError> {
        let entries = self.entries.read().await;
        let found = Self::scan(&entries, predicate, range).next().is_some();
        Ok(found)
    }
}
