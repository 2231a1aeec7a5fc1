use std::fmt::Display;

use tracing::debug;

use super::link::{format_link_header, Link, LinkBase, Rel};
use super::range::KeyRange;
use super::request::PageRequest;
use super::source::{Keyed, StorageError, TimelineSource};

/// One page of a timeline, newest first, with its navigation anchors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T, K> {
    pub items: Vec<T>,
    pub limit: u32,
    /// Set when newer items exist; the `prev` link uses it as `min_id`
    pub prev: Option<K>,
    /// Set when older items exist; the `next` link uses it as `max_id`
    pub next: Option<K>,
}

impl<T, K: Display> Page<T, K> {
    pub fn empty(limit: u32) -> Self {
        Self { items: Vec::new(), limit, prev: None, next: None }
    }

    pub fn links(&self, base: &LinkBase) -> Vec<Link> {
        let mut links = Vec::with_capacity(2);
        if let Some(max_id) = &self.next {
            links.push(base.link(Rel::Next, self.limit, max_id));
        }
        if let Some(min_id) = &self.prev {
            links.push(base.link(Rel::Prev, self.limit, min_id));
        }
        links
    }

    pub fn link_header(&self, base: &LinkBase) -> Option<String> {
        format_link_header(&self.links(base))
    }

    pub fn into_parts(self, base: &LinkBase) -> (Vec<T>, Option<String>) {
        let link = self.link_header(base);
        (self.items, link)
    }
}

/// Fetch one page and decide which navigation anchors it gets.
///
/// Issues the main range query, then at most two existence probes: one for
/// anything newer than the first item and, if the page came back full, one
/// for anything older than the last item.
pub async fn fetch_page<S>(
    source: &S,
    predicate: &S::Predicate,
    request: &PageRequest<S::Key>,
) -> Result<Page<S::Item, S::Key>, StorageError>
where
    S: TimelineSource + ?Sized,
{
    let range = request.range();
    if range.is_empty() {
        debug!("Empty identifier range ({}), skipping storage", range);
        return Ok(Page::empty(request.limit));
    }

    let items = source.fetch(predicate, &range, request.limit).await?;
    debug_assert!(
        items.windows(2).all(|w| w[0].key() > w[1].key()),
        "timeline source returned items out of order"
    );

    let (first, last) = match (items.first(), items.last()) {
        (Some(first), Some(last)) => (first.key(), last.key()),
        _ => {
            debug!("No items within {}", range);
            return Ok(Page::empty(request.limit));
        }
    };

    let full = items.len() >= request.limit as usize;
    let newer = KeyRange::above(first.clone());
    let older = KeyRange::below(last.clone());

    let has_prev = source.exists(predicate, &newer);
    let has_next = async {
        if full {
            source.exists(predicate, &older).await
        } else {
            Ok(false)
        }
    };
    let (has_prev, has_next) = futures::try_join!(has_prev, has_next)?;

    debug!(
        "Page of {} within {} (prev: {}, next: {})",
        items.len(),
        range,
        has_prev,
        has_next
    );

    Ok(Page {
        items,
        limit: request.limit,
        prev: has_prev.then_some(first),
        next: has_next.then_some(last),
    })
}

/// Fetch a page and render its `Link` header against `base`
pub async fn paginate<S>(
    source: &S,
    predicate: &S::Predicate,
    request: &PageRequest<S::Key>,
    base: &LinkBase,
) -> Result<(Vec<S::Item>, Option<String>), StorageError>
where
    S: TimelineSource + ?Sized,
{
    Ok(fetch_page(source, predicate, request).await?.into_parts(base))
}
