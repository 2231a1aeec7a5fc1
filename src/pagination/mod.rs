//! Keyset (cursor) pagination for timelines and account lists.
//!
//! Pages are cut on the record identifier instead of a row offset, so inserts
//! between requests never shift or duplicate entries. Navigation is exposed as
//! a Mastodon-style `Link` header with `next` (older, `max_id`) and `prev`
//! (newer, `min_id`) targets.

pub mod link;
pub mod memory;
pub mod paginator;
pub mod range;
pub mod request;
pub mod source;

pub use link::{find_link, format_link_header, parse_link_header, Link, LinkBase, Rel};
pub use memory::{Matcher, MemoryTimeline};
pub use paginator::{fetch_page, paginate, Page};
pub use range::KeyRange;
pub use request::{PageQuery, PageQueryError, PageRequest};
pub use source::{Keyed, StorageError, TimelineSource};
