pub mod manager;
pub mod models;
pub mod predicates;
pub mod query_builder;
pub mod timeline;

pub use manager::{DatabaseError, DatabaseManager};
pub use timeline::PgTimeline;
