use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::pagination::Keyed;

/// A note as stored in `notes`, serialized in its API form
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Status {
    pub id: Uuid,
    #[sqlx(rename = "author_id")]
    pub account_id: Uuid,
    pub content: String,
    pub visibility: String,
    pub sensitive: bool,
    pub spoiler_text: String,
    pub created_at: DateTime<Utc>,
}

impl Status {
    pub const TABLE: &'static str = "notes";
}

impl Keyed for Status {
    type Key = Uuid;

    fn key(&self) -> Uuid {
        self.id
    }
}
