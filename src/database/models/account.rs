use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::pagination::Keyed;

/// A local or remote actor as stored in `users`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub note: String,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub const TABLE: &'static str = "users";
}

impl Keyed for Account {
    type Key = Uuid;

    fn key(&self) -> Uuid {
        self.id
    }
}
