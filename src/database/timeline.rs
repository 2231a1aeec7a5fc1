use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use sqlx::{postgres::PgRow, FromRow, PgPool};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::database::models::{Account, Status};
use crate::database::query_builder::QueryBuilder;
use crate::filter::{FilterData, FilterWhereOptions};
use crate::pagination::{KeyRange, Keyed, StorageError, TimelineSource};

/// A table read as a timeline: JSON where-clause predicates, UUID identifiers.
pub struct PgTimeline<T> {
    table: &'static str,
    pool: PgPool,
    options: FilterWhereOptions,
    slow_query_threshold: Option<Duration>,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> PgTimeline<T> {
    pub fn new(table: &'static str, pool: PgPool, config: &AppConfig) -> Self {
        let slow_query_threshold = config
            .database
            .enable_slow_query_warning
            .then(|| Duration::from_millis(config.database.slow_query_threshold_ms));
        Self {
            table,
            pool,
            options: FilterWhereOptions::from(&config.filter),
            slow_query_threshold,
            _phantom: PhantomData,
        }
    }

    /// Caller predicate ANDed with the identifier bounds
    fn scoped(&self, predicate: &Value, range: &KeyRange<Uuid>) -> Value {
        json!({ "$and": [predicate, range_where(self.table, range)] })
    }
}

impl PgTimeline<Status> {
    pub fn notes(pool: PgPool, config: &AppConfig) -> Self {
        Self::new(Status::TABLE, pool, config)
    }
}

impl PgTimeline<Account> {
    pub fn accounts(pool: PgPool, config: &AppConfig) -> Self {
        Self::new(Account::TABLE, pool, config)
    }
}

/// `{ "<table>.id": { "$lt": max_id, "$gte": since_id, "$gt": min_id } }` for the bounds present
pub fn range_where(table: &str, range: &KeyRange<Uuid>) -> Value {
    let mut ops = Map::new();
    if let Some(max_id) = &range.max_id {
        ops.insert("$lt".to_string(), json!(max_id));
    }
    if let Some(since_id) = &range.since_id {
        ops.insert("$gte".to_string(), json!(since_id));
    }
    if let Some(min_id) = &range.min_id {
        ops.insert("$gt".to_string(), json!(min_id));
    }
    if ops.is_empty() {
        return json!({});
    }
    let mut clause = Map::new();
    clause.insert(format!("{}.id", table), Value::Object(ops));
    Value::Object(clause)
}

#[async_trait]
impl<T> TimelineSource for PgTimeline<T>
where
    T: for<'r> FromRow<'r, PgRow> + Keyed<Key = Uuid> + Send + Unpin + 'static,
{
    type Key = Uuid;
    type Item = T;
    type Predicate = Value;

    async fn fetch(&self, predicate: &Value, range: &KeyRange<Uuid>, limit: u32) -> Result<Vec<T>, StorageError> {
        let filter_data = FilterData {
            where_clause: Some(self.scoped(predicate, range)),
            order: Some(json!("id desc")),
            limit: Some(limit),
        };
        let rows = QueryBuilder::<T>::new(self.table)?
            .filter(filter_data, self.options)?
            .slow_query_threshold(self.slow_query_threshold)
            .select_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Timeline fetch on {} failed: {}", self.table, e);
                StorageError::from(e)
            })?;
        Ok(rows)
    }

    async fn exists(&self, predicate: &Value, range: &KeyRange<Uuid>) -> Result<bool, StorageError> {
        let filter_data = FilterData {
            where_clause: Some(self.scoped(predicate, range)),
            ..Default::default()
        };
        let found = QueryBuilder::<T>::new(self.table)?
            .filter(filter_data, self.options)?
            .slow_query_threshold(self.slow_query_threshold)
            .exists(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Timeline probe on {} failed: {}", self.table, e);
                StorageError::from(e)
            })?;
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Filter;

    #[test]
    fn range_where_qualifies_the_identifier_column() {
        let max = Uuid::now_v7();
        let range = KeyRange { max_id: Some(max), since_id: None, min_id: None };
        assert_eq!(range_where("notes", &range), json!({ "notes.id": { "$lt": max.to_string() } }));
        assert_eq!(range_where("notes", &KeyRange::unbounded()), json!({}));
    }

    #[test]
    fn scoped_query_combines_predicate_and_bounds() {
        let author = Uuid::now_v7();
        let max = Uuid::now_v7();
        let predicate = json!({ "author_id": author });
        let range = KeyRange { max_id: Some(max), since_id: Some(author), min_id: None };
        let where_clause = json!({ "$and": [predicate, range_where("notes", &range)] });

        let mut filter = Filter::new("notes").unwrap();
        filter.where_clause(where_clause).unwrap().order(json!("id desc")).unwrap().limit(20);
        let sql = filter.to_sql().unwrap();
        assert_eq!(
            sql.query,
            "SELECT * FROM \"notes\" WHERE ((\"author_id\" = $1) AND (\"notes\".\"id\" >= $2 AND \"notes\".\"id\" < $3)) ORDER BY \"id\" DESC LIMIT 20"
        );
        assert_eq!(sql.params, vec![json!(author), json!(author), json!(max)]);
    }
}
