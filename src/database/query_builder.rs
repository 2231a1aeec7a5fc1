use std::time::{Duration, Instant};

use serde_json::Value;
use sqlx::{self, postgres::PgArguments, FromRow, PgPool, Row};
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::filter::{Filter, FilterData, FilterWhereOptions, SqlResult};

pub struct QueryBuilder<T> {
    table_name: String,
    filter: Filter,
    slow_query_threshold: Option<Duration>,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> QueryBuilder<T>
where
    T: for<'r> FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
{
    pub fn new(table_name: impl Into<String>) -> Result<Self, DatabaseError> {
        let table_name = table_name.into();
        let filter = Filter::new(&table_name).map_err(|e| DatabaseError::QueryError(e.to_string()))?;
        Ok(Self {
            table_name,
            filter,
            slow_query_threshold: None,
            _phantom: std::marker::PhantomData,
        })
    }

    pub fn filter(mut self, filter_data: FilterData, options: FilterWhereOptions) -> Result<Self, DatabaseError> {
        self.filter
            .options(options)
            .assign(filter_data)
            .map_err(|e| DatabaseError::QueryError(e.to_string()))?;
        Ok(self)
    }

    pub fn slow_query_threshold(mut self, threshold: Option<Duration>) -> Self {
        self.slow_query_threshold = threshold;
        self
    }

    pub async fn select_all(self, pool: &PgPool) -> Result<Vec<T>, DatabaseError> {
        let sql_result = self.filter.to_sql().map_err(|e| DatabaseError::QueryError(e.to_string()))?;
        let started = Instant::now();

        let mut q = sqlx::query_as::<_, T>(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query_as(q, p);
        }
        let rows = q.fetch_all(pool).await?;

        self.log_timing(&sql_result, started.elapsed());
        Ok(rows)
    }

    pub async fn exists(self, pool: &PgPool) -> Result<bool, DatabaseError> {
        let sql_result = self.filter.to_exists_sql().map_err(|e| DatabaseError::QueryError(e.to_string()))?;
        let started = Instant::now();

        let mut q = sqlx::query(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query(q, p);
        }
        let row = q.fetch_one(pool).await?;
        let exists: bool = row.try_get("exists")?;

        self.log_timing(&sql_result, started.elapsed());
        Ok(exists)
    }

    fn log_timing(&self, sql_result: &SqlResult, elapsed: Duration) {
        match self.slow_query_threshold {
            Some(threshold) if elapsed > threshold => {
                tracing::warn!("Slow query on {} ({:?}): {}", self.table_name, elapsed, sql_result.query);
            }
            _ => tracing::debug!("Query on {} took {:?}", self.table_name, elapsed),
        }
    }
}

// Identifier columns are uuid; text that parses as a UUID is bound as one so
// comparisons like "id" < $1 type-check in Postgres.
fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => match Uuid::parse_str(s) {
            Ok(id) => q.bind(id),
            Err(_) => q.bind(s),
        },
        // Arrays are expanded into one placeholder per element by FilterWhere
        Value::Array(_) => q,
        Value::Object(_) => q.bind(v.clone()),
    }
}

fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: &'q Value,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => match Uuid::parse_str(s) {
            Ok(id) => q.bind(id),
            Err(_) => q.bind(s),
        },
        Value::Array(_) => q,
        Value::Object(_) => q.bind(v.clone()),
    }
}
