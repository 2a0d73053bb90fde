//! PostgreSQL paging executor

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgPoolOptions};
use sqlx::query::Query;
use sqlx::{Pool, Postgres, Row};

use super::PagingExecutor;
use crate::error::PagingResult;
use crate::query::PagingQuery;

/// Runs paging queries on a sqlx PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgPagingExecutor {
    pool: Pool<Postgres>,
}

impl PgPagingExecutor {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Connect a small pool to `database_url`
    pub async fn connect(database_url: &str, max_connections: u32) -> PagingResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }
}

fn bind_value<'q>(
    query: Query<'q, Postgres, PgArguments>,
    value: &Value,
) -> Query<'q, Postgres, PgArguments> {
    match value {
        Value::Null => query.bind(Option::<String>::None),
        Value::Bool(b) => query.bind(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => query.bind(i),
            None => query.bind(n.as_f64()),
        },
        Value::String(s) => query.bind(s.clone()),
        other => query.bind(other.clone()),
    }
}

fn bind_all<'q>(sql: &'q str, params: &[Value]) -> Query<'q, Postgres, PgArguments> {
    params
        .iter()
        .fold(sqlx::query(sql), |query, value| bind_value(query, value))
}

#[async_trait]
impl PagingExecutor for PgPagingExecutor {
    async fn fetch_ids(&self, query: &PagingQuery) -> PagingResult<Vec<i64>> {
        let (sql, params) = query.to_sql_with_params();
        tracing::debug!(sql = %sql, "Executing paging id query");

        let rows = bind_all(&sql, &params).fetch_all(&self.pool).await?;
        let mut ids = Vec::with_capacity(rows.len());
        for row in rows {
            ids.push(row.try_get::<i64, _>(0)?);
        }
        Ok(ids)
    }

    async fn fetch_count(&self, query: &PagingQuery) -> PagingResult<i64> {
        let (sql, params) = query.to_count_sql_with_params();
        tracing::debug!(sql = %sql, "Executing paging count query");

        let row = bind_all(&sql, &params).fetch_one(&self.pool).await?;
        Ok(row.try_get::<i64, _>(0)?)
    }
}
