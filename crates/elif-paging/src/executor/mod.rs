//! Query executors - run paging queries against a store
//!
//! The paginator only needs two terminal operations from a store: the ordered
//! id list of a query and the distinct count of its filtered set.

pub mod memory;
pub mod postgres;

pub use memory::MemoryExecutor;
pub use postgres::PgPagingExecutor;

use async_trait::async_trait;

use crate::error::PagingResult;
use crate::query::PagingQuery;

/// Executes paging queries
#[async_trait]
pub trait PagingExecutor: Send + Sync {
    /// Ids selected by the query, honouring its ordering, limit and offset
    async fn fetch_ids(&self, query: &PagingQuery) -> PagingResult<Vec<i64>>;

    /// Number of distinct ids in the query's filtered set
    async fn fetch_count(&self, query: &PagingQuery) -> PagingResult<i64>;

    /// First id selected by the query
    async fn fetch_first_id(&self, query: &PagingQuery) -> PagingResult<Option<i64>> {
        let ids = self.fetch_ids(&query.clone().limit(1)).await?;
        Ok(ids.into_iter().next())
    }
}
