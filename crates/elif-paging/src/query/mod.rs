//! Paging query builder - the filtered set a paging filter hands back
//!
//! A [`PagingQuery`] describes a scoped, orderable, countable collection of
//! record ids. Filters build the scope (table, joins, conditions, default
//! ordering); the paginator derives its first/last/count/neighbour/index
//! queries from it.

pub mod builder;
pub mod sql;
pub mod types;

pub use builder::PagingQuery;
pub use types::{JoinClause, OrderDirection, QueryOperator, WhereCondition};
