//! # elif-paging
//!
//! Record-to-record navigation for elif.rs detail views.
//!
//! ## Features
//!
//! - **Declared filters**: each pageable type registers the query scope paging runs against
//! - **Paging queries**: first, last, count, previous, next and position within the filtered set
//! - **Carried state**: neighbour ids, position and total ride along on links, so stepping
//!   through records re-queries only what a link could not carry
//! - **Navigation bar**: `│< < i / n > >│` markup with inert links at the boundaries
//! - **Degrade, don't fail**: paging failures are logged and hide the bar instead of
//!   failing the page
//!
//! ## Quick Start
//!
//! ```rust
//! use elif_paging::prelude::*;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! struct Post {
//!     id: Option<i64>,
//! }
//!
//! impl Pageable for Post {
//!     fn table_name() -> &'static str {
//!         "posts"
//!     }
//!
//!     fn paging_id(&self) -> Option<i64> {
//!         self.id
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let executor = Arc::new(MemoryExecutor::new().with_table(
//!     "posts",
//!     vec![json!({"id": 5}), json!({"id": 8}), json!({"id": 12})],
//! ));
//! let paginator = Paginator::new(executor).with_routes(RouteTable::new().resource("posts"));
//! paginator
//!     .declare_paging::<Post>(PagingOptions::new().paging_filter(filter_fn("all", |_| {
//!         Ok(PagingQuery::for_model::<Post>())
//!     })))
//!     .unwrap();
//!
//! let post = Post { id: Some(8) };
//! let params = RequestParams::new();
//! let context = paginator
//!     .build_paging_params(Some(PagingEntry::Record(&post)), &params, &["title"])
//!     .await;
//! assert_eq!(context.paging.current_index, Some(2));
//!
//! let bar = paginator
//!     .helper()
//!     .paging_bar(Some(&post), &context.paging, &context.paging_params)
//!     .unwrap();
//! assert!(bar.contains("2 / 3"));
//! # });
//! ```

pub mod config;
pub mod error;
pub mod executor;
pub mod filter;
pub mod model;
pub mod paginator;
pub mod params;
pub mod query;
pub mod render;
pub mod routes;
pub mod state;

pub use config::{ConfigSource, PagingConfig, PagingDefaults};
pub use error::{ConfigError, PagingError, PagingResult};
pub use executor::{MemoryExecutor, PagingExecutor, PgPagingExecutor};
pub use filter::{filter_fn, FnFilter, PagingFilter, PagingOptions, PagingRegistry};
pub use model::Pageable;
pub use paginator::Paginator;
pub use params::{keys, ParamSet, RequestParams};
pub use query::{JoinClause, OrderDirection, PagingQuery, QueryOperator, WhereCondition};
pub use render::PagingHelper;
pub use routes::{RouteKind, RouteTable};
pub use state::{Page, PagingContext, PagingEntry, PagingState};

/// Commonly used paging types
pub mod prelude {
    pub use crate::error::{PagingError, PagingResult};
    pub use crate::executor::{MemoryExecutor, PagingExecutor, PgPagingExecutor};
    pub use crate::filter::{filter_fn, PagingFilter, PagingOptions};
    pub use crate::model::Pageable;
    pub use crate::paginator::Paginator;
    pub use crate::params::{ParamSet, RequestParams};
    pub use crate::query::{OrderDirection, PagingQuery};
    pub use crate::render::PagingHelper;
    pub use crate::routes::{RouteKind, RouteTable};
    pub use crate::state::{Page, PagingContext, PagingEntry, PagingState};
}
