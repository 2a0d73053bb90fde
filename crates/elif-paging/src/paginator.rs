//! Paginator service - paging queries over declared filters
//!
//! Model-level queries (`paging_first`, `paging_last`, `paging_count`) and
//! instance-level queries (`paging_prev`, `paging_next`, `paging_index`) all
//! re-run the filter declared for the record type with the request options,
//! then narrow, reorder or limit the resulting set.

use std::sync::Arc;

use crate::config::PagingConfig;
use crate::error::{PagingError, PagingResult};
use crate::executor::PagingExecutor;
use crate::filter::{PagingOptions, PagingRegistry};
use crate::model::Pageable;
use crate::params::RequestParams;
use crate::query::{OrderDirection, PagingQuery};
use crate::render::PagingHelper;
use crate::routes::RouteTable;

/// Paging queries, state building and rendering for declared record types
#[derive(Clone)]
pub struct Paginator {
    registry: Arc<PagingRegistry>,
    executor: Arc<dyn PagingExecutor>,
    routes: Arc<RouteTable>,
    config: PagingConfig,
}

impl Paginator {
    pub fn new(executor: Arc<dyn PagingExecutor>) -> Self {
        Self {
            registry: Arc::new(PagingRegistry::new()),
            executor,
            routes: Arc::new(RouteTable::new()),
            config: PagingConfig::default(),
        }
    }

    /// Share an existing registry
    pub fn with_registry(mut self, registry: Arc<PagingRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_routes(mut self, routes: RouteTable) -> Self {
        self.routes = Arc::new(routes);
        self
    }

    pub fn with_config(mut self, config: PagingConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry(&self) -> &Arc<PagingRegistry> {
        &self.registry
    }

    pub fn executor(&self) -> &Arc<dyn PagingExecutor> {
        &self.executor
    }

    pub fn config(&self) -> &PagingConfig {
        &self.config
    }

    /// Declare paging for `M`, see [`PagingRegistry::declare_paging`]
    pub fn declare_paging<M: Pageable>(&self, options: PagingOptions) -> PagingResult<()> {
        self.registry.declare_paging::<M>(options)
    }

    /// View helper sharing this paginator's routes and config
    pub fn helper(&self) -> PagingHelper {
        PagingHelper::new(Arc::clone(&self.routes), self.config.clone())
    }

    fn filtered<M: Pageable>(&self, options: &RequestParams) -> PagingResult<PagingQuery> {
        self.registry.apply::<M>(options)
    }

    fn require_id<M: Pageable>(record: &M) -> PagingResult<i64> {
        record.paging_id().ok_or_else(|| PagingError::MissingId {
            model: M::model_name().to_string(),
        })
    }

    // ---------------------------------------------------------------------
    // Model-level queries
    // ---------------------------------------------------------------------

    /// Id of the first record of the filtered set
    pub async fn paging_first<M: Pageable>(&self, options: &RequestParams) -> PagingResult<Option<i64>> {
        let query = self.filtered::<M>(options)?.ordered_or_default();
        self.executor.fetch_first_id(&query).await
    }

    /// Id of the last record of the filtered set
    pub async fn paging_last<M: Pageable>(&self, options: &RequestParams) -> PagingResult<Option<i64>> {
        let query = self.filtered::<M>(options)?.reversed();
        self.executor.fetch_first_id(&query).await
    }

    /// Number of distinct records in the filtered set
    pub async fn paging_count<M: Pageable>(&self, options: &RequestParams) -> PagingResult<i64> {
        let query = self.filtered::<M>(options)?;
        self.executor.fetch_count(&query).await
    }

    // ---------------------------------------------------------------------
    // Instance-level queries
    // ---------------------------------------------------------------------

    /// A lower-id record of the filtered set, most recently created first.
    ///
    /// The creation timestamp leads the ordering and the filter's own
    /// ordering only breaks ties, unlike [`paging_next`](Self::paging_next).
    pub async fn paging_prev<M: Pageable>(
        &self,
        record: &M,
        options: &RequestParams,
    ) -> PagingResult<Option<i64>> {
        let id = Self::require_id(record)?;
        let base = self.filtered::<M>(options)?;
        let id_column = base.id_column().to_string();
        let query = base
            .where_lt(&id_column, id)
            .order_first(&M::qualified_column(M::created_at_name()), OrderDirection::Desc);
        self.executor.fetch_first_id(&query).await
    }

    /// The closest higher-id record of the filtered set
    pub async fn paging_next<M: Pageable>(
        &self,
        record: &M,
        options: &RequestParams,
    ) -> PagingResult<Option<i64>> {
        let id = Self::require_id(record)?;
        let base = self.filtered::<M>(options)?;
        let id_column = base.id_column().to_string();
        let query = base.where_gt(&id_column, id).ordered_or_default();
        self.executor.fetch_first_id(&query).await
    }

    /// 1-based position of the record within the ordered filtered set.
    ///
    /// Loads the whole id list of the set.
    pub async fn paging_index<M: Pageable>(
        &self,
        record: &M,
        options: &RequestParams,
    ) -> PagingResult<i64> {
        let id = Self::require_id(record)?;
        let query = self.filtered::<M>(options)?.ordered_or_default();
        let ids = self.executor.fetch_ids(&query).await?;

        ids.iter()
            .position(|candidate| *candidate == id)
            .map(|position| position as i64 + 1)
            .ok_or_else(|| PagingError::RecordNotInSet {
                model: M::model_name().to_string(),
                id,
            })
    }
}

impl std::fmt::Debug for Paginator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Paginator")
            .field("registry", &self.registry)
            .field("routes", &self.routes)
            .field("config", &self.config)
            .finish()
    }
}
