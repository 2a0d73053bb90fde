//! Paging state building
//!
//! [`PagingState`] is built fresh for each request. Values the previous page
//! already computed travel back in the query string (`n`, `p`, `c_i`, `h`,
//! `t`, `t_c`) and win over fresh queries, so stepping through records only
//! queries what the links could not carry.
//!
//! Failures never reach the page: they are logged and the state degrades to
//! empty, which renders no navigation bar.

use serde::{Deserialize, Serialize};

use crate::error::{PagingError, PagingResult};
use crate::model::Pageable;
use crate::paginator::Paginator;
use crate::params::{keys, ParamSet, RequestParams};
use crate::routes::RouteKind;

/// Position of a record within its filtered set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingState {
    pub prev_id: Option<i64>,
    pub next_id: Option<i64>,
    pub head_id: Option<i64>,
    pub tail_id: Option<i64>,
    /// 1-based; 0 for an unsaved record
    pub current_index: Option<i64>,
    pub total_count: Option<i64>,
    /// Route kind links target instead of the configured default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<RouteKind>,
}

impl PagingState {
    pub fn empty() -> Self {
        Self::default()
    }

    /// State carrying only a total, used for list pages
    pub fn with_total(total_count: i64) -> Self {
        Self {
            total_count: Some(total_count),
            ..Self::default()
        }
    }

    /// Target a different route kind, e.g. the edit form
    pub fn with_route(mut self, route: RouteKind) -> Self {
        self.route = Some(route);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.prev_id.is_none()
            && self.next_id.is_none()
            && self.head_id.is_none()
            && self.tail_id.is_none()
            && self.current_index.is_none()
            && self.total_count.is_none()
    }
}

/// A paginated collection page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub per_page: i64,
    pub total_entries: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page: i64, per_page: i64, total_entries: i64) -> Self {
        Self {
            items,
            page,
            per_page,
            total_entries,
        }
    }
}

/// Whatever a page handler is showing
#[derive(Debug)]
pub enum PagingEntry<'a, M> {
    /// A paginated collection; its total is taken as-is
    Page(&'a Page<M>),
    /// A plain list; its length is the total
    List(&'a [M]),
    /// A single record, positioned within its filtered set
    Record(&'a M),
}

/// The two request-scoped values views consume
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PagingContext {
    /// Position of the current entry
    pub paging: PagingState,
    /// Allow-listed request parameters to carry on links
    pub paging_params: ParamSet,
}

impl PagingContext {
    pub fn is_empty(&self) -> bool {
        self.paging.is_empty() && self.paging_params.is_empty()
    }
}

impl Paginator {
    /// Paging state of a record, or the error that prevented building it
    pub async fn try_set_paging<M: Pageable>(
        &self,
        record: &M,
        params: &RequestParams,
    ) -> PagingResult<PagingState> {
        let total = match params.get_i64(keys::TOTAL_COUNT)? {
            Some(total) => total,
            None => self.paging_count::<M>(params).await?,
        };
        if total == 0 {
            return Ok(PagingState::empty());
        }

        let mut state = PagingState::empty();
        if record.is_new_record() {
            state.prev_id = None;
            state.next_id = self.paging_first::<M>(params).await?;
            state.current_index = Some(0);
        } else {
            state.next_id = match params.get_i64(keys::NEXT_ID)? {
                Some(id) => Some(id),
                None => self.paging_next(record, params).await?,
            };
            state.prev_id = match params.get_i64(keys::PREV_ID)? {
                Some(id) => Some(id),
                None => self.paging_prev(record, params).await?,
            };
            state.current_index = match params.get_i64(keys::CURRENT_INDEX)? {
                Some(index) => Some(index),
                None => Some(self.paging_index(record, params).await?),
            };
        }

        state.head_id = match params.get_i64(keys::HEAD_ID)? {
            Some(id) => Some(id),
            None => self.paging_first::<M>(params).await?,
        };
        state.tail_id = match params.get_i64(keys::TAIL_ID)? {
            Some(id) => Some(id),
            None => self.paging_last::<M>(params).await?,
        };
        state.total_count = Some(total);

        Ok(state)
    }

    /// Paging state of a record; failures are logged and yield an empty state
    pub async fn set_paging<M: Pageable>(&self, record: &M, params: &RequestParams) -> PagingState {
        match self.try_set_paging(record, params).await {
            Ok(state) => state,
            Err(err) => {
                log_degraded(M::model_name(), &err, "Paging state unavailable, hiding navigation");
                PagingState::empty()
            }
        }
    }

    /// Paging context of an entry, or the error that prevented building it
    pub async fn try_build_paging_params<M: Pageable>(
        &self,
        entry: Option<PagingEntry<'_, M>>,
        params: &RequestParams,
        carry_fields: &[&str],
    ) -> PagingResult<PagingContext> {
        let paging = match entry {
            None => return Ok(PagingContext::default()),
            Some(PagingEntry::Page(page)) => PagingState::with_total(page.total_entries),
            Some(PagingEntry::List(items)) => PagingState::with_total(items.len() as i64),
            Some(PagingEntry::Record(record)) => {
                let state = self.try_set_paging(record, params).await?;
                if state.is_empty() {
                    return Ok(PagingContext::default());
                }
                state
            }
        };

        Ok(PagingContext {
            paging,
            paging_params: params.allow_list(carry_fields),
        })
    }

    /// Paging context of whatever a handler is about to render.
    ///
    /// `carry_fields` names the request parameters to keep on generated
    /// links. Failures are logged and yield an empty context.
    pub async fn build_paging_params<M: Pageable>(
        &self,
        entry: Option<PagingEntry<'_, M>>,
        params: &RequestParams,
        carry_fields: &[&str],
    ) -> PagingContext {
        match self.try_build_paging_params(entry, params, carry_fields).await {
            Ok(context) => context,
            Err(err) => {
                log_degraded(M::model_name(), &err, "Paging params unavailable, hiding navigation");
                PagingContext::default()
            }
        }
    }
}

/// Setup mistakes are logged as errors, runtime failures as warnings
fn log_degraded(model: &str, err: &PagingError, message: &str) {
    if err.is_configuration() {
        tracing::error!(model, error = %err, "{}", message);
    } else {
        tracing::warn!(model, error = %err, "{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::MemoryExecutor;
    use crate::filter::{filter_fn, PagingOptions};
    use crate::query::PagingQuery;
    use serde_json::json;
    use std::sync::Arc;
    use tracing_test::traced_test;

    #[derive(Debug)]
    struct Post {
        id: Option<i64>,
    }

    impl Pageable for Post {
        fn table_name() -> &'static str {
            "posts"
        }

        fn paging_id(&self) -> Option<i64> {
            self.id
        }
    }

    fn paginator_with(filter_fails: bool) -> Paginator {
        let executor = Arc::new(MemoryExecutor::new().with_table(
            "posts",
            vec![
                json!({"id": 5, "created_at": "2024-01-05"}),
                json!({"id": 8, "created_at": "2024-01-08"}),
            ],
        ));
        let paginator = Paginator::new(executor);
        paginator
            .declare_paging::<Post>(PagingOptions::new().paging_filter(filter_fn(
                "search",
                move |_| {
                    if filter_fails {
                        Err(PagingError::query("search index offline"))
                    } else {
                        Ok(PagingQuery::for_model::<Post>())
                    }
                },
            )))
            .unwrap();
        paginator
    }

    #[test]
    fn test_state_emptiness() {
        assert!(PagingState::empty().is_empty());
        assert!(PagingState::empty().with_route(RouteKind::Edit).is_empty());
        assert!(!PagingState::with_total(0).is_empty());
    }

    #[test]
    fn test_state_serializes_without_route() {
        let state = PagingState {
            current_index: Some(1),
            total_count: Some(2),
            ..PagingState::default()
        };
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["current_index"], json!(1));
        assert!(value.get("route").is_none());
    }

    #[tokio::test]
    async fn test_collection_entries_only_carry_a_total() {
        let paginator = paginator_with(false);
        let params = RequestParams::new().with("title", "rust");
        let posts = vec![Post { id: Some(5) }, Post { id: Some(8) }];

        let context = paginator
            .build_paging_params(Some(PagingEntry::List(&posts)), &params, &["title"])
            .await;
        assert_eq!(context.paging, PagingState::with_total(2));
        assert_eq!(context.paging_params.get("title"), Some("rust"));

        let page = Page::new(posts, 2, 2, 40);
        let context = paginator
            .build_paging_params(Some(PagingEntry::Page(&page)), &params, &[])
            .await;
        assert_eq!(context.paging.total_count, Some(40));
        assert!(context.paging_params.is_empty());
    }

    #[tokio::test]
    async fn test_missing_entry_yields_empty_context() {
        let paginator = paginator_with(false);
        let params = RequestParams::new().with("title", "rust");

        let context = paginator
            .build_paging_params::<Post>(None, &params, &["title"])
            .await;
        assert!(context.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_param_degrades() {
        let paginator = paginator_with(false);
        let params = RequestParams::new().with("c_i", "third");
        let post = Post { id: Some(8) };

        assert!(paginator.try_set_paging(&post, &params).await.is_err());
        assert!(paginator.set_paging(&post, &params).await.is_empty());
    }

    #[tokio::test]
    #[traced_test]
    async fn test_failing_filter_is_logged_and_swallowed() {
        let paginator = paginator_with(true);
        let params = RequestParams::new().with("title", "rust");
        let post = Post { id: Some(8) };

        let context = paginator
            .build_paging_params(Some(PagingEntry::Record(&post)), &params, &["title"])
            .await;

        assert!(context.is_empty());
        assert!(logs_contain("search index offline"));
        assert!(logs_contain("WARN"));
        assert!(!logs_contain("ERROR"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_undeclared_model_is_logged_as_error() {
        struct Tag;
        impl Pageable for Tag {
            fn table_name() -> &'static str {
                "tags"
            }
            fn paging_id(&self) -> Option<i64> {
                Some(1)
            }
        }

        let paginator = paginator_with(false);
        let state = paginator.set_paging(&Tag, &RequestParams::new()).await;

        assert!(state.is_empty());
        assert!(logs_contain("Paging not declared"));
        assert!(logs_contain("ERROR"));
    }
}
