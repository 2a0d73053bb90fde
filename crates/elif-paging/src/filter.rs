//! Paging filter registration
//!
//! Every pageable type declares exactly one filter: the predicate that turns
//! the request options into the scoped [`PagingQuery`] all paging queries run
//! against. Declarations are keyed by type and cannot be replaced.

use parking_lot::RwLock;
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{PagingError, PagingResult};
use crate::model::Pageable;
use crate::params::RequestParams;
use crate::query::PagingQuery;

/// Predicate producing the filtered set for a set of request options
pub trait PagingFilter: Send + Sync {
    /// Name of the filter, for logs and diagnostics
    fn name(&self) -> &str;

    /// Build the filtered set for the given options
    fn apply(&self, options: &RequestParams) -> PagingResult<PagingQuery>;
}

/// Closure-backed paging filter
pub struct FnFilter<F> {
    name: String,
    f: F,
}

impl<F> PagingFilter for FnFilter<F>
where
    F: Fn(&RequestParams) -> PagingResult<PagingQuery> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, options: &RequestParams) -> PagingResult<PagingQuery> {
        (self.f)(options)
    }
}

/// Wrap a closure as a named paging filter
pub fn filter_fn<F>(name: &str, f: F) -> Arc<dyn PagingFilter>
where
    F: Fn(&RequestParams) -> PagingResult<PagingQuery> + Send + Sync + 'static,
{
    Arc::new(FnFilter {
        name: name.to_string(),
        f,
    })
}

/// Options of a paging declaration
#[derive(Clone, Default)]
pub struct PagingOptions {
    pub paging_filter: Option<Arc<dyn PagingFilter>>,
}

impl PagingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paging_filter(mut self, filter: Arc<dyn PagingFilter>) -> Self {
        self.paging_filter = Some(filter);
        self
    }
}

impl fmt::Debug for PagingOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagingOptions")
            .field(
                "paging_filter",
                &self.paging_filter.as_ref().map(|filter| filter.name()),
            )
            .finish()
    }
}

struct Declaration {
    model: &'static str,
    filter: Arc<dyn PagingFilter>,
}

/// Registry of paging declarations, one per record type
#[derive(Default)]
pub struct PagingRegistry {
    declarations: RwLock<HashMap<TypeId, Declaration>>,
}

impl PagingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare paging for `M`.
    ///
    /// Fails when no filter is supplied or `M` is already declared.
    pub fn declare_paging<M: Pageable>(&self, options: PagingOptions) -> PagingResult<()> {
        let filter = options.paging_filter.ok_or_else(|| PagingError::MissingFilter {
            model: M::model_name().to_string(),
        })?;

        let mut declarations = self.declarations.write();
        if let Some(existing) = declarations.get(&TypeId::of::<M>()) {
            return Err(PagingError::AlreadyDeclared {
                model: existing.model.to_string(),
                filter: existing.filter.name().to_string(),
            });
        }

        tracing::debug!(
            model = M::model_name(),
            filter = filter.name(),
            "Declared paging filter"
        );
        declarations.insert(
            TypeId::of::<M>(),
            Declaration {
                model: M::model_name(),
                filter,
            },
        );
        Ok(())
    }

    /// Filter declared for `M`
    pub fn filter_for<M: Pageable>(&self) -> PagingResult<Arc<dyn PagingFilter>> {
        self.declarations
            .read()
            .get(&TypeId::of::<M>())
            .map(|declaration| Arc::clone(&declaration.filter))
            .ok_or_else(|| PagingError::NotDeclared {
                model: M::model_name().to_string(),
            })
    }

    pub fn is_declared<M: Pageable>(&self) -> bool {
        self.declarations.read().contains_key(&TypeId::of::<M>())
    }

    /// Run the declared filter of `M` against the given options
    pub fn apply<M: Pageable>(&self, options: &RequestParams) -> PagingResult<PagingQuery> {
        self.filter_for::<M>()?.apply(options)
    }

    pub fn len(&self) -> usize {
        self.declarations.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.read().is_empty()
    }
}

impl fmt::Debug for PagingRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let declarations = self.declarations.read();
        let models: Vec<&str> = declarations.values().map(|d| d.model).collect();
        f.debug_struct("PagingRegistry")
            .field("models", &models)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Post;

    impl Pageable for Post {
        fn table_name() -> &'static str {
            "posts"
        }

        fn paging_id(&self) -> Option<i64> {
            None
        }
    }

    struct Comment;

    impl Pageable for Comment {
        fn table_name() -> &'static str {
            "comments"
        }

        fn paging_id(&self) -> Option<i64> {
            None
        }
    }

    fn search() -> Arc<dyn PagingFilter> {
        filter_fn("search", |options| {
            let mut query = PagingQuery::for_model::<Post>();
            if let Some(title) = options.get("title") {
                query = query.where_like("posts.title", &format!("%{}%", title));
            }
            Ok(query)
        })
    }

    #[test]
    fn test_declare_without_filter_fails() {
        let registry = PagingRegistry::new();
        let result = registry.declare_paging::<Post>(PagingOptions::new());

        assert!(matches!(result, Err(PagingError::MissingFilter { .. })));
        assert!(!registry.is_declared::<Post>());
    }

    #[test]
    fn test_declaration_is_immutable() {
        let registry = PagingRegistry::new();
        registry
            .declare_paging::<Post>(PagingOptions::new().paging_filter(search()))
            .unwrap();

        let again = registry.declare_paging::<Post>(PagingOptions::new().paging_filter(search()));
        assert!(matches!(
            again,
            Err(PagingError::AlreadyDeclared { ref filter, .. }) if filter == "search"
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_filters_are_per_type() {
        let registry = PagingRegistry::new();
        registry
            .declare_paging::<Post>(PagingOptions::new().paging_filter(search()))
            .unwrap();

        assert!(registry.is_declared::<Post>());
        assert!(matches!(
            registry.filter_for::<Comment>(),
            Err(PagingError::NotDeclared { .. })
        ));
    }

    #[test]
    fn test_apply_passes_options_through() {
        let registry = PagingRegistry::new();
        registry
            .declare_paging::<Post>(PagingOptions::new().paging_filter(search()))
            .unwrap();

        let options = RequestParams::new().with("title", "rust");
        let query = registry.apply::<Post>(&options).unwrap();
        assert_eq!(
            query.to_sql(),
            "SELECT posts.id::BIGINT FROM posts WHERE posts.title LIKE $1"
        );
    }

    #[test]
    fn test_options_debug_shows_filter_name() {
        let options = PagingOptions::new().paging_filter(search());
        assert!(format!("{:?}", options).contains("search"));
    }
}
