//! Pageable records
//!
//! The table metadata and id access the paginator needs from a model.
//! Mirrors the naming of the ORM `Model` trait so existing models can
//! implement it with a few one-liners.

/// A record type that can be paged through one record at a time
pub trait Pageable: Send + Sync + 'static {
    /// Table name for this model
    fn table_name() -> &'static str;

    /// Primary key column
    fn primary_key_name() -> &'static str {
        "id"
    }

    /// Creation timestamp column, used to order previous-record lookups
    fn created_at_name() -> &'static str {
        "created_at"
    }

    /// Resource name used to look up routes, `table_name` by default
    fn resource_name() -> &'static str {
        Self::table_name()
    }

    /// Id of this record, `None` while it is unsaved
    fn paging_id(&self) -> Option<i64>;

    /// Whether this record has not been saved yet
    fn is_new_record(&self) -> bool {
        self.paging_id().is_none()
    }

    /// `table.column`
    fn qualified_column(column: &str) -> String {
        format!("{}.{}", Self::table_name(), column)
    }

    /// Readable type name for errors and logs
    fn model_name() -> &'static str {
        std::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Article {
        id: Option<i64>,
    }

    impl Pageable for Article {
        fn table_name() -> &'static str {
            "articles"
        }

        fn created_at_name() -> &'static str {
            "published_at"
        }

        fn paging_id(&self) -> Option<i64> {
            self.id
        }
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Article::primary_key_name(), "id");
        assert_eq!(Article::resource_name(), "articles");
        assert_eq!(
            Article::qualified_column(Article::created_at_name()),
            "articles.published_at"
        );
        assert!(Article::model_name().ends_with("Article"));
    }

    #[test]
    fn test_new_record_detection() {
        assert!(Article { id: None }.is_new_record());
        assert!(!Article { id: Some(3) }.is_new_record());
    }
}
