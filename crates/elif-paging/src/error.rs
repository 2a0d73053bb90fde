//! Paging error types
//!
//! Errors fall in two groups: configuration errors, which surface at
//! declaration/setup time and are returned to the caller, and runtime
//! failures (queries, parameters, routes), which the state builder and the
//! link renderer log and degrade to an empty result.

use thiserror::Error;

/// Result type for paging operations
pub type PagingResult<T> = Result<T, PagingError>;

/// Paging errors
#[derive(Error, Debug)]
pub enum PagingError {
    #[error("Paging filter not supplied for {model}")]
    MissingFilter { model: String },

    #[error("Paging already declared for {model} with filter '{filter}'")]
    AlreadyDeclared { model: String, filter: String },

    #[error("Paging not declared for {model}")]
    NotDeclared { model: String },

    #[error("Invalid value for paging parameter '{name}': '{value}'")]
    InvalidParam { name: String, value: String },

    #[error("Record {id} is not part of the filtered set of {model}")]
    RecordNotInSet { model: String, id: i64 },

    #[error("Record of {model} has no id")]
    MissingId { model: String },

    #[error("Query error: {message}")]
    Query { message: String },

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Route error: {message}")]
    Route { message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl PagingError {
    /// Create a query error
    pub fn query<T: Into<String>>(message: T) -> Self {
        PagingError::Query {
            message: message.into(),
        }
    }

    /// Create a route error
    pub fn route<T: Into<String>>(message: T) -> Self {
        PagingError::Route {
            message: message.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_param<N: Into<String>, V: Into<String>>(name: N, value: V) -> Self {
        PagingError::InvalidParam {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Whether this error is a setup-time mistake rather than a runtime failure
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            PagingError::MissingFilter { .. }
                | PagingError::AlreadyDeclared { .. }
                | PagingError::NotDeclared { .. }
                | PagingError::Config(_)
        )
    }
}

impl From<sqlx::Error> for PagingError {
    fn from(err: sqlx::Error) -> Self {
        PagingError::Database {
            message: err.to_string(),
        }
    }
}

impl From<serde_urlencoded::ser::Error> for PagingError {
    fn from(err: serde_urlencoded::ser::Error) -> Self {
        PagingError::route(err.to_string())
    }
}

/// Configuration loading and validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {field}: '{value}', expected {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },
}

impl ConfigError {
    pub fn validation_failed<T: Into<String>>(message: T) -> Self {
        ConfigError::ValidationFailed {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors_are_flagged() {
        let missing = PagingError::MissingFilter {
            model: "Post".into(),
        };
        assert!(missing.is_configuration());
        assert!(missing.to_string().contains("Post"));

        let config: PagingError = ConfigError::validation_failed("bad class").into();
        assert!(config.is_configuration());

        let undeclared = PagingError::NotDeclared {
            model: "Post".into(),
        };
        assert!(undeclared.is_configuration());

        assert!(!PagingError::query("boom").is_configuration());
    }

    #[test]
    fn test_record_not_in_set_message() {
        let err = PagingError::RecordNotInSet {
            model: "posts".into(),
            id: 42,
        };
        assert_eq!(
            err.to_string(),
            "Record 42 is not part of the filtered set of posts"
        );
    }
}
