//! Error types for query construction.

use thiserror::Error;

/// Query construction error types.
#[derive(Error, Debug)]
pub enum QueryError {
    /// The descriptor cannot be built: missing predicate, empty field path,
    /// empty allowed set, conflicting operators and the like.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Collection tag or name outside the closed set.
    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    /// Type alias not understood by `$type`.
    #[error("Unknown BSON type: {0}")]
    UnknownType(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl QueryError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidQuery(msg.into())
    }
}

/// Result type alias for query construction.
pub type Result<T> = std::result::Result<T, QueryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QueryError::invalid("no predicate provided");
        assert_eq!(err.to_string(), "Invalid query: no predicate provided");

        let err = QueryError::UnknownCollection("z".to_string());
        assert_eq!(err.to_string(), "Unknown collection: z");
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: QueryError = json_err.into();
        assert!(matches!(err, QueryError::Json(_)));
    }
}
