//! Error types for slpdb-audit.

use slpdb_query::{Collection, QueryError};
use thiserror::Error;

/// Audit error types.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error. Fatal: no check can run.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The descriptor for a check could not be built.
    #[error(transparent)]
    InvalidQuery(#[from] QueryError),

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("Endpoint returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// The response is valid JSON but not in the expected shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Documents violating the checked invariant were found.
    #[error("{count} {collection} document(s) violate '{field}'")]
    Violation {
        /// Collection the check ran against.
        collection: Collection,
        /// Checked field path.
        field: String,
        /// Number of violating documents reported.
        count: u64,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for audit operations.
pub type Result<T> = std::result::Result<T, Error>;
