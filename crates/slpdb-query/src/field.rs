//! Dotted document field paths.

use serde::Serialize;
use std::fmt;

use crate::error::{QueryError, Result};

/// A validated dotted path such as `tokenDetails.tokenIdHex`.
///
/// Segments must be non-empty and must not start with `$`, so a path can
/// never be confused with a query operator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FieldPath(String);

impl FieldPath {
    /// Parses and validates a dotted path.
    pub fn parse(path: &str) -> Result<Self> {
        if path.trim().is_empty() {
            return Err(QueryError::invalid("field path is empty"));
        }
        for segment in path.split('.') {
            if segment.is_empty() {
                return Err(QueryError::invalid(format!(
                    "field path '{path}' has an empty segment"
                )));
            }
            if segment.starts_with('$') {
                return Err(QueryError::invalid(format!(
                    "field path '{path}' contains operator segment '{segment}'"
                )));
            }
        }
        Ok(Self(path.to_string()))
    }

    /// The path as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A top-level output name derived from the path.
    ///
    /// `$count` rejects dotted names, so dots become underscores.
    #[must_use]
    pub fn counter_name(&self) -> String {
        self.0.replace('.', "_")
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for FieldPath {
    type Error = QueryError;

    fn try_from(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_paths() {
        assert_eq!(FieldPath::parse("tx").unwrap().as_str(), "tx");
        assert_eq!(
            FieldPath::parse("graphTxn.outputs.slpAmount").unwrap().to_string(),
            "graphTxn.outputs.slpAmount"
        );
    }

    #[test]
    fn test_parse_rejects_bad_paths() {
        for bad in ["", "   ", "a..b", ".a", "a.", "$where", "slp.$valid"] {
            assert!(
                matches!(FieldPath::parse(bad), Err(QueryError::InvalidQuery(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_counter_name_has_no_dots() {
        let path = FieldPath::parse("tokenDetails.documentSha256Hex").unwrap();
        assert_eq!(path.counter_name(), "tokenDetails_documentSha256Hex");
    }
}
