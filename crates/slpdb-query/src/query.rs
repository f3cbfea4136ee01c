//! Query descriptors and their wire encoding.
//!
//! A descriptor serializes to the v3 request body understood by slpserve:
//!
//! ```json
//! { "v": 3, "q": { "db": ["t"], "find": { ... }, "limit": 1 } }
//! { "v": 3, "q": { "db": ["t"], "aggregate": [ { "$match": { ... } }, { "$count": "n" } ], "limit": 1 } }
//! ```
//!
//! The descriptor is sent base64-encoded as the last path segment of a GET.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Serialize;

use crate::collection::Collection;
use crate::error::{QueryError, Result};
use crate::filter::Filter;

/// Query language version understood by the service.
pub const QUERY_VERSION: u32 = 3;

/// Default number of violating documents returned for diagnostics.
pub const DEFAULT_LIMIT: u32 = 1;

/// One aggregation pipeline stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Stage {
    /// `{ "$match": filter }`
    #[serde(rename = "$match")]
    Match(Filter),
    /// `{ "$count": output_field }`
    #[serde(rename = "$count")]
    Count(String),
}

/// Body of the query: either a plain find or an aggregation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryBody {
    /// `find` filter.
    Find(Filter),
    /// `aggregate` pipeline.
    Aggregate(Vec<Stage>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Query {
    db: [Collection; 1],
    #[serde(flatten)]
    body: QueryBody,
    limit: u32,
}

/// An immutable, fully validated query descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryDescriptor {
    v: u32,
    q: Query,
}

impl QueryDescriptor {
    /// Starts building a descriptor against `collection`.
    #[must_use]
    pub fn builder(collection: Collection) -> QueryBuilder {
        QueryBuilder {
            collection,
            body: None,
            limit: DEFAULT_LIMIT,
        }
    }

    /// Target collection.
    #[must_use]
    pub fn collection(&self) -> Collection {
        self.q.db[0]
    }

    /// Result limit.
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.q.limit
    }

    /// Query body.
    #[must_use]
    pub fn body(&self) -> &QueryBody {
        &self.q.body
    }

    /// Output field of a trailing `$count` stage, if the query is a counting
    /// aggregation.
    #[must_use]
    pub fn count_field(&self) -> Option<&str> {
        match &self.q.body {
            QueryBody::Aggregate(stages) => match stages.last() {
                Some(Stage::Count(name)) => Some(name.as_str()),
                _ => None,
            },
            QueryBody::Find(_) => None,
        }
    }

    /// Returns the same descriptor with a different result limit.
    pub fn with_limit(mut self, limit: u32) -> Result<Self> {
        if limit == 0 {
            return Err(QueryError::invalid("limit must be at least 1"));
        }
        self.q.limit = limit;
        Ok(self)
    }

    /// Compact JSON, key order fixed by construction.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Standard base64 (padded) of [`Self::to_json`], as produced by `btoa`.
    pub fn encode(&self) -> Result<String> {
        Ok(STANDARD.encode(self.to_json()?))
    }

    /// `<base>/<encoded>`, with exactly one slash between the two.
    pub fn request_url(&self, base: &str) -> Result<String> {
        Ok(format!("{}/{}", base.trim_end_matches('/'), self.encode()?))
    }
}

/// Builder for [`QueryDescriptor`].
#[derive(Debug, Clone)]
#[must_use]
pub struct QueryBuilder {
    collection: Collection,
    body: Option<QueryBody>,
    limit: u32,
}

impl QueryBuilder {
    /// Uses a `find` filter as the predicate.
    pub fn find(mut self, filter: Filter) -> Self {
        self.body = Some(QueryBody::Find(filter));
        self
    }

    /// Uses an aggregation pipeline as the predicate.
    pub fn aggregate(mut self, stages: Vec<Stage>) -> Self {
        self.body = Some(QueryBody::Aggregate(stages));
        self
    }

    /// Overrides the diagnostic result limit.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Validates and freezes the descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidQuery`] if no predicate was supplied, the
    /// filter or pipeline is empty, or the limit is zero.
    pub fn build(self) -> Result<QueryDescriptor> {
        let body = self
            .body
            .ok_or_else(|| QueryError::invalid("no predicate provided"))?;

        match &body {
            QueryBody::Find(filter) if filter.is_empty() => {
                return Err(QueryError::invalid("find filter is empty"));
            }
            QueryBody::Aggregate(stages) if stages.is_empty() => {
                return Err(QueryError::invalid("aggregate pipeline is empty"));
            }
            QueryBody::Aggregate(stages) => {
                for stage in stages {
                    match stage {
                        Stage::Match(filter) if filter.is_empty() => {
                            return Err(QueryError::invalid("$match stage is empty"));
                        }
                        Stage::Count(name) if name.is_empty() || name.contains('.') => {
                            return Err(QueryError::invalid(format!(
                                "$count output '{name}' must be a non-empty top-level name"
                            )));
                        }
                        _ => {}
                    }
                }
            }
            QueryBody::Find(_) => {}
        }

        if self.limit == 0 {
            return Err(QueryError::invalid("limit must be at least 1"));
        }

        Ok(QueryDescriptor {
            v: QUERY_VERSION,
            q: Query {
                db: [self.collection],
                body,
                limit: self.limit,
            },
        })
    }
}
