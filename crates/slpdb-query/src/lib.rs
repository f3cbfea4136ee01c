//! # `slpdb-query`
//!
//! Builds query descriptors for the SLPDB v3 query language, as served by
//! slpserve over `GET <endpoint>/<base64(json)>`.
//!
//! Descriptors select the documents that *violate* a schema invariant, so an
//! empty answer means the invariant holds for the whole collection.
//!
//! ## Quick Start
//!
//! ```rust
//! use slpdb_query::{builder, pattern, Collection};
//!
//! fn main() -> Result<(), slpdb_query::QueryError> {
//!     let missing = builder::field_missing("tokenDetails.tokenIdHex", Collection::Tokens, None)?;
//!     let bad_ids = builder::value_violates_pattern(
//!         "tokenDetails.tokenIdHex",
//!         Collection::Tokens,
//!         pattern::TOKEN_ID_HEX,
//!     )?;
//!
//!     let url = missing.request_url("https://slpserve.example/q")?;
//!     assert!(url.starts_with("https://slpserve.example/q/eyJ2Ijoz"));
//!     assert_eq!(bad_ids.limit(), 1);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::doc_markdown, clippy::uninlined_format_args))]

pub mod builder;
#[cfg(test)]
mod builder_tests;
pub mod collection;
pub mod error;
pub mod field;
pub mod filter;
pub mod pattern;
pub mod predicate;
pub mod query;

pub use collection::Collection;
pub use error::{QueryError, Result};
pub use field::FieldPath;
pub use filter::{BsonType, Condition, Filter, Operator};
pub use predicate::Predicate;
pub use query::{QueryBody, QueryBuilder, QueryDescriptor, Stage, DEFAULT_LIMIT, QUERY_VERSION};
