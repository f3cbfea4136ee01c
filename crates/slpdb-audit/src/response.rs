//! Decoding of slpserve answers into violation counts.

use serde_json::{Map, Value};

use slpdb_query::QueryDescriptor;

use crate::error::{Error, Result};

/// A decoded response: a JSON object keyed by collection tag.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResponse(Map<String, Value>);

impl QueryResponse {
    /// Wraps a decoded JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedResponse`] if the body is not an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(Error::MalformedResponse(format!(
                "expected a JSON object, got {}",
                kind_of(&other)
            ))),
        }
    }

    /// Raw entry for `tag`.
    #[must_use]
    pub fn get(&self, tag: &str) -> Option<&Value> {
        self.0.get(tag)
    }

    /// Number of documents violating the invariant `query` checks.
    ///
    /// `find` answers are arrays of offending documents. Counting
    /// aggregations answer with `[]` or `[{ <counter>: n }]`; a bare
    /// `{ <counter>: n }` object is accepted too.
    pub fn violation_count(&self, query: &QueryDescriptor) -> Result<u64> {
        let tag = query.collection().tag();
        let entry = self.get(tag).ok_or_else(|| {
            Error::MalformedResponse(format!("response has no '{tag}' entry"))
        })?;

        match query.count_field() {
            None => match entry {
                Value::Array(docs) => Ok(docs.len() as u64),
                other => Err(Error::MalformedResponse(format!(
                    "'{tag}' should be an array of documents, got {}",
                    kind_of(other)
                ))),
            },
            Some(counter) => match entry {
                Value::Array(rows) => match rows.first() {
                    None => Ok(0),
                    Some(row) => read_counter(row, counter, tag),
                },
                Value::Object(_) => read_counter(entry, counter, tag),
                other => Err(Error::MalformedResponse(format!(
                    "'{tag}' should hold a $count result, got {}",
                    kind_of(other)
                ))),
            },
        }
    }
}

fn read_counter(row: &Value, counter: &str, tag: &str) -> Result<u64> {
    row.get(counter).and_then(Value::as_u64).ok_or_else(|| {
        Error::MalformedResponse(format!(
            "'{tag}' $count row lacks a numeric '{counter}' field"
        ))
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
