//! Declarative `find` / `$match` filters.
//!
//! A [`Filter`] is an ordered AND of per-field conditions. Filters are built
//! by value and combined with [`Filter::and`]; nothing is mutated after a
//! descriptor is built.
//!
//! # JSON Format
//!
//! ```json
//! { "slp.detail": { "$exists": false }, "slp.valid": true }
//! { "mintBatonUtxo": { "$ne": "", "$regex": "^(?!(?:[0-9a-f]{64}:[0-9]+)\\z)" } }
//! ```

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::{QueryError, Result};
use crate::field::FieldPath;

/// BSON type aliases accepted by `$type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BsonType {
    /// UTF-8 string.
    String,
    /// Boolean.
    Bool,
    /// 32-bit integer.
    Int,
    /// 64-bit integer.
    Long,
    /// Double.
    Double,
    /// Decimal128.
    Decimal,
    /// Embedded document.
    Object,
    /// Array.
    Array,
    /// Null.
    Null,
}

impl BsonType {
    /// The alias string understood by the service.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Long => "long",
            Self::Double => "double",
            Self::Decimal => "decimal",
            Self::Object => "object",
            Self::Array => "array",
            Self::Null => "null",
        }
    }
}

impl fmt::Display for BsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BsonType {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "string" => Ok(Self::String),
            "bool" => Ok(Self::Bool),
            "int" => Ok(Self::Int),
            "long" => Ok(Self::Long),
            "double" => Ok(Self::Double),
            "decimal" => Ok(Self::Decimal),
            "object" => Ok(Self::Object),
            "array" => Ok(Self::Array),
            "null" => Ok(Self::Null),
            other => Err(QueryError::UnknownType(other.to_string())),
        }
    }
}

/// A single query operator applied to one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Operator {
    /// `$exists`
    Exists(bool),
    /// `$eq`
    Eq(Value),
    /// `$ne`
    Ne(Value),
    /// `$lt`
    Lt(Value),
    /// `$nin`
    Nin(Vec<Value>),
    /// `$regex`
    Regex(String),
    /// `$not: { $type: .. }`
    NotType(BsonType),
}

impl Operator {
    /// Operator key as it appears on the wire.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Exists(_) => "$exists",
            Self::Eq(_) => "$eq",
            Self::Ne(_) => "$ne",
            Self::Lt(_) => "$lt",
            Self::Nin(_) => "$nin",
            Self::Regex(_) => "$regex",
            Self::NotType(_) => "$not",
        }
    }

    fn value(&self) -> Value {
        match self {
            Self::Exists(b) => Value::Bool(*b),
            Self::Eq(v) | Self::Ne(v) | Self::Lt(v) => v.clone(),
            Self::Nin(values) => Value::Array(values.clone()),
            Self::Regex(r) => Value::String(r.clone()),
            Self::NotType(t) => json!({ "$type": t.as_str() }),
        }
    }
}

/// What a single field must satisfy.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Implicit equality: `{ field: literal }`.
    Equals(Value),
    /// Operator object: `{ field: { $op: .., $op2: .. } }`.
    Operators(Vec<Operator>),
}

impl Condition {
    fn into_operators(self) -> Vec<Operator> {
        match self {
            Self::Equals(v) => vec![Operator::Eq(v)],
            Self::Operators(ops) => ops,
        }
    }

    /// Combines two conditions on the same field.
    ///
    /// A bare equality becomes `$eq`. Repeating an operator key is rejected,
    /// as an operator object cannot hold the same key twice.
    fn merge(self, path: &FieldPath, other: Self) -> Result<Self> {
        let mut ops = self.into_operators();
        for op in other.into_operators() {
            if ops.iter().any(|existing| existing.key() == op.key()) {
                return Err(QueryError::invalid(format!(
                    "conflicting {} constraints on '{path}'",
                    op.key()
                )));
            }
            ops.push(op);
        }
        Ok(Self::Operators(ops))
    }
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Equals(v) => v.serialize(serializer),
            Self::Operators(ops) => {
                let mut map = serializer.serialize_map(Some(ops.len()))?;
                for op in ops {
                    map.serialize_entry(op.key(), &op.value())?;
                }
                map.end()
            }
        }
    }
}

/// Ordered AND-combination of field conditions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<(FieldPath, Condition)>,
}

impl Filter {
    /// Creates an empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter with a single operator on one field.
    #[must_use]
    pub fn with_operator(path: FieldPath, op: Operator) -> Self {
        Self {
            clauses: vec![(path, Condition::Operators(vec![op]))],
        }
    }

    /// Filter with several operators on one field.
    #[must_use]
    pub fn with_operators(path: FieldPath, ops: Vec<Operator>) -> Self {
        Self {
            clauses: vec![(path, Condition::Operators(ops))],
        }
    }

    /// Filter selecting documents where `path` equals `value`.
    #[must_use]
    pub fn equals(path: FieldPath, value: impl Into<Value>) -> Self {
        Self {
            clauses: vec![(path, Condition::Equals(value.into()))],
        }
    }

    /// AND-combines two filters.
    ///
    /// Clauses keep their order of first appearance; clauses on the same
    /// field are merged into one operator object.
    pub fn and(self, other: Self) -> Result<Self> {
        let mut clauses = self.clauses;
        for (path, condition) in other.clauses {
            match clauses.iter().position(|(p, _)| *p == path) {
                Some(idx) => {
                    let (p, existing) = clauses.remove(idx);
                    let merged = existing.merge(&p, condition)?;
                    clauses.insert(idx, (p, merged));
                }
                None => clauses.push((path, condition)),
            }
        }
        Ok(Self { clauses })
    }

    /// Returns `true` if the filter has no clauses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Number of constrained fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Condition on `path`, if any.
    #[must_use]
    pub fn condition(&self, path: &str) -> Option<&Condition> {
        self.clauses
            .iter()
            .find(|(p, _)| p.as_str() == path)
            .map(|(_, c)| c)
    }
}

impl Serialize for Filter {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.clauses.len()))?;
        for (path, condition) in &self.clauses {
            map.serialize_entry(path.as_str(), condition)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(p: &str) -> FieldPath {
        FieldPath::parse(p).unwrap()
    }

    #[test]
    fn test_single_operator_json() {
        let filter = Filter::with_operator(path("tx.h"), Operator::Exists(false));
        let json = serde_json::to_string(&filter).unwrap();
        assert_eq!(json, r#"{"tx.h":{"$exists":false}}"#);
    }

    #[test]
    fn test_and_keeps_insertion_order() {
        let filter = Filter::with_operator(path("slp.detail"), Operator::Exists(false))
            .and(Filter::equals(path("slp.valid"), true))
            .unwrap();
        let json = serde_json::to_string(&filter).unwrap();
        assert_eq!(json, r#"{"slp.detail":{"$exists":false},"slp.valid":true}"#);
    }

    #[test]
    fn test_and_merges_same_field() {
        let filter = Filter::with_operator(path("mintBatonUtxo"), Operator::Ne(json!("")))
            .and(Filter::with_operator(
                path("mintBatonUtxo"),
                Operator::Regex("^x".into()),
            ))
            .unwrap();
        assert_eq!(filter.len(), 1);
        let json = serde_json::to_string(&filter).unwrap();
        assert_eq!(json, r#"{"mintBatonUtxo":{"$ne":"","$regex":"^x"}}"#);
    }

    #[test]
    fn test_and_turns_equality_into_eq() {
        let filter = Filter::equals(path("slp.valid"), true)
            .and(Filter::with_operator(path("slp.valid"), Operator::Exists(true)))
            .unwrap();
        let json = serde_json::to_string(&filter).unwrap();
        assert_eq!(json, r#"{"slp.valid":{"$eq":true,"$exists":true}}"#);
    }

    #[test]
    fn test_and_rejects_conflicting_operator() {
        let result = Filter::with_operator(path("a"), Operator::Exists(false))
            .and(Filter::with_operator(path("a"), Operator::Exists(true)));
        assert!(matches!(result, Err(QueryError::InvalidQuery(_))));
    }

    #[test]
    fn test_not_type_json() {
        let filter = Filter::with_operator(
            path("tokenDetails.symbol"),
            Operator::NotType(BsonType::String),
        );
        let json = serde_json::to_string(&filter).unwrap();
        assert_eq!(
            json,
            r#"{"tokenDetails.symbol":{"$not":{"$type":"string"}}}"#
        );
    }

    #[test]
    fn test_bson_type_round_trip_names() {
        for t in [BsonType::String, BsonType::Bool, BsonType::Decimal, BsonType::Null] {
            assert_eq!(t.as_str().parse::<BsonType>().unwrap(), t);
        }
        assert!(matches!(
            "uuid".parse::<BsonType>(),
            Err(QueryError::UnknownType(_))
        ));
    }
}
