//! Violation predicates over a single field.
//!
//! Each variant selects the documents that BREAK an invariant, so a
//! query built from it should return nothing on a healthy database.

use serde_json::Value;

use crate::error::{QueryError, Result};
use crate::field::FieldPath;
use crate::filter::{BsonType, Filter, Operator};
use crate::pattern;

/// Tagged violation predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Field does not exist.
    FieldMissing,
    /// Field exists but holds `null`.
    NullValue,
    /// Field value is outside the allowed set.
    ValueNotInSet(Vec<Value>),
    /// Field value is not a full match of the pattern.
    ViolatesPattern(String),
    /// Field value is non-empty and not a full match of the pattern.
    NonEmptyViolatesPattern(String),
    /// Field value fails a `$type` check.
    NotOfType(BsonType),
    /// Field value equals a forbidden literal.
    ExactValue(Value),
    /// Field value is below an inclusive lower bound.
    BelowMinimum(Value),
}

impl Predicate {
    /// Short name of the predicate kind, used in logs and reports.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::FieldMissing => "field-missing",
            Self::NullValue => "null-value",
            Self::ValueNotInSet(_) => "value-not-in-set",
            Self::ViolatesPattern(_) => "violates-pattern",
            Self::NonEmptyViolatesPattern(_) => "non-empty-violates-pattern",
            Self::NotOfType(_) => "not-of-type",
            Self::ExactValue(_) => "exact-value",
            Self::BelowMinimum(_) => "below-minimum",
        }
    }

    /// Renders the predicate as a filter on `path`.
    pub fn on(&self, path: FieldPath) -> Result<Filter> {
        let filter = match self {
            Self::FieldMissing => Filter::with_operator(path, Operator::Exists(false)),
            Self::NullValue => Filter::with_operators(
                path,
                vec![Operator::Exists(true), Operator::Eq(Value::Null)],
            ),
            Self::ValueNotInSet(allowed) => {
                if allowed.is_empty() {
                    return Err(QueryError::invalid(format!(
                        "allowed set for '{path}' is empty"
                    )));
                }
                Filter::with_operator(path, Operator::Nin(allowed.clone()))
            }
            Self::ViolatesPattern(p) => {
                let regex = negated(&path, p)?;
                Filter::with_operator(path, Operator::Regex(regex))
            }
            Self::NonEmptyViolatesPattern(p) => {
                let regex = negated(&path, p)?;
                Filter::with_operators(
                    path,
                    vec![
                        Operator::Ne(Value::String(String::new())),
                        Operator::Regex(regex),
                    ],
                )
            }
            Self::NotOfType(t) => Filter::with_operator(path, Operator::NotType(*t)),
            Self::ExactValue(v) => Filter::equals(path, v.clone()),
            Self::BelowMinimum(bound) => {
                if !bound.is_number() {
                    return Err(QueryError::invalid(format!(
                        "minimum for '{path}' must be a number, got {bound}"
                    )));
                }
                Filter::with_operator(path, Operator::Lt(bound.clone()))
            }
        };
        Ok(filter)
    }
}

fn negated(path: &FieldPath, p: &str) -> Result<String> {
    if p.is_empty() {
        return Err(QueryError::invalid(format!(
            "pattern for '{path}' is empty"
        )));
    }
    Ok(pattern::negate(p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(predicate: &Predicate, field: &str) -> Value {
        let filter = predicate.on(FieldPath::parse(field).unwrap()).unwrap();
        serde_json::to_value(filter).unwrap()
    }

    #[test]
    fn test_null_value_filter() {
        assert_eq!(
            render(&Predicate::NullValue, "blk.h"),
            json!({"blk.h": {"$exists": true, "$eq": null}})
        );
    }

    #[test]
    fn test_below_minimum_filter() {
        assert_eq!(
            render(&Predicate::BelowMinimum(json!(546)), "satoshis_balance"),
            json!({"satoshis_balance": {"$lt": 546}})
        );
    }

    #[test]
    fn test_below_minimum_rejects_non_number() {
        let path = FieldPath::parse("vout").unwrap();
        let result = Predicate::BelowMinimum(json!("0")).on(path);
        assert!(matches!(result, Err(QueryError::InvalidQuery(_))));
    }

    #[test]
    fn test_violates_pattern_filter() {
        assert_eq!(
            render(&Predicate::ViolatesPattern(pattern::TXID.to_string()), "tx.h"),
            json!({"tx.h": {"$regex": "^(?!(?:[0-9a-f]{64})\\z)"}})
        );
    }

    #[test]
    fn test_empty_pattern_rejected() {
        let path = FieldPath::parse("utxo").unwrap();
        let result = Predicate::ViolatesPattern(String::new()).on(path);
        assert!(matches!(result, Err(QueryError::InvalidQuery(_))));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Predicate::FieldMissing.kind(), "field-missing");
        assert_eq!(Predicate::NotOfType(BsonType::String).kind(), "not-of-type");
    }
}
