//! Named builders for the audit query shapes.
//!
//! Every builder returns a descriptor selecting the documents that violate
//! one invariant. An empty result certifies the invariant for the whole
//! collection; `limit` only caps how many offenders come back.

use serde_json::Value;

use crate::collection::Collection;
use crate::error::Result;
use crate::field::FieldPath;
use crate::filter::{BsonType, Filter, Operator};
use crate::predicate::Predicate;
use crate::query::{QueryDescriptor, Stage};

/// Builds a `find` descriptor for `predicate` on `field`, AND-ed with `scope`.
pub fn find(
    field: &str,
    collection: Collection,
    predicate: &Predicate,
    scope: Option<Filter>,
) -> Result<QueryDescriptor> {
    let path = FieldPath::parse(field)?;
    let mut filter = predicate.on(path)?;
    if let Some(scope) = scope {
        filter = filter.and(scope)?;
    }
    QueryDescriptor::builder(collection).find(filter).build()
}

/// Documents where `field` does not exist, optionally restricted by `extra_match`.
///
/// ```
/// use slpdb_query::{builder, Collection};
///
/// let q = builder::field_missing("tokenDetails.tokenIdHex", Collection::Tokens, None).unwrap();
/// assert_eq!(
///     q.to_json().unwrap(),
///     r#"{"v":3,"q":{"db":["t"],"find":{"tokenDetails.tokenIdHex":{"$exists":false}},"limit":1}}"#
/// );
/// ```
pub fn field_missing(
    field: &str,
    collection: Collection,
    extra_match: Option<Filter>,
) -> Result<QueryDescriptor> {
    find(field, collection, &Predicate::FieldMissing, extra_match)
}

/// Documents where `field` exists but is `null`.
pub fn null_value(
    field: &str,
    collection: Collection,
    extra_match: Option<Filter>,
) -> Result<QueryDescriptor> {
    find(field, collection, &Predicate::NullValue, extra_match)
}

/// Documents whose `field` is not one of `allowed`.
pub fn value_not_in_set<I>(
    field: &str,
    collection: Collection,
    allowed: I,
) -> Result<QueryDescriptor>
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    let allowed = allowed.into_iter().map(Into::into).collect();
    find(field, collection, &Predicate::ValueNotInSet(allowed), None)
}

/// Documents whose `field` is not a full match of `pattern`.
pub fn value_violates_pattern(
    field: &str,
    collection: Collection,
    pattern: &str,
) -> Result<QueryDescriptor> {
    find(
        field,
        collection,
        &Predicate::ViolatesPattern(pattern.to_string()),
        None,
    )
}

/// Documents whose `field` is non-empty and not a full match of `pattern`.
pub fn non_empty_violates_pattern(
    field: &str,
    collection: Collection,
    pattern: &str,
) -> Result<QueryDescriptor> {
    find(
        field,
        collection,
        &Predicate::NonEmptyViolatesPattern(pattern.to_string()),
        None,
    )
}

/// Counting form of [`non_empty_violates_pattern`].
///
/// Two `$match` stages followed by `$count`; the service answers with one
/// `{ <counter>: n }` row, or no rows when nothing matches.
pub fn count_non_empty_pattern_violations(
    field: &str,
    collection: Collection,
    pattern: &str,
) -> Result<QueryDescriptor> {
    let path = FieldPath::parse(field)?;
    let non_empty = Filter::with_operator(
        path.clone(),
        Operator::Ne(Value::String(String::new())),
    );
    let regex_stage = Predicate::ViolatesPattern(pattern.to_string()).on(path.clone())?;

    QueryDescriptor::builder(collection)
        .aggregate(vec![
            Stage::Match(non_empty),
            Stage::Match(regex_stage),
            Stage::Count(path.counter_name()),
        ])
        .build()
}

/// Documents whose `field` fails the `$type` check for `type_name`.
pub fn value_not_of_type(
    field: &str,
    collection: Collection,
    type_name: BsonType,
) -> Result<QueryDescriptor> {
    find(field, collection, &Predicate::NotOfType(type_name), None)
}

/// Documents whose `field` equals a forbidden literal.
pub fn exact_value(
    field: &str,
    collection: Collection,
    disallowed: impl Into<Value>,
) -> Result<QueryDescriptor> {
    find(
        field,
        collection,
        &Predicate::ExactValue(disallowed.into()),
        None,
    )
}

/// Documents whose numeric `field` is below `minimum`.
pub fn below_minimum(
    field: &str,
    collection: Collection,
    minimum: impl Into<Value>,
) -> Result<QueryDescriptor> {
    find(
        field,
        collection,
        &Predicate::BelowMinimum(minimum.into()),
        None,
    )
}
