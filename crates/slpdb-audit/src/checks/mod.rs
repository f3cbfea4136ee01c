//! Static audit tables: which invariants hold for which collection fields.
//!
//! The tables are data; [`Check::query`] is the only place a check is
//! turned into a query descriptor.

pub mod addresses;
pub mod confirmed;
pub mod graphs;
pub mod tokens;
pub mod utxos;

use serde::Serialize;
use serde_json::Value;

use slpdb_query::{builder, BsonType, Collection, FieldPath, Filter, Predicate, QueryDescriptor};

use crate::error::Result;

/// A literal usable in `const` tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Literal {
    /// Integer.
    Int(i64),
    /// Boolean.
    Bool(bool),
    /// String.
    Str(&'static str),
    /// `null`.
    Null,
}

impl From<Literal> for Value {
    fn from(lit: Literal) -> Self {
        match lit {
            Literal::Int(i) => Value::from(i),
            Literal::Bool(b) => Value::Bool(b),
            Literal::Str(s) => Value::String(s.to_string()),
            Literal::Null => Value::Null,
        }
    }
}

/// Which documents a check applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scope {
    /// Every document in the collection.
    All,
    /// Only confirmed transactions with `slp.valid == true`.
    ValidSlp,
}

impl Scope {
    fn filter(self) -> Result<Option<Filter>> {
        match self {
            Self::All => Ok(None),
            Self::ValidSlp => Ok(Some(Filter::equals(FieldPath::parse("slp.valid")?, true))),
        }
    }
}

/// The invariant a check asserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "arg", rename_all = "kebab-case")]
pub enum CheckKind {
    /// Field is present.
    Exists,
    /// Field is not `null` where present.
    NotNull,
    /// Field fully matches the pattern.
    Pattern(&'static str),
    /// Field is empty or fully matches the pattern.
    OptionalPattern(&'static str),
    /// Field holds one of the listed values.
    OneOf(&'static [Literal]),
    /// Field is a string.
    StringType,
    /// Field is at least the given value.
    Minimum(i64),
    /// Field never equals the given value.
    NotEqual(Literal),
}

impl CheckKind {
    /// Short kebab-case name, part of the check id.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Exists => "exists",
            Self::NotNull => "not-null",
            Self::Pattern(_) => "pattern",
            Self::OptionalPattern(_) => "optional-pattern",
            Self::OneOf(_) => "one-of",
            Self::StringType => "string",
            Self::Minimum(_) => "minimum",
            Self::NotEqual(_) => "not-equal",
        }
    }
}

/// One audit assertion: no document in `collection` violates `kind` on `field`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Check {
    /// Audited collection.
    pub collection: Collection,
    /// Dotted field path.
    pub field: &'static str,
    /// Asserted invariant.
    #[serde(flatten)]
    pub kind: CheckKind,
    /// Documents the invariant applies to.
    pub scope: Scope,
}

impl Check {
    /// A check over every document of the collection.
    #[must_use]
    pub const fn new(collection: Collection, field: &'static str, kind: CheckKind) -> Self {
        Self {
            collection,
            field,
            kind,
            scope: Scope::All,
        }
    }

    /// Restricts the check to confirmed transactions marked valid.
    #[must_use]
    pub const fn where_valid(mut self) -> Self {
        self.scope = Scope::ValidSlp;
        self
    }

    /// Stable identifier, e.g. `t:exists:tokenDetails.tokenIdHex`.
    #[must_use]
    pub fn id(&self) -> String {
        let scope = match self.scope {
            Scope::All => "",
            Scope::ValidSlp => "@valid",
        };
        format!(
            "{}:{}{}:{}",
            self.collection.tag(),
            self.kind.name(),
            scope,
            self.field
        )
    }

    /// Human-readable statement of the invariant.
    #[must_use]
    pub fn description(&self) -> String {
        let subject = match self.scope {
            Scope::All => format!("{} documents", self.collection),
            Scope::ValidSlp => format!("valid {} documents", self.collection),
        };
        let field = self.field;
        match self.kind {
            CheckKind::Exists => format!("no {subject} without a {field} property"),
            CheckKind::NotNull => format!("no {subject} with a null {field} property"),
            CheckKind::Pattern(p) => format!("{field} on {subject} must match {p}"),
            CheckKind::OptionalPattern(p) => {
                format!("{field} on {subject} must be empty or match {p}")
            }
            CheckKind::OneOf(values) => {
                let allowed: Vec<String> = values
                    .iter()
                    .map(|v| Value::from(*v).to_string())
                    .collect();
                format!("{field} on {subject} must be one of [{}]", allowed.join(", "))
            }
            CheckKind::StringType => format!("{field} on {subject} must be a string"),
            CheckKind::Minimum(min) => format!("{field} on {subject} must be at least {min}"),
            CheckKind::NotEqual(lit) => {
                format!("{field} on {subject} must not be {}", Value::from(lit))
            }
        }
    }

    /// Builds the descriptor selecting violating documents.
    pub fn query(&self, limit: u32) -> Result<QueryDescriptor> {
        let scope = self.scope.filter()?;
        let (field, db) = (self.field, self.collection);

        let query = match self.kind {
            CheckKind::Exists => builder::field_missing(field, db, scope)?,
            CheckKind::NotNull => builder::null_value(field, db, scope)?,
            CheckKind::Pattern(p) => {
                builder::find(field, db, &Predicate::ViolatesPattern(p.to_string()), scope)?
            }
            CheckKind::OptionalPattern(p) if scope.is_none() => {
                builder::count_non_empty_pattern_violations(field, db, p)?
            }
            CheckKind::OptionalPattern(p) => builder::find(
                field,
                db,
                &Predicate::NonEmptyViolatesPattern(p.to_string()),
                scope,
            )?,
            CheckKind::OneOf(values) => builder::find(
                field,
                db,
                &Predicate::ValueNotInSet(values.iter().copied().map(Value::from).collect()),
                scope,
            )?,
            CheckKind::StringType => {
                builder::find(field, db, &Predicate::NotOfType(BsonType::String), scope)?
            }
            CheckKind::Minimum(min) => {
                builder::find(field, db, &Predicate::BelowMinimum(Value::from(min)), scope)?
            }
            CheckKind::NotEqual(lit) => {
                builder::find(field, db, &Predicate::ExactValue(Value::from(lit)), scope)?
            }
        };

        Ok(query.with_limit(limit)?)
    }
}

/// Presence checks for every field in `fields`.
pub(crate) fn exists_all(collection: Collection, fields: &[&'static str]) -> Vec<Check> {
    fields
        .iter()
        .map(|&f| Check::new(collection, f, CheckKind::Exists))
        .collect()
}

/// Not-null checks for every field in `fields`.
pub(crate) fn not_null_all(collection: Collection, fields: &[&'static str]) -> Vec<Check> {
    fields
        .iter()
        .map(|&f| Check::new(collection, f, CheckKind::NotNull))
        .collect()
}

/// Checks for one collection.
#[must_use]
pub fn for_collection(collection: Collection) -> Vec<Check> {
    match collection {
        Collection::Tokens => tokens::checks(),
        Collection::Confirmed => confirmed::checks(),
        Collection::Graphs => graphs::checks(),
        Collection::Addresses => addresses::checks(),
        Collection::Utxos => utxos::checks(),
    }
}

/// Every check, in audit order.
#[must_use]
pub fn all() -> Vec<Check> {
    Collection::ALL
        .into_iter()
        .flat_map(for_collection)
        .collect()
}

/// Looks a check up by its [`Check::id`].
#[must_use]
pub fn find(id: &str) -> Option<Check> {
    all().into_iter().find(|c| c.id() == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    fn find_filter(check: &Check) -> Value {
        let q = check.query(1).unwrap();
        let v: Value = serde_json::from_str(&q.to_json().unwrap()).unwrap();
        v["q"]["find"].clone()
    }

    #[test]
    fn test_ids_are_unique() {
        let checks = all();
        let ids: HashSet<String> = checks.iter().map(Check::id).collect();
        assert_eq!(ids.len(), checks.len());
    }

    #[test]
    fn test_every_check_builds_a_query() {
        for check in all() {
            let q = check
                .query(1)
                .unwrap_or_else(|e| panic!("{} failed to build: {e}", check.id()));
            assert_eq!(q.collection(), check.collection, "{}", check.id());
        }
    }

    #[test]
    fn test_every_collection_has_checks() {
        for c in Collection::ALL {
            assert!(!for_collection(c).is_empty(), "{c} has no checks");
        }
    }

    #[test]
    fn test_id_format_and_lookup() {
        let check = Check::new(Collection::Tokens, "tokenDetails.tokenIdHex", CheckKind::Exists);
        assert_eq!(check.id(), "t:exists:tokenDetails.tokenIdHex");
        assert_eq!(find("t:exists:tokenDetails.tokenIdHex"), Some(check));
        assert!(find("t:exists:nope").is_none());

        let scoped = Check::new(Collection::Confirmed, "slp.detail", CheckKind::Exists).where_valid();
        assert_eq!(scoped.id(), "c:exists@valid:slp.detail");
    }

    #[test]
    fn test_scoped_exists_query() {
        let check = Check::new(Collection::Confirmed, "slp.detail.name", CheckKind::Exists).where_valid();
        assert_eq!(
            find_filter(&check),
            json!({"slp.detail.name": {"$exists": false}, "slp.valid": true})
        );
    }

    #[test]
    fn test_optional_pattern_uses_count_aggregation() {
        let check = Check::new(
            Collection::Tokens,
            "mintBatonUtxo",
            CheckKind::OptionalPattern(slpdb_query::pattern::UTXO),
        );
        let q = check.query(1).unwrap();
        assert_eq!(q.count_field(), Some("mintBatonUtxo"));
    }

    #[test]
    fn test_one_of_query() {
        const ALLOWED: &[Literal] = &[Literal::Bool(false), Literal::Bool(true)];
        let check = Check::new(Collection::Tokens, "tokenDetails.containsBaton", CheckKind::OneOf(ALLOWED));
        assert_eq!(
            find_filter(&check),
            json!({"tokenDetails.containsBaton": {"$nin": [false, true]}})
        );
        assert_eq!(
            check.description(),
            "tokenDetails.containsBaton on tokens documents must be one of [false, true]"
        );
    }

    #[test]
    fn test_limit_is_applied() {
        let check = Check::new(Collection::Utxos, "utxo", CheckKind::Exists);
        assert_eq!(check.query(10).unwrap().limit(), 10);
        assert!(check.query(0).is_err());
    }

    #[test]
    fn test_check_serializes_for_listing() {
        let check = Check::new(Collection::Addresses, "satoshis_balance", CheckKind::Minimum(546));
        let value = serde_json::to_value(check).unwrap();
        assert_eq!(
            value,
            json!({
                "collection": "a",
                "field": "satoshis_balance",
                "kind": "minimum",
                "arg": 546,
                "scope": "all"
            })
        );
    }
}
