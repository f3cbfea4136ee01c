//! Tests for the named query builders.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::{json, Value};

use super::builder;
use super::collection::Collection;
use super::error::QueryError;
use super::field::FieldPath;
use super::filter::{BsonType, Filter};
use super::pattern;
use super::predicate::Predicate;

fn as_value(q: &super::query::QueryDescriptor) -> Value {
    serde_json::from_str(&q.to_json().unwrap()).unwrap()
}

fn valid_scope() -> Filter {
    Filter::equals(FieldPath::parse("slp.valid").unwrap(), true)
}

#[test]
fn test_field_missing_matches_reference_encoding() {
    let q = builder::field_missing("tokenDetails.tokenIdHex", Collection::Tokens, None).unwrap();
    let expected = json!({
        "v": 3,
        "q": {
            "db": ["t"],
            "find": { "tokenDetails.tokenIdHex": { "$exists": false } },
            "limit": 1
        }
    });

    assert_eq!(as_value(&q), expected);

    // The URL path segment decodes back to the same object.
    let url = q.request_url("http://localhost:3000/q").unwrap();
    let segment = url.rsplit_once("/q/").unwrap().1;
    let decoded: Value = serde_json::from_slice(&STANDARD.decode(segment).unwrap()).unwrap();
    assert_eq!(decoded, expected);
}

#[test]
fn test_field_missing_with_extra_match() {
    let q = builder::field_missing("slp.detail.name", Collection::Confirmed, Some(valid_scope()))
        .unwrap();
    assert_eq!(
        q.to_json().unwrap(),
        r#"{"v":3,"q":{"db":["c"],"find":{"slp.detail.name":{"$exists":false},"slp.valid":true},"limit":1}}"#
    );
}

#[test]
fn test_field_missing_rejects_empty_field() {
    let result = builder::field_missing("", Collection::Tokens, None);
    assert!(matches!(result, Err(QueryError::InvalidQuery(_))));
}

#[test]
fn test_null_value_with_scope() {
    let q = builder::null_value("slp.detail.symbol", Collection::Confirmed, Some(valid_scope()))
        .unwrap();
    assert_eq!(
        as_value(&q)["q"]["find"],
        json!({
            "slp.detail.symbol": { "$exists": true, "$eq": null },
            "slp.valid": true
        })
    );
}

#[test]
fn test_value_not_in_set_decimals() {
    let q = builder::value_not_in_set("tokenDetails.decimals", Collection::Tokens, 0..=9).unwrap();
    assert_eq!(
        as_value(&q)["q"]["find"],
        json!({ "tokenDetails.decimals": { "$nin": [0, 1, 2, 3, 4, 5, 6, 7, 8, 9] } })
    );
}

#[test]
fn test_value_not_in_set_booleans_and_null() {
    let q = builder::value_not_in_set("tokenDetails.containsBaton", Collection::Tokens, [false, true])
        .unwrap();
    assert_eq!(
        as_value(&q)["q"]["find"]["tokenDetails.containsBaton"]["$nin"],
        json!([false, true])
    );

    let q = builder::value_not_in_set("tokenDetails.sendOutputs", Collection::Tokens, [Value::Null])
        .unwrap();
    assert_eq!(
        as_value(&q)["q"]["find"]["tokenDetails.sendOutputs"]["$nin"],
        json!([null])
    );
}

#[test]
fn test_value_not_in_set_rejects_empty_set() {
    let result = builder::value_not_in_set("tokenDetails.versionType", Collection::Tokens, Vec::<i64>::new());
    assert!(matches!(result, Err(QueryError::InvalidQuery(_))));
}

#[test]
fn test_value_violates_pattern_uses_full_match_negation() {
    let q = builder::value_violates_pattern("utxo", Collection::Utxos, pattern::UTXO).unwrap();
    assert_eq!(
        as_value(&q)["q"]["find"],
        json!({ "utxo": { "$regex": "^(?!(?:[0-9a-f]{64}:[0-9]+)\\z)" } })
    );
}

#[test]
fn test_non_empty_violates_pattern() {
    let q = builder::non_empty_violates_pattern("mintBatonUtxo", Collection::Tokens, pattern::UTXO)
        .unwrap();
    assert_eq!(
        as_value(&q)["q"]["find"],
        json!({
            "mintBatonUtxo": {
                "$ne": "",
                "$regex": "^(?!(?:[0-9a-f]{64}:[0-9]+)\\z)"
            }
        })
    );
}

#[test]
fn test_count_non_empty_pattern_violations() {
    let q = builder::count_non_empty_pattern_violations(
        "tokenDetails.documentSha256Hex",
        Collection::Tokens,
        pattern::SHA256_HEX,
    )
    .unwrap();

    assert_eq!(q.count_field(), Some("tokenDetails_documentSha256Hex"));
    assert_eq!(
        as_value(&q)["q"]["aggregate"],
        json!([
            { "$match": { "tokenDetails.documentSha256Hex": { "$ne": "" } } },
            { "$match": { "tokenDetails.documentSha256Hex": { "$regex": "^(?!(?:[0-9a-f]{64})\\z)" } } },
            { "$count": "tokenDetails_documentSha256Hex" }
        ])
    );
}

#[test]
fn test_value_not_of_type() {
    let q = builder::value_not_of_type("tokenDetails.name", Collection::Tokens, BsonType::String)
        .unwrap();
    assert_eq!(
        as_value(&q)["q"]["find"],
        json!({ "tokenDetails.name": { "$not": { "$type": "string" } } })
    );
}

#[test]
fn test_exact_value_empty_string() {
    let q = builder::exact_value("graphTxn.outputs.invalidReason", Collection::Graphs, "").unwrap();
    assert_eq!(
        q.to_json().unwrap(),
        r#"{"v":3,"q":{"db":["g"],"find":{"graphTxn.outputs.invalidReason":""},"limit":1}}"#
    );
}

#[test]
fn test_below_minimum() {
    let q = builder::below_minimum("satoshis_balance", Collection::Addresses, 546).unwrap();
    assert_eq!(
        as_value(&q)["q"]["find"],
        json!({ "satoshis_balance": { "$lt": 546 } })
    );
}

#[test]
fn test_find_with_scope_on_pattern() {
    let q = builder::find(
        "slp.detail.tokenIdHex",
        Collection::Confirmed,
        &Predicate::ViolatesPattern(pattern::TOKEN_ID_HEX.to_string()),
        Some(valid_scope()),
    )
    .unwrap();
    let find = &as_value(&q)["q"]["find"];
    assert_eq!(find["slp.valid"], json!(true));
    assert_eq!(
        find["slp.detail.tokenIdHex"]["$regex"],
        json!("^(?!(?:[0-9a-f]{64})\\z)")
    );
}

#[test]
fn test_scope_conflict_is_invalid() {
    let scope = Filter::with_operator(
        FieldPath::parse("slp.valid").unwrap(),
        super::filter::Operator::Exists(false),
    );
    let result = builder::field_missing("slp.valid", Collection::Confirmed, Some(scope));
    assert!(matches!(result, Err(QueryError::InvalidQuery(_))));
}

#[test]
fn test_building_twice_is_byte_identical() {
    let build = || {
        builder::field_missing("graphTxn.details.symbol", Collection::Graphs, None)
            .unwrap()
            .encode()
            .unwrap()
    };
    assert_eq!(build(), build());
}

#[test]
fn test_request_url_keeps_slashes_inside_payload() {
    let q = builder::count_non_empty_pattern_violations(
        "mintBatonUtxo",
        Collection::Tokens,
        pattern::UTXO,
    )
    .unwrap();
    let encoded = q.encode().unwrap();
    assert!(encoded.contains('/'), "{encoded}");

    let url = q.request_url("https://slpserve.example/q/").unwrap();
    let payload = url.strip_prefix("https://slpserve.example/q/").unwrap();
    assert_eq!(payload, encoded);

    let decoded: Value = serde_json::from_slice(&STANDARD.decode(payload).unwrap()).unwrap();
    assert_eq!(decoded, as_value(&q));
}
