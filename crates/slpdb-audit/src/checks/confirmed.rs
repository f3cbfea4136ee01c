//! Confirmed transactions (`c`).
//!
//! Raw transaction fields are checked on every document; the `slp.detail`
//! subtree only exists once a transaction is marked valid, so those checks
//! are scoped to `slp.valid == true`.

use slpdb_query::{pattern, Collection};

use super::{exists_all, not_null_all, Check, CheckKind};

const C: Collection = Collection::Confirmed;

/// Fields every confirmed transaction carries, never null.
pub const REQUIRED: &[&str] = &[
    "tx",
    "tx.h",
    "in",
    "in.i",
    "in.str",
    "in.e",
    "in.e.h",
    "in.e.i",
    "in.e.a",
    "out",
    "out.i",
    "out.str",
    "out.e",
    "out.e.v",
    "out.e.i",
    "slp",
    "slp.valid",
    "blk",
    "blk.h",
    "blk.i",
    "blk.t",
];

/// Fields present on valid SLP transactions.
pub const REQUIRED_WHEN_VALID: &[&str] = &[
    "slp.detail",
    "slp.detail.decimals",
    "slp.detail.tokenIdHex",
    "slp.detail.transactionType",
    "slp.detail.versionType",
    "slp.detail.documentUri",
    "slp.detail.documentSha256Hex",
    "slp.detail.symbol",
    "slp.detail.name",
    "slp.detail.txnBatonVout",
    "slp.detail.txnContainsBaton",
    "slp.detail.outputs",
    "slp.detail.outputs.address",
    "slp.detail.outputs.amount",
    "slp.invalidReason",
    "slp.schema_version",
];

/// Fields that must be non-null on valid SLP transactions.
///
/// `txnBatonVout` and `invalidReason` are legitimately null on valid
/// transactions and are left out.
pub const NON_NULL_WHEN_VALID: &[&str] = &[
    "slp.detail",
    "slp.detail.decimals",
    "slp.detail.tokenIdHex",
    "slp.detail.transactionType",
    "slp.detail.versionType",
    "slp.detail.documentUri",
    "slp.detail.documentSha256Hex",
    "slp.detail.symbol",
    "slp.detail.name",
    "slp.detail.txnContainsBaton",
    "slp.detail.outputs",
    "slp.detail.outputs.address",
    "slp.detail.outputs.amount",
    "slp.schema_version",
];

/// Format checks on confirmed transaction fields.
pub const FORMATS: &[Check] = &[
    Check::new(C, "tx.h", CheckKind::Pattern(pattern::TXID)),
    Check::new(C, "slp.detail.tokenIdHex", CheckKind::Pattern(pattern::TOKEN_ID_HEX)).where_valid(),
];

/// All confirmed-transaction checks.
#[must_use]
pub fn checks() -> Vec<Check> {
    let mut checks = exists_all(C, REQUIRED);
    checks.extend(not_null_all(C, REQUIRED));
    checks.extend(
        exists_all(C, REQUIRED_WHEN_VALID)
            .into_iter()
            .map(Check::where_valid),
    );
    checks.extend(
        not_null_all(C, NON_NULL_WHEN_VALID)
            .into_iter()
            .map(Check::where_valid),
    );
    checks.extend_from_slice(FORMATS);
    checks
}
