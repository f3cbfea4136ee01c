//! Unspent token outputs (`x`).

use slpdb_query::{pattern, Collection};

use super::{exists_all, Check, CheckKind};

const X: Collection = Collection::Utxos;

/// Fields every UTXO document carries.
pub const REQUIRED: &[&str] = &[
    "tokenDetails",
    "tokenDetails.tokenIdHex",
    "utxo",
    "txid",
    "vout",
    "address",
    "bchSatoshis",
    "slpAmount",
];

/// Format checks on UTXO fields.
pub const FORMATS: &[Check] = &[
    Check::new(X, "tokenDetails.tokenIdHex", CheckKind::Pattern(pattern::TOKEN_ID_HEX)),
    Check::new(X, "utxo", CheckKind::Pattern(pattern::UTXO)),
];

/// All UTXO checks.
#[must_use]
pub fn checks() -> Vec<Check> {
    let mut checks = exists_all(X, REQUIRED);
    checks.extend_from_slice(FORMATS);
    checks
}
