//! Per-address token balances (`a`).

use slpdb_query::{pattern, Collection};

use super::{exists_all, Check, CheckKind};

const A: Collection = Collection::Addresses;

/// Smallest non-dust output value, in satoshis.
pub const DUST_LIMIT: i64 = 546;

/// Fields every address document carries.
pub const REQUIRED: &[&str] = &[
    "tokenDetails",
    "tokenDetails.tokenIdHex",
    "address",
    "satoshis_balance",
    "token_balance",
];

/// Format checks on address fields.
pub const FORMATS: &[Check] = &[
    Check::new(A, "tokenDetails.tokenIdHex", CheckKind::Pattern(pattern::TOKEN_ID_HEX)),
    Check::new(A, "satoshis_balance", CheckKind::Minimum(DUST_LIMIT)),
];

/// All address checks.
#[must_use]
pub fn checks() -> Vec<Check> {
    let mut checks = exists_all(A, REQUIRED);
    checks.extend_from_slice(FORMATS);
    checks
}
