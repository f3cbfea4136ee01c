//! Token transaction graphs (`g`).

use slpdb_query::{pattern, Collection};

use super::{exists_all, not_null_all, Check, CheckKind, Literal};

const G: Collection = Collection::Graphs;

/// Fields every graph document carries.
///
/// The per-input fields (`graphTxn.inputs.txid` and friends) are absent when
/// `graphTxn.inputs` is empty, so only the array itself is required.
pub const REQUIRED: &[&str] = &[
    "tokenDetails",
    "tokenDetails.tokenIdHex",
    "graphTxn",
    "graphTxn.txid",
    "graphTxn.details",
    "graphTxn.details.decimals",
    "graphTxn.details.tokenIdHex",
    "graphTxn.details.timestamp",
    "graphTxn.details.transactionType",
    "graphTxn.details.versionType",
    "graphTxn.details.documentUri",
    "graphTxn.details.documentSha256Hex",
    "graphTxn.details.symbol",
    "graphTxn.details.name",
    "graphTxn.details.batonVout",
    "graphTxn.details.containsBaton",
    "graphTxn.details.genesisOrMintQuantity",
    "graphTxn.details.sendOutputs",
    "graphTxn.outputs",
    "graphTxn.outputs.slpAmount",
    "graphTxn.outputs.address",
    "graphTxn.outputs.vout",
    "graphTxn.outputs.bchSatoshis",
    "graphTxn.outputs.spendTxid",
    "graphTxn.outputs.status",
    "graphTxn.outputs.invalidReason",
    "graphTxn.inputs",
];

/// Fields that must never be null where present.
pub const NON_NULL: &[&str] = &[
    "tokenDetails",
    "tokenDetails.tokenIdHex",
    "graphTxn",
    "graphTxn.txid",
    "graphTxn.details",
    "graphTxn.details.tokenIdHex",
    "graphTxn.details.transactionType",
    "graphTxn.details.versionType",
    "graphTxn.details.containsBaton",
    "graphTxn.outputs",
    "graphTxn.outputs.slpAmount",
    "graphTxn.outputs.address",
    "graphTxn.outputs.vout",
    "graphTxn.outputs.bchSatoshis",
    "graphTxn.outputs.status",
    "graphTxn.inputs",
    "graphTxn.inputs.txid",
    "graphTxn.inputs.vout",
    "graphTxn.inputs.address",
    "graphTxn.inputs.bchSatoshis",
    "graphTxn.inputs.slpAmount",
];

/// Format checks on graph fields.
pub const FORMATS: &[Check] = &[
    Check::new(G, "graphTxn.txid", CheckKind::Pattern(pattern::TXID)),
    Check::new(G, "graphTxn.details.tokenIdHex", CheckKind::Pattern(pattern::TOKEN_ID_HEX)),
    // A missing reason is null, never an empty string.
    Check::new(G, "graphTxn.outputs.invalidReason", CheckKind::NotEqual(Literal::Str(""))),
];

/// All graph checks.
#[must_use]
pub fn checks() -> Vec<Check> {
    let mut checks = exists_all(G, REQUIRED);
    checks.extend(not_null_all(G, NON_NULL));
    checks.extend_from_slice(FORMATS);
    checks
}
