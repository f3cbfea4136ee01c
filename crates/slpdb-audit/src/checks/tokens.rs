//! Token genesis documents (`t`).

use slpdb_query::{pattern, Collection};

use super::{exists_all, Check, CheckKind, Literal};

const T: Collection = Collection::Tokens;

/// Fields every token document carries.
pub const REQUIRED: &[&str] = &[
    "schema_version",
    "lastUpdatedBlock",
    "mintBatonUtxo",
    "tokenDetails",
    "tokenDetails.decimals",
    "tokenDetails.tokenIdHex",
    "tokenDetails.timestamp",
    "tokenDetails.transactionType",
    "tokenDetails.versionType",
    "tokenDetails.documentUri",
    "tokenDetails.documentSha256Hex",
    "tokenDetails.symbol",
    "tokenDetails.name",
    "tokenDetails.batonVout",
    "tokenDetails.containsBaton",
    "tokenDetails.genesisOrMintQuantity",
    "tokenDetails.sendOutputs",
    "tokenStats",
    "tokenStats.block_created",
    "tokenStats.block_last_active_send",
    "tokenStats.block_last_active_mint",
    "tokenStats.qty_valid_txns_since_genesis",
    "tokenStats.qty_valid_token_utxos",
    "tokenStats.qty_valid_token_addresses",
    "tokenStats.qty_token_minted",
    "tokenStats.qty_token_burned",
    "tokenStats.qty_token_circulating_supply",
    "tokenStats.qty_satoshis_locked_up",
    "tokenStats.minting_baton_status",
];

const DECIMALS: &[Literal] = &[
    Literal::Int(0),
    Literal::Int(1),
    Literal::Int(2),
    Literal::Int(3),
    Literal::Int(4),
    Literal::Int(5),
    Literal::Int(6),
    Literal::Int(7),
    Literal::Int(8),
    Literal::Int(9),
];

const VERSION_TYPES: &[Literal] = &[Literal::Int(1)];
const BOOLEANS: &[Literal] = &[Literal::Bool(false), Literal::Bool(true)];
// Genesis documents never carry send outputs.
const NO_OUTPUTS: &[Literal] = &[Literal::Null];

/// Format checks on token fields.
pub const FORMATS: &[Check] = &[
    Check::new(T, "mintBatonUtxo", CheckKind::OptionalPattern(pattern::UTXO)),
    Check::new(T, "tokenDetails.decimals", CheckKind::OneOf(DECIMALS)),
    Check::new(T, "tokenDetails.tokenIdHex", CheckKind::Pattern(pattern::TOKEN_ID_HEX)),
    Check::new(T, "tokenDetails.transactionType", CheckKind::Pattern("GENESIS")),
    Check::new(T, "tokenDetails.versionType", CheckKind::OneOf(VERSION_TYPES)),
    Check::new(T, "tokenDetails.batonVout", CheckKind::Minimum(0)),
    Check::new(T, "tokenDetails.documentUri", CheckKind::StringType),
    Check::new(T, "tokenDetails.symbol", CheckKind::StringType),
    Check::new(T, "tokenDetails.name", CheckKind::StringType),
    Check::new(
        T,
        "tokenDetails.documentSha256Hex",
        CheckKind::OptionalPattern(pattern::SHA256_HEX),
    ),
    Check::new(T, "tokenDetails.containsBaton", CheckKind::OneOf(BOOLEANS)),
    Check::new(T, "tokenDetails.genesisOrMintQuantity", CheckKind::Minimum(0)),
    Check::new(T, "tokenDetails.sendOutputs", CheckKind::OneOf(NO_OUTPUTS)),
];

/// All token checks.
#[must_use]
pub fn checks() -> Vec<Check> {
    let mut checks = exists_all(T, REQUIRED);
    checks.extend_from_slice(FORMATS);
    checks
}
