//! Format patterns shared by the audit checks, and the negation used to
//! select values that fail them.

/// 32-byte token id, lowercase hex.
pub const TOKEN_ID_HEX: &str = "[0-9a-f]{64}";

/// Transaction id, lowercase hex.
pub const TXID: &str = "[0-9a-f]{64}";

/// Outpoint reference `txid:vout`.
pub const UTXO: &str = "[0-9a-f]{64}:[0-9]+";

/// SHA-256 digest, lowercase hex.
pub const SHA256_HEX: &str = "[0-9a-f]{64}";

/// Returns a regex matching every string that is NOT a full match of `pattern`.
///
/// The service evaluates `$regex` with PCRE, so a negative lookahead anchored
/// at both ends is available. The end anchor is `\z` since PCRE's `$` also
/// matches before a trailing newline. The result is deterministic for a given
/// input.
///
/// ```
/// use slpdb_query::pattern::negate;
///
/// assert_eq!(negate("GENESIS"), r"^(?!(?:GENESIS)\z)");
/// ```
#[must_use]
pub fn negate(pattern: &str) -> String {
    format!("^(?!(?:{pattern})\\z)")
}
