//! The five SLPDB collections and their single-letter tags.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::QueryError;

/// An SLPDB collection, serialized as its tag (`"t"`, `"c"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Collection {
    /// Token genesis documents.
    #[serde(rename = "t")]
    Tokens,
    /// Confirmed transactions.
    #[serde(rename = "c")]
    Confirmed,
    /// Token transaction graphs.
    #[serde(rename = "g")]
    Graphs,
    /// Per-address token balances.
    #[serde(rename = "a")]
    Addresses,
    /// Unspent token outputs.
    #[serde(rename = "x")]
    Utxos,
}

impl Collection {
    /// Every collection, in audit order.
    pub const ALL: [Collection; 5] = [
        Self::Tokens,
        Self::Confirmed,
        Self::Graphs,
        Self::Addresses,
        Self::Utxos,
    ];

    /// Single-letter tag used in `db` and as the response key.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Tokens => "t",
            Self::Confirmed => "c",
            Self::Graphs => "g",
            Self::Addresses => "a",
            Self::Utxos => "x",
        }
    }

    /// Long, human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Tokens => "tokens",
            Self::Confirmed => "confirmed",
            Self::Graphs => "graphs",
            Self::Addresses => "addresses",
            Self::Utxos => "utxos",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Collection {
    type Err = QueryError;

    /// Accepts either the tag or the long name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.tag() == wanted || c.name() == wanted)
            .ok_or_else(|| QueryError::UnknownCollection(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_are_unique() {
        let mut tags: Vec<_> = Collection::ALL.iter().map(|c| c.tag()).collect();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), 5);
    }

    #[test]
    fn test_parse_tag_and_name() {
        assert_eq!("t".parse::<Collection>().unwrap(), Collection::Tokens);
        assert_eq!("Confirmed".parse::<Collection>().unwrap(), Collection::Confirmed);
        assert_eq!(" x ".parse::<Collection>().unwrap(), Collection::Utxos);
        assert!(matches!(
            "q".parse::<Collection>(),
            Err(QueryError::UnknownCollection(_))
        ));
    }

    #[test]
    fn test_serializes_as_tag() {
        let json = serde_json::to_string(&[Collection::Graphs]).unwrap();
        assert_eq!(json, r#"["g"]"#);

        let back: Collection = serde_json::from_str(r#""a""#).unwrap();
        assert_eq!(back, Collection::Addresses);
    }
}
