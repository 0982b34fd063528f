//! Log cursor — tracks where the next `waitforlogs` round starts.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A block position as understood by `waitforlogs`: a height, or the
/// `"latest"` sentinel meaning "the tip when the call arrives".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockPosition {
    #[default]
    Latest,
    Number(u64),
}

impl BlockPosition {
    pub fn number(&self) -> Option<u64> {
        match self {
            Self::Latest => None,
            Self::Number(n) => Some(*n),
        }
    }
}

impl fmt::Display for BlockPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => write!(f, "latest"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<u64> for BlockPosition {
    fn from(n: u64) -> Self {
        Self::Number(n)
    }
}

impl Serialize for BlockPosition {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Latest => s.serialize_str("latest"),
            Self::Number(n) => s.serialize_u64(*n),
        }
    }
}

impl<'de> Deserialize<'de> for BlockPosition {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(u64),
            Text(String),
        }

        match Repr::deserialize(d)? {
            Repr::Number(n) => Ok(Self::Number(n)),
            Repr::Text(s) if s == "latest" => Ok(Self::Latest),
            Repr::Text(s) => s
                .parse::<u64>()
                .map(Self::Number)
                .map_err(|_| serde::de::Error::custom(format!("invalid block position '{s}'"))),
        }
    }
}

/// The poll loop's position in the chain.
///
/// Starts at the caller's `from` (or `latest`) and only moves forward: once
/// a concrete height has been observed, a lower `nextblock` from the node
/// is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogCursor {
    next: BlockPosition,
}

impl LogCursor {
    pub fn new(start: BlockPosition) -> Self {
        Self { next: start }
    }

    /// Where the next round starts.
    pub fn position(&self) -> BlockPosition {
        self.next
    }

    /// Move to the node-reported `nextblock`. Returns `false` (and keeps the
    /// current position) if that would move backwards.
    pub fn advance(&mut self, nextblock: u64) -> bool {
        match self.next {
            BlockPosition::Number(current) if nextblock < current => false,
            _ => {
                self.next = BlockPosition::Number(nextblock);
                true
            }
        }
    }
}
