//! Domain primitives: Pubkey, Symbol, RawSide, Direction.

use serde::{Deserialize, Serialize};
use std::fmt;

pub use solana_sdk::pubkey::{ParsePubkeyError, Pubkey};

/// Asset symbol (e.g., "SOL", "BTC").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Symbol(pub String);

impl Symbol {
    pub fn new(symbol: impl Into<String>) -> Self {
        Symbol(symbol.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// Side tag as stored in the position account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RawSide {
    /// Closed / never opened.
    #[default]
    None,
    Long,
    Short,
}

impl RawSide {
    /// Borsh enum tag to side.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(RawSide::None),
            1 => Some(RawSide::Long),
            2 => Some(RawSide::Short),
            _ => None,
        }
    }

    pub fn tag(&self) -> u8 {
        match self {
            RawSide::None => 0,
            RawSide::Long => 1,
            RawSide::Short => 2,
        }
    }

    /// The direction of an open position; `None` for a closed one.
    pub fn direction(&self) -> Option<Direction> {
        match self {
            RawSide::None => None,
            RawSide::Long => Some(Direction::Long),
            RawSide::Short => Some(Direction::Short),
        }
    }
}

/// Direction of an open position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Long,
    Short,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Long => "LONG",
            Direction::Short => "SHORT",
        };
        f.pad(s)
    }
}
