//! Static market reference table.

use super::{Pubkey, Symbol};
use std::collections::HashMap;
use std::str::FromStr;

/// Maps a custody account to a human-readable market.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketDescriptor {
    pub symbol: Symbol,
    pub custody: Pubkey,
    pub market_index: u16,
}

impl MarketDescriptor {
    pub fn new(symbol: impl Into<String>, custody: Pubkey, market_index: u16) -> Self {
        Self {
            symbol: Symbol::new(symbol),
            custody,
            market_index,
        }
    }
}

/// Read-only custody -> market lookup, built once and shared across tasks.
#[derive(Debug, Clone, Default)]
pub struct MarketRegistry {
    by_custody: HashMap<Pubkey, MarketDescriptor>,
}

/// Jupiter Perpetuals custodies that carry open positions.
const JUPITER_PERPS_MARKETS: &[(&str, &str, u16)] = &[
    ("SOL", "7xS2gz2bTp3fwCC7knJvUWTEU9Tycczu6VhJYKgi1wdz", 0),
    ("ETH", "AQCGyheWPLeo6Qp9WpYS9m3Qj479t7R636N9ey1rEjEn", 1),
    ("BTC", "5Pv3gM9JrFFH883SWAhvJC9RPYmo8UNxuFtv5bMMALkm", 2),
];

impl MarketRegistry {
    pub fn new(markets: Vec<MarketDescriptor>) -> Self {
        let by_custody = markets.into_iter().map(|m| (m.custody, m)).collect();
        Self { by_custody }
    }

    /// Built-in table for the Jupiter Perpetuals pool.
    pub fn jupiter_perps() -> Self {
        let markets = JUPITER_PERPS_MARKETS
            .iter()
            .filter_map(|(symbol, custody, index)| {
                Pubkey::from_str(custody)
                    .ok()
                    .map(|key| MarketDescriptor::new(*symbol, key, *index))
            })
            .collect();
        Self::new(markets)
    }

    /// Exact custody match.
    pub fn by_custody(&self, custody: &Pubkey) -> Option<&MarketDescriptor> {
        self.by_custody.get(custody)
    }

    pub fn len(&self) -> usize {
        self.by_custody.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_custody.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_parses() {
        let registry = MarketRegistry::jupiter_perps();
        assert_eq!(registry.len(), JUPITER_PERPS_MARKETS.len());

        let sol_custody = Pubkey::from_str("7xS2gz2bTp3fwCC7knJvUWTEU9Tycczu6VhJYKgi1wdz").unwrap();
        let sol = registry.by_custody(&sol_custody).unwrap();
        assert_eq!(sol.symbol.as_str(), "SOL");
        assert_eq!(sol.market_index, 0);
    }

    #[test]
    fn test_unknown_custody() {
        let registry = MarketRegistry::jupiter_perps();
        assert!(registry.by_custody(&Pubkey::new_from_array([9u8; 32])).is_none());
    }

    #[test]
    fn test_custom_table() {
        let registry = MarketRegistry::new(vec![MarketDescriptor::new(
            "JUP",
            Pubkey::new_from_array([1u8; 32]),
            7,
        )]);
        assert_eq!(
            registry.by_custody(&Pubkey::new_from_array([1u8; 32])).map(|m| m.market_index),
            Some(7)
        );
        assert!(!registry.is_empty());
    }
}
