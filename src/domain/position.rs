//! Raw on-chain position accounts and the normalized position model.

use super::{Decimal, Direction, FixedPoint, Pubkey, RawSide, SignedFixedPoint, Symbol};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A decoded perpetuals position account.
///
/// All USD fields are fixed-point with 6 decimals.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawPositionAccount {
    pub owner: Pubkey,
    pub pool: Pubkey,
    pub custody: Pubkey,
    pub collateral_custody: Pubkey,
    /// Unix seconds.
    pub open_time: i64,
    /// Unix seconds.
    pub update_time: i64,
    pub side: RawSide,
    /// Entry price.
    pub price: FixedPoint,
    pub size_usd: FixedPoint,
    pub collateral_usd: FixedPoint,
    pub realised_pnl_usd: SignedFixedPoint,
    pub cumulative_interest_snapshot: u128,
    pub locked_amount: u64,
    pub bump: u8,
}

impl RawPositionAccount {
    /// Open side with a non-zero size.
    pub fn is_open(&self) -> bool {
        self.side != RawSide::None && !self.size_usd.is_zero()
    }

    pub fn opened_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.open_time, 0).single()
    }
}

/// A position normalized across protocols.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedPosition {
    pub symbol: Symbol,
    pub size_usd: Decimal,
    pub base_amount: Decimal,
    pub direction: Direction,
    pub unrealized_pnl_usd: Decimal,
    pub entry_price: Decimal,
    pub mark_price: Decimal,
    pub leverage: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_id: Option<u16>,
}

/// Totals over a set of normalized positions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub position_count: usize,
    pub total_size_usd: Decimal,
    pub total_pnl_usd: Decimal,
}

impl PortfolioSummary {
    pub fn from_positions(positions: &[NormalizedPosition]) -> Self {
        Self {
            position_count: positions.len(),
            total_size_usd: positions.iter().map(|p| p.size_usd).sum(),
            total_pnl_usd: positions.iter().map(|p| p.unrealized_pnl_usd).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn position(symbol: &str, size: &str, pnl: &str) -> NormalizedPosition {
        NormalizedPosition {
            symbol: Symbol::new(symbol),
            size_usd: d(size),
            base_amount: Decimal::zero(),
            direction: Direction::Long,
            unrealized_pnl_usd: d(pnl),
            entry_price: d("1"),
            mark_price: d("1"),
            leverage: d("1"),
            market_id: None,
        }
    }

    #[test]
    fn test_is_open() {
        let mut raw = RawPositionAccount {
            side: RawSide::Long,
            size_usd: FixedPoint(1),
            ..Default::default()
        };
        assert!(raw.is_open());

        raw.size_usd = FixedPoint::ZERO;
        assert!(!raw.is_open());

        raw.size_usd = FixedPoint(1);
        raw.side = RawSide::None;
        assert!(!raw.is_open());
    }

    #[test]
    fn test_opened_at() {
        let raw = RawPositionAccount {
            open_time: 1_700_000_000,
            ..Default::default()
        };
        assert_eq!(raw.opened_at().unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_summary_sums_pnl_and_size() {
        let positions = vec![
            position("SOL", "1000", "100"),
            position("ETH", "500.5", "-42.25"),
        ];
        let summary = PortfolioSummary::from_positions(&positions);
        assert_eq!(summary.position_count, 2);
        assert_eq!(summary.total_size_usd, d("1500.5"));
        assert_eq!(summary.total_pnl_usd, d("57.75"));
    }

    #[test]
    fn test_summary_empty() {
        let summary = PortfolioSummary::from_positions(&[]);
        assert_eq!(summary, PortfolioSummary::default());
    }

    #[test]
    fn test_normalized_position_json_omits_missing_market_id() {
        let json = serde_json::to_value(position("SOL", "1", "0")).unwrap();
        assert!(json.get("marketId").is_none());
        assert_eq!(json["direction"], "LONG");
        assert!(json["sizeUsd"].is_number());
    }
}
