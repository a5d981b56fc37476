//! Domain types for perpetuals position reporting.
//!
//! This module provides:
//! - Integer fixed-point amounts as stored on-chain, and a Decimal wrapper for reports
//! - Domain primitives: Pubkey, Symbol, RawSide, Direction
//! - Raw position accounts, the market table, and the normalized position model

pub mod decimal;
pub mod fixed;
pub mod market;
pub mod position;
pub mod primitives;

pub use decimal::Decimal;
pub use fixed::{FixedPoint, SignedFixedPoint, USD_DECIMALS, USD_SCALE};
pub use market::{MarketDescriptor, MarketRegistry};
pub use position::{NormalizedPosition, PortfolioSummary, RawPositionAccount};
pub use primitives::{Direction, ParsePubkeyError, Pubkey, RawSide, Symbol};
