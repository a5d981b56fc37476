//! Position metrics: PnL calculation and normalization.

pub mod normalizer;
pub mod pnl;

pub use normalizer::{NormalizeError, PositionNormalizer};
pub use pnl::{calculate, PnlDelta, PnlError};
