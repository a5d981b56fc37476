//! Price resolution contract.

use crate::domain::FixedPoint;
use async_trait::async_trait;
use std::fmt;

/// Outcome of a price lookup. Failures carry a zero price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceResult {
    pub success: bool,
    /// USD price with 6 decimals.
    pub price: FixedPoint,
}

impl PriceResult {
    pub fn ok(price: FixedPoint) -> Self {
        Self {
            success: true,
            price,
        }
    }

    pub fn failed() -> Self {
        Self {
            success: false,
            price: FixedPoint::ZERO,
        }
    }

    /// The price if the lookup succeeded with a strictly positive value.
    pub fn usable_price(&self) -> Option<FixedPoint> {
        (self.success && !self.price.is_zero()).then_some(self.price)
    }
}

/// Resolves a symbol to a current USD price.
///
/// Implementations never return errors: transport and parse failures are
/// logged and reported as `PriceResult::failed()`.
#[async_trait]
pub trait PriceResolver: Send + Sync + fmt::Debug {
    async fn resolve(&self, symbol: &str) -> PriceResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usable_price() {
        assert_eq!(
            PriceResult::ok(FixedPoint(110_000_000)).usable_price(),
            Some(FixedPoint(110_000_000))
        );
        assert_eq!(PriceResult::ok(FixedPoint::ZERO).usable_price(), None);
        assert_eq!(PriceResult::failed().usable_price(), None);
        assert_eq!(
            PriceResult {
                success: false,
                price: FixedPoint(1)
            }
            .usable_price(),
            None
        );
    }
}
