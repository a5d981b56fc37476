use crate::domain::{Decimal, Direction, FixedPoint};
use thiserror::Error;

/// Unsigned PnL magnitude plus its sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PnlDelta {
    pub has_profit: bool,
    pub amount: FixedPoint,
}

impl PnlDelta {
    /// `+amount` on profit, `-amount` otherwise, descaled.
    pub fn signed(&self) -> Decimal {
        let amount = self.amount.to_decimal();
        if self.has_profit {
            amount
        } else {
            -amount
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PnlError {
    #[error("entry price is zero")]
    ZeroEntryPrice,
    #[error("pnl does not fit in a 64-bit fixed-point amount")]
    Overflow,
}

/// Unrealized PnL of a position.
///
/// `amount = size_usd * |current_price - entry_price| / entry_price`, computed
/// in integer space (multiply first, truncating divide). Equal prices are never
/// a profit.
pub fn calculate(
    size_usd: FixedPoint,
    entry_price: FixedPoint,
    direction: Direction,
    current_price: FixedPoint,
) -> Result<PnlDelta, PnlError> {
    if size_usd.is_zero() {
        return Ok(PnlDelta::default());
    }
    if entry_price.is_zero() {
        return Err(PnlError::ZeroEntryPrice);
    }

    let entry = entry_price.raw();
    let current = current_price.raw();

    let has_profit = match direction {
        Direction::Long => current > entry,
        Direction::Short => entry > current,
    };

    let delta = u128::from(current.abs_diff(entry));
    let amount = u128::from(size_usd.raw()) * delta / u128::from(entry);
    let amount = u64::try_from(amount).map_err(|_| PnlError::Overflow)?;

    Ok(PnlDelta {
        has_profit,
        amount: FixedPoint::from_raw(amount),
    })
}
