//! Integer fixed-point amounts as stored on-chain.
//!
//! USD fields carry 6 decimals. All arithmetic on these values stays in integer
//! space; intermediate products are widened to `u128` and always multiplied
//! before dividing.

use super::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Decimal places used by USD-denominated fields.
pub const USD_DECIMALS: u32 = 6;

/// `10^USD_DECIMALS`.
pub const USD_SCALE: u64 = 1_000_000;

/// Unsigned amount scaled by `10^6`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct FixedPoint(pub u64);

impl FixedPoint {
    pub const ZERO: FixedPoint = FixedPoint(0);

    /// `1.000000`
    pub const ONE: FixedPoint = FixedPoint(USD_SCALE);

    pub fn from_raw(raw: u64) -> Self {
        FixedPoint(raw)
    }

    /// Whole units, e.g. `from_units(110)` is `110.000000`.
    pub fn from_units(units: u64) -> Option<Self> {
        units.checked_mul(USD_SCALE).map(FixedPoint)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Descale into a human-readable decimal.
    pub fn to_decimal(&self) -> Decimal {
        match i64::try_from(self.0) {
            Ok(v) => Decimal::from_scaled(v, USD_DECIMALS),
            // Above i64::MAX; go through the wide constructor.
            Err(_) => Decimal::new(rust_decimal::Decimal::from_i128_with_scale(
                self.0 as i128,
                USD_DECIMALS,
            )),
        }
    }
}

impl fmt::Display for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

/// Signed amount scaled by `10^6` (realized PnL and similar).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SignedFixedPoint(pub i64);

impl SignedFixedPoint {
    pub fn from_raw(raw: i64) -> Self {
        SignedFixedPoint(raw)
    }

    pub fn raw(&self) -> i64 {
        self.0
    }

    pub fn to_decimal(&self) -> Decimal {
        Decimal::from_scaled(self.0, USD_DECIMALS)
    }
}

/// Round-half-up integer division. Returns `None` when `den` is zero.
pub fn div_round_half_up(num: u128, den: u128) -> Option<u128> {
    if den == 0 {
        return None;
    }
    let quotient = num / den;
    let remainder = num % den;
    // remainder >= den / 2, written without losing the odd-denominator half.
    if remainder.checked_mul(2)? >= den {
        quotient.checked_add(1)
    } else {
        Some(quotient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_decimal() {
        assert_eq!(FixedPoint(1_000_000_000).to_decimal().to_string(), "1000");
        assert_eq!(FixedPoint(42_500_000).to_decimal().to_string(), "42.5");
        assert_eq!(FixedPoint(1).to_decimal().to_string(), "0.000001");
        assert_eq!(SignedFixedPoint(-42_500_000).to_decimal().to_string(), "-42.5");
    }

    #[test]
    fn test_to_decimal_above_i64_max() {
        let v = FixedPoint(u64::MAX);
        assert_eq!(v.to_decimal().to_string(), "18446744073709.551615");
    }

    #[test]
    fn test_from_units() {
        assert_eq!(FixedPoint::from_units(110), Some(FixedPoint(110_000_000)));
        assert_eq!(FixedPoint::from_units(u64::MAX), None);
    }

    #[test]
    fn test_div_round_half_up() {
        assert_eq!(div_round_half_up(10, 4), Some(3)); // 2.5 -> 3
        assert_eq!(div_round_half_up(9, 4), Some(2)); // 2.25 -> 2
        assert_eq!(div_round_half_up(11, 4), Some(3)); // 2.75 -> 3
        assert_eq!(div_round_half_up(5, 3), Some(2)); // 1.66 -> 2
        assert_eq!(div_round_half_up(4, 3), Some(1)); // 1.33 -> 1
        assert_eq!(div_round_half_up(0, 7), Some(0));
        assert_eq!(div_round_half_up(1, 0), None);
    }
}
