//! Human-readable decimal type backed by rust_decimal.
//!
//! On-chain amounts stay in integer fixed-point space (see `fixed`); this type is
//! only used for values exposed in the normalized position model.

use rust_decimal::Decimal as RustDecimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Decimal value exposed in reports.
///
/// Serializes to a JSON number (not string).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Decimal(#[serde(with = "rust_decimal::serde::float")] RustDecimal);

impl Decimal {
    pub fn new(value: RustDecimal) -> Self {
        Decimal(value)
    }

    /// Parse a Decimal from a string losslessly.
    pub fn from_str_canonical(s: &str) -> Result<Self, rust_decimal::Error> {
        RustDecimal::from_str(s).map(Decimal)
    }

    /// Build a Decimal from an integer scaled by `10^scale`.
    ///
    /// `from_scaled(1_500_000, 6)` is `1.5`.
    pub fn from_scaled(raw: i64, scale: u32) -> Self {
        Decimal(RustDecimal::new(raw, scale))
    }

    /// Format without exponent notation or trailing zeros.
    pub fn to_canonical_string(&self) -> String {
        format!("{}", self.0.normalize())
    }

    pub fn inner(&self) -> RustDecimal {
        self.0
    }

    pub fn zero() -> Self {
        Decimal(RustDecimal::ZERO)
    }

    pub fn one() -> Self {
        Decimal(RustDecimal::ONE)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the value is > 0.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.0.is_sign_positive()
    }

    /// Division that yields `None` on a zero divisor or overflow.
    pub fn checked_div(&self, rhs: Decimal) -> Option<Decimal> {
        self.0.checked_div(rhs.0).map(Decimal)
    }

    /// Round to `dp` decimal places for display.
    pub fn round_dp(&self, dp: u32) -> Self {
        Decimal(self.0.round_dp(dp))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_canonical_string())
    }
}

impl FromStr for Decimal {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_canonical(s)
    }
}

impl From<RustDecimal> for Decimal {
    fn from(value: RustDecimal) -> Self {
        Decimal(value)
    }
}

impl From<Decimal> for RustDecimal {
    fn from(value: Decimal) -> Self {
        value.0
    }
}

impl std::ops::Add for Decimal {
    type Output = Decimal;

    fn add(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 + rhs.0)
    }
}

impl std::ops::Neg for Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        Decimal(-self.0)
    }
}

impl std::iter::Sum for Decimal {
    fn sum<I: Iterator<Item = Decimal>>(iter: I) -> Decimal {
        iter.fold(Decimal::zero(), |acc, d| acc + d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_scaled_descales() {
        assert_eq!(Decimal::from_scaled(1_500_000, 6).to_canonical_string(), "1.5");
        assert_eq!(Decimal::from_scaled(-42_500_000, 6).to_canonical_string(), "-42.5");
        assert_eq!(Decimal::from_scaled(0, 6), Decimal::zero());
    }

    #[test]
    fn test_equality_ignores_scale() {
        let a = Decimal::from_str_canonical("5.00").unwrap();
        let b = Decimal::from_str_canonical("5").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_checked_div_zero() {
        let a = Decimal::from_str_canonical("10").unwrap();
        assert_eq!(a.checked_div(Decimal::zero()), None);
        assert_eq!(
            a.checked_div(Decimal::from_str_canonical("4").unwrap()),
            Some(Decimal::from_str_canonical("2.5").unwrap())
        );
    }

    #[test]
    fn test_decimal_json_serialization() {
        let decimal = Decimal::from_str_canonical("123.456").unwrap();
        let json = serde_json::to_value(decimal).unwrap();
        assert!(json.is_number());
        assert_eq!(json.to_string(), "123.456");
    }

    #[test]
    fn test_sum() {
        let total: Decimal = ["1.5", "-0.5", "2"]
            .iter()
            .map(|s| Decimal::from_str_canonical(s).unwrap())
            .sum();
        assert_eq!(total.to_canonical_string(), "3");
    }

    #[test]
    fn test_round_dp_display() {
        let d = Decimal::from_str_canonical("3.14159").unwrap();
        assert_eq!(d.round_dp(2).to_string(), "3.14");
    }
}
