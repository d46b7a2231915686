//! Type-safe money representation using decimal arithmetic.
//!
//! All amounts on the platform are South African Rand. Arithmetic that can
//! produce fractional cents (percentage shares) must go through
//! [`Money::scale`], which rounds half-up to cents so ledger entries always
//! reconcile.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Sub};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A monetary amount in South African Rand (ZAR).
///
/// Amounts are held in the currency's standard unit (rands, not cents) and
/// are not implicitly rounded; construction from cents and percentage
/// scaling produce cent-precision values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero rand.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a money value from a decimal rand amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a money value from a whole number of cents.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(Decimal::from_parts(
            cents.unsigned_abs() as u32,
            (cents.unsigned_abs() >> 32) as u32,
            0,
            cents < 0,
            2,
        ))
    }

    /// The underlying decimal amount in rands.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether this amount is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Whether this amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Multiply by a fraction and round half-up to cents.
    ///
    /// This is the only sanctioned way to take a percentage of an amount;
    /// it guarantees the result is representable as whole cents.
    #[must_use]
    pub fn scale(&self, factor: Decimal) -> Self {
        Self((self.0 * factor).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }

    /// Round this amount half-up to cents.
    #[must_use]
    pub fn to_cents(&self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{:.2}", self.0)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        assert_eq!(Money::from_cents(10_050), Money::new(Decimal::new(1005, 1)));
        assert_eq!(Money::from_cents(-250).amount(), Decimal::new(-250, 2));
    }

    #[test]
    fn test_scale_rounds_half_up() {
        // R0.01 * 0.50 = R0.005, rounds up to R0.01
        let half_cent = Money::from_cents(1).scale(Decimal::new(50, 2));
        assert_eq!(half_cent, Money::from_cents(1));
    }

    #[test]
    fn test_scale_exact() {
        let total = Money::from_cents(10_000);
        assert_eq!(total.scale(Decimal::new(75, 2)), Money::from_cents(7_500));
    }

    #[test]
    fn test_sum() {
        let total: Money = [Money::from_cents(150), Money::from_cents(250)]
            .into_iter()
            .sum();
        assert_eq!(total, Money::from_cents(400));
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(10_000).to_string(), "R100.00");
        assert_eq!(Money::from_cents(5).to_string(), "R0.05");
    }

    #[test]
    fn test_is_negative() {
        assert!(Money::from_cents(-1).is_negative());
        assert!(!Money::ZERO.is_negative());
        assert!(!Money::from_cents(1).is_negative());
    }
}
