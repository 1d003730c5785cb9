//! Monetary amounts stored as integer cents.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A non-negative amount of money in cents.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cents(i64);

impl Cents {
    /// Convert a strictly-positive decimal amount (dollars) into cents.
    ///
    /// Sub-cent fractions are rounded half-to-even; an amount that rounds
    /// to zero cents is rejected.
    pub fn from_decimal(amount: Decimal) -> Result<Self, DomainError> {
        if amount <= Decimal::ZERO {
            return Err(DomainError::validation("amount must be greater than zero"));
        }

        let cents = amount
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or_else(|| DomainError::validation("amount is too large"))?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);

        let cents = cents
            .to_i64()
            .ok_or_else(|| DomainError::validation("amount is too large"))?;
        if cents == 0 {
            return Err(DomainError::validation("amount is less than one cent"));
        }

        Ok(Self(cents))
    }

    /// Wrap a raw cents value read back from storage.
    pub fn from_raw(cents: i64) -> Result<Self, DomainError> {
        if cents < 0 {
            return Err(DomainError::validation("amount cannot be negative"));
        }
        Ok(Self(cents))
    }

    pub fn get(self) -> i64 {
        self.0
    }

    /// The amount in dollars, for display.
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, 2)
    }
}

impl core::fmt::Display for Cents {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "${}", self.to_decimal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn whole_dollars_multiply_by_hundred() {
        assert_eq!(Cents::from_decimal(dec!(42)).unwrap().get(), 4200);
    }

    #[test]
    fn fractional_cents_round_half_even() {
        assert_eq!(Cents::from_decimal(dec!(0.125)).unwrap().get(), 12);
        assert_eq!(Cents::from_decimal(dec!(0.135)).unwrap().get(), 14);
    }

    #[test]
    fn zero_and_negative_are_rejected() {
        assert!(Cents::from_decimal(Decimal::ZERO).is_err());
        assert!(Cents::from_decimal(dec!(-1)).is_err());
    }

    #[test]
    fn amounts_rounding_to_zero_cents_are_rejected() {
        assert!(Cents::from_decimal(dec!(0.001)).is_err());
        assert!(Cents::from_decimal(dec!(0.005)).is_err());
        assert_eq!(Cents::from_decimal(dec!(0.015)).unwrap().get(), 2);
    }

    #[test]
    fn raw_negative_is_rejected() {
        assert!(Cents::from_raw(-5).is_err());
        assert_eq!(Cents::from_raw(0).unwrap().get(), 0);
    }

    #[test]
    fn displays_as_dollars() {
        assert_eq!(Cents::from_raw(15795).unwrap().to_string(), "$157.95");
    }
}
