//! Monetary amounts backed by decimal arithmetic.
//!
//! All money in Rentflow is a [`Money`] value: a `rust_decimal::Decimal`
//! amount paired with an ISO 4217 currency code. Floats are never used for
//! prices or totals.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from money arithmetic.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    /// Attempted to combine amounts in different currencies.
    #[error("currency mismatch: {left} vs {right}")]
    CurrencyMismatch {
        left: CurrencyCode,
        right: CurrencyCode,
    },
}

/// A monetary amount with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: CurrencyCode,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub const fn new(amount: Decimal, currency: CurrencyCode) -> Self {
        Self { amount, currency }
    }

    /// Zero in the given currency.
    #[must_use]
    pub const fn zero(currency: CurrencyCode) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Multiply by a unitless factor (quantity, day count).
    #[must_use]
    pub fn times(&self, factor: u32) -> Self {
        Self {
            amount: self.amount * Decimal::from(factor),
            currency: self.currency,
        }
    }

    /// Add another amount in the same currency.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::CurrencyMismatch`] if the currencies differ.
    pub fn checked_add(&self, other: &Self) -> Result<Self, MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch {
                left: self.currency,
                right: other.currency,
            });
        }
        Ok(Self {
            amount: self.amount + other.amount,
            currency: self.currency,
        })
    }

    /// Round to cents using ordinary commercial rounding (midpoint away
    /// from zero).
    #[must_use]
    pub fn round_cents(&self) -> Self {
        Self {
            amount: self
                .amount
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
            currency: self.currency,
        }
    }

    /// Whether the amount is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{:.2}", self.currency.symbol(), self.amount)
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Currency symbol for display.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "\u{20ac}",
            Self::GBP => "\u{a3}",
        }
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        };
        write!(f, "{code}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_times_and_add() {
        let rate = Money::new(Decimal::new(10050, 2), CurrencyCode::USD); // 100.50
        let doubled = rate.times(2);
        assert_eq!(doubled.amount, Decimal::new(20100, 2));

        let sum = doubled.checked_add(&rate).unwrap();
        assert_eq!(sum.amount, Decimal::new(30150, 2));
    }

    #[test]
    fn test_checked_add_rejects_mixed_currencies() {
        let usd = Money::new(Decimal::ONE, CurrencyCode::USD);
        let eur = Money::new(Decimal::ONE, CurrencyCode::EUR);
        assert_eq!(
            usd.checked_add(&eur),
            Err(MoneyError::CurrencyMismatch {
                left: CurrencyCode::USD,
                right: CurrencyCode::EUR,
            })
        );
    }

    #[test]
    fn test_round_cents() {
        let m = Money::new(Decimal::new(12345, 3), CurrencyCode::USD); // 12.345
        assert_eq!(m.round_cents().amount, Decimal::new(1235, 2)); // 12.35
    }

    #[test]
    fn test_display() {
        let m = Money::new(Decimal::new(66000, 2), CurrencyCode::USD);
        assert_eq!(m.to_string(), "$660.00");

        let m = Money::new(Decimal::new(950, 2), CurrencyCode::GBP);
        assert_eq!(m.to_string(), "\u{a3}9.50");
    }
}
