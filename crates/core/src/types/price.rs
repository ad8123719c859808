//! Type-safe price representation using decimal arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PriceError {
    /// Prices cannot be negative.
    #[error("price cannot be negative: {0}")]
    Negative(Decimal),
}

/// A price in the store currency.
///
/// The backend serves prices as plain decimal numbers; currency selection is
/// a deployment concern, not a per-price field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Get the decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply by a quantity, for line totals.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Sum an iterator of prices.
    pub fn sum(prices: impl Iterator<Item = Self>) -> Self {
        Self(prices.map(|p| p.0).sum())
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_negative_price_rejected() {
        assert!(Price::new(Decimal::new(-100, 2)).is_err());
        assert!(Price::new(Decimal::new(100, 2)).is_ok());
    }

    #[test]
    fn test_line_total() {
        let unit = Price::new(Decimal::new(1999, 2)).expect("valid price");
        assert_eq!(unit.times(3).amount(), Decimal::new(5997, 2));
    }

    #[test]
    fn test_display_two_decimals() {
        let p = Price::new(Decimal::new(500, 2)).expect("valid price");
        assert_eq!(p.to_string(), "5.00");
    }
}
