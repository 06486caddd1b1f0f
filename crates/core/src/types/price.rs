//! Type-safe price representation using decimal arithmetic.
//!
//! Menu prices arrive from the backend as JSON numbers. They are converted
//! to `Decimal` at the API boundary so cart subtotals never accumulate
//! floating-point error.

use core::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};

/// A monetary amount in the food court's single display currency.
///
/// Stored as a `Decimal` rounded to two places. Supports the arithmetic the
/// cart needs (line totals, subtotal accumulation) and formats as `$x.xx`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub fn new(amount: Decimal) -> Self {
        Self(amount.round_dp(2))
    }

    /// Create a price from a JSON float, as sent by the backend.
    ///
    /// Non-finite values collapse to zero, so a bad payload renders as
    /// $0.00 rather than failing the page.
    #[must_use]
    pub fn from_f64(amount: f64) -> Self {
        Decimal::from_f64(amount).map_or(Self::ZERO, Self::new)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply by a quantity, for cart line totals.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self::new(self.0 * Decimal::from(quantity))
    }

    /// Add another price.
    #[must_use]
    pub fn plus(&self, other: Self) -> Self {
        Self::new(self.0 + other.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Price::from_f64(14.99).to_string(), "$14.99");
        assert_eq!(Price::from_f64(12.5).to_string(), "$12.50");
        assert_eq!(Price::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_line_total() {
        let price = Price::from_f64(9.5);
        assert_eq!(price.times(3).to_string(), "$28.50");
    }

    #[test]
    fn test_accumulation_is_exact() {
        // 0.1 + 0.2 style drift must not appear in subtotals
        let subtotal = (0..10).fold(Price::ZERO, |acc, _| acc.plus(Price::from_f64(0.1)));
        assert_eq!(subtotal.to_string(), "$1.00");
    }

    #[test]
    fn test_non_finite_collapses_to_zero() {
        assert_eq!(Price::from_f64(f64::NAN), Price::ZERO);
    }
}
