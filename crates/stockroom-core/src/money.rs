//! # Money
//!
//! Prices and totals held as integer minor units.
//!
//! ## From the Wire to the Invoice
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  backend JSON        { "price": 19.9 }                                  │
//! │        │                                                                │
//! │        ▼  parse_major (decimal text, never through f64 arithmetic)      │
//! │  Money(1990)                                                            │
//! │        │                                                                │
//! │        ▼  × bill quantity 3                                             │
//! │  Money(5970)  ──► Display ──► "59.70"                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockroom_core::money::Money;
//!
//! let price = Money::from_cents(1099);
//! let line = price * 3;
//! assert_eq!(line.to_string(), "32.97");
//!
//! let parsed = Money::parse_major("19.9").unwrap();
//! assert_eq!(parsed.cents(), 1990);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// An amount in the smallest currency unit (paise, cents). Signed, and
/// carries no currency: a deployment bills in one currency, configured once
/// as a display label.
///
/// ## Where Money Flows
/// ```text
/// CatalogItem.price ──► CartLine.line_total ──► Cart total ──► Invoice
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Parses a decimal amount written in major units ("19.9", "250", "0.05").
    ///
    /// Digits beyond the second decimal place are rounded half away from
    /// zero. Exponent notation is rejected.
    ///
    /// ## Example
    /// ```rust
    /// use stockroom_core::money::Money;
    ///
    /// assert_eq!(Money::parse_major("10").unwrap().cents(), 1000);
    /// assert_eq!(Money::parse_major("10.125").unwrap().cents(), 1013);
    /// assert!(Money::parse_major("ten").is_err());
    /// ```
    pub fn parse_major(input: &str) -> Result<Self, ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: format!("{reason}: '{input}'"),
        };

        let text = input.trim();
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };

        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid("no digits"));
        }
        if !whole.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid("not a decimal number"));
        }

        let whole_units: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("amount too large"))?
        };

        let mut fraction_digits = fraction.bytes().map(|b| i64::from(b - b'0'));
        let tenths = fraction_digits.next().unwrap_or(0);
        let hundredths = fraction_digits.next().unwrap_or(0);
        let round_up = fraction_digits.next().is_some_and(|d| d >= 5);

        let cents = whole_units
            .checked_mul(100)
            .and_then(|v| v.checked_add(tenths * 10 + hundredths + i64::from(round_up)))
            .ok_or_else(|| invalid("amount too large"))?;

        Ok(Money(if negative { -cents } else { cents }))
    }

    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Whole units, truncated toward zero.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Fractional part, 0-99 regardless of sign.
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Refunds and oversold totals can go below zero; prices may not.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain two-decimal rendering ("32.97"). Currency labels are added by
/// whoever prints the value.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

/// Multiplication by a bill quantity. Saturates at the `i64` bounds.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parts() {
        let money = Money::from_cents(1099);
        assert_eq!((money.major(), money.minor_part()), (10, 99));

        let refund = Money::from_cents(-550);
        assert_eq!((refund.major(), refund.minor_part()), (-5, 50));
        assert!(refund.is_negative());
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::from_cents(0).to_string(), "0.00");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
    }

    #[test]
    fn test_bill_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);

        let total: Money = [a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let price = Money::from_cents(1990);
        assert_eq!(price * i64::MAX, Money::from_cents(i64::MAX));
        assert_eq!(Money::from_cents(-5) * i64::MAX, Money::from_cents(i64::MIN));

        let total: Money = [Money::from_cents(i64::MAX), price].into_iter().sum();
        assert_eq!(total.cents(), i64::MAX);
        assert_eq!(Money::from_cents(i64::MIN) - price, Money::from_cents(i64::MIN));
    }

    #[test]
    fn test_parse_major_plain_and_fractional() {
        assert_eq!(Money::parse_major("250").unwrap().cents(), 25000);
        assert_eq!(Money::parse_major("19.9").unwrap().cents(), 1990);
        assert_eq!(Money::parse_major("0.05").unwrap().cents(), 5);
        assert_eq!(Money::parse_major(".5").unwrap().cents(), 50);
        assert_eq!(Money::parse_major("7.").unwrap().cents(), 700);
        assert_eq!(Money::parse_major(" 12.30 ").unwrap().cents(), 1230);
        assert_eq!(Money::parse_major("-5.5").unwrap().cents(), -550);
    }

    #[test]
    fn test_parse_major_rounds_third_decimal() {
        assert_eq!(Money::parse_major("10.124").unwrap().cents(), 1012);
        assert_eq!(Money::parse_major("10.125").unwrap().cents(), 1013);
        assert_eq!(Money::parse_major("0.999").unwrap().cents(), 100);
    }

    #[test]
    fn test_parse_major_rejects_garbage() {
        assert!(Money::parse_major("").is_err());
        assert!(Money::parse_major(".").is_err());
        assert!(Money::parse_major("1e3").is_err());
        assert!(Money::parse_major("12,50").is_err());
        assert!(Money::parse_major("99999999999999999999").is_err());
    }
}
