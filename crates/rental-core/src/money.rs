//! # Money Module
//!
//! Provides the `Money` type for daily rates, reservation totals and
//! amendment deltas.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With floats, re-pricing a reservation can drift:                       │
//! │    3 × 30.1 = 90.30000000000001  ❌                                     │
//! │                                                                         │
//! │  An amendment delta computed from two drifted totals is then never     │
//! │  exactly zero, and the payment screen shows a phantom balance.          │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    3 × 3010 cents = 9030 cents, every time                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rental_core::money::Money;
//!
//! let rate = Money::from_cents(3000);        // €30.00 per day
//! let total = rate.checked_multiply_days(3).unwrap(); // €90.00
//! let parsed: Money = "30.5".parse().unwrap();
//! assert_eq!(parsed.cents(), 3050);
//! assert_eq!(total.to_string(), "€90.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: amendment deltas can be negative
/// - **Single field tuple struct**: zero-cost abstraction over i64
///
/// ## Where Money is Used
/// ```text
/// Vehicle.daily_rate_cents ──► pricing::price() ──► Reservation.total_cents
///                                                        │
///                     amend: new total − previous total ─┴──► price delta
///                                                        │
///                                 Settlement.amount_due ◄┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// ## Example
    /// ```rust
    /// use rental_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(30, 0).cents(), 3000);
    /// assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies a daily rate by a number of rental days.
    ///
    /// Returns `None` when the product does not fit in i64 cents.
    ///
    /// ## Example
    /// ```rust
    /// use rental_core::money::Money;
    ///
    /// let rate = Money::from_cents(4500); // €45.00
    /// assert_eq!(rate.checked_multiply_days(5).unwrap().cents(), 22500);
    /// assert!(Money::from_cents(i64::MAX).checked_multiply_days(2).is_none());
    /// ```
    #[inline]
    pub const fn checked_multiply_days(&self, days: i64) -> Option<Self> {
        match self.0.checked_mul(days) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    #[inline]
    pub const fn checked_sub(&self, other: Money) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Returns the amount as a plain decimal string without currency symbol.
    ///
    /// This is the "stringified daily rate" the catalog filter matches
    /// against: `3000` cents → `"30.00"`.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================
//
// The operators saturate at the i64 bounds. Pricing goes through the checked
// methods above; the operators only aggregate totals that already fit.

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}€{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

/// Parses a decimal amount such as `"30"`, `"30.5"` or `"30.50"`.
///
/// At most two fractional digits are accepted; anything finer would need
/// rounding, and rounding is never done silently on currency input.
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: reason.to_string(),
        };

        let s = s.trim();
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let (whole, fraction) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };

        if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("expected a decimal number"));
        }
        if fraction.len() > 2 || !fraction.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("at most two decimal places"));
        }

        let major: i64 = whole.parse().map_err(|_| invalid("amount too large"))?;
        let minor: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid("bad fraction"))? * 10,
            _ => fraction.parse().map_err(|_| invalid("bad fraction"))?,
        };

        let cents = major
            .checked_mul(100)
            .and_then(|c| c.checked_add(minor))
            .ok_or_else(|| invalid("amount too large"))?;

        Ok(Money(if negative { -cents } else { cents }))
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

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(9000).to_string(), "€90.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-€5.50");
        assert_eq!(Money::zero().to_string(), "€0.00");
    }

    #[test]
    fn test_decimal_string() {
        assert_eq!(Money::from_cents(3000).to_decimal_string(), "30.00");
        assert_eq!(Money::from_cents(2850).to_decimal_string(), "28.50");
        assert_eq!(Money::from_cents(-6000).to_decimal_string(), "-60.00");
    }

    #[test]
    fn test_parse() {
        assert_eq!("30".parse::<Money>().unwrap().cents(), 3000);
        assert_eq!("30.0".parse::<Money>().unwrap().cents(), 3000);
        assert_eq!("30.5".parse::<Money>().unwrap().cents(), 3050);
        assert_eq!(" 120.99 ".parse::<Money>().unwrap().cents(), 12099);
        assert_eq!("-5.50".parse::<Money>().unwrap().cents(), -550);

        assert!("".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("30.123".parse::<Money>().is_err());
        assert!(".5".parse::<Money>().is_err());
        assert!("99999999999999999999".parse::<Money>().is_err());
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(15000);
        let b = Money::from_cents(9000);

        assert_eq!((a - b).cents(), 6000);
        assert_eq!((b - a).cents(), -6000);
        assert_eq!((a + b).cents(), 24000);
        assert_eq!((b * 2).cents(), 18000);

        let total: Money = vec![a, b].into_iter().sum();
        assert_eq!(total.cents(), 24000);
    }

    #[test]
    fn test_overflow_is_checked_or_saturated() {
        let huge = Money::from_cents(i64::MAX);

        assert!(huge.checked_multiply_days(2).is_none());
        assert!(huge.checked_add(Money::from_cents(1)).is_none());
        assert!(Money::from_cents(i64::MIN).checked_sub(Money::from_cents(1)).is_none());
        assert_eq!(huge.checked_add(Money::zero()), Some(huge));

        assert_eq!((huge + Money::from_cents(1)).cents(), i64::MAX);
        assert_eq!((huge * 3).cents(), i64::MAX);
        let total: Money = vec![huge, huge].into_iter().sum();
        assert_eq!(total.cents(), i64::MAX);
    }

    #[test]
    fn test_sign_checks() {
        assert!(Money::zero().is_zero());
        assert!(Money::from_cents(1).is_positive());
        assert!(Money::from_cents(-1).is_negative());
        assert_eq!(Money::from_cents(-550).abs().cents(), 550);
    }

    #[test]
    fn test_repricing_has_no_drift() {
        let rate = Money::from_cents(3010);
        let first = rate.checked_multiply_days(3).unwrap();
        let again = rate.checked_multiply_days(3).unwrap();
        assert!((again - first).is_zero());
    }
}
