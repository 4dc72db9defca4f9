//! # Pricing Calculator
//!
//! Maps a date range and a daily rate to a total charge.
//!
//! ```text
//!   start 2025-05-01 ─┐
//!                     ├─► days = (end - start) + 1 = 3 ─► 3 × €30.00 = €90.00
//!   end   2025-05-03 ─┘
//! ```
//!
//! Both endpoints count. A same-day rental is one day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

// =============================================================================
// Date Range
// =============================================================================

/// An inclusive, non-inverted pair of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DateRange {
    #[ts(as = "String")]
    start: NaiveDate,
    #[ts(as = "String")]
    end: NaiveDate,
}

impl DateRange {
    /// Fails with `InvalidRange` when `end < start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> CoreResult<Self> {
        if end < start {
            return Err(CoreError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    #[inline]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    #[inline]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days, counting both endpoints. Always >= 1.
    #[inline]
    pub fn inclusive_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// True when the two ranges share at least one day.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// True when `day` falls inside the range.
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

// =============================================================================
// Price Functions
// =============================================================================

/// Total charge for renting from `start` to `end` (inclusive) at `daily_rate`.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use rental_core::{pricing, Money};
///
/// let d = |day| NaiveDate::from_ymd_opt(2025, 5, day).unwrap();
/// assert_eq!(pricing::price(d(1), d(5), Money::from_cents(3000)).unwrap().cents(), 15000);
/// assert!(pricing::price(d(5), d(1), Money::from_cents(3000)).is_err());
/// ```
pub fn price(start: NaiveDate, end: NaiveDate, daily_rate: Money) -> CoreResult<Money> {
    let range = DateRange::new(start, end)?;
    price_range(&range, daily_rate)
}

/// Total charge for an already-validated range.
///
/// Fails with `PriceOverflow` when days × rate does not fit in cents.
pub fn price_range(range: &DateRange, daily_rate: Money) -> CoreResult<Money> {
    let days = range.inclusive_days();
    daily_rate
        .checked_multiply_days(days)
        .ok_or(CoreError::PriceOverflow {
            days,
            daily_rate_cents: daily_rate.cents(),
        })
}

/// Signed difference reported after an amendment.
#[inline]
pub fn price_delta(previous_total: Money, new_total: Money) -> Money {
    new_total - previous_total
}

// =============================================================================
// Unit Tests
// =============================================================================
