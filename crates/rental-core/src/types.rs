//! # Domain Types
//!
//! Core domain types used throughout the rental engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Vehicle      │   │  Reservation    │   │    Payment      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │◄──│  vehicle_id     │◄──│  reservation_id │       │
//! │  │  make / model   │   │  customer_id ───┼─┐ │  card fields    │       │
//! │  │  daily_rate     │   │  start / end    │ │ │  amount_cents   │       │
//! │  └─────────────────┘   │  total_cents    │ │ └─────────────────┘       │
//! │                        │  status         │ │                           │
//! │  ┌─────────────────┐   └─────────────────┘ │ ┌─────────────────┐       │
//! │  │ReservationStatus│                       └►│    Customer     │       │
//! │  │  Active         │                         │  id / username  │       │
//! │  │  Cancelled      │                         └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Vehicles and customers are reference data. Reservations are the only
//! rows the engine mutates, and payments are append-only.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::pricing::{self, DateRange};

// =============================================================================
// Customer
// =============================================================================

/// A customer as the engine sees it. Credentials live elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Customer {
    pub id: String,
    /// Display name.
    pub name: String,
    /// Login name, unique across customers.
    pub username: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Vehicle
// =============================================================================

/// A rentable vehicle. Read-only reference data for the engine.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Vehicle {
    /// Unique identifier (UUID v4).
    pub id: String,

    pub make: String,
    pub model: String,

    /// Rental class, e.g. "Pequeno", "SUV", "Luxo".
    pub category: String,

    /// "Manual" or "Automática".
    pub transmission: String,

    /// "Carro" or "Mota".
    pub body_type: String,

    /// Seating capacity.
    pub seats: i64,

    /// Image file name shown by the catalog page.
    pub image: Option<String>,

    /// Price per rental day in cents.
    pub daily_rate_cents: i64,

    #[ts(as = "Option<String>")]
    pub last_service_date: Option<NaiveDate>,

    #[ts(as = "Option<String>")]
    pub next_service_date: Option<NaiveDate>,

    #[ts(as = "Option<String>")]
    pub last_inspection_date: Option<NaiveDate>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Vehicle {
    /// Returns the daily rate as Money.
    #[inline]
    pub fn daily_rate(&self) -> Money {
        Money::from_cents(self.daily_rate_cents)
    }

    /// "Make Model" label used in listings and logs.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.make, self.model)
    }
}

// =============================================================================
// Reservation Status
// =============================================================================

/// Lifecycle of a reservation.
///
/// ```text
///   create ──► Active ──amend──► Active
///                 │
///               cancel
///                 ▼
///             Cancelled   (terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    /// Holds the vehicle and is billable.
    Active,
    /// Released. No further mutation.
    Cancelled,
}

impl ReservationStatus {
    /// Storage representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Active => "active",
            ReservationStatus::Cancelled => "cancelled",
        }
    }
}

impl Default for ReservationStatus {
    fn default() -> Self {
        ReservationStatus::Active
    }
}

// =============================================================================
// Reservation
// =============================================================================

/// A date-ranged booking of one vehicle by one customer.
///
/// `end_date >= start_date` always holds, and after every create or amend
/// `total_cents == daily_rate × inclusive days`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Reservation {
    pub id: String,
    pub customer_id: String,
    pub vehicle_id: String,
    #[ts(as = "String")]
    pub start_date: NaiveDate,
    /// Inclusive.
    #[ts(as = "String")]
    pub end_date: NaiveDate,
    pub total_cents: i64,
    pub status: ReservationStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Returns the stored total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == ReservationStatus::Active
    }

    /// The reservation's dates as a range.
    ///
    /// Rows are checked by the schema, so an inverted pair only shows up
    /// if storage was edited by hand; it is reported as `InvalidRange`.
    pub fn range(&self) -> crate::CoreResult<DateRange> {
        DateRange::new(self.start_date, self.end_date)
    }
}

// =============================================================================
// Amendment
// =============================================================================

/// Result of a date change.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Amendment {
    /// The reservation after the update. Same id, customer and vehicle.
    pub reservation: Reservation,
    /// Total before the change.
    pub previous_total: Money,
    /// `new total - previous total`. Negative when the rental got shorter.
    pub price_delta: Money,
}

// =============================================================================
// Reservation View
// =============================================================================

/// A reservation joined with its vehicle for the "my reservations" listing.
///
/// Carries both the persisted total and the total recomputed from the
/// stored dates and the vehicle's current rate. The persisted total is
/// authoritative; `has_drift()` flags rows where the two disagree (for
/// example after a rate change).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReservationView {
    pub reservation_id: String,
    pub vehicle_id: String,
    pub make: String,
    pub model: String,
    pub daily_rate_cents: i64,
    #[ts(as = "String")]
    pub start_date: NaiveDate,
    #[ts(as = "String")]
    pub end_date: NaiveDate,
    pub status: ReservationStatus,
    pub stored_total_cents: i64,
    pub recomputed_total_cents: i64,
}

impl ReservationView {
    /// Builds the view, recomputing the total from the stored dates and
    /// the vehicle's current `daily_rate`.
    pub fn new(
        reservation: &Reservation,
        make: impl Into<String>,
        model: impl Into<String>,
        daily_rate: Money,
    ) -> crate::CoreResult<Self> {
        let recomputed = pricing::price(reservation.start_date, reservation.end_date, daily_rate)?;

        Ok(Self {
            reservation_id: reservation.id.clone(),
            vehicle_id: reservation.vehicle_id.clone(),
            make: make.into(),
            model: model.into(),
            daily_rate_cents: daily_rate.cents(),
            start_date: reservation.start_date,
            end_date: reservation.end_date,
            status: reservation.status,
            stored_total_cents: reservation.total_cents,
            recomputed_total_cents: recomputed.cents(),
        })
    }

    /// The authoritative (persisted) total.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.stored_total_cents)
    }

    /// True when the stored total no longer matches dates × rate.
    #[inline]
    pub fn has_drift(&self) -> bool {
        self.stored_total_cents != self.recomputed_total_cents
    }
}

// =============================================================================
// Purge Outcome
// =============================================================================

/// What `purge_inactive` did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PurgeOutcome {
    /// Cancelled reservations deleted.
    pub removed: u64,
    /// Cancelled reservations kept because payments reference them.
    pub retained: u64,
}

// =============================================================================
// Payment
// =============================================================================

/// A recorded card payment. Append-only.
///
/// A reservation collects one row per settled booking or amendment; rows
/// are never merged into a running balance.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Payment {
    pub id: String,
    pub reservation_id: String,
    /// Digits only, 13 or 15 of them.
    pub card_number: String,
    pub cardholder_name: String,
    /// `YYYY-MM`.
    pub expiry: String,
    pub security_code: String,
    /// Amount the settlement showed when the card was accepted, if any.
    pub amount_cents: Option<i64>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// Returns the settled amount as Money.
    #[inline]
    pub fn amount(&self) -> Option<Money> {
        self.amount_cents.map(Money::from_cents)
    }

    /// Last four digits, for receipts and logs.
    pub fn masked_card_number(&self) -> String {
        let len = self.card_number.len();
        let tail = &self.card_number[len.saturating_sub(4)..];
        format!("{}{}", "*".repeat(len.saturating_sub(4)), tail)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
