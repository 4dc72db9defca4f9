//! # rental-core: Pure Business Logic for the Rental Engine
//!
//! This crate holds the rules of the reservation & settlement engine as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Rental Reservation Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Presentation / session transport (external)        │   │
//! │  │    Catalog page ──► Booking form ──► Payment form ──► My trips  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ authenticated identity                 │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    rental-engine                                │   │
//! │  │    reserve, amend, cancel, validate_and_record, dashboard      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ rental-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌────────┐  │   │
//! │  │   │  types  │ │  money  │ │ pricing │ │validation│ │ report │  │   │
//! │  │   │ Vehicle │ │  Money  │ │DateRange│ │  card    │ │summary │  │   │
//! │  │   │ Reserv. │ │         │ │ price() │ │  fields  │ │        │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └──────────┘ └────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    rental-db (Database Layer)                   │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Vehicle, Reservation, Payment, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - Inclusive day count and fare calculation
//! - [`catalog`] - Free-text vehicle filter
//! - [`settlement`] - Amount-owed values bridging booking and payment
//! - [`validation`] - Card field and input validation
//! - [`report`] - Dashboard indicator aggregation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use rental_core::money::Money;
//! use rental_core::pricing;
//!
//! let start = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
//! let end = NaiveDate::from_ymd_opt(2025, 5, 3).unwrap();
//!
//! // 3 inclusive days at 30.00 per day
//! let total = pricing::price(start, end, Money::from_cents(3000)).unwrap();
//! assert_eq!(total.cents(), 9000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod money;
pub mod pricing;
pub mod report;
pub mod settlement;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CardValidationError, CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::DateRange;
pub use settlement::{Settlement, SettlementView};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a catalog search query.
pub const MAX_SEARCH_QUERY_LEN: usize = 100;

/// Number of months covered by the dashboard history series.
pub const REPORT_HISTORY_MONTHS: u32 = 12;

/// Number of customers listed in the dashboard ranking.
pub const REPORT_TOP_CUSTOMERS: usize = 5;
