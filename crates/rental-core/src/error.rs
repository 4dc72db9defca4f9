//! # Error Types
//!
//! Domain-specific error types for rental-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  rental-core errors (this file)                                        │
//! │  ├── CoreError            - Reservation / lookup rule violations       │
//! │  ├── CardValidationError  - Payment form rejections (reason codes)     │
//! │  └── ValidationError      - Generic input validation failures          │
//! │                                                                         │
//! │  rental-db errors (separate crate)                                     │
//! │  └── DbError              - Database operation failures                │
//! │                                                                         │
//! │  rental-engine errors                                                  │
//! │  └── EngineError          - { code, message } seen by the caller       │
//! │                                                                         │
//! │  Flow: CardValidationError → CoreError → DbError → EngineError         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Reservation engine rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// End date lies before start date.
    #[error("Invalid date range: end {end} is before start {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// Vehicle reference does not resolve.
    ///
    /// ## When This Occurs
    /// - Booking a vehicle id that was never seeded
    /// - Amending a reservation whose vehicle row has vanished (orphan)
    #[error("Vehicle not found: {0}")]
    VehicleNotFound(String),

    /// Customer reference does not resolve.
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    /// Reservation does not exist (or belongs to someone else).
    #[error("Reservation not found: {0}")]
    ReservationNotFound(String),

    /// Reservation is Cancelled and can no longer be amended.
    #[error("Reservation {0} is cancelled")]
    ReservationCancelled(String),

    /// Another Active reservation already holds the vehicle for
    /// overlapping dates.
    ///
    /// ## User Workflow
    /// ```text
    /// Customer A books BMW X5, 05-01 → 05-05   ✓
    /// Customer B books BMW X5, 05-04 → 05-06
    ///      │
    ///      ▼
    /// ReservationConflict { vehicle_id, start: 05-04, end: 05-06 }
    /// ```
    #[error("Vehicle {vehicle_id} is already reserved between {start} and {end}")]
    ReservationConflict {
        vehicle_id: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    /// Days × daily rate does not fit in i64 cents.
    #[error("Price of {days} days at {daily_rate_cents} cents per day is out of range")]
    PriceOverflow { days: i64, daily_rate_cents: i64 },

    /// Card field rejected by the payment validator.
    #[error(transparent)]
    Card(#[from] CardValidationError),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Card Validation Error
// =============================================================================

/// Payment form rejections.
///
/// Each variant is a distinct user-facing reason. All of them are
/// recoverable: the caller fixes the field and submits again while the
/// pending settlement stays open.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardValidationError {
    #[error("Invalid card number: must have 13 or 15 digits")]
    InvalidCardNumber,

    #[error("Invalid cardholder name: only letters and spaces are allowed")]
    InvalidCardholderName,

    #[error("Malformed expiry: expected YYYY-MM")]
    MalformedExpiry,

    #[error("Card expired")]
    ExpiredCard,

    #[error("Invalid security code: must have 3 or 4 digits")]
    InvalidSecurityCode,
}

impl CardValidationError {
    /// Machine-readable reason code.
    pub const fn reason_code(&self) -> &'static str {
        match self {
            CardValidationError::InvalidCardNumber => "INVALID_CARD_NUMBER",
            CardValidationError::InvalidCardholderName => "INVALID_CARDHOLDER_NAME",
            CardValidationError::MalformedExpiry => "MALFORMED_EXPIRY",
            CardValidationError::ExpiredCard => "EXPIRED_CARD",
            CardValidationError::InvalidSecurityCode => "INVALID_SECURITY_CODE",
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors for typed request fields.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., invalid UUID, invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidRange {
            start: NaiveDate::from_ymd_opt(2025, 5, 3).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid date range: end 2025-05-01 is before start 2025-05-03"
        );

        let err = CoreError::ReservationNotFound("abc".to_string());
        assert_eq!(err.to_string(), "Reservation not found: abc");
    }

    #[test]
    fn test_card_error_is_transparent() {
        let core_err: CoreError = CardValidationError::ExpiredCard.into();
        assert!(matches!(
            core_err,
            CoreError::Card(CardValidationError::ExpiredCard)
        ));
        assert_eq!(core_err.to_string(), "Card expired");
    }

    #[test]
    fn test_reason_codes_are_distinct() {
        let codes = [
            CardValidationError::InvalidCardNumber.reason_code(),
            CardValidationError::InvalidCardholderName.reason_code(),
            CardValidationError::MalformedExpiry.reason_code(),
            CardValidationError::ExpiredCard.reason_code(),
            CardValidationError::InvalidSecurityCode.reason_code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "vehicle_id".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
