//! # Engine Error Type
//!
//! Unified error type returned by every engine operation.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Rental Engine                      │
//! │                                                                         │
//! │  Caller                      Engine                                     │
//! │  ──────                      ──────                                     │
//! │                                                                         │
//! │  engine.validate_and_record(..)                                         │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command                                                         │  │
//! │  │  EngineResult<T>                                                 │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Card rejected? ── CardValidationError ──────────┐              │  │
//! │  │         │                                        │              │  │
//! │  │         ▼                                        ▼              │  │
//! │  │  Rule violated? ── CoreError ─────────────── EngineError ──────►│  │
//! │  │         │                                        ▲              │  │
//! │  │         ▼                                        │              │  │
//! │  │  Storage failed? ── DbError::QueryFailed ───────┘              │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  { "code": "INVALID_CARD_NUMBER",                                       │
//! │    "message": "Invalid card number: must have 13 or 15 digits" }        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Payment rejections are recoverable: the pending settlement survives and
//! the form can be submitted again. Everything else fails the operation.

use rental_core::{CardValidationError, CoreError};
use rental_db::DbError;
use serde::Serialize;

use crate::config::ConfigError;

/// Error returned from engine operations.
///
/// ## Serialization
/// ```json
/// {
///   "code": "RESERVATION_NOT_FOUND",
///   "message": "Reservation not found: 5f0c..."
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineError {
    /// Machine-readable reason code
    pub code: ErrorCode,

    /// Human-readable message for display
    pub message: String,
}

/// Reason codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// End date before start date
    InvalidRange,
    VehicleNotFound,
    CustomerNotFound,
    /// Unknown id, or a reservation owned by another identity
    ReservationNotFound,
    InvalidCardNumber,
    InvalidCardholderName,
    MalformedExpiry,
    ExpiredCard,
    InvalidSecurityCode,
    /// Dates overlap another Active reservation of the vehicle
    ReservationConflict,
    /// Amendment of a Cancelled reservation
    ReservationCancelled,
    /// Malformed input outside the card form
    ValidationError,
    DatabaseError,
    Internal,
}

impl ErrorCode {
    /// True for payment-form rejections: the caller may fix the field and
    /// resubmit while the settlement stays open.
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ErrorCode::InvalidCardNumber
                | ErrorCode::InvalidCardholderName
                | ErrorCode::MalformedExpiry
                | ErrorCode::ExpiredCard
                | ErrorCode::InvalidSecurityCode
        )
    }
}

impl EngineError {
    /// Creates a new engine error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        EngineError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        EngineError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        EngineError::new(ErrorCode::Internal, message)
    }

    /// Shorthand for `ReservationNotFound`.
    pub fn reservation_not_found(id: &str) -> Self {
        CoreError::ReservationNotFound(id.to_string()).into()
    }

    /// See [`ErrorCode::is_recoverable`].
    pub fn is_recoverable(&self) -> bool {
        self.code.is_recoverable()
    }
}

/// Convenience type alias for engine results.
pub type EngineResult<T> = Result<T, EngineError>;

impl From<CardValidationError> for EngineError {
    fn from(err: CardValidationError) -> Self {
        let code = match err {
            CardValidationError::InvalidCardNumber => ErrorCode::InvalidCardNumber,
            CardValidationError::InvalidCardholderName => ErrorCode::InvalidCardholderName,
            CardValidationError::MalformedExpiry => ErrorCode::MalformedExpiry,
            CardValidationError::ExpiredCard => ErrorCode::ExpiredCard,
            CardValidationError::InvalidSecurityCode => ErrorCode::InvalidSecurityCode,
        };
        EngineError::new(code, err.to_string())
    }
}

/// Converts core errors to engine errors.
impl From<CoreError> for EngineError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::InvalidRange { .. } => EngineError::new(ErrorCode::InvalidRange, message),
            CoreError::VehicleNotFound(_) => EngineError::new(ErrorCode::VehicleNotFound, message),
            CoreError::CustomerNotFound(_) => {
                EngineError::new(ErrorCode::CustomerNotFound, message)
            }
            CoreError::ReservationNotFound(_) => {
                EngineError::new(ErrorCode::ReservationNotFound, message)
            }
            CoreError::ReservationCancelled(_) => {
                EngineError::new(ErrorCode::ReservationCancelled, message)
            }
            CoreError::ReservationConflict { .. } => {
                EngineError::new(ErrorCode::ReservationConflict, message)
            }
            CoreError::Card(card) => card.into(),
            CoreError::PriceOverflow { .. } | CoreError::Validation(_) => {
                EngineError::validation(message)
            }
        }
    }
}

/// Converts database errors to engine errors.
impl From<DbError> for EngineError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Domain(core) => core.into(),
            DbError::NotFound { entity, id } => match entity.as_str() {
                "Reservation" => CoreError::ReservationNotFound(id).into(),
                "Vehicle" => CoreError::VehicleNotFound(id).into(),
                "Customer" => CoreError::CustomerNotFound(id).into(),
                _ => {
                    tracing::error!(%entity, %id, "Unexpected missing row");
                    EngineError::new(ErrorCode::DatabaseError, "Database operation failed")
                }
            },
            DbError::UniqueViolation { field, value } => {
                EngineError::validation(format!("{} '{}' already exists", field, value))
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                EngineError::validation("Invalid reference")
            }
            DbError::ConnectionFailed(_) => {
                EngineError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                EngineError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                EngineError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::PoolExhausted => {
                EngineError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                EngineError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

impl From<ConfigError> for EngineError {
    fn from(err: ConfigError) -> Self {
        EngineError::internal(err.to_string())
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for EngineError {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rental_core::ValidationError;

    #[test]
    fn test_core_errors_keep_their_reason() {
        let day = NaiveDate::from_ymd_opt(2025, 5, 3).unwrap();
        let err: EngineError = CoreError::InvalidRange {
            start: day,
            end: day.pred_opt().unwrap(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::InvalidRange);

        let err: EngineError = CoreError::ReservationConflict {
            vehicle_id: "v1".to_string(),
            start: day,
            end: day,
        }
        .into();
        assert_eq!(err.code, ErrorCode::ReservationConflict);
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_card_errors_are_recoverable() {
        let err: EngineError = CoreError::Card(CardValidationError::ExpiredCard).into();
        assert_eq!(err.code, ErrorCode::ExpiredCard);
        assert!(err.is_recoverable());

        let err: EngineError = CardValidationError::InvalidSecurityCode.into();
        assert_eq!(err.code, ErrorCode::InvalidSecurityCode);
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_db_errors_map_to_codes() {
        let err: EngineError =
            DbError::Domain(CoreError::VehicleNotFound("v9".to_string())).into();
        assert_eq!(err.code, ErrorCode::VehicleNotFound);
        assert_eq!(err.message, "Vehicle not found: v9");

        let err: EngineError = DbError::not_found("Reservation", "r1").into();
        assert_eq!(err.code, ErrorCode::ReservationNotFound);

        let err: EngineError = DbError::QueryFailed("disk I/O error".to_string()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.message, "Database operation failed");

        let err: EngineError = DbError::duplicate("customers.username", "ana").into();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err: EngineError = CoreError::Validation(ValidationError::Required {
            field: "vehicle_id".to_string(),
        })
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err: EngineError = DbError::Domain(CoreError::PriceOverflow {
            days: 10,
            daily_rate_cents: i64::MAX,
        })
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_serialized_shape() {
        let err = EngineError::reservation_not_found("r1");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "RESERVATION_NOT_FOUND");
        assert_eq!(json["message"], "Reservation not found: r1");
        assert_eq!(err.to_string(), "[ReservationNotFound] Reservation not found: r1");
    }
}
