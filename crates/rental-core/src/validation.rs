//! # Validation Module
//!
//! Boundary validation for the rental engine.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation (external)                                      │
//! │  ├── Raw form strings                                                  │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── PaymentForm ──► CardDetails (first failure wins)                  │
//! │  └── Identifiers and reference-data fields                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (end_date >= start_date), status CHECK                      │
//! │  ├── UNIQUE username                                                   │
//! │  └── Foreign keys, append-only payments                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use chrono::NaiveDate;
//! use rental_core::validation::{validate_card, PaymentForm};
//!
//! let form = PaymentForm {
//!     card_number: "4111 1111 1111 1".to_string(),
//!     cardholder_name: "Ana Sousa".to_string(),
//!     expiry: "2030-01".to_string(),
//!     security_code: "123".to_string(),
//! };
//! let today = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
//! let card = validate_card(&form, today).unwrap();
//! assert_eq!(card.card_number, "4111111111111");
//! ```

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CardValidationError, ValidationError};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Payment Form
// =============================================================================

/// Card fields exactly as submitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentForm {
    pub card_number: String,
    pub cardholder_name: String,
    /// Expected as `YYYY-MM`.
    pub expiry: String,
    pub security_code: String,
}

/// Card expiry month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CardExpiry {
    pub year: i32,
    pub month: u32,
}

impl CardExpiry {
    /// Parses `YYYY-MM`. Any other shape, or a month outside 1-12, is
    /// `MalformedExpiry`.
    pub fn parse(raw: &str) -> Result<Self, CardValidationError> {
        let mut parts = raw.trim().split('-');
        let (Some(year), Some(month), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(CardValidationError::MalformedExpiry);
        };

        let year: i32 = year
            .trim()
            .parse()
            .map_err(|_| CardValidationError::MalformedExpiry)?;
        let month: u32 = month
            .trim()
            .parse()
            .map_err(|_| CardValidationError::MalformedExpiry)?;

        // Rejects month 0 / 13 and out-of-range years.
        NaiveDate::from_ymd_opt(year, month, 1).ok_or(CardValidationError::MalformedExpiry)?;

        Ok(Self { year, month })
    }

    /// The card is valid through the whole expiry month.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        (self.year, self.month) < (today.year(), today.month())
    }
}

impl std::fmt::Display for CardExpiry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// A validated card, ready to be appended to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDetails {
    /// Digits only.
    pub card_number: String,
    /// Trimmed.
    pub cardholder_name: String,
    pub expiry: CardExpiry,
    pub security_code: String,
}

// =============================================================================
// Card Validators
// =============================================================================

/// Validates a payment form. Checks run in a fixed order and the first
/// failure is returned:
///
/// 1. card number: 13 or 15 digits once non-digits are stripped
/// 2. cardholder name: letters (accented included) and spaces, non-empty
/// 3. expiry: `YYYY-MM`, not before the current month
/// 4. security code: 3 or 4 digits
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Payment form submitted                                                 │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_card(form, today) ← THIS FUNCTION                            │
/// │       │                                                                 │
/// │       ├── Err(reason) → shown to the user, settlement stays open       │
/// │       │                                                                 │
/// │       └── Ok(card) → payment row appended, settlement closed           │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_card(
    form: &PaymentForm,
    today: NaiveDate,
) -> Result<CardDetails, CardValidationError> {
    let card_number = validate_card_number(&form.card_number)?;
    let cardholder_name = validate_cardholder_name(&form.cardholder_name)?;
    let expiry = validate_expiry(&form.expiry, today)?;
    let security_code = validate_security_code(&form.security_code)?;

    Ok(CardDetails {
        card_number,
        cardholder_name,
        expiry,
        security_code,
    })
}

/// Strips every non-digit and requires exactly 13 or 15 digits.
pub fn validate_card_number(raw: &str) -> Result<String, CardValidationError> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    match digits.len() {
        13 | 15 => Ok(digits),
        _ => Err(CardValidationError::InvalidCardNumber),
    }
}

/// Letters (any script, accents included) and spaces only.
pub fn validate_cardholder_name(raw: &str) -> Result<String, CardValidationError> {
    let name = raw.trim();

    if name.is_empty() || !name.chars().all(|c| c.is_alphabetic() || c == ' ') {
        return Err(CardValidationError::InvalidCardholderName);
    }

    Ok(name.to_string())
}

/// Parses the expiry and rejects months before the current one.
pub fn validate_expiry(raw: &str, today: NaiveDate) -> Result<CardExpiry, CardValidationError> {
    let expiry = CardExpiry::parse(raw)?;

    if expiry.is_expired(today) {
        return Err(CardValidationError::ExpiredCard);
    }

    Ok(expiry)
}

/// Exactly 3 or 4 ASCII digits.
pub fn validate_security_code(raw: &str) -> Result<String, CardValidationError> {
    let code = raw.trim();

    if !(3..=4).contains(&code.len()) || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(CardValidationError::InvalidSecurityCode);
    }

    Ok(code.to_string())
}

// =============================================================================
// Reference Data Validators
// =============================================================================

/// Validates a customer display name.
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a username.
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Letters, digits, `.`, `-`, `_`
pub fn validate_username(username: &str) -> ValidationResult<()> {
    let username = username.trim();

    if username.is_empty() {
        return Err(ValidationError::Required {
            field: "username".to_string(),
        });
    }

    if username.chars().count() > 50 {
        return Err(ValidationError::TooLong {
            field: "username".to_string(),
            max: 50,
        });
    }

    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "username".to_string(),
            reason: "must contain only letters, numbers, dots, hyphens, and underscores"
                .to_string(),
        });
    }

    Ok(())
}

/// Validates a daily rate in cents. Zero is allowed.
pub fn validate_daily_rate_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "daily_rate".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use rental_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
