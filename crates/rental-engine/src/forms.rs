//! # Typed Request Forms
//!
//! Inputs accepted by the engine. Raw strings from the presentation layer
//! are parsed here, at the boundary, so commands only see typed dates and
//! validated ids.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use rental_core::validation::ValidationResult;
use rental_core::{CoreResult, DateRange, ValidationError};

pub use rental_core::validation::PaymentForm;

/// Parses a `YYYY-MM-DD` date field.
pub fn parse_date(field: &str, raw: &str) -> ValidationResult<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: e.to_string(),
    })
}

/// New booking request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingForm {
    pub vehicle_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl BookingForm {
    /// Builds the form from raw field values.
    pub fn from_raw(vehicle_id: &str, start_date: &str, end_date: &str) -> ValidationResult<Self> {
        Ok(BookingForm {
            vehicle_id: vehicle_id.trim().to_string(),
            start_date: parse_date("start_date", start_date)?,
            end_date: parse_date("end_date", end_date)?,
        })
    }

    /// Checks the vehicle id and the date order.
    pub fn validate(&self) -> CoreResult<DateRange> {
        if self.vehicle_id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "vehicle_id".to_string(),
            }
            .into());
        }
        DateRange::new(self.start_date, self.end_date)
    }
}

/// Date change for an existing reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateChangeForm {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl DateChangeForm {
    pub fn from_raw(start_date: &str, end_date: &str) -> ValidationResult<Self> {
        Ok(DateChangeForm {
            start_date: parse_date("start_date", start_date)?,
            end_date: parse_date("end_date", end_date)?,
        })
    }

    pub fn validate(&self) -> CoreResult<DateRange> {
        DateRange::new(self.start_date, self.end_date)
    }
}
