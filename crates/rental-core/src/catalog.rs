//! # Catalog Filter
//!
//! The free-text filter of the vehicle catalog.
//!
//! Availability itself is a storage query (vehicles with no Active
//! reservation ending today or later); this module only decides whether a
//! vehicle matches what the customer typed.
//!
//! ```text
//!   "médio" ──lowercase──► matches any of:
//!       make │ model │ category │ body type │ transmission │ "30.00"
//! ```

use crate::error::ValidationError;
use crate::types::Vehicle;
use crate::MAX_SEARCH_QUERY_LEN;

/// Normalizes a raw search box value.
///
/// Returns `None` for an absent or blank query, which means "no filter".
pub fn normalize_filter(raw: Option<&str>) -> Result<Option<String>, ValidationError> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    let query = raw.trim();
    if query.is_empty() {
        return Ok(None);
    }

    if query.chars().count() > MAX_SEARCH_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "filter".to_string(),
            max: MAX_SEARCH_QUERY_LEN,
        });
    }

    Ok(Some(query.to_lowercase()))
}

/// Case-insensitive substring match across the searchable vehicle fields.
///
/// `needle` must already be lower-cased (see [`normalize_filter`]).
pub fn matches_filter(vehicle: &Vehicle, needle: &str) -> bool {
    let rate = vehicle.daily_rate().to_decimal_string();

    [
        vehicle.make.as_str(),
        vehicle.model.as_str(),
        vehicle.category.as_str(),
        vehicle.body_type.as_str(),
        vehicle.transmission.as_str(),
        rate.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn vehicle() -> Vehicle {
        Vehicle {
            id: "v-1".to_string(),
            make: "Honda".to_string(),
            model: "Civic".to_string(),
            category: "Carro Médio".to_string(),
            transmission: "Automática".to_string(),
            body_type: "Carro".to_string(),
            seats: 5,
            image: Some("civic.jpg".to_string()),
            daily_rate_cents: 4500,
            last_service_date: None,
            next_service_date: None,
            last_inspection_date: None,
            created_at: Utc::now(),
        }
    }

    fn matches(raw: &str) -> bool {
        let needle = normalize_filter(Some(raw)).unwrap().unwrap();
        matches_filter(&vehicle(), &needle)
    }

    #[test]
    fn test_matches_each_field() {
        assert!(matches("honda"));
        assert!(matches("CIV"));
        assert!(matches("médio"));
        assert!(matches("MÉDIO"));
        assert!(matches("automática"));
        assert!(matches("carro"));
        assert!(matches("45.00"));
        assert!(matches("45"));
    }

    #[test]
    fn test_rejects_unrelated_text() {
        assert!(!matches("yamaha"));
        assert!(!matches("30.00"));
    }

    #[test]
    fn test_blank_filter_means_none() {
        assert_eq!(normalize_filter(None).unwrap(), None);
        assert_eq!(normalize_filter(Some("   ")).unwrap(), None);
    }

    #[test]
    fn test_overlong_filter_rejected() {
        let long = "a".repeat(MAX_SEARCH_QUERY_LEN + 1);
        assert!(matches!(
            normalize_filter(Some(&long)),
            Err(ValidationError::TooLong { .. })
        ));
    }
}
