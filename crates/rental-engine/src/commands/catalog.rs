//! # Catalog Commands

use tracing::debug;

use rental_core::{CoreError, Vehicle};

use crate::error::EngineResult;
use crate::RentalEngine;

impl RentalEngine {
    /// Vehicles without an Active reservation ending today or later.
    ///
    /// `filter` is a case-insensitive substring over make, model, category,
    /// body type, transmission and daily rate; blank means no filter.
    pub async fn list_available(&self, filter: Option<&str>) -> EngineResult<Vec<Vehicle>> {
        let today = self.today();
        debug!(%today, ?filter, "list_available command");

        let vehicles = self.db.vehicles().list_available(today, filter).await?;
        Ok(vehicles)
    }

    /// Gets a vehicle by id.
    pub async fn get_vehicle(&self, id: &str) -> EngineResult<Vehicle> {
        debug!(id = %id, "get_vehicle command");

        self.db
            .vehicles()
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::VehicleNotFound(id.to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{date, fixture, vehicle};
    use crate::{BookingForm, ErrorCode};
    use chrono::Duration;

    #[tokio::test]
    async fn test_booked_vehicle_leaves_catalog_until_cancelled() {
        let fx = fixture().await;
        let engine = &fx.engine;

        assert_eq!(engine.list_available(None).await.unwrap().len(), 1);

        let receipt = engine
            .reserve(
                &fx.ana.id,
                &BookingForm {
                    vehicle_id: fx.yaris.id.clone(),
                    start_date: date(2025, 5, 1),
                    end_date: date(2025, 5, 3),
                },
            )
            .await
            .unwrap();
        assert!(engine.list_available(None).await.unwrap().is_empty());

        engine
            .cancel(&fx.ana.id, &receipt.reservation.id)
            .await
            .unwrap();
        assert_eq!(engine.list_available(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_vehicle_returns_after_last_day() {
        let fx = fixture().await;
        fx.engine
            .reserve(
                &fx.ana.id,
                &BookingForm {
                    vehicle_id: fx.yaris.id.clone(),
                    start_date: date(2025, 5, 1),
                    end_date: date(2025, 5, 3),
                },
            )
            .await
            .unwrap();

        fx.clock.advance(Duration::days(2));
        assert!(fx.engine.list_available(None).await.unwrap().is_empty());

        fx.clock.advance(Duration::days(1));
        assert_eq!(fx.engine.list_available(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_filter_and_lookup() {
        let fx = fixture().await;
        let civic = vehicle("Honda", "Civic", 4500);
        fx.engine.database().vehicles().insert(&civic).await.unwrap();

        let found = fx.engine.list_available(Some("honda")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, civic.id);

        let loaded = fx.engine.get_vehicle(&civic.id).await.unwrap();
        assert_eq!(loaded.daily_rate().cents(), 4500);

        let err = fx.engine.get_vehicle("missing").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::VehicleNotFound);

        let err = fx
            .engine
            .list_available(Some(&"x".repeat(101)))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
