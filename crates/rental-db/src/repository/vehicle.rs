//! # Vehicle Repository
//!
//! Catalog reads over the vehicle table.
//!
//! ## Availability
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  A vehicle is available iff NO reservation exists with                  │
//! │      status = 'active'  AND  end_date >= today                          │
//! │                                                                         │
//! │  vehicles ──► id NOT IN (active reservations ending today or later)     │
//! │          ──► catalog::matches_filter (make, model, category,            │
//! │                                       body type, transmission, rate)    │
//! │                                                                         │
//! │  Recomputed on every call from reservation rows; there is no            │
//! │  "available" flag to go stale.                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use rental_core::catalog::{matches_filter, normalize_filter};
use rental_core::validation::validate_daily_rate_cents;
use rental_core::{CoreError, Vehicle};

const VEHICLE_COLUMNS: &str = "id, make, model, category, transmission, body_type, seats, image, \
     daily_rate_cents, last_service_date, next_service_date, last_inspection_date, created_at";

/// Repository for vehicle database operations.
#[derive(Debug, Clone)]
pub struct VehicleRepository {
    pool: SqlitePool,
}

impl VehicleRepository {
    /// Creates a new VehicleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        VehicleRepository { pool }
    }

    /// Lists vehicles available as of `today`, optionally filtered.
    ///
    /// ## Arguments
    /// * `today` - Reservations ending before this date no longer block
    /// * `filter` - Case-insensitive substring; blank means no filter
    pub async fn list_available(
        &self,
        today: NaiveDate,
        filter: Option<&str>,
    ) -> DbResult<Vec<Vehicle>> {
        let needle = normalize_filter(filter).map_err(CoreError::from)?;

        debug!(%today, filter = ?needle, "Listing available vehicles");

        let sql = format!(
            r#"
            SELECT {VEHICLE_COLUMNS}
            FROM vehicles
            WHERE id NOT IN (
                SELECT vehicle_id FROM reservations
                WHERE status = 'active' AND end_date >= ?1
            )
            ORDER BY make, model, id
            "#
        );

        let vehicles = sqlx::query_as::<_, Vehicle>(&sql)
            .bind(today)
            .fetch_all(&self.pool)
            .await?;

        let vehicles = match needle {
            Some(needle) => vehicles
                .into_iter()
                .filter(|v| matches_filter(v, &needle))
                .collect(),
            None => vehicles,
        };

        debug!(count = vehicles.len(), "Available vehicles");
        Ok(vehicles)
    }

    /// Gets a vehicle by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Vehicle>> {
        let sql = format!("SELECT {VEHICLE_COLUMNS} FROM vehicles WHERE id = ?1");

        let vehicle = sqlx::query_as::<_, Vehicle>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    /// Lists the whole fleet regardless of availability.
    pub async fn list_all(&self) -> DbResult<Vec<Vehicle>> {
        let sql = format!("SELECT {VEHICLE_COLUMNS} FROM vehicles ORDER BY make, model, id");

        let vehicles = sqlx::query_as::<_, Vehicle>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(vehicles)
    }

    /// Inserts a vehicle (seed data, fixtures).
    pub async fn insert(&self, vehicle: &Vehicle) -> DbResult<()> {
        validate_daily_rate_cents(vehicle.daily_rate_cents).map_err(CoreError::from)?;

        debug!(id = %vehicle.id, name = %vehicle.display_name(), "Inserting vehicle");

        sqlx::query(
            r#"
            INSERT INTO vehicles (
                id, make, model, category, transmission, body_type, seats, image,
                daily_rate_cents, last_service_date, next_service_date,
                last_inspection_date, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&vehicle.id)
        .bind(&vehicle.make)
        .bind(&vehicle.model)
        .bind(&vehicle.category)
        .bind(&vehicle.transmission)
        .bind(&vehicle.body_type)
        .bind(vehicle.seats)
        .bind(&vehicle.image)
        .bind(vehicle.daily_rate_cents)
        .bind(vehicle.last_service_date)
        .bind(vehicle.next_service_date)
        .bind(vehicle.last_inspection_date)
        .bind(vehicle.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Counts vehicles.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM vehicles")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
