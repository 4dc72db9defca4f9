//! # Repository Module
//!
//! Database repository implementations for the rental engine.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  RentalEngine                                                          │
//! │       │                                                                 │
//! │       │  db.reservations().amend(id, range, now)                       │
//! │       ▼                                                                 │
//! │  ReservationRepository                                                 │
//! │  ├── create(&self, customer_id, vehicle_id, range, now)                │
//! │  ├── amend(&self, id, range, now)     ← one transaction                │
//! │  ├── cancel(&self, id, now)           ← idempotent                     │
//! │  ├── list_by_customer(&self, customer_id)                              │
//! │  └── purge_inactive(&self, customer_id)                                │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CustomerRepository`](customer::CustomerRepository) - Customer reference data
//! - [`VehicleRepository`](vehicle::VehicleRepository) - Catalog and availability
//! - [`ReservationRepository`](reservation::ReservationRepository) - Reservation store
//! - [`PaymentRepository`](payment::PaymentRepository) - Append-only payment ledger
//! - [`ReportRepository`](report::ReportRepository) - Dashboard reads

pub mod customer;
pub mod payment;
pub mod report;
pub mod reservation;
pub mod vehicle;

/// Fixtures shared by the repository tests.
#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};
    use rental_core::{Customer, Vehicle};
    use uuid::Uuid;

    use crate::{Database, DbConfig};

    pub async fn database() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// The instant repository tests record writes at.
    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap()
    }

    pub fn vehicle(make: &str, model: &str, category: &str, rate_cents: i64) -> Vehicle {
        Vehicle {
            id: Uuid::new_v4().to_string(),
            make: make.to_string(),
            model: model.to_string(),
            category: category.to_string(),
            transmission: "Manual".to_string(),
            body_type: "Carro".to_string(),
            seats: 4,
            image: None,
            daily_rate_cents: rate_cents,
            last_service_date: Some(date(2024, 1, 10)),
            next_service_date: Some(date(2025, 1, 10)),
            last_inspection_date: None,
            created_at: Utc::now(),
        }
    }

    pub fn customer(username: &str) -> Customer {
        Customer {
            id: Uuid::new_v4().to_string(),
            name: format!("Customer {username}"),
            username: username.to_string(),
            created_at: Utc::now(),
        }
    }

    /// A database with one customer and one 30.00/day vehicle.
    pub async fn seeded() -> (Database, Customer, Vehicle) {
        let db = database().await;
        let customer = customer("ana");
        let vehicle = vehicle("Toyota", "Yaris", "Carro Pequeno", 3000);
        db.customers().insert(&customer).await.unwrap();
        db.vehicles().insert(&vehicle).await.unwrap();
        (db, customer, vehicle)
    }
}
