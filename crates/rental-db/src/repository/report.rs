//! # Report Repository
//!
//! Loads the rows behind the dashboard and hands them to
//! [`rental_core::report::summarize`].

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::customer::CustomerRepository;
use crate::repository::reservation::ReservationRepository;
use crate::repository::vehicle::VehicleRepository;
use rental_core::report::{self, DashboardSummary};

/// Read-only access for reporting.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Builds the dashboard figures as of `today`.
    pub async fn dashboard(&self, today: NaiveDate) -> DbResult<DashboardSummary> {
        let customers = CustomerRepository::new(self.pool.clone()).list_all().await?;
        let vehicles = VehicleRepository::new(self.pool.clone()).count().await?;
        let reservations = ReservationRepository::new(self.pool.clone())
            .list_all()
            .await?;

        debug!(
            customers = customers.len(),
            vehicles,
            reservations = reservations.len(),
            "Summarizing dashboard"
        );

        Ok(report::summarize(
            today,
            &customers,
            vehicles.max(0) as u64,
            &reservations,
        ))
    }
}
