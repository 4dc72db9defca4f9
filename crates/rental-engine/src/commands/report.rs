//! # Report Commands

use tracing::debug;

use rental_core::report::DashboardSummary;

use crate::error::EngineResult;
use crate::RentalEngine;

impl RentalEngine {
    /// Dashboard indicators as of the engine's today.
    pub async fn dashboard(&self) -> EngineResult<DashboardSummary> {
        let today = self.today();
        debug!(%today, "dashboard command");

        let summary = self.db.reports().dashboard(today).await?;
        Ok(summary)
    }
}
