//! # Dashboard Report
//!
//! Prints the dashboard indicators of the configured database as JSON.
//!
//! ## Usage
//! ```bash
//! # Report on ./rental.db
//! cargo run -p rental-engine --bin rental-report
//!
//! # Another database
//! RENTAL_DB_PATH=./data/rental.db cargo run -p rental-engine --bin rental-report
//! ```

use rental_engine::{init_tracing, EngineConfig, RentalEngine};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = EngineConfig::load()?;
    let engine = RentalEngine::connect(&config).await?;

    let summary = engine.dashboard().await?;
    info!(
        customers = summary.total_customers,
        vehicles = summary.total_vehicles,
        active = summary.active_reservations,
        "Dashboard computed"
    );

    println!("{}", serde_json::to_string_pretty(&summary)?);

    engine.database().close().await;
    Ok(())
}
