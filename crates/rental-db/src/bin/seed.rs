//! # Seed Data Generator
//!
//! Populates the database with the rental fleet and a demo customer.
//!
//! ## Usage
//! ```bash
//! # Seed ./rental.db
//! cargo run -p rental-db --bin seed
//!
//! # Specify database path
//! cargo run -p rental-db --bin seed -- --db ./data/rental.db
//! ```
//!
//! Skips everything when the vehicle table already has rows.

use chrono::{NaiveDate, Utc};
use rental_core::{Money, Vehicle};
use rental_db::{Database, DbConfig};
use std::env;
use uuid::Uuid;

/// make, model, category, transmission, body type, seats, image, daily rate,
/// last service, next service, last inspection
type FleetRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    i64,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
);

const FLEET: &[FleetRow] = &[
    ("Toyota", "Yaris", "Carro Pequeno", "Manual", "Carro", 4, "yaris.jpg", "30.00", "2024-01-10", "2025-01-10", "2024-02-10"),
    ("Honda", "Civic", "Carro Médio", "Automática", "Carro", 5, "civic.jpg", "45.00", "2024-01-05", "2025-01-05", "2024-02-01"),
    ("BMW", "X5", "Carro SUV", "Automática", "Carro", 5, "bmw_x5.jpg", "120.00", "2023-08-01", "2024-08-01", "2023-09-01"),
    ("Audi", "A8", "Carro Luxo", "Automática", "Carro", 5, "audi_a8.jpg", "160.00", "2024-01-15", "2025-01-15", "2024-01-20"),
    ("Fiat", "500", "Carro Pequeno", "Manual", "Carro", 4, "fiat_500.jpg", "28.00", "2024-02-01", "2025-02-01", "2024-02-10"),
    ("Kawasaki", "Ninja 400", "Mota Média", "Manual", "Mota", 2, "ninja_400.jpg", "40.00", "2024-03-01", "2025-03-01", "2024-03-10"),
    ("Yamaha", "TMAX", "Mota Grande", "Automática", "Mota", 2, "tmax.jpg", "50.00", "2024-01-20", "2025-01-20", "2024-02-01"),
];

const DEMO_USERNAME: &str = "demo";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = env::var("RENTAL_DB_PATH").unwrap_or_else(|_| "./rental.db".to_string());

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Rental fleet seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: $RENTAL_DB_PATH or ./rental.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Rental fleet seeder");
    println!("======================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.vehicles().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} vehicles", existing);
        println!("  Skipping seed to avoid duplicates.");
        return Ok(());
    }

    for row in FLEET {
        let vehicle = build_vehicle(row)?;
        db.vehicles().insert(&vehicle).await?;
        println!(
            "  + {:<20} {:>10}/day",
            vehicle.display_name(),
            vehicle.daily_rate().to_string()
        );
    }

    if db.customers().get_by_username(DEMO_USERNAME).await?.is_none() {
        let customer = db.customers().create("Demo Customer", DEMO_USERNAME).await?;
        println!();
        println!("✓ Demo customer id: {}", customer.id);
    }

    println!();
    println!("✓ Seeded {} vehicles", FLEET.len());
    println!(
        "{}",
        serde_json::json!({
            "vehicles": db.vehicles().count().await?,
            "customers": db.customers().count().await?,
        })
    );

    Ok(())
}

fn build_vehicle(row: &FleetRow) -> Result<Vehicle, Box<dyn std::error::Error>> {
    let (make, model, category, transmission, body_type, seats, image, rate, last, next, inspection) =
        *row;

    let parse = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d");

    Ok(Vehicle {
        id: Uuid::new_v4().to_string(),
        make: make.to_string(),
        model: model.to_string(),
        category: category.to_string(),
        transmission: transmission.to_string(),
        body_type: body_type.to_string(),
        seats,
        image: Some(image.to_string()),
        daily_rate_cents: rate.parse::<Money>()?.cents(),
        last_service_date: Some(parse(last)?),
        next_service_date: Some(parse(next)?),
        last_inspection_date: Some(parse(inspection)?),
        created_at: Utc::now(),
    })
}
