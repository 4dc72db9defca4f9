//! # Rental Engine
//!
//! The reservation & settlement engine: every operation a signed-in
//! customer can perform, scoped to the identity the session transport
//! vouches for.
//!
//! ## Module Organization
//! ```text
//! rental_engine/
//! ├── lib.rs          ◄─── RentalEngine, tracing setup
//! ├── clock.rs        ◄─── Clock trait, SystemClock, FixedClock
//! ├── config.rs       ◄─── EngineConfig from RENTAL_* variables
//! ├── error.rs        ◄─── EngineError { code, message }
//! ├── forms.rs        ◄─── Typed booking / date-change / payment input
//! ├── state/
//! │   ├── mod.rs      ◄─── State exports
//! │   └── settlement.rs ◄─ Per-identity settlement sessions
//! └── commands/
//!     ├── mod.rs      ◄─── Ownership check shared by commands
//!     ├── catalog.rs  ◄─── list_available, get_vehicle
//!     ├── booking.rs  ◄─── reserve, amend, cancel, my_reservations, purge
//!     ├── payment.rs  ◄─── payment_view, validate_and_record
//!     └── report.rs   ◄─── dashboard
//! ```
//!
//! ## Booking Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  list_available ──► reserve ──► pricing ──► settlement.open(due)        │
//! │                                                 │                       │
//! │                                                 ▼                       │
//! │                   payment_view ◄── settlement.peek()                    │
//! │                        │                                                │
//! │                        ▼                                                │
//! │  validate_and_record ──► ledger append ──► settlement.close()           │
//! │                                                                         │
//! │  amend ──► re-price ──► settlement.open(new total, delta) ──► pay again │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod clock;
pub mod commands;
pub mod config;
pub mod error;
pub mod forms;
pub mod state;

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;
use tracing_subscriber::EnvFilter;

use rental_db::Database;

pub use clock::{Clock, FixedClock, SystemClock};
pub use commands::booking::{AmendmentReceipt, BookingReceipt};
pub use commands::payment::PaymentScreen;
pub use config::{ConfigError, EngineConfig};
pub use error::{EngineError, EngineResult, ErrorCode};
pub use forms::{BookingForm, DateChangeForm, PaymentForm};
pub use state::SettlementStore;

/// The engine handle.
///
/// Holds the database, the settlement sessions and the clock. Commands are
/// implemented on this type in [`commands`].
#[derive(Debug)]
pub struct RentalEngine {
    db: Database,
    settlements: SettlementStore,
    clock: Arc<dyn Clock>,
}

impl RentalEngine {
    /// Builds an engine over an open database.
    pub fn new(db: Database, clock: Arc<dyn Clock>, settlement_ttl: chrono::Duration) -> Self {
        RentalEngine {
            db,
            settlements: SettlementStore::new(settlement_ttl),
            clock,
        }
    }

    /// Opens the configured database (running migrations) on the wall clock.
    pub async fn connect(config: &EngineConfig) -> EngineResult<Self> {
        info!(db_path = %config.db_path.display(), "Starting rental engine");

        let db = Database::new(config.db_config()).await?;
        Ok(Self::new(db, Arc::new(SystemClock), config.settlement_ttl()))
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn settlements(&self) -> &SettlementStore {
        &self.settlements
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=rental_db=trace` - Trace a single crate
/// - Default: `info,rental=debug,sqlx=warn`
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,rental=debug,sqlx=warn"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Fixtures shared by the command tests.
#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use chrono::{Duration, NaiveDate, Utc};
    use rental_core::{Customer, Vehicle};
    use rental_db::{Database, DbConfig};
    use uuid::Uuid;

    use crate::{FixedClock, RentalEngine};

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn vehicle(make: &str, model: &str, rate_cents: i64) -> Vehicle {
        Vehicle {
            id: Uuid::new_v4().to_string(),
            make: make.to_string(),
            model: model.to_string(),
            category: "Carro Pequeno".to_string(),
            transmission: "Manual".to_string(),
            body_type: "Carro".to_string(),
            seats: 4,
            image: None,
            daily_rate_cents: rate_cents,
            last_service_date: None,
            next_service_date: None,
            last_inspection_date: None,
            created_at: Utc::now(),
        }
    }

    pub struct Fixture {
        pub engine: RentalEngine,
        pub clock: Arc<FixedClock>,
        pub ana: Customer,
        pub rui: Customer,
        pub yaris: Vehicle,
    }

    /// Engine on 2025-05-01 with customers "ana" and "rui" and a
    /// 30.00/day Toyota Yaris.
    pub async fn fixture() -> Fixture {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let ana = db.customers().create("Ana Sousa", "ana").await.unwrap();
        let rui = db.customers().create("Rui Costa", "rui").await.unwrap();
        let yaris = vehicle("Toyota", "Yaris", 3000);
        db.vehicles().insert(&yaris).await.unwrap();

        let clock = Arc::new(FixedClock::at_date(date(2025, 5, 1)));
        let engine = RentalEngine::new(db, clock.clone(), Duration::minutes(30));

        Fixture {
            engine,
            clock,
            ana,
            rui,
            yaris,
        }
    }
}
