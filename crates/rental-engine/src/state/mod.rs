//! # State Module
//!
//! Transient, per-process state held by the engine.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────────────┐  ┌──────────────────┐      │
//! │  │   Database   │  │   SettlementStore    │  │   Clock          │      │
//! │  │              │  │                      │  │                  │      │
//! │  │  SQLite pool │  │  Mutex<HashMap<      │  │  Arc<dyn Clock>  │      │
//! │  │  (durable)   │  │    identity,         │  │                  │      │
//! │  │              │  │    Settlement>>      │  │                  │      │
//! │  └──────────────┘  └──────────────────────┘  └──────────────────┘      │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • Database: internal connection pool                                  │
//! │  • SettlementStore: Mutex, never held across an await                  │
//! │  • Clock: Send + Sync                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod settlement;

pub use settlement::SettlementStore;
