//! # Settlement Values
//!
//! The amount a customer owes between a booking (or amendment) and the
//! payment that follows it.
//!
//! ```text
//!  reserve ──► Settlement { due: €90.00, delta: €0.00 }  ──► "Pay €90.00"
//!  amend   ──► Settlement { due: €150.00, delta: €60.00 } ──► "Pay €150.00
//!                                                             (+€60.00 after change)"
//!  pay     ──► session closed
//! ```
//!
//! A settlement belongs to the reservation whose booking or amendment opened
//! it, and only a payment for that reservation settles it.
//!
//! Only the value types live here; the per-identity store with expiry is
//! owned by the engine.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// A pending balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Settlement {
    pub reservation_id: String,
    pub amount_due: Money,
    /// Extra owed after an amendment. Never negative.
    pub amount_delta: Money,
    #[ts(as = "String")]
    pub opened_at: DateTime<Utc>,
}

impl Settlement {
    /// Opens a settlement. A negative delta (the rental got cheaper) is
    /// stored as zero: there is nothing additional to show.
    pub fn new(
        reservation_id: impl Into<String>,
        amount_due: Money,
        amount_delta: Money,
        opened_at: DateTime<Utc>,
    ) -> Self {
        let amount_delta = if amount_delta.is_negative() {
            Money::zero()
        } else {
            amount_delta
        };

        Self {
            reservation_id: reservation_id.into(),
            amount_due,
            amount_delta,
            opened_at,
        }
    }

    /// True when the settlement was opened for `reservation_id`.
    pub fn settles(&self, reservation_id: &str) -> bool {
        self.reservation_id == reservation_id
    }

    /// True once `ttl` has elapsed since the settlement was opened.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.opened_at >= ttl
    }

    /// What the payment screen renders.
    pub fn view(&self) -> SettlementView {
        SettlementView {
            amount_due: self.amount_due,
            show_delta: self.amount_delta.is_positive(),
            amount_delta: self.amount_delta,
        }
    }
}

/// Read-only projection of a settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SettlementView {
    pub amount_due: Money,
    /// Distinguishes "additional balance after an amendment" from a first
    /// payment.
    pub show_delta: bool,
    pub amount_delta: Money,
}

impl SettlementView {
    /// View shown when nothing is pending.
    pub const fn empty() -> Self {
        Self {
            amount_due: Money::zero(),
            show_delta: false,
            amount_delta: Money::zero(),
        }
    }
}
