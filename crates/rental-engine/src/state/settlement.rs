//! # Settlement Sessions
//!
//! Pending balances keyed by authenticated identity, bridging a booking or
//! amendment to the payment that settles it.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Settlement Session Operations                        │
//! │                                                                         │
//! │  Engine Step               Store Call            Entry for identity     │
//! │  ───────────               ──────────            ──────────────────     │
//! │                                                                         │
//! │  reserve(r) ─────────────► open(r, due, 0) ────► replaced              │
//! │                                                                         │
//! │  amend(r) ───────────────► open(r, due, delta) ► replaced              │
//! │                                                                         │
//! │  payment_view(r) ────────► peek(r) ────────────► (read only)           │
//! │                                                                         │
//! │  card rejected ──────────► (nothing) ──────────► kept                  │
//! │                                                                         │
//! │  payment for r ──────────► close(r) ───────────► removed               │
//! │  payment for other ──────► close(other) ───────► kept                  │
//! │                                                                         │
//! │  TTL elapsed ────────────► any call ───────────► treated as absent     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sessions never leak across identities: every call is keyed by the
//! identity the caller was authenticated as. Within an identity, reads and
//! closes name the reservation, and an entry opened for another reservation
//! is invisible to them.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use rental_core::{Money, Settlement, SettlementView};

/// Per-identity settlement sessions with a time-to-live.
#[derive(Debug)]
pub struct SettlementStore {
    sessions: Mutex<HashMap<String, Settlement>>,
    ttl: Duration,
}

impl SettlementStore {
    /// Creates an empty store whose entries expire after `ttl`.
    pub fn new(ttl: Duration) -> Self {
        SettlementStore {
            sessions: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Opens (or replaces) the session for `identity`, owed on
    /// `reservation_id`.
    ///
    /// A negative `amount_delta` is stored as zero. Expired sessions of
    /// other identities are dropped on the way.
    pub fn open(
        &self,
        identity: &str,
        reservation_id: &str,
        amount_due: Money,
        amount_delta: Money,
        now: DateTime<Utc>,
    ) -> SettlementView {
        let settlement = Settlement::new(reservation_id, amount_due, amount_delta, now);
        let view = settlement.view();

        self.with_sessions(|sessions| {
            let ttl = self.ttl;
            sessions.retain(|_, s| !s.is_expired(now, ttl));
            sessions.insert(identity.to_string(), settlement);
        });

        debug!(
            identity = %identity,
            reservation_id = %reservation_id,
            amount_due = %view.amount_due,
            amount_delta = %view.amount_delta,
            "Settlement opened"
        );
        view
    }

    /// Reads the session for `reservation_id` without consuming it.
    pub fn peek(
        &self,
        identity: &str,
        reservation_id: &str,
        now: DateTime<Utc>,
    ) -> Option<SettlementView> {
        self.get(identity, reservation_id, now).map(|s| s.view())
    }

    /// The live settlement for `identity` if it is owed on `reservation_id`.
    /// An expired entry is dropped.
    pub fn get(
        &self,
        identity: &str,
        reservation_id: &str,
        now: DateTime<Utc>,
    ) -> Option<Settlement> {
        self.live(identity, now).filter(|s| s.settles(reservation_id))
    }

    /// Clears the session if it is owed on `reservation_id`. Returns it if
    /// it was still live.
    ///
    /// A session opened for another reservation is left in place.
    pub fn close(
        &self,
        identity: &str,
        reservation_id: &str,
        now: DateTime<Utc>,
    ) -> Option<Settlement> {
        let ttl = self.ttl;
        let removed = self.with_sessions(|sessions| {
            let removable = sessions
                .get(identity)
                .is_some_and(|s| s.settles(reservation_id) || s.is_expired(now, ttl));
            if removable {
                sessions.remove(identity)
            } else {
                None
            }
        });

        match removed {
            Some(s) if s.settles(reservation_id) && !s.is_expired(now, ttl) => {
                debug!(identity = %identity, reservation_id = %reservation_id, "Settlement closed");
                Some(s)
            }
            _ => None,
        }
    }

    /// Drops every expired session. Returns how many were removed.
    pub fn prune_expired(&self, now: DateTime<Utc>) -> usize {
        let ttl = self.ttl;
        let removed = self.with_sessions(|sessions| {
            let before = sessions.len();
            sessions.retain(|_, s| !s.is_expired(now, ttl));
            before - sessions.len()
        });

        if removed > 0 {
            debug!(removed, "Pruned expired settlements");
        }
        removed
    }

    /// Number of stored sessions, expired ones included.
    pub fn len(&self) -> usize {
        self.with_sessions(|sessions| sessions.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn live(&self, identity: &str, now: DateTime<Utc>) -> Option<Settlement> {
        let ttl = self.ttl;
        self.with_sessions(|sessions| {
            let expired = sessions.get(identity)?.is_expired(now, ttl);
            if expired {
                sessions.remove(identity);
                None
            } else {
                sessions.get(identity).cloned()
            }
        })
    }

    fn with_sessions<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut HashMap<String, Settlement>) -> R,
    {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut sessions)
    }
}
