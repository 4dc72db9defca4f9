//! # Booking Commands
//!
//! Reserve, amend, cancel, list and purge, always on behalf of `identity`.
//!
//! ```text
//! reserve(identity, form)
//!   ├── form.validate()                     → InvalidRange / ValidationError
//!   ├── reservations().create(..)           → Vehicle/CustomerNotFound,
//!   │                                          ReservationConflict
//!   └── settlements.open(identity, reservation, total, 0)
//!
//! amend(identity, id, form)
//!   ├── owned_reservation(identity, id)     → ReservationNotFound
//!   ├── reservations().amend(id, range)     → one transaction
//!   └── settlements.open(identity, reservation, new total, delta)
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use rental_core::{Money, PurgeOutcome, Reservation, ReservationView, SettlementView};

use crate::error::EngineResult;
use crate::forms::{BookingForm, DateChangeForm};
use crate::RentalEngine;

/// Result of a successful booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingReceipt {
    pub reservation: Reservation,
    /// The settlement opened for the new reservation.
    pub settlement: SettlementView,
}

/// Result of a successful date change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmendmentReceipt {
    pub reservation: Reservation,
    pub previous_total: Money,
    /// New total minus previous total; negative when the rental got cheaper.
    pub price_delta: Money,
    pub settlement: SettlementView,
}

impl RentalEngine {
    /// Books a vehicle for `identity` and opens the settlement for its total.
    pub async fn reserve(&self, identity: &str, form: &BookingForm) -> EngineResult<BookingReceipt> {
        debug!(identity = %identity, vehicle_id = %form.vehicle_id, "reserve command");

        let range = form.validate()?;
        let reservation = self
            .db
            .reservations()
            .create(identity, &form.vehicle_id, range, self.now())
            .await?;

        let settlement = self.settlements.open(
            identity,
            &reservation.id,
            reservation.total(),
            Money::zero(),
            self.now(),
        );

        info!(
            identity = %identity,
            reservation_id = %reservation.id,
            total = %reservation.total(),
            "Reservation created"
        );

        Ok(BookingReceipt {
            reservation,
            settlement,
        })
    }

    /// Changes the dates of one of `identity`'s reservations.
    ///
    /// The settlement is reopened with the new total as the amount due and
    /// the price increase, if any, as the delta.
    pub async fn amend(
        &self,
        identity: &str,
        reservation_id: &str,
        form: &DateChangeForm,
    ) -> EngineResult<AmendmentReceipt> {
        debug!(identity = %identity, reservation_id = %reservation_id, "amend command");

        let range = form.validate()?;
        self.owned_reservation(identity, reservation_id).await?;

        let amendment = self
            .db
            .reservations()
            .amend(reservation_id, range, self.now())
            .await?;

        let settlement = self.settlements.open(
            identity,
            reservation_id,
            amendment.reservation.total(),
            amendment.price_delta,
            self.now(),
        );

        Ok(AmendmentReceipt {
            reservation: amendment.reservation,
            previous_total: amendment.previous_total,
            price_delta: amendment.price_delta,
            settlement,
        })
    }

    /// Cancels one of `identity`'s reservations. Cancelling twice is not an
    /// error.
    pub async fn cancel(&self, identity: &str, reservation_id: &str) -> EngineResult<Reservation> {
        debug!(identity = %identity, reservation_id = %reservation_id, "cancel command");

        self.owned_reservation(identity, reservation_id).await?;
        let reservation = self
            .db
            .reservations()
            .cancel(reservation_id, self.now())
            .await?;
        Ok(reservation)
    }

    /// `identity`'s reservations, newest start date first.
    ///
    /// Rows whose stored total no longer matches dates × current rate are
    /// returned as stored and logged.
    pub async fn my_reservations(&self, identity: &str) -> EngineResult<Vec<ReservationView>> {
        debug!(identity = %identity, "my_reservations command");

        let views = self.db.reservations().list_by_customer(identity).await?;

        for view in views.iter().filter(|v| v.has_drift()) {
            warn!(
                reservation_id = %view.reservation_id,
                stored = view.stored_total_cents,
                recomputed = view.recomputed_total_cents,
                "Reservation total drifted from current rate"
            );
        }

        Ok(views)
    }

    /// Deletes `identity`'s cancelled reservations that have no payments.
    pub async fn purge_inactive(&self, identity: &str) -> EngineResult<PurgeOutcome> {
        debug!(identity = %identity, "purge_inactive command");

        let outcome = self.db.reservations().purge_inactive(identity).await?;
        Ok(outcome)
    }
}
