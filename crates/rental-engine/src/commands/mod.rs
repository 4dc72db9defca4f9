//! # Commands Module
//!
//! Engine operations, grouped by screen. Each submodule adds an
//! `impl RentalEngine` block.
//!
//! ## Command Categories
//!
//! ### Catalog ([`catalog`])
//! - `list_available` - Vehicles free as of today, optionally filtered
//! - `get_vehicle` - Vehicle details
//!
//! ### Booking ([`booking`])
//! - `reserve` - Create a reservation and open its settlement
//! - `amend` - Change dates, re-price, open the balance settlement
//! - `cancel` - Cancel (idempotent)
//! - `my_reservations` - Listing with recomputed totals
//! - `purge_inactive` - Delete cancelled, unpaid reservations
//!
//! ### Payment ([`payment`])
//! - `payment_view` - What the payment screen shows
//! - `validate_and_record` - Validate the card, append the payment, close
//!   the settlement
//!
//! ### Report ([`report`])
//! - `dashboard` - Indicator summary
//!
//! Every command taking an `identity` trusts it as already authenticated.
//! Reservations belonging to another identity are reported as not found.

pub mod booking;
pub mod catalog;
pub mod payment;
pub mod report;

use rental_core::Reservation;

use crate::error::{EngineError, EngineResult};
use crate::RentalEngine;

impl RentalEngine {
    /// Loads a reservation owned by `identity`.
    pub(crate) async fn owned_reservation(
        &self,
        identity: &str,
        reservation_id: &str,
    ) -> EngineResult<Reservation> {
        match self.db.reservations().get_by_id(reservation_id).await? {
            Some(reservation) if reservation.customer_id == identity => Ok(reservation),
            _ => Err(EngineError::reservation_not_found(reservation_id)),
        }
    }
}
