//! # Payment Commands
//!
//! ## Validation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  validate_and_record(identity, reservation_id, form)                    │
//! │                                                                         │
//! │  1. reservation owned by identity?  ── no ──► RESERVATION_NOT_FOUND     │
//! │  2. card number 13 or 15 digits?    ── no ──► INVALID_CARD_NUMBER       │
//! │  3. name letters and spaces?        ── no ──► INVALID_CARDHOLDER_NAME   │
//! │  4. expiry YYYY-MM, not past?       ── no ──► MALFORMED_EXPIRY /        │
//! │                                               EXPIRED_CARD              │
//! │  5. security code 3-4 digits?       ── no ──► INVALID_SECURITY_CODE     │
//! │                                                                         │
//! │  6. payments().insert(..)           ◄── durable first                   │
//! │  7. settlements.close(identity, id) ◄── only after the row exists       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A rejection at steps 2-5 leaves the settlement untouched so the form can
//! be resubmitted. The recorded amount comes from the settlement only when
//! that settlement was opened for the reservation being paid.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use rental_core::validation::validate_card;
use rental_core::{Payment, SettlementView};

use crate::error::{EngineError, EngineResult};
use crate::forms::PaymentForm;
use crate::RentalEngine;

/// What the payment screen renders for a reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentScreen {
    pub reservation_id: String,
    /// Zero amount when nothing is pending.
    pub settlement: SettlementView,
}

impl RentalEngine {
    /// The pending balance for one of `identity`'s reservations.
    pub async fn payment_view(
        &self,
        identity: &str,
        reservation_id: &str,
    ) -> EngineResult<PaymentScreen> {
        debug!(identity = %identity, reservation_id = %reservation_id, "payment_view command");

        self.owned_reservation(identity, reservation_id).await?;

        let settlement = self
            .settlements
            .peek(identity, reservation_id, self.now())
            .unwrap_or_else(SettlementView::empty);

        Ok(PaymentScreen {
            reservation_id: reservation_id.to_string(),
            settlement,
        })
    }

    /// Validates the card form, appends the payment and closes the
    /// settlement.
    ///
    /// The recorded amount is the amount due on this reservation's
    /// settlement, or none when no live settlement is owed on it. A
    /// settlement opened for another reservation is left open.
    pub async fn validate_and_record(
        &self,
        identity: &str,
        reservation_id: &str,
        form: &PaymentForm,
    ) -> EngineResult<Payment> {
        debug!(identity = %identity, reservation_id = %reservation_id, "validate_and_record command");

        self.owned_reservation(identity, reservation_id).await?;

        let card = validate_card(form, self.today()).map_err(|reason| {
            warn!(
                identity = %identity,
                reservation_id = %reservation_id,
                reason = reason.reason_code(),
                "Payment form rejected"
            );
            EngineError::from(reason)
        })?;

        let now = self.now();
        let pending = self.settlements.get(identity, reservation_id, now);
        let amount = pending.as_ref().map(|s| s.amount_due);

        let payment = self
            .db
            .payments()
            .insert(reservation_id, &card, amount, now)
            .await?;

        if pending.is_some() && self.settlements.close(identity, reservation_id, now).is_none() {
            warn!(
                identity = %identity,
                reservation_id = %reservation_id,
                "Settlement was gone before it could be closed"
            );
        }

        info!(
            identity = %identity,
            reservation_id = %reservation_id,
            payment_id = %payment.id,
            card = %payment.masked_card_number(),
            "Payment accepted"
        );

        Ok(payment)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{date, fixture, Fixture};
    use crate::{BookingForm, DateChangeForm, ErrorCode, PaymentForm};
    use chrono::Duration;

    fn form(card_number: &str) -> PaymentForm {
        PaymentForm {
            card_number: card_number.to_string(),
            cardholder_name: "Ana Sousa".to_string(),
            expiry: "2027-12".to_string(),
            security_code: "123".to_string(),
        }
    }

    async fn booked(fx: &Fixture) -> String {
        fx.engine
            .reserve(
                &fx.ana.id,
                &BookingForm {
                    vehicle_id: fx.yaris.id.clone(),
                    start_date: date(2025, 5, 1),
                    end_date: date(2025, 5, 3),
                },
            )
            .await
            .unwrap()
            .reservation
            .id
    }

    #[tokio::test]
    async fn test_rejected_card_keeps_settlement_then_success_closes_it() {
        let fx = fixture().await;
        let id = booked(&fx).await;

        let err = fx
            .engine
            .validate_and_record(&fx.ana.id, &id, &form("1234 5678 9012"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCardNumber);
        assert!(err.is_recoverable());

        let screen = fx.engine.payment_view(&fx.ana.id, &id).await.unwrap();
        assert_eq!(screen.settlement.amount_due.cents(), 9000);
        assert_eq!(fx.engine.database().payments().count().await.unwrap(), 0);

        let payment = fx
            .engine
            .validate_and_record(&fx.ana.id, &id, &form("1234 5678 9012 3"))
            .await
            .unwrap();
        assert_eq!(payment.card_number, "1234567890123");
        assert_eq!(payment.amount_cents, Some(9000));
        assert_eq!(payment.reservation_id, id);
        assert_eq!(payment.created_at, fx.engine.now());

        let screen = fx.engine.payment_view(&fx.ana.id, &id).await.unwrap();
        assert!(screen.settlement.amount_due.is_zero());
        assert!(fx.engine.settlements().is_empty());
    }

    #[tokio::test]
    async fn test_card_length_rules() {
        let fx = fixture().await;
        let id = booked(&fx).await;

        let err = fx
            .engine
            .validate_and_record(&fx.ana.id, &id, &form("12345678901234"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCardNumber);

        fx.engine
            .validate_and_record(&fx.ana.id, &id, &form("123456789012345"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_expired_card_uses_engine_clock() {
        let fx = fixture().await;
        let id = booked(&fx).await;

        let mut expired = form("1234567890123");
        expired.expiry = "2023-01".to_string();
        let err = fx
            .engine
            .validate_and_record(&fx.ana.id, &id, &expired)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ExpiredCard);

        let mut this_month = form("1234567890123");
        this_month.expiry = "2025-05".to_string();
        fx.engine
            .validate_and_record(&fx.ana.id, &id, &this_month)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_first_failure_wins() {
        let fx = fixture().await;
        let id = booked(&fx).await;

        let bad = PaymentForm {
            card_number: "1234567890123".to_string(),
            cardholder_name: "Ana 2".to_string(),
            expiry: "soon".to_string(),
            security_code: "12".to_string(),
        };
        let err = fx
            .engine
            .validate_and_record(&fx.ana.id, &id, &bad)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCardholderName);

        let err = fx
            .engine
            .validate_and_record(&fx.ana.id, "missing", &bad)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ReservationNotFound);
    }

    #[tokio::test]
    async fn test_other_identity_cannot_pay_or_peek() {
        let fx = fixture().await;
        let id = booked(&fx).await;

        let err = fx
            .engine
            .validate_and_record(&fx.rui.id, &id, &form("1234567890123"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ReservationNotFound);

        let err = fx.engine.payment_view(&fx.rui.id, &id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ReservationNotFound);

        assert!(fx
            .engine
            .settlements()
            .peek(&fx.ana.id, &id, fx.engine.now())
            .is_some());
    }

    #[tokio::test]
    async fn test_amendment_payment_adds_a_second_row() {
        let fx = fixture().await;
        let id = booked(&fx).await;
        fx.engine
            .validate_and_record(&fx.ana.id, &id, &form("1234567890123"))
            .await
            .unwrap();

        let receipt = fx
            .engine
            .amend(
                &fx.ana.id,
                &id,
                &DateChangeForm {
                    start_date: date(2025, 5, 1),
                    end_date: date(2025, 5, 5),
                },
            )
            .await
            .unwrap();
        let screen = fx.engine.payment_view(&fx.ana.id, &id).await.unwrap();
        assert_eq!(screen.settlement, receipt.settlement);
        assert!(screen.settlement.show_delta);
        assert_eq!(screen.settlement.amount_delta.cents(), 6000);

        fx.engine
            .validate_and_record(&fx.ana.id, &id, &form("123456789012345"))
            .await
            .unwrap();

        let payments = fx
            .engine
            .database()
            .payments()
            .list_for_reservation(&id)
            .await
            .unwrap();
        assert_eq!(payments.len(), 2);
        let amounts: Vec<Option<i64>> = payments.iter().map(|p| p.amount_cents).collect();
        assert!(amounts.contains(&Some(9000)));
        assert!(amounts.contains(&Some(15000)));
    }

    #[tokio::test]
    async fn test_payment_only_settles_its_own_reservation() {
        let fx = fixture().await;
        let first = fx
            .engine
            .reserve(
                &fx.ana.id,
                &BookingForm {
                    vehicle_id: fx.yaris.id.clone(),
                    start_date: date(2025, 5, 1),
                    end_date: date(2025, 5, 2),
                },
            )
            .await
            .unwrap()
            .reservation
            .id;
        let second = fx
            .engine
            .reserve(
                &fx.ana.id,
                &BookingForm {
                    vehicle_id: fx.yaris.id.clone(),
                    start_date: date(2025, 6, 1),
                    end_date: date(2025, 6, 5),
                },
            )
            .await
            .unwrap()
            .reservation
            .id;

        let screen = fx.engine.payment_view(&fx.ana.id, &first).await.unwrap();
        assert!(screen.settlement.amount_due.is_zero());

        let paid_first = fx
            .engine
            .validate_and_record(&fx.ana.id, &first, &form("1234567890123"))
            .await
            .unwrap();
        assert_eq!(paid_first.amount_cents, None);

        let screen = fx.engine.payment_view(&fx.ana.id, &second).await.unwrap();
        assert_eq!(screen.settlement.amount_due.cents(), 15000);

        let paid_second = fx
            .engine
            .validate_and_record(&fx.ana.id, &second, &form("1234567890123"))
            .await
            .unwrap();
        assert_eq!(paid_second.amount_cents, Some(15000));
        assert!(fx.engine.settlements().is_empty());
    }

    #[tokio::test]
    async fn test_expired_settlement_records_no_amount() {
        let fx = fixture().await;
        let id = booked(&fx).await;

        fx.clock.advance(Duration::minutes(31));
        let screen = fx.engine.payment_view(&fx.ana.id, &id).await.unwrap();
        assert!(screen.settlement.amount_due.is_zero());

        let payment = fx
            .engine
            .validate_and_record(&fx.ana.id, &id, &form("1234567890123"))
            .await
            .unwrap();
        assert_eq!(payment.amount_cents, None);
    }
}
