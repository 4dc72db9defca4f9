//! # Payment Repository
//!
//! Append-only ledger of card payments. Rows are never updated or deleted;
//! the schema enforces this with triggers.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::DbResult;
use rental_core::validation::CardDetails;
use rental_core::{Money, Payment};

const PAYMENT_COLUMNS: &str = "id, reservation_id, card_number, cardholder_name, expiry, \
     security_code, amount_cents, created_at";

/// Repository for payment database operations.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    pool: SqlitePool,
}

impl PaymentRepository {
    /// Creates a new PaymentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PaymentRepository { pool }
    }

    /// Appends a payment for a reservation.
    ///
    /// ## Arguments
    /// * `reservation_id` - Must reference an existing reservation (FK)
    /// * `card` - Already validated card fields
    /// * `amount` - Settlement amount at the time, if a session was open
    /// * `now` - Recording instant, from the caller's clock
    pub async fn insert(
        &self,
        reservation_id: &str,
        card: &CardDetails,
        amount: Option<Money>,
        now: DateTime<Utc>,
    ) -> DbResult<Payment> {
        let payment = Payment {
            id: Uuid::new_v4().to_string(),
            reservation_id: reservation_id.to_string(),
            card_number: card.card_number.clone(),
            cardholder_name: card.cardholder_name.clone(),
            expiry: card.expiry.to_string(),
            security_code: card.security_code.clone(),
            amount_cents: amount.map(|m| m.cents()),
            created_at: now,
        };

        debug!(
            id = %payment.id,
            reservation_id = %reservation_id,
            card = %payment.masked_card_number(),
            "Recording payment"
        );

        sqlx::query(
            r#"
            INSERT INTO payments (
                id, reservation_id, card_number, cardholder_name,
                expiry, security_code, amount_cents, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&payment.id)
        .bind(&payment.reservation_id)
        .bind(&payment.card_number)
        .bind(&payment.cardholder_name)
        .bind(&payment.expiry)
        .bind(&payment.security_code)
        .bind(payment.amount_cents)
        .bind(payment.created_at)
        .execute(&self.pool)
        .await?;

        info!(id = %payment.id, reservation_id = %reservation_id, "Payment recorded");
        Ok(payment)
    }

    /// Lists the payments of a reservation, oldest first.
    pub async fn list_for_reservation(&self, reservation_id: &str) -> DbResult<Vec<Payment>> {
        let sql = format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE reservation_id = ?1 ORDER BY created_at, id"
        );

        let payments = sqlx::query_as::<_, Payment>(&sql)
            .bind(reservation_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(payments)
    }

    /// Counts payments.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payments")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
