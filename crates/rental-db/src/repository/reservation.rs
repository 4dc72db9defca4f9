//! # Reservation Repository
//!
//! The reservation store: create, amend, cancel, list and purge.
//!
//! ## Reservation Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Reservation Lifecycle                             │
//! │                                                                         │
//! │  1. CREATE                                                             │
//! │     └── create() → Reservation { status: Active }                      │
//! │         (conditional insert: refused if an Active reservation of the   │
//! │          same vehicle overlaps the requested dates)                    │
//! │                                                                         │
//! │  2. (OPTIONAL, REPEATABLE) AMEND                                       │
//! │     └── amend() → Amendment { reservation, previous_total, delta }     │
//! │         (read-modify-write inside one transaction)                     │
//! │                                                                         │
//! │  3. (OPTIONAL) CANCEL                                                  │
//! │     └── cancel() → Reservation { status: Cancelled }   terminal        │
//! │                                                                         │
//! │  4. (OPTIONAL) PURGE                                                   │
//! │     └── purge_inactive() → cancelled rows without payments deleted     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Overlap is inclusive on both ends: a reservation ending on the 5th and
//! another starting on the 5th conflict, because both hold the vehicle that
//! day.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use rental_core::pricing::{price_delta, price_range};
use rental_core::{
    Amendment, CoreError, DateRange, Money, PurgeOutcome, Reservation, ReservationStatus,
    ReservationView,
};

const RESERVATION_COLUMNS: &str =
    "id, customer_id, vehicle_id, start_date, end_date, total_cents, status, created_at, updated_at";

/// A reservation joined with the vehicle fields the listing shows.
#[derive(Debug, sqlx::FromRow)]
struct ListingRow {
    #[sqlx(flatten)]
    reservation: Reservation,
    make: String,
    model: String,
    daily_rate_cents: i64,
}

/// Repository for reservation database operations.
#[derive(Debug, Clone)]
pub struct ReservationRepository {
    pool: SqlitePool,
}

impl ReservationRepository {
    /// Creates a new ReservationRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReservationRepository { pool }
    }

    /// Gets a reservation by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Reservation>> {
        let sql = format!("SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = ?1");

        let reservation = sqlx::query_as::<_, Reservation>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(reservation)
    }

    /// Creates an Active reservation priced at the vehicle's current rate.
    ///
    /// ## Errors
    /// * `VehicleNotFound` / `CustomerNotFound` - reference does not resolve
    /// * `ReservationConflict` - an Active reservation of the same vehicle
    ///   overlaps `range`
    pub async fn create(
        &self,
        customer_id: &str,
        vehicle_id: &str,
        range: DateRange,
        now: DateTime<Utc>,
    ) -> DbResult<Reservation> {
        let rate: Option<i64> =
            sqlx::query_scalar("SELECT daily_rate_cents FROM vehicles WHERE id = ?1")
                .bind(vehicle_id)
                .fetch_optional(&self.pool)
                .await?;
        let rate = rate.ok_or_else(|| CoreError::VehicleNotFound(vehicle_id.to_string()))?;

        let customer: Option<String> = sqlx::query_scalar("SELECT id FROM customers WHERE id = ?1")
            .bind(customer_id)
            .fetch_optional(&self.pool)
            .await?;
        if customer.is_none() {
            return Err(CoreError::CustomerNotFound(customer_id.to_string()).into());
        }

        let total = price_range(&range, Money::from_cents(rate))?;
        let reservation = Reservation {
            id: Uuid::new_v4().to_string(),
            customer_id: customer_id.to_string(),
            vehicle_id: vehicle_id.to_string(),
            start_date: range.start(),
            end_date: range.end(),
            total_cents: total.cents(),
            status: ReservationStatus::Active,
            created_at: now,
            updated_at: now,
        };

        debug!(
            id = %reservation.id,
            vehicle_id = %vehicle_id,
            start = %range.start(),
            end = %range.end(),
            total = %total,
            "Creating reservation"
        );

        // Single statement: the overlap check and the insert cannot interleave
        // with another writer.
        let result = sqlx::query(
            r#"
            INSERT INTO reservations (
                id, customer_id, vehicle_id, start_date, end_date,
                total_cents, status, created_at, updated_at
            )
            SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9
            WHERE NOT EXISTS (
                SELECT 1 FROM reservations
                WHERE vehicle_id = ?3
                  AND status = 'active'
                  AND start_date <= ?5
                  AND end_date >= ?4
            )
            "#,
        )
        .bind(&reservation.id)
        .bind(&reservation.customer_id)
        .bind(&reservation.vehicle_id)
        .bind(reservation.start_date)
        .bind(reservation.end_date)
        .bind(reservation.total_cents)
        .bind(reservation.status)
        .bind(reservation.created_at)
        .bind(reservation.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            warn!(vehicle_id = %vehicle_id, start = %range.start(), end = %range.end(), "Booking overlaps an active reservation");
            return Err(CoreError::ReservationConflict {
                vehicle_id: vehicle_id.to_string(),
                start: range.start(),
                end: range.end(),
            }
            .into());
        }

        info!(id = %reservation.id, total = %total, "Reservation created");
        Ok(reservation)
    }

    /// Changes a reservation's dates and re-prices it at the vehicle's
    /// current rate.
    ///
    /// Identity, customer and vehicle never change. The whole
    /// read-modify-write runs in one transaction.
    ///
    /// ## Errors
    /// * `ReservationNotFound`
    /// * `ReservationCancelled` - cancelled reservations are terminal
    /// * `VehicleNotFound` - orphaned vehicle reference
    /// * `ReservationConflict` - new dates overlap another Active reservation
    pub async fn amend(
        &self,
        id: &str,
        range: DateRange,
        now: DateTime<Utc>,
    ) -> DbResult<Amendment> {
        let mut tx = self.pool.begin().await?;

        let sql = format!("SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = ?1");
        let current = sqlx::query_as::<_, Reservation>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| CoreError::ReservationNotFound(id.to_string()))?;

        if !current.is_active() {
            return Err(CoreError::ReservationCancelled(id.to_string()).into());
        }

        let rate: Option<i64> =
            sqlx::query_scalar("SELECT daily_rate_cents FROM vehicles WHERE id = ?1")
                .bind(&current.vehicle_id)
                .fetch_optional(&mut *tx)
                .await?;
        let rate = rate.ok_or_else(|| CoreError::VehicleNotFound(current.vehicle_id.clone()))?;

        let overlapping: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM reservations
            WHERE vehicle_id = ?1
              AND id != ?2
              AND status = 'active'
              AND start_date <= ?4
              AND end_date >= ?3
            "#,
        )
        .bind(&current.vehicle_id)
        .bind(id)
        .bind(range.start())
        .bind(range.end())
        .fetch_one(&mut *tx)
        .await?;

        if overlapping > 0 {
            warn!(id = %id, start = %range.start(), end = %range.end(), "Amendment overlaps an active reservation");
            return Err(CoreError::ReservationConflict {
                vehicle_id: current.vehicle_id,
                start: range.start(),
                end: range.end(),
            }
            .into());
        }

        let previous_total = current.total();
        let new_total = price_range(&range, Money::from_cents(rate))?;

        sqlx::query(
            r#"
            UPDATE reservations
            SET start_date = ?2, end_date = ?3, total_cents = ?4, updated_at = ?5
            WHERE id = ?1 AND status = 'active'
            "#,
        )
        .bind(id)
        .bind(range.start())
        .bind(range.end())
        .bind(new_total.cents())
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let delta = price_delta(previous_total, new_total);
        info!(
            id = %id,
            previous_total = %previous_total,
            new_total = %new_total,
            delta = %delta,
            "Reservation amended"
        );

        Ok(Amendment {
            reservation: Reservation {
                start_date: range.start(),
                end_date: range.end(),
                total_cents: new_total.cents(),
                updated_at: now,
                ..current
            },
            previous_total,
            price_delta: delta,
        })
    }

    /// Cancels a reservation. Cancelling a cancelled reservation is a no-op.
    ///
    /// Returns the reservation as stored after the call.
    pub async fn cancel(&self, id: &str, now: DateTime<Utc>) -> DbResult<Reservation> {
        let result = sqlx::query(
            r#"
            UPDATE reservations
            SET status = 'cancelled', updated_at = ?2
            WHERE id = ?1 AND status = 'active'
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let reservation = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::ReservationNotFound(id.to_string()))?;

        if result.rows_affected() > 0 {
            info!(id = %id, "Reservation cancelled");
        } else {
            debug!(id = %id, "Reservation already cancelled");
        }

        Ok(reservation)
    }

    /// Lists a customer's reservations (all statuses), newest start first,
    /// joined with vehicle make, model and current rate.
    pub async fn list_by_customer(&self, customer_id: &str) -> DbResult<Vec<ReservationView>> {
        let rows = sqlx::query_as::<_, ListingRow>(
            r#"
            SELECT
                r.id, r.customer_id, r.vehicle_id, r.start_date, r.end_date,
                r.total_cents, r.status, r.created_at, r.updated_at,
                v.make, v.model, v.daily_rate_cents
            FROM reservations r
            JOIN vehicles v ON v.id = r.vehicle_id
            WHERE r.customer_id = ?1
            ORDER BY r.start_date DESC, r.created_at DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                ReservationView::new(
                    &row.reservation,
                    row.make,
                    row.model,
                    Money::from_cents(row.daily_rate_cents),
                )
                .map_err(DbError::from)
            })
            .collect()
    }

    /// Deletes the customer's non-Active reservations.
    ///
    /// Cancelled reservations that payments reference are kept so the
    /// ledger never loses its parent row.
    pub async fn purge_inactive(&self, customer_id: &str) -> DbResult<PurgeOutcome> {
        let mut tx = self.pool.begin().await?;

        let retained: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM reservations r
            WHERE r.customer_id = ?1
              AND r.status != 'active'
              AND EXISTS (SELECT 1 FROM payments p WHERE p.reservation_id = r.id)
            "#,
        )
        .bind(customer_id)
        .fetch_one(&mut *tx)
        .await?;

        let removed = sqlx::query(
            r#"
            DELETE FROM reservations
            WHERE customer_id = ?1
              AND status != 'active'
              AND NOT EXISTS (
                  SELECT 1 FROM payments p WHERE p.reservation_id = reservations.id
              )
            "#,
        )
        .bind(customer_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;

        let outcome = PurgeOutcome {
            removed,
            retained: retained as u64,
        };
        info!(customer_id = %customer_id, removed, retained = outcome.retained, "Purged inactive reservations");

        Ok(outcome)
    }

    /// Lists every reservation (reporting).
    pub async fn list_all(&self) -> DbResult<Vec<Reservation>> {
        let sql = format!("SELECT {RESERVATION_COLUMNS} FROM reservations ORDER BY start_date, id");

        let reservations = sqlx::query_as::<_, Reservation>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(reservations)
    }

    /// Counts Active reservations.
    pub async fn count_active(&self) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM reservations WHERE status = 'active'")
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};

    use crate::repository::test_support::{customer, date, now, seeded, vehicle};
    use crate::DbError;
    use rental_core::validation::{validate_card, PaymentForm};
    use rental_core::{CoreError, DateRange, ReservationStatus};

    fn range(start: (u32, u32), end: (u32, u32)) -> DateRange {
        DateRange::new(date(2025, start.0, start.1), date(2025, end.0, end.1)).unwrap()
    }

    #[tokio::test]
    async fn test_create_prices_inclusive_days() {
        let (db, ana, yaris) = seeded().await;

        let reservation = db
            .reservations()
            .create(&ana.id, &yaris.id, range((5, 1), (5, 3)), now())
            .await
            .unwrap();

        assert_eq!(reservation.total_cents, 9000);
        assert_eq!(reservation.status, ReservationStatus::Active);

        let stored = db
            .reservations()
            .get_by_id(&reservation.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.total_cents, 9000);
        assert_eq!(stored.start_date, date(2025, 5, 1));
        assert_eq!(stored.end_date, date(2025, 5, 3));
        assert_eq!(stored.status, ReservationStatus::Active);
    }

    #[tokio::test]
    async fn test_create_with_unknown_references() {
        let (db, ana, yaris) = seeded().await;

        let err = db
            .reservations()
            .create(&ana.id, "no-such-vehicle", range((5, 1), (5, 3)), now())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::VehicleNotFound(_))));

        let err = db
            .reservations()
            .create("no-such-customer", &yaris.id, range((5, 1), (5, 3)), now())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::CustomerNotFound(_))));

        assert_eq!(db.reservations().count_active().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_overlapping_booking_rejected() {
        let (db, ana, yaris) = seeded().await;
        let bruno = customer("bruno");
        db.customers().insert(&bruno).await.unwrap();

        db.reservations()
            .create(&ana.id, &yaris.id, range((5, 1), (5, 5)), now())
            .await
            .unwrap();

        let err = db
            .reservations()
            .create(&bruno.id, &yaris.id, range((5, 5), (5, 8)), now())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::ReservationConflict { .. })
        ));

        // Adjacent dates are fine.
        db.reservations()
            .create(&bruno.id, &yaris.id, range((5, 6), (5, 8)), now())
            .await
            .unwrap();

        // Another vehicle is unaffected.
        let fiat = vehicle("Fiat", "500", "Carro Pequeno", 2800);
        db.vehicles().insert(&fiat).await.unwrap();
        db.reservations()
            .create(&bruno.id, &fiat.id, range((5, 1), (5, 5)), now())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_cancelled_reservation_frees_the_dates() {
        let (db, ana, yaris) = seeded().await;
        let first = db
            .reservations()
            .create(&ana.id, &yaris.id, range((5, 1), (5, 5)), now())
            .await
            .unwrap();
        db.reservations().cancel(&first.id, now()).await.unwrap();

        db.reservations()
            .create(&ana.id, &yaris.id, range((5, 2), (5, 4)), now())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_amend_reports_delta_and_keeps_identity() {
        let (db, ana, yaris) = seeded().await;
        let original = db
            .reservations()
            .create(&ana.id, &yaris.id, range((5, 1), (5, 3)), now())
            .await
            .unwrap();

        let amendment = db
            .reservations()
            .amend(&original.id, range((5, 1), (5, 5)), now())
            .await
            .unwrap();

        assert_eq!(amendment.previous_total.cents(), 9000);
        assert_eq!(amendment.reservation.total_cents, 15000);
        assert_eq!(amendment.price_delta.cents(), 6000);
        assert_eq!(amendment.reservation.id, original.id);
        assert_eq!(amendment.reservation.customer_id, original.customer_id);
        assert_eq!(amendment.reservation.vehicle_id, original.vehicle_id);

        let stored = db
            .reservations()
            .get_by_id(&original.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.end_date, date(2025, 5, 5));
        assert_eq!(stored.total_cents, 15000);

        let shorter = db
            .reservations()
            .amend(&original.id, range((5, 2), (5, 3)), now())
            .await
            .unwrap();
        assert_eq!(shorter.price_delta.cents(), -9000);
    }

    #[tokio::test]
    async fn test_writes_are_stamped_with_the_given_instant() {
        let (db, ana, yaris) = seeded().await;
        let created = db
            .reservations()
            .create(&ana.id, &yaris.id, range((5, 1), (5, 3)), now())
            .await
            .unwrap();
        assert_eq!(created.created_at, now());
        assert_eq!(created.updated_at, now());

        let later = now() + Duration::minutes(45);
        db.reservations()
            .amend(&created.id, range((5, 1), (5, 4)), later)
            .await
            .unwrap();

        let stored = db
            .reservations()
            .get_by_id(&created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.created_at, now());
        assert_eq!(stored.updated_at, later);
    }

    #[tokio::test]
    async fn test_unpriceable_range_is_refused_before_insert() {
        let (db, ana, _) = seeded().await;
        let limo = vehicle("Rolls-Royce", "Phantom", "Luxo", 100_000_000_000);
        db.vehicles().insert(&limo).await.unwrap();

        let widest = DateRange::new(NaiveDate::MIN, NaiveDate::MAX).unwrap();
        let err = db
            .reservations()
            .create(&ana.id, &limo.id, widest, now())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::PriceOverflow { .. })
        ));
        assert!(db.reservations().list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_amend_may_overlap_its_own_dates_but_not_others() {
        let (db, ana, yaris) = seeded().await;
        let mine = db
            .reservations()
            .create(&ana.id, &yaris.id, range((5, 1), (5, 3)), now())
            .await
            .unwrap();
        db.reservations()
            .create(&ana.id, &yaris.id, range((5, 10), (5, 12)), now())
            .await
            .unwrap();

        db.reservations()
            .amend(&mine.id, range((5, 2), (5, 4)), now())
            .await
            .unwrap();

        let err = db
            .reservations()
            .amend(&mine.id, range((5, 2), (5, 10)), now())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::ReservationConflict { .. })
        ));

        // The failed amendment left the row untouched.
        let stored = db.reservations().get_by_id(&mine.id).await.unwrap().unwrap();
        assert_eq!(stored.end_date, date(2025, 5, 4));
        assert_eq!(stored.total_cents, 9000);
    }

    #[tokio::test]
    async fn test_amend_missing_or_cancelled() {
        let (db, ana, yaris) = seeded().await;

        let err = db
            .reservations()
            .amend("missing", range((5, 1), (5, 2)), now())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::ReservationNotFound(_))
        ));

        let reservation = db
            .reservations()
            .create(&ana.id, &yaris.id, range((5, 1), (5, 3)), now())
            .await
            .unwrap();
        db.reservations().cancel(&reservation.id, now()).await.unwrap();

        let err = db
            .reservations()
            .amend(&reservation.id, range((5, 1), (5, 5)), now())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::ReservationCancelled(_))
        ));
    }

    #[tokio::test]
    async fn test_cancel_is_idempotent() {
        let (db, ana, yaris) = seeded().await;
        let reservation = db
            .reservations()
            .create(&ana.id, &yaris.id, range((5, 1), (5, 3)), now())
            .await
            .unwrap();

        let first = db.reservations().cancel(&reservation.id, now()).await.unwrap();
        let second = db
            .reservations()
            .cancel(&reservation.id, now() + Duration::hours(1))
            .await
            .unwrap();

        assert_eq!(first.status, ReservationStatus::Cancelled);
        assert_eq!(second.status, ReservationStatus::Cancelled);
        assert_eq!(first.updated_at, now());
        assert_eq!(second.updated_at, now());
        assert_eq!(second.total_cents, 9000);

        let err = db.reservations().cancel("missing", now()).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::ReservationNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_listing_recomputes_totals() {
        let (db, ana, yaris) = seeded().await;
        db.reservations()
            .create(&ana.id, &yaris.id, range((5, 1), (5, 3)), now())
            .await
            .unwrap();
        let later = db
            .reservations()
            .create(&ana.id, &yaris.id, range((6, 1), (6, 2)), now())
            .await
            .unwrap();
        db.reservations().cancel(&later.id, now()).await.unwrap();

        let views = db.reservations().list_by_customer(&ana.id).await.unwrap();
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].reservation_id, later.id);
        assert_eq!(views[0].status, ReservationStatus::Cancelled);
        assert_eq!(views[1].make, "Toyota");
        assert_eq!(views[1].recomputed_total_cents, 9000);
        assert!(views.iter().all(|v| !v.has_drift()));

        // A rate change after booking shows up as drift, stored total wins.
        sqlx::query("UPDATE vehicles SET daily_rate_cents = 3500 WHERE id = ?1")
            .bind(&yaris.id)
            .execute(db.pool())
            .await
            .unwrap();
        let views = db.reservations().list_by_customer(&ana.id).await.unwrap();
        assert!(views[1].has_drift());
        assert_eq!(views[1].total().cents(), 9000);
    }

    #[tokio::test]
    async fn test_purge_keeps_active_and_paid_reservations() {
        let (db, ana, yaris) = seeded().await;
        let active = db
            .reservations()
            .create(&ana.id, &yaris.id, range((5, 1), (5, 3)), now())
            .await
            .unwrap();
        let cancelled = db
            .reservations()
            .create(&ana.id, &yaris.id, range((6, 1), (6, 3)), now())
            .await
            .unwrap();
        let paid_then_cancelled = db
            .reservations()
            .create(&ana.id, &yaris.id, range((7, 1), (7, 3)), now())
            .await
            .unwrap();

        let card = validate_card(
            &PaymentForm {
                card_number: "1234567890123".to_string(),
                cardholder_name: "Ana".to_string(),
                expiry: "2030-01".to_string(),
                security_code: "123".to_string(),
            },
            date(2025, 5, 1),
        )
        .unwrap();
        db.payments()
            .insert(&paid_then_cancelled.id, &card, None, now())
            .await
            .unwrap();

        db.reservations().cancel(&cancelled.id, now()).await.unwrap();
        db.reservations()
            .cancel(&paid_then_cancelled.id, now())
            .await
            .unwrap();

        let outcome = db.reservations().purge_inactive(&ana.id).await.unwrap();
        assert_eq!(outcome.removed, 1);
        assert_eq!(outcome.retained, 1);

        assert!(db.reservations().get_by_id(&active.id).await.unwrap().is_some());
        assert!(db.reservations().get_by_id(&cancelled.id).await.unwrap().is_none());
        assert!(db
            .reservations()
            .get_by_id(&paid_then_cancelled.id)
            .await
            .unwrap()
            .is_some());

        let again = db.reservations().purge_inactive(&ana.id).await.unwrap();
        assert_eq!(again.removed, 0);
    }
}
