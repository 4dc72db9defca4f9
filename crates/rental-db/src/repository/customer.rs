//! # Customer Repository
//!
//! Customer reference data. The engine receives an already-authenticated
//! identity (the customer id) and only needs to resolve it.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use rental_core::validation::{validate_customer_name, validate_username};
use rental_core::{CoreError, Customer};

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Inserts a customer.
    ///
    /// A duplicate username surfaces as `DbError::UniqueViolation`.
    pub async fn insert(&self, customer: &Customer) -> DbResult<()> {
        validate_customer_name(&customer.name).map_err(CoreError::from)?;
        validate_username(&customer.username).map_err(CoreError::from)?;

        debug!(id = %customer.id, username = %customer.username, "Inserting customer");

        sqlx::query(
            r#"
            INSERT INTO customers (id, name, username, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&customer.id)
        .bind(customer.name.trim())
        .bind(customer.username.trim())
        .bind(customer.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Creates a customer with a generated id.
    pub async fn create(&self, name: &str, username: &str) -> DbResult<Customer> {
        let customer = Customer {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            username: username.trim().to_string(),
            created_at: Utc::now(),
        };

        self.insert(&customer).await?;
        Ok(customer)
    }

    /// Gets a customer by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT id, name, username, created_at FROM customers WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Gets a customer by username.
    pub async fn get_by_username(&self, username: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT id, name, username, created_at FROM customers WHERE username = ?1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Lists every customer, oldest first.
    pub async fn list_all(&self) -> DbResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(
            "SELECT id, name, username, created_at FROM customers ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    /// Counts customers.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
