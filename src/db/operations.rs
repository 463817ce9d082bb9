use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::db::models::{
    Customer, CustomerId, NewCustomer, NewReservation, Reservation, ReservationId, TopCustomer,
};
use crate::Result;

const CUSTOMER_COLUMNS: &str = "id, first_name, last_name, phone, notes";
const RESERVATION_COLUMNS: &str = "id, customer_id, num_guests, start_at, notes";

/// Row access for the `customers` table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// Every customer, ordered by last name then first name.
    async fn list_customers(&self) -> Result<Vec<Customer>>;

    /// Customers whose last name contains `fragment`, ignoring case.
    async fn search_customers(&self, fragment: &str) -> Result<Vec<Customer>>;

    async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>>;

    /// Up to `limit` customers ranked by reservation count, highest first.
    async fn top_customers(&self, limit: i64) -> Result<Vec<TopCustomer>>;

    async fn insert_customer(&self, customer: &NewCustomer) -> Result<CustomerId>;

    /// Returns the number of rows updated.
    async fn update_customer(&self, customer: &Customer) -> Result<u64>;
}

/// Row access for the `reservations` table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReservationStore: Send + Sync {
    async fn reservations_for_customer(&self, customer_id: CustomerId) -> Result<Vec<Reservation>>;

    async fn insert_reservation(&self, reservation: &NewReservation) -> Result<ReservationId>;

    /// Returns the number of rows updated.
    async fn update_reservation(&self, reservation: &Reservation) -> Result<u64>;
}

#[derive(Clone)]
pub struct DbOperations {
    pool: Arc<PgPool>,
}

impl DbOperations {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    pub async fn new_with_options(
        url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(url)
            .await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    pub fn pool(&self) -> &PgPool {
        self.pool.as_ref()
    }

    pub fn get_pool_status(&self) -> DbPoolStatus {
        let size = self.pool.size();
        let idle = self.pool.num_idle() as u32;

        DbPoolStatus {
            total_connections: size,
            active_connections: size.saturating_sub(idle),
            idle_connections: idle,
        }
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl CustomerStore for DbOperations {
    #[instrument(skip(self))]
    async fn list_customers(&self) -> Result<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY last_name, first_name"
        ))
        .fetch_all(self.pool.as_ref())
        .await?;

        debug!(count = customers.len(), "Loaded customers");
        Ok(customers)
    }

    #[instrument(skip(self))]
    async fn search_customers(&self, fragment: &str) -> Result<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE last_name ILIKE $1 \
             ORDER BY last_name, first_name"
        ))
        .bind(format!("%{}%", fragment))
        .fetch_all(self.pool.as_ref())
        .await?;

        debug!(count = customers.len(), "Searched customers");
        Ok(customers)
    }

    #[instrument(skip(self))]
    async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(customer)
    }

    #[instrument(skip(self))]
    async fn top_customers(&self, limit: i64) -> Result<Vec<TopCustomer>> {
        let customers = sqlx::query_as::<_, TopCustomer>(
            r#"
            SELECT c.id, c.first_name, c.last_name, c.phone, c.notes,
                   COUNT(r.id) AS num_reservations
            FROM customers c
            LEFT JOIN reservations r ON c.id = r.customer_id
            GROUP BY c.id
            ORDER BY num_reservations DESC, c.id
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(customers)
    }

    #[instrument(skip(self, customer), fields(last_name = %customer.last_name))]
    async fn insert_customer(&self, customer: &NewCustomer) -> Result<CustomerId> {
        let id: CustomerId = sqlx::query_scalar(
            r#"
            INSERT INTO customers (first_name, last_name, phone, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&customer.first_name)
        .bind(&customer.last_name)
        .bind(&customer.phone)
        .bind(&customer.notes)
        .fetch_one(self.pool.as_ref())
        .await?;

        debug!(id, "Inserted customer");
        Ok(id)
    }

    #[instrument(skip(self, customer), fields(id = customer.id()))]
    async fn update_customer(&self, customer: &Customer) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE customers SET first_name = $1, last_name = $2, phone = $3, notes = $4 WHERE id = $5",
        )
        .bind(&customer.first_name)
        .bind(&customer.last_name)
        .bind(&customer.phone)
        .bind(&customer.notes)
        .bind(customer.id())
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl ReservationStore for DbOperations {
    #[instrument(skip(self))]
    async fn reservations_for_customer(&self, customer_id: CustomerId) -> Result<Vec<Reservation>> {
        let reservations = sqlx::query_as::<_, Reservation>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE customer_id = $1 ORDER BY id"
        ))
        .bind(customer_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(reservations)
    }

    #[instrument(skip(self, reservation), fields(customer_id = reservation.customer_id))]
    async fn insert_reservation(&self, reservation: &NewReservation) -> Result<ReservationId> {
        let id: ReservationId = sqlx::query_scalar(
            r#"
            INSERT INTO reservations (customer_id, num_guests, start_at, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(reservation.customer_id)
        .bind(reservation.num_guests)
        .bind(reservation.start_at)
        .bind(&reservation.notes)
        .fetch_one(self.pool.as_ref())
        .await?;

        debug!(id, "Inserted reservation");
        Ok(id)
    }

    #[instrument(skip(self, reservation), fields(id = reservation.id()))]
    async fn update_reservation(&self, reservation: &Reservation) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE reservations SET customer_id = $1, num_guests = $2, start_at = $3, notes = $4 WHERE id = $5",
        )
        .bind(reservation.customer_id)
        .bind(reservation.num_guests)
        .bind(reservation.start_at)
        .bind(&reservation.notes)
        .bind(reservation.id())
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected())
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct DbPoolStatus {
    pub total_connections: u32,
    pub active_connections: u32,
    pub idle_connections: u32,
}
