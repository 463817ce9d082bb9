//! Database module for the Lunchly server
//!
//! This module owns the Postgres pool, the row types and the
//! store traits the customer and reservation accessors run against.

pub mod models;
pub mod operations;

pub use models::{Customer, CustomerId, NewCustomer, NewReservation, Reservation, ReservationId, TopCustomer};
pub use operations::{CustomerStore, DbOperations, DbPoolStatus, ReservationStore};

use sqlx::PgPool;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::Result;

/// Open the pool described by `config`, applying migrations when asked to.
pub async fn connect(config: &DatabaseConfig) -> Result<DbOperations> {
    info!("Connecting to database (max_connections={})", config.max_connections);
    let db = DbOperations::new_with_options(
        &config.url,
        config.max_connections,
        config.acquire_timeout(),
    )
    .await?;

    if config.run_migrations {
        run_migrations(db.pool()).await?;
    }

    Ok(db)
}

/// Apply the SQL files under `./migrations`.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    info!("Running database migrations");
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
