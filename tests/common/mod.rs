#![allow(dead_code)]

use lunchly::DbOperations;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Connection, Executor, PgConnection, PgPool};
use std::sync::Arc;
use uuid::Uuid;

/// A throwaway database created for one test and dropped by `cleanup`.
pub struct TestDb {
    pub db: DbOperations,
    admin_url: String,
    name: String,
}

/// Create a fresh database next to the one `DATABASE_URL` points at.
///
/// Returns `None` when `DATABASE_URL` is not set so the Postgres-backed
/// tests are skipped on machines without a server.
pub async fn setup_test_db() -> Option<TestDb> {
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("DATABASE_URL not set, skipping Postgres test");
            return None;
        }
    };

    let (base, _) = database_url
        .rsplit_once('/')
        .expect("DATABASE_URL must include a database name");
    let admin_url = format!("{}/postgres", base);
    let name = format!("lunchly_test_{}", Uuid::new_v4().simple());

    let mut admin_conn = PgConnection::connect(&admin_url)
        .await
        .expect("Failed to connect to admin database");
    admin_conn
        .execute(&*format!("CREATE DATABASE \"{}\"", name))
        .await
        .expect("Failed to create test database");
    admin_conn.close().await.ok();

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&format!("{}/{}", base, name))
        .await
        .expect("Failed to connect to test database");

    lunchly::db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    Some(TestDb {
        db: DbOperations::new(Arc::new(pool)),
        admin_url,
        name,
    })
}

impl TestDb {
    pub fn pool(&self) -> &PgPool {
        self.db.pool()
    }

    /// Insert `count` reservations for `customer_id` directly.
    pub async fn add_reservations(&self, customer_id: i32, count: usize) {
        for _ in 0..count {
            sqlx::query(
                "INSERT INTO reservations (customer_id, start_at, num_guests) VALUES ($1, NOW(), 2)",
            )
            .bind(customer_id)
            .execute(self.pool())
            .await
            .expect("Failed to insert reservation");
        }
    }

    pub async fn cleanup(self) {
        self.db.close().await;

        let mut admin_conn = PgConnection::connect(&self.admin_url)
            .await
            .expect("Failed to connect to admin database for cleanup");
        admin_conn
            .execute(&*format!(
                "SELECT pg_terminate_backend(pid) FROM pg_stat_activity WHERE datname = '{}'",
                self.name
            ))
            .await
            .ok();
        admin_conn
            .execute(&*format!("DROP DATABASE IF EXISTS \"{}\"", self.name))
            .await
            .expect("Failed to drop test database during cleanup");
        admin_conn.close().await.ok();
    }
}
