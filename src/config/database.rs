//! Database configuration and connection pool initialization.
//!
//! Reads the `DATABASE_URL` environment variable and builds the SQLx
//! connection pool shared by every request handler.
//!
//! # Panics
//!
//! [`init_db_pool`] panics when `DATABASE_URL` is unset or the database is
//! unreachable; both are startup-fatal conditions.

use sqlx::PgPool;
use std::env;

/// Initializes the PostgreSQL connection pool.
///
/// Called once during startup; the returned pool is cheaply cloneable and
/// lives in [`crate::state::AppState`].
pub async fn init_db_pool() -> PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database")
}
