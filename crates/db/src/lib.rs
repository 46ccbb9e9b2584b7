//! Persistence layer.
//!
//! - [`models`] -- row structs and create DTOs.
//! - [`repositories`] -- zero-sized `*Repo` structs issuing PostgreSQL queries.
//! - [`store`] -- the store traits handlers depend on, plus [`store::PgStore`].
//! - [`memory`] -- an in-process [`store`] implementation for tests and demos.

use sqlx::postgres::PgPoolOptions;

pub mod error;
pub mod memory;
pub mod models;
pub mod repositories;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use store::{
    BookingStore, NotificationStore, PaymentStore, PgStore, RoomStore, ServiceRequestStore,
    Stores, UserStore,
};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Run a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
