//! # Coursehub DB
//!
//! PostgreSQL pool construction, embedded migrations and shutdown.
//!
//! The pool is built once at startup from an explicit [`DatabaseConfig`] and
//! handed to whoever needs it; nothing in the workspace reaches for a global
//! connection.
//!
//! # Example
//!
//! ```ignore
//! use coursehub_config::DatabaseConfig;
//! use coursehub_db::{close_db_pool, init_db_pool, run_migrations};
//!
//! let pool = init_db_pool(&DatabaseConfig::from_env()?).await?;
//! run_migrations(&pool).await?;
//! // ... serve requests ...
//! close_db_pool(pool).await;
//! ```

use coursehub_config::DatabaseConfig;
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::PgPoolOptions;
use tracing::info;

pub use sqlx::PgPool;

pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Connects a pool sized by `config`. Fails if the first connection cannot be made.
pub async fn init_db_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.url)
        .await?;

    info!(
        max_connections = config.max_connections,
        "database pool initialized"
    );

    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await?;
    info!("database migrations applied");
    Ok(())
}

/// Waits for checked-out connections to return, then closes the pool.
pub async fn close_db_pool(pool: PgPool) {
    pool.close().await;
    info!("database pool closed");
}
