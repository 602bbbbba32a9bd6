use secrecy::ExposeSecret;
use sqlx::migrate::Migrator;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::core::config::AppConfig;
use crate::core::error::AppResult;

pub type DbPool = PgPool;

/// Schema migrations embedded at compile time from `migrations/`.
///
/// Every statement is `IF NOT EXISTS`, so applying them against a database
/// created by an older deployment is a no-op.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Create a new database connection pool and bring the schema up to date.
///
/// Connections are checked out per query and returned to the pool when the
/// query finishes, on success and on error alike.
///
/// # Example
///
/// ```no_run
/// # async fn demo(config: gatecore::core::AppConfig) -> gatecore::AppResult<()> {
/// let pool = gatecore::storage::create_pool(&config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn create_pool(config: &AppConfig) -> AppResult<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(config.database_url.expose_secret())
        .await?;

    run_migrations(&pool).await?;
    log::info!("📁 Database initialized");

    Ok(pool)
}

/// Apply pending migrations. Safe to call on every startup.
pub async fn run_migrations(pool: &DbPool) -> AppResult<()> {
    MIGRATOR.run(pool).await?;
    Ok(())
}
