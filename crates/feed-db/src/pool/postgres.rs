//! PostgreSQL connection pool and schema migrations

use std::path::Path;
use std::time::Duration;

use feed_common::DatabaseConfig;
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);
const IDLE_TIMEOUT: Duration = Duration::from_secs(300);
const MAX_LIFETIME: Duration = Duration::from_secs(1800);

/// Directory holding the `*.sql` migrations, overridable with `MIGRATIONS_DIR`
pub const DEFAULT_MIGRATIONS_DIR: &str = "./migrations";

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .idle_timeout(IDLE_TIMEOUT)
        .max_lifetime(MAX_LIFETIME)
        .connect(&config.url)
        .await
}

/// Apply pending migrations from `dir`
pub async fn run_migrations(pool: &PgPool, dir: &Path) -> Result<(), MigrateError> {
    let migrator = Migrator::new(dir).await?;
    migrator.run(pool).await?;
    info!(dir = %dir.display(), count = migrator.iter().count(), "Migrations applied");
    Ok(())
}

pub fn migrations_dir() -> std::path::PathBuf {
    std::env::var("MIGRATIONS_DIR")
        .unwrap_or_else(|_| DEFAULT_MIGRATIONS_DIR.to_string())
        .into()
}

/// Liveness probe used by the readiness endpoint
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await
        .map(|_| ())
}
