//! Database migration runner.

use sqlx::migrate::Migrator;
use tracing::info;

use taskhub_core::error::{AppError, ErrorKind};

use crate::connection::DatabasePool;
use crate::dialect::Dialect;

static POSTGRES: Migrator = sqlx::migrate!("../../migrations/postgres");
static SQLITE: Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Run all pending migrations for the pool's dialect on the leader.
pub async fn run_migrations(db: &DatabasePool) -> Result<(), AppError> {
    info!(dialect = db.dialect().as_str(), "Running database migrations...");

    let migrator = match db.dialect() {
        Dialect::Postgres => &POSTGRES,
        Dialect::Sqlite => &SQLITE,
    };

    migrator.run(db.leader()).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Failed to run migrations: {e}"),
            e,
        )
    })?;

    info!("Database migrations completed successfully");
    Ok(())
}
