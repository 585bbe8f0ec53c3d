//! Database migration runner.

use std::collections::HashSet;

use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use tracing::info;

use folderhub_core::error::{AppError, ErrorKind};
use folderhub_core::result::AppResult;

use crate::error::db_error;

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// One embedded migration and whether the database has it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Migration version.
    pub version: i64,
    /// Migration description.
    pub description: String,
    /// Whether it has been applied successfully.
    pub applied: bool,
}

/// Run all pending database migrations.
pub async fn run_migrations(pool: &SqlitePool) -> AppResult<()> {
    info!("Running database migrations...");

    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Failed to run migrations: {e}"),
            e,
        )
    })?;

    info!("Database migrations completed successfully");
    Ok(())
}

/// Report every embedded migration with its applied state.
pub async fn migration_status(pool: &SqlitePool) -> AppResult<Vec<MigrationStatus>> {
    let has_table = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = '_sqlx_migrations')",
    )
    .fetch_one(pool)
    .await
    .map_err(db_error("Failed to inspect schema"))?;

    let applied: HashSet<i64> = if has_table {
        sqlx::query_scalar::<_, i64>("SELECT version FROM _sqlx_migrations WHERE success = 1")
            .fetch_all(pool)
            .await
            .map_err(db_error("Failed to read applied migrations"))?
            .into_iter()
            .collect()
    } else {
        HashSet::new()
    };

    Ok(MIGRATOR
        .iter()
        .map(|m| MigrationStatus {
            version: m.version,
            description: m.description.to_string(),
            applied: applied.contains(&m.version),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use folderhub_core::config::DatabaseConfig;

    use super::*;
    use crate::connection::DatabasePool;

    #[tokio::test]
    async fn test_status_before_and_after_run() {
        let db = DatabasePool::connect(&DatabaseConfig::in_memory())
            .await
            .expect("open");

        let before = migration_status(db.pool()).await.expect("status");
        assert!(!before.is_empty());
        assert!(before.iter().all(|m| !m.applied));

        run_migrations(db.pool()).await.expect("migrate");
        run_migrations(db.pool()).await.expect("idempotent");

        let after = migration_status(db.pool()).await.expect("status");
        assert!(after.iter().all(|m| m.applied));
    }
}
