//! SQLite connection pool management.

use std::str::FromStr;
use std::time::Duration;

use sqlx::pool::PoolConnection;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use sqlx::{Sqlite, Transaction};
use tracing::info;

use folderhub_core::config::DatabaseConfig;
use folderhub_core::error::{AppError, ErrorKind};
use folderhub_core::result::AppResult;

use crate::error::db_error;

/// An open store transaction. Dropped without commit means rolled back.
pub type DbTransaction = Transaction<'static, Sqlite>;

/// Wrapper around the sqlx SQLite connection pool.
///
/// This is the store-of-record handle injected into every service.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    /// The underlying sqlx connection pool.
    pool: SqlitePool,
}

impl DatabasePool {
    /// Create a new database pool from configuration.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        info!(
            url = %config.url,
            max_connections = config.max_connections,
            in_memory = config.is_in_memory(),
            "Connecting to SQLite"
        );

        let mut options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    format!("Invalid database URL '{}': {e}", config.url),
                    e,
                )
            })?
            .create_if_missing(config.create_if_missing)
            .foreign_keys(true)
            .busy_timeout(Duration::from_millis(config.busy_timeout_ms));

        let mut pool_options = SqlitePoolOptions::new()
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds));

        if config.is_in_memory() {
            // One connection, kept forever: the database lives and dies with it.
            pool_options = pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        } else {
            if config.create_if_missing {
                if let Some(dir) = options.get_filename().parent() {
                    if !dir.as_os_str().is_empty() {
                        std::fs::create_dir_all(dir)?;
                    }
                }
            }
            options = options
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal);
            pool_options = pool_options
                .max_connections(config.max_connections.max(1))
                .min_connections(config.min_connections);
        }

        let pool = pool_options.connect_with(options).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to open database: {e}"),
                e,
            )
        })?;

        info!("Successfully connected to SQLite");
        Ok(Self { pool })
    }

    /// Open a private in-memory database with all migrations applied.
    pub async fn in_memory() -> AppResult<Self> {
        let db = Self::connect(&DatabaseConfig::in_memory()).await?;
        crate::migration::run_migrations(db.pool()).await?;
        Ok(db)
    }

    /// Return a reference to the underlying sqlx pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Start a write transaction.
    ///
    /// `BEGIN IMMEDIATE` takes the write lock up front, so competing writers
    /// wait on `busy_timeout` instead of failing when their read snapshot
    /// goes stale.
    pub async fn begin(&self) -> AppResult<DbTransaction> {
        self.pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(db_error("Failed to begin transaction"))
    }

    /// Check out a plain connection for single-statement reads.
    pub async fn acquire(&self) -> AppResult<PoolConnection<Sqlite>> {
        self.pool
            .acquire()
            .await
            .map_err(db_error("Failed to acquire connection"))
    }

    /// Check database connectivity.
    pub async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(db_error("Health check failed"))
    }

    /// Close all connections in the pool.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}
