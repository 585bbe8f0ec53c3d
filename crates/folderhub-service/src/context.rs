//! Shared dependencies handed to every service.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use folderhub_core::config::RetryConfig;
use folderhub_core::result::AppResult;
use folderhub_core::traits::Clock;
use folderhub_database::{DatabasePool, DbTransaction, db_error};

/// The store handle, time source and retry policy a service runs with.
///
/// Cloning is cheap; the pool and the clock are reference counted.
#[derive(Debug, Clone)]
pub struct ServiceContext {
    /// The store of record.
    pub db: DatabasePool,
    /// Source of "now".
    pub clock: Arc<dyn Clock>,
    /// Retry policy for transient storage conflicts.
    pub retry: RetryConfig,
}

impl ServiceContext {
    /// Creates a new service context.
    pub fn new(db: DatabasePool, clock: Arc<dyn Clock>, retry: RetryConfig) -> Self {
        Self { db, clock, retry }
    }

    /// Current time from the injected clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Opens a store transaction.
    pub async fn begin(&self) -> AppResult<DbTransaction> {
        self.db.begin().await
    }
}

/// Commits a transaction, mapping lock contention to a retryable error.
pub(crate) async fn commit(tx: DbTransaction) -> AppResult<()> {
    tx.commit()
        .await
        .map_err(db_error("Failed to commit transaction"))
}
