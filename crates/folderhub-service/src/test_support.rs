//! Fixtures shared by the unit tests.

use std::sync::Arc;

use chrono::DateTime;

use folderhub_core::config::AppConfig;
use folderhub_core::traits::{ManualClock, SystemClock};
use folderhub_database::DatabasePool;

use crate::registry::FolderHub;

/// A hub over a fresh in-memory database and the system clock.
pub(crate) async fn hub() -> FolderHub {
    let db = DatabasePool::in_memory().await.expect("in-memory database");
    FolderHub::new(db, Arc::new(SystemClock), &AppConfig::default())
}

/// A hub whose clock only moves when the test moves it.
pub(crate) async fn hub_with_manual_clock() -> (FolderHub, Arc<ManualClock>) {
    let start = DateTime::from_timestamp(1_700_000_000, 0).expect("valid timestamp");
    let clock = Arc::new(ManualClock::new(start));
    let db = DatabasePool::in_memory().await.expect("in-memory database");
    let hub = FolderHub::new(db, clock.clone(), &AppConfig::default());
    (hub, clock)
}
