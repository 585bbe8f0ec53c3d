//! Shared test helpers for integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::DateTime;
use tempfile::TempDir;

use folderhub_core::config::{AppConfig, DatabaseConfig};
use folderhub_core::traits::{ManualClock, SystemClock};
use folderhub_database::DatabasePool;
use folderhub_database::migration::run_migrations;
use folderhub_entity::folder::Folder;
use folderhub_entity::user::User;
use folderhub_service::FolderHub;

/// A hub over a private in-memory database.
pub async fn hub() -> FolderHub {
    let db = DatabasePool::in_memory().await.expect("in-memory database");
    FolderHub::new(db, Arc::new(SystemClock), &AppConfig::default())
}

/// A hub over a private in-memory database with a hand-driven clock.
pub async fn hub_with_clock() -> (FolderHub, Arc<ManualClock>) {
    let start = DateTime::from_timestamp(1_700_000_000, 0).expect("valid timestamp");
    let clock = Arc::new(ManualClock::new(start));
    let db = DatabasePool::in_memory().await.expect("in-memory database");
    (FolderHub::new(db, clock.clone(), &AppConfig::default()), clock)
}

/// A hub over an on-disk database in `dir` with a multi-connection pool,
/// for tests where transactions really overlap.
pub async fn file_backed_hub(dir: &TempDir) -> FolderHub {
    let path = dir.path().join("folderhub.db");
    let config = AppConfig {
        database: DatabaseConfig {
            url: format!("sqlite://{}", path.display()),
            max_connections: 8,
            ..DatabaseConfig::default()
        },
        ..AppConfig::default()
    };

    let db = DatabasePool::connect(&config.database).await.expect("open database");
    run_migrations(db.pool()).await.expect("migrate");
    FolderHub::new(db, Arc::new(SystemClock), &config)
}

/// Create a user and return it with its home folder.
pub async fn user(hub: &FolderHub, username: &str) -> (User, Folder) {
    hub.users
        .create_user(username, "opaque-credential")
        .await
        .expect("create user")
}

/// Build a chain of `depth` nested folders under `parent`. Returns the
/// folders top to bottom.
pub async fn chain(hub: &FolderHub, owner: &User, parent: &Folder, depth: usize) -> Vec<Folder> {
    let mut folders = Vec::with_capacity(depth);
    let mut parent_id = parent.id;
    for level in 0..depth {
        let folder = hub
            .folders
            .create_folder(&format!("level-{level}"), owner.id, parent_id)
            .await
            .expect("create level");
        parent_id = folder.id;
        folders.push(folder);
    }
    folders
}
