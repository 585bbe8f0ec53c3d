//! Database configuration.

use serde::{Deserialize, Serialize};

/// SQLite connection pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite connection URL (`sqlite://path/to/file.db` or `sqlite::memory:`).
    pub url: String,
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    pub min_connections: u32,
    /// Pool acquire timeout in seconds.
    pub connect_timeout_seconds: u64,
    /// How long SQLite waits on a locked database before reporting busy.
    pub busy_timeout_ms: u64,
    /// Create the database file when it does not exist yet.
    pub create_if_missing: bool,
}

impl DatabaseConfig {
    /// Configuration for a private in-memory database.
    ///
    /// The pool is pinned to a single connection because every SQLite
    /// in-memory connection owns a separate database.
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            ..Self::default()
        }
    }

    /// Whether the URL points at an in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://data/folderhub.db".to_string(),
            max_connections: 8,
            min_connections: 1,
            connect_timeout_seconds: 10,
            busy_timeout_ms: 5000,
            create_if_missing: true,
        }
    }
}
