//! Share link configuration.

use serde::{Deserialize, Serialize};

/// Share link settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareConfig {
    /// Lifetime used by the CLI when no explicit expiry is given.
    pub default_lifetime_hours: i64,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            default_lifetime_hours: 168,
        }
    }
}
