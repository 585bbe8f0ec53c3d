//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section, and every field carries a default so a partial (or missing)
//! file still yields a usable configuration.

pub mod database;
pub mod hierarchy;
pub mod logging;
pub mod retry;
pub mod share;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use self::database::DatabaseConfig;
pub use self::hierarchy::HierarchyConfig;
pub use self::logging::LoggingConfig;
pub use self::retry::RetryConfig;
pub use self::share::ShareConfig;

use crate::error::AppError;

/// Environment variable selecting the overlay file (`config/{env}.toml`).
pub const ENV_VAR: &str = "FOLDERHUB_ENV";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Retry policy for transient storage conflicts.
    pub retry: RetryConfig,
    /// Folder tree settings.
    pub hierarchy: HierarchyConfig,
    /// Share link settings.
    pub share: ShareConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// Merges the given file with an environment-specific overlay placed
    /// next to it (`{dir}/{env}.toml`, env from `FOLDERHUB_ENV`) and with
    /// environment variables of the form `FOLDERHUB__SECTION__KEY`.
    pub fn load(path: &str) -> Result<Self, AppError> {
        let env = std::env::var(ENV_VAR).unwrap_or_else(|_| "development".to_string());
        let overlay = Path::new(path)
            .with_file_name(format!("{env}.toml"))
            .to_string_lossy()
            .into_owned();

        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::File::with_name(&overlay).required(false))
            .add_source(
                config::Environment::with_prefix("FOLDERHUB")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = AppConfig::load("does/not/exist.toml").expect("defaults");
        assert_eq!(config.hierarchy.home_folder_name, "Home");
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                "[hierarchy]\nhome_folder_name = \"Root\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .and_then(|c| c.try_deserialize())
            .expect("parse");
        assert_eq!(config.hierarchy.home_folder_name, "Root");
        assert_eq!(config.hierarchy.max_name_length, 255);
        assert_eq!(config.share.default_lifetime_hours, 168);
    }
}
