//! CLI command definitions and dispatch.

pub mod file;
pub mod folder;
pub mod migrate;
pub mod share;
pub mod user;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use folderhub_core::config::AppConfig;
use folderhub_core::error::AppError;
use folderhub_core::traits::SystemClock;
use folderhub_database::DatabasePool;
use folderhub_database::migration::run_migrations;
use folderhub_service::FolderHub;

use crate::output::OutputFormat;

/// FolderHub: per-user folder trees with share links
#[derive(Debug, Parser)]
#[command(name = "folderhub", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// User management
    User(user::UserArgs),
    /// Folder management
    Folder(folder::FolderArgs),
    /// File records
    File(file::FileArgs),
    /// Share links
    Share(share::ShareArgs),
}

impl Cli {
    /// Load the configuration file named on the command line
    pub fn load_config(&self) -> Result<AppConfig, AppError> {
        AppConfig::load(&self.config)
    }

    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, config, self.format).await,
            Commands::User(args) => user::execute(args, config, self.format).await,
            Commands::Folder(args) => folder::execute(args, config, self.format).await,
            Commands::File(args) => file::execute(args, config, self.format).await,
            Commands::Share(args) => share::execute(args, config, self.format).await,
        }
    }
}

/// Helper: connect to the database, apply pending migrations and wire the
/// services
pub async fn open_hub(config: &AppConfig) -> Result<FolderHub, AppError> {
    let db = DatabasePool::connect(&config.database).await?;
    run_migrations(db.pool()).await?;
    Ok(FolderHub::new(db, Arc::new(SystemClock), config))
}

/// Helper: ask a yes/no question, defaulting to no
pub fn confirm(prompt: &str) -> Result<bool, AppError> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {e}")))
}
