//! File record CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use folderhub_core::config::AppConfig;
use folderhub_core::error::AppError;
use folderhub_core::types::{FileId, FolderId};
use folderhub_entity::file::File;

use crate::output::{self, OutputFormat};

/// Arguments for file commands
#[derive(Debug, Args)]
pub struct FileArgs {
    /// File subcommand
    #[command(subcommand)]
    pub command: FileCommand,
}

/// File subcommands
#[derive(Debug, Subcommand)]
pub enum FileCommand {
    /// Record a file in a folder
    Create {
        /// File name
        name: String,
        /// Containing folder ID
        #[arg(short, long)]
        folder: FolderId,
        /// Storage path reference
        #[arg(short, long)]
        path: String,
        /// Size in bytes
        #[arg(short, long, default_value = "0")]
        size: u64,
    },
    /// Show a file record
    Show {
        /// File ID
        id: FileId,
    },
}

/// File display row
#[derive(Debug, Serialize, Tabled)]
struct FileRow {
    /// File ID
    id: String,
    /// Name
    name: String,
    /// Folder
    folder_id: String,
    /// Storage path
    storage_path: String,
    /// Size in bytes
    size_bytes: i64,
    /// Created at
    created_at: String,
}

impl From<&File> for FileRow {
    fn from(f: &File) -> Self {
        Self {
            id: f.id.to_string(),
            name: f.name.clone(),
            folder_id: f.folder_id.to_string(),
            storage_path: f.storage_path.clone(),
            size_bytes: f.size_bytes,
            created_at: output::timestamp(&f.created_at),
        }
    }
}

/// Execute file commands
pub async fn execute(
    args: &FileArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let hub = super::open_hub(config).await?;

    match &args.command {
        FileCommand::Create {
            name,
            folder,
            path,
            size,
        } => {
            let file = hub.files.create_file(name, path, *folder, *size).await?;
            output::print_item(&FileRow::from(&file), format);
        }
        FileCommand::Show { id } => {
            let file = hub.files.find_file(*id).await?;
            output::print_item(&FileRow::from(&file), format);
        }
    }

    Ok(())
}
