//! Folder management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use folderhub_core::config::AppConfig;
use folderhub_core::error::AppError;
use folderhub_core::types::{FolderId, UserId};
use folderhub_entity::folder::{AncestorDepth, Folder, FolderNode, UpdateFolder};

use crate::output::{self, OutputFormat};

/// Arguments for folder commands
#[derive(Debug, Args)]
pub struct FolderArgs {
    /// Folder subcommand
    #[command(subcommand)]
    pub command: FolderCommand,
}

/// Folder subcommands
#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// Create a new folder
    Create {
        /// Folder name
        name: String,
        /// Owning user ID
        #[arg(short, long)]
        user: UserId,
        /// Parent folder ID (defaults to the user's home folder)
        #[arg(short, long)]
        parent: Option<FolderId>,
    },
    /// Rename a folder in place
    Rename {
        /// Folder ID
        id: FolderId,
        /// New name
        name: String,
    },
    /// Move a folder under another folder
    Move {
        /// Folder ID
        id: FolderId,
        /// New parent folder ID
        #[arg(short, long)]
        to: FolderId,
        /// Also rename the folder
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Delete a folder and everything below it
    Delete {
        /// Folder ID
        id: FolderId,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show a folder with its breadcrumb
    Show {
        /// Folder ID
        id: FolderId,
        /// Number of ancestors to load (defaults to configuration)
        #[arg(short, long)]
        depth: Option<usize>,
    },
    /// Show the folder tree below a folder
    Tree {
        /// Folder ID
        id: FolderId,
    },
    /// List the folders a folder may be moved under
    Targets {
        /// Folder ID
        id: FolderId,
    },
    /// List child folders and files
    Ls {
        /// Folder ID
        id: FolderId,
    },
}

/// Folder display row
#[derive(Debug, Serialize, Tabled)]
struct FolderRow {
    /// Folder ID
    id: String,
    /// Name
    name: String,
    /// Parent
    parent_id: String,
    /// Updated at
    updated_at: String,
}

impl From<&Folder> for FolderRow {
    fn from(f: &Folder) -> Self {
        Self {
            id: f.id.to_string(),
            name: f.name.clone(),
            parent_id: f.parent_id.map(|p| p.to_string()).unwrap_or_default(),
            updated_at: output::timestamp(&f.updated_at),
        }
    }
}

/// Directory listing row
#[derive(Debug, Serialize, Tabled)]
struct EntryRow {
    /// Kind
    kind: &'static str,
    /// ID
    id: String,
    /// Name
    name: String,
    /// Size in bytes
    size: String,
}

/// Execute folder commands
pub async fn execute(
    args: &FolderArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let hub = super::open_hub(config).await?;

    match &args.command {
        FolderCommand::Create { name, user, parent } => {
            let parent = match parent {
                Some(p) => *p,
                None => hub.identity.resolve_home_folder(*user).await?,
            };
            let folder = hub.folders.create_folder(name, *user, parent).await?;
            output::print_success(&format!("Folder '{}' created (id: {})", folder.name, folder.id));
        }
        FolderCommand::Rename { id, name } => {
            let folder = hub.folders.update_folder(*id, &UpdateFolder::rename(name)).await?;
            output::print_success(&format!("Folder {} renamed to '{}'", folder.id, folder.name));
        }
        FolderCommand::Move { id, to, name } => {
            let changes = UpdateFolder {
                name: name.clone(),
                parent_id: Some(*to),
            };
            let folder = hub.folders.update_folder(*id, &changes).await?;
            output::print_success(&format!("Folder '{}' moved under {to}", folder.name));
        }
        FolderCommand::Delete { id, yes } => {
            let folder = hub.folders.find_folder(*id).await?;
            if !yes
                && !super::confirm(&format!(
                    "Delete '{}' with all subfolders, files and share links?",
                    folder.name
                ))?
            {
                output::print_warning("Cancelled.");
                return Ok(());
            }

            let report = hub.folders.delete_folder(*id).await?;
            match format {
                OutputFormat::Table => output::print_success(&format!(
                    "Deleted {} folders, {} files, {} share links",
                    report.folders, report.files, report.share_links
                )),
                OutputFormat::Json => output::print_json(&report),
            }
        }
        FolderCommand::Show { id, depth } => {
            let depth = match depth {
                Some(n) => AncestorDepth::Limited(*n),
                None => hub.breadcrumb_depth(),
            };
            let found = hub.folders.find_with_ancestors(*id, depth).await?;
            match format {
                OutputFormat::Table => {
                    let prefix = if found.truncated { ".../" } else { "/" };
                    output::print_item(&FolderRow::from(&found.folder), format);
                    output::print_kv("Path", &format!("{prefix}{}", found.breadcrumb().join("/")));
                }
                OutputFormat::Json => output::print_json(&found),
            }
        }
        FolderCommand::Tree { id } => {
            let tree = hub.tree.tree(*id).await?;
            match format {
                OutputFormat::Table => print_tree(&tree),
                OutputFormat::Json => output::print_json(&tree),
            }
        }
        FolderCommand::Targets { id } => {
            let owner = hub.identity.resolve_owner(*id).await?;
            let mut rows = Vec::new();
            for target in hub.tree.valid_move_targets(owner, *id).await? {
                rows.push(FolderRow::from(&hub.folders.find_folder(target).await?));
            }
            rows.sort_by(|a, b| a.name.cmp(&b.name));
            output::print_list(&rows, format);
        }
        FolderCommand::Ls { id } => {
            let contents = hub.folders.list_contents(*id).await?;
            let folders = contents.folders.iter().map(|f| EntryRow {
                kind: "folder",
                id: f.id.to_string(),
                name: f.name.clone(),
                size: String::new(),
            });
            let files = contents.files.iter().map(|f| EntryRow {
                kind: "file",
                id: f.id.to_string(),
                name: f.name.clone(),
                size: f.size_bytes.to_string(),
            });
            let rows: Vec<EntryRow> = folders.chain(files).collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}

/// Print a tree as indented lines, without recursion.
fn print_tree(root: &FolderNode) {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        let indent = "  ".repeat(node.depth);
        if node.file_count > 0 {
            println!("{indent}{}/ ({} files)", node.name, node.file_count);
        } else {
            println!("{indent}{}/", node.name);
        }
        stack.extend(node.children.iter().rev());
    }
}
