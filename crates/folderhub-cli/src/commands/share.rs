//! Share link CLI commands.

use chrono::Duration;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use folderhub_core::config::AppConfig;
use folderhub_core::error::AppError;
use folderhub_core::types::{FolderId, ShareLinkId};
use folderhub_entity::share::ShareLink;

use crate::output::{self, OutputFormat};

/// Arguments for share commands
#[derive(Debug, Args)]
pub struct ShareArgs {
    /// Share subcommand
    #[command(subcommand)]
    pub command: ShareCommand,
}

/// Share subcommands
#[derive(Debug, Subcommand)]
pub enum ShareCommand {
    /// Create a share link for a folder
    Create {
        /// Folder ID
        folder: FolderId,
        /// Lifetime in hours (defaults to configuration)
        #[arg(long)]
        hours: Option<i64>,
    },
    /// Check that a link is valid
    Resolve {
        /// Share link ID
        id: ShareLinkId,
    },
    /// List the links of a folder
    List {
        /// Folder ID
        folder: FolderId,
    },
    /// Revoke a link
    Revoke {
        /// Share link ID
        id: ShareLinkId,
    },
    /// Delete all expired links
    Reap,
}

/// Share link display row
#[derive(Debug, Serialize, Tabled)]
struct ShareRow {
    /// Link ID
    id: String,
    /// Folder
    folder_id: String,
    /// Expires at
    expires_at: String,
    /// Created at
    created_at: String,
}

impl From<&ShareLink> for ShareRow {
    fn from(l: &ShareLink) -> Self {
        Self {
            id: l.id.to_string(),
            folder_id: l.folder_id.to_string(),
            expires_at: output::timestamp(&l.expires_at),
            created_at: output::timestamp(&l.created_at),
        }
    }
}

/// Execute share commands
pub async fn execute(
    args: &ShareArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let hub = super::open_hub(config).await?;

    match &args.command {
        ShareCommand::Create { folder, hours } => {
            let hours = hours.unwrap_or(config.share.default_lifetime_hours);
            let expires_at = Duration::try_hours(hours)
                .filter(|lifetime| *lifetime > Duration::zero())
                .and_then(|lifetime| hub.now().checked_add_signed(lifetime))
                .ok_or_else(|| AppError::validation(format!("Invalid lifetime: {hours} hours")))?;
            let link = hub.shares.create_share_link(*folder, expires_at).await?;
            output::print_item(&ShareRow::from(&link), format);
        }
        ShareCommand::Resolve { id } => {
            let link = hub.shares.resolve_share_link(*id).await?;
            output::print_item(&ShareRow::from(&link), format);
        }
        ShareCommand::List { folder } => {
            let rows: Vec<ShareRow> = hub
                .shares
                .list_for_folder(*folder)
                .await?
                .iter()
                .map(ShareRow::from)
                .collect();
            output::print_list(&rows, format);
        }
        ShareCommand::Revoke { id } => {
            hub.shares.revoke_share_link(*id).await?;
            output::print_success(&format!("Share link {id} revoked"));
        }
        ShareCommand::Reap => {
            let purged = hub.shares.purge_expired().await?;
            output::print_success(&format!("Removed {purged} expired share links"));
        }
    }

    Ok(())
}
