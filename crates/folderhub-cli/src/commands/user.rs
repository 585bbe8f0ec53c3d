//! User management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use folderhub_core::config::AppConfig;
use folderhub_core::error::AppError;
use folderhub_core::types::{FolderId, UserId};
use folderhub_entity::user::User;

use crate::output::{self, OutputFormat};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Create a user and its home folder
    Create {
        /// Username
        username: String,
        /// Credential (prompted for when omitted)
        #[arg(long)]
        credential: Option<String>,
    },
    /// Show a user by id or username
    Show {
        /// User ID or username
        user: String,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    /// User ID
    id: String,
    /// Username
    username: String,
    /// Home folder
    home_folder_id: String,
    /// Created at
    created_at: String,
}

impl UserRow {
    fn new(user: &User, home: FolderId) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            home_folder_id: home.to_string(),
            created_at: output::timestamp(&user.created_at),
        }
    }
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let hub = super::open_hub(config).await?;

    match &args.command {
        UserCommand::Create {
            username,
            credential,
        } => {
            let credential = match credential {
                Some(c) => c.clone(),
                None => dialoguer::Password::new()
                    .with_prompt("Credential")
                    .with_confirmation("Repeat credential", "Values do not match")
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?,
            };

            let (user, home) = hub.users.create_user(username, &credential).await?;
            match format {
                OutputFormat::Table => {
                    output::print_success(&format!("User '{}' created", user.username));
                    output::print_kv("User ID", &user.id.to_string());
                    output::print_kv("Home folder ID", &home.id.to_string());
                }
                OutputFormat::Json => output::print_item(&UserRow::new(&user, home.id), format),
            }
        }
        UserCommand::Show { user } => {
            let found = match user.parse::<UserId>() {
                Ok(id) => hub.users.find_by_id(id).await?,
                Err(_) => hub.users.find_by_username(user).await?,
            };
            let home = hub.identity.resolve_home_folder(found.id).await?;
            output::print_item(&UserRow::new(&found, home), format);
        }
    }

    Ok(())
}
