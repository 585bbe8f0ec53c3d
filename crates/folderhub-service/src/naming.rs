//! Name rules and sibling collision checks.

use sqlx::SqliteConnection;

use folderhub_core::config::HierarchyConfig;
use folderhub_core::error::AppError;
use folderhub_core::result::AppResult;
use folderhub_core::types::FolderId;
use folderhub_database::repositories::{FileRepository, FolderRepository};
use folderhub_entity::folder::EntryKind;

/// Validates folder, file and user names.
#[derive(Debug, Clone, Copy)]
pub struct NameRules {
    max_length: usize,
}

impl NameRules {
    /// Creates rules allowing names up to `max_length` characters.
    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }

    /// Creates rules from the hierarchy configuration.
    pub fn from_config(config: &HierarchyConfig) -> Self {
        Self::new(config.max_name_length)
    }

    /// Checks a name. `what` names the field in the error message.
    pub fn validate(&self, what: &str, name: &str) -> AppResult<()> {
        if name.trim().is_empty() {
            return Err(AppError::validation(format!("{what} cannot be empty")));
        }
        if name.chars().count() > self.max_length {
            return Err(AppError::validation(format!(
                "{what} exceeds {} characters",
                self.max_length
            )));
        }
        if name.contains('/') || name.contains('\0') {
            return Err(AppError::validation(format!(
                "{what} cannot contain '/' or NUL"
            )));
        }
        Ok(())
    }
}

impl Default for NameRules {
    fn default() -> Self {
        Self::from_config(&HierarchyConfig::default())
    }
}

/// Whether `name` is already used in the given namespace of a folder.
///
/// Folders and files are separate namespaces: a file and a subfolder of
/// the same folder may share a name.
pub(crate) async fn name_taken(
    conn: &mut SqliteConnection,
    kind: EntryKind,
    container_id: FolderId,
    name: &str,
) -> AppResult<bool> {
    let taken = match kind {
        EntryKind::Folder => FolderRepository::new()
            .find_by_parent_and_name(conn, container_id, name)
            .await?
            .is_some(),
        EntryKind::File => FileRepository::new()
            .find_by_folder_and_name(conn, container_id, name)
            .await?
            .is_some(),
    };
    Ok(taken)
}
