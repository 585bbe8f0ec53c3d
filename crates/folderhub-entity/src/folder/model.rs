//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use folderhub_core::types::{FolderId, UserId};

use crate::file::File;

/// A folder in a user's tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// The owning user. Never changes after creation.
    pub owner_id: UserId,
    /// Parent folder ID (null only for the user's home folder).
    pub parent_id: Option<FolderId>,
    /// Folder name, unique among its siblings.
    pub name: String,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last renamed or moved.
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Check if this is a home folder (no parent).
    pub fn is_home(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Data required to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolder {
    /// The folder owner.
    pub owner_id: UserId,
    /// Parent folder (None only for a home folder).
    pub parent_id: Option<FolderId>,
    /// Folder name.
    pub name: String,
}

/// A rename and/or move of an existing folder.
///
/// An absent `parent_id` keeps the folder where it is; there is no way to
/// turn a folder into a root through an update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateFolder {
    /// New name.
    pub name: Option<String>,
    /// New parent folder.
    pub parent_id: Option<FolderId>,
}

impl UpdateFolder {
    /// A pure rename.
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            parent_id: None,
        }
    }

    /// A pure move.
    pub fn move_to(parent_id: FolderId) -> Self {
        Self {
            name: None,
            parent_id: Some(parent_id),
        }
    }

    /// Check if nothing would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.parent_id.is_none()
    }
}

/// The namespace a name collision check runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Child folders of a parent folder.
    Folder,
    /// Files of a folder.
    File,
}

/// Direct children of a folder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FolderContents {
    /// Child folders, ordered by name.
    pub folders: Vec<Folder>,
    /// Files, ordered by name.
    pub files: Vec<File>,
}

/// What a cascading deletion removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionReport {
    /// Root of the deleted subtree.
    pub folder_id: FolderId,
    /// Folders removed, the root included.
    pub folders: u64,
    /// Files removed.
    pub files: u64,
    /// Share links removed.
    pub share_links: u64,
}
