//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use folderhub_core::types::{FileId, FolderId};

/// Metadata of a file stored in a folder. Content lives elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct File {
    /// Unique file identifier.
    pub id: FileId,
    /// The folder containing this file.
    pub folder_id: FolderId,
    /// The file name (including extension), unique within the folder.
    pub name: String,
    /// Opaque reference into the byte store.
    pub storage_path: String,
    /// File size in bytes.
    pub size_bytes: i64,
    /// When the file was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFile {
    /// The folder to place the file in.
    pub folder_id: FolderId,
    /// The file name.
    pub name: String,
    /// Opaque reference into the byte store.
    pub storage_path: String,
    /// File size in bytes.
    pub size_bytes: u64,
}
