//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use folderhub_core::types::UserId;

/// A registered user; the anchor of one folder tree.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Unique login name (case-insensitive).
    pub username: String,
    /// Credential material, opaque to FolderHub.
    #[serde(skip_serializing)]
    pub credential: String,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Desired username.
    pub username: String,
    /// Credential material, stored as given.
    pub credential: String,
}
