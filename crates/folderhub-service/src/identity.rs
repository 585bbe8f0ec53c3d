//! Home folder and owner lookups.

use sqlx::SqliteConnection;
use tracing::error;

use folderhub_core::error::AppError;
use folderhub_core::result::AppResult;
use folderhub_core::types::{FolderId, UserId};
use folderhub_database::repositories::{FolderRepository, UserRepository};
use folderhub_entity::folder::Folder;

use crate::context::ServiceContext;

/// Resolves a user's home folder and a folder's owner. Read-only.
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    ctx: ServiceContext,
}

impl IdentityResolver {
    /// Creates a new identity resolver.
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// The unique rootless folder owned by `user_id`.
    pub async fn resolve_home_folder(&self, user_id: UserId) -> AppResult<FolderId> {
        let mut conn = self.ctx.db.acquire().await?;
        home_folder(&mut conn, user_id).await.map(|f| f.id)
    }

    /// The user owning `folder_id`.
    pub async fn resolve_owner(&self, folder_id: FolderId) -> AppResult<UserId> {
        let mut conn = self.ctx.db.acquire().await?;
        FolderRepository::new()
            .find_by_id(&mut conn, folder_id)
            .await?
            .map(|f| f.owner_id)
            .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))
    }
}

/// Loads the home folder of a user on the given connection.
pub(crate) async fn home_folder(conn: &mut SqliteConnection, user_id: UserId) -> AppResult<Folder> {
    if UserRepository::new().find_by_id(conn, user_id).await?.is_none() {
        return Err(AppError::not_found(format!("User {user_id} not found")));
    }

    let mut roots = FolderRepository::new().find_roots(conn, user_id).await?;
    if roots.len() != 1 {
        error!(
            user_id = %user_id,
            root_count = roots.len(),
            "User does not have exactly one home folder"
        );
        return Err(AppError::inconsistency(format!(
            "User {user_id} has {} home folders",
            roots.len()
        )));
    }
    Ok(roots.remove(0))
}
