//! Cascading deletion of folder subtrees.

use sqlx::SqliteConnection;
use tracing::{error, info};

use folderhub_core::error::AppError;
use folderhub_core::result::AppResult;
use folderhub_core::types::FolderId;
use folderhub_database::repositories::{FileRepository, FolderRepository, ShareLinkRepository};
use folderhub_entity::folder::{DeletionReport, Folder};

use super::tree::{Subtree, find_folder};
use crate::context::{ServiceContext, commit};
use crate::retry::with_retry;

/// Removes a folder with everything below it as one atomic unit.
///
/// The deleter applies no policy: it will remove a home folder too.
/// [`FolderService::delete_folder`](super::FolderService::delete_folder)
/// is the guarded entry point.
#[derive(Debug, Clone)]
pub struct CascadeDeleter {
    ctx: ServiceContext,
}

impl CascadeDeleter {
    /// Creates a new cascade deleter.
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Deletes `folder_id` and its whole subtree in one transaction.
    ///
    /// A folder that is already gone fails with `NotFound`, so of two
    /// concurrent deletes of the same folder exactly one succeeds.
    pub async fn delete_folder(&self, folder_id: FolderId) -> AppResult<DeletionReport> {
        with_retry(&self.ctx.retry, "delete_folder", move || {
            self.try_delete(folder_id)
        })
        .await
    }

    async fn try_delete(&self, folder_id: FolderId) -> AppResult<DeletionReport> {
        let mut tx = self.ctx.begin().await?;
        let folder = find_folder(&mut tx, folder_id).await?;
        let report = delete_subtree(&mut tx, folder).await?;
        commit(tx).await?;

        info!(
            folder_id = %report.folder_id,
            folders = report.folders,
            files = report.files,
            share_links = report.share_links,
            "Deleted folder subtree"
        );
        Ok(report)
    }
}

/// Deletes a loaded folder and its subtree on the given connection.
///
/// Phase one collects the subtree with children ahead of their parents;
/// phase two removes share links, then files, then folders in that order.
/// The caller owns the transaction.
pub(crate) async fn delete_subtree(
    conn: &mut SqliteConnection,
    folder: Folder,
) -> AppResult<DeletionReport> {
    let folder_id = folder.id;
    let subtree = Subtree::load(conn, folder).await?;
    let ids: Vec<FolderId> = subtree.post_order().iter().map(|f| f.id).collect();

    let share_links = ShareLinkRepository::new()
        .delete_by_folders(conn, &ids)
        .await?;
    let files = FileRepository::new().delete_by_folders(conn, &ids).await?;
    let folders = FolderRepository::new().delete_many(conn, &ids).await?;

    if folders != ids.len() as u64 {
        error!(
            folder_id = %folder_id,
            expected = ids.len(),
            deleted = folders,
            "Subtree changed during deletion"
        );
        return Err(AppError::inconsistency(format!(
            "Expected to delete {} folders under {folder_id}, deleted {folders}",
            ids.len()
        )));
    }

    Ok(DeletionReport {
        folder_id: subtree.root().id,
        folders,
        files,
        share_links,
    })
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use folderhub_core::error::ErrorKind;

    use super::*;
    use crate::test_support;

    #[tokio::test]
    async fn test_delete_reports_counts() {
        let hub = test_support::hub().await;
        let (user, home) = hub.users.create_user("alice", "pw").await.expect("user");
        let docs = hub.folders.create_folder("Docs", user.id, home.id).await.expect("docs");
        let inner = hub.folders.create_folder("Inner", user.id, docs.id).await.expect("inner");
        hub.files.create_file("a", "p/a", docs.id, 1).await.expect("a");
        hub.files.create_file("b", "p/b", inner.id, 2).await.expect("b");
        let expires = hub.now() + Duration::hours(1);
        hub.shares.create_share_link(inner.id, expires).await.expect("link");

        let report = hub.deleter.delete_folder(docs.id).await.expect("delete");
        assert_eq!(
            report,
            DeletionReport {
                folder_id: docs.id,
                folders: 2,
                files: 2,
                share_links: 1,
            }
        );

        let err = hub.deleter.delete_folder(docs.id).await.unwrap_err();
        assert!(err.is(ErrorKind::NotFound));
    }

    #[tokio::test]
    async fn test_delete_leaves_siblings_alone() {
        let hub = test_support::hub().await;
        let (user, home) = hub.users.create_user("alice", "pw").await.expect("user");
        let docs = hub.folders.create_folder("Docs", user.id, home.id).await.expect("docs");
        let music = hub.folders.create_folder("Music", user.id, home.id).await.expect("music");
        hub.files.create_file("song", "p/song", music.id, 3).await.expect("song");

        hub.deleter.delete_folder(docs.id).await.expect("delete");

        let contents = hub.folders.list_contents(music.id).await.expect("music");
        assert_eq!(contents.files.len(), 1);
        let contents = hub.folders.list_contents(home.id).await.expect("home");
        assert_eq!(contents.folders, vec![music]);
    }
}
