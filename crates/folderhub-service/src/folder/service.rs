//! Folder mutations and lookups.

use tracing::info;

use folderhub_core::error::AppError;
use folderhub_core::result::AppResult;
use folderhub_core::types::{FolderId, UserId};
use folderhub_database::repositories::{FileRepository, FolderRepository};
use folderhub_entity::folder::{
    AncestorDepth, CreateFolder, DeletionReport, EntryKind, Folder, FolderContents,
    FolderWithAncestors, UpdateFolder,
};

use super::deletion::delete_subtree;
use super::tree::{find_folder, load_ancestors};
use crate::context::{ServiceContext, commit};
use crate::naming::{NameRules, name_taken};
use crate::retry::with_retry;

/// Creates, renames, moves and deletes folders.
///
/// Every mutation validates and writes inside one transaction, so the
/// checks it makes still hold when it commits.
#[derive(Debug, Clone)]
pub struct FolderService {
    ctx: ServiceContext,
    rules: NameRules,
    folder_repo: FolderRepository,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(ctx: ServiceContext, rules: NameRules) -> Self {
        Self {
            ctx,
            rules,
            folder_repo: FolderRepository::new(),
        }
    }

    /// Creates a folder named `name` under `parent_id`.
    pub async fn create_folder(
        &self,
        name: &str,
        user_id: UserId,
        parent_id: FolderId,
    ) -> AppResult<Folder> {
        self.rules.validate("Folder name", name)?;
        with_retry(&self.ctx.retry, "create_folder", move || {
            self.try_create_folder(name, user_id, parent_id)
        })
        .await
    }

    async fn try_create_folder(
        &self,
        name: &str,
        user_id: UserId,
        parent_id: FolderId,
    ) -> AppResult<Folder> {
        let mut tx = self.ctx.begin().await?;

        let parent = self.folder_repo.find_by_id(&mut tx, parent_id).await?;
        match parent {
            Some(p) if p.owner_id == user_id => {}
            _ => {
                return Err(AppError::invalid_parent(format!(
                    "Folder {parent_id} does not exist or is not owned by {user_id}"
                )));
            }
        }

        if name_taken(&mut tx, EntryKind::Folder, parent_id, name).await? {
            return Err(AppError::conflict(format!(
                "A folder named '{name}' already exists here"
            )));
        }

        let data = CreateFolder {
            owner_id: user_id,
            parent_id: Some(parent_id),
            name: name.to_string(),
        };
        let folder = self.folder_repo.create(&mut tx, &data, self.ctx.now()).await?;
        commit(tx).await?;

        info!(
            folder_id = %folder.id,
            parent_id = %parent_id,
            user_id = %user_id,
            name = %folder.name,
            "Folder created"
        );
        Ok(folder)
    }

    /// Renames and/or moves a folder.
    ///
    /// Without a new parent the folder stays where it is. A new parent must
    /// belong to the folder's owner and must not be the folder itself or
    /// one of its descendants.
    pub async fn update_folder(
        &self,
        folder_id: FolderId,
        changes: &UpdateFolder,
    ) -> AppResult<Folder> {
        if changes.is_empty() {
            return Err(AppError::validation("Nothing to update"));
        }
        if let Some(name) = &changes.name {
            self.rules.validate("Folder name", name)?;
        }
        with_retry(&self.ctx.retry, "update_folder", move || {
            self.try_update_folder(folder_id, changes)
        })
        .await
    }

    async fn try_update_folder(
        &self,
        folder_id: FolderId,
        changes: &UpdateFolder,
    ) -> AppResult<Folder> {
        let mut tx = self.ctx.begin().await?;
        let folder = find_folder(&mut tx, folder_id).await?;

        let parent_id = match changes.parent_id {
            Some(target_id) => {
                let target = self
                    .folder_repo
                    .find_by_id(&mut tx, target_id)
                    .await?
                    .filter(|t| t.owner_id == folder.owner_id)
                    .ok_or_else(|| {
                        AppError::invalid_parent(format!(
                            "Folder {target_id} does not exist or is not owned by {}",
                            folder.owner_id
                        ))
                    })?;

                // The target is a descendant iff the folder shows up on the
                // target's own ancestor chain.
                let (target_ancestors, _) =
                    load_ancestors(&mut tx, &target, AncestorDepth::Full).await?;
                if target.id == folder.id || target_ancestors.iter().any(|a| a.id == folder.id) {
                    return Err(AppError::cycle_rejected(format!(
                        "Cannot move folder {folder_id} into itself or a descendant"
                    )));
                }
                Some(target.id)
            }
            None => folder.parent_id,
        };

        let name = changes.name.as_deref().unwrap_or(&folder.name);

        if let Some(parent_id) = parent_id {
            let sibling = self
                .folder_repo
                .find_by_parent_and_name(&mut tx, parent_id, name)
                .await?;
            if sibling.is_some_and(|s| s.id != folder.id) {
                return Err(AppError::conflict(format!(
                    "A folder named '{name}' already exists in the destination"
                )));
            }
        }

        let updated = self
            .folder_repo
            .update(&mut tx, folder.id, name, parent_id, self.ctx.now())
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))?;
        commit(tx).await?;

        info!(
            folder_id = %updated.id,
            old_parent_id = ?folder.parent_id,
            new_parent_id = ?updated.parent_id,
            name = %updated.name,
            "Folder updated"
        );
        Ok(updated)
    }

    /// Deletes a folder and everything below it.
    ///
    /// Home folders are refused; the user would be left without a root.
    pub async fn delete_folder(&self, folder_id: FolderId) -> AppResult<DeletionReport> {
        with_retry(&self.ctx.retry, "delete_folder", move || {
            self.try_delete_folder(folder_id)
        })
        .await
    }

    async fn try_delete_folder(&self, folder_id: FolderId) -> AppResult<DeletionReport> {
        let mut tx = self.ctx.begin().await?;
        let folder = find_folder(&mut tx, folder_id).await?;
        if folder.is_home() {
            return Err(AppError::validation("A home folder cannot be deleted"));
        }

        let report = delete_subtree(&mut tx, folder).await?;
        commit(tx).await?;

        info!(
            folder_id = %report.folder_id,
            folders = report.folders,
            files = report.files,
            share_links = report.share_links,
            "Folder deleted"
        );
        Ok(report)
    }

    /// Looks up a folder by id.
    pub async fn find_folder(&self, folder_id: FolderId) -> AppResult<Folder> {
        let mut conn = self.ctx.db.acquire().await?;
        find_folder(&mut conn, folder_id).await
    }

    /// Looks up a folder together with its ancestors.
    pub async fn find_with_ancestors(
        &self,
        folder_id: FolderId,
        depth: AncestorDepth,
    ) -> AppResult<FolderWithAncestors> {
        let mut conn = self.ctx.db.acquire().await?;
        let folder = find_folder(&mut conn, folder_id).await?;
        let (ancestors, truncated) = load_ancestors(&mut conn, &folder, depth).await?;
        Ok(FolderWithAncestors {
            folder,
            ancestors,
            truncated,
        })
    }

    /// Child folders and files of a folder, each ordered by name.
    pub async fn list_contents(&self, folder_id: FolderId) -> AppResult<FolderContents> {
        let mut conn = self.ctx.db.acquire().await?;
        find_folder(&mut conn, folder_id).await?;

        let folders = self.folder_repo.find_children(&mut conn, folder_id).await?;
        let files = FileRepository::new()
            .find_by_folder(&mut conn, folder_id)
            .await?;
        Ok(FolderContents { folders, files })
    }

    /// Whether `name` is already used by a child of `container_id` of the
    /// given kind.
    pub async fn check_name_collision(
        &self,
        name: &str,
        container_id: FolderId,
        kind: EntryKind,
    ) -> AppResult<bool> {
        let mut conn = self.ctx.db.acquire().await?;
        name_taken(&mut conn, kind, container_id, name).await
    }
}

#[cfg(test)]
mod tests {
    use folderhub_core::error::ErrorKind;

    use super::*;
    use crate::test_support;

    #[tokio::test]
    async fn test_create_rejects_duplicates_per_parent() {
        let hub = test_support::hub().await;
        let (user, home) = hub.users.create_user("alice", "pw").await.expect("user");
        let a = hub.folders.create_folder("A", user.id, home.id).await.expect("a");
        let b = hub.folders.create_folder("B", user.id, home.id).await.expect("b");

        hub.folders.create_folder("Same", user.id, a.id).await.expect("under a");
        hub.folders.create_folder("Same", user.id, b.id).await.expect("under b");
        let err = hub.folders.create_folder("Same", user.id, a.id).await.unwrap_err();
        assert!(err.is(ErrorKind::Conflict));
    }

    #[tokio::test]
    async fn test_create_requires_owned_parent() {
        let hub = test_support::hub().await;
        let (alice, _) = hub.users.create_user("alice", "pw").await.expect("alice");
        let (_, bob_home) = hub.users.create_user("bob", "pw").await.expect("bob");

        let err = hub.folders.create_folder("X", alice.id, bob_home.id).await.unwrap_err();
        assert!(err.is(ErrorKind::InvalidParent));
        let err = hub.folders.create_folder("X", alice.id, FolderId::new()).await.unwrap_err();
        assert!(err.is(ErrorKind::InvalidParent));
    }

    #[tokio::test]
    async fn test_create_validates_name() {
        let hub = test_support::hub().await;
        let (user, home) = hub.users.create_user("alice", "pw").await.expect("user");
        let err = hub.folders.create_folder("  ", user.id, home.id).await.unwrap_err();
        assert!(err.is(ErrorKind::Validation));
        let err = hub.folders.create_folder("a/b", user.id, home.id).await.unwrap_err();
        assert!(err.is(ErrorKind::Validation));
    }

    #[tokio::test]
    async fn test_rename_in_place() {
        let hub = test_support::hub().await;
        let (user, home) = hub.users.create_user("alice", "pw").await.expect("user");
        let a = hub.folders.create_folder("A", user.id, home.id).await.expect("a");
        hub.folders.create_folder("B", user.id, home.id).await.expect("b");

        let renamed = hub
            .folders
            .update_folder(a.id, &UpdateFolder::rename("Alpha"))
            .await
            .expect("rename");
        assert_eq!(renamed.name, "Alpha");
        assert_eq!(renamed.parent_id, Some(home.id));

        let err = hub
            .folders
            .update_folder(a.id, &UpdateFolder::rename("B"))
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Conflict));

        // Renaming to its own name is not a collision with itself.
        hub.folders
            .update_folder(a.id, &UpdateFolder::rename("Alpha"))
            .await
            .expect("same name");
    }

    #[tokio::test]
    async fn test_update_requires_a_change() {
        let hub = test_support::hub().await;
        let (_, home) = hub.users.create_user("alice", "pw").await.expect("user");
        let err = hub
            .folders
            .update_folder(home.id, &UpdateFolder::default())
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Validation));
    }

    #[tokio::test]
    async fn test_move_checks_destination_names() {
        let hub = test_support::hub().await;
        let (user, home) = hub.users.create_user("alice", "pw").await.expect("user");
        let a = hub.folders.create_folder("A", user.id, home.id).await.expect("a");
        let b = hub.folders.create_folder("B", user.id, home.id).await.expect("b");
        let a_x = hub.folders.create_folder("X", user.id, a.id).await.expect("a/x");
        hub.folders.create_folder("X", user.id, b.id).await.expect("b/x");

        let err = hub
            .folders
            .update_folder(a_x.id, &UpdateFolder::move_to(b.id))
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Conflict));

        let moved = hub
            .folders
            .update_folder(
                a_x.id,
                &UpdateFolder {
                    name: Some("Y".to_string()),
                    parent_id: Some(b.id),
                },
            )
            .await
            .expect("rename and move");
        assert_eq!(moved.parent_id, Some(b.id));
        assert_eq!(moved.name, "Y");
    }

    #[tokio::test]
    async fn test_move_rejections() {
        let hub = test_support::hub().await;
        let (alice, home) = hub.users.create_user("alice", "pw").await.expect("alice");
        let (_, bob_home) = hub.users.create_user("bob", "pw").await.expect("bob");
        let a = hub.folders.create_folder("A", alice.id, home.id).await.expect("a");

        let cases = [
            (a.id, a.id, ErrorKind::CycleRejected),
            (home.id, a.id, ErrorKind::CycleRejected),
            (a.id, bob_home.id, ErrorKind::InvalidParent),
            (a.id, FolderId::new(), ErrorKind::InvalidParent),
            (FolderId::new(), home.id, ErrorKind::NotFound),
        ];
        for (folder, target, kind) in cases {
            let err = hub
                .folders
                .update_folder(folder, &UpdateFolder::move_to(target))
                .await
                .unwrap_err();
            assert!(err.is(kind), "moving {folder} under {target}: {err}");
        }
    }

    #[tokio::test]
    async fn test_home_folder_is_protected() {
        let hub = test_support::hub().await;
        let (_, home) = hub.users.create_user("alice", "pw").await.expect("user");
        let err = hub.folders.delete_folder(home.id).await.unwrap_err();
        assert!(err.is(ErrorKind::Validation));
        assert!(hub.folders.find_folder(home.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_name_collision_namespaces() {
        let hub = test_support::hub().await;
        let (user, home) = hub.users.create_user("alice", "pw").await.expect("user");
        hub.folders.create_folder("report", user.id, home.id).await.expect("folder");

        let folders = &hub.folders;
        assert!(folders.check_name_collision("report", home.id, EntryKind::Folder).await.expect("f"));
        assert!(!folders.check_name_collision("report", home.id, EntryKind::File).await.expect("f"));
        assert!(!folders.check_name_collision("Report", home.id, EntryKind::Folder).await.expect("f"));

        hub.files.create_file("report", "blobs/r", home.id, 0).await.expect("same-named file");
    }

    #[tokio::test]
    async fn test_find_with_ancestors_and_contents() {
        let hub = test_support::hub().await;
        let (user, home) = hub.users.create_user("alice", "pw").await.expect("user");
        let docs = hub.folders.create_folder("Docs", user.id, home.id).await.expect("docs");
        hub.files.create_file("b.txt", "p/b", docs.id, 1).await.expect("b");
        hub.files.create_file("a.txt", "p/a", docs.id, 1).await.expect("a");

        let found = hub
            .folders
            .find_with_ancestors(docs.id, AncestorDepth::Full)
            .await
            .expect("found");
        assert_eq!(found.breadcrumb(), vec!["Home", "Docs"]);

        let contents = hub.folders.list_contents(docs.id).await.expect("contents");
        let names: Vec<_> = contents.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);

        let err = hub.folders.list_contents(FolderId::new()).await.unwrap_err();
        assert!(err.is(ErrorKind::NotFound));
    }
}
