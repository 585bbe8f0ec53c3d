//! Folder tree traversal: descendants, move targets, ancestors and nested
//! tree views.
//!
//! Every walk here uses an explicit worklist. Trees may be arbitrarily
//! deep, so nothing recurses on the call stack.

use std::collections::{HashMap, HashSet};

use sqlx::SqliteConnection;
use tracing::{debug, error};

use folderhub_core::error::AppError;
use folderhub_core::result::AppResult;
use folderhub_core::types::{FolderId, UserId};
use folderhub_database::repositories::{FileRepository, FolderRepository};
use folderhub_entity::folder::{AncestorDepth, Folder, FolderNode, FolderWithAncestors};

use crate::context::ServiceContext;

/// Read-only traversals over a user's folder tree.
#[derive(Debug, Clone)]
pub struct TreeService {
    ctx: ServiceContext,
}

impl TreeService {
    /// Creates a new tree service.
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// All folders strictly below `folder_id`.
    pub async fn descendants(&self, folder_id: FolderId) -> AppResult<HashSet<FolderId>> {
        let mut conn = self.ctx.db.acquire().await?;
        let root = find_folder(&mut conn, folder_id).await?;
        let subtree = Subtree::load(&mut conn, root).await?;
        Ok(subtree.descendant_ids().collect())
    }

    /// Folders of `user_id` that `folder_id` may be moved under: everything
    /// the user owns except the folder itself and its descendants.
    ///
    /// Empty for a home folder, since every other folder lies below it.
    pub async fn valid_move_targets(
        &self,
        user_id: UserId,
        folder_id: FolderId,
    ) -> AppResult<HashSet<FolderId>> {
        let mut conn = self.ctx.db.acquire().await?;
        let root = find_folder(&mut conn, folder_id).await?;
        let subtree = Subtree::load(&mut conn, root).await?;

        let excluded: HashSet<FolderId> = subtree
            .descendant_ids()
            .chain(std::iter::once(folder_id))
            .collect();
        let owned = FolderRepository::new()
            .find_ids_by_owner(&mut conn, user_id)
            .await?;

        Ok(owned
            .into_iter()
            .filter(|id| !excluded.contains(id))
            .collect())
    }

    /// The folder with its ancestors, root first.
    pub async fn ancestors(
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

    /// Nested view of the subtree rooted at `folder_id`, with file counts.
    pub async fn tree(&self, folder_id: FolderId) -> AppResult<FolderNode> {
        let mut conn = self.ctx.db.acquire().await?;
        let root = find_folder(&mut conn, folder_id).await?;
        let subtree = Subtree::load(&mut conn, root).await?;

        let ids: Vec<FolderId> = subtree.post_order().iter().map(|f| f.id).collect();
        let file_counts = FileRepository::new()
            .count_by_folders(&mut conn, &ids)
            .await?;

        subtree.into_nodes(&file_counts)
    }
}

/// Loads a folder or fails with `NotFound`.
pub(crate) async fn find_folder(
    conn: &mut SqliteConnection,
    folder_id: FolderId,
) -> AppResult<Folder> {
    FolderRepository::new()
        .find_by_id(conn, folder_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))
}

/// Walks parent pointers upward from `folder`.
///
/// Returns the ancestors root first, and whether the depth limit stopped
/// the walk before the home folder.
pub(crate) async fn load_ancestors(
    conn: &mut SqliteConnection,
    folder: &Folder,
    depth: AncestorDepth,
) -> AppResult<(Vec<Folder>, bool)> {
    let repo = FolderRepository::new();
    let mut chain = Vec::new();
    let mut visited = HashSet::from([folder.id]);
    let mut next = folder.parent_id;
    let mut truncated = false;

    while let Some(parent_id) = next {
        if depth.is_reached(chain.len()) {
            truncated = true;
            break;
        }
        if !visited.insert(parent_id) {
            error!(folder_id = %folder.id, revisited = %parent_id, "Cycle in folder ancestry");
            return Err(AppError::inconsistency(format!(
                "Folder {} has a cyclic ancestry through {parent_id}",
                folder.id
            )));
        }
        let parent = repo.find_by_id(conn, parent_id).await?.ok_or_else(|| {
            error!(folder_id = %folder.id, parent_id = %parent_id, "Dangling parent pointer");
            AppError::inconsistency(format!("Parent folder {parent_id} does not exist"))
        })?;
        next = parent.parent_id;
        chain.push(parent);
    }

    chain.reverse();
    Ok((chain, truncated))
}

/// A folder subtree loaded into memory, keyed by parent.
#[derive(Debug)]
pub(crate) struct Subtree {
    root: Folder,
    children: HashMap<FolderId, Vec<Folder>>,
    depths: HashMap<FolderId, usize>,
}

impl Subtree {
    /// Loads every folder below `root`, one query per frontier level.
    ///
    /// Seeing a folder twice means the stored parent links form a cycle.
    pub(crate) async fn load(conn: &mut SqliteConnection, root: Folder) -> AppResult<Self> {
        let repo = FolderRepository::new();
        let mut children: HashMap<FolderId, Vec<Folder>> = HashMap::new();
        let mut depths = HashMap::from([(root.id, 0)]);
        let mut frontier = vec![root.id];
        let mut level = 0;

        while !frontier.is_empty() {
            level += 1;
            let rows = repo.find_children_of(conn, &frontier).await?;
            let mut next = Vec::with_capacity(rows.len());

            for child in rows {
                if depths.insert(child.id, level).is_some() {
                    error!(root_id = %root.id, folder_id = %child.id, "Folder reached twice during traversal");
                    return Err(AppError::inconsistency(format!(
                        "Folder {} appears twice below {}",
                        child.id, root.id
                    )));
                }
                if child.owner_id != root.owner_id {
                    error!(root_id = %root.id, folder_id = %child.id, "Foreign folder inside subtree");
                    return Err(AppError::inconsistency(format!(
                        "Folder {} is not owned by {}",
                        child.id, root.owner_id
                    )));
                }
                let Some(parent_id) = child.parent_id else {
                    return Err(AppError::inconsistency(format!(
                        "Folder {} was listed as a child but has no parent",
                        child.id
                    )));
                };
                next.push(child.id);
                children.entry(parent_id).or_default().push(child);
            }

            frontier = next;
        }

        debug!(
            root_id = %root.id,
            folders = depths.len(),
            levels = level - 1,
            "Loaded subtree"
        );
        Ok(Self {
            root,
            children,
            depths,
        })
    }

    /// The subtree root.
    pub(crate) fn root(&self) -> &Folder {
        &self.root
    }

    /// Number of folders, the root included.
    pub(crate) fn len(&self) -> usize {
        self.depths.len()
    }

    /// Ids of every folder below the root.
    pub(crate) fn descendant_ids(&self) -> impl Iterator<Item = FolderId> + '_ {
        self.children.values().flatten().map(|f| f.id)
    }

    fn children_of(&self, id: FolderId) -> &[Folder] {
        self.children
            .get(&id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every folder with children before their parent; the root comes last.
    pub(crate) fn post_order(&self) -> Vec<&Folder> {
        let mut order = Vec::with_capacity(self.len());
        let mut stack = vec![(&self.root, false)];

        while let Some((folder, expanded)) = stack.pop() {
            if expanded {
                order.push(folder);
                continue;
            }
            stack.push((folder, true));
            // Reversed so siblings come out in name order.
            for child in self.children_of(folder.id).iter().rev() {
                stack.push((child, false));
            }
        }
        order
    }

    /// Assembles the nested node view bottom-up.
    pub(crate) fn into_nodes(self, file_counts: &HashMap<FolderId, u64>) -> AppResult<FolderNode> {
        let mut built: HashMap<FolderId, FolderNode> = HashMap::with_capacity(self.len());

        for folder in self.post_order() {
            let children = self
                .children_of(folder.id)
                .iter()
                .filter_map(|child| built.remove(&child.id))
                .collect();
            built.insert(
                folder.id,
                FolderNode {
                    id: folder.id,
                    name: folder.name.clone(),
                    depth: self.depths.get(&folder.id).copied().unwrap_or_default(),
                    file_count: file_counts.get(&folder.id).copied().unwrap_or(0),
                    children,
                },
            );
        }

        built
            .remove(&self.root.id)
            .ok_or_else(|| AppError::internal("Tree root missing after assembly"))
    }
}

#[cfg(test)]
mod tests {
    use folderhub_core::error::ErrorKind;
    use folderhub_entity::folder::UpdateFolder;

    use super::*;
    use crate::test_support;

    #[tokio::test]
    async fn test_descendants_exclude_self() {
        let hub = test_support::hub().await;
        let (user, home) = hub.users.create_user("alice", "pw").await.expect("user");
        let docs = hub.folders.create_folder("Docs", user.id, home.id).await.expect("docs");
        let a = hub.folders.create_folder("A", user.id, docs.id).await.expect("a");
        let b = hub.folders.create_folder("B", user.id, a.id).await.expect("b");

        let below_docs = hub.tree.descendants(docs.id).await.expect("descendants");
        assert_eq!(below_docs, HashSet::from([a.id, b.id]));
        assert!(hub.tree.descendants(b.id).await.expect("leaf").is_empty());
    }

    #[tokio::test]
    async fn test_move_targets_exclude_subtree() {
        let hub = test_support::hub().await;
        let (user, home) = hub.users.create_user("alice", "pw").await.expect("user");
        let docs = hub.folders.create_folder("Docs", user.id, home.id).await.expect("docs");
        let reports = hub.folders.create_folder("Reports", user.id, docs.id).await.expect("r");
        let music = hub.folders.create_folder("Music", user.id, home.id).await.expect("m");

        let targets = hub.tree.valid_move_targets(user.id, docs.id).await.expect("targets");
        assert_eq!(targets, HashSet::from([home.id, music.id]));

        let home_targets = hub.tree.valid_move_targets(user.id, home.id).await.expect("home");
        assert!(home_targets.is_empty());

        // Agrees with what a move actually accepts.
        let err = hub
            .folders
            .update_folder(docs.id, &UpdateFolder::move_to(reports.id))
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::CycleRejected));
        hub.folders
            .update_folder(docs.id, &UpdateFolder::move_to(music.id))
            .await
            .expect("valid target");
    }

    #[tokio::test]
    async fn test_ancestors_full_and_limited() {
        let hub = test_support::hub().await;
        let (user, home) = hub.users.create_user("alice", "pw").await.expect("user");
        let mut parent = home.id;
        let mut names = vec!["Home".to_string()];
        for i in 0..5 {
            let name = format!("L{i}");
            parent = hub.folders.create_folder(&name, user.id, parent).await.expect("level").id;
            names.push(name);
        }

        let full = hub.tree.ancestors(parent, AncestorDepth::Full).await.expect("full");
        assert!(!full.truncated);
        assert_eq!(full.ancestors.len(), 5);
        assert_eq!(full.ancestors[0].id, home.id);
        assert_eq!(full.breadcrumb(), names.iter().map(String::as_str).collect::<Vec<_>>());

        let limited = hub.tree.ancestors(parent, AncestorDepth::Limited(2)).await.expect("ltd");
        assert!(limited.truncated);
        assert_eq!(limited.breadcrumb(), vec!["L2", "L3", "L4"]);

        let at_home = hub.tree.ancestors(home.id, AncestorDepth::Limited(0)).await.expect("home");
        assert!(at_home.ancestors.is_empty());
        assert!(!at_home.truncated);
    }

    #[tokio::test]
    async fn test_tree_orders_children_and_counts_files() {
        let hub = test_support::hub().await;
        let (user, home) = hub.users.create_user("alice", "pw").await.expect("user");
        let zeta = hub.folders.create_folder("Zeta", user.id, home.id).await.expect("z");
        hub.folders.create_folder("Alpha", user.id, home.id).await.expect("a");
        hub.folders.create_folder("Inner", user.id, zeta.id).await.expect("i");
        hub.files.create_file("a.txt", "blobs/1", zeta.id, 10).await.expect("f1");
        hub.files.create_file("b.txt", "blobs/2", zeta.id, 20).await.expect("f2");

        let tree = hub.tree.tree(home.id).await.expect("tree");
        assert_eq!(tree.subtree_size(), 4);
        let names: Vec<_> = tree.children.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);
        let zeta_node = &tree.children[1];
        assert_eq!(zeta_node.file_count, 2);
        assert_eq!(zeta_node.depth, 1);
        assert_eq!(zeta_node.children[0].depth, 2);
    }

    #[tokio::test]
    async fn test_cyclic_store_is_detected() {
        let hub = test_support::hub().await;
        let (user, home) = hub.users.create_user("alice", "pw").await.expect("user");
        let a = hub.folders.create_folder("A", user.id, home.id).await.expect("a");
        let b = hub.folders.create_folder("B", user.id, a.id).await.expect("b");

        // Corrupt the store behind the services' back.
        sqlx::query("UPDATE folders SET parent_id = ? WHERE id = ?")
            .bind(b.id)
            .bind(a.id)
            .execute(hub.db().pool())
            .await
            .expect("corrupt");

        let err = hub.tree.descendants(a.id).await.unwrap_err();
        assert!(err.is(ErrorKind::InternalInconsistency));
        let err = hub.tree.ancestors(b.id, AncestorDepth::Full).await.unwrap_err();
        assert!(err.is(ErrorKind::InternalInconsistency));
    }
}
