//! Folder repository implementation.

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use folderhub_core::result::AppResult;
use folderhub_core::types::{FolderId, UserId};
use folderhub_entity::folder::{CreateFolder, Folder};

use super::ID_CHUNK_SIZE;
use crate::error::db_error;

/// Repository for folder CRUD and tree queries.
#[derive(Debug, Clone, Copy, Default)]
pub struct FolderRepository;

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new() -> Self {
        Self
    }

    /// Find a folder by ID.
    pub async fn find_by_id(
        &self,
        conn: &mut SqliteConnection,
        id: FolderId,
    ) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = ?")
            .bind(id)
            .fetch_optional(conn)
            .await
            .map_err(db_error("Failed to find folder"))
    }

    /// List the rootless folders of a user. Exactly one is expected.
    pub async fn find_roots(
        &self,
        conn: &mut SqliteConnection,
        owner_id: UserId,
    ) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE owner_id = ? AND parent_id IS NULL ORDER BY created_at ASC",
        )
        .bind(owner_id)
        .fetch_all(conn)
        .await
        .map_err(db_error("Failed to list root folders"))
    }

    /// List the ids of every folder a user owns.
    pub async fn find_ids_by_owner(
        &self,
        conn: &mut SqliteConnection,
        owner_id: UserId,
    ) -> AppResult<Vec<FolderId>> {
        sqlx::query_scalar::<_, FolderId>("SELECT id FROM folders WHERE owner_id = ?")
            .bind(owner_id)
            .fetch_all(conn)
            .await
            .map_err(db_error("Failed to list folders of owner"))
    }

    /// List direct children of a folder, ordered by name.
    pub async fn find_children(
        &self,
        conn: &mut SqliteConnection,
        parent_id: FolderId,
    ) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE parent_id = ? ORDER BY name ASC")
            .bind(parent_id)
            .fetch_all(conn)
            .await
            .map_err(db_error("Failed to list child folders"))
    }

    /// List direct children of any of the given folders, ordered by name.
    ///
    /// One query per chunk of parents; this is how a traversal expands a
    /// whole frontier level at once.
    pub async fn find_children_of(
        &self,
        conn: &mut SqliteConnection,
        parent_ids: &[FolderId],
    ) -> AppResult<Vec<Folder>> {
        let mut children = Vec::new();
        for chunk in parent_ids.chunks(ID_CHUNK_SIZE) {
            let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM folders WHERE parent_id IN (");
            let mut ids = qb.separated(", ");
            for id in chunk {
                ids.push_bind(*id);
            }
            ids.push_unseparated(") ORDER BY name ASC");

            let rows = qb
                .build_query_as::<Folder>()
                .fetch_all(&mut *conn)
                .await
                .map_err(db_error("Failed to expand folder frontier"))?;
            children.extend(rows);
        }
        Ok(children)
    }

    /// Find a child folder by exact name.
    pub async fn find_by_parent_and_name(
        &self,
        conn: &mut SqliteConnection,
        parent_id: FolderId,
        name: &str,
    ) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE parent_id = ? AND name = ?")
            .bind(parent_id)
            .bind(name)
            .fetch_optional(conn)
            .await
            .map_err(db_error("Failed to find folder by name"))
    }

    /// Create a new folder.
    pub async fn create(
        &self,
        conn: &mut SqliteConnection,
        data: &CreateFolder,
        now: DateTime<Utc>,
    ) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (id, owner_id, parent_id, name, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(FolderId::new())
        .bind(data.owner_id)
        .bind(data.parent_id)
        .bind(&data.name)
        .bind(now)
        .bind(now)
        .fetch_one(conn)
        .await
        .map_err(db_error("Failed to create folder"))
    }

    /// Set a folder's name and parent.
    pub async fn update(
        &self,
        conn: &mut SqliteConnection,
        folder_id: FolderId,
        name: &str,
        parent_id: Option<FolderId>,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>(
            "UPDATE folders SET name = ?, parent_id = ?, updated_at = ? WHERE id = ? RETURNING *",
        )
        .bind(name)
        .bind(parent_id)
        .bind(now)
        .bind(folder_id)
        .fetch_optional(conn)
        .await
        .map_err(db_error("Failed to update folder"))
    }

    /// Delete folders in the given order, chunk by chunk.
    ///
    /// Callers pass children before parents so no statement ever removes a
    /// folder that still has a child on disk.
    pub async fn delete_many(
        &self,
        conn: &mut SqliteConnection,
        ids: &[FolderId],
    ) -> AppResult<u64> {
        let mut deleted = 0;
        for chunk in ids.chunks(ID_CHUNK_SIZE) {
            let mut qb = QueryBuilder::<Sqlite>::new("DELETE FROM folders WHERE id IN (");
            let mut list = qb.separated(", ");
            for id in chunk {
                list.push_bind(*id);
            }
            list.push_unseparated(")");

            let result = qb
                .build()
                .execute(&mut *conn)
                .await
                .map_err(db_error("Failed to delete folders"))?;
            deleted += result.rows_affected();
        }
        Ok(deleted)
    }
}
