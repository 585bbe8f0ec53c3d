//! Share link repository implementation.

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use folderhub_core::result::AppResult;
use folderhub_core::types::{FolderId, ShareLinkId};
use folderhub_entity::share::{CreateShareLink, ShareLink};

use super::ID_CHUNK_SIZE;
use crate::error::db_error;

/// Repository for share link records.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShareLinkRepository;

impl ShareLinkRepository {
    /// Create a new share link repository.
    pub fn new() -> Self {
        Self
    }

    /// Find a share link by ID, expired or not.
    pub async fn find_by_id(
        &self,
        conn: &mut SqliteConnection,
        id: ShareLinkId,
    ) -> AppResult<Option<ShareLink>> {
        sqlx::query_as::<_, ShareLink>("SELECT * FROM share_links WHERE id = ?")
            .bind(id)
            .fetch_optional(conn)
            .await
            .map_err(db_error("Failed to find share link"))
    }

    /// List the links targeting a folder, soonest expiry first.
    pub async fn find_by_folder(
        &self,
        conn: &mut SqliteConnection,
        folder_id: FolderId,
    ) -> AppResult<Vec<ShareLink>> {
        sqlx::query_as::<_, ShareLink>(
            "SELECT * FROM share_links WHERE folder_id = ? ORDER BY expires_at ASC",
        )
        .bind(folder_id)
        .fetch_all(conn)
        .await
        .map_err(db_error("Failed to list share links"))
    }

    /// Create a new share link.
    pub async fn create(
        &self,
        conn: &mut SqliteConnection,
        data: &CreateShareLink,
        now: DateTime<Utc>,
    ) -> AppResult<ShareLink> {
        sqlx::query_as::<_, ShareLink>(
            "INSERT INTO share_links (id, folder_id, expires_at, created_at) \
             VALUES (?, ?, ?, ?) RETURNING *",
        )
        .bind(ShareLinkId::new())
        .bind(data.folder_id)
        .bind(data.expires_at)
        .bind(now)
        .fetch_one(conn)
        .await
        .map_err(db_error("Failed to create share link"))
    }

    /// Delete one link. Returns `true` if it existed.
    pub async fn delete(&self, conn: &mut SqliteConnection, id: ShareLinkId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM share_links WHERE id = ?")
            .bind(id)
            .execute(conn)
            .await
            .map_err(db_error("Failed to delete share link"))?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every link targeting any of the given folders.
    pub async fn delete_by_folders(
        &self,
        conn: &mut SqliteConnection,
        folder_ids: &[FolderId],
    ) -> AppResult<u64> {
        let mut deleted = 0;
        for chunk in folder_ids.chunks(ID_CHUNK_SIZE) {
            let mut qb = QueryBuilder::<Sqlite>::new("DELETE FROM share_links WHERE folder_id IN (");
            let mut ids = qb.separated(", ");
            for id in chunk {
                ids.push_bind(*id);
            }
            ids.push_unseparated(")");

            let result = qb
                .build()
                .execute(&mut *conn)
                .await
                .map_err(db_error("Failed to delete share links"))?;
            deleted += result.rows_affected();
        }
        Ok(deleted)
    }

    /// Delete links whose expiry is at or before `cutoff`.
    ///
    /// `cutoff` must be at whole-second precision, like stored expiries,
    /// for the text comparison to order correctly.
    pub async fn delete_expired(
        &self,
        conn: &mut SqliteConnection,
        cutoff: DateTime<Utc>,
    ) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM share_links WHERE expires_at <= ?")
            .bind(cutoff)
            .execute(conn)
            .await
            .map_err(db_error("Failed to purge expired share links"))?;
        Ok(result.rows_affected())
    }
}
