//! File repository implementation.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use folderhub_core::error::AppError;
use folderhub_core::result::AppResult;
use folderhub_core::types::{FileId, FolderId};
use folderhub_entity::file::{CreateFile, File};

use super::ID_CHUNK_SIZE;
use crate::error::db_error;

/// Repository for file metadata records.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileRepository;

impl FileRepository {
    /// Create a new file repository.
    pub fn new() -> Self {
        Self
    }

    /// Find a file by ID.
    pub async fn find_by_id(
        &self,
        conn: &mut SqliteConnection,
        id: FileId,
    ) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE id = ?")
            .bind(id)
            .fetch_optional(conn)
            .await
            .map_err(db_error("Failed to find file"))
    }

    /// List files in a folder, ordered by name.
    pub async fn find_by_folder(
        &self,
        conn: &mut SqliteConnection,
        folder_id: FolderId,
    ) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE folder_id = ? ORDER BY name ASC")
            .bind(folder_id)
            .fetch_all(conn)
            .await
            .map_err(db_error("Failed to list files"))
    }

    /// Find a file in a folder by exact name.
    pub async fn find_by_folder_and_name(
        &self,
        conn: &mut SqliteConnection,
        folder_id: FolderId,
        name: &str,
    ) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE folder_id = ? AND name = ?")
            .bind(folder_id)
            .bind(name)
            .fetch_optional(conn)
            .await
            .map_err(db_error("Failed to find file by name"))
    }

    /// Create a new file record.
    pub async fn create(
        &self,
        conn: &mut SqliteConnection,
        data: &CreateFile,
        now: DateTime<Utc>,
    ) -> AppResult<File> {
        let size_bytes = i64::try_from(data.size_bytes).map_err(|_| {
            AppError::validation(format!("File size {} is out of range", data.size_bytes))
        })?;

        sqlx::query_as::<_, File>(
            "INSERT INTO files (id, folder_id, name, storage_path, size_bytes, created_at) \
             VALUES (?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(FileId::new())
        .bind(data.folder_id)
        .bind(&data.name)
        .bind(&data.storage_path)
        .bind(size_bytes)
        .bind(now)
        .fetch_one(conn)
        .await
        .map_err(db_error("Failed to create file"))
    }

    /// Count files per folder for the given folders. Folders without files
    /// are absent from the map.
    pub async fn count_by_folders(
        &self,
        conn: &mut SqliteConnection,
        folder_ids: &[FolderId],
    ) -> AppResult<HashMap<FolderId, u64>> {
        let mut counts = HashMap::new();
        for chunk in folder_ids.chunks(ID_CHUNK_SIZE) {
            let mut qb =
                QueryBuilder::<Sqlite>::new("SELECT folder_id, COUNT(*) FROM files WHERE folder_id IN (");
            let mut ids = qb.separated(", ");
            for id in chunk {
                ids.push_bind(*id);
            }
            ids.push_unseparated(") GROUP BY folder_id");

            let rows = qb
                .build_query_as::<(FolderId, i64)>()
                .fetch_all(&mut *conn)
                .await
                .map_err(db_error("Failed to count files"))?;
            counts.extend(rows.into_iter().map(|(id, n)| (id, n as u64)));
        }
        Ok(counts)
    }

    /// Delete every file in any of the given folders.
    pub async fn delete_by_folders(
        &self,
        conn: &mut SqliteConnection,
        folder_ids: &[FolderId],
    ) -> AppResult<u64> {
        let mut deleted = 0;
        for chunk in folder_ids.chunks(ID_CHUNK_SIZE) {
            let mut qb = QueryBuilder::<Sqlite>::new("DELETE FROM files WHERE folder_id IN (");
            let mut ids = qb.separated(", ");
            for id in chunk {
                ids.push_bind(*id);
            }
            ids.push_unseparated(")");

            let result = qb
                .build()
                .execute(&mut *conn)
                .await
                .map_err(db_error("Failed to delete files"))?;
            deleted += result.rows_affected();
        }
        Ok(deleted)
    }
}
