//! File record creation and lookup.

use tracing::info;

use folderhub_core::error::AppError;
use folderhub_core::result::AppResult;
use folderhub_core::types::{FileId, FolderId};
use folderhub_database::repositories::{FileRepository, FolderRepository};
use folderhub_entity::file::{CreateFile, File};
use folderhub_entity::folder::EntryKind;

use crate::context::{ServiceContext, commit};
use crate::naming::{NameRules, name_taken};
use crate::retry::with_retry;

/// Manages file metadata records. Bytes are stored elsewhere.
#[derive(Debug, Clone)]
pub struct FileService {
    ctx: ServiceContext,
    rules: NameRules,
    file_repo: FileRepository,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(ctx: ServiceContext, rules: NameRules) -> Self {
        Self {
            ctx,
            rules,
            file_repo: FileRepository::new(),
        }
    }

    /// Records a file named `name` in `folder_id`.
    pub async fn create_file(
        &self,
        name: &str,
        storage_path: &str,
        folder_id: FolderId,
        size_bytes: u64,
    ) -> AppResult<File> {
        self.rules.validate("File name", name)?;
        if storage_path.trim().is_empty() {
            return Err(AppError::validation("Storage path cannot be empty"));
        }
        if i64::try_from(size_bytes).is_err() {
            return Err(AppError::validation(format!(
                "File size {size_bytes} is out of range"
            )));
        }

        with_retry(&self.ctx.retry, "create_file", move || {
            self.try_create_file(name, storage_path, folder_id, size_bytes)
        })
        .await
    }

    async fn try_create_file(
        &self,
        name: &str,
        storage_path: &str,
        folder_id: FolderId,
        size_bytes: u64,
    ) -> AppResult<File> {
        let mut tx = self.ctx.begin().await?;

        if FolderRepository::new()
            .find_by_id(&mut tx, folder_id)
            .await?
            .is_none()
        {
            return Err(AppError::invalid_parent(format!(
                "Folder {folder_id} does not exist"
            )));
        }

        if name_taken(&mut tx, EntryKind::File, folder_id, name).await? {
            return Err(AppError::conflict(format!(
                "A file named '{name}' already exists in this folder"
            )));
        }

        let data = CreateFile {
            folder_id,
            name: name.to_string(),
            storage_path: storage_path.to_string(),
            size_bytes,
        };
        let file = self.file_repo.create(&mut tx, &data, self.ctx.now()).await?;
        commit(tx).await?;

        info!(
            file_id = %file.id,
            folder_id = %folder_id,
            size_bytes = file.size_bytes,
            "File created"
        );
        Ok(file)
    }

    /// Looks up a file by id.
    pub async fn find_file(&self, file_id: FileId) -> AppResult<File> {
        let mut conn = self.ctx.db.acquire().await?;
        self.file_repo
            .find_by_id(&mut conn, file_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))
    }
}
