//! Share link issuance, validation and reaping.

use chrono::{DateTime, SubsecRound, Utc};
use tracing::{debug, info};

use folderhub_core::error::AppError;
use folderhub_core::result::AppResult;
use folderhub_core::types::{FolderId, ShareLinkId};
use folderhub_database::repositories::{FolderRepository, ShareLinkRepository};
use folderhub_entity::folder::{AncestorDepth, Folder};
use folderhub_entity::share::{CreateShareLink, ShareLink};

use crate::context::{ServiceContext, commit};
use crate::folder::tree::{find_folder, load_ancestors};
use crate::retry::with_retry;

/// Issues and checks share links. A link's id is the access token.
#[derive(Debug, Clone)]
pub struct ShareLinkService {
    ctx: ServiceContext,
    share_repo: ShareLinkRepository,
}

impl ShareLinkService {
    /// Creates a new share link service.
    pub fn new(ctx: ServiceContext) -> Self {
        Self {
            ctx,
            share_repo: ShareLinkRepository::new(),
        }
    }

    /// Issues a link to `folder_id` valid until `expires_at`.
    ///
    /// The expiry is truncated to whole seconds and must still lie in the
    /// future after truncation.
    pub async fn create_share_link(
        &self,
        folder_id: FolderId,
        expires_at: DateTime<Utc>,
    ) -> AppResult<ShareLink> {
        let expires_at = expires_at.trunc_subsecs(0);
        if expires_at <= self.ctx.now() {
            return Err(AppError::validation(format!(
                "Expiry {expires_at} is not in the future"
            )));
        }

        with_retry(&self.ctx.retry, "create_share_link", move || {
            self.try_create(folder_id, expires_at)
        })
        .await
    }

    async fn try_create(
        &self,
        folder_id: FolderId,
        expires_at: DateTime<Utc>,
    ) -> AppResult<ShareLink> {
        let mut tx = self.ctx.begin().await?;

        if FolderRepository::new()
            .find_by_id(&mut tx, folder_id)
            .await?
            .is_none()
        {
            return Err(AppError::invalid_target(format!(
                "Folder {folder_id} does not exist"
            )));
        }

        let data = CreateShareLink {
            folder_id,
            expires_at,
        };
        let link = self.share_repo.create(&mut tx, &data, self.ctx.now()).await?;
        commit(tx).await?;

        info!(
            share_link_id = %link.id,
            folder_id = %folder_id,
            expires_at = %link.expires_at,
            "Share link created"
        );
        Ok(link)
    }

    /// Returns the link if it is still valid.
    ///
    /// Expired links are reported as `Expired` and left in place.
    pub async fn resolve_share_link(&self, link_id: ShareLinkId) -> AppResult<ShareLink> {
        let link = self.find_share_link(link_id).await?;
        if !link.is_valid_at(self.ctx.now()) {
            debug!(share_link_id = %link_id, expires_at = %link.expires_at, "Share link expired");
            return Err(AppError::expired(format!("Share link {link_id} has expired")));
        }
        Ok(link)
    }

    /// Checks that a valid link grants access to `folder_id`, i.e. that the
    /// folder is the link's target or lies below it.
    pub async fn authorize_folder(
        &self,
        link_id: ShareLinkId,
        folder_id: FolderId,
    ) -> AppResult<Folder> {
        let link = self.resolve_share_link(link_id).await?;

        let mut conn = self.ctx.db.acquire().await?;
        let folder = find_folder(&mut conn, folder_id).await?;
        if folder.id == link.folder_id {
            return Ok(folder);
        }

        let (ancestors, _) = load_ancestors(&mut conn, &folder, AncestorDepth::Full).await?;
        if ancestors.iter().any(|a| a.id == link.folder_id) {
            Ok(folder)
        } else {
            Err(AppError::not_found(format!(
                "Folder {folder_id} is not shared by link {link_id}"
            )))
        }
    }

    /// Links targeting a folder, expired ones included.
    pub async fn list_for_folder(&self, folder_id: FolderId) -> AppResult<Vec<ShareLink>> {
        let mut conn = self.ctx.db.acquire().await?;
        find_folder(&mut conn, folder_id).await?;
        self.share_repo.find_by_folder(&mut conn, folder_id).await
    }

    /// Deletes a link before it expires.
    pub async fn revoke_share_link(&self, link_id: ShareLinkId) -> AppResult<()> {
        let removed = with_retry(&self.ctx.retry, "revoke_share_link", move || async move {
            let mut conn = self.ctx.db.acquire().await?;
            self.share_repo.delete(&mut conn, link_id).await
        })
        .await?;

        if !removed {
            return Err(AppError::not_found(format!("Share link {link_id} not found")));
        }
        info!(share_link_id = %link_id, "Share link revoked");
        Ok(())
    }

    /// Deletes every link whose expiry has passed. Returns how many.
    pub async fn purge_expired(&self) -> AppResult<u64> {
        let cutoff = self.ctx.now().trunc_subsecs(0);
        let purged = with_retry(&self.ctx.retry, "purge_expired", move || async move {
            let mut conn = self.ctx.db.acquire().await?;
            self.share_repo.delete_expired(&mut conn, cutoff).await
        })
        .await?;

        info!(purged, cutoff = %cutoff, "Expired share links purged");
        Ok(purged)
    }

    /// Raw lookup, ignoring expiry.
    pub async fn find_share_link(&self, link_id: ShareLinkId) -> AppResult<ShareLink> {
        let mut conn = self.ctx.db.acquire().await?;
        self.share_repo
            .find_by_id(&mut conn, link_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Share link {link_id} not found")))
    }
}
