//! Share link entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use folderhub_core::types::{FolderId, ShareLinkId};

/// A time-bounded grant of access to a folder subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ShareLink {
    /// Unique link identifier; also the token handed out.
    pub id: ShareLinkId,
    /// The shared folder.
    pub folder_id: FolderId,
    /// First instant at which the link no longer grants access.
    pub expires_at: DateTime<Utc>,
    /// When the link was created.
    pub created_at: DateTime<Utc>,
}

impl ShareLink {
    /// Check if the link grants access at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Data required to create a new share link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShareLink {
    /// The folder to share.
    pub folder_id: FolderId,
    /// Expiry time.
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_validity_boundary() {
        let now = Utc::now();
        let link = ShareLink {
            id: ShareLinkId::new(),
            folder_id: FolderId::new(),
            expires_at: now,
            created_at: now - Duration::hours(1),
        };
        assert!(link.is_valid_at(now - Duration::milliseconds(1)));
        assert!(!link.is_valid_at(now));
        assert!(!link.is_valid_at(now + Duration::seconds(1)));
    }
}
