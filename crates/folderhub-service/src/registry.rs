//! Service registry wiring every component from one pool.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use folderhub_core::config::AppConfig;
use folderhub_core::traits::Clock;
use folderhub_database::DatabasePool;
use folderhub_entity::folder::AncestorDepth;

use crate::context::ServiceContext;
use crate::file::FileService;
use crate::folder::{CascadeDeleter, FolderService, TreeService};
use crate::identity::IdentityResolver;
use crate::naming::NameRules;
use crate::share::ShareLinkService;
use crate::user::UserService;

/// All FolderHub services, sharing one store handle and one clock.
#[derive(Debug, Clone)]
pub struct FolderHub {
    /// User directory.
    pub users: UserService,
    /// Folder mutations and lookups.
    pub folders: FolderService,
    /// File records.
    pub files: FileService,
    /// Share links.
    pub shares: ShareLinkService,
    /// Tree traversals.
    pub tree: TreeService,
    /// Home folder and owner lookups.
    pub identity: IdentityResolver,
    /// Unguarded subtree deletion.
    pub deleter: CascadeDeleter,
    ctx: ServiceContext,
    breadcrumb_depth: AncestorDepth,
}

impl FolderHub {
    /// Builds every service.
    pub fn new(db: DatabasePool, clock: Arc<dyn Clock>, config: &AppConfig) -> Self {
        let ctx = ServiceContext::new(db, clock, config.retry.clone());
        let rules = NameRules::from_config(&config.hierarchy);

        Self {
            users: UserService::new(ctx.clone(), rules, config.hierarchy.home_folder_name.clone()),
            folders: FolderService::new(ctx.clone(), rules),
            files: FileService::new(ctx.clone(), rules),
            shares: ShareLinkService::new(ctx.clone()),
            tree: TreeService::new(ctx.clone()),
            identity: IdentityResolver::new(ctx.clone()),
            deleter: CascadeDeleter::new(ctx.clone()),
            breadcrumb_depth: AncestorDepth::from_limit(config.hierarchy.breadcrumb_depth),
            ctx,
        }
    }

    /// The shared store handle.
    pub fn db(&self) -> &DatabasePool {
        &self.ctx.db
    }

    /// Current time as the services see it.
    pub fn now(&self) -> DateTime<Utc> {
        self.ctx.now()
    }

    /// Configured default depth for breadcrumbs.
    pub fn breadcrumb_depth(&self) -> AncestorDepth {
        self.breadcrumb_depth
    }
}
