//! # folderhub-service
//!
//! Business logic service layer for FolderHub. Each service orchestrates
//! repositories inside store transactions to implement one component:
//! identity resolution, tree traversal, folder and file mutations,
//! cascading deletion, share links and the user directory.
//!
//! Services follow constructor injection: every dependency arrives through
//! a [`ServiceContext`] at construction time. [`FolderHub`] wires them all
//! from one pool, one clock and the application configuration.

pub mod context;
pub mod file;
pub mod folder;
pub mod identity;
pub mod naming;
pub mod registry;
pub mod retry;
pub mod share;
pub mod user;

#[cfg(test)]
pub(crate) mod test_support;

pub use context::ServiceContext;
pub use file::FileService;
pub use folder::{CascadeDeleter, FolderService, TreeService};
pub use identity::IdentityResolver;
pub use naming::NameRules;
pub use registry::FolderHub;
pub use retry::with_retry;
pub use share::ShareLinkService;
pub use user::UserService;
