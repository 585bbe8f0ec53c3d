//! Folder domain entities.

pub mod ancestry;
pub mod model;
pub mod tree;

pub use ancestry::{AncestorDepth, FolderWithAncestors};
pub use model::{CreateFolder, DeletionReport, EntryKind, Folder, FolderContents, UpdateFolder};
pub use tree::FolderNode;
