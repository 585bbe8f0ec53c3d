//! Folder mutations, tree traversal and cascading deletion.

pub mod deletion;
pub mod service;
pub mod tree;

pub use deletion::CascadeDeleter;
pub use service::FolderService;
pub use tree::TreeService;
