//! Repository implementations for all FolderHub entities.

pub mod file;
pub mod folder;
pub mod share;
pub mod user;

pub use file::FileRepository;
pub use folder::FolderRepository;
pub use share::ShareLinkRepository;
pub use user::UserRepository;

/// Maximum number of ids bound into a single `IN (...)` list.
///
/// Keeps every statement well under SQLite's bound-parameter limit.
pub const ID_CHUNK_SIZE: usize = 500;
