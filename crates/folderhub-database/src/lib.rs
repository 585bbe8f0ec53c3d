//! # folderhub-database
//!
//! SQLite connection management and concrete repository implementations
//! for all FolderHub entities.
//!
//! Repositories never own a connection. Every method borrows a
//! `SqliteConnection`, which is either a pooled connection or an open
//! transaction, so a service can run several repository calls inside one
//! atomic unit.

pub mod connection;
pub mod error;
pub mod migration;
pub mod repositories;

pub use connection::{DatabasePool, DbTransaction};
pub use error::db_error;
