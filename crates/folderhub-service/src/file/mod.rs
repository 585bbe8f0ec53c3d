//! File metadata services.

pub mod service;

pub use service::FileService;
