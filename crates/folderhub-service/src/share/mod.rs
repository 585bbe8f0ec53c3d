//! Time-bounded share links.

pub mod service;

pub use service::ShareLinkService;
