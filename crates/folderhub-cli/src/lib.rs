//! # folderhub-cli
//!
//! Administrative command-line interface over the FolderHub services.
//! The `folderhub` binary parses [`Cli`], loads configuration, installs
//! logging and hands control to [`Cli::execute`].

pub mod commands;
pub mod output;

pub use commands::Cli;
pub use output::OutputFormat;
