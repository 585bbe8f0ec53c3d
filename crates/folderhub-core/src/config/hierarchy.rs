//! Folder tree configuration.

use serde::{Deserialize, Serialize};

/// Settings governing the per-user folder tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HierarchyConfig {
    /// Name given to the home folder created with every user.
    pub home_folder_name: String,
    /// Maximum length (in characters) of folder, file and user names.
    pub max_name_length: usize,
    /// Default ancestor depth for breadcrumbs; `None` loads the full chain.
    pub breadcrumb_depth: Option<usize>,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            home_folder_name: "Home".to_string(),
            max_name_length: 255,
            breadcrumb_depth: None,
        }
    }
}
