//! Ancestor chain (breadcrumb) value objects.

use serde::{Deserialize, Serialize};

use super::model::Folder;

/// How many ancestors to load above a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AncestorDepth {
    /// Walk all the way up to the home folder.
    #[default]
    Full,
    /// Stop after the nearest `n` ancestors.
    Limited(usize),
}

impl AncestorDepth {
    /// Build from an optional limit, `None` meaning the full chain.
    pub fn from_limit(limit: Option<usize>) -> Self {
        limit.map_or(Self::Full, Self::Limited)
    }

    /// Whether `loaded` ancestors already satisfy this depth.
    pub fn is_reached(&self, loaded: usize) -> bool {
        match self {
            Self::Full => false,
            Self::Limited(n) => loaded >= *n,
        }
    }
}

/// A folder together with its ancestor chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderWithAncestors {
    /// The folder itself.
    pub folder: Folder,
    /// Ancestors ordered root first, the direct parent last.
    pub ancestors: Vec<Folder>,
    /// True when the depth limit cut the chain before the home folder.
    pub truncated: bool,
}

impl FolderWithAncestors {
    /// Names from the topmost loaded ancestor down to the folder itself.
    pub fn breadcrumb(&self) -> Vec<&str> {
        self.ancestors
            .iter()
            .chain(std::iter::once(&self.folder))
            .map(|f| f.name.as_str())
            .collect()
    }
}
