//! A single registered repository.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::RepositoryConfig;
use crate::storage;

/// A source tree registered for indexing and search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repository {
    /// Identifier used to tag search results
    pub name: String,
    /// Repository root as configured
    pub root: PathBuf,
}

impl Repository {
    /// Create a repository, naming it after the last path component.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let name = default_name(&root);
        Self { name, root }
    }

    pub fn with_name(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
        }
    }

    /// Location of this repository's symbol store.
    pub fn store_path(&self) -> PathBuf {
        storage::store_path(&self.root)
    }

    /// Check if the repository root exists on disk.
    pub fn exists(&self) -> bool {
        self.root.exists()
    }

    /// Check if an index has been built for this repository.
    pub fn has_index(&self) -> bool {
        self.store_path().exists()
    }
}

impl From<&RepositoryConfig> for Repository {
    fn from(config: &RepositoryConfig) -> Self {
        match &config.name {
            Some(name) => Repository::with_name(name.clone(), config.path.clone()),
            None => Repository::new(config.path.clone()),
        }
    }
}

fn default_name(root: &Path) -> String {
    root.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string())
}
