//! Repository registry.
//!
//! An ordered list of repositories built once at startup, either from the
//! `repositories` section of the configuration or from a single path given
//! on the command line. Indexing and search both iterate it in order, and
//! treat each entry independently.

mod repository;

use std::path::PathBuf;

pub use repository::Repository;

use crate::config::Config;

#[derive(Debug, Clone, Default)]
pub struct RepositoryRegistry {
    repositories: Vec<Repository>,
}

impl RepositoryRegistry {
    pub fn new(repositories: Vec<Repository>) -> Self {
        Self { repositories }
    }

    /// Build the registry from configuration, keeping document order.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.repositories.iter().map(Repository::from).collect())
    }

    /// Registry holding one repository outside the configured list.
    pub fn single(root: impl Into<PathBuf>) -> Self {
        Self::new(vec![Repository::new(root)])
    }

    pub fn repositories(&self) -> &[Repository] {
        &self.repositories
    }

    pub fn iter(&self) -> impl Iterator<Item = &Repository> {
        self.repositories.iter()
    }

    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }
}
