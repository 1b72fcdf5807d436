//! Per-repository symbol storage.
//!
//! Each repository keeps its index at `<root>/.symdex/code_index.db`.

mod sqlite;

use std::path::{Path, PathBuf};

pub use sqlite::{StoreError, SymbolStore};

/// Hidden directory reserved for the index inside each repository.
pub const INDEX_DIR: &str = ".symdex";

/// Database file name inside [`INDEX_DIR`].
pub const INDEX_FILE: &str = "code_index.db";

/// Location of the store for a repository root.
pub fn store_path(repo_root: &Path) -> PathBuf {
    repo_root.join(INDEX_DIR).join(INDEX_FILE)
}
