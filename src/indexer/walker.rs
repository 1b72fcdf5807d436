use ignore::{DirEntry, WalkBuilder};
use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::config::IndexerConfig;
use crate::storage::INDEX_DIR;

/// Walks a repository, pruning ignored directories before descending
pub struct Walker {
    root: PathBuf,
    extensions: HashSet<String>,
    ignore_dirs: HashSet<String>,
    respect_gitignore: bool,
}

impl Walker {
    /// Create a new Walker with the given root directory and configuration
    pub fn new(root: PathBuf, config: &IndexerConfig) -> Self {
        let mut ignore_dirs: HashSet<String> = config.ignore_dirs.iter().cloned().collect();
        ignore_dirs.insert(INDEX_DIR.to_string());

        Self {
            root,
            extensions: config.extensions.iter().cloned().collect(),
            ignore_dirs,
            respect_gitignore: config.respect_gitignore,
        }
    }

    /// Walk the directory tree and return an iterator of file paths.
    /// Entries that cannot be read are logged and skipped.
    pub fn walk(&self) -> impl Iterator<Item = PathBuf> {
        self.walk_with_errors().filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Skipping unreadable path: {}", e);
                None
            }
        })
    }

    /// Walk the directory tree, yielding read errors alongside file paths
    ///
    /// Ignored directory names are matched exactly against each path
    /// component, at any depth. Hidden files are visited; .gitignore rules
    /// apply only when enabled in the config. Entries are sorted by file name.
    pub fn walk_with_errors(&self) -> impl Iterator<Item = Result<PathBuf, ignore::Error>> {
        let mut builder = WalkBuilder::new(&self.root);

        builder.standard_filters(false);
        builder.follow_links(false);
        builder.sort_by_file_name(|a, b| a.cmp(b));

        if self.respect_gitignore {
            builder.git_ignore(true);
            builder.git_global(true);
            builder.git_exclude(true);
            builder.require_git(false);
        }

        let ignore_dirs = self.ignore_dirs.clone();
        builder.filter_entry(move |entry| !is_ignored_dir(entry, &ignore_dirs));

        let extensions = self.extensions.clone();

        builder.build().filter_map(move |entry| match entry {
            Ok(entry) => is_source_file(&entry, &extensions).then(|| Ok(entry.into_path())),
            Err(e) => Some(Err(e)),
        })
    }

    /// Collect all walkable files into a Vec
    pub fn collect_files(&self) -> Vec<PathBuf> {
        self.walk().collect()
    }

    /// Path of `file` relative to the root, with `/` separators
    pub fn relative_path(&self, file: &Path) -> String {
        let relative = file.strip_prefix(&self.root).unwrap_or(file);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Path a walk error refers to, when it carries one
pub fn walk_error_path(err: &ignore::Error) -> Option<PathBuf> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path.clone()),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            walk_error_path(err)
        }
        ignore::Error::Loop { child, .. } => Some(child.clone()),
        _ => None,
    }
}

fn is_source_file(entry: &DirEntry, extensions: &HashSet<String>) -> bool {
    let is_file = entry.file_type().map(|ft| ft.is_file()).unwrap_or(false);
    is_file
        && entry
            .path()
            .extension()
            .and_then(OsStr::to_str)
            .map(|ext| extensions.contains(ext))
            .unwrap_or(false)
}

fn is_ignored_dir(entry: &DirEntry, ignore_dirs: &HashSet<String>) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    let is_dir = entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
    is_dir
        && entry
            .file_name()
            .to_str()
            .map(|name| ignore_dirs.contains(name))
            .unwrap_or(false)
}
