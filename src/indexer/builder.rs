//! Repository indexing pass
//!
//! Files are parsed in parallel batches on a rayon pool and written by the
//! calling thread, which owns the only connection to the store.

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::errors::{ErrorCollector, ProcessingStage};
use super::parser::{ParseError, SourceParser};
use super::walker::{walk_error_path, Walker};
use crate::config::IndexerConfig;
use crate::storage::{self, StoreError, SymbolStore};
use crate::symbol::Symbol;

/// Files between two progress log lines
const PROGRESS_INTERVAL: usize = 100;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("symbol store error: {0}")]
    Store(#[from] StoreError),

    #[error("failed to build parser thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Options for one indexing pass
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexOptions {
    /// Delete the existing store before indexing
    pub rebuild: bool,
    /// Clear rows of every walked file before re-inserting it, and remove
    /// rows of files that no longer exist
    pub prune: bool,
}

/// Outcome of an indexing pass
#[derive(Debug, Clone)]
pub struct IndexStats {
    pub files_processed: usize,
    pub symbols_inserted: usize,
    /// Files or directories that failed to read or parse
    pub files_failed: usize,
    /// Rows that failed to insert
    pub insert_failures: usize,
    /// Indexed files that no longer exist on disk
    pub stale_files: usize,
    /// Rows removed by pruning
    pub rows_pruned: usize,
    pub elapsed: Duration,
    pub store_path: PathBuf,
}

/// Parse result for one file
struct ParsedFile {
    path: PathBuf,
    symbols: Result<Vec<Symbol>, (ProcessingStage, String)>,
}

/// Builds the symbol index of one repository at a time
#[derive(Debug, Clone)]
pub struct IndexBuilder {
    config: IndexerConfig,
}

impl IndexBuilder {
    pub fn new(config: IndexerConfig) -> Self {
        Self { config }
    }

    /// Index one repository.
    ///
    /// Returns `Ok(None)` when the repository root does not exist. Store
    /// errors are fatal for this repository only; file-level failures are
    /// logged and counted.
    pub fn index_repository(
        &self,
        root: &Path,
        options: IndexOptions,
    ) -> Result<Option<IndexStats>, IndexError> {
        info!("--- Indexing repository: {} ---", root.display());

        if !root.exists() {
            warn!("Repository path does not exist: {}", root.display());
            return Ok(None);
        }

        let db_path = storage::store_path(root);
        let fresh_store = if db_path.exists() {
            options.rebuild && remove_store(&db_path)
        } else {
            true
        };

        let mut store = SymbolStore::new(&db_path);
        store.connect()?;

        let stats = self.index_into(root, &store, options, fresh_store)?;
        store.commit()?;
        store.close();

        info!(
            "Indexed {} files, {} symbols in {:.2}s",
            stats.files_processed,
            stats.symbols_inserted,
            stats.elapsed.as_secs_f64()
        );
        info!("Index location: {}", stats.store_path.display());

        Ok(Some(stats))
    }

    fn index_into(
        &self,
        root: &Path,
        store: &SymbolStore,
        options: IndexOptions,
        fresh_store: bool,
    ) -> Result<IndexStats, IndexError> {
        let start = Instant::now();
        let walker = Walker::new(root.to_path_buf(), &self.config);
        let mut errors = ErrorCollector::new();

        let mut files = Vec::new();
        for entry in walker.walk_with_errors() {
            match entry {
                Ok(path) => files.push(path),
                Err(e) => {
                    debug!("Walk error under {}: {}", root.display(), e);
                    let path = walk_error_path(&e).unwrap_or_else(|| root.to_path_buf());
                    errors.record(path, &e, ProcessingStage::FileRead);
                }
            }
        }
        let total_files = files.len();
        info!("Found {} source files to process", total_files);

        let pool = self.thread_pool()?;
        let progress = create_progress_bar(total_files);
        let mut walked = HashSet::with_capacity(total_files);
        let mut files_processed = 0;
        let mut symbols_inserted = 0;
        let mut insert_failures = 0;
        let mut rows_pruned = 0;

        for batch in files.chunks(self.config.file_batch_size.max(1)) {
            let parsed: Vec<ParsedFile> = pool.install(|| {
                batch
                    .par_iter()
                    .map_init(SourceParser::new, |parser, path| parse_one(parser, path))
                    .collect()
            });

            for file in parsed {
                let rel_path = walker.relative_path(&file.path);

                match file.symbols {
                    Ok(symbols) => {
                        if options.prune {
                            rows_pruned += store.clear_symbols_for_file(&rel_path)?;
                        }
                        for symbol in &symbols {
                            match store.insert_or_replace(symbol, &rel_path) {
                                Ok(()) => symbols_inserted += 1,
                                Err(e) => {
                                    error!("Failed to insert symbol {}: {}", symbol.name, e);
                                    errors.record(file.path.clone(), &e, ProcessingStage::Storage);
                                    insert_failures += 1;
                                }
                            }
                        }
                    }
                    Err((stage, message)) => {
                        debug!("Error parsing {}: {}", file.path.display(), message);
                        errors.record(file.path.clone(), message, stage);
                    }
                }

                walked.insert(rel_path);
                files_processed += 1;
                progress.inc(1);
                if files_processed % PROGRESS_INTERVAL == 0 {
                    info!("Processed {}/{} files...", files_processed, total_files);
                }
            }
        }

        progress.finish_and_clear();

        let (stale_files, removed) =
            self.handle_stale_files(store, &walked, options, fresh_store)?;
        rows_pruned += removed;

        let report = errors.report();
        report.log_summary();

        Ok(IndexStats {
            files_processed,
            symbols_inserted,
            files_failed: errors.error_count() - insert_failures,
            insert_failures,
            stale_files,
            rows_pruned,
            elapsed: start.elapsed(),
            store_path: store.path().to_path_buf(),
        })
    }

    /// Detect rows whose files vanished since the last run. They are only
    /// removed in prune mode; otherwise the count is reported. A store that
    /// started empty has nothing stale.
    fn handle_stale_files(
        &self,
        store: &SymbolStore,
        walked: &HashSet<String>,
        options: IndexOptions,
        fresh_store: bool,
    ) -> Result<(usize, usize), StoreError> {
        if fresh_store {
            return Ok((0, 0));
        }

        let stale: Vec<String> = store
            .indexed_files()?
            .into_iter()
            .filter(|path| !walked.contains(path))
            .collect();

        if stale.is_empty() {
            return Ok((0, 0));
        }

        if !options.prune {
            warn!(
                "{} indexed files no longer exist; their symbols remain in the index. \
                 Run with --rebuild or --prune to remove them",
                stale.len()
            );
            return Ok((stale.len(), 0));
        }

        let mut removed = 0;
        for path in &stale {
            removed += store.clear_symbols_for_file(path)?;
        }
        info!("Pruned {} rows from {} deleted files", removed, stale.len());
        Ok((stale.len(), removed))
    }

    fn thread_pool(&self) -> Result<rayon::ThreadPool, IndexError> {
        let threads = self.config.parallel_threads.unwrap_or_else(num_cpus::get);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads.max(1))
            .build()?;
        Ok(pool)
    }
}

/// Delete the store file for a rebuild. Returns false when it could not be
/// removed and the old rows are still in place.
fn remove_store(db_path: &Path) -> bool {
    match std::fs::remove_file(db_path) {
        Ok(()) => {
            info!("Deleted existing index for rebuild");
            true
        }
        Err(e) => {
            error!("Failed to delete {}: {}", db_path.display(), e);
            false
        }
    }
}

fn parse_one(
    parser: &mut Result<SourceParser, ParseError>,
    path: &Path,
) -> ParsedFile {
    let symbols = match parser {
        Ok(parser) => parser
            .parse_file(path)
            .map(|parsed| {
                if parsed.has_errors() {
                    debug!("Syntax errors in {}, keeping recovered definitions", path.display());
                }
                parsed.symbols().collect()
            })
            .map_err(|e| (e.stage(), e.to_string())),
        Err(e) => Err((e.stage(), e.to_string())),
    };

    ParsedFile {
        path: path.to_path_buf(),
        symbols,
    }
}

fn create_progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} files ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}
