//! Error collection and reporting for an indexing pass

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use tracing::warn;

/// Stage where an error occurred during processing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum ProcessingStage {
    FileRead,
    Parsing,
    Storage,
}

impl fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessingStage::FileRead => write!(f, "File Read"),
            ProcessingStage::Parsing => write!(f, "Parsing"),
            ProcessingStage::Storage => write!(f, "Storage"),
        }
    }
}

/// Error that occurred while processing a file
#[derive(Debug, Clone)]
pub struct FileError {
    pub path: PathBuf,
    pub error: String,
    pub stage: ProcessingStage,
}

/// Collects per-file errors so one bad file never aborts the pass.
///
/// Only the writer thread records into it, so no locking is needed.
#[derive(Debug, Default)]
pub struct ErrorCollector {
    errors: Vec<FileError>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error that occurred during processing
    pub fn record(&mut self, path: PathBuf, error: impl fmt::Display, stage: ProcessingStage) {
        self.errors.push(FileError {
            path,
            error: error.to_string(),
            stage,
        });
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Generate an error report
    pub fn report(&self) -> ErrorReport {
        ErrorReport::from_errors(&self.errors)
    }
}

/// Error report grouped by stage
#[derive(Debug)]
pub struct ErrorReport {
    pub total_errors: usize,
    pub by_stage: BTreeMap<ProcessingStage, Vec<FileError>>,
}

impl ErrorReport {
    pub fn from_errors(errors: &[FileError]) -> Self {
        let mut by_stage: BTreeMap<ProcessingStage, Vec<FileError>> = BTreeMap::new();

        for error in errors {
            by_stage.entry(error.stage).or_default().push(error.clone());
        }

        Self {
            total_errors: errors.len(),
            by_stage,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    /// Log a summary, with up to 5 examples per stage
    pub fn log_summary(&self) {
        if !self.has_errors() {
            return;
        }

        warn!("Indexing completed with {} errors", self.total_errors);

        for (stage, errors) in &self.by_stage {
            warn!("  {}: {} errors", stage, errors.len());

            for error in errors.iter().take(5) {
                warn!("    - {}: {}", error.path.display(), error.error);
            }

            if errors.len() > 5 {
                warn!("    ... and {} more", errors.len() - 5);
            }
        }
    }
}
