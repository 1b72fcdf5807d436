//! Index command implementation.

use anyhow::Result;
use std::path::PathBuf;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::indexer::{IndexBuilder, IndexOptions};
use crate::registry::RepositoryRegistry;

/// Run the index command.
///
/// Repositories are indexed one after another. A repository that fails to
/// open its store is skipped; the rest still run.
pub async fn run(config: &Config, repo_path: Option<PathBuf>, options: IndexOptions) -> Result<()> {
    let registry = match repo_path {
        Some(path) => RepositoryRegistry::single(path),
        None => RepositoryRegistry::from_config(config),
    };

    if registry.is_empty() {
        warn!("No repositories found to index.");
        return Ok(());
    }

    let builder = IndexBuilder::new(config.indexer.clone());

    for repo in registry.iter() {
        let builder = builder.clone();
        let root = repo.root.clone();
        let outcome =
            tokio::task::spawn_blocking(move || builder.index_repository(&root, options)).await?;

        match outcome {
            Ok(Some(stats)) => {
                println!(
                    "{}: indexed {} files, {} symbols in {:.2}s",
                    repo.name,
                    stats.files_processed,
                    stats.symbols_inserted,
                    stats.elapsed.as_secs_f64()
                );
                if stats.stale_files > 0 {
                    println!(
                        "{}: {} files in the index no longer exist on disk",
                        repo.name, stats.stale_files
                    );
                }
            }
            Ok(None) => info!("Skipped repository '{}'", repo.name),
            Err(e) => error!("Skipping repository '{}' due to store error: {}", repo.name, e),
        }
    }

    Ok(())
}
