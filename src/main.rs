use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use symdex::cli::{Cli, Commands};
use symdex::commands;
use symdex::config::Config;
use symdex::indexer::IndexOptions;
use symdex::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    // Logging settings live in the config, so errors are reported after init
    let loaded = Config::load(&cli.config);
    let config = loaded.as_ref().cloned().unwrap_or_default();

    let _logging_guard = init_logging(&config.logging, &cwd)?;

    match &loaded {
        Ok(_) => tracing::debug!("Loaded configuration from {}", cli.config.display()),
        Err(e) => tracing::warn!("{}; continuing with no repositories", e),
    }

    match cli.command {
        Commands::Index {
            repo_path,
            rebuild,
            prune,
        } => {
            commands::index::run(&config, repo_path, IndexOptions { rebuild, prune }).await?;
        }
        Commands::Search { name, kind, json } => {
            commands::search::run(&config, &name, kind.as_deref(), json).await?;
        }
        Commands::Status => {
            commands::status::run(&config).await?;
        }
        Commands::Tools => {
            commands::tools::run(&config).await?;
        }
    }

    Ok(())
}
