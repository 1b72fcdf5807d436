use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_FILE;

#[derive(Parser)]
#[command(name = "symdex")]
#[command(author, version, about = "C# symbol indexer and definition lookup")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (YAML, or TOML by extension)
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build or update the symbol index of the configured repositories
    Index {
        /// Index this repository instead of the configured list
        #[arg(long)]
        repo_path: Option<PathBuf>,

        /// Delete each existing index before indexing
        #[arg(long)]
        rebuild: bool,

        /// Drop rows of re-parsed and deleted files before inserting
        #[arg(long, conflicts_with = "rebuild")]
        prune: bool,
    },

    /// Look up symbol definitions by name
    Search {
        /// Symbol name or part of it
        name: String,

        /// Only return this kind (class, struct, interface, enum, method, constructor, property)
        #[arg(short, long)]
        kind: Option<String>,

        /// Print the raw tool response as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show index presence and size for each repository
    Status,

    /// List registered tools and their parameter schemas
    Tools,
}
