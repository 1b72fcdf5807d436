//! Status command implementation.
//!
//! Shows, for each configured repository, whether an index exists and how
//! much it holds.

use anyhow::Result;

use crate::config::Config;
use crate::registry::{Repository, RepositoryRegistry};
use crate::storage::SymbolStore;

pub async fn run(config: &Config) -> Result<()> {
    let registry = RepositoryRegistry::from_config(config);

    if registry.is_empty() {
        println!("No repositories configured.");
        return Ok(());
    }

    for repo in registry.iter() {
        print_repository(repo);
    }

    Ok(())
}

fn print_repository(repo: &Repository) {
    println!("{} ({})", repo.name, repo.root.display());

    if !repo.exists() {
        println!("  Path does not exist");
        return;
    }

    let store_path = repo.store_path();
    println!("  Index path: {}", store_path.display());
    if !repo.has_index() {
        println!("  Index exists: false");
        return;
    }
    println!("  Index exists: true");

    let counts = SymbolStore::open_read_only(&store_path).and_then(|store| {
        let symbols = store.symbol_count()?;
        let files = store.file_count()?;
        Ok((symbols, files))
    });

    match counts {
        Ok((symbols, files)) => {
            println!("  Files indexed: {}", files);
            println!("  Symbols: {}", symbols);
        }
        Err(e) => println!("  Could not read index statistics: {}", e),
    }
}
