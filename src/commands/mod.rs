//! Command implementations behind the CLI.

pub mod index;
pub mod search;
pub mod status;
pub mod tools;

use std::sync::Arc;

use crate::config::Config;
use crate::registry::RepositoryRegistry;
use crate::tools::{ToolContext, ToolRegistry};

/// Build the tool registry from the configured bindings.
pub fn tool_registry(config: &Config) -> ToolRegistry {
    let context = ToolContext {
        repositories: Arc::new(RepositoryRegistry::from_config(config)),
        search: config.search.clone(),
    };
    ToolRegistry::from_bindings(&config.tools, &context)
}
