//! Tool registry built from configuration bindings
//!
//! The registry is constructed once at startup from the `tools` section of
//! the configuration: each binding names a tool and the built-in handler
//! that implements it. Nothing registers itself.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

use super::{Tool, ToolResponse};
use crate::config::{SearchConfig, ToolBinding};
use crate::registry::RepositoryRegistry;
use crate::symbol::SymbolSearchTool;

/// Shared state handed to tool handlers when they are built
#[derive(Debug, Clone)]
pub struct ToolContext {
    pub repositories: Arc<RepositoryRegistry>,
    pub search: SearchConfig,
}

/// Tool description for the calling layer
#[derive(Debug, Clone, Serialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Registry of callable tools, keyed by exposed name
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve every binding against the built-in handlers. Bindings with an
    /// unknown handler are skipped with a warning.
    pub fn from_bindings(bindings: &[ToolBinding], context: &ToolContext) -> Self {
        let mut registry = Self::new();

        for binding in bindings {
            match resolve_handler(&binding.handler, context) {
                Some(tool) => {
                    debug!("Registered tool '{}' ({})", binding.name, binding.handler);
                    registry.register(binding.name.clone(), tool);
                }
                None => warn!(
                    "Unknown handler '{}' for tool '{}', skipping",
                    binding.handler, binding.name
                ),
            }
        }

        registry
    }

    /// Register a tool, replacing any tool with the same name
    pub fn register(&mut self, name: impl Into<String>, tool: Arc<dyn Tool>) {
        let name = name.into();
        if self.tools.insert(name.clone(), tool).is_some() {
            warn!("Tool '{}' registered twice, keeping the last binding", name);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Registered tool names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.tools
            .iter()
            .map(|(name, tool)| ToolSchema {
                name: name.clone(),
                description: tool.description().to_string(),
                parameters: tool.parameters(),
            })
            .collect()
    }

    /// Call a tool by name
    pub async fn call(&self, name: &str, args: serde_json::Value) -> ToolResponse {
        match self.get(name) {
            Some(tool) => tool.call(args).await,
            None => ToolResponse::error(format!("Unknown tool: {}", name)),
        }
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

fn resolve_handler(handler: &str, context: &ToolContext) -> Option<Arc<dyn Tool>> {
    match handler {
        SymbolSearchTool::HANDLER => Some(Arc::new(SymbolSearchTool::new(
            context.repositories.clone(),
            &context.search,
        ))),
        _ => None,
    }
}
