pub mod cli;
pub mod commands;
pub mod config;
pub mod indexer;
pub mod logging;
pub mod registry;
pub mod storage;
pub mod symbol;
pub mod tools;

pub use config::Config;
pub use indexer::{IndexBuilder, IndexOptions, IndexStats};
pub use registry::{Repository, RepositoryRegistry};
pub use storage::SymbolStore;
pub use symbol::{Symbol, SymbolKind, SymbolSearchRequest, SymbolSearchTool};
pub use tools::{ToolRegistry, ToolResponse, ToolStatus};
