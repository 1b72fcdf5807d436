pub mod builder;
pub mod errors;
pub mod parser;
pub mod walker;

pub use builder::{IndexBuilder, IndexError, IndexOptions, IndexStats};
pub use errors::{ErrorCollector, ProcessingStage};
pub use parser::{DefinitionNode, ParseError, ParsedSource, SourceParser, Symbols};
pub use walker::Walker;
