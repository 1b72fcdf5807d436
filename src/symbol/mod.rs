//! Symbol definitions and cross-repository symbol search
//!
//! A symbol is a named definition site (class, method, property, ...) found
//! in C# source. The parser produces [`Symbol`] values without any file
//! context; the store persists them as [`SymbolRecord`] rows.

pub mod search;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use search::{SymbolMatch, SymbolSearchRequest, SymbolSearchTool};

/// Kinds of definitions recorded in the index.
///
/// Fields are not indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Class,
    Struct,
    Interface,
    Enum,
    Method,
    Constructor,
    Property,
}

impl SymbolKind {
    /// All kinds, in display order.
    pub const ALL: [SymbolKind; 7] = [
        SymbolKind::Class,
        SymbolKind::Struct,
        SymbolKind::Interface,
        SymbolKind::Enum,
        SymbolKind::Method,
        SymbolKind::Constructor,
        SymbolKind::Property,
    ];

    /// Convert to the string stored in the `kind` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Class => "class",
            SymbolKind::Struct => "struct",
            SymbolKind::Interface => "interface",
            SymbolKind::Enum => "enum",
            SymbolKind::Method => "method",
            SymbolKind::Constructor => "constructor",
            SymbolKind::Property => "property",
        }
    }

    /// Parse from the stored string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "class" => Some(SymbolKind::Class),
            "struct" => Some(SymbolKind::Struct),
            "interface" => Some(SymbolKind::Interface),
            "enum" => Some(SymbolKind::Enum),
            "method" => Some(SymbolKind::Method),
            "constructor" => Some(SymbolKind::Constructor),
            "property" => Some(SymbolKind::Property),
            _ => None,
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A definition extracted from one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Zero-indexed first line of the definition node
    pub start_line: usize,
    /// Zero-indexed last line of the definition node
    pub end_line: usize,
}

/// A symbol row as persisted in a repository's store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolRecord {
    pub name: String,
    /// Raw `kind` column value
    pub kind: String,
    /// Path relative to the repository root, `/`-separated
    pub file_path: String,
    pub start_line: usize,
    pub end_line: usize,
    pub docstring: Option<String>,
}
