//! Tree-sitter based C# parser producing symbol definitions.
//!
//! Definitions are yielded lazily in pre-order (parent before children).
//! Every node is descended into, recognized or not, so a method nested in a
//! class nested in a namespace is still found.

use std::fs;
use std::path::Path;

use thiserror::Error;
use tree_sitter::{LanguageError, Node, Parser, Tree, TreeCursor};

use super::errors::ProcessingStage;
use crate::symbol::{Symbol, SymbolKind};

/// Errors raised while turning a file into a syntax tree.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to load C# grammar: {0}")]
    Grammar(#[from] LanguageError),

    #[error("failed to read file: {0}")]
    Read(#[from] std::io::Error),

    #[error("source is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("parser produced no syntax tree")]
    NoTree,
}

impl ParseError {
    /// Processing stage to attribute this error to.
    pub fn stage(&self) -> ProcessingStage {
        match self {
            ParseError::Read(_) => ProcessingStage::FileRead,
            _ => ProcessingStage::Parsing,
        }
    }
}

/// Grammar node kinds the indexer cares about.
///
/// Anything not listed is `Other`: it produces no symbol but its children
/// are still visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionNode {
    Class,
    Struct,
    Interface,
    Enum,
    Method,
    Constructor,
    Property,
    Other,
}

impl DefinitionNode {
    /// Map a tree-sitter node kind to a definition node.
    pub fn from_node_kind(kind: &str) -> Self {
        match kind {
            "class_declaration" => DefinitionNode::Class,
            "struct_declaration" => DefinitionNode::Struct,
            "interface_declaration" => DefinitionNode::Interface,
            "enum_declaration" => DefinitionNode::Enum,
            "method_declaration" => DefinitionNode::Method,
            "constructor_declaration" => DefinitionNode::Constructor,
            "property_declaration" => DefinitionNode::Property,
            _ => DefinitionNode::Other,
        }
    }

    /// The symbol kind recorded for this node, if any.
    pub fn symbol_kind(self) -> Option<SymbolKind> {
        match self {
            DefinitionNode::Class => Some(SymbolKind::Class),
            DefinitionNode::Struct => Some(SymbolKind::Struct),
            DefinitionNode::Interface => Some(SymbolKind::Interface),
            DefinitionNode::Enum => Some(SymbolKind::Enum),
            DefinitionNode::Method => Some(SymbolKind::Method),
            DefinitionNode::Constructor => Some(SymbolKind::Constructor),
            DefinitionNode::Property => Some(SymbolKind::Property),
            DefinitionNode::Other => None,
        }
    }
}

/// Reusable C# parser.
///
/// A `tree_sitter::Parser` is not `Sync`, so parallel callers keep one
/// instance per worker thread.
pub struct SourceParser {
    parser: Parser,
}

impl SourceParser {
    /// Create a parser configured for the C# grammar.
    pub fn new() -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_c_sharp::LANGUAGE.into())?;
        Ok(Self { parser })
    }

    /// Parse raw source bytes.
    pub fn parse_bytes(&mut self, source: Vec<u8>) -> Result<ParsedSource, ParseError> {
        std::str::from_utf8(&source)?;
        let tree = self.parser.parse(&source, None).ok_or(ParseError::NoTree)?;
        Ok(ParsedSource { tree, source })
    }

    /// Read and parse a file from disk.
    pub fn parse_file(&mut self, path: &Path) -> Result<ParsedSource, ParseError> {
        let source = fs::read(path)?;
        self.parse_bytes(source)
    }
}

/// A parsed file: the syntax tree together with the bytes it was built from.
pub struct ParsedSource {
    tree: Tree,
    source: Vec<u8>,
}

impl ParsedSource {
    /// Iterate the definitions in pre-order.
    ///
    /// Each call starts a fresh traversal.
    pub fn symbols(&self) -> Symbols<'_> {
        Symbols {
            cursor: self.tree.walk(),
            source: &self.source,
            done: false,
        }
    }

    /// Whether tree-sitter had to recover from syntax errors.
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }
}

/// Lazy pre-order iterator over the definitions of a [`ParsedSource`].
pub struct Symbols<'a> {
    cursor: TreeCursor<'a>,
    source: &'a [u8],
    done: bool,
}

impl Symbols<'_> {
    /// Move the cursor to the next node in pre-order.
    fn advance(&mut self) {
        if self.cursor.goto_first_child() {
            return;
        }
        loop {
            if self.cursor.goto_next_sibling() {
                return;
            }
            if !self.cursor.goto_parent() {
                self.done = true;
                return;
            }
        }
    }
}

impl Iterator for Symbols<'_> {
    type Item = Symbol;

    fn next(&mut self) -> Option<Symbol> {
        while !self.done {
            let node = self.cursor.node();
            let symbol = symbol_at(&node, self.source);
            self.advance();
            if symbol.is_some() {
                return symbol;
            }
        }
        None
    }
}

fn symbol_at(node: &Node, source: &[u8]) -> Option<Symbol> {
    let kind = DefinitionNode::from_node_kind(node.kind()).symbol_kind()?;
    let name = definition_name(node, source)?;

    Some(Symbol {
        name,
        kind,
        start_line: node.start_position().row,
        end_line: node.end_position().row,
    })
}

/// The `name` field if the grammar provides one, otherwise the first direct
/// `identifier` child.
fn definition_name(node: &Node, source: &[u8]) -> Option<String> {
    let name_node = node.child_by_field_name("name").or_else(|| {
        let mut cursor = node.walk();
        let found = node
            .children(&mut cursor)
            .find(|child| child.kind() == "identifier");
        found
    })?;

    let text = name_node.utf8_text(source).ok()?;
    if text.is_empty() {
        return None;
    }
    Some(text.to_string())
}
