//! JavaScript syntax tree provider.
//!
//! Parsing itself is tree-sitter's job. This module flattens the tree-sitter
//! tree into an index-based arena with parent links and a closed set of node
//! kinds, and owns the span substitution buffer the transforms write into.

pub mod arena;
pub mod base;
pub mod kind;
pub mod text_edits;
pub mod tree;

pub use arena::{Node, NodeArena};
pub use base::{NodeIndex, NodeList, TextRange, node_flags};
pub use kind::{FieldName, SyntaxKind};
pub use text_edits::TextEdits;
pub use tree::{SyntaxTree, parse_source};

#[cfg(test)]
#[path = "tests/arena_tests.rs"]
mod arena_tests;
#[cfg(test)]
#[path = "tests/text_edits_tests.rs"]
mod text_edits_tests;
