//! Error types for the AMD transform.
//!
//! A transform either succeeds completely or fails with one of these; no
//! partial output is ever produced.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TransformError>;

/// Source text could not be parsed as JavaScript.
///
/// `line` and `column` are 1-based and point at the first node the parser
/// could not make sense of. `column` counts bytes, as tree-sitter does.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{line}:{column}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        ParseError {
            line,
            column,
            message: message.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("parse error at {0}")]
    Parse(#[from] ParseError),

    /// The syntax tree or substitution buffer was used outside its contract.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

impl TransformError {
    pub fn invariant(message: impl Into<String>) -> Self {
        TransformError::InvariantViolation(message.into())
    }

    pub fn is_parse_error(&self) -> bool {
        matches!(self, TransformError::Parse(_))
    }
}
