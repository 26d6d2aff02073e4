//! unamdify: rewrite AMD modules as CommonJS modules.
//!
//! ```
//! let out = unamdify::transform(r#"define(["lib/a"], function (a) { return a; });"#).unwrap();
//! assert_eq!(
//!     out,
//!     "(function () {var a = require(\"lib/a\");\nmodule.exports = a;}());"
//! );
//! ```

// Error types shared by the parser adapter, transforms and stream adapter
pub mod error;
pub use error::{ParseError, Result, TransformError};

// Syntax tree provider (tree-sitter adapter, arena, substitution buffer)
pub mod parser;

// AMD to CommonJS rewrite
pub mod transforms;
pub use transforms::{AmdTransformer, TransformStats, transform};

// Chunked input adapter
pub mod stream;

// Tracing subscriber setup for the binary
pub mod tracing_config;

// Native CLI support
#[cfg(feature = "cli")]
pub mod cli;

#[cfg(test)]
#[path = "tests/stream_tests.rs"]
mod stream_tests;
