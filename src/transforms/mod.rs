//! JavaScript Transforms
//!
//! Transforms work directly on source text: they read the syntax arena,
//! record span substitutions in a `TextEdits` buffer and serialize the buffer
//! once at the end. Nothing outside a rewritten span changes.
//!
//! | Transform | Notes |
//! |-----------|-------|
//! | `amd_commonjs` | AMD `define`/`require` wrappers to CommonJS |

pub mod amd_commonjs;

pub use amd_commonjs::{AmdCallKind, AmdTransformer, TransformStats, transform};

#[cfg(test)]
#[path = "tests/amd_commonjs_tests.rs"]
mod amd_commonjs_tests;
