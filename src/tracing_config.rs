//! Diagnostic logging for the `unamdify` binary.
//!
//! Logging is off unless `UNAMDIFY_LOG` (or, failing that, `RUST_LOG`) holds a
//! filter directive. `UNAMDIFY_LOG_FORMAT` picks the layout:
//!
//! - `text` (default): one line per event
//! - `tree`: events indented under their file and transform spans (`tracing-tree`)
//! - `json`: newline-delimited JSON, for piping into other tools
//!
//! ```bash
//! # See each rewritten call site under the file it came from
//! UNAMDIFY_LOG=debug UNAMDIFY_LOG_FORMAT=tree unamdify src/
//!
//! # Also list define/require calls left alone because of their shape
//! UNAMDIFY_LOG="unamdify::transforms=trace" unamdify module.js
//! ```
//!
//! Everything is written to stderr; stdout carries transformed code.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

pub const LOG_ENV: &str = "UNAMDIFY_LOG";
pub const LOG_FORMAT_ENV: &str = "UNAMDIFY_LOG_FORMAT";
const FALLBACK_LOG_ENV: &str = "RUST_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Tree,
    Json,
}

impl LogFormat {
    /// Unrecognized names fall back to `Text`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "tree" => LogFormat::Tree,
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

/// Filter directive and layout requested through the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub directives: String,
    pub format: LogFormat,
}

impl LogSettings {
    /// `None` when logging was not requested.
    pub fn from_env() -> Option<LogSettings> {
        LogSettings::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings through `lookup`, which maps a variable name to its value.
    /// `UNAMDIFY_LOG` wins over `RUST_LOG`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<LogSettings> {
        let directives = lookup(LOG_ENV).or_else(|| lookup(FALLBACK_LOG_ENV))?;
        let format = lookup(LOG_FORMAT_ENV)
            .map(|value| LogFormat::parse(&value))
            .unwrap_or_default();
        Some(LogSettings { directives, format })
    }

    /// Install the global subscriber. Invalid directives are skipped, not fatal.
    pub fn install(&self) {
        let filter = EnvFilter::builder().parse_lossy(&self.directives);
        match self.format {
            LogFormat::Tree => {
                let layer = tracing_tree::HierarchicalLayer::default()
                    .with_indent_amount(2)
                    .with_indent_lines(true)
                    .with_targets(true);
                Registry::default().with(filter).with(layer).init();
            }
            LogFormat::Json => {
                let layer = fmt::layer().json().with_writer(std::io::stderr);
                Registry::default().with(filter).with(layer).init();
            }
            LogFormat::Text => {
                let layer = fmt::layer().with_writer(std::io::stderr);
                Registry::default().with(filter).with(layer).init();
            }
        }
    }
}

/// Install a subscriber if the environment asks for one. No-op otherwise.
pub fn init_tracing() {
    if let Some(settings) = LogSettings::from_env() {
        settings.install();
    }
}
