use colored::Colorize;
use std::path::Path;

use crate::error::TransformError;
use crate::stream::StreamError;

pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    /// `file:line:column - error: message` for parse failures,
    /// `file - error: message` for everything else.
    pub fn format_failure(&self, file: &Path, error: &StreamError) -> String {
        let file = file.display().to_string();
        let (location, message) = match error {
            StreamError::Transform(TransformError::Parse(parse)) => (
                format!("{}:{}:{}", file, parse.line, parse.column),
                parse.message.clone(),
            ),
            other => (file, other.to_string()),
        };

        format!(
            "{} - {}: {}",
            self.format_location(&location),
            self.format_category(),
            message
        )
    }

    fn format_location(&self, location: &str) -> String {
        if self.color {
            location.cyan().to_string()
        } else {
            location.to_string()
        }
    }

    fn format_category(&self) -> String {
        if self.color {
            "error".red().bold().to_string()
        } else {
            "error".to_string()
        }
    }
}
