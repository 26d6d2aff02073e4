use super::reporter::Reporter;
use crate::error::{ParseError, TransformError};
use crate::stream::StreamError;
use std::path::Path;

#[test]
fn test_formats_parse_errors_with_position() {
    let reporter = Reporter::new(false);
    let err = StreamError::Transform(TransformError::Parse(ParseError::new(
        3,
        14,
        "unexpected `}`",
    )));
    assert_eq!(
        reporter.format_failure(Path::new("src/a.js"), &err),
        "src/a.js:3:14 - error: unexpected `}`"
    );
}

#[test]
fn test_formats_other_errors_without_position() {
    let reporter = Reporter::new(false);
    let err = StreamError::InvalidUtf8 { valid_up_to: 4 };
    assert_eq!(
        reporter.format_failure(Path::new("b.js"), &err),
        "b.js - error: input is not valid UTF-8 (first invalid byte at offset 4)"
    );
}

#[test]
fn test_pretty_output_keeps_message() {
    colored::control::set_override(true);
    let reporter = Reporter::new(true);
    let err = StreamError::Transform(TransformError::Parse(ParseError::new(1, 1, "boom")));
    let line = reporter.format_failure(Path::new("c.js"), &err);
    colored::control::unset_override();

    assert!(line.contains("c.js:1:1"));
    assert!(line.contains("boom"));
    assert!(line.contains('\u{1b}'), "expected ANSI escapes in {line:?}");
}
