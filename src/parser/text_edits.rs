//! Span substitution buffer.
//!
//! Rewrites are recorded as `(range, replacement)` pairs over the original
//! source and resolved in one pass when text is materialized. Edits may nest
//! (an outer replacement whose text was built from an already-rewritten inner
//! span) but may never cross.
//!
//! ```text
//! source:  define(function () { return 1; });
//! edit 1:                       ^^^^^^^^^ -> module.exports = 1;
//! edit 2:  ^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^ -> (function () {module.exports = 1;}());
//! ```
//!
//! Rendering the whole document applies edit 2 and skips edit 1, whose text
//! edit 2 already contains.

use std::cmp::Reverse;

use super::base::TextRange;
use crate::error::{Result, TransformError};

#[derive(Clone, Debug)]
struct TextEdit {
    range: TextRange,
    text: String,
    seq: u32,
}

impl TextEdit {
    /// Render order: by start, outermost first, latest first among identical ranges.
    fn sort_key(&self) -> (u32, Reverse<u32>, Reverse<u32>) {
        (self.range.pos, Reverse(self.range.end), Reverse(self.seq))
    }
}

/// Edits are kept sorted by `TextEdit::sort_key`, so the edits inside a range
/// are found by binary search instead of a scan over the whole buffer.
#[derive(Debug)]
pub struct TextEdits<'src> {
    source: &'src str,
    edits: Vec<TextEdit>,
    next_seq: u32,
}

impl<'src> TextEdits<'src> {
    pub fn new(source: &'src str) -> Self {
        TextEdits {
            source,
            edits: Vec::new(),
            next_seq: 0,
        }
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Record a replacement of `range` with `text`.
    ///
    /// A range identical to an earlier edit supersedes it. A range that
    /// partially overlaps an earlier edit is rejected.
    pub fn replace(&mut self, range: TextRange, text: impl Into<String>) -> Result<()> {
        if range.pos > range.end
            || range.end as usize > self.source.len()
            || !self.source.is_char_boundary(range.pos as usize)
            || !self.source.is_char_boundary(range.end as usize)
        {
            return Err(TransformError::invariant(format!(
                "edit range {}..{} is outside the {}-byte source",
                range.pos,
                range.end,
                self.source.len()
            )));
        }

        if let Some(existing) = self.crossing_edit(range) {
            return Err(TransformError::invariant(format!(
                "edit range {}..{} crosses earlier edit {}..{}",
                range.pos, range.end, existing.pos, existing.end
            )));
        }

        let edit = TextEdit {
            range,
            text: text.into(),
            seq: self.next_seq,
        };
        self.next_seq += 1;
        let key = edit.sort_key();
        let at = self.edits.partition_point(|existing| existing.sort_key() < key);
        self.edits.insert(at, edit);
        Ok(())
    }

    /// An existing edit that `range` crosses, if any.
    ///
    /// Recorded edits never cross each other, so the ones containing
    /// `range.pos` form a chain and only the innermost can end inside `range`.
    fn crossing_edit(&self, range: TextRange) -> Option<TextRange> {
        let first_at_pos = self.edits.partition_point(|edit| edit.range.pos < range.pos);

        let enclosing = self.edits[..first_at_pos]
            .iter()
            .rev()
            .find(|edit| edit.range.end > range.pos);
        if let Some(edit) = enclosing {
            if edit.range.end < range.end {
                return Some(edit.range);
            }
        }

        self.edits[first_at_pos..]
            .iter()
            .take_while(|edit| edit.range.pos < range.end)
            .find(|edit| edit.range.pos > range.pos && edit.range.end > range.end)
            .map(|edit| edit.range)
    }

    /// Source text of `range` with every edit inside it applied.
    pub fn render(&self, range: TextRange) -> String {
        let first = self.edits.partition_point(|edit| edit.range.pos < range.pos);

        let mut out = String::with_capacity(range.len() as usize);
        let mut cursor = range.pos;
        for edit in self.edits[first..]
            .iter()
            .take_while(|edit| edit.range.pos <= range.end)
        {
            if !range.contains(edit.range) || edit.range.pos < cursor {
                // Outside `range`, or subsumed by an edit already applied.
                continue;
            }
            out.push_str(&self.source[cursor as usize..edit.range.pos as usize]);
            out.push_str(&edit.text);
            cursor = edit.range.end;
        }
        out.push_str(&self.source[cursor as usize..range.end as usize]);
        out
    }

    /// The whole document with all edits applied.
    pub fn finish(&self) -> String {
        if self.edits.is_empty() {
            return self.source.to_string();
        }
        self.render(TextRange::new(0, self.source.len() as u32))
    }
}
