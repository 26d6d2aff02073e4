//! tree-sitter adapter: parse JavaScript and flatten it into a `NodeArena`.

use tracing::trace;

use super::arena::NodeArena;
use super::base::{NodeIndex, TextRange, node_flags};
use super::kind::{FieldName, SyntaxKind};
use crate::error::{ParseError, Result, TransformError};

/// A parsed source file. Borrows the source it was built from; all node
/// spans are byte offsets into it.
#[derive(Debug)]
pub struct SyntaxTree<'src> {
    source: &'src str,
    arena: NodeArena,
    root: NodeIndex,
}

impl<'src> SyntaxTree<'src> {
    pub fn source(&self) -> &'src str {
        self.source
    }

    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// Original source text spanned by `index` (empty for `NONE`).
    pub fn text(&self, index: NodeIndex) -> &'src str {
        self.arena
            .range(index)
            .and_then(|range| self.source.get(range.as_range()))
            .unwrap_or("")
    }
}

/// Parse `source` as a JavaScript program.
///
/// Fails with `TransformError::Parse` when tree-sitter reports any ERROR or
/// MISSING node; error recovery is never accepted as a successful parse.
pub fn parse_source(source: &str) -> Result<SyntaxTree<'_>> {
    if u32::try_from(source.len()).is_err() {
        return Err(TransformError::invariant(format!(
            "source of {} bytes exceeds the 4 GiB span limit",
            source.len()
        )));
    }

    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&tree_sitter_javascript::LANGUAGE.into())
        .map_err(|err| {
            TransformError::invariant(format!("failed to load JavaScript grammar: {err}"))
        })?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| TransformError::invariant("parser returned no syntax tree"))?;
    let root = tree.root_node();
    if root.has_error() {
        return Err(first_syntax_error(root, source).into());
    }

    let arena = build_arena(root);
    trace!(nodes = arena.len(), bytes = source.len(), "built syntax arena");
    Ok(SyntaxTree {
        source,
        arena,
        root: NodeIndex(0),
    })
}

/// Flatten the named nodes of a tree-sitter tree in pre-order.
/// Anonymous tokens are skipped; a named node found below an anonymous one
/// is attached to the nearest named ancestor.
fn build_arena(root: tree_sitter::Node<'_>) -> NodeArena {
    let mut arena = NodeArena::with_capacity(root.descendant_count());
    let mut cursor = root.walk();
    let mut parents: Vec<NodeIndex> = Vec::new();
    let mut parent = NodeIndex::NONE;

    loop {
        let node = cursor.node();
        let index = if node.is_named() {
            let range = TextRange::new(node.start_byte() as u32, node.end_byte() as u32);
            let field = cursor.field_name().and_then(FieldName::from_grammar);
            let kind = SyntaxKind::from_grammar(node.kind());
            let index = arena.add(kind, field, range, parent);
            arena.mark(index, syntax_flags(node, kind));
            index
        } else {
            NodeIndex::NONE
        };

        if cursor.goto_first_child() {
            parents.push(parent);
            if index.is_some() {
                parent = index;
            }
            continue;
        }

        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return arena;
            }
            parent = parents.pop().unwrap_or(NodeIndex::NONE);
        }
    }
}

/// Flags that live on anonymous tokens, which the arena does not keep.
fn syntax_flags(node: tree_sitter::Node<'_>, kind: SyntaxKind) -> u16 {
    match kind {
        SyntaxKind::FunctionExpression | SyntaxKind::ArrowFunction => {
            // `async` is an anonymous leading token; a parameter named
            // `async` (`async => 1`) is a named identifier instead.
            match node.child(0) {
                Some(first) if !first.is_named() && first.kind() == "async" => node_flags::ASYNC,
                _ => node_flags::NONE,
            }
        }
        SyntaxKind::ArrayExpression if has_elision(node) => node_flags::HAS_ELISION,
        _ => node_flags::NONE,
    }
}

/// A `,` directly after `[` or after another `,` elides an element.
/// A single trailing comma does not.
fn has_elision(array: tree_sitter::Node<'_>) -> bool {
    let mut cursor = array.walk();
    let mut after_separator = false;
    for child in array.children(&mut cursor) {
        if child.is_extra() {
            continue;
        }
        match child.kind() {
            "[" => after_separator = true,
            "," if after_separator => return true,
            "," => after_separator = true,
            _ => after_separator = false,
        }
    }
    false
}

/// Locate the first ERROR or MISSING node, descending only into subtrees
/// that contain one.
fn first_syntax_error(root: tree_sitter::Node<'_>, source: &str) -> ParseError {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            return describe_syntax_error(node, source);
        }
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return describe_syntax_error(root, source);
            }
        }
    }
}

fn describe_syntax_error(node: tree_sitter::Node<'_>, source: &str) -> ParseError {
    let start = node.start_position();
    let message = if node.is_missing() {
        format!("missing `{}`", node.kind())
    } else {
        let text = node.utf8_text(source.as_bytes()).unwrap_or("");
        let snippet: String = text.lines().next().unwrap_or("").chars().take(40).collect();
        if snippet.trim().is_empty() {
            "unexpected end of input".to_string()
        } else {
            format!("unexpected `{}`", snippet.trim())
        }
    };
    ParseError::new(start.row + 1, start.column + 1, message)
}
