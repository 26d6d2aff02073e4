//! Node arena for syntax tree storage.

use super::base::{NodeIndex, NodeList, TextRange, node_flags};
use super::kind::{FieldName, SyntaxKind};

/// A single syntax node. Children are named nodes only; punctuation and
/// keywords are recovered from the source text when needed.
#[derive(Clone, Debug)]
pub struct Node {
    pub kind: SyntaxKind,
    /// Role this node plays under its parent, when the grammar names one.
    pub field: Option<FieldName>,
    /// `node_flags` bits recorded while flattening.
    pub flags: u16,
    pub pos: u32,
    pub end: u32,
    pub parent: NodeIndex,
    pub children: NodeList,
}

impl Node {
    #[inline]
    pub fn range(&self) -> TextRange {
        TextRange::new(self.pos, self.end)
    }
}

/// Arena-based storage for syntax nodes.
/// Nodes are stored in pre-order and referenced by index, so every child
/// index is greater than its parent's.
#[derive(Debug, Default)]
pub struct NodeArena {
    pub nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> NodeArena {
        NodeArena { nodes: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> NodeArena {
        NodeArena {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Add a node to the arena and return its index. The node is linked into
    /// its parent's child list when it has one.
    pub fn add(
        &mut self,
        kind: SyntaxKind,
        field: Option<FieldName>,
        range: TextRange,
        parent: NodeIndex,
    ) -> NodeIndex {
        let index = NodeIndex(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            field,
            flags: node_flags::NONE,
            pos: range.pos,
            end: range.end,
            parent,
            children: NodeList::new(),
        });
        if let Some(parent_node) = self.get_mut(parent) {
            parent_node.children.push(index);
        }
        index
    }

    /// Get a node by index
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get(index.as_usize())
        }
    }

    fn get_mut(&mut self, index: NodeIndex) -> Option<&mut Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get_mut(index.as_usize())
        }
    }

    /// Set `flags` bits on a node. No-op for `NONE`.
    pub fn mark(&mut self, index: NodeIndex, flags: u16) {
        if let Some(node) = self.get_mut(index) {
            node.flags |= flags;
        }
    }

    pub fn has_flags(&self, index: NodeIndex, flags: u16) -> bool {
        self.get(index).is_some_and(|node| node.flags & flags == flags)
    }

    pub fn kind(&self, index: NodeIndex) -> Option<SyntaxKind> {
        self.get(index).map(|n| n.kind)
    }

    pub fn is_kind(&self, index: NodeIndex, kind: SyntaxKind) -> bool {
        self.kind(index) == Some(kind)
    }

    pub fn parent_of(&self, index: NodeIndex) -> NodeIndex {
        self.get(index).map_or(NodeIndex::NONE, |n| n.parent)
    }

    pub fn range(&self, index: NodeIndex) -> Option<TextRange> {
        self.get(index).map(Node::range)
    }

    pub fn children(&self, index: NodeIndex) -> &[NodeIndex] {
        match self.get(index) {
            Some(node) => node.children.as_slice(),
            None => &[],
        }
    }

    /// Children with comments filtered out.
    pub fn significant_children(&self, index: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.children(index)
            .iter()
            .copied()
            .filter(|&child| !self.kind(child).is_some_and(SyntaxKind::is_comment))
    }

    /// First child attached under `field`, or `NONE`.
    pub fn child_by_field(&self, index: NodeIndex, field: FieldName) -> NodeIndex {
        self.children(index)
            .iter()
            .copied()
            .find(|&child| self.get(child).is_some_and(|n| n.field == Some(field)))
            .unwrap_or(NodeIndex::NONE)
    }

    /// Ancestors from the parent upward, ending at the root.
    pub fn ancestors(&self, index: NodeIndex) -> Ancestors<'_> {
        Ancestors {
            arena: self,
            next: self.parent_of(index),
        }
    }

    /// Nearest ancestor that opens a function body, or `NONE`.
    pub fn enclosing_function(&self, index: NodeIndex) -> NodeIndex {
        self.ancestors(index)
            .find(|&ancestor| self.kind(ancestor).is_some_and(SyntaxKind::is_function_like))
            .unwrap_or(NodeIndex::NONE)
    }

    /// Get the number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the arena is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Iterator over the parent chain of a node.
pub struct Ancestors<'a> {
    arena: &'a NodeArena,
    next: NodeIndex,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<NodeIndex> {
        if self.next.is_none() {
            return None;
        }
        let current = self.next;
        self.next = self.arena.parent_of(current);
        Some(current)
    }
}
