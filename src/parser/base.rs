//! Shared base types for the syntax arena.

use smallvec::SmallVec;
use std::fmt;

/// Index of a node inside a `NodeArena`.
///
/// Parent links are stored as `NodeIndex` values, never as owning pointers,
/// so walking upward is a plain loop that ends at `NodeIndex::NONE`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    pub const NONE: NodeIndex = NodeIndex(u32::MAX);

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    pub const fn is_some(self) -> bool {
        !self.is_none()
    }

    #[inline]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "NodeIndex(NONE)")
        } else {
            write!(f, "NodeIndex({})", self.0)
        }
    }
}

impl Default for NodeIndex {
    fn default() -> Self {
        NodeIndex::NONE
    }
}

/// Node flag bits (packed into `Node::flags`).
pub mod node_flags {
    pub const NONE: u16 = 0;
    /// Function or arrow declared with the `async` keyword.
    pub const ASYNC: u16 = 1 << 0;
    /// Array literal with an elided element (`[, a]`, `[a, , b]`).
    pub const HAS_ELISION: u16 = 1 << 1;
}

/// Ordered children of a node. Most JavaScript nodes have a handful.
pub type NodeList = SmallVec<[NodeIndex; 4]>;

/// Byte range `[pos, end)` into the source text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TextRange {
    pub pos: u32,
    pub end: u32,
}

impl TextRange {
    pub const fn new(pos: u32, end: u32) -> TextRange {
        TextRange { pos, end }
    }

    pub const fn len(self) -> u32 {
        self.end - self.pos
    }

    pub const fn is_empty(self) -> bool {
        self.pos == self.end
    }

    /// `other` lies entirely inside `self` (bounds inclusive).
    pub const fn contains(self, other: TextRange) -> bool {
        self.pos <= other.pos && other.end <= self.end
    }

    /// The two ranges share bytes but neither contains the other.
    pub const fn crosses(self, other: TextRange) -> bool {
        self.pos < other.end
            && other.pos < self.end
            && !self.contains(other)
            && !other.contains(self)
    }

    pub fn as_range(self) -> std::ops::Range<usize> {
        self.pos as usize..self.end as usize
    }
}
