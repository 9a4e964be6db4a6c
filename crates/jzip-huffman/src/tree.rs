//! Huffman tree construction.
//!
//! The tree lives in an arena: nodes are addressed by [`NodeId`] and branches
//! store the ids of their two children. Dropping the tree drops the arena, so
//! there is no recursive teardown however deep the tree gets.
//!
//! ## Tie-breaking
//!
//! Nodes of equal weight leave the priority queue in an order that is not part
//! of this module's contract. The current implementation happens to prefer the
//! node created first, but callers must not rely on a particular bit
//! assignment: only code *lengths* are stable for a given frequency multiset.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use jzip_core::{Error, Result};
use tracing::debug;

use crate::code::Code;
use crate::codebook::CodeBook;
use crate::frequency::FrequencyTable;

/// Index of a node in the tree arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Position in the arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A symbol and its frequency.
    Leaf { symbol: u8, weight: u64 },
    /// Two children; the weight is the sum of theirs.
    Branch {
        left: NodeId,
        right: NodeId,
        weight: u64,
    },
}

impl Node {
    /// Frequency carried by the node.
    #[inline]
    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } | Node::Branch { weight, .. } => *weight,
        }
    }

    /// True for leaves.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}

/// Static Huffman tree over byte symbols.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl HuffmanTree {
    /// Count `data` and build its tree.
    ///
    /// # Errors
    /// [`Error::EmptyInput`] if `data` is empty.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_frequencies(&FrequencyTable::from_bytes(data))
    }

    /// Build a tree from a frequency table.
    ///
    /// One leaf per present symbol goes into a min-priority queue; the two
    /// lightest nodes are popped and merged (first popped on the left) until a
    /// single root remains.
    ///
    /// # Errors
    /// [`Error::EmptyInput`] if the table has no symbols.
    pub fn from_frequencies(freq: &FrequencyTable) -> Result<Self> {
        if freq.is_empty() {
            return Err(Error::EmptyInput);
        }

        let leaves = freq.len();
        let mut nodes = Vec::with_capacity(2 * leaves - 1);
        let mut heap = BinaryHeap::with_capacity(leaves);

        for (symbol, weight) in freq.iter() {
            let id = NodeId(nodes.len() as u32);
            nodes.push(Node::Leaf { symbol, weight });
            heap.push(Reverse((weight, id)));
        }

        while heap.len() > 1 {
            let (Some(Reverse((lw, left))), Some(Reverse((rw, right)))) = (heap.pop(), heap.pop())
            else {
                unreachable!("heap holds at least two nodes");
            };
            // Bounded by freq.total(), which fits in u64.
            let weight = lw + rw;
            let id = NodeId(nodes.len() as u32);
            nodes.push(Node::Branch {
                left,
                right,
                weight,
            });
            heap.push(Reverse((weight, id)));
        }

        let root = match heap.pop() {
            Some(Reverse((_, id))) => id,
            None => return Err(Error::EmptyInput),
        };

        let tree = Self { nodes, root };
        debug!(
            symbols = leaves,
            nodes = tree.nodes.len(),
            depth = tree.depth(),
            "built huffman tree"
        );
        Ok(tree)
    }

    /// Root node id.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Node by id.
    ///
    /// # Panics
    /// If `id` does not belong to this tree.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Total node count (leaves and branches).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of leaves, i.e. distinct symbols.
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Root weight, which equals the input length.
    pub fn weight(&self) -> u64 {
        self.node(self.root).weight()
    }

    /// Depth of the deepest leaf (0 for a single-leaf tree).
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            match self.node(id) {
                Node::Leaf { .. } => max = max.max(depth),
                Node::Branch { left, right, .. } => {
                    stack.push((*right, depth + 1));
                    stack.push((*left, depth + 1));
                }
            }
        }
        max
    }

    /// Extract the symbol → code dictionary.
    ///
    /// Walks the tree with an explicit stack, each entry carrying the path
    /// from the root. A tree made of a single leaf gives that symbol the
    /// one-bit code `0`.
    pub fn codes(&self) -> CodeBook {
        let mut codes = BTreeMap::new();

        if let Node::Leaf { symbol, .. } = self.node(self.root) {
            codes.insert(*symbol, Code::new().child(false));
            return CodeBook::from_tree(codes);
        }

        let mut stack = vec![(self.root, Code::new())];
        while let Some((id, path)) = stack.pop() {
            match self.node(id) {
                Node::Leaf { symbol, .. } => {
                    codes.insert(*symbol, path);
                }
                Node::Branch { left, right, .. } => {
                    stack.push((*right, path.child(true)));
                    stack.push((*left, path.child(false)));
                }
            }
        }

        CodeBook::from_tree(codes)
    }
}
