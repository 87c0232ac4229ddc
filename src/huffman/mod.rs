//! Huffman coding assigns every symbol a code word read off a binary tree:
//! frequent symbols sit close to the root and get short code words, rare ones
//! sit deep and get long code words. Symbols only live at leaves, so no code
//! word is a prefix of another.

pub mod huffman_decoder;
pub mod huffman_encoder;

use std::{
    cmp::{Ordering, Reverse},
    collections::{BTreeMap, BinaryHeap},
    fmt,
};

use tracing::{debug, trace};

use crate::{CodeError, Symbol};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        symbol: Symbol,
        weight: u64,
    },
    Internal {
        /// Sum of the children's weights
        weight: u64,
        left: Box<HuffNode>,
        right: Box<HuffNode>,
    },
}

impl HuffNode {
    pub fn leaf(symbol: Symbol, weight: u64) -> Self {
        HuffNode::Leaf { symbol, weight }
    }

    /// Joins two subtrees. The weight saturates at `u64::MAX`.
    pub fn internal(left: HuffNode, right: HuffNode) -> Self {
        HuffNode::Internal {
            weight: left.weight().saturating_add(right.weight()),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    #[inline]
    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } | HuffNode::Internal { weight, .. } => *weight,
        }
    }

    /// Returns the symbol of a leaf or `None` for an internal node.
    #[inline]
    pub fn symbol(&self) -> Option<Symbol> {
        match self {
            HuffNode::Leaf { symbol, .. } => Some(*symbol),
            HuffNode::Internal { .. } => None,
        }
    }

    pub fn left(&self) -> Option<&HuffNode> {
        match self {
            HuffNode::Internal { left, .. } => Some(left),
            HuffNode::Leaf { .. } => None,
        }
    }

    pub fn right(&self) -> Option<&HuffNode> {
        match self {
            HuffNode::Internal { right, .. } => Some(right),
            HuffNode::Leaf { .. } => None,
        }
    }

    /// Returns the child selected by a path bit: 0 is the left child, 1 the right one.
    #[inline]
    pub fn child(&self, bit: u8) -> Option<&HuffNode> {
        if bit == 0 {
            self.left()
        } else {
            self.right()
        }
    }

    fn count_leaves(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 1,
            HuffNode::Internal { left, right, .. } => left.count_leaves() + right.count_leaves(),
        }
    }

    fn height(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 0,
            HuffNode::Internal { left, right, .. } => 1 + left.height().max(right.height()),
        }
    }

    fn fmt_preorder(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        match self {
            HuffNode::Leaf { symbol, weight } => {
                writeln!(f, "{:indent$}{} ({})", "", symbol, weight, indent = depth * 2)
            }
            HuffNode::Internal { weight, left, right } => {
                writeln!(f, "{:indent$}* ({})", "", weight, indent = depth * 2)?;
                left.fmt_preorder(f, depth + 1)?;
                right.fmt_preorder(f, depth + 1)
            }
        }
    }
}

/// Tie-break between nodes of equal weight. The derived order puts every leaf
/// before every internal node, leaves by symbol, internal nodes by creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Rank {
    Leaf(Symbol),
    Internal(usize),
}

#[derive(Debug)]
struct HeapNode {
    weight: u64,
    rank: Rank,
    node: HuffNode,
}

impl HeapNode {
    fn new(node: HuffNode, rank: Rank) -> Self {
        Self { weight: node.weight(), rank, node }
    }
}

impl Ord for HeapNode {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.weight, self.rank).cmp(&(other.weight, other.rank))
    }
}

impl PartialOrd for HeapNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Eq for HeapNode {}

impl PartialEq for HeapNode {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.rank == other.rank
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HuffmanTree {
    root: Option<HuffNode>,
}

impl HuffmanTree {
    pub fn new(root: Option<HuffNode>) -> Self {
        Self { root }
    }

    /// Builds the tree for a frequency table indexed by symbol.
    pub fn build(frequencies: &[u64]) -> Result<Self, CodeError> {
        HuffmanTreeBuilder::new().load_frequencies(frequencies).build()
    }

    #[inline]
    pub fn root(&self) -> Option<&HuffNode> {
        self.root.as_ref()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of symbols (leaves) in the tree.
    pub fn num_symbols(&self) -> usize {
        self.root.as_ref().map_or(0, HuffNode::count_leaves)
    }

    /// Returns the length in bits of the longest code word.
    ///
    /// A tree holding a single symbol still spends one bit on it.
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, |root| root.height().max(1))
    }

    /// Returns the total weight, that is the weight of the root.
    pub fn weight(&self) -> u64 {
        self.root.as_ref().map_or(0, HuffNode::weight)
    }
}

/// Pre-order dump, one node per line, children indented below their parent.
impl fmt::Display for HuffmanTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.root {
            Some(root) => root.fmt_preorder(f, 0),
            None => writeln!(f, "<empty>"),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct HuffmanTreeBuilder {
    frequencies: BTreeMap<Symbol, u64>,
    /// First symbol whose accumulated frequency did not fit a `u64`
    overflow: Option<Symbol>,
}

impl HuffmanTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the frequencies of a table where the index is the symbol.
    pub fn load_frequencies(mut self, frequencies: &[u64]) -> Self {
        for (symbol, &frequency) in frequencies.iter().enumerate() {
            self.accumulate(symbol as Symbol, frequency);
        }
        self
    }

    /// Adds `frequency` occurrences of `symbol`.
    pub fn add_symbol(mut self, symbol: Symbol, frequency: u64) -> Self {
        self.accumulate(symbol, frequency);
        self
    }

    fn accumulate(&mut self, symbol: Symbol, frequency: u64) {
        let count = self.frequencies.entry(symbol).or_insert(0);
        match count.checked_add(frequency) {
            Some(sum) => *count = sum,
            None => {
                self.overflow.get_or_insert(symbol);
            }
        }
    }

    /// Greedy merge: the two lowest nodes are repeatedly popped and joined
    /// under a new internal node, the lower one on the left, until a single
    /// node is left. Symbols with frequency 0 never get a leaf.
    ///
    /// Fails if a frequency or the total weight does not fit a `u64`. Every
    /// internal weight is bounded by the total, so no merge can overflow.
    pub fn build(self) -> Result<HuffmanTree, CodeError> {
        if let Some(symbol) = self.overflow {
            return Err(CodeError::FrequencyOverflow { symbol });
        }
        self.frequencies
            .values()
            .try_fold(0u64, |total, &frequency| total.checked_add(frequency))
            .ok_or(CodeError::WeightOverflow)?;

        let mut freq_tree: BinaryHeap<Reverse<HeapNode>> = self
            .frequencies
            .iter()
            .filter(|&(_, &frequency)| frequency > 0)
            .map(|(&symbol, &frequency)| {
                Reverse(HeapNode::new(HuffNode::leaf(symbol, frequency), Rank::Leaf(symbol)))
            })
            .collect();

        let mut merges = 0;
        let root = loop {
            let Some(Reverse(first)) = freq_tree.pop() else {
                break None;
            };
            let Some(Reverse(second)) = freq_tree.pop() else {
                break Some(first.node);
            };

            let combined = HuffNode::internal(first.node, second.node);
            freq_tree.push(Reverse(HeapNode::new(combined, Rank::Internal(merges))));
            merges += 1;
        };

        let tree = HuffmanTree::new(root);
        debug!(
            symbols = tree.num_symbols(),
            depth = tree.depth(),
            weight = tree.weight(),
            "Built Huffman tree"
        );
        trace!("Huffman tree:\n{}", tree);
        Ok(tree)
    }
}
