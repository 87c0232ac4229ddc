//! Persistence of a code as a table of (symbol, path) pairs.
//!
//! The textual form has two lines per symbol, the symbol itself and then its
//! path from the root, `0` for a left turn and `1` for a right one:
//!
//! ```text
//! 98
//! 0
//! 97
//! 1
//! ```
//!
//! There is no header and no weight information; the tree is rebuilt from the
//! paths alone.

use std::{
    collections::HashSet,
    io::{self, BufRead, Write},
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{CodeError, FormatError, HuffNode, HuffmanTree, Symbol};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeEntry {
    pub symbol: Symbol,
    pub path: String,
}

impl CodeEntry {
    pub fn new(symbol: Symbol, path: impl Into<String>) -> Self {
        Self { symbol, path: path.into() }
    }

    /// Iterates over the path as bits. Only meaningful on a validated path.
    pub fn bits(&self) -> impl Iterator<Item = u8> + '_ {
        self.path.bytes().map(|c| c - b'0')
    }
}

/// Tree under construction while a table is loaded.
#[derive(Default)]
enum Slot {
    #[default]
    Empty,
    Leaf(Symbol),
    Branch(Box<Slot>, Box<Slot>),
}

impl Slot {
    /// Walks down `entry`'s path, materializing branches on the way, and puts
    /// the symbol at its end.
    fn place(&mut self, entry: &CodeEntry) -> Result<(), FormatError> {
        let collision = || FormatError::PrefixCollision {
            symbol: entry.symbol,
            path: entry.path.clone(),
        };

        let mut slot = self;
        for bit in entry.bits() {
            if matches!(slot, Slot::Empty) {
                *slot = Slot::Branch(Box::default(), Box::default());
            }
            slot = match slot {
                Slot::Branch(left, right) => {
                    if bit == 0 {
                        left.as_mut()
                    } else {
                        right.as_mut()
                    }
                }
                // A shorter code word ends here
                _ => return Err(collision()),
            };
        }

        if !matches!(slot, Slot::Empty) {
            return Err(collision());
        }
        *slot = Slot::Leaf(entry.symbol);
        Ok(())
    }

    fn into_node(self, path: &mut String) -> Result<HuffNode, FormatError> {
        match self {
            Slot::Leaf(symbol) => Ok(HuffNode::leaf(symbol, 0)),
            Slot::Branch(left, right) => {
                if matches!(*left, Slot::Empty) || matches!(*right, Slot::Empty) {
                    return Err(FormatError::IncompleteCode { path: path.clone() });
                }

                path.push('0');
                let left = (*left).into_node(path)?;
                path.pop();

                path.push('1');
                let right = (*right).into_node(path)?;
                path.pop();

                Ok(HuffNode::internal(left, right))
            }
            Slot::Empty => Err(FormatError::IncompleteCode { path: path.clone() }),
        }
    }
}

fn flatten_node(node: &HuffNode, path: &mut String, entries: &mut Vec<CodeEntry>) {
    match node {
        HuffNode::Leaf { symbol, .. } => entries.push(CodeEntry::new(*symbol, path.as_str())),
        HuffNode::Internal { left, right, .. } => {
            path.push('0');
            flatten_node(left, path, entries);
            path.pop();

            path.push('1');
            flatten_node(right, path, entries);
            path.pop();
        }
    }
}

/// Checks a path read from line `line`.
fn validate_path(entry: &CodeEntry, line: usize) -> Result<(), FormatError> {
    if entry.path.is_empty() {
        return Err(FormatError::EmptyPath { line, symbol: entry.symbol });
    }
    if !entry.path.bytes().all(|c| c == b'0' || c == b'1') {
        return Err(FormatError::InvalidPath { line, text: entry.path.clone() });
    }
    Ok(())
}

fn parse_symbol(text: &str, line: usize) -> Result<Symbol, FormatError> {
    text.parse().map_err(|_| FormatError::InvalidSymbol { line, text: text.to_owned() })
}

/// Drops a trailing `\r` and checks the encoding. A line that is not UTF-8
/// comes back lossily decoded as the error.
fn line_text(line: &[u8]) -> Result<&str, String> {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    std::str::from_utf8(line).map_err(|_| String::from_utf8_lossy(line).into_owned())
}

impl HuffmanTree {
    /// Lists every leaf with its path, left subtree before right subtree.
    ///
    /// A tree made of a single leaf lists it with the path `0`.
    pub fn flatten(&self) -> Vec<CodeEntry> {
        let mut entries = Vec::with_capacity(self.num_symbols());

        match self.root() {
            None => {}
            Some(HuffNode::Leaf { symbol, .. }) => entries.push(CodeEntry::new(*symbol, "0")),
            Some(root) => flatten_node(root, &mut String::new(), &mut entries),
        }

        entries
    }

    /// Rebuilds a tree from its (symbol, path) entries, in any order.
    ///
    /// Line numbers in the errors are those the entries would have in the
    /// saved table. Prefix collisions, repeated symbols and positions left
    /// with a single child are rejected. A lone entry with a one bit path
    /// gives back the single-leaf tree.
    pub fn unflatten<I>(entries: I) -> Result<Self, FormatError>
    where
        I: IntoIterator<Item = CodeEntry>,
    {
        let entries: Vec<_> = entries.into_iter().collect();
        let mut seen = HashSet::with_capacity(entries.len());

        for (i, entry) in entries.iter().enumerate() {
            validate_path(entry, 2 * i + 2)?;
            if !seen.insert(entry.symbol) {
                return Err(FormatError::DuplicateSymbol { symbol: entry.symbol });
            }
        }

        match entries.as_slice() {
            [] => return Ok(HuffmanTree::default()),
            [only] if only.path.len() == 1 => {
                return Ok(HuffmanTree::new(Some(HuffNode::leaf(only.symbol, 0))));
            }
            _ => {}
        }

        let mut root = Slot::Empty;
        for entry in entries.iter() {
            root.place(entry)?;
        }

        let root = root.into_node(&mut String::new())?;
        Ok(HuffmanTree::new(Some(root)))
    }

    /// Writes the flattened tree, symbol line then path line for each leaf.
    pub fn save<W: Write>(&self, mut output: W) -> io::Result<()> {
        for entry in self.flatten() {
            writeln!(output, "{}", entry.symbol)?;
            writeln!(output, "{}", entry.path)?;
        }
        output.flush()
    }

    /// Reads a table written by [`HuffmanTree::save`] and rebuilds the tree.
    pub fn load<R: BufRead>(input: R) -> Result<Self, CodeError> {
        let mut entries = Vec::new();
        let mut lines = input.split(b'\n').enumerate();

        while let Some((i, symbol_line)) = lines.next() {
            let line = i + 1;
            let symbol_line = symbol_line?;
            let text =
                line_text(&symbol_line).map_err(|text| FormatError::InvalidSymbol { line, text })?;
            let symbol = parse_symbol(text, line)?;

            let Some((_, path_line)) = lines.next() else {
                return Err(FormatError::UnpairedSymbol { line, symbol }.into());
            };
            let path_line = path_line?;
            let path = line_text(&path_line).map_err(|text| FormatError::InvalidPath {
                line: line + 1,
                text,
            })?;

            entries.push(CodeEntry::new(symbol, path));
        }

        let tree = Self::unflatten(entries)?;
        debug!(symbols = tree.num_symbols(), depth = tree.depth(), "Loaded code table");
        Ok(tree)
    }
}
