use std::io::Write;

use tracing::debug;

use crate::{BitSource, CodeError, HuffNode, HuffmanTree, Symbol, SymbolSink};

/// Position of the decoding cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeState<'t> {
    /// Somewhere above the leaves; more bits are needed.
    AtInternal(&'t HuffNode),
    /// A code word has been completed.
    AtLeaf(Symbol),
}

/// Walks the tree from the root, one bit per edge, and yields a symbol every
/// time a leaf is reached. The cursor then restarts from the root.
pub struct HuffmanDecoder<'t, S> {
    root: &'t HuffNode,
    source: S,
    bits_read: usize,
    failed: bool,
}

impl<'t, S: BitSource> HuffmanDecoder<'t, S> {
    pub fn new(tree: &'t HuffmanTree, source: S) -> Result<Self, CodeError> {
        let root = tree.root().ok_or(CodeError::EmptyAlphabet)?;

        Ok(Self {
            root,
            source,
            bits_read: 0,
            failed: false,
        })
    }

    #[inline]
    pub fn bits_read(&self) -> usize {
        self.bits_read
    }

    #[inline(always)]
    fn step(node: &'t HuffNode, bit: u8) -> DecodeState<'t> {
        // Single-symbol tree: the root is the leaf and each bit stands for it.
        let next = node.child(bit).unwrap_or(node);

        match next {
            HuffNode::Leaf { symbol, .. } => DecodeState::AtLeaf(*symbol),
            HuffNode::Internal { .. } => DecodeState::AtInternal(next),
        }
    }

    /// Decodes the next symbol.
    ///
    /// Returns `None` once the source is exhausted at a symbol boundary. A
    /// source that runs dry mid code word yields `TruncatedStream` and ends
    /// the decoding.
    pub fn decode_next(&mut self) -> Option<Result<Symbol, CodeError>> {
        if self.failed || !self.source.has_next_bit() {
            return None;
        }

        let mut state = DecodeState::AtInternal(self.root);
        loop {
            match state {
                DecodeState::AtLeaf(symbol) => return Some(Ok(symbol)),
                DecodeState::AtInternal(node) => {
                    let Some(bit) = self.source.next_bit() else {
                        self.failed = true;
                        return Some(Err(CodeError::TruncatedStream { bits_read: self.bits_read }));
                    };
                    self.bits_read += 1;
                    state = Self::step(node, bit);
                }
            }
        }
    }
}

impl<S: BitSource> Iterator for HuffmanDecoder<'_, S> {
    type Item = Result<Symbol, CodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.decode_next()
    }
}

impl HuffmanTree {
    pub fn decoder<S: BitSource>(&self, source: S) -> Result<HuffmanDecoder<'_, S>, CodeError> {
        HuffmanDecoder::new(self, source)
    }

    /// Decodes `source` until it is exhausted, writing every symbol to `sink`.
    /// Returns the number of decoded symbols.
    pub fn translate<S, K>(&self, source: S, sink: &mut K) -> Result<usize, CodeError>
    where
        S: BitSource,
        K: SymbolSink,
    {
        let mut decoder = self.decoder(source)?;

        let mut decoded = 0;
        for symbol in decoder.by_ref() {
            sink.put_symbol(symbol?)?;
            decoded += 1;
        }

        debug!(symbols = decoded, bits = decoder.bits_read(), "Decoded bit stream");
        Ok(decoded)
    }
}

impl SymbolSink for Vec<Symbol> {
    fn put_symbol(&mut self, symbol: Symbol) -> Result<(), CodeError> {
        self.push(symbol);
        Ok(())
    }
}

/// Renders each symbol as the character with that code point.
impl SymbolSink for String {
    fn put_symbol(&mut self, symbol: Symbol) -> Result<(), CodeError> {
        let c = char::from_u32(symbol).ok_or(CodeError::UnrepresentableSymbol { symbol })?;
        self.push(c);
        Ok(())
    }
}

/// Writes each symbol as a single byte.
pub struct ByteSink<W> {
    writer: W,
}

impl<W: Write> ByteSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> SymbolSink for ByteSink<W> {
    fn put_symbol(&mut self, symbol: Symbol) -> Result<(), CodeError> {
        let byte = u8::try_from(symbol).map_err(|_| CodeError::UnrepresentableSymbol { symbol })?;
        self.writer.write_all(&[byte])?;
        Ok(())
    }
}
