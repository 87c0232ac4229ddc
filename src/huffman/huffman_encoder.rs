use std::collections::HashMap;

use crate::{bitstreams::BinaryWriterBuilder, CodeError, HuffmanTree, Symbol};

/// Symbol to code word lookup derived from a tree.
#[derive(Clone, Debug, Default)]
pub struct HuffmanEncoder {
    /// Code word of every symbol, one bit per element
    codes: HashMap<Symbol, Vec<u8>>,
}

impl HuffmanEncoder {
    pub fn new(tree: &HuffmanTree) -> Self {
        let codes = tree
            .flatten()
            .into_iter()
            .map(|entry| {
                let bits = entry.bits().collect();
                (entry.symbol, bits)
            })
            .collect();

        Self { codes }
    }

    /// Returns the code word of `symbol`, if it belongs to the code.
    pub fn code(&self, symbol: Symbol) -> Option<&[u8]> {
        self.codes.get(&symbol).map(Vec::as_slice)
    }

    /// Writes the code word of `value` and returns its length in bits.
    #[inline]
    pub fn write_next(
        &self,
        value: Symbol,
        writer: &mut BinaryWriterBuilder,
    ) -> Result<usize, CodeError> {
        let code = self.code(value).ok_or(CodeError::UnknownSymbol { symbol: value })?;

        for &bit in code {
            writer.push_bits(bit as u64, 1);
        }

        Ok(code.len())
    }

    /// Writes the code words of all the symbols and returns the number of bits written.
    pub fn encode<I>(
        &self,
        symbols: I,
        writer: &mut BinaryWriterBuilder,
    ) -> Result<usize, CodeError>
    where
        I: IntoIterator<Item = Symbol>,
    {
        symbols
            .into_iter()
            .try_fold(0, |written, symbol| Ok(written + self.write_next(symbol, writer)?))
    }
}
