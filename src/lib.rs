pub mod bitstreams;
pub mod code_table;
pub mod errors;
pub mod huffman;
pub mod properties;
pub mod utils;

pub use errors::{CodeError, FormatError};
pub use huffman::{HuffNode, HuffmanTree, HuffmanTreeBuilder};
pub use properties::Properties;

/// An alphabet member, e.g. a byte value.
pub type Symbol = u32;

/// A sequential, single pass supplier of bits.
pub trait BitSource {
    fn has_next_bit(&self) -> bool;

    /// Returns the next bit (0 or 1), or `None` once the source is exhausted.
    fn next_bit(&mut self) -> Option<u8>;
}

/// Consumer of decoded symbols, fed in emission order.
pub trait SymbolSink {
    fn put_symbol(&mut self, symbol: Symbol) -> Result<(), CodeError>;
}
