use crate::Symbol;

/// Number of distinct byte values.
pub const BYTE_ALPHABET: usize = 256;

/// Counts the occurrences of each byte value; the result is indexed by byte.
pub fn count_frequencies(data: &[u8]) -> Vec<u64> {
    let mut freqs = vec![0u64; BYTE_ALPHABET];
    for &b in data {
        freqs[b as usize] += 1;
    }
    freqs
}

/// Widens bytes to symbols.
pub fn byte_symbols(data: &[u8]) -> impl Iterator<Item = Symbol> + '_ {
    data.iter().map(|&b| b as Symbol)
}
