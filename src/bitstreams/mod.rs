use crate::BitSource;

/// Bytes produced by a [`BinaryWriterBuilder`]; the last byte is zero padded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryWriter {
    pub os: Box<[u8]>,
    /// Number of meaningful bits in `os`
    pub written_bits: usize,
}

/// Packs bits into bytes, most significant bit first.
pub struct BinaryWriterBuilder {
    os: Vec<u8>,
    pub written_bits: usize,
    pub current: u64,
    pub free: usize,
}

impl Default for BinaryWriterBuilder {
    fn default() -> Self {
        BinaryWriterBuilder {
            os: Vec::default(),
            written_bits: 0,
            current: 0,
            free: 8,
        }
    }
}

impl BinaryWriterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(mut self) -> BinaryWriter {
        if self.free < 8 {
            self.write(self.current);
        }

        BinaryWriter {
            os: self.os.into_boxed_slice(),
            written_bits: self.written_bits,
        }
    }

    #[inline(always)]
    fn write(&mut self, b: u64) {
        self.os.push(b as u8);
    }

    /// Appends the lowest `len` bits of `b` to the current byte. `len` must fit in it.
    #[inline(always)]
    pub fn write_in_current(&mut self, b: u64, len: u64) -> u64 {
        debug_assert!(len as usize <= self.free);

        self.free -= len as usize;
        self.current |= (b & ((1 << len) - 1)) << self.free;

        if self.free == 0 {
            self.write(self.current);
            self.free = 8;
            self.current = 0;
        }

        self.written_bits += len as usize;
        len
    }

    /// Appends the lowest `len` bits of `x`, most significant first.
    #[inline(always)]
    pub fn push_bits(&mut self, x: u64, len: u64) -> u64 {
        assert!(len <= 64, "Cannot write {} bits from an integer", len);

        let mut remaining = len;
        while remaining > 0 {
            let n = remaining.min(self.free as u64);
            remaining -= n;
            self.write_in_current(x >> remaining, n);
        }

        len
    }
}

/// Reads back bits written by a [`BinaryWriterBuilder`].
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct BinaryReader {
    is: Box<[u8]>,
    pub position: usize,
    pub read_bits: usize,
    pub current: u64,
    pub fill: usize,
    /// Number of readable bits; the padding past it is never returned
    limit: usize,
}

impl BinaryReader {
    pub fn new(input_stream: Box<[u8]>) -> Self {
        let limit = input_stream.len() * 8;
        BinaryReader {
            is: input_stream,
            position: 0,
            read_bits: 0,
            current: 0,
            fill: 0,
            limit,
        }
    }

    /// Restricts the stream to its first `bits` bits.
    pub fn limit_bits(mut self, bits: usize) -> Self {
        self.limit = bits.min(self.is.len() * 8);
        self
    }

    #[inline]
    pub fn bits_left(&self) -> usize {
        self.limit - self.read_bits
    }

    #[inline(always)]
    fn read(&mut self) -> Option<u64> {
        let b = *self.is.get(self.position)?;
        self.position += 1;
        Some(b as u64)
    }

    #[inline(always)]
    pub fn read_bit(&mut self) -> Option<u8> {
        if self.read_bits >= self.limit {
            return None;
        }

        if self.fill == 0 {
            self.current = self.read()?;
            self.fill = 8;
        }

        self.fill -= 1;
        self.read_bits += 1;
        Some((self.current >> self.fill & 1) as u8)
    }
}

impl BitSource for BinaryReader {
    #[inline]
    fn has_next_bit(&self) -> bool {
        self.read_bits < self.limit
    }

    #[inline]
    fn next_bit(&mut self) -> Option<u8> {
        self.read_bit()
    }
}

/// In-memory bit source, one bit per element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BitString {
    bits: Vec<u8>,
    pos: usize,
}

impl BitString {
    pub fn new(bits: Vec<u8>) -> Self {
        Self { bits, pos: 0 }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }
}

impl From<Vec<u8>> for BitString {
    fn from(bits: Vec<u8>) -> Self {
        Self::new(bits)
    }
}

impl FromIterator<u8> for BitString {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl BitSource for BitString {
    #[inline]
    fn has_next_bit(&self) -> bool {
        self.pos < self.bits.len()
    }

    #[inline]
    fn next_bit(&mut self) -> Option<u8> {
        let bit = *self.bits.get(self.pos)?;
        self.pos += 1;
        Some(bit)
    }
}
