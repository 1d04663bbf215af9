//! Bit-level stream primitives.
//!
//! Everything in this crate moves bits around in the same layout: packed
//! LSB-first within each byte, bytes in stream order. [`BitString`] is the
//! growable value type (it doubles as the write stream), [`BitReader`] is a
//! consuming cursor over a borrowed byte buffer.

/// A packed bit string with an explicit bit length.
///
/// Bits are stored LSB-first within each byte. Unused high bits of the
/// final byte are always zero, so the derived `Eq`, `Ord` and `Hash` agree
/// with bit-sequence equality.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BitString {
    bytes: Vec<u8>,
    len: usize,
}

impl BitString {
    /// Create an empty bit string.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty bit string with room for `bits` bits.
    pub fn with_capacity(bits: usize) -> Self {
        BitString {
            bytes: Vec::with_capacity(bits.div_ceil(8)),
            len: 0,
        }
    }

    /// Number of bits in the string.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the string holds no bits.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append a single bit.
    pub fn push(&mut self, bit: bool) {
        if self.len % 8 == 0 {
            self.bytes.push(0);
        }
        if bit {
            *self.bytes.last_mut().unwrap() |= 1 << (self.len % 8);
        }
        self.len += 1;
    }

    /// Append every bit of `other`.
    pub fn extend(&mut self, other: &BitString) {
        for bit in other.iter() {
            self.push(bit);
        }
    }

    /// Get the bit at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.len {
            return None;
        }
        Some(self.bytes[index / 8] & (1 << (index % 8)) != 0)
    }

    /// Iterate over the bits in order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(|i| self.get(i).unwrap())
    }

    /// The packed bytes, including the zero-padded partial final byte.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the string, returning the packed bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl FromIterator<bool> for BitString {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut bits = BitString::new();
        for bit in iter {
            bits.push(bit);
        }
        bits
    }
}

impl std::fmt::Display for BitString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// A bit cursor over a borrowed byte buffer, LSB-first within each byte.
#[derive(Debug)]
pub struct BitReader<'a> {
    data: &'a [u8],
    pos: usize, // byte position
    bit: u8,    // bit position within current byte (0..8)
}

impl<'a> BitReader<'a> {
    /// Create a reader positioned at the first bit of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        BitReader {
            data,
            pos: 0,
            bit: 0,
        }
    }

    /// Read the next bit, or `None` when the buffer is exhausted.
    pub fn read_bit(&mut self) -> Option<bool> {
        let byte = *self.data.get(self.pos)?;
        let bit = byte & (1 << self.bit) != 0;
        self.bit += 1;
        if self.bit == 8 {
            self.bit = 0;
            self.pos += 1;
        }
        Some(bit)
    }

    /// Read up to `n` bits.
    ///
    /// Returns fewer than `n` bits (possibly zero) when the buffer runs
    /// out; the short return is how callers detect a trailing partial
    /// word, so this never errors.
    pub fn read(&mut self, n: usize) -> BitString {
        let mut bits = BitString::with_capacity(n);
        for _ in 0..n {
            match self.read_bit() {
                Some(bit) => bits.push(bit),
                None => break,
            }
        }
        bits
    }

    /// Read every remaining bit.
    pub fn read_to_end(&mut self) -> BitString {
        self.read(self.data.len() * 8)
    }
}
