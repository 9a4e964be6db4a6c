//! Fixed-capacity bit paths.

use std::fmt;
use std::str::FromStr;

use jzip_core::{Error, Result};

/// Longest code the one-byte length field can describe.
pub const MAX_CODE_LEN: usize = 255;

const WORDS: usize = 4;
const WORD_BITS: usize = 64;

/// A root-to-leaf path in a Huffman tree: `false`/0 is left, `true`/1 is right.
///
/// Bits are stored MSB-first across four 64-bit words and every bit past
/// `len` is kept zero, so the derived ordering is lexicographic by bit with a
/// prefix sorting before its extensions.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Code {
    words: [u64; WORDS],
    len: u8,
}

impl Code {
    /// The empty path.
    pub const fn new() -> Self {
        Self {
            words: [0; WORDS],
            len: 0,
        }
    }

    /// Build a code from a bit sequence.
    pub fn from_bits(bits: impl IntoIterator<Item = bool>) -> Result<Self> {
        let mut code = Self::new();
        for bit in bits {
            code.push(bit)?;
        }
        Ok(code)
    }

    /// Rebuild a code of `len` bits from MSB-first packed bytes.
    ///
    /// Bits in `bytes` past `len` are ignored.
    pub fn from_packed(bytes: &[u8], len: usize) -> Result<Self> {
        if len > MAX_CODE_LEN {
            return Err(Error::code_too_long(len, MAX_CODE_LEN));
        }
        if bytes.len() * 8 < len {
            return Err(Error::corrupted(format!(
                "packed path needs {} bytes, got {}",
                len.div_ceil(8),
                bytes.len()
            )));
        }
        Self::from_bits((0..len).map(|i| bytes[i / 8] & (0x80 >> (i % 8)) != 0))
    }

    /// Append one bit.
    pub fn push(&mut self, bit: bool) -> Result<()> {
        let len = self.len as usize;
        if len >= MAX_CODE_LEN {
            return Err(Error::code_too_long(len + 1, MAX_CODE_LEN));
        }
        if bit {
            self.words[len / WORD_BITS] |= 1 << (WORD_BITS - 1 - len % WORD_BITS);
        }
        self.len += 1;
        Ok(())
    }

    /// This path extended by one edge.
    ///
    /// Only for callers that bound the depth themselves (tree traversal, the
    /// decode cursor); the capacity check is a debug assertion.
    #[inline]
    pub(crate) fn child(&self, bit: bool) -> Code {
        let len = self.len as usize;
        debug_assert!(len < MAX_CODE_LEN, "code capacity exceeded");
        let mut next = *self;
        if bit {
            next.words[len / WORD_BITS] |= 1 << (WORD_BITS - 1 - len % WORD_BITS);
        }
        next.len += 1;
        next
    }

    /// Remove and return the last bit.
    pub fn pop(&mut self) -> Option<bool> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        let len = self.len as usize;
        let mask = 1 << (WORD_BITS - 1 - len % WORD_BITS);
        let bit = self.words[len / WORD_BITS] & mask != 0;
        self.words[len / WORD_BITS] &= !mask;
        Some(bit)
    }

    /// Reset to the empty path.
    #[inline]
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Number of bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// True for the empty path.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bit at position `i` (0 is the first edge from the root).
    ///
    /// # Panics
    /// If `i >= self.len()`.
    #[inline]
    pub fn bit(&self, i: usize) -> bool {
        assert!(i < self.len(), "bit index {} out of range for code of length {}", i, self.len);
        self.words[i / WORD_BITS] & (1 << (WORD_BITS - 1 - i % WORD_BITS)) != 0
    }

    /// Iterate over the bits from the root down.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len()).map(move |i| self.bit(i))
    }

    /// True if `self` is a (non-strict) prefix of `other`.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        let len = self.len();
        if len > other.len() {
            return false;
        }
        let full = len / WORD_BITS;
        if self.words[..full] != other.words[..full] {
            return false;
        }
        let rest = len % WORD_BITS;
        if rest == 0 {
            return true;
        }
        let mask = !(u64::MAX >> rest);
        self.words[full] == other.words[full] & mask
    }

    /// MSB-first packed bytes, `ceil(len / 8)` long, zero padded.
    pub fn to_packed(&self) -> Vec<u8> {
        let bytes = self.len().div_ceil(8);
        self.words
            .iter()
            .flat_map(|w| w.to_be_bytes())
            .take(bytes)
            .collect()
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Code({})", self)
    }
}

impl FromStr for Code {
    type Err = Error;

    /// Parse a string of `'0'` and `'1'` characters.
    fn from_str(s: &str) -> Result<Self> {
        let mut code = Code::new();
        for (offset, token) in s.bytes().enumerate() {
            match token {
                b'0' => code.push(false)?,
                b'1' => code.push(true)?,
                _ => return Err(Error::InvalidBitToken { token, offset }),
            }
        }
        Ok(code)
    }
}
