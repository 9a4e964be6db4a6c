//! MSB-first bit packing.
//!
//! The first bit of a code lands in the most significant free bit of the
//! current byte. The final byte is zero padded and the writer reports how
//! many padding bits it added so the reader can stop before them.

use crate::code::Code;

/// Bit writer for the coded body.
#[derive(Debug)]
pub struct BitWriter {
    data: Vec<u8>,
    bit_buf: u64,
    bit_count: u8,
}

impl BitWriter {
    /// Create a new bit writer.
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            bit_buf: 0,
            bit_count: 0,
        }
    }

    /// Create with capacity in bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            bit_buf: 0,
            bit_count: 0,
        }
    }

    /// Write a single bit.
    #[inline]
    pub fn write_bit(&mut self, bit: bool) {
        self.write_bits(bit as u64, 1);
    }

    /// Write the low `n` bits of `value`, most significant first (`n <= 56`).
    #[inline]
    pub fn write_bits(&mut self, value: u64, n: u8) {
        debug_assert!(n <= 56);
        if n == 0 {
            return;
        }
        let value = value & (u64::MAX >> (64 - n as u32));
        self.bit_buf = (self.bit_buf << n) | value;
        self.bit_count += n;

        while self.bit_count >= 8 {
            self.bit_count -= 8;
            self.data.push((self.bit_buf >> self.bit_count) as u8);
        }
        self.bit_buf &= (1u64 << self.bit_count) - 1;
    }

    /// Write every bit of `code`.
    #[inline]
    pub fn write_code(&mut self, code: &Code) {
        for bit in code.iter() {
            self.write_bit(bit);
        }
    }

    /// Total bits written so far.
    pub fn bit_len(&self) -> usize {
        self.data.len() * 8 + self.bit_count as usize
    }

    /// Bytes the output will occupy once finished.
    pub fn len(&self) -> usize {
        self.data.len() + usize::from(self.bit_count > 0)
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty() && self.bit_count == 0
    }

    /// Flush the partial byte, zero padded.
    ///
    /// Returns the bytes and the number of padding bits in the last byte
    /// (0..=7).
    pub fn finish(mut self) -> (Vec<u8>, u8) {
        let mut padding = 0;
        if self.bit_count > 0 {
            padding = 8 - self.bit_count;
            self.data.push((self.bit_buf << padding) as u8);
        }
        (self.data, padding)
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Bit reader over a byte slice holding a known number of meaningful bits.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
    bit_len: usize,
}

impl<'a> BitReader<'a> {
    /// Read every bit of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            bit_len: data.len() * 8,
        }
    }

    /// Read only the first `bit_len` bits of `data`.
    ///
    /// `bit_len` is clamped to the bits actually available.
    pub fn with_bit_len(data: &'a [u8], bit_len: usize) -> Self {
        Self {
            data,
            pos: 0,
            bit_len: bit_len.min(data.len() * 8),
        }
    }

    /// Read the next bit, or `None` at the end.
    #[inline]
    pub fn read_bit(&mut self) -> Option<bool> {
        if self.pos >= self.bit_len {
            return None;
        }
        let bit = self.data[self.pos / 8] & (0x80 >> (self.pos % 8)) != 0;
        self.pos += 1;
        Some(bit)
    }

    /// Bits consumed.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bits left.
    pub fn remaining(&self) -> usize {
        self.bit_len - self.pos
    }

    /// Check if at end of input.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.bit_len
    }
}

impl Iterator for BitReader<'_> {
    type Item = bool;

    #[inline]
    fn next(&mut self) -> Option<bool> {
        self.read_bit()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_writer_basic() {
        let mut writer = BitWriter::new();
        writer.write_bits(0b1011, 4);
        writer.write_bits(0b0100, 4);
        writer.write_bits(0b11001010, 8);

        let (data, padding) = writer.finish();
        assert_eq!(data, vec![0b1011_0100, 0b1100_1010]);
        assert_eq!(padding, 0);
    }

    #[test]
    fn test_bit_writer_padding() {
        let mut writer = BitWriter::new();
        writer.write_bits(0b101, 3);
        assert_eq!(writer.bit_len(), 3);
        assert_eq!(writer.len(), 1);

        let (data, padding) = writer.finish();
        assert_eq!(data, vec![0b1010_0000]);
        assert_eq!(padding, 5);
    }

    #[test]
    fn test_write_code() {
        let mut writer = BitWriter::new();
        writer.write_code(&"110".parse().unwrap());
        writer.write_code(&"0111101".parse().unwrap());
        let (data, padding) = writer.finish();
        assert_eq!(data, vec![0b1100_1111, 0b0100_0000]);
        assert_eq!(padding, 6);
    }

    #[test]
    fn test_bit_reader_basic() {
        let data = [0b1011_0100, 0b1100_1010];
        let bits: Vec<bool> = BitReader::new(&data).collect();
        assert_eq!(bits.len(), 16);
        assert_eq!(&bits[..4], &[true, false, true, true]);
        assert_eq!(&bits[8..12], &[true, true, false, false]);
    }

    #[test]
    fn test_bit_reader_stops_before_padding() {
        let data = [0b1010_0000];
        let mut reader = BitReader::with_bit_len(&data, 3);
        assert_eq!(reader.remaining(), 3);
        assert_eq!(reader.read_bit(), Some(true));
        assert_eq!(reader.read_bit(), Some(false));
        assert_eq!(reader.read_bit(), Some(true));
        assert_eq!(reader.read_bit(), None);
        assert!(reader.is_empty());
        assert_eq!(reader.position(), 3);
    }

    #[test]
    fn test_bit_len_clamped() {
        let reader = BitReader::with_bit_len(&[0xFF], 100);
        assert_eq!(reader.remaining(), 8);
    }

    #[test]
    fn test_long_run_roundtrip() {
        let mut writer = BitWriter::with_capacity(64);
        let pattern: Vec<bool> = (0..1001).map(|i| (i * 7) % 5 < 2).collect();
        for &bit in &pattern {
            writer.write_bit(bit);
        }
        let (data, padding) = writer.finish();
        let bits: Vec<bool> = BitReader::with_bit_len(&data, data.len() * 8 - padding as usize).collect();
        assert_eq!(bits, pattern);
    }
}
