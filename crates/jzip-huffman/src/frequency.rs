//! Byte frequency counting.

use jzip_core::{Error, Result};

/// Number of distinct byte values.
pub const ALPHABET_SIZE: usize = 256;

/// Occurrence count of every byte value in an input.
///
/// Only symbols that occur are reported by [`FrequencyTable::iter`]; the sum
/// of all counts equals the input length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; ALPHABET_SIZE],
    total: u64,
    distinct: usize,
}

impl FrequencyTable {
    /// Count every byte of `data`.
    pub fn from_bytes(data: &[u8]) -> Self {
        let counts = histogram(data);
        let distinct = counts.iter().filter(|&&c| c > 0).count();
        Self {
            counts,
            total: data.len() as u64,
            distinct,
        }
    }

    /// Build a table from explicit `(symbol, count)` pairs.
    ///
    /// Pairs with a zero count are ignored; repeated symbols accumulate.
    ///
    /// # Errors
    /// [`Error::WeightOverflow`] if the counts add up to more than `u64::MAX`.
    pub fn from_counts(pairs: impl IntoIterator<Item = (u8, u64)>) -> Result<Self> {
        let mut counts = [0u64; ALPHABET_SIZE];
        let mut total = 0u64;
        for (symbol, count) in pairs {
            total = total.checked_add(count).ok_or(Error::WeightOverflow)?;
            counts[symbol as usize] += count;
        }
        let distinct = counts.iter().filter(|&&c| c > 0).count();
        Ok(Self {
            counts,
            total,
            distinct,
        })
    }

    /// Occurrences of `symbol`.
    #[inline]
    pub fn count(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Total number of bytes counted.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct symbols present.
    pub fn len(&self) -> usize {
        self.distinct
    }

    /// True if no bytes were counted.
    pub fn is_empty(&self) -> bool {
        self.distinct == 0
    }

    /// Present symbols and their counts, in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &c)| c > 0)
            .map(|(s, &c)| (s as u8, c))
    }

    /// Lowest byte value that does not occur, if any.
    pub fn first_unused(&self) -> Option<u8> {
        self.counts.iter().position(|&c| c == 0).map(|s| s as u8)
    }
}

/// Histogram with four banks to break store-to-load dependencies on runs of
/// the same byte, merged at the end.
fn histogram(data: &[u8]) -> [u64; ALPHABET_SIZE] {
    let mut bank0 = [0u64; ALPHABET_SIZE];
    let mut bank1 = [0u64; ALPHABET_SIZE];
    let mut bank2 = [0u64; ALPHABET_SIZE];
    let mut bank3 = [0u64; ALPHABET_SIZE];

    let chunks = data.chunks_exact(4);
    let remainder = chunks.remainder();

    for chunk in chunks {
        bank0[chunk[0] as usize] += 1;
        bank1[chunk[1] as usize] += 1;
        bank2[chunk[2] as usize] += 1;
        bank3[chunk[3] as usize] += 1;
    }

    for &b in remainder {
        bank0[b as usize] += 1;
    }

    for i in 0..ALPHABET_SIZE {
        bank0[i] += bank1[i] + bank2[i] + bank3[i];
    }

    bank0
}
