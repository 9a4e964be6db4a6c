//! Symbol ↔ code dictionary.

use std::collections::{BTreeMap, HashMap};

use jzip_core::{Error, Result};

use crate::code::Code;
use crate::frequency::{FrequencyTable, ALPHABET_SIZE};

/// Mapping from each present symbol to its code.
///
/// Iteration is in ascending symbol order, which is also the order records
/// are written to the dictionary section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeBook {
    codes: BTreeMap<u8, Code>,
}

impl CodeBook {
    /// Create an empty code book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap codes produced by a tree walk, which are prefix-free by
    /// construction.
    pub(crate) fn from_tree(codes: BTreeMap<u8, Code>) -> Self {
        Self { codes }
    }

    /// Add a symbol.
    ///
    /// # Errors
    /// - [`Error::DuplicateSymbol`] if `symbol` already has a code
    /// - [`Error::CorruptedData`] if `code` is empty
    pub fn insert(&mut self, symbol: u8, code: Code) -> Result<()> {
        if code.is_empty() {
            return Err(Error::corrupted(format!(
                "empty code for symbol 0x{:02x}",
                symbol
            )));
        }
        if self.codes.contains_key(&symbol) {
            return Err(Error::DuplicateSymbol { symbol });
        }
        self.codes.insert(symbol, code);
        Ok(())
    }

    /// Code for `symbol`.
    #[inline]
    pub fn get(&self, symbol: u8) -> Option<&Code> {
        self.codes.get(&symbol)
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// True if the book has no symbols.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Entries in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        self.codes.iter().map(|(&s, c)| (s, c))
    }

    /// Length of the longest code (0 for an empty book).
    pub fn max_code_len(&self) -> usize {
        self.codes.values().map(Code::len).max().unwrap_or(0)
    }

    /// Lowest byte value without a code, if any.
    pub fn first_unused_symbol(&self) -> Option<u8> {
        (0..=u8::MAX).find(|s| !self.codes.contains_key(s))
    }

    /// Decode direction: code → symbol.
    pub fn inverse(&self) -> HashMap<Code, u8> {
        self.codes.iter().map(|(&s, &c)| (c, s)).collect()
    }

    /// Dense symbol-indexed table for the encode loop.
    pub(crate) fn table(&self) -> Vec<Option<Code>> {
        let mut table = vec![None; ALPHABET_SIZE];
        for (&symbol, &code) in &self.codes {
            table[symbol as usize] = Some(code);
        }
        table
    }

    /// Check that no code is a prefix of another.
    ///
    /// Sorted lexicographically, every extension of a code follows it
    /// directly, so comparing neighbours is enough.
    ///
    /// # Errors
    /// [`Error::CorruptedData`] naming the first conflicting pair.
    pub fn validate_prefix_free(&self) -> Result<()> {
        let mut entries: Vec<(Code, u8)> = self.codes.iter().map(|(&s, &c)| (c, s)).collect();
        entries.sort_unstable();

        for pair in entries.windows(2) {
            let (short, short_symbol) = pair[0];
            let (long, long_symbol) = pair[1];
            if short.is_prefix_of(&long) {
                return Err(Error::corrupted(format!(
                    "code {} of symbol 0x{:02x} is a prefix of code {} of symbol 0x{:02x}",
                    short, short_symbol, long, long_symbol
                )));
            }
        }
        Ok(())
    }

    /// Exact body length in bits for input with the given frequencies.
    ///
    /// # Errors
    /// [`Error::UnknownSymbol`] if a counted symbol has no code.
    pub fn encoded_bit_len(&self, freq: &FrequencyTable) -> Result<u64> {
        freq.iter().try_fold(0u64, |acc, (symbol, count)| {
            let code = self.get(symbol).ok_or(Error::UnknownSymbol { symbol })?;
            Ok(acc + code.len() as u64 * count)
        })
    }
}

impl TryFrom<Vec<(u8, Code)>> for CodeBook {
    type Error = Error;

    fn try_from(entries: Vec<(u8, Code)>) -> Result<Self> {
        let mut book = CodeBook::new();
        for (symbol, code) in entries {
            book.insert(symbol, code)?;
        }
        Ok(book)
    }
}
