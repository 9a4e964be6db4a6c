//! Compact code → symbol lookup.
//!
//! Codes up to [`MAX_DENSE_DEPTH`] bits live in a dense array laid out like a
//! complete binary tree: starting from index 0 (the root), a 0 bit moves to
//! `2i + 1` and a 1 bit to `2i + 2`. The root itself never holds a symbol, so
//! node `i` is stored at slot `i - 1` and a tree of depth `d` needs
//! `2^(d+1) - 2` slots. Longer codes go to an overflow map.
//!
//! Slots that are not the end of a code hold a sentinel. The sentinel is the
//! lowest byte value the dictionary does not use; a dictionary that uses all
//! 256 values switches to 16-bit slots with `u16::MAX` as the sentinel.

use std::collections::HashMap;

use jzip_core::{Error, Result};
use tracing::debug;

use crate::code::Code;
use crate::codebook::CodeBook;

/// Deepest level kept in the dense array (`2^14 - 2` slots).
pub const MAX_DENSE_DEPTH: usize = 13;

const WIDE_SENTINEL: u16 = u16::MAX;

#[derive(Debug, Clone)]
enum Slots {
    Narrow { slots: Vec<u8>, sentinel: u8 },
    Wide(Vec<u16>),
}

impl Slots {
    fn len(&self) -> usize {
        match self {
            Slots::Narrow { slots, .. } => slots.len(),
            Slots::Wide(slots) => slots.len(),
        }
    }

    #[inline]
    fn get(&self, slot: usize) -> Option<u8> {
        match self {
            Slots::Narrow { slots, sentinel } => {
                let value = slots[slot];
                (value != *sentinel).then_some(value)
            }
            Slots::Wide(slots) => {
                let value = slots[slot];
                (value != WIDE_SENTINEL).then_some(value as u8)
            }
        }
    }

    fn is_free(&self, slot: usize) -> bool {
        self.get(slot).is_none()
    }

    fn set(&mut self, slot: usize, symbol: u8) {
        match self {
            Slots::Narrow { slots, .. } => slots[slot] = symbol,
            Slots::Wide(slots) => slots[slot] = symbol as u16,
        }
    }
}

/// Dense-array + overflow decoder built once from a finished code book.
///
/// Immutable after construction, so one instance can serve any number of
/// concurrent chunk decodes.
#[derive(Debug, Clone)]
pub struct CompactDecoder {
    depth: usize,
    max_code_len: usize,
    symbols: usize,
    slots: Slots,
    overflow: HashMap<Code, u8>,
}

impl CompactDecoder {
    /// Build the decoder for `book`.
    ///
    /// The book is expected to be prefix-free; books read from untrusted
    /// input are checked by [`crate::dictionary::read_dictionary`].
    ///
    /// # Errors
    /// [`Error::CorruptedData`] if the book is empty or two codes land on
    /// the same slot.
    ///
    /// # Panics
    /// If a code maps outside the dense array, which would mean the array
    /// was sized wrongly.
    pub fn new(book: &CodeBook) -> Result<Self> {
        if book.is_empty() {
            return Err(Error::corrupted("empty dictionary"));
        }

        let max_code_len = book.max_code_len();
        let depth = max_code_len.min(MAX_DENSE_DEPTH);
        let size = (1usize << (depth + 1)) - 2;

        let mut slots = match book.first_unused_symbol() {
            Some(sentinel) => Slots::Narrow {
                slots: vec![sentinel; size],
                sentinel,
            },
            None => Slots::Wide(vec![WIDE_SENTINEL; size]),
        };

        let inverse = book.inverse();
        if inverse.len() != book.len() {
            return Err(Error::corrupted(format!(
                "{} symbols share {} codes",
                book.len(),
                inverse.len()
            )));
        }

        let mut overflow = HashMap::new();
        for (code, symbol) in inverse {
            if code.len() > depth {
                overflow.insert(code, symbol);
                continue;
            }

            let slot = dense_index(&code) - 1;
            assert!(
                slot < size,
                "code {} maps to slot {} beyond {} slots",
                code,
                slot,
                size
            );
            if !slots.is_free(slot) {
                return Err(Error::corrupted(format!(
                    "code {} of symbol 0x{:02x} collides with an existing entry",
                    code, symbol
                )));
            }
            slots.set(slot, symbol);
        }

        debug!(
            depth,
            max_code_len,
            slots = size,
            overflow = overflow.len(),
            wide = matches!(slots, Slots::Wide(_)),
            "built compact decoder"
        );

        Ok(Self {
            depth,
            max_code_len,
            symbols: book.len(),
            slots,
            overflow,
        })
    }

    /// Symbol whose code is exactly `code`.
    ///
    /// `None` means the path is not a complete code: either an inner node of
    /// the code tree or a path no code follows.
    pub fn resolve(&self, code: &Code) -> Option<u8> {
        if code.is_empty() {
            return None;
        }
        if code.len() > self.depth {
            return self.overflow.get(code).copied();
        }
        self.slots.get(dense_index(code) - 1)
    }

    /// Feed one bit to `cursor` and report the symbol it completes, if any.
    ///
    /// The cursor is reset after a hit.
    ///
    /// # Errors
    /// [`Error::InvalidCode`] once the cursor is as long as the longest code
    /// without having matched one.
    #[inline]
    pub fn step(&self, cursor: &mut PathCursor, bit: bool) -> Result<Option<u8>> {
        cursor.push(bit, self.depth);

        let hit = if cursor.code.len() <= self.depth {
            self.slots.get(cursor.index - 1)
        } else {
            self.overflow.get(&cursor.code).copied()
        };

        match hit {
            Some(symbol) => {
                cursor.reset();
                Ok(Some(symbol))
            }
            None if cursor.code.len() >= self.max_code_len => Err(Error::InvalidCode {
                bits: cursor.code.len(),
            }),
            None => Ok(None),
        }
    }

    /// Levels held in the dense array.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Longest code in the dictionary.
    pub fn max_code_len(&self) -> usize {
        self.max_code_len
    }

    /// Number of symbols the decoder resolves.
    pub fn symbol_count(&self) -> usize {
        self.symbols
    }

    /// Size of the dense array.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Codes stored in the overflow map.
    pub fn overflow_len(&self) -> usize {
        self.overflow.len()
    }

    /// Sentinel byte, or `None` when all 256 symbols are in use and the
    /// decoder runs with 16-bit slots.
    pub fn sentinel(&self) -> Option<u8> {
        match self.slots {
            Slots::Narrow { sentinel, .. } => Some(sentinel),
            Slots::Wide(_) => None,
        }
    }
}

/// Position of an in-progress code during decoding.
///
/// Tracks the dense-array index incrementally while the path is short enough
/// to use it, plus the full path for overflow lookups.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathCursor {
    index: usize,
    code: Code,
}

impl PathCursor {
    /// Cursor at the root.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn push(&mut self, bit: bool, depth: usize) {
        if self.code.len() < depth {
            self.index = 2 * self.index + 1 + bit as usize;
        }
        self.code = self.code.child(bit);
    }

    /// Bits consumed since the last emitted symbol.
    #[inline]
    pub fn len(&self) -> usize {
        self.code.len()
    }

    /// True at the root.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// The partial code read so far.
    pub fn code(&self) -> &Code {
        &self.code
    }

    /// Return to the root.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Array-tree index of the node at the end of `code`.
#[inline]
fn dense_index(code: &Code) -> usize {
    code.iter()
        .fold(0usize, |index, bit| 2 * index + 1 + bit as usize)
}
