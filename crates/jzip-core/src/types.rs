//! Core type definitions shared by the codec and its drivers.

use serde::{Deserialize, Serialize};

/// Default chunk payload size for the chunked body layout (64 KB).
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// How the bits of a code are written inside a dictionary record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathEncoding {
    /// One ASCII byte per bit (`'0'` or `'1'`).
    Text,

    /// Bits packed MSB-first into `ceil(len / 8)` bytes, zero padded.
    #[default]
    Packed,
}

impl PathEncoding {
    /// Bytes needed to store a path of `bits` bits.
    pub fn path_bytes(self, bits: usize) -> usize {
        match self {
            PathEncoding::Text => bits,
            PathEncoding::Packed => bits.div_ceil(8),
        }
    }

    /// Name used in logs and reports.
    pub fn name(self) -> &'static str {
        match self {
            PathEncoding::Text => "text",
            PathEncoding::Packed => "packed",
        }
    }
}

/// Layout of the coded body that follows the dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum BodyLayout {
    /// A single run of bits preceded by its padding count.
    #[default]
    Contiguous,

    /// Fixed-size, independently padded chunks that decode in isolation.
    Chunked {
        /// Payload bytes per chunk (the final chunk may be shorter).
        chunk_size: usize,
    },
}

impl BodyLayout {
    /// Chunked layout with the default chunk size.
    pub fn chunked() -> Self {
        BodyLayout::Chunked {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Check if the layout is chunked.
    pub fn is_chunked(self) -> bool {
        matches!(self, BodyLayout::Chunked { .. })
    }
}

/// What to do with an unfinished code at the end of a bitstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TailPolicy {
    /// Fail with a truncation error.
    #[default]
    Strict,

    /// Drop the partial code and return what was decoded.
    Lenient,
}

/// Compression ratio metrics.
#[derive(Debug, Clone, Copy)]
pub struct CompressionRatio {
    /// Original uncompressed size in bytes.
    pub original_size: usize,
    /// Compressed size in bytes.
    pub compressed_size: usize,
}

impl CompressionRatio {
    /// Create new ratio from sizes.
    pub fn new(original: usize, compressed: usize) -> Self {
        CompressionRatio {
            original_size: original,
            compressed_size: compressed,
        }
    }

    /// Calculate ratio (original / compressed).
    /// Higher is better (more compression).
    pub fn ratio(&self) -> f64 {
        if self.compressed_size == 0 {
            return 0.0;
        }
        self.original_size as f64 / self.compressed_size as f64
    }

    /// Calculate space savings as percentage.
    ///
    /// Negative when the output is larger than the input, which happens for
    /// tiny or high-entropy inputs once the dictionary is counted.
    pub fn savings_percent(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        (1.0 - (self.compressed_size as f64 / self.original_size as f64)) * 100.0
    }

    /// Calculate bytes saved.
    pub fn bytes_saved(&self) -> isize {
        self.original_size as isize - self.compressed_size as isize
    }

    /// Check if compression was effective (saved space).
    pub fn is_effective(&self) -> bool {
        self.compressed_size < self.original_size
    }
}
