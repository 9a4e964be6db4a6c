//! Statistics for compression operations.

use crate::types::CompressionRatio;

/// Statistics from a compression/decompression operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompressionStats {
    /// Original (uncompressed) size in bytes.
    pub original_size: usize,

    /// Compressed size in bytes, container and dictionary included.
    pub compressed_size: usize,

    /// Bytes taken by the serialized dictionary.
    pub dictionary_size: usize,

    /// Number of distinct symbols in the alphabet.
    pub symbols: usize,

    /// Longest code in bits.
    pub max_code_len: usize,

    /// Number of body chunks (1 for the contiguous layout).
    pub chunks: usize,

    /// Time taken in microseconds.
    pub time_us: u64,
}

impl CompressionStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get compression ratio.
    pub fn ratio(&self) -> CompressionRatio {
        CompressionRatio::new(self.original_size, self.compressed_size)
    }

    /// Average code length in bits per input byte.
    pub fn bits_per_symbol(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        let body = self.compressed_size.saturating_sub(self.dictionary_size);
        body as f64 * 8.0 / self.original_size as f64
    }

    /// Get space savings as percentage.
    pub fn savings_percent(&self) -> f64 {
        self.ratio().savings_percent()
    }

    /// One-line summary for logs.
    pub fn summary(&self) -> String {
        format!(
            "{} -> {} bytes (ratio: {:.2}x, saved: {:.1}%, dict: {} B, symbols: {}, \
             max code: {} bits, chunks: {}, {} us)",
            self.original_size,
            self.compressed_size,
            self.ratio().ratio(),
            self.savings_percent(),
            self.dictionary_size,
            self.symbols,
            self.max_code_len,
            self.chunks,
            self.time_us,
        )
    }
}
