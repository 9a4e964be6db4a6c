//! Codec implementations and the free-function pipeline.

use std::sync::Mutex;

use jzip_core::{
    BodyLayout, Codec, CompressionStats, Compressor, Decompressor, PathEncoding, Result,
    TailPolicy,
};

use crate::body::{decode_body, encode_body, MIN_CHUNK_SIZE};
use crate::code::MAX_CODE_LEN;
use crate::codebook::CodeBook;
use crate::config::HuffmanConfig;
use crate::container::{compress_with, decompress_with, HEADER_SIZE};
use crate::decoder::CompactDecoder;
use crate::dictionary::{read_dictionary, write_dictionary};
use crate::frequency::ALPHABET_SIZE;
use crate::tree::HuffmanTree;

// ============================================================================
// Pipeline stages
// ============================================================================

/// Count `data` and build its Huffman tree.
pub fn build_tree(data: &[u8]) -> Result<HuffmanTree> {
    HuffmanTree::from_bytes(data)
}

/// Serialize a code book into a new buffer.
pub fn write_dict(book: &CodeBook, encoding: PathEncoding) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    write_dictionary(book, encoding, &mut out)?;
    Ok(out)
}

/// Parse a dictionary from the front of `input`, advancing it past the
/// terminator.
pub fn read_dict(input: &mut &[u8], encoding: PathEncoding) -> Result<CodeBook> {
    read_dictionary(input, encoding)
}

/// Encode `data` into a body of the given layout.
pub fn encode(data: &[u8], book: &CodeBook, layout: BodyLayout) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    encode_body(data, book, layout, &mut out)?;
    Ok(out)
}

/// Build the lookup structure for decoding.
pub fn build_decoder(book: &CodeBook) -> Result<CompactDecoder> {
    CompactDecoder::new(book)
}

/// Decode a body produced by [`encode`].
pub fn decode(
    decoder: &CompactDecoder,
    body: &[u8],
    chunked: bool,
    policy: TailPolicy,
) -> Result<Vec<u8>> {
    decode_body(decoder, body, chunked, policy)
}

/// Upper bound on the container size for `input_len` bytes.
///
/// Assumes every code is as long as the format allows and every full chunk
/// wastes as many bits as it can.
pub fn max_container_size(config: &HuffmanConfig, input_len: usize) -> usize {
    let dictionary =
        ALPHABET_SIZE * (2 + config.path_encoding.path_bytes(MAX_CODE_LEN)) + 1;
    let body_bits = input_len.saturating_mul(MAX_CODE_LEN);

    let body = match config.layout {
        BodyLayout::Contiguous => 1 + body_bits.div_ceil(8),
        BodyLayout::Chunked { chunk_size } => {
            let chunk_size = chunk_size.max(MIN_CHUNK_SIZE);
            let min_fill = (chunk_size * 8).saturating_sub(MAX_CODE_LEN - 1).max(1);
            let chunks = body_bits / min_fill + 1;
            4 + chunks.saturating_mul(chunk_size + 1)
        }
    };

    HEADER_SIZE + dictionary + body
}

#[derive(Debug, Default)]
struct LastStats(Mutex<Option<CompressionStats>>);

impl LastStats {
    fn set(&self, stats: CompressionStats) {
        let mut guard = self.0.lock().unwrap_or_else(|e| e.into_inner());
        *guard = Some(stats);
    }

    fn get(&self) -> Option<CompressionStats> {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Clone for LastStats {
    fn clone(&self) -> Self {
        Self(Mutex::new(self.get()))
    }
}

// ============================================================================
// Huffman Codec
// ============================================================================

/// Huffman compressor.
#[derive(Debug, Clone, Default)]
pub struct HuffmanCompressor {
    config: HuffmanConfig,
    last: LastStats,
}

impl HuffmanCompressor {
    /// Create a new Huffman compressor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with configuration.
    pub fn with_config(config: HuffmanConfig) -> Self {
        Self {
            config,
            last: LastStats::default(),
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &HuffmanConfig {
        &self.config
    }
}

impl Compressor for HuffmanCompressor {
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let (output, stats) = compress_with(input, &self.config)?;
        self.last.set(stats);
        Ok(output)
    }

    fn max_compressed_size(&self, input_len: usize) -> usize {
        max_container_size(&self.config, input_len)
    }

    fn stats(&self) -> Option<CompressionStats> {
        self.last.get()
    }
}

/// Huffman decompressor.
///
/// Path encoding and layout are read from each container; only the tail
/// policy of the configuration applies.
#[derive(Debug, Clone, Default)]
pub struct HuffmanDecompressor {
    config: HuffmanConfig,
    last: LastStats,
}

impl HuffmanDecompressor {
    /// Create a new Huffman decompressor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with configuration.
    pub fn with_config(config: HuffmanConfig) -> Self {
        Self {
            config,
            last: LastStats::default(),
        }
    }

    /// Create with a tail policy.
    pub fn with_tail_policy(tail_policy: TailPolicy) -> Self {
        Self::with_config(HuffmanConfig::new().with_tail_policy(tail_policy))
    }
}

impl Decompressor for HuffmanDecompressor {
    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let (output, stats) = decompress_with(input, self.config.tail_policy)?;
        self.last.set(stats);
        Ok(output)
    }

    fn stats(&self) -> Option<CompressionStats> {
        self.last.get()
    }
}

/// Huffman codec combining both directions.
#[derive(Debug, Clone, Default)]
pub struct HuffmanCodec {
    config: HuffmanConfig,
    compress_stats: LastStats,
    decompress_stats: LastStats,
}

impl HuffmanCodec {
    /// Active configuration.
    pub fn config(&self) -> &HuffmanConfig {
        &self.config
    }
}

impl Compressor for HuffmanCodec {
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let (output, stats) = compress_with(input, &self.config)?;
        self.compress_stats.set(stats);
        Ok(output)
    }

    fn max_compressed_size(&self, input_len: usize) -> usize {
        max_container_size(&self.config, input_len)
    }

    fn stats(&self) -> Option<CompressionStats> {
        self.compress_stats.get()
    }
}

impl Decompressor for HuffmanCodec {
    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let (output, stats) = decompress_with(input, self.config.tail_policy)?;
        self.decompress_stats.set(stats);
        Ok(output)
    }

    fn stats(&self) -> Option<CompressionStats> {
        self.decompress_stats.get()
    }
}

impl Codec for HuffmanCodec {
    type Config = HuffmanConfig;

    fn new() -> Self {
        Self::default()
    }

    fn with_config(config: HuffmanConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }
}
