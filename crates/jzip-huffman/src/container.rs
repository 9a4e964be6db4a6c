//! Container framing around the dictionary and body.
//!
//! ```text
//! +-------+---------+-------+------------+------+
//! | "JZ"  | version | flags | dictionary | body |
//! +-------+---------+-------+------------+------+
//!    2         1        1
//! ```
//!
//! Flags: bit 0 set for packed dictionary paths, bit 1 set for the chunked
//! body layout. Other bits must be zero.

use std::time::Instant;

use jzip_core::{BodyLayout, CompressionStats, Error, PathEncoding, Result, TailPolicy};
use tracing::debug;

use crate::body::{decode_body, decode_chunks, encode_body, split_chunks};
use crate::config::HuffmanConfig;
use crate::decoder::CompactDecoder;
use crate::dictionary::{read_dictionary, write_dictionary};
use crate::frequency::FrequencyTable;
use crate::tree::HuffmanTree;

/// Leading bytes of every container.
pub const MAGIC: [u8; 2] = *b"JZ";

/// Container format version.
pub const VERSION: u8 = 1;

/// Size of the fixed header.
pub const HEADER_SIZE: usize = 4;

const FLAG_PACKED_PATHS: u8 = 0x01;
const FLAG_CHUNKED: u8 = 0x02;
const KNOWN_FLAGS: u8 = FLAG_PACKED_PATHS | FLAG_CHUNKED;

/// Decoded container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Encoding of the dictionary paths.
    pub path_encoding: PathEncoding,
    /// Whether the body uses the chunked layout.
    pub chunked: bool,
}

impl Header {
    /// Header describing output produced with `config`.
    pub fn for_config(config: &HuffmanConfig) -> Self {
        Self {
            path_encoding: config.path_encoding,
            chunked: config.layout.is_chunked(),
        }
    }

    fn flags(&self) -> u8 {
        let mut flags = 0;
        if self.path_encoding == PathEncoding::Packed {
            flags |= FLAG_PACKED_PATHS;
        }
        if self.chunked {
            flags |= FLAG_CHUNKED;
        }
        flags
    }

    /// Append the header bytes to `out`.
    pub fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&MAGIC);
        out.push(VERSION);
        out.push(self.flags());
    }

    /// Parse the header and return it with the bytes that follow.
    ///
    /// # Errors
    /// - [`Error::UnexpectedEof`] if `input` is shorter than the header
    /// - [`Error::CorruptedData`] for a wrong magic, version or flag
    pub fn parse(input: &[u8]) -> Result<(Self, &[u8])> {
        if input.len() < HEADER_SIZE {
            return Err(Error::unexpected_eof(input.len(), "container header"));
        }
        if input[..2] != MAGIC {
            return Err(Error::corrupted_at("bad magic", 0));
        }
        if input[2] != VERSION {
            return Err(Error::corrupted(format!(
                "unsupported version {}, expected {}",
                input[2], VERSION
            )));
        }

        let flags = input[3];
        if flags & !KNOWN_FLAGS != 0 {
            return Err(Error::corrupted_at(
                format!("unknown flags 0x{:02x}", flags),
                3,
            ));
        }

        let header = Self {
            path_encoding: if flags & FLAG_PACKED_PATHS != 0 {
                PathEncoding::Packed
            } else {
                PathEncoding::Text
            },
            chunked: flags & FLAG_CHUNKED != 0,
        };
        Ok((header, &input[HEADER_SIZE..]))
    }
}

/// Compress `input` into a complete container.
///
/// # Errors
/// - [`Error::EmptyInput`] if `input` is empty
/// - [`Error::InvalidChunkSize`] for an unsupported chunk size
pub fn compress_with(input: &[u8], config: &HuffmanConfig) -> Result<(Vec<u8>, CompressionStats)> {
    let start = Instant::now();
    if input.is_empty() {
        return Err(Error::EmptyInput);
    }
    config.validate()?;

    let freq = FrequencyTable::from_bytes(input);
    let book = HuffmanTree::from_frequencies(&freq)?.codes();
    let body_bits = book.encoded_bit_len(&freq)?;

    let mut out = Vec::with_capacity(HEADER_SIZE + (body_bits as usize).div_ceil(8) + 64);
    Header::for_config(config).write(&mut out);
    let dictionary_size = write_dictionary(&book, config.path_encoding, &mut out)?;

    let body_start = out.len();
    encode_body(input, &book, config.layout, &mut out)?;
    let chunks = match config.layout {
        BodyLayout::Contiguous => 1,
        BodyLayout::Chunked { .. } => split_chunks(&out[body_start..])?.len(),
    };

    let stats = CompressionStats {
        original_size: input.len(),
        compressed_size: out.len(),
        dictionary_size,
        symbols: book.len(),
        max_code_len: book.max_code_len(),
        chunks,
        time_us: start.elapsed().as_micros() as u64,
    };
    debug!(
        body_bits,
        encoding = config.path_encoding.name(),
        chunked = config.layout.is_chunked(),
        "{}",
        stats.summary()
    );
    Ok((out, stats))
}

/// Decompress a container produced by [`compress_with`].
///
/// Path encoding and body layout come from the header; only the tail policy
/// is up to the caller.
///
/// # Errors
/// Any format error from the header, dictionary or body.
pub fn decompress_with(input: &[u8], policy: TailPolicy) -> Result<(Vec<u8>, CompressionStats)> {
    let start = Instant::now();

    let (header, mut rest) = Header::parse(input)?;
    let book = read_dictionary(&mut rest, header.path_encoding)?;
    let dictionary_size = input.len() - HEADER_SIZE - rest.len();
    let decoder = CompactDecoder::new(&book)?;

    let (output, chunks) = if header.chunked {
        let chunks = split_chunks(rest)?;
        (decode_chunks(&decoder, &chunks, policy)?, chunks.len())
    } else {
        (decode_body(&decoder, rest, false, policy)?, 1)
    };

    let stats = CompressionStats {
        original_size: output.len(),
        compressed_size: input.len(),
        dictionary_size,
        symbols: book.len(),
        max_code_len: book.max_code_len(),
        chunks,
        time_us: start.elapsed().as_micros() as u64,
    };
    debug!(
        encoding = header.path_encoding.name(),
        chunked = header.chunked,
        "{}",
        stats.summary()
    );
    Ok((output, stats))
}
