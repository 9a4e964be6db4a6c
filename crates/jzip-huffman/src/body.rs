//! Coded body layouts.
//!
//! ## Contiguous
//!
//! ```text
//! [padding: u8][bits ...]
//! ```
//!
//! `padding` counts the zero bits appended to fill the last byte (0..=7).
//!
//! ## Chunked
//!
//! ```text
//! [chunk_size: u32 LE] { [trailing: u8][payload: chunk_size bytes] }*
//! ```
//!
//! Every chunk holds whole codes only. When the next code does not fit the
//! bits left in a chunk, the chunk is closed and `trailing` records how many
//! bits at the end of its payload are unused. The final chunk's payload may be
//! shorter than `chunk_size`. Chunks share nothing but the dictionary, so each
//! one decodes on its own.

use jzip_core::{BodyLayout, Error, Result, TailPolicy};
use tracing::{trace, warn};

use crate::bits::{BitReader, BitWriter};
use crate::code::{Code, MAX_CODE_LEN};
use crate::codebook::CodeBook;
use crate::decoder::{CompactDecoder, PathCursor};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Smallest chunk payload: an empty chunk must fit the longest code.
pub const MIN_CHUNK_SIZE: usize = MAX_CODE_LEN.div_ceil(8);

/// Largest chunk payload (16 MB).
pub const MAX_CHUNK_SIZE: usize = 16 * 1024 * 1024;

/// Bytes in the chunked header.
const CHUNK_HEADER_SIZE: usize = 4;

/// Check a chunk payload size against the supported range.
///
/// # Errors
/// [`Error::InvalidChunkSize`] outside `MIN_CHUNK_SIZE..=MAX_CHUNK_SIZE`.
pub fn validate_chunk_size(size: usize) -> Result<()> {
    if !(MIN_CHUNK_SIZE..=MAX_CHUNK_SIZE).contains(&size) {
        return Err(Error::InvalidChunkSize {
            size,
            min: MIN_CHUNK_SIZE,
            max: MAX_CHUNK_SIZE,
        });
    }
    Ok(())
}

/// One chunk of a chunked body, borrowed from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// Unused bits at the end of `payload`.
    pub trailing: u8,
    /// Coded bits.
    pub payload: &'a [u8],
}

impl Chunk<'_> {
    /// Meaningful bits in the payload.
    pub fn bit_len(&self) -> usize {
        self.payload.len() * 8 - self.trailing as usize
    }

    /// Bits of the payload, trailing bits excluded.
    pub fn bits(&self) -> BitReader<'_> {
        BitReader::with_bit_len(self.payload, self.bit_len())
    }
}

/// Encode `data` with `book` and append the body to `out`.
///
/// # Errors
/// - [`Error::UnknownSymbol`] if a byte of `data` has no code
/// - [`Error::InvalidChunkSize`] for an unsupported chunk size
pub fn encode_body(
    data: &[u8],
    book: &CodeBook,
    layout: BodyLayout,
    out: &mut Vec<u8>,
) -> Result<()> {
    let table = book.table();
    match layout {
        BodyLayout::Contiguous => encode_contiguous(data, &table, out),
        BodyLayout::Chunked { chunk_size } => encode_chunked(data, &table, chunk_size, out),
    }
}

#[inline]
fn lookup(table: &[Option<Code>], symbol: u8) -> Result<&Code> {
    table[symbol as usize]
        .as_ref()
        .ok_or(Error::UnknownSymbol { symbol })
}

fn encode_contiguous(data: &[u8], table: &[Option<Code>], out: &mut Vec<u8>) -> Result<()> {
    let mut writer = BitWriter::with_capacity(data.len());
    for &symbol in data {
        writer.write_code(lookup(table, symbol)?);
    }

    let (bits, padding) = writer.finish();
    out.reserve(1 + bits.len());
    out.push(padding);
    out.extend_from_slice(&bits);
    Ok(())
}

fn encode_chunked(
    data: &[u8],
    table: &[Option<Code>],
    chunk_size: usize,
    out: &mut Vec<u8>,
) -> Result<()> {
    validate_chunk_size(chunk_size)?;
    let capacity = chunk_size * 8;

    out.extend_from_slice(&(chunk_size as u32).to_le_bytes());

    let mut writer = BitWriter::with_capacity(chunk_size);
    let mut chunks = 0usize;
    for &symbol in data {
        let code = lookup(table, symbol)?;
        if writer.bit_len() + code.len() > capacity {
            let full = std::mem::replace(&mut writer, BitWriter::with_capacity(chunk_size));
            write_chunk(full, Some(chunk_size), out);
            chunks += 1;
        }
        writer.write_code(code);
    }
    if !writer.is_empty() {
        write_chunk(writer, None, out);
        chunks += 1;
    }

    trace!(chunks, chunk_size, "encoded chunked body");
    Ok(())
}

/// Append one chunk. Full chunks are zero-filled to `pad_to` bytes.
fn write_chunk(writer: BitWriter, pad_to: Option<usize>, out: &mut Vec<u8>) {
    let used = writer.bit_len();
    let (mut payload, padding) = writer.finish();

    let trailing = match pad_to {
        Some(size) => {
            payload.resize(size, 0);
            size * 8 - used
        }
        None => padding as usize,
    };
    debug_assert!(trailing < MAX_CODE_LEN);

    trace!(bits = used, trailing, "wrote chunk");
    out.push(trailing as u8);
    out.extend_from_slice(&payload);
}

/// Split a chunked body into its chunks.
///
/// # Errors
/// - [`Error::UnexpectedEof`] if the header is cut short
/// - [`Error::InvalidChunkSize`] for an unsupported chunk size
/// - [`Error::CorruptedData`] for a chunk without payload or with more
///   trailing bits than payload bits
pub fn split_chunks(body: &[u8]) -> Result<Vec<Chunk<'_>>> {
    if body.len() < CHUNK_HEADER_SIZE {
        return Err(Error::unexpected_eof(body.len(), "chunk size"));
    }
    let chunk_size = u32::from_le_bytes([body[0], body[1], body[2], body[3]]) as usize;
    validate_chunk_size(chunk_size)?;

    let mut chunks = Vec::with_capacity((body.len() - CHUNK_HEADER_SIZE).div_ceil(chunk_size + 1));
    let mut pos = CHUNK_HEADER_SIZE;
    while pos < body.len() {
        let trailing = body[pos];
        let start = pos + 1;
        let end = (start + chunk_size).min(body.len());
        let payload = &body[start..end];

        if payload.is_empty() {
            return Err(Error::corrupted_at("chunk has no payload", pos));
        }
        if trailing as usize > payload.len() * 8 {
            return Err(Error::corrupted_at(
                format!(
                    "chunk claims {} trailing bits but holds {}",
                    trailing,
                    payload.len() * 8
                ),
                pos,
            ));
        }

        chunks.push(Chunk { trailing, payload });
        pos = end;
    }
    Ok(chunks)
}

/// Decode every bit from `bits`, appending symbols to `out`.
///
/// # Errors
/// - [`Error::InvalidCode`] if the bits stop matching any code
/// - [`Error::TruncatedCode`] if the bits end inside a code under
///   [`TailPolicy::Strict`]
pub fn decode_bits(
    decoder: &CompactDecoder,
    bits: BitReader<'_>,
    policy: TailPolicy,
    out: &mut Vec<u8>,
) -> Result<()> {
    let mut cursor = PathCursor::new();
    for bit in bits {
        if let Some(symbol) = decoder.step(&mut cursor, bit)? {
            out.push(symbol);
        }
    }

    if !cursor.is_empty() {
        match policy {
            TailPolicy::Strict => {
                return Err(Error::TruncatedCode {
                    pending_bits: cursor.len(),
                })
            }
            TailPolicy::Lenient => {
                warn!(
                    pending_bits = cursor.len(),
                    "discarding unfinished code at end of bitstream"
                );
            }
        }
    }
    Ok(())
}

/// Decode a single chunk.
pub fn decode_chunk(
    decoder: &CompactDecoder,
    chunk: &Chunk<'_>,
    policy: TailPolicy,
) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(chunk.payload.len() * 2);
    decode_bits(decoder, chunk.bits(), policy, &mut out)?;
    trace!(bits = chunk.bit_len(), symbols = out.len(), "decoded chunk");
    Ok(out)
}

/// Decode chunks on the rayon pool and join the results in order.
#[cfg(feature = "parallel")]
pub fn decode_chunks_parallel(
    decoder: &CompactDecoder,
    chunks: &[Chunk<'_>],
    policy: TailPolicy,
) -> Result<Vec<u8>> {
    let decoded: Vec<Vec<u8>> = chunks
        .par_iter()
        .map(|chunk| decode_chunk(decoder, chunk, policy))
        .collect::<Result<_>>()?;
    Ok(decoded.concat())
}

/// Decode chunks in order, on the rayon pool when `parallel` is enabled.
pub(crate) fn decode_chunks(
    decoder: &CompactDecoder,
    chunks: &[Chunk<'_>],
    policy: TailPolicy,
) -> Result<Vec<u8>> {
    #[cfg(feature = "parallel")]
    let out = decode_chunks_parallel(decoder, chunks, policy)?;

    #[cfg(not(feature = "parallel"))]
    let out = {
        let mut out = Vec::new();
        for chunk in chunks {
            decode_bits(decoder, chunk.bits(), policy, &mut out)?;
        }
        out
    };

    Ok(out)
}

/// Decode a whole body written by [`encode_body`].
///
/// `chunked` selects the layout; the chunk size itself is read from the body.
pub fn decode_body(
    decoder: &CompactDecoder,
    body: &[u8],
    chunked: bool,
    policy: TailPolicy,
) -> Result<Vec<u8>> {
    if chunked {
        let chunks = split_chunks(body)?;
        return decode_chunks(decoder, &chunks, policy);
    }

    let Some((&padding, bits)) = body.split_first() else {
        return Err(Error::unexpected_eof(0, "body padding"));
    };
    if padding > 7 || (bits.is_empty() && padding != 0) {
        return Err(Error::corrupted(format!(
            "invalid padding {} for a {}-byte body",
            padding,
            bits.len()
        )));
    }

    let bit_len = bits.len() * 8 - padding as usize;
    let mut out = Vec::with_capacity(bits.len() * 2);
    decode_bits(
        decoder,
        BitReader::with_bit_len(bits, bit_len),
        policy,
        &mut out,
    )?;
    Ok(out)
}
