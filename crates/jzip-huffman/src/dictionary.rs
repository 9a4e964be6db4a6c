//! Dictionary section wire format.
//!
//! ```text
//! record     := length:u8 path symbol:u8      (length in 1..=255)
//! terminator := 0x00
//! ```
//!
//! Records are written in ascending symbol order. The path holds `length`
//! bits in one of two encodings:
//!
//! - [`PathEncoding::Text`]: one ASCII `'0'` / `'1'` byte per bit
//! - [`PathEncoding::Packed`]: MSB-first, `ceil(length / 8)` bytes, zero padded
//!
//! Example: symbol `'a'` with code `101` is `03 31 30 31 61` as text and
//! `03 A0 61` packed.

use std::io::{self, Read, Write};

use jzip_core::{Error, PathEncoding, Result};
use tracing::debug;

use crate::code::{Code, MAX_CODE_LEN};
use crate::codebook::CodeBook;

/// Byte that ends the dictionary section.
pub const TERMINATOR: u8 = 0;

/// Serialize `book` to `out`.
///
/// Returns the number of bytes written.
///
/// # Errors
/// - [`Error::CodeTooLong`] if a code does not fit the length byte
/// - [`Error::Io`] if the sink fails
pub fn write_dictionary<W: Write>(
    book: &CodeBook,
    encoding: PathEncoding,
    out: &mut W,
) -> Result<usize> {
    let mut written = 0;
    let mut record = Vec::with_capacity(2 + encoding.path_bytes(MAX_CODE_LEN));

    for (symbol, code) in book.iter() {
        if code.len() > MAX_CODE_LEN {
            return Err(Error::code_too_long(code.len(), MAX_CODE_LEN));
        }

        record.clear();
        record.push(code.len() as u8);
        match encoding {
            PathEncoding::Text => {
                record.extend(code.iter().map(|bit| if bit { b'1' } else { b'0' }));
            }
            PathEncoding::Packed => record.extend_from_slice(&code.to_packed()),
        }
        record.push(symbol);

        out.write_all(&record)?;
        written += record.len();
    }

    out.write_all(&[TERMINATOR])?;
    written += 1;

    debug!(
        symbols = book.len(),
        bytes = written,
        encoding = encoding.name(),
        "wrote dictionary"
    );
    Ok(written)
}

/// Exact number of bytes [`write_dictionary`] produces for `book`.
pub fn dictionary_size(book: &CodeBook, encoding: PathEncoding) -> usize {
    book.iter()
        .map(|(_, code)| 2 + encoding.path_bytes(code.len()))
        .sum::<usize>()
        + 1
}

/// Parse a dictionary section from `input`, stopping after the terminator.
///
/// On success the reader is positioned on the first byte after the
/// terminator.
///
/// # Errors
/// - [`Error::UnexpectedEof`] if input ends inside a record or before the
///   terminator
/// - [`Error::InvalidBitToken`] for a text path byte other than `'0'`/`'1'`
/// - [`Error::CorruptedData`] for set padding bits in a packed path or for
///   codes that are not prefix-free
/// - [`Error::DuplicateSymbol`] if a symbol appears twice
pub fn read_dictionary<R: Read>(input: &mut R, encoding: PathEncoding) -> Result<CodeBook> {
    let mut reader = CountingReader::new(input);
    let mut book = CodeBook::new();
    let mut path = Vec::with_capacity(encoding.path_bytes(MAX_CODE_LEN));

    loop {
        let length = reader.read_u8("path length")? as usize;
        if length == TERMINATOR as usize {
            break;
        }

        let path_start = reader.offset();
        path.resize(encoding.path_bytes(length), 0);
        reader.read_exact(&mut path, "path")?;

        let code = match encoding {
            PathEncoding::Text => decode_text_path(&path, path_start)?,
            PathEncoding::Packed => decode_packed_path(&path, length, path_start)?,
        };

        let symbol = reader.read_u8("symbol")?;
        book.insert(symbol, code)?;
    }

    book.validate_prefix_free()?;

    debug!(
        symbols = book.len(),
        bytes = reader.offset(),
        encoding = encoding.name(),
        "read dictionary"
    );
    Ok(book)
}

fn decode_text_path(path: &[u8], start: usize) -> Result<Code> {
    let mut code = Code::new();
    for (i, &token) in path.iter().enumerate() {
        match token {
            b'0' => code.push(false)?,
            b'1' => code.push(true)?,
            _ => {
                return Err(Error::InvalidBitToken {
                    token,
                    offset: start + i,
                })
            }
        }
    }
    Ok(code)
}

fn decode_packed_path(path: &[u8], length: usize, start: usize) -> Result<Code> {
    let used = length % 8;
    if used != 0 {
        if let Some(&last) = path.last() {
            if last & (0xFF >> used) != 0 {
                return Err(Error::corrupted_at(
                    "non-zero padding bits in packed path",
                    start + path.len() - 1,
                ));
            }
        }
    }
    Code::from_packed(path, length)
}

/// Reader wrapper that tracks the byte offset for error reporting.
struct CountingReader<'a, R: Read> {
    inner: &'a mut R,
    offset: usize,
}

impl<'a, R: Read> CountingReader<'a, R> {
    fn new(inner: &'a mut R) -> Self {
        Self { inner, offset: 0 }
    }

    fn offset(&self) -> usize {
        self.offset
    }

    fn read_u8(&mut self, field: &'static str) -> Result<u8> {
        let mut byte = [0u8; 1];
        self.read_exact(&mut byte, field)?;
        Ok(byte[0])
    }

    fn read_exact(&mut self, buf: &mut [u8], field: &'static str) -> Result<()> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => return Err(Error::unexpected_eof(self.offset + filled, field)),
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        self.offset += filled;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::HuffmanTree;

    fn code(s: &str) -> Code {
        s.parse().unwrap()
    }

    fn sample_book() -> CodeBook {
        CodeBook::try_from(vec![
            (b'a', code("101")),
            (b'b', code("0")),
            (b'c', code("100")),
            (b'd', code("11")),
        ])
        .unwrap()
    }

    #[test]
    fn test_text_layout() {
        let book = CodeBook::try_from(vec![(b'a', code("101"))]).unwrap();
        let mut out = Vec::new();
        let n = write_dictionary(&book, PathEncoding::Text, &mut out).unwrap();
        assert_eq!(out, vec![0x03, b'1', b'0', b'1', b'a', 0x00]);
        assert_eq!(n, out.len());
    }

    #[test]
    fn test_packed_layout() {
        let book = CodeBook::try_from(vec![(b'a', code("101"))]).unwrap();
        let mut out = Vec::new();
        write_dictionary(&book, PathEncoding::Packed, &mut out).unwrap();
        assert_eq!(out, vec![0x03, 0xA0, b'a', 0x00]);
    }

    #[test]
    fn test_records_in_symbol_order() {
        let mut out = Vec::new();
        write_dictionary(&sample_book(), PathEncoding::Packed, &mut out).unwrap();
        // a, b, c, d
        assert_eq!(out[0], 3);
        assert_eq!(out[2], b'a');
        assert_eq!(out[3], 1);
        assert_eq!(out[5], b'b');
    }

    #[test]
    fn test_roundtrip_both_encodings() {
        for encoding in [PathEncoding::Text, PathEncoding::Packed] {
            let book = sample_book();
            let mut out = Vec::new();
            write_dictionary(&book, encoding, &mut out).unwrap();
            assert_eq!(out.len(), dictionary_size(&book, encoding));

            let parsed = read_dictionary(&mut out.as_slice(), encoding).unwrap();
            assert_eq!(parsed, book);
        }
    }

    #[test]
    fn test_reader_left_after_terminator() {
        let mut out = Vec::new();
        write_dictionary(&sample_book(), PathEncoding::Packed, &mut out).unwrap();
        out.extend_from_slice(b"BODY");

        let mut input = out.as_slice();
        read_dictionary(&mut input, PathEncoding::Packed).unwrap();
        assert_eq!(input, b"BODY");
    }

    #[test]
    fn test_truncated_mid_path() {
        let mut out = Vec::new();
        write_dictionary(&sample_book(), PathEncoding::Text, &mut out).unwrap();
        let truncated = &out[..2];

        let err = read_dictionary(&mut &truncated[..], PathEncoding::Text).unwrap_err();
        assert!(matches!(err, Error::UnexpectedEof { field: "path", .. }));
        assert!(err.is_format_error());
    }

    #[test]
    fn test_truncated_every_prefix_fails() {
        let mut out = Vec::new();
        write_dictionary(&sample_book(), PathEncoding::Packed, &mut out).unwrap();

        for len in 0..out.len() {
            let err = read_dictionary(&mut &out[..len], PathEncoding::Packed).unwrap_err();
            assert!(err.is_format_error(), "prefix of {} bytes: {:?}", len, err);
        }
    }

    #[test]
    fn test_duplicate_symbol() {
        let data = [1, b'0', b'x', 1, b'1', b'x', 0];
        assert!(matches!(
            read_dictionary(&mut &data[..], PathEncoding::Text),
            Err(Error::DuplicateSymbol { symbol: b'x' })
        ));
    }

    #[test]
    fn test_invalid_bit_token() {
        let data = [2, b'0', b'2', b'x', 0];
        assert!(matches!(
            read_dictionary(&mut &data[..], PathEncoding::Text),
            Err(Error::InvalidBitToken { token: b'2', offset: 2 })
        ));
    }

    #[test]
    fn test_packed_padding_must_be_zero() {
        let data = [3, 0b1011_0000, b'a', 0];
        assert!(read_dictionary(&mut &data[..], PathEncoding::Packed).is_err());
    }

    #[test]
    fn test_prefix_conflict_rejected() {
        let data = [1, b'0', b'a', 2, b'0', b'1', b'b', 0];
        assert!(matches!(
            read_dictionary(&mut &data[..], PathEncoding::Text),
            Err(Error::CorruptedData { .. })
        ));
    }

    #[test]
    fn test_long_codes_roundtrip() {
        let mut entries: Vec<(u8, Code)> = (0..40u8)
            .map(|i| (i, Code::from_bits((0..i).map(|_| true).chain([false])).unwrap()))
            .collect();
        entries.push((40, Code::from_bits((0..40).map(|_| true)).unwrap()));
        let book = CodeBook::try_from(entries).unwrap();

        let mut out = Vec::new();
        write_dictionary(&book, PathEncoding::Packed, &mut out).unwrap();
        let parsed = read_dictionary(&mut out.as_slice(), PathEncoding::Packed).unwrap();
        assert_eq!(parsed, book);
        assert_eq!(parsed.max_code_len(), 40);
    }

    #[test]
    fn test_tree_codes_roundtrip() {
        let book = HuffmanTree::from_bytes(b"the quick brown fox jumps over the lazy dog")
            .unwrap()
            .codes();
        let mut out = Vec::new();
        write_dictionary(&book, PathEncoding::Text, &mut out).unwrap();
        assert_eq!(read_dictionary(&mut out.as_slice(), PathEncoding::Text).unwrap(), book);
    }
}
