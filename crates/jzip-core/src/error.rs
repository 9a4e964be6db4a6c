//! Error types for Huffman compression operations.

use thiserror::Error;

/// Result type alias for jzip operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Compression error types.
///
/// Variants group into three families:
/// - input errors: [`Error::EmptyInput`]
/// - format errors: malformed dictionaries or bitstreams
/// - capacity errors: values that do not fit the wire format or a buffer
#[derive(Debug, Error)]
pub enum Error {
    /// Nothing to build a tree from.
    #[error("empty input: at least one byte is required")]
    EmptyInput,

    /// Input data is corrupted or invalid.
    #[error("corrupted data: {message}")]
    CorruptedData {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Unexpected end of input while reading a field.
    #[error("unexpected EOF after {bytes_read} bytes while reading {field}")]
    UnexpectedEof {
        bytes_read: usize,
        field: &'static str,
    },

    /// The same symbol appears twice in a dictionary.
    #[error("duplicate symbol 0x{symbol:02x} in dictionary")]
    DuplicateSymbol { symbol: u8 },

    /// A text-encoded path contained something other than `'0'` or `'1'`.
    #[error("invalid bit token 0x{token:02x} at offset {offset}")]
    InvalidBitToken { token: u8, offset: usize },

    /// The bitstream ended in the middle of a code.
    #[error("bitstream truncated: {pending_bits} bits of an unfinished code remain")]
    TruncatedCode { pending_bits: usize },

    /// The bits read so far cannot be the start of any code.
    #[error("invalid code: {bits} bits read without matching any symbol")]
    InvalidCode { bits: usize },

    /// A byte to encode has no code in the code book.
    #[error("symbol 0x{symbol:02x} has no code")]
    UnknownSymbol { symbol: u8 },

    /// A code is longer than the one-byte length field allows.
    #[error("code too long: {length} bits exceeds maximum of {max}")]
    CodeTooLong { length: usize, max: usize },

    /// Buffer too small for output.
    #[error("buffer too small: need {required} bytes, got {provided}")]
    BufferTooSmall { required: usize, provided: usize },

    /// Symbol counts whose sum does not fit in 64 bits.
    #[error("symbol counts overflow: total does not fit in 64 bits")]
    WeightOverflow,

    /// Chunk size outside the supported range.
    #[error("invalid chunk size {size}: must be in range [{min}, {max}]")]
    InvalidChunkSize { size: usize, min: usize, max: usize },

    /// I/O error from underlying stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a corrupted data error.
    pub fn corrupted(message: impl Into<String>) -> Self {
        Error::CorruptedData {
            message: message.into(),
            source: None,
        }
    }

    /// Create a corrupted data error with offset context.
    pub fn corrupted_at(message: impl Into<String>, offset: usize) -> Self {
        Error::CorruptedData {
            message: format!("{} at offset {}", message.into(), offset),
            source: None,
        }
    }

    /// Create an unexpected EOF error.
    pub fn unexpected_eof(bytes_read: usize, field: &'static str) -> Self {
        Error::UnexpectedEof { bytes_read, field }
    }

    /// Create a buffer too small error.
    pub fn buffer_too_small(required: usize, provided: usize) -> Self {
        Error::BufferTooSmall { required, provided }
    }

    /// Create a code too long error.
    pub fn code_too_long(length: usize, max: usize) -> Self {
        Error::CodeTooLong { length, max }
    }

    /// Check if the error describes malformed compressed data.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Error::CorruptedData { .. }
                | Error::UnexpectedEof { .. }
                | Error::DuplicateSymbol { .. }
                | Error::InvalidBitToken { .. }
                | Error::TruncatedCode { .. }
                | Error::InvalidCode { .. }
                | Error::UnknownSymbol { .. }
        )
    }

    /// Check if the error is a capacity limit rather than bad data.
    pub fn is_capacity_error(&self) -> bool {
        matches!(
            self,
            Error::CodeTooLong { .. }
                | Error::BufferTooSmall { .. }
                | Error::InvalidChunkSize { .. }
                | Error::WeightOverflow
        )
    }

    /// Short snake_case name of the variant, used as a log field.
    pub fn category(&self) -> &'static str {
        match self {
            Error::EmptyInput => "empty_input",
            Error::CorruptedData { .. } => "corrupted_data",
            Error::UnexpectedEof { .. } => "unexpected_eof",
            Error::DuplicateSymbol { .. } => "duplicate_symbol",
            Error::InvalidBitToken { .. } => "invalid_bit_token",
            Error::TruncatedCode { .. } => "truncated_code",
            Error::InvalidCode { .. } => "invalid_code",
            Error::UnknownSymbol { .. } => "unknown_symbol",
            Error::CodeTooLong { .. } => "code_too_long",
            Error::BufferTooSmall { .. } => "buffer_too_small",
            Error::InvalidChunkSize { .. } => "invalid_chunk_size",
            Error::WeightOverflow => "weight_overflow",
            Error::Io(_) => "io_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = Error::DuplicateSymbol { symbol: 0x61 };
        assert_eq!(err.to_string(), "duplicate symbol 0x61 in dictionary");

        let err = Error::unexpected_eof(7, "path");
        assert_eq!(
            err.to_string(),
            "unexpected EOF after 7 bytes while reading path"
        );

        let err = Error::corrupted_at("bad magic", 0);
        assert_eq!(err.to_string(), "corrupted data: bad magic at offset 0");
    }

    #[test]
    fn test_classification() {
        assert!(Error::TruncatedCode { pending_bits: 3 }.is_format_error());
        assert!(Error::InvalidBitToken { token: b'x', offset: 4 }.is_format_error());
        assert!(!Error::EmptyInput.is_format_error());

        assert!(Error::code_too_long(300, 255).is_capacity_error());
        assert!(Error::buffer_too_small(10, 5).is_capacity_error());
        assert!(Error::WeightOverflow.is_capacity_error());
        assert!(!Error::UnknownSymbol { symbol: 1 }.is_capacity_error());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        let err: Error = io.into();
        assert_eq!(err.category(), "io_error");
    }
}
