//! # jzip Core
//!
//! Core traits, error taxonomy and shared types for the jzip Huffman
//! compressor.
//!
//! ## Core Traits
//!
//! - [`Compressor`] - One-shot compression operations
//! - [`Decompressor`] - One-shot decompression operations
//! - [`Codec`] - Combined compress/decompress capability
//!
//! ## Example
//!
//! ```ignore
//! use jzip_core::{Codec, Compressor, Decompressor};
//! use jzip_huffman::HuffmanCodec;
//!
//! let codec = HuffmanCodec::new();
//! let compressed = codec.compress(data)?;
//! let original = codec.decompress(&compressed)?;
//! ```

pub mod error;
pub mod stats;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use stats::CompressionStats;
pub use traits::{Codec, Compressor, Decompressor};
pub use types::{BodyLayout, CompressionRatio, PathEncoding, TailPolicy, DEFAULT_CHUNK_SIZE};
