//! # jzip Huffman
//!
//! Static Huffman compression of byte streams.
//!
//! The whole input is counted, one prefix-free code is built for it, and the
//! output carries that code as a dictionary followed by the coded bits.
//!
//! ## Quick Start
//!
//! ```rust
//! use jzip_core::{Codec, Compressor, Decompressor};
//! use jzip_huffman::{HuffmanCodec, HuffmanConfig};
//!
//! let codec = HuffmanCodec::new();
//! let compressed = codec.compress(b"abracadabra").unwrap();
//! assert_eq!(codec.decompress(&compressed).unwrap(), b"abracadabra");
//!
//! // Chunked body
//! let codec = HuffmanCodec::with_config(HuffmanConfig::new().with_chunk_size(4096));
//! let compressed = codec.compress(b"mississippi").unwrap();
//! assert_eq!(codec.decompress(&compressed).unwrap(), b"mississippi");
//! ```
//!
//! ## Architecture
//!
//! ```text
//! input ─► FrequencyTable ─► HuffmanTree ─► CodeBook ─┬─► dictionary ─┐
//!                                                     └─► body ───────┴─► container
//!
//! container ─► dictionary ─► CodeBook ─► CompactDecoder ─► body ─► output
//! ```
//!
//! ## Features
//!
//! - `parallel`: decode the chunks of a chunked body on the rayon pool

pub mod bits;
pub mod body;
pub mod code;
pub mod codebook;
pub mod codec;
pub mod config;
pub mod container;
pub mod decoder;
pub mod dictionary;
pub mod frequency;
pub mod tree;

pub use code::{Code, MAX_CODE_LEN};
pub use codebook::CodeBook;
pub use codec::{
    build_decoder, build_tree, decode, encode, read_dict, write_dict, HuffmanCodec,
    HuffmanCompressor, HuffmanDecompressor,
};
pub use config::HuffmanConfig;
pub use decoder::{CompactDecoder, PathCursor, MAX_DENSE_DEPTH};
pub use frequency::FrequencyTable;
pub use tree::HuffmanTree;

#[cfg(feature = "parallel")]
pub use body::decode_chunks_parallel;
