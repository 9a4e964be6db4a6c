//! # jzip
//!
//! Command-line driver for the jzip Huffman compressor: input validation,
//! file I/O, configuration and timing reports around `jzip-huffman`.

pub mod config;
pub mod driver;
pub mod report;

pub use config::DriverConfig;
pub use driver::{compress_file, decompress_file, roundtrip_file, validate_input, DriverError};
pub use report::{format_bytes, Report};
