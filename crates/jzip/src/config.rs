//! Driver configuration.

use std::fs;
use std::path::{Path, PathBuf};

use jzip_core::{BodyLayout, PathEncoding, TailPolicy, DEFAULT_CHUNK_SIZE};
use jzip_huffman::HuffmanConfig;
use serde::Deserialize;

use crate::driver::DriverError;

/// Driver configuration, loaded from JSON and overridden by CLI flags.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DriverConfig {
    /// Largest accepted input, in decimal megabytes
    #[serde(default = "default_max_input_mb")]
    pub max_input_mb: u64,

    /// Write the body in independently decodable chunks
    #[serde(default)]
    pub chunked: bool,

    /// Payload bytes per chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Write dictionary paths as ASCII '0'/'1' instead of packed bits
    #[serde(default)]
    pub text_paths: bool,

    /// Drop an unfinished trailing code instead of failing
    #[serde(default)]
    pub lenient: bool,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            max_input_mb: default_max_input_mb(),
            chunked: false,
            chunk_size: default_chunk_size(),
            text_paths: false,
            lenient: false,
            log_level: default_log_level(),
        }
    }
}

impl DriverConfig {
    /// Load a JSON configuration file.
    pub fn from_file(path: &Path) -> Result<Self, DriverError> {
        let text = fs::read_to_string(path).map_err(|source| DriverError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| DriverError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `path` if given, else the defaults.
    pub fn load(path: Option<&PathBuf>) -> Result<Self, DriverError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Input size limit in bytes.
    pub fn max_input_bytes(&self) -> u64 {
        self.max_input_mb.saturating_mul(1000 * 1000)
    }

    /// Codec settings for this configuration.
    pub fn huffman_config(&self) -> HuffmanConfig {
        let layout = if self.chunked {
            BodyLayout::Chunked {
                chunk_size: self.chunk_size,
            }
        } else {
            BodyLayout::Contiguous
        };
        let path_encoding = if self.text_paths {
            PathEncoding::Text
        } else {
            PathEncoding::Packed
        };
        let tail_policy = if self.lenient {
            TailPolicy::Lenient
        } else {
            TailPolicy::Strict
        };

        HuffmanConfig::new()
            .with_path_encoding(path_encoding)
            .with_layout(layout)
            .with_tail_policy(tail_policy)
    }
}

fn default_max_input_mb() -> u64 {
    20
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_log_level() -> String {
    "info".to_string()
}
