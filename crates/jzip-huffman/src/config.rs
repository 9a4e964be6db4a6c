//! Codec configuration.

use jzip_core::{BodyLayout, PathEncoding, Result, TailPolicy};
use serde::{Deserialize, Serialize};

use crate::body::validate_chunk_size;

/// Settings shared by the compressor and decompressor.
///
/// The compressor uses `path_encoding` and `layout`; the decompressor takes
/// both from the container header and only uses `tail_policy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HuffmanConfig {
    /// Dictionary path encoding.
    pub path_encoding: PathEncoding,
    /// Body layout.
    pub layout: BodyLayout,
    /// Handling of an unfinished code at the end of the body.
    pub tail_policy: TailPolicy,
}

impl HuffmanConfig {
    /// Default configuration: packed paths, contiguous body, strict tail.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dictionary path encoding.
    pub fn with_path_encoding(mut self, path_encoding: PathEncoding) -> Self {
        self.path_encoding = path_encoding;
        self
    }

    /// Set the body layout.
    pub fn with_layout(mut self, layout: BodyLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Use the chunked layout with `chunk_size` payload bytes per chunk.
    pub fn with_chunk_size(self, chunk_size: usize) -> Self {
        self.with_layout(BodyLayout::Chunked { chunk_size })
    }

    /// Set the tail policy.
    pub fn with_tail_policy(mut self, tail_policy: TailPolicy) -> Self {
        self.tail_policy = tail_policy;
        self
    }

    /// Check the settings before use.
    ///
    /// # Errors
    /// [`jzip_core::Error::InvalidChunkSize`] for an unsupported chunk size.
    pub fn validate(&self) -> Result<()> {
        if let BodyLayout::Chunked { chunk_size } = self.layout {
            validate_chunk_size(chunk_size)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HuffmanConfig::new();
        assert_eq!(config.path_encoding, PathEncoding::Packed);
        assert_eq!(config.layout, BodyLayout::Contiguous);
        assert_eq!(config.tail_policy, TailPolicy::Strict);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = HuffmanConfig::new()
            .with_path_encoding(PathEncoding::Text)
            .with_chunk_size(4096)
            .with_tail_policy(TailPolicy::Lenient);
        assert_eq!(config.layout, BodyLayout::Chunked { chunk_size: 4096 });
        assert_eq!(config.tail_policy, TailPolicy::Lenient);
        assert!(config.validate().is_ok());

        assert!(HuffmanConfig::new().with_chunk_size(1).validate().is_err());
    }

    #[test]
    fn test_json() {
        let config: HuffmanConfig = serde_json::from_str(
            r#"{"path_encoding": "text", "layout": {"kind": "chunked", "chunk_size": 1024}}"#,
        )
        .unwrap();
        assert_eq!(config.path_encoding, PathEncoding::Text);
        assert_eq!(config.layout, BodyLayout::Chunked { chunk_size: 1024 });
        assert_eq!(config.tail_policy, TailPolicy::Strict);

        let json = serde_json::to_string(&config).unwrap();
        let back: HuffmanConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);

        let empty: HuffmanConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, HuffmanConfig::default());
    }
}
