//! File-level commands: compress, decompress and an in-memory roundtrip.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use jzip_core::{Compressor, Decompressor, Error};
use jzip_huffman::container::Header;
use jzip_huffman::dictionary::write_dictionary;
use jzip_huffman::{
    build_decoder, build_tree, decode, encode, read_dict, HuffmanCompressor, HuffmanDecompressor,
};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::DriverConfig;
use crate::report::{format_bytes, Report, Stopwatch};

/// Extension appended to compressed files.
pub const EXTENSION: &str = "jzip";

/// Driver failures.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("cannot read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("cannot write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("{} is empty", .0.display())]
    EmptyFile(PathBuf),

    #[error("{} is {size} bytes, over the {limit} byte limit", .path.display())]
    TooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("{} already exists (use --force to overwrite)", .0.display())]
    OutputExists(PathBuf),

    #[error("invalid configuration in {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("roundtrip mismatch: {0}")]
    Mismatch(String),

    #[error(transparent)]
    Codec(#[from] Error),
}

impl DriverError {
    /// Short snake_case name of the failure, used as a log field.
    pub fn category(&self) -> &'static str {
        match self {
            DriverError::Read { .. } => "read_failed",
            DriverError::Write { .. } => "write_failed",
            DriverError::EmptyFile(_) => "empty_file",
            DriverError::TooLarge { .. } => "too_large",
            DriverError::OutputExists(_) => "output_exists",
            DriverError::Config { .. } => "invalid_config",
            DriverError::Mismatch(_) => "roundtrip_mismatch",
            DriverError::Codec(err) => err.category(),
        }
    }

    /// Error family: `input`, `format`, `capacity`, `io`, `config` or `verify`.
    pub fn kind(&self) -> &'static str {
        match self {
            DriverError::EmptyFile(_)
            | DriverError::TooLarge { .. }
            | DriverError::OutputExists(_) => "input",
            DriverError::Read { .. } | DriverError::Write { .. } => "io",
            DriverError::Config { .. } => "config",
            DriverError::Mismatch(_) => "verify",
            DriverError::Codec(err) if err.is_format_error() => "format",
            DriverError::Codec(err) if err.is_capacity_error() => "capacity",
            DriverError::Codec(Error::EmptyInput) => "input",
            DriverError::Codec(_) => "io",
        }
    }
}

/// Check that `path` is a readable, non-empty file of at most `limit` bytes.
///
/// Returns the file size.
pub fn validate_input(path: &Path, limit: u64) -> Result<u64, DriverError> {
    let meta = fs::metadata(path).map_err(|source| DriverError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if !meta.is_file() {
        return Err(DriverError::Read {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
        });
    }

    let size = meta.len();
    if size == 0 {
        return Err(DriverError::EmptyFile(path.to_path_buf()));
    }
    if size > limit {
        return Err(DriverError::TooLarge {
            path: path.to_path_buf(),
            size,
            limit,
        });
    }
    Ok(size)
}

/// Default output for `compress`: `<input>.jzip`.
pub fn compressed_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(".");
    name.push(EXTENSION);
    PathBuf::from(name)
}

/// Default output for `decompress`: strip `.jzip`, else append `.out`.
pub fn decompressed_path(input: &Path) -> PathBuf {
    if input.extension().is_some_and(|ext| ext == EXTENSION) {
        return input.with_extension("");
    }
    let mut name = input.as_os_str().to_owned();
    name.push(".out");
    PathBuf::from(name)
}

fn read_file(path: &Path) -> Result<Vec<u8>, DriverError> {
    fs::read(path).map_err(|source| DriverError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, data: &[u8], force: bool) -> Result<(), DriverError> {
    if !force && path.exists() {
        return Err(DriverError::OutputExists(path.to_path_buf()));
    }
    fs::write(path, data).map_err(|source| DriverError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Compress `input` into `output` (default `<input>.jzip`).
pub fn compress_file(
    input: &Path,
    output: Option<&Path>,
    config: &DriverConfig,
    force: bool,
) -> Result<(PathBuf, Report), DriverError> {
    let mut watch = Stopwatch::start();
    let output = output.map_or_else(|| compressed_path(input), Path::to_path_buf);

    validate_input(input, config.max_input_bytes())?;
    watch.lap("validate");

    let data = read_file(input)?;
    watch.lap("read");

    let compressor = HuffmanCompressor::with_config(config.huffman_config());
    let compressed = compressor.compress(&data)?;
    watch.lap("compress");
    if let Some(stats) = compressor.stats() {
        debug!(
            bits_per_symbol = stats.bits_per_symbol(),
            "{}",
            stats.summary()
        );
    }

    write_file(&output, &compressed, force)?;
    watch.lap("write");

    info!(
        input = %input.display(),
        output = %output.display(),
        "compressed {} to {}",
        format_bytes(data.len() as u64),
        format_bytes(compressed.len() as u64)
    );
    Ok((
        output,
        Report::new(data.len() as u64, compressed.len() as u64, &watch),
    ))
}

/// Decompress `input` into `output` (see [`decompressed_path`]).
pub fn decompress_file(
    input: &Path,
    output: Option<&Path>,
    config: &DriverConfig,
    force: bool,
) -> Result<(PathBuf, Report), DriverError> {
    let mut watch = Stopwatch::start();
    let output = output.map_or_else(|| decompressed_path(input), Path::to_path_buf);

    let compressed = read_file(input)?;
    watch.lap("read");

    let decompressor = HuffmanDecompressor::with_config(config.huffman_config());
    let data = decompressor.decompress(&compressed)?;
    watch.lap("decompress");

    write_file(&output, &data, force)?;
    watch.lap("write");

    info!(
        input = %input.display(),
        output = %output.display(),
        "restored {}",
        format_bytes(data.len() as u64)
    );
    Ok((
        output,
        Report::new(data.len() as u64, compressed.len() as u64, &watch),
    ))
}

/// Compress and decompress `input` in memory, stage by stage, and check the
/// result matches.
pub fn roundtrip_file(input: &Path, config: &DriverConfig) -> Result<Report, DriverError> {
    let mut watch = Stopwatch::start();
    let codec = config.huffman_config();
    codec.validate()?;

    validate_input(input, config.max_input_bytes())?;
    watch.lap("validate");

    let data = read_file(input)?;
    watch.lap("read");

    let tree = build_tree(&data)?;
    watch.lap("build_tree");

    let book = tree.codes();
    watch.lap("codes");

    let mut container = Vec::new();
    Header::for_config(&codec).write(&mut container);
    write_dictionary(&book, codec.path_encoding, &mut container)?;
    watch.lap("write_dict");

    container.extend(encode(&data, &book, codec.layout)?);
    watch.lap("encode");

    let (header, mut rest) = Header::parse(&container)?;
    let parsed = read_dict(&mut rest, header.path_encoding)?;
    watch.lap("read_dict");

    if parsed != book {
        return Err(DriverError::Mismatch(
            "dictionary read back differs from the one written".into(),
        ));
    }
    watch.lap("dict_check");

    let decoder = build_decoder(&parsed)?;
    let output = decode(&decoder, rest, header.chunked, codec.tail_policy)?;
    watch.lap("decode");

    if output != data {
        let at = output
            .iter()
            .zip(&data)
            .position(|(a, b)| a != b)
            .unwrap_or(output.len().min(data.len()));
        return Err(DriverError::Mismatch(format!(
            "decoded {} bytes, expected {}; first difference at byte {}",
            output.len(),
            data.len(),
            at
        )));
    }
    watch.lap("verify");

    Ok(Report::new(data.len() as u64, container.len() as u64, &watch))
}
