//! File-level tests for the jzip driver.

use std::fs;
use std::path::Path;

use jzip::config::DriverConfig;
use jzip::driver::{
    compress_file, compressed_path, decompress_file, decompressed_path, roundtrip_file,
    validate_input, DriverError,
};
use tempfile::tempdir;

const TEXT: &[u8] = b"Peter Piper picked a peck of pickled peppers. \
    A peck of pickled peppers Peter Piper picked.\n";

fn write(path: &Path, data: &[u8]) {
    fs::write(path, data).unwrap();
}

#[test]
fn test_compress_then_decompress_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("peppers.txt");
    let data = TEXT.repeat(50);
    write(&input, &data);

    let config = DriverConfig::default();
    let (packed, report) = compress_file(&input, None, &config, false).unwrap();
    assert_eq!(packed, dir.path().join("peppers.txt.jzip"));
    assert_eq!(report.original_size, data.len() as u64);
    assert_eq!(report.compressed_size, fs::metadata(&packed).unwrap().len());
    assert!(report.compressed_size < report.original_size);

    let restored = dir.path().join("restored.txt");
    let (written, _) = decompress_file(&packed, Some(&restored), &config, false).unwrap();
    assert_eq!(written, restored);
    assert_eq!(fs::read(&restored).unwrap(), data);
}

#[test]
fn test_chunked_text_paths_file_roundtrip() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("data.bin");
    let data: Vec<u8> = (0..20_000u32).map(|i| (i % 251) as u8 ^ (i / 97) as u8).collect();
    write(&input, &data);

    let config = DriverConfig {
        chunked: true,
        chunk_size: 512,
        text_paths: true,
        ..DriverConfig::default()
    };
    let (packed, _) = compress_file(&input, None, &config, false).unwrap();

    // Decompression reads the layout from the container.
    let out = dir.path().join("data.out");
    decompress_file(&packed, Some(&out), &DriverConfig::default(), false).unwrap();
    assert_eq!(fs::read(&out).unwrap(), data);
}

#[test]
fn test_roundtrip_reports_stages() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("peppers.txt");
    write(&input, &TEXT.repeat(10));

    let report = roundtrip_file(&input, &DriverConfig::default()).unwrap();
    let stages: Vec<_> = report.stages.iter().map(|(name, _)| *name).collect();
    assert_eq!(stages.first(), Some(&"validate"));
    assert_eq!(stages.last(), Some(&"verify"));
    assert!(stages.contains(&"build_tree"));
    assert!(stages.contains(&"decode"));
    assert!(report.to_string().contains("Ratio:"));
}

#[test]
fn test_empty_file_rejected() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("empty");
    write(&input, b"");

    let err = validate_input(&input, 100).unwrap_err();
    assert!(matches!(err, DriverError::EmptyFile(_)));

    let err = compress_file(&input, None, &DriverConfig::default(), false).unwrap_err();
    assert!(matches!(err, DriverError::EmptyFile(_)));
}

#[test]
fn test_too_large_rejected() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("big");
    write(&input, &[7u8; 2048]);

    assert_eq!(validate_input(&input, 2048).unwrap(), 2048);
    let err = validate_input(&input, 2047).unwrap_err();
    assert!(matches!(
        err,
        DriverError::TooLarge {
            size: 2048,
            limit: 2047,
            ..
        }
    ));
}

#[test]
fn test_missing_file_rejected() {
    let dir = tempdir().unwrap();
    let err = validate_input(&dir.path().join("nope"), 100).unwrap_err();
    assert!(matches!(err, DriverError::Read { .. }));

    let err = validate_input(dir.path(), 100).unwrap_err();
    assert!(matches!(err, DriverError::Read { .. }));
}

#[test]
fn test_existing_output_needs_force() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("peppers.txt");
    write(&input, TEXT);
    let target = dir.path().join("peppers.txt.jzip");
    write(&target, b"keep me");

    let config = DriverConfig::default();
    let err = compress_file(&input, None, &config, false).unwrap_err();
    assert!(matches!(err, DriverError::OutputExists(_)));
    assert_eq!(fs::read(&target).unwrap(), b"keep me");

    compress_file(&input, None, &config, true).unwrap();
    assert_ne!(fs::read(&target).unwrap(), b"keep me");
}

#[test]
fn test_corrupt_container_reports_codec_error() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("junk.jzip");
    write(&input, b"not a jzip container");

    let err = decompress_file(&input, None, &DriverConfig::default(), false).unwrap_err();
    assert_eq!(err.kind(), "format");
    assert_eq!(err.category(), "corrupted_data");
    match err {
        DriverError::Codec(inner) => assert!(inner.is_format_error()),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_error_kinds() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("peppers.txt");
    write(&input, TEXT);

    let config = DriverConfig {
        chunked: true,
        chunk_size: 8,
        ..DriverConfig::default()
    };
    let err = compress_file(&input, None, &config, false).unwrap_err();
    assert_eq!(err.kind(), "capacity");
    assert_eq!(err.category(), "invalid_chunk_size");

    let empty = dir.path().join("empty");
    write(&empty, b"");
    let err = roundtrip_file(&empty, &DriverConfig::default()).unwrap_err();
    assert_eq!(err.kind(), "input");
    assert_eq!(err.category(), "empty_file");

    let err = validate_input(&dir.path().join("nope"), 100).unwrap_err();
    assert_eq!(err.kind(), "io");
    assert_eq!(err.category(), "read_failed");
}

#[test]
fn test_default_output_names() {
    assert_eq!(
        compressed_path(Path::new("dir/a.txt")),
        Path::new("dir/a.txt.jzip")
    );
    assert_eq!(
        decompressed_path(Path::new("dir/a.txt.jzip")),
        Path::new("dir/a.txt")
    );
    assert_eq!(
        decompressed_path(Path::new("dir/a.bin")),
        Path::new("dir/a.bin.out")
    );
}

#[test]
fn test_config_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("jzip.json");
    write(&path, br#"{"max_input_mb": 1, "lenient": true}"#);

    let config = DriverConfig::load(Some(&path)).unwrap();
    assert_eq!(config.max_input_bytes(), 1_000_000);
    assert!(config.lenient);
    assert!(!config.chunked);

    write(&path, b"{ not json");
    let err = DriverConfig::load(Some(&path)).unwrap_err();
    assert!(matches!(err, DriverError::Config { .. }));
}
