//! Benchmarks for Huffman compression.
//!
//! Run with: `cargo bench -p jzip-huffman` (add `--features parallel` for the
//! rayon chunk decoder)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use jzip_core::{BodyLayout, Codec, Compressor, Decompressor, TailPolicy};
use jzip_huffman::{build_decoder, build_tree, decode, encode, HuffmanCodec, HuffmanConfig};

/// Generate English-like text with a skewed byte distribution.
fn generate_text(size: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(42);
    let words: &[&[u8]] = &[
        b"the ", b"of ", b"and ", b"to ", b"in ", b"compression ", b"huffman ", b"tree ",
        b"symbol ", b"frequency ", b"bit ", b"stream ", b"dictionary ", b"\n",
    ];
    let mut data = Vec::with_capacity(size + 16);
    while data.len() < size {
        data.extend_from_slice(words[rng.gen_range(0..words.len())]);
    }
    data.truncate(size);
    data
}

/// Generate bytes where a few values dominate, giving long tail codes.
fn generate_skewed(size: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..size)
        .map(|_| {
            if rng.gen_bool(0.9) {
                rng.gen_range(0..4)
            } else {
                rng.gen::<u8>()
            }
        })
        .collect()
}

fn bench_build_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("huffman_build_tree");

    for size in [4 * 1024, 64 * 1024, 1024 * 1024] {
        let data = generate_text(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}KB", size / 1024)),
            &data,
            |b, data| b.iter(|| build_tree(black_box(data)).unwrap().codes()),
        );
    }

    group.finish();
}

fn bench_compress(c: &mut Criterion) {
    let mut group = c.benchmark_group("huffman_compress");

    for size in [64 * 1024, 1024 * 1024] {
        for (name, data) in [("text", generate_text(size)), ("skewed", generate_skewed(size))] {
            let codec = HuffmanCodec::new();
            group.throughput(Throughput::Bytes(size as u64));
            group.bench_with_input(
                BenchmarkId::new(name, format!("{}KB", size / 1024)),
                &data,
                |b, data| b.iter(|| codec.compress(black_box(data)).unwrap()),
            );
        }
    }

    group.finish();
}

fn bench_decompress(c: &mut Criterion) {
    let mut group = c.benchmark_group("huffman_decompress");

    let size = 1024 * 1024;
    for (name, data) in [("text", generate_text(size)), ("skewed", generate_skewed(size))] {
        for (layout_name, config) in [
            ("contiguous", HuffmanConfig::new()),
            ("chunked", HuffmanConfig::new().with_layout(BodyLayout::chunked())),
        ] {
            let codec = HuffmanCodec::with_config(config);
            let compressed = codec.compress(&data).unwrap();

            group.throughput(Throughput::Bytes(size as u64));
            group.bench_with_input(
                BenchmarkId::new(name, layout_name),
                &compressed,
                |b, compressed| b.iter(|| codec.decompress(black_box(compressed)).unwrap()),
            );
        }
    }

    group.finish();
}

fn bench_decode_body(c: &mut Criterion) {
    let mut group = c.benchmark_group("huffman_decode_body");

    let size = 256 * 1024;
    let data = generate_skewed(size);
    let book = build_tree(&data).unwrap().codes();
    let decoder = build_decoder(&book).unwrap();
    let body = encode(&data, &book, BodyLayout::Contiguous).unwrap();

    group.throughput(Throughput::Bytes(size as u64));
    group.bench_function("skewed_256KB", |b| {
        b.iter(|| decode(&decoder, black_box(&body), false, TailPolicy::Strict).unwrap())
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_build_tree,
    bench_compress,
    bench_decompress,
    bench_decode_body,
);
criterion_main!(benches);
