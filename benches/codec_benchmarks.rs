//! Codec Benchmarks
//!
//! ## Benchmark Groups
//!
//! - `encode/*`: Records to stream, header derivation included
//! - `decode/*`: Stream to records, full validation included
//! - `lookup/*`: First-match name lookup on a decoded file
//!
//! ## Record Shapes
//!
//! - `scalars_N`: N small `u32` records (per-record overhead dominates)
//! - `arrays_N`: N `f32` arrays of 1024 elements (copy throughput dominates)
//!
//! ## Running
//!
//! ```bash
//! cargo bench --bench codec_benchmarks
//! cargo bench --bench codec_benchmarks -- "decode"  # specific group
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hvf::{decode, encode, Endian, Record, VirtualFile};
use std::time::Duration;

// =============================================================================
// Fixtures - All allocation happens here, outside timed loops
// =============================================================================

fn scalar_records(count: usize, endian: Endian) -> Vec<Record> {
    (0..count)
        .map(|i| Record::u32(format!("scalar_{i:06}"), i as u32, endian))
        .collect()
}

fn array_records(count: usize, endian: Endian) -> Vec<Record> {
    let values: Vec<f32> = (0..1024).map(|i| i as f32 * 0.25).collect();
    (0..count)
        .map(|i| Record::f32_array(format!("array_{i:06}"), &values, endian))
        .collect()
}

fn shapes() -> Vec<(String, Vec<Record>)> {
    let mut shapes = Vec::new();
    for count in [10, 1_000] {
        shapes.push((format!("scalars_{count}"), scalar_records(count, Endian::Little)));
    }
    for count in [1, 64] {
        shapes.push((format!("arrays_{count}"), array_records(count, Endian::Little)));
    }
    shapes
}

// =============================================================================
// Benchmarks
// =============================================================================

fn encode_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    for (label, records) in shapes() {
        let size = encode(&records, Endian::Little).map(|b| b.len()).unwrap_or(0);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(&label), &records, |b, records| {
            b.iter(|| encode(black_box(records), Endian::Little))
        });
    }
    group.finish();
}

fn decode_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    for (label, records) in shapes() {
        let Ok(bytes) = encode(&records, Endian::Big) else {
            continue;
        };
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(&label), &bytes, |b, bytes| {
            b.iter(|| decode(black_box(bytes)))
        });
    }
    group.finish();
}

fn lookup_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");
    let vf: VirtualFile = scalar_records(1_000, Endian::Little).into_iter().collect();

    group.bench_function("first", |b| b.iter(|| vf.item_index(black_box("scalar_000000"))));
    group.bench_function("last", |b| b.iter(|| vf.item_index(black_box("scalar_000999"))));
    group.bench_function("miss", |b| b.iter(|| vf.item_index(black_box("absent"))));
    group.finish();
}

criterion_group!(
    name = codec;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(5))
        .sample_size(50);
    targets = encode_benchmarks, decode_benchmarks, lookup_benchmarks
);

criterion_main!(codec);
