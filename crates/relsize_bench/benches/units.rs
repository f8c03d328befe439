//! Unit conversion benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use relsize_core::{parse_size, pretty_size, pretty_size_decimal, Decimal};

/// Generate byte counts spread across all unit ranges.
fn random_sizes(count: usize) -> Vec<i64> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            let shift = rng.gen_range(0..62);
            rng.gen_range(0..=(1_i64 << shift))
        })
        .collect()
}

/// Benchmark integer formatting at each unit boundary.
fn bench_pretty_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("pretty_size");

    for bytes in [
        10_239_i64,
        10_240,
        10_485_760,
        10_737_418_240,
        10_995_116_277_760,
        i64::MAX,
    ]
    .iter()
    {
        group.bench_with_input(BenchmarkId::from_parameter(bytes), bytes, |b, &bytes| {
            b.iter(|| pretty_size(black_box(bytes)));
        });
    }
    group.finish();
}

/// Benchmark both formatting backends over mixed magnitudes.
fn bench_backends(c: &mut Criterion) {
    let sizes = random_sizes(1024);
    let decimals: Vec<Decimal> = sizes.iter().map(|&size| Decimal::from(size)).collect();

    let mut group = c.benchmark_group("format_backends");
    group.throughput(Throughput::Elements(sizes.len() as u64));

    group.bench_function("i64", |b| {
        b.iter(|| {
            for &size in &sizes {
                black_box(pretty_size(black_box(size)));
            }
        });
    });
    group.bench_function("decimal", |b| {
        b.iter(|| {
            for size in &decimals {
                black_box(pretty_size_decimal(black_box(size)));
            }
        });
    });
    group.finish();
}

/// Benchmark parsing across input shapes.
fn bench_parse_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_size");

    for input in ["0", "10240", "512 MB", "1.5 GB", "-2.25e3 kB"].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(input), input, |b, input| {
            b.iter(|| parse_size(black_box(input)).unwrap());
        });
    }
    group.finish();
}

/// Benchmark decimal parsing, plain and exponent-heavy.
fn bench_decimal_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("decimal_parse");

    for input in ["10240", "123456.789012", "9.1e12", "1e-300"].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(input), input, |b, input| {
            b.iter(|| input.parse::<Decimal>().unwrap());
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_pretty_size,
    bench_backends,
    bench_parse_size,
    bench_decimal_parse,
);

criterion_main!(benches);
