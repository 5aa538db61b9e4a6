//! Benchmark – `bootcore::TextBuilder` and `bootcore::LineScanner`
#![allow(missing_docs)]

use std::time::Duration;

use bootcore::{BuilderOptions, LineScanner, TextBuilder};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

/// Appends `count` integers, each followed by a comma.
fn build_integers(count: i64, options: BuilderOptions) -> usize {
    let mut builder = TextBuilder::with_options(options);
    for i in 0..count {
        builder.append(i).unwrap().append(',').unwrap();
    }
    builder.len()
}

/// `lines` lines of `width` bytes each.
fn make_lines(lines: usize, width: usize) -> Vec<u8> {
    let mut text = Vec::with_capacity(lines * (width + 1));
    for _ in 0..lines {
        text.extend(std::iter::repeat_n(b'x', width));
        text.push(b'\n');
    }
    text
}

fn bench_builder(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_builder_integers");
    for &count in &[100i64, 1_000, 10_000] {
        // 7 bytes is enough for every integer below 10_000 and its comma.
        let fixed = BuilderOptions {
            capacity: usize::try_from(count).unwrap() * 7,
            growable: false,
        };
        let growable = BuilderOptions {
            capacity: 16,
            growable: true,
        };
        for (name, options) in [("fixed", fixed), ("growable", growable)] {
            group.bench_with_input(BenchmarkId::new(name, count), &count, |b, &n| {
                b.iter(|| black_box(build_integers(black_box(n), options)));
            });
        }
    }
    group.finish();
}

fn bench_scanner(c: &mut Criterion) {
    let mut group = c.benchmark_group("line_scanner");
    for &width in &[8usize, 80, 800] {
        let text = make_lines(10_000 / (width / 8), width);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(width), &text, |b, text| {
            b.iter(|| {
                let mut scanner = LineScanner::new(black_box(text.as_slice()));
                black_box(scanner.lines().count())
            });
        });
    }
    group.finish();
}

fn criterion() -> Criterion {
    let mut c = Criterion::default();
    if cfg!(feature = "bench-fast") {
        c = c
            .warm_up_time(Duration::from_millis(10))
            .measurement_time(Duration::from_millis(100))
            .sample_size(10);
    } else {
        c = c
            .warm_up_time(Duration::from_secs(3))
            .measurement_time(Duration::from_secs(5));
    }
    c
}

criterion_group! { name = benches; config = criterion(); targets = bench_builder, bench_scanner }
criterion_main!(benches);
