//! Profiler performance benchmarks.
//!
//! Measures streaming profile throughput, type inference, and the cost of
//! bounded distinct tracking.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use assay::{infer_type, Parser, ProfilerConfig, QualityEngine, StreamProfiler};

/// Generate synthetic CSV data with the specified number of rows and columns.
fn generate_csv_data(rows: usize, cols: usize) -> String {
    let mut data = String::new();

    let header: Vec<String> = (0..cols).map(|i| format!("column_{}", i + 1)).collect();
    data.push_str(&header.join(","));
    data.push('\n');

    for row in 0..rows {
        let cells: Vec<String> = (0..cols)
            .map(|col| match col % 5 {
                0 => format!("{}", row),
                1 => format!("{:.2}", row as f64 * 1.5),
                2 => format!("2023-{:02}-{:02}", (row % 12) + 1, (row % 28) + 1),
                3 => (if row % 2 == 0 { "true" } else { "false" }).to_string(),
                _ => format!("Category_{}", row % 10),
            })
            .collect();
        data.push_str(&cells.join(","));
        data.push('\n');
    }

    data
}

fn bench_profile(c: &mut Criterion) {
    let mut group = c.benchmark_group("profile_csv");

    for rows in [1_000, 10_000, 100_000] {
        let data = generate_csv_data(rows, 10);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &data, |b, data| {
            let parser = Parser::new();
            let profiler = StreamProfiler::new();
            b.iter(|| {
                let stream = parser.stream_bytes(data.as_bytes()).unwrap();
                black_box(profiler.profile(stream).unwrap())
            });
        });
    }

    group.finish();
}

fn bench_bounded_distinct(c: &mut Criterion) {
    let data = generate_csv_data(100_000, 5);
    let mut group = c.benchmark_group("distinct_tracking");
    group.throughput(Throughput::Elements(100_000));

    for (label, limit) in [("exact", None), ("kmv_1024", Some(1024))] {
        group.bench_function(label, |b| {
            let parser = Parser::new();
            let profiler = StreamProfiler::with_config(ProfilerConfig {
                max_exact_distinct: limit,
            });
            b.iter(|| {
                let stream = parser.stream_bytes(data.as_bytes()).unwrap();
                black_box(profiler.profile(stream).unwrap())
            });
        });
    }

    group.finish();
}

fn bench_inference(c: &mut Criterion) {
    let values = [
        "42", "-3.5e2", "2024-01-15", "01/15/2024", "2024-01-15T08:30:00Z", "TRUE", "hello",
        "",
    ];

    c.bench_function("infer_type_mixed", |b| {
        b.iter(|| {
            for v in &values {
                black_box(infer_type(black_box(v)));
            }
        })
    });
}

fn bench_quality_check(c: &mut Criterion) {
    let data = generate_csv_data(1_000, 50);
    let stream = Parser::new().stream_bytes(data.as_bytes()).unwrap();
    let profile = StreamProfiler::new().profile(stream).unwrap();
    let engine = QualityEngine::new();

    c.bench_function("quality_check_50_columns", |b| {
        b.iter(|| black_box(engine.check(black_box(&profile))))
    });
}

criterion_group!(
    benches,
    bench_profile,
    bench_bounded_distinct,
    bench_inference,
    bench_quality_check
);
criterion_main!(benches);
