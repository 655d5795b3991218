//! Benchmarks for reel-core time operations.
//!
//! Run with: cargo bench -p reel-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use reel_core::{FrameRate, TimeMark};

fn bench_time_arithmetic(c: &mut Criterion) {
    let a = TimeMark::from_millis(1001);
    let b = TimeMark::from_ticks(41_666);

    c.bench_function("time_mark_add", |bencher| {
        bencher.iter(|| black_box(a) + black_box(b));
    });

    c.bench_function("time_mark_mul_i64", |bencher| {
        bencher.iter(|| black_box(b) * black_box(100));
    });
}

fn bench_frame_rate_conversion(c: &mut Criterion) {
    let rate = FrameRate::FPS_29_97;

    c.bench_function("frame_period_29.97", |bencher| {
        bencher.iter(|| black_box(rate).frame_period());
    });

    c.bench_function("frame_time_86400", |bencher| {
        bencher.iter(|| black_box(rate).frame_time(black_box(86_400)));
    });
}

fn bench_sample_conversion(c: &mut Criterion) {
    c.bench_function("from_samples_1024", |bencher| {
        bencher.iter(|| TimeMark::from_samples(black_box(1024), black_box(48_000)));
    });

    c.bench_function("to_samples_1hr", |bencher| {
        bencher.iter(|| black_box(TimeMark::from_secs(3600)).to_samples(black_box(48_000)));
    });
}

criterion_group!(
    benches,
    bench_time_arithmetic,
    bench_frame_rate_conversion,
    bench_sample_conversion,
);
criterion_main!(benches);
