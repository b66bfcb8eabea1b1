//! Benchmark for the random source and value noise.
//!
//! TARGET: 1,000,000 samples per second
//!
//! Run with: cargo bench --package archipelago_procedural --bench noise_benchmark

use archipelago_procedural::noise::{noise2d, rand, DrawStream, WorldSeed};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

fn benchmark_single_rand(c: &mut Criterion) {
    c.bench_function("single_rand_sample", |b| {
        let mut x = 0.0f64;
        b.iter(|| {
            x += 1.0;
            black_box(rand(black_box(x), black_box(x * 0.7), 42.0))
        });
    });
}

fn benchmark_million_noise_samples(c: &mut Criterion) {
    let mut group = c.benchmark_group("million_samples");
    group.throughput(Throughput::Elements(1_000_000));
    group.sample_size(10);

    group.bench_function("1M_noise2d_samples", |b| {
        b.iter(|| {
            for i in 0..1_000_000u32 {
                let x = f64::from(i % 1000);
                let y = f64::from(i / 1000);
                black_box(noise2d(x, y, 42.0, 0.08));
            }
        });
    });

    group.finish();
}

fn benchmark_draw_stream(c: &mut Criterion) {
    c.bench_function("draw_stream_64_draws", |b| {
        let mut chunk_x = 0i32;
        b.iter(|| {
            chunk_x = chunk_x.wrapping_add(1);
            let mut stream = DrawStream::new(chunk_x, -chunk_x, 1, WorldSeed::new(42.0));
            for _ in 0..64 {
                black_box(stream.next_f64());
            }
        });
    });
}

criterion_group!(
    benches,
    benchmark_single_rand,
    benchmark_million_noise_samples,
    benchmark_draw_stream
);
criterion_main!(benches);
