//! Performance benchmarks for exponential smoothing
//!
//! Compares the direct and FFT convolution paths across response lengths and
//! kernel sizes, to check where the automatic switch-over should sit.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use vbn_processing::{baseline_subtract, BoundaryMode, ConvolutionMethod, ExponentialKernel};

/// Benchmark direct vs FFT convolution
fn bench_convolution_methods(c: &mut Criterion) {
    let mut group = c.benchmark_group("convolution_methods");

    let sizes = [1_000, 10_000, 100_000];
    let taus = [1.0, 6.4, 50.0];

    for &size in &sizes {
        let data: Vec<f64> = (0..size).map(|i| (i as f64 * 0.01).sin()).collect();

        for &tau in &taus {
            let kernel = ExponentialKernel::new(tau, false).unwrap();

            for method in [ConvolutionMethod::Direct, ConvolutionMethod::Fft] {
                let id = format!("{}samples_{}taps", size, kernel.len());
                group.bench_with_input(
                    BenchmarkId::new(method.to_string(), id),
                    &data,
                    |b, data| {
                        b.iter(|| {
                            let smoothed =
                                kernel.apply(black_box(data), BoundaryMode::Zero, method);
                            black_box(smoothed)
                        });
                    },
                );
            }
        }
    }

    group.finish();
}

/// Benchmark kernel construction
fn bench_kernel_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("kernel_construction");

    for &tau in &[1.0, 10.0, 100.0] {
        group.bench_with_input(BenchmarkId::new("exponential", tau), &tau, |b, &tau| {
            b.iter(|| black_box(ExponentialKernel::new(black_box(tau), true)));
        });
    }

    group.finish();
}

/// Benchmark baseline subtraction
fn bench_baseline(c: &mut Criterion) {
    let data: Vec<f64> = (0..100_000).map(|i| (i as f64 * 0.1).cos()).collect();

    c.bench_function("baseline_subtract_100k", |b| {
        b.iter(|| black_box(baseline_subtract(black_box(&data), 0..20)));
    });
}

criterion_group!(
    benches,
    bench_convolution_methods,
    bench_kernel_construction,
    bench_baseline
);
criterion_main!(benches);
