//! Criterion benchmarks for discretization and quantile search.
//!
//! Benchmarks cover:
//! - Analytic discretization at 2^3 to 2^10 bins
//! - Bisection with the exact oracle
//! - Bisection with the simulated amplitude estimator at several precisions

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pfe_core::types::PortfolioSpec;
use pfe_quantum::{discretize, exact_quantile, find_quantile, SimulatedAmplitudeEstimator};

fn bench_discretize(c: &mut Criterion) {
    let mut group = c.benchmark_group("discretize");
    let spec = PortfolioSpec::default();

    for n in [3u32, 5, 8, 10] {
        group.bench_with_input(BenchmarkId::new("analytic", 1usize << n), &n, |b, &n| {
            b.iter(|| black_box(discretize(&spec, 1usize << n)))
        });
    }

    group.finish();
}

fn bench_quantile_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("quantile_search");
    let spec = PortfolioSpec::default();
    let dist = discretize(&spec, 1024).unwrap();

    group.bench_function("exact_1024", |b| {
        b.iter(|| black_box(exact_quantile(&dist, spec.alpha)))
    });

    for ae in [4u32, 8, 12] {
        group.bench_with_input(BenchmarkId::new("simulated_ae", ae), &ae, |b, &ae| {
            b.iter(|| {
                let mut oracle = SimulatedAmplitudeEstimator::new(&dist, ae, 42).unwrap();
                black_box(find_quantile(&dist, spec.alpha, &mut oracle))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_discretize, bench_quantile_search);
criterion_main!(benches);
