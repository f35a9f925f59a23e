//! Criterion benchmarks for the risk analytics.
//!
//! Benchmarks cover:
//! - Convergence driver, sequential vs rayon pool
//! - Exposure profile by grid length

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pfe_core::types::PortfolioSpec;
use pfe_risk::{BenchmarkDriver, CreditParams, ExposureProfile};

fn bench_convergence_driver(c: &mut Criterion) {
    let mut group = c.benchmark_group("convergence_driver");
    group.sample_size(10);

    let spec = PortfolioSpec::default();
    let sizes = [1_000, 3_000, 10_000, 30_000];

    for parallel in [false, true] {
        let driver = BenchmarkDriver::new().with_parallel(parallel);
        let label = if parallel { "parallel" } else { "sequential" };
        group.bench_with_input(BenchmarkId::new(label, sizes.len()), &driver, |b, d| {
            b.iter(|| black_box(d.run(&spec, &sizes, 100_000, 42).unwrap()))
        });
    }

    group.finish();
}

fn bench_exposure_profile(c: &mut Criterion) {
    let mut group = c.benchmark_group("exposure_profile");
    group.sample_size(20);

    let spec = PortfolioSpec::default();
    let credit = CreditParams::new(0.02, 0.6).unwrap();

    for n_points in [4, 12, 52] {
        let grid: Vec<f64> = (1..=n_points).map(|i| i as f64 / n_points as f64).collect();
        group.bench_with_input(BenchmarkId::new("ee_pfe_cva", n_points), &grid, |b, g| {
            b.iter(|| {
                let profile = ExposureProfile::simulate(&spec, g, 10_000, true, 42).unwrap();
                black_box(profile.cva(&credit).unwrap())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_convergence_driver, bench_exposure_profile);
criterion_main!(benches);
