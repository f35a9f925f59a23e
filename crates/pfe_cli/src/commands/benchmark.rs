//! Benchmark command implementation
//!
//! Convergence of the classical estimator through `pfe_risk`.

use pfe_kernel::rng::resolve_seed;
use pfe_risk::{BenchmarkDriver, BenchmarkReport};
use serde::Serialize;
use tracing::info;

use crate::config::CliConfig;
use crate::output::{emit, num, OutputFormat, Table};
use crate::Result;

#[derive(Debug, Serialize)]
struct BenchmarkOutput {
    #[serde(flatten)]
    report: BenchmarkReport,
    seed: u64,
    convergence_slope: Option<f64>,
}

/// Run the benchmark command
pub fn run(config: &CliConfig, format: OutputFormat) -> Result<()> {
    let spec = config.portfolio.to_spec();
    let seed = resolve_seed(config.seed);
    let b = &config.benchmark;

    let driver = BenchmarkDriver::new()
        .with_antithetic(config.classical.antithetic)
        .with_parallel(b.parallel);

    info!(
        sizes = ?b.sample_sizes,
        reference_samples = b.reference_samples,
        seed,
        "running convergence benchmark"
    );
    let result = driver.run(&spec, &b.sample_sizes, b.reference_samples, seed)?;

    let output = BenchmarkOutput {
        report: BenchmarkReport::from(&result),
        seed,
        convergence_slope: result.convergence_slope(),
    };
    emit(format, &output, || table(&output))
}

fn table(output: &BenchmarkOutput) -> Table {
    let r = &output.report;
    let mut table = Table::new(&["Samples", "PFE", "|Error|", "Runtime (ms)"]);
    let rows = r
        .sample_sizes
        .iter()
        .zip(&r.pfe_values)
        .zip(&r.errors)
        .zip(&r.runtimes_ms);
    for (((n, pfe), err), ms) in rows {
        table.push_row(vec![n.to_string(), num(*pfe), num(*err), format!("{:.3}", ms)]);
    }
    table.push_row(vec![
        format!("ref {}", r.reference_samples),
        num(r.reference_pfe),
        String::new(),
        format!("{:.3}", r.total_runtime_ms),
    ]);
    table.push_row(vec![
        "slope".to_string(),
        output
            .convergence_slope
            .map(|s| format!("{:.3}", s))
            .unwrap_or_else(|| "n/a".to_string()),
        String::new(),
        format!("seed {}", output.seed),
    ]);
    table
}
