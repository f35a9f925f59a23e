//! Compare command implementation
//!
//! Runs the classical estimator, the exact discretized search and the
//! simulated quantum search on one spec with one seed.

use pfe_kernel::mc::SimulationConfig;
use pfe_kernel::rng::resolve_seed;
use pfe_kernel::ClassicalPfeReport;
use pfe_quantum::QuantumPfeReport;
use serde::Serialize;
use tracing::info;

use crate::config::CliConfig;
use crate::output::{emit, num, OutputFormat, Table};
use crate::Result;

/// Side-by-side results with differences to the classical PFE.
#[derive(Debug, Serialize)]
pub struct Comparison {
    pub seed: u64,
    pub classical: ClassicalPfeReport,
    pub quantum: QuantumPfeReport,
    /// Exact discretized PFE minus classical PFE.
    pub discretization_error: f64,
    /// Simulated quantum PFE minus exact discretized PFE.
    pub estimation_error: f64,
}

impl Comparison {
    fn new(seed: u64, classical: ClassicalPfeReport, quantum: QuantumPfeReport) -> Self {
        let discretization_error = quantum.summary.exact_discretized_pfe - classical.summary.pfe;
        let estimation_error = quantum.summary.pfe - quantum.summary.exact_discretized_pfe;
        Self {
            seed,
            classical,
            quantum,
            discretization_error,
            estimation_error,
        }
    }
}

/// Run the compare command
pub fn run(config: &CliConfig, format: OutputFormat) -> Result<()> {
    let spec = config.portfolio.to_spec();
    let seed = resolve_seed(config.seed);

    let simulation = SimulationConfig::builder()
        .num_samples(config.classical.num_samples)
        .antithetic(config.classical.antithetic)
        .seed(seed)
        .build()?;
    let classical = ClassicalPfeReport::run(&spec, &simulation)?;
    let quantum = QuantumPfeReport::run(
        &spec,
        config.quantum.num_qubits,
        config.quantum.ae_iterations,
        Some(seed),
    )?;

    let comparison = Comparison::new(seed, classical, quantum);
    info!(
        seed,
        discretization_error = comparison.discretization_error,
        estimation_error = comparison.estimation_error,
        "comparison complete"
    );

    emit(format, &comparison, || table(&comparison))
}

fn table(c: &Comparison) -> Table {
    let classical = &c.classical.summary;
    let quantum = &c.quantum.summary;

    let mut table = Table::new(&["Method", "PFE", "EE", "Detail", "Runtime (ms)"]);
    table.push_row(vec![
        "classical MC".to_string(),
        num(classical.pfe),
        num(classical.expected_exposure),
        format!("{} samples", classical.samples_used),
        format!("{:.3}", c.classical.runtime_ms),
    ]);
    table.push_row(vec![
        "exact discretized".to_string(),
        num(quantum.exact_discretized_pfe),
        num(quantum.expected_exposure),
        format!("{} bins", quantum.discretization_bins),
        String::new(),
    ]);
    table.push_row(vec![
        "simulated QAE".to_string(),
        num(quantum.pfe),
        num(quantum.expected_exposure),
        format!("{} oracle calls", quantum.oracle_calls),
        format!("{:.3}", c.quantum.runtime_ms),
    ]);
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use pfe_core::types::PortfolioSpec;

    #[test]
    fn test_comparison_errors() {
        let spec = PortfolioSpec::default();
        let simulation = SimulationConfig::builder()
            .num_samples(20_000)
            .seed(42)
            .build()
            .unwrap();
        let classical = ClassicalPfeReport::run(&spec, &simulation).unwrap();
        let quantum = QuantumPfeReport::run(&spec, 7, 10, Some(42)).unwrap();

        let c = Comparison::new(42, classical, quantum);
        let total = c.quantum.summary.pfe - c.classical.summary.pfe;
        assert!((c.discretization_error + c.estimation_error - total).abs() < 1e-12);
        assert!(c.discretization_error.abs() < 0.05);
        assert_eq!(table(&c).render().lines().count(), 7);
    }
}
