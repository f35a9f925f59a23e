//! Quantum command implementation
//!
//! Discretized PFE through `pfe_quantum` with the simulated amplitude
//! estimator.

use pfe_quantum::QuantumPfeReport;
use tracing::info;

use crate::config::CliConfig;
use crate::output::{emit, num, OutputFormat, Table};
use crate::Result;

/// Run the quantum command
pub fn run(config: &CliConfig, format: OutputFormat) -> Result<()> {
    let spec = config.portfolio.to_spec();
    let q = &config.quantum;

    info!(
        num_qubits = q.num_qubits,
        ae_iterations = q.ae_iterations,
        "running quantum-path estimator"
    );
    let report = QuantumPfeReport::run(&spec, q.num_qubits, q.ae_iterations, config.seed)?;

    emit(format, &report, || table(&report))
}

fn table(report: &QuantumPfeReport) -> Table {
    let s = &report.summary;
    Table::key_value([
        ("pfe", num(s.pfe)),
        ("exact_discretized_pfe", num(s.exact_discretized_pfe)),
        ("expected_exposure", num(s.expected_exposure)),
        ("alpha", s.alpha.to_string()),
        ("num_qubits", s.num_qubits.to_string()),
        ("ae_iterations", s.ae_iterations.to_string()),
        ("discretization_bins", s.discretization_bins.to_string()),
        ("achieved_probability", num(s.achieved_probability)),
        ("oracle_calls", s.oracle_calls.to_string()),
        ("error_bound", num(s.error_bound)),
        ("seed", s.seed.to_string()),
        ("runtime_ms", format!("{:.3}", report.runtime_ms)),
    ])
}
