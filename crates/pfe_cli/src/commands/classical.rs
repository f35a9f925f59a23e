//! Classical command implementation
//!
//! Monte Carlo EE and PFE through `pfe_kernel`.

use pfe_kernel::mc::SimulationConfig;
use pfe_kernel::ClassicalPfeReport;
use tracing::info;

use crate::config::CliConfig;
use crate::output::{emit, num, OutputFormat, Table};
use crate::Result;

/// Run the classical command
pub fn run(config: &CliConfig, format: OutputFormat) -> Result<()> {
    let spec = config.portfolio.to_spec();
    let simulation = SimulationConfig::builder()
        .num_samples(config.classical.num_samples)
        .antithetic(config.classical.antithetic)
        .maybe_seed(config.seed)
        .build()?;

    info!(
        num_samples = simulation.num_samples(),
        antithetic = simulation.antithetic(),
        "running classical estimator"
    );
    let report = ClassicalPfeReport::run(&spec, &simulation)?;
    info!(
        pfe = report.summary.pfe,
        seed = report.summary.seed,
        runtime_ms = report.runtime_ms,
        "classical estimate complete"
    );

    emit(format, &report, || table(&report))
}

fn table(report: &ClassicalPfeReport) -> Table {
    let s = &report.summary;
    Table::key_value([
        ("expected_exposure", num(s.expected_exposure)),
        ("pfe", num(s.pfe)),
        ("alpha", s.alpha.to_string()),
        ("sample_std", num(s.sample_std)),
        ("std_error", num(s.std_error)),
        ("samples_used", s.samples_used.to_string()),
        ("variance_reduction", s.variance_reduction.to_string()),
        ("seed", s.seed.to_string()),
        ("runtime_ms", format!("{:.3}", report.runtime_ms)),
    ])
}
