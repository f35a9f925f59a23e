//! Profile command implementation
//!
//! EE/PFE over a time grid and unilateral CVA through `pfe_risk`.

use pfe_kernel::rng::resolve_seed;
use pfe_risk::{CreditParams, ExposureProfile};
use serde::Serialize;
use tracing::info;

use crate::config::CliConfig;
use crate::output::{emit, num, OutputFormat, Table};
use crate::Result;

#[derive(Debug, Serialize)]
struct ProfileOutput {
    #[serde(flatten)]
    profile: ExposureProfile,
    peak_pfe: f64,
    epe: f64,
    effective_epe: f64,
    credit: CreditParams,
    cva: f64,
}

/// Run the profile command
pub fn run(config: &CliConfig, format: OutputFormat) -> Result<()> {
    let spec = config.portfolio.to_spec();
    let seed = resolve_seed(config.seed);
    let credit = CreditParams::new(config.credit.hazard_rate, config.credit.lgd)?;

    let profile = ExposureProfile::simulate(
        &spec,
        &config.profile.time_grid,
        config.profile.num_samples,
        config.classical.antithetic,
        seed,
    )?;
    let cva = profile.cva(&credit)?;
    info!(points = profile.time_grid.len(), cva, seed, "exposure profile complete");

    let output = ProfileOutput {
        peak_pfe: profile.peak_pfe(),
        epe: profile.expected_positive_exposure(),
        effective_epe: profile.effective_epe(),
        profile,
        credit,
        cva,
    };
    emit(format, &output, || table(&output))
}

fn table(output: &ProfileOutput) -> Table {
    let p = &output.profile;
    let mut table = Table::new(&["t (years)", "EE", "PFE"]);
    for ((t, ee), pfe) in p.time_grid.iter().zip(&p.ee).zip(&p.pfe) {
        table.push_row(vec![format!("{:.4}", t), num(*ee), num(*pfe)]);
    }
    for (label, value) in [
        ("peak PFE", output.peak_pfe),
        ("EPE", output.epe),
        ("effective EPE", output.effective_epe),
        ("CVA", output.cva),
    ] {
        table.push_row(vec![label.to_string(), num(value), String::new()]);
    }
    table
}
