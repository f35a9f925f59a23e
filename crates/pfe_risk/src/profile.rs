//! Exposure profiles over a time grid.
//!
//! One set of standard normal draws is mapped to every grid time under the
//! additive model `S(t) = s0 + μt + σ√t·Z`, so the profile is smooth in `t`
//! and cheap to extend. Per-time statistics are computed on the rayon pool.

use pfe_core::math::statistics::{empirical_quantile, mean};
use pfe_core::types::{PfeError, PortfolioSpec, Result};
use pfe_kernel::mc::{evaluate, ScenarioBatch, StandardNormalPairs};
use pfe_kernel::rng::ScenarioRng;
use rayon::prelude::*;
use tracing::debug;

use crate::xva::{compute_cva, CreditParams};

/// Checks that `time_grid` is non-empty, finite, non-negative and strictly
/// ascending.
///
/// # Errors
///
/// `InvalidParameter` naming `time_grid`.
pub fn validate_time_grid(time_grid: &[f64]) -> Result<()> {
    if time_grid.is_empty() {
        return Err(PfeError::invalid("time_grid", "must not be empty"));
    }
    if let Some(&t) = time_grid.iter().find(|t| !t.is_finite() || **t < 0.0) {
        return Err(PfeError::invalid(
            "time_grid",
            format!("times must be finite and non-negative, got {}", t),
        ));
    }
    if let Some(w) = time_grid.windows(2).find(|w| w[1] <= w[0]) {
        return Err(PfeError::invalid(
            "time_grid",
            format!("times must be strictly ascending, got {} then {}", w[0], w[1]),
        ));
    }
    Ok(())
}

/// EE and PFE of the basket at each point of a time grid.
///
/// # Examples
///
/// ```
/// use pfe_core::types::PortfolioSpec;
/// use pfe_risk::ExposureProfile;
///
/// let grid = [0.25, 0.5, 0.75, 1.0];
/// let profile = ExposureProfile::simulate(&PortfolioSpec::default(), &grid, 5_000, true, 42).unwrap();
///
/// assert_eq!(profile.ee.len(), 4);
/// assert!(profile.peak_pfe() >= profile.pfe[0]);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExposureProfile {
    /// Grid times in years.
    pub time_grid: Vec<f64>,
    /// Expected exposure at each time.
    pub ee: Vec<f64>,
    /// PFE at `alpha` at each time.
    pub pfe: Vec<f64>,
    /// Confidence level of `pfe`.
    pub alpha: f64,
    /// Exposures evaluated per grid time.
    pub samples_used: usize,
    /// Seed of the draws.
    pub seed: u64,
}

impl ExposureProfile {
    /// Simulates the profile of `spec` on `time_grid`.
    ///
    /// `spec.tau` plays no part beyond validation; the grid gives the
    /// horizons.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` for an invalid spec, grid or sample count, raised
    /// before any draw.
    pub fn simulate(
        spec: &PortfolioSpec,
        time_grid: &[f64],
        num_samples: usize,
        antithetic: bool,
        seed: u64,
    ) -> Result<Self> {
        spec.validate()?;
        validate_time_grid(time_grid)?;

        let mut rng = ScenarioRng::from_seed(seed);
        let pairs = StandardNormalPairs::draw(num_samples, antithetic, &mut rng)?;

        let stats = time_grid
            .par_iter()
            .map(|&t| -> Result<(f64, f64)> {
                let batch = ScenarioBatch::at_horizon(spec, &pairs, t);
                let mut exposures = evaluate(&batch, spec);
                let ee = mean(&exposures)?;
                let pfe = empirical_quantile(&mut exposures, spec.alpha)?;
                Ok((ee, pfe))
            })
            .collect::<Result<Vec<_>>>()?;
        let (ee, pfe): (Vec<f64>, Vec<f64>) = stats.into_iter().unzip();

        debug!(
            points = time_grid.len(),
            samples = pairs.len(),
            seed,
            "exposure profile simulated"
        );

        Ok(Self {
            time_grid: time_grid.to_vec(),
            ee,
            pfe,
            alpha: spec.alpha,
            samples_used: pairs.len(),
            seed,
        })
    }

    /// Largest PFE over the grid.
    pub fn peak_pfe(&self) -> f64 {
        self.pfe.iter().copied().fold(0.0, f64::max)
    }

    /// Time-weighted average of EE (trapezoidal rule).
    ///
    /// EPE = (1/T) ∫ EE(t) dt over the grid span. A single-point grid
    /// returns its only EE value.
    pub fn expected_positive_exposure(&self) -> f64 {
        time_average(&self.ee, &self.time_grid)
    }

    /// Time-weighted average of effective EE, the running maximum of EE.
    pub fn effective_epe(&self) -> f64 {
        let effective_ee: Vec<f64> = self
            .ee
            .iter()
            .scan(0.0_f64, |running, &e| {
                *running = running.max(e);
                Some(*running)
            })
            .collect();
        time_average(&effective_ee, &self.time_grid)
    }

    /// Unilateral CVA of this profile against `credit`.
    ///
    /// # Errors
    ///
    /// As [`compute_cva`].
    pub fn cva(&self, credit: &CreditParams) -> Result<f64> {
        compute_cva(&self.ee, &self.time_grid, credit)
    }
}

fn time_average(values: &[f64], time_grid: &[f64]) -> f64 {
    let (first, last) = match (time_grid.first(), time_grid.last()) {
        (Some(&a), Some(&b)) if b > a => (a, b),
        _ => return values.first().copied().unwrap_or(0.0),
    };

    let integral: f64 = time_grid
        .windows(2)
        .zip(values.windows(2))
        .map(|(t, v)| 0.5 * (v[0] + v[1]) * (t[1] - t[0]))
        .sum();
    integral / (last - first)
}
