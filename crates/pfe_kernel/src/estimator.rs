//! Classical Monte Carlo PFE estimator.
//!
//! Orchestrates scenario generation, exposure evaluation and empirical
//! quantile extraction. The quantile is the ceiling-rank order statistic
//! (see [`pfe_core::math::statistics`]) so results are comparable with the
//! discretized quantile search.

use std::fmt;
use std::time::Instant;

use pfe_core::math::statistics::{empirical_quantile, mean, sample_std};
use pfe_core::types::{ensure_confidence, PortfolioSpec, Result};

use crate::mc::{evaluate, generate_with_rng, SimulationConfig};
use crate::rng::{resolve_seed, ScenarioRng};

/// Sampling strategy used for a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum VarianceReduction {
    /// Independent draws.
    None,
    /// Each draw paired with its negation.
    Antithetic,
}

impl VarianceReduction {
    /// Maps the antithetic flag to a strategy.
    #[inline]
    pub fn from_antithetic(antithetic: bool) -> Self {
        if antithetic {
            Self::Antithetic
        } else {
            Self::None
        }
    }
}

impl fmt::Display for VarianceReduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Antithetic => write!(f, "antithetic"),
        }
    }
}

/// Summary statistics of an exposure sample.
///
/// Fully determined by `(spec, num_samples, antithetic, seed)`; two runs with
/// the same inputs compare equal.
///
/// `pfe >= expected_exposure` is typical for `alpha > 0.5` but not enforced.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RiskSummary {
    /// Sample mean of the exposures.
    pub expected_exposure: f64,
    /// Empirical `alpha` quantile of the exposures.
    pub pfe: f64,
    /// Confidence level used for `pfe`.
    pub alpha: f64,
    /// Same value as `expected_exposure`.
    pub sample_mean: f64,
    /// Unbiased sample standard deviation.
    pub sample_std: f64,
    /// `sample_std / sqrt(samples_used)`.
    pub std_error: f64,
    /// Number of exposures the statistics were computed from.
    pub samples_used: usize,
    /// Sampling strategy.
    pub variance_reduction: VarianceReduction,
    /// Seed the scenarios were drawn with.
    pub seed: u64,
}

impl RiskSummary {
    /// Computes the summary of `exposures`, reordering the slice.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` for `alpha` outside (0, 1); `NumericalDegeneracy`
    /// for fewer than two exposures.
    pub fn from_exposures(
        exposures: &mut [f64],
        alpha: f64,
        variance_reduction: VarianceReduction,
        seed: u64,
    ) -> Result<Self> {
        ensure_confidence(alpha)?;
        let sample_std = sample_std(exposures)?;
        let expected_exposure = mean(exposures)?;
        let samples_used = exposures.len();
        let pfe = empirical_quantile(exposures, alpha)?;

        Ok(Self {
            expected_exposure,
            pfe,
            alpha,
            sample_mean: expected_exposure,
            sample_std,
            std_error: sample_std / (samples_used as f64).sqrt(),
            samples_used,
            variance_reduction,
            seed,
        })
    }
}

/// Estimates EE and PFE with an explicit generator.
///
/// `alpha` is checked before anything else; on any validation failure the
/// generator is left untouched.
///
/// # Errors
///
/// `InvalidParameter` for an invalid spec or sample count.
pub fn estimate_with_rng(
    spec: &PortfolioSpec,
    num_samples: usize,
    antithetic: bool,
    rng: &mut ScenarioRng,
) -> Result<RiskSummary> {
    ensure_confidence(spec.alpha)?;
    let batch = generate_with_rng(spec, num_samples, antithetic, rng)?;
    let mut exposures = evaluate(&batch, spec);
    RiskSummary::from_exposures(
        &mut exposures,
        spec.alpha,
        VarianceReduction::from_antithetic(antithetic),
        rng.seed(),
    )
}

/// Estimates EE and PFE of the basket at `spec.tau`.
///
/// With `antithetic`, `samples_used == 2 * num_samples`.
///
/// # Examples
///
/// ```rust
/// use pfe_core::types::PortfolioSpec;
/// use pfe_kernel::estimate;
///
/// let summary = estimate(&PortfolioSpec::default(), 10_000, true, 42).unwrap();
/// assert_eq!(summary.samples_used, 20_000);
/// assert!(summary.pfe > summary.expected_exposure);
/// ```
pub fn estimate(
    spec: &PortfolioSpec,
    num_samples: usize,
    antithetic: bool,
    seed: u64,
) -> Result<RiskSummary> {
    let mut rng = ScenarioRng::from_seed(seed);
    estimate_with_rng(spec, num_samples, antithetic, &mut rng)
}

/// Estimates with a [`SimulationConfig`], choosing a seed if none is set.
pub fn estimate_with_config(spec: &PortfolioSpec, config: &SimulationConfig) -> Result<RiskSummary> {
    estimate(
        spec,
        config.num_samples(),
        config.antithetic(),
        resolve_seed(config.seed()),
    )
}

/// [`RiskSummary`] plus wall-clock runtime.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassicalPfeReport {
    /// Deterministic statistics.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub summary: RiskSummary,
    /// Elapsed time of the estimation in milliseconds.
    pub runtime_ms: f64,
}

impl ClassicalPfeReport {
    /// Runs [`estimate_with_config`] and records its runtime.
    pub fn run(spec: &PortfolioSpec, config: &SimulationConfig) -> Result<Self> {
        let start = Instant::now();
        let summary = estimate_with_config(spec, config)?;
        Ok(Self {
            summary,
            runtime_ms: start.elapsed().as_secs_f64() * 1e3,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_exposures_statistics() {
        let mut e = vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
        let s = RiskSummary::from_exposures(&mut e, 0.9, VarianceReduction::None, 1).unwrap();

        assert_relative_eq!(s.expected_exposure, 4.5);
        assert_eq!(s.sample_mean, s.expected_exposure);
        // ceil(9) - 1 = 8
        assert_eq!(s.pfe, 8.0);
        assert_eq!(s.samples_used, 10);
        // var = 82.5 / 9
        assert_relative_eq!(s.sample_std, (82.5_f64 / 9.0).sqrt(), epsilon = 1e-12);
        assert_relative_eq!(s.std_error, s.sample_std / 10.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_from_exposures_degenerate() {
        let mut e = vec![1.0];
        assert!(RiskSummary::from_exposures(&mut e, 0.5, VarianceReduction::None, 0).is_err());
    }

    #[test]
    fn test_variance_reduction_display() {
        assert_eq!(VarianceReduction::Antithetic.to_string(), "antithetic");
        assert_eq!(VarianceReduction::from_antithetic(false), VarianceReduction::None);
    }

    #[test]
    fn test_estimate_reports_seed() {
        let s = estimate(&PortfolioSpec::default(), 100, false, 77).unwrap();
        assert_eq!(s.seed, 77);
        assert_eq!(s.samples_used, 100);
        assert_eq!(s.variance_reduction, VarianceReduction::None);
    }

    #[test]
    fn test_config_without_seed_reports_chosen_seed() {
        let config = SimulationConfig::builder().num_samples(200).build().unwrap();
        let first = estimate_with_config(&PortfolioSpec::default(), &config).unwrap();
        let replay = estimate(&PortfolioSpec::default(), 200, true, first.seed).unwrap();
        assert_eq!(first, replay);
    }

    #[test]
    fn test_report_wraps_summary() {
        let config = SimulationConfig::builder()
            .num_samples(1000)
            .seed(42)
            .build()
            .unwrap();
        let report = ClassicalPfeReport::run(&PortfolioSpec::default(), &config).unwrap();
        assert!(report.runtime_ms >= 0.0);
        assert_eq!(
            report.summary,
            estimate(&PortfolioSpec::default(), 1000, true, 42).unwrap()
        );
    }
}
