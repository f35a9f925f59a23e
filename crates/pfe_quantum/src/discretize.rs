//! Discretized distribution builder.
//!
//! Converts the continuous basket exposure `E = max(V, 0)` into a
//! [`DiscretizedDistribution`] over equal-width bins on `[0, E_max]`, with
//! each bin represented by its midpoint.
//!
//! Two ways of assigning mass:
//!
//! - [`DiscretizationMethod::Analytic`]: `V ~ N(m, s²)` exactly, so bin masses
//!   are differences of the normal CDF. The atom `P(V <= 0)` goes to bin 0.
//! - [`DiscretizationMethod::Sampled`]: histogram of a Monte Carlo exposure
//!   sample.
//!
//! Mass above `E_max` is dropped and the rest renormalised; the retained
//! fraction is reported as [`DiscretizedDistribution::coverage`].

use pfe_core::math::distributions::normal_cdf;
use pfe_core::types::{ensure_positive, PfeError, PortfolioSpec, Result};
use pfe_kernel::mc::{evaluate, generate, validate_num_samples};

use crate::distribution::{validate_num_bins, DiscretizedDistribution};

/// How bin masses are computed.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum DiscretizationMethod {
    /// Normal CDF of the basket value.
    Analytic,
    /// Histogram of `samples` antithetic scenario pairs drawn with `seed`.
    Sampled {
        /// Base draws (scenarios = 2 × samples).
        samples: usize,
        /// Seed of the auxiliary sample.
        seed: u64,
    },
}

/// Discretization settings.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiscretizationConfig {
    /// Range half-width in basket standard deviations (analytic method).
    pub num_std: f64,
    /// Mass assignment.
    pub method: DiscretizationMethod,
}

impl Default for DiscretizationConfig {
    fn default() -> Self {
        Self {
            num_std: 4.0,
            method: DiscretizationMethod::Analytic,
        }
    }
}

/// Discretizes the exposure of `spec` into `num_bins` bins with the default
/// analytic configuration.
///
/// # Errors
///
/// `InvalidParameter` if `num_bins` is not a positive power of two or the
/// spec is invalid; `NumericalDegeneracy` if the masses cannot be normalised.
///
/// # Examples
///
/// ```rust
/// use pfe_core::types::PortfolioSpec;
/// use pfe_quantum::discretize;
///
/// let dist = discretize(&PortfolioSpec::default(), 32).unwrap();
/// assert_eq!(dist.len(), 32);
/// let total: f64 = dist.probabilities().iter().sum();
/// assert!((total - 1.0).abs() < 1e-6);
/// ```
pub fn discretize(spec: &PortfolioSpec, num_bins: usize) -> Result<DiscretizedDistribution> {
    discretize_with(spec, num_bins, &DiscretizationConfig::default())
}

/// Discretizes with an explicit configuration.
pub fn discretize_with(
    spec: &PortfolioSpec,
    num_bins: usize,
    config: &DiscretizationConfig,
) -> Result<DiscretizedDistribution> {
    validate_num_bins(num_bins)?;
    spec.validate_model()?;

    match config.method {
        DiscretizationMethod::Analytic => {
            ensure_positive("num_std", config.num_std)?;
            analytic(spec, num_bins, config.num_std)
        }
        DiscretizationMethod::Sampled { samples, seed } => {
            validate_num_samples(samples)?;
            sampled(spec, num_bins, samples, seed)
        }
    }
}

fn analytic(spec: &PortfolioSpec, num_bins: usize, num_std: f64) -> Result<DiscretizedDistribution> {
    let m = spec.basket_mean();
    let s = spec.basket_std();

    // Deep out-of-the-money baskets still get a non-empty range.
    let mut e_max = m + num_std * s;
    if e_max <= 0.0 {
        e_max = num_std * s;
    }
    let width = e_max / num_bins as f64;

    let mut probabilities = Vec::with_capacity(num_bins);
    let mut lower = 0.0;
    for j in 0..num_bins {
        let upper = normal_cdf((j + 1) as f64 * width, m, s);
        // Bin 0 starts at -inf to absorb the atom at zero.
        probabilities.push((upper - lower).max(0.0));
        lower = upper;
    }

    let bin_values = midpoints(num_bins, width);
    normalise(bin_values, probabilities, width, e_max)
}

fn sampled(
    spec: &PortfolioSpec,
    num_bins: usize,
    samples: usize,
    seed: u64,
) -> Result<DiscretizedDistribution> {
    let batch = generate(spec, samples, true, seed)?;
    let exposures = evaluate(&batch, spec);

    let e_max = exposures.iter().copied().fold(0.0_f64, f64::max);
    if e_max <= 0.0 {
        return Err(PfeError::NumericalDegeneracy(
            "every sampled exposure is zero; no range to discretize".to_string(),
        ));
    }
    let width = e_max / num_bins as f64;

    let mut counts = vec![0usize; num_bins];
    for e in &exposures {
        let idx = ((e / width) as usize).min(num_bins - 1);
        counts[idx] += 1;
    }
    let total = exposures.len() as f64;
    let probabilities = counts.iter().map(|&c| c as f64 / total).collect();

    // Every sample lands in a bin, so no mass is truncated.
    DiscretizedDistribution::from_validated(
        midpoints(num_bins, width),
        probabilities,
        width,
        e_max,
        1.0,
    )
}

fn midpoints(num_bins: usize, width: f64) -> Vec<f64> {
    (0..num_bins).map(|j| (j as f64 + 0.5) * width).collect()
}

fn normalise(
    bin_values: Vec<f64>,
    mut probabilities: Vec<f64>,
    width: f64,
    e_max: f64,
) -> Result<DiscretizedDistribution> {
    let coverage: f64 = probabilities.iter().sum();
    if !coverage.is_finite() || coverage <= 0.0 {
        return Err(PfeError::NumericalDegeneracy(format!(
            "cannot normalise probability mass {}",
            coverage
        )));
    }
    for p in probabilities.iter_mut() {
        *p /= coverage;
    }
    DiscretizedDistribution::from_validated(bin_values, probabilities, width, e_max, coverage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pfe_core::math::distributions::norm_cdf;
    use pfe_core::types::AssetModel;

    #[test]
    fn test_rejects_non_power_of_two() {
        let spec = PortfolioSpec::default();
        for bad in [0, 3, 12, 33] {
            assert!(discretize(&spec, bad).unwrap_err().is_invalid_parameter());
        }
    }

    #[test]
    fn test_rejects_invalid_spec() {
        let spec = PortfolioSpec::default().with_tau(0.0);
        assert!(discretize(&spec, 32).unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_analytic_range_and_atom() {
        let spec = PortfolioSpec::default();
        let dist = discretize(&spec, 32).unwrap();

        let m = spec.basket_mean();
        let s = spec.basket_std();
        assert_relative_eq!(dist.e_max(), m + 4.0 * s, epsilon = 1e-12);
        assert_relative_eq!(dist.bin_width(), dist.e_max() / 32.0, epsilon = 1e-12);
        assert_relative_eq!(dist.bin_values()[0], dist.bin_width() / 2.0, epsilon = 1e-12);

        // Bin 0 holds P(V <= width), atom included
        let expected0 = norm_cdf((dist.bin_width() - m) / s) / dist.coverage();
        assert_relative_eq!(dist.probabilities()[0], expected0, epsilon = 1e-12);
        assert!(dist.probabilities()[0] > 0.36);

        assert_relative_eq!(dist.coverage(), norm_cdf(4.0), epsilon = 1e-6);
    }

    #[test]
    fn test_deep_out_of_the_money_range() {
        let spec = PortfolioSpec {
            strike: 150.0,
            ..PortfolioSpec::default()
        };
        let dist = discretize(&spec, 16).unwrap();
        assert_relative_eq!(dist.e_max(), 4.0 * spec.basket_std(), epsilon = 1e-12);
        // Almost all mass is the zero atom
        assert!(dist.probabilities()[0] > 0.999);
    }

    #[test]
    fn test_mean_close_to_closed_form() {
        let spec = PortfolioSpec::default();
        let dist = discretize(&spec, 1024).unwrap();
        let m = spec.basket_mean();
        let s = spec.basket_std();
        let exact = s * pfe_core::math::distributions::norm_pdf(m / s) + m * norm_cdf(m / s);
        // Midpoint of bin 0 biases the zero atom upwards by width/2 * P(V<=0)
        assert_relative_eq!(dist.mean(), exact, epsilon = 1e-3);
    }

    #[test]
    fn test_sampled_histogram() {
        let spec = PortfolioSpec::default();
        let config = DiscretizationConfig {
            num_std: 4.0,
            method: DiscretizationMethod::Sampled {
                samples: 50_000,
                seed: 42,
            },
        };
        let dist = discretize_with(&spec, 64, &config).unwrap();
        assert_eq!(dist.len(), 64);
        assert_eq!(dist.coverage(), 1.0);
        let total: f64 = dist.probabilities().iter().sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-9);

        // Zero atom near 0.36 plus the first sliver of positive mass
        assert!(dist.probabilities()[0] > 0.3);

        let again = discretize_with(&spec, 64, &config).unwrap();
        assert_eq!(dist, again);
    }

    #[test]
    fn test_sampled_all_zero_is_degenerate() {
        let spec = PortfolioSpec {
            strike: 1_000.0,
            ..PortfolioSpec::default()
        };
        let config = DiscretizationConfig {
            num_std: 4.0,
            method: DiscretizationMethod::Sampled { samples: 100, seed: 1 },
        };
        assert!(matches!(
            discretize_with(&spec, 8, &config),
            Err(PfeError::NumericalDegeneracy(_))
        ));
    }

    #[test]
    fn test_per_asset_spec() {
        let spec = PortfolioSpec::default().with_assets(
            AssetModel::new(90.0, 0.0, 0.3),
            AssetModel::new(115.0, 0.0, 0.1),
        );
        let dist = discretize(&spec, 8).unwrap();
        assert!(dist.probabilities().iter().all(|&p| p >= 0.0));
        assert!(dist.bin_values().windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn test_invalid_num_std() {
        let config = DiscretizationConfig {
            num_std: 0.0,
            ..DiscretizationConfig::default()
        };
        assert!(discretize_with(&PortfolioSpec::default(), 8, &config).is_err());
    }
}
