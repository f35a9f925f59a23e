//! Cumulative-probability oracles.
//!
//! The quantile search only needs `P(E <= y)` for thresholds `y`. The
//! [`CumulativeProbabilityOracle`] trait is that capability; implementations
//! decide how exact the answer is.
//!
//! - [`ExactCdfOracle`]: prefix sums of the discretized masses (no error).
//! - [`SimulatedAmplitudeEstimator`]: the discretized CDF read out through a
//!   simulated canonical amplitude-estimation measurement.
//! - Any `FnMut(f64) -> f64` closure.

use std::f64::consts::PI;

use pfe_core::types::{PfeError, Result};
use pfe_kernel::rng::ScenarioRng;
use rand::distributions::{Distribution, WeightedIndex};

use crate::distribution::DiscretizedDistribution;

/// Supported amplitude-estimation precision range, in evaluation qubits.
pub const AE_ITERATIONS_RANGE: std::ops::RangeInclusive<u32> = 1..=16;

/// Source of cumulative probabilities for the bisection search.
pub trait CumulativeProbabilityOracle {
    /// Estimate of `P(E <= threshold)`.
    fn cumulative_probability(&mut self, threshold: f64) -> Result<f64>;

    /// Stated absolute error bound of a single answer. Zero for exact oracles.
    fn error_bound(&self) -> f64 {
        0.0
    }
}

impl<F> CumulativeProbabilityOracle for F
where
    F: FnMut(f64) -> f64,
{
    fn cumulative_probability(&mut self, threshold: f64) -> Result<f64> {
        Ok(self(threshold))
    }
}

/// Exact cumulative sums over a [`DiscretizedDistribution`].
#[derive(Clone, Debug)]
pub struct ExactCdfOracle<'a> {
    bin_values: &'a [f64],
    cumulative: Vec<f64>,
}

impl<'a> ExactCdfOracle<'a> {
    /// Precomputes prefix sums of `dist`.
    pub fn new(dist: &'a DiscretizedDistribution) -> Self {
        Self {
            bin_values: dist.bin_values(),
            cumulative: dist.cumulative(),
        }
    }

    /// `P(E <= threshold)`, clamped to `[0, 1]`.
    pub fn probability(&self, threshold: f64) -> f64 {
        let idx = self.bin_values.partition_point(|&v| v <= threshold);
        if idx == 0 {
            0.0
        } else {
            self.cumulative[idx - 1].clamp(0.0, 1.0)
        }
    }
}

impl CumulativeProbabilityOracle for ExactCdfOracle<'_> {
    fn cumulative_probability(&mut self, threshold: f64) -> Result<f64> {
        Ok(self.probability(threshold))
    }
}

/// Simulated canonical quantum amplitude estimation.
///
/// With `m = ae_iterations` evaluation qubits the phase register has
/// `M = 2^m` outcomes. For a true probability `p = sin²θ`, outcome `y` is
/// measured with probability
///
/// ```text
/// P(y) = sin²(M π Δ) / (M² sin²(π Δ)),    Δ = y / M - θ / π
/// ```
///
/// and the estimate is `sin²(π y / M)`. With probability at least `8/π²`
/// the error is within `π/M + π²/M²`. Each query draws one outcome from the
/// oracle's own seeded generator.
///
/// # Examples
///
/// ```rust
/// use pfe_quantum::{CumulativeProbabilityOracle, DiscretizedDistribution, SimulatedAmplitudeEstimator};
///
/// let dist = DiscretizedDistribution::from_parts(vec![1.0, 2.0], vec![0.5, 0.5]).unwrap();
/// let mut oracle = SimulatedAmplitudeEstimator::new(&dist, 6, 42).unwrap();
///
/// // p = 0.5 sits exactly on the grid, so the estimate is exact
/// let p = oracle.cumulative_probability(1.0).unwrap();
/// assert!((p - 0.5).abs() < 1e-12);
/// ```
#[derive(Clone, Debug)]
pub struct SimulatedAmplitudeEstimator<'a> {
    exact: ExactCdfOracle<'a>,
    ae_iterations: u32,
    grid: usize,
    rng: ScenarioRng,
    queries: usize,
}

impl<'a> SimulatedAmplitudeEstimator<'a> {
    /// Creates an estimator over `dist` with `ae_iterations` evaluation qubits.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if `ae_iterations` is outside `1..=16`.
    pub fn new(dist: &'a DiscretizedDistribution, ae_iterations: u32, seed: u64) -> Result<Self> {
        if !AE_ITERATIONS_RANGE.contains(&ae_iterations) {
            return Err(PfeError::invalid(
                "ae_iterations",
                format!(
                    "must be in range [{}, {}], got {}",
                    AE_ITERATIONS_RANGE.start(),
                    AE_ITERATIONS_RANGE.end(),
                    ae_iterations
                ),
            ));
        }
        Ok(Self {
            exact: ExactCdfOracle::new(dist),
            ae_iterations,
            grid: 1usize << ae_iterations,
            rng: ScenarioRng::from_seed(seed),
            queries: 0,
        })
    }

    /// Number of evaluation qubits.
    #[inline]
    pub fn ae_iterations(&self) -> u32 {
        self.ae_iterations
    }

    /// Number of measurement outcomes `M = 2^ae_iterations`.
    #[inline]
    pub fn grid_size(&self) -> usize {
        self.grid
    }

    /// Number of queries answered so far.
    #[inline]
    pub fn queries(&self) -> usize {
        self.queries
    }

    /// Outcome distribution of the phase register for true probability `p`.
    pub fn outcome_weights(&self, p: f64) -> Vec<f64> {
        let m = self.grid as f64;
        let phase = p.clamp(0.0, 1.0).sqrt().asin() / PI;
        (0..self.grid)
            .map(|y| {
                let delta = y as f64 / m - phase;
                let denom = (PI * delta).sin();
                if denom.abs() < 1e-12 {
                    1.0
                } else {
                    let ratio = (m * PI * delta).sin() / (m * denom);
                    ratio * ratio
                }
            })
            .collect()
    }

    /// Estimate produced by outcome `y`.
    #[inline]
    pub fn estimate_for_outcome(&self, y: usize) -> f64 {
        let s = (PI * y as f64 / self.grid as f64).sin();
        s * s
    }
}

impl CumulativeProbabilityOracle for SimulatedAmplitudeEstimator<'_> {
    fn cumulative_probability(&mut self, threshold: f64) -> Result<f64> {
        let p = self.exact.probability(threshold);
        let weights = self.outcome_weights(p);
        let outcomes = WeightedIndex::new(&weights).map_err(|e| {
            PfeError::NumericalDegeneracy(format!("amplitude estimation outcome law: {}", e))
        })?;
        let y = outcomes.sample(&mut self.rng);
        self.queries += 1;
        Ok(self.estimate_for_outcome(y))
    }

    fn error_bound(&self) -> f64 {
        let m = self.grid as f64;
        PI / m + PI * PI / (m * m)
    }
}
