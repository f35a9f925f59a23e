//! Convergence benchmark for the classical PFE estimator.
//!
//! One reference estimate at a large sample count, then one independent
//! estimate per requested sample size. Each size draws from its own
//! sub-stream so antithetic pairs of one run never correlate with another.
//! Any failing run fails the whole benchmark.

use std::time::Instant;

use pfe_core::types::{PfeError, PortfolioSpec, Result};
use pfe_kernel::estimate;
use pfe_kernel::mc::validate_num_samples;
use pfe_kernel::rng::substream_seed;
use rayon::prelude::*;
use tracing::{debug, info};

/// One sample size of the convergence curve.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BenchmarkPoint {
    /// Requested base sample count.
    pub sample_size: usize,
    /// Exposures actually evaluated (doubled with antithetic pairing).
    pub samples_used: usize,
    /// Seed of this run.
    pub seed: u64,
    /// PFE estimate at this size.
    pub pfe_estimate: f64,
    /// `|pfe_estimate - reference_pfe|`.
    pub absolute_error: f64,
    /// Wall-clock time of this run in milliseconds.
    pub runtime_ms: f64,
}

/// Outcome of [`BenchmarkDriver::run`].
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BenchmarkResult {
    /// PFE of the reference run.
    pub reference_pfe: f64,
    /// Exposures evaluated by the reference run (doubled with antithetic pairing).
    pub reference_samples: usize,
    /// Per-size results in ascending `sample_size` order.
    pub points: Vec<BenchmarkPoint>,
    /// Wall-clock time of the whole benchmark in milliseconds.
    pub total_runtime_ms: f64,
}

impl BenchmarkResult {
    /// Sample sizes in reported order.
    pub fn sample_sizes(&self) -> Vec<usize> {
        self.points.iter().map(|p| p.sample_size).collect()
    }

    /// Absolute errors in reported order.
    pub fn errors(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.absolute_error).collect()
    }

    /// Least-squares slope of `ln(error)` against `ln(samples_used)`.
    ///
    /// Monte Carlo error decays like `N^(-1/2)`, so a healthy curve has a
    /// slope near `-0.5`. Points with zero error are skipped. Returns `None`
    /// with fewer than two usable points or a single distinct sample count.
    ///
    /// # Examples
    ///
    /// ```
    /// use pfe_risk::{BenchmarkPoint, BenchmarkResult};
    ///
    /// let point = |n: usize, err: f64| BenchmarkPoint {
    ///     sample_size: n,
    ///     samples_used: n,
    ///     seed: 0,
    ///     pfe_estimate: 0.0,
    ///     absolute_error: err,
    ///     runtime_ms: 0.0,
    /// };
    /// let result = BenchmarkResult {
    ///     reference_pfe: 0.0,
    ///     reference_samples: 1,
    ///     points: vec![point(100, 0.1), point(10_000, 0.01)],
    ///     total_runtime_ms: 0.0,
    /// };
    /// assert!((result.convergence_slope().unwrap() + 0.5).abs() < 1e-12);
    /// ```
    pub fn convergence_slope(&self) -> Option<f64> {
        let (xs, ys): (Vec<f64>, Vec<f64>) = self
            .points
            .iter()
            .filter(|p| p.absolute_error > 0.0)
            .map(|p| ((p.samples_used as f64).ln(), p.absolute_error.ln()))
            .unzip();
        if xs.len() < 2 {
            return None;
        }

        let n = xs.len() as f64;
        let x_bar = xs.iter().sum::<f64>() / n;
        let y_bar = ys.iter().sum::<f64>() / n;
        let sxx: f64 = xs.iter().map(|x| (x - x_bar).powi(2)).sum();
        let sxy: f64 = xs
            .iter()
            .zip(&ys)
            .map(|(x, y)| (x - x_bar) * (y - y_bar))
            .sum();

        if sxx == 0.0 {
            None
        } else {
            Some(sxy / sxx)
        }
    }
}

/// Columnar view of a [`BenchmarkResult`], one array per output field.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BenchmarkReport {
    /// PFE of the reference run.
    pub reference_pfe: f64,
    /// Exposures evaluated by the reference run.
    pub reference_samples: usize,
    /// Ascending sample sizes.
    pub sample_sizes: Vec<usize>,
    /// PFE per sample size.
    pub pfe_values: Vec<f64>,
    /// Absolute error per sample size.
    pub errors: Vec<f64>,
    /// Runtime per sample size in milliseconds.
    pub runtimes_ms: Vec<f64>,
    /// Wall-clock time of the whole benchmark in milliseconds.
    pub total_runtime_ms: f64,
}

impl From<&BenchmarkResult> for BenchmarkReport {
    fn from(result: &BenchmarkResult) -> Self {
        Self {
            reference_pfe: result.reference_pfe,
            reference_samples: result.reference_samples,
            sample_sizes: result.sample_sizes(),
            pfe_values: result.points.iter().map(|p| p.pfe_estimate).collect(),
            errors: result.errors(),
            runtimes_ms: result.points.iter().map(|p| p.runtime_ms).collect(),
            total_runtime_ms: result.total_runtime_ms,
        }
    }
}

/// Runs the convergence benchmark.
///
/// # Examples
///
/// ```
/// use pfe_core::types::PortfolioSpec;
/// use pfe_risk::BenchmarkDriver;
///
/// let driver = BenchmarkDriver::new().with_antithetic(true);
/// let result = driver.run(&PortfolioSpec::default(), &[1_000], 20_000, 7).unwrap();
/// assert_eq!(result.points.len(), 1);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BenchmarkDriver {
    /// Antithetic pairing for every run, reference included.
    pub antithetic: bool,
    /// Run the per-size estimates on the rayon pool. Per-size runtimes then
    /// include contention with the other runs.
    pub parallel: bool,
}

impl Default for BenchmarkDriver {
    fn default() -> Self {
        Self {
            antithetic: true,
            parallel: false,
        }
    }
}

impl BenchmarkDriver {
    /// Driver with antithetic pairing and sequential execution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets antithetic pairing.
    pub fn with_antithetic(mut self, antithetic: bool) -> Self {
        self.antithetic = antithetic;
        self
    }

    /// Sets parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Benchmarks `spec` at each of `sample_sizes` against a reference run.
    ///
    /// The reference uses `seed`; the `i`-th size in ascending order uses
    /// `substream_seed(seed, i + 1)`. Results are reported in ascending
    /// order whatever the execution order.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` for an invalid spec, an empty size list or any
    /// sample count out of range, raised before any run starts. Otherwise
    /// the first failing run's error.
    pub fn run(
        &self,
        spec: &PortfolioSpec,
        sample_sizes: &[usize],
        reference_samples: usize,
        seed: u64,
    ) -> Result<BenchmarkResult> {
        spec.validate()?;
        if sample_sizes.is_empty() {
            return Err(PfeError::invalid(
                "sample_sizes",
                "at least one sample size is required",
            ));
        }
        for &n in sample_sizes {
            validate_num_samples(n)?;
        }
        validate_num_samples(reference_samples)?;

        let mut sizes = sample_sizes.to_vec();
        sizes.sort_unstable();

        let start = Instant::now();

        let reference = estimate(spec, reference_samples, self.antithetic, seed)?;
        info!(
            reference_samples = reference.samples_used,
            reference_pfe = reference.pfe,
            seed,
            "reference estimate complete"
        );

        let run_point = |(index, &sample_size): (usize, &usize)| -> Result<BenchmarkPoint> {
            let point_seed = substream_seed(seed, index as u64 + 1);
            let point_start = Instant::now();
            let summary = estimate(spec, sample_size, self.antithetic, point_seed)?;
            let runtime_ms = point_start.elapsed().as_secs_f64() * 1e3;
            let absolute_error = (summary.pfe - reference.pfe).abs();

            debug!(
                sample_size,
                seed = point_seed,
                pfe = summary.pfe,
                absolute_error,
                runtime_ms,
                "benchmark point"
            );

            Ok(BenchmarkPoint {
                sample_size,
                samples_used: summary.samples_used,
                seed: point_seed,
                pfe_estimate: summary.pfe,
                absolute_error,
                runtime_ms,
            })
        };

        let points = if self.parallel {
            sizes
                .par_iter()
                .enumerate()
                .map(run_point)
                .collect::<Result<Vec<_>>>()?
        } else {
            sizes
                .iter()
                .enumerate()
                .map(run_point)
                .collect::<Result<Vec<_>>>()?
        };

        let result = BenchmarkResult {
            reference_pfe: reference.pfe,
            reference_samples: reference.samples_used,
            points,
            total_runtime_ms: start.elapsed().as_secs_f64() * 1e3,
        };

        info!(
            points = result.points.len(),
            slope = ?result.convergence_slope(),
            total_runtime_ms = result.total_runtime_ms,
            "benchmark complete"
        );

        Ok(result)
    }
}

/// [`BenchmarkDriver::run`] with the default driver.
pub fn benchmark(
    spec: &PortfolioSpec,
    sample_sizes: &[usize],
    reference_samples: usize,
    seed: u64,
) -> Result<BenchmarkResult> {
    BenchmarkDriver::default().run(spec, sample_sizes, reference_samples, seed)
}
