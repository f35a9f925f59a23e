//! Simulated-quantum PFE estimator.
//!
//! Discretizes the exposure into `2^num_qubits` bins, then runs the shared
//! bisection search twice: once against the exact cumulative sums (the
//! classical validation value) and once against the simulated amplitude
//! estimator.

use std::ops::RangeInclusive;
use std::time::Instant;

use pfe_core::types::{ensure_confidence, PfeError, PortfolioSpec, Result};
use pfe_kernel::rng::resolve_seed;
use tracing::{debug, info};

use crate::discretize::discretize;
use crate::oracle::{CumulativeProbabilityOracle, SimulatedAmplitudeEstimator, AE_ITERATIONS_RANGE};
use crate::search::{exact_quantile, find_quantile};

/// Supported register sizes; bins = `2^num_qubits`.
pub const NUM_QUBITS_RANGE: RangeInclusive<u32> = 3..=10;

/// Result of the quantum-path estimation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuantumRiskSummary {
    /// Quantile located with the simulated amplitude estimator.
    pub pfe: f64,
    /// Discretized expected exposure.
    pub expected_exposure: f64,
    /// Confidence level.
    pub alpha: f64,
    /// Register size.
    pub num_qubits: u32,
    /// Amplitude-estimation precision (evaluation qubits).
    pub ae_iterations: u32,
    /// `2^num_qubits`.
    pub discretization_bins: usize,
    /// Estimated `P(E <= pfe)`.
    pub achieved_probability: f64,
    /// Oracle queries made by the search.
    pub oracle_calls: usize,
    /// Per-query error bound of the amplitude estimator.
    pub error_bound: f64,
    /// Quantile of the same distribution with exact cumulative sums.
    pub exact_discretized_pfe: f64,
    /// Seed of the amplitude-estimation outcomes.
    pub seed: u64,
}

fn validate_inputs(spec: &PortfolioSpec, num_qubits: u32, ae_iterations: u32) -> Result<()> {
    ensure_confidence(spec.alpha)?;
    if !NUM_QUBITS_RANGE.contains(&num_qubits) {
        return Err(PfeError::invalid(
            "num_qubits",
            format!(
                "must be in range [{}, {}], got {}",
                NUM_QUBITS_RANGE.start(),
                NUM_QUBITS_RANGE.end(),
                num_qubits
            ),
        ));
    }
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
    spec.validate_model()
}

/// Estimates PFE through discretization and simulated amplitude estimation.
///
/// All inputs are validated before the distribution is built.
///
/// # Errors
///
/// `InvalidParameter` for an invalid spec, `num_qubits` outside `3..=10` or
/// `ae_iterations` outside `1..=16`; `QuantileNotFound` if the search falls
/// short of `alpha`.
///
/// # Examples
///
/// ```rust
/// use pfe_core::types::PortfolioSpec;
/// use pfe_quantum::estimate_quantum;
///
/// let summary = estimate_quantum(&PortfolioSpec::default(), 5, 6, 42).unwrap();
/// assert_eq!(summary.discretization_bins, 32);
/// assert!(summary.pfe > 0.0);
/// ```
pub fn estimate_quantum(
    spec: &PortfolioSpec,
    num_qubits: u32,
    ae_iterations: u32,
    seed: u64,
) -> Result<QuantumRiskSummary> {
    validate_inputs(spec, num_qubits, ae_iterations)?;

    let bins = 1usize << num_qubits;
    let dist = discretize(spec, bins)?;
    debug!(
        bins,
        e_max = dist.e_max(),
        coverage = dist.coverage(),
        "exposure discretized"
    );

    let exact = exact_quantile(&dist, spec.alpha)?;

    let mut oracle = SimulatedAmplitudeEstimator::new(&dist, ae_iterations, seed)?;
    let estimate = find_quantile(&dist, spec.alpha, &mut oracle)?;

    info!(
        num_qubits,
        ae_iterations,
        pfe = estimate.threshold,
        exact_pfe = exact.threshold,
        oracle_calls = estimate.oracle_calls,
        "quantum-path estimate complete"
    );

    Ok(QuantumRiskSummary {
        pfe: estimate.threshold,
        expected_exposure: dist.mean(),
        alpha: spec.alpha,
        num_qubits,
        ae_iterations,
        discretization_bins: bins,
        achieved_probability: estimate.achieved_probability,
        oracle_calls: estimate.oracle_calls,
        error_bound: oracle.error_bound(),
        exact_discretized_pfe: exact.threshold,
        seed,
    })
}

/// [`QuantumRiskSummary`] plus wall-clock runtime.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuantumPfeReport {
    /// Deterministic statistics.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub summary: QuantumRiskSummary,
    /// Elapsed time in milliseconds.
    pub runtime_ms: f64,
}

impl QuantumPfeReport {
    /// Runs [`estimate_quantum`], choosing a seed if none is given.
    pub fn run(
        spec: &PortfolioSpec,
        num_qubits: u32,
        ae_iterations: u32,
        seed: Option<u64>,
    ) -> Result<Self> {
        let start = Instant::now();
        let summary = estimate_quantum(spec, num_qubits, ae_iterations, resolve_seed(seed))?;
        Ok(Self {
            summary,
            runtime_ms: start.elapsed().as_secs_f64() * 1e3,
        })
    }
}
