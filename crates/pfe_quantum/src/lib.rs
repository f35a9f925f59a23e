//! # pfe_quantum: Discretized Quantile Search
//!
//! ## Layer 2 Role
//!
//! The quantile-search core shared by the classical validation path and the
//! simulated quantum path:
//! - [`DiscretizedDistribution`]: PMF over `2^n` exposure bins
//! - [`discretize`]: builds it from a `PortfolioSpec` (analytic or sampled)
//! - [`CumulativeProbabilityOracle`]: `P(E <= y)` capability, with
//!   [`ExactCdfOracle`] and [`SimulatedAmplitudeEstimator`]
//! - [`find_quantile`]: bisection over bin indices, generic over the oracle
//! - [`estimate_quantum`]: end-to-end quantum-path estimator
//!
//! ## Usage Examples
//!
//! ```rust
//! use pfe_core::types::PortfolioSpec;
//! use pfe_quantum::{discretize, find_quantile, ExactCdfOracle, SimulatedAmplitudeEstimator};
//!
//! let spec = PortfolioSpec::default();
//! let dist = discretize(&spec, 64).unwrap();
//!
//! let exact = find_quantile(&dist, spec.alpha, &mut ExactCdfOracle::new(&dist)).unwrap();
//!
//! let mut qae = SimulatedAmplitudeEstimator::new(&dist, 8, 42).unwrap();
//! let noisy = find_quantile(&dist, spec.alpha, &mut qae).unwrap();
//!
//! assert!((noisy.threshold - exact.threshold).abs() <= 8.0 * dist.bin_width());
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Serialisation for results and configuration

#![deny(missing_docs)]

pub mod discretize;
pub mod distribution;
pub mod estimator;
pub mod oracle;
pub mod search;

pub use discretize::{discretize, discretize_with, DiscretizationConfig, DiscretizationMethod};
pub use distribution::{validate_num_bins, DiscretizedDistribution, MASS_TOLERANCE, MAX_BINS};
pub use estimator::{estimate_quantum, QuantumPfeReport, QuantumRiskSummary, NUM_QUBITS_RANGE};
pub use oracle::{
    CumulativeProbabilityOracle, ExactCdfOracle, SimulatedAmplitudeEstimator, AE_ITERATIONS_RANGE,
};
pub use search::{exact_quantile, find_quantile, QuantileEstimate};
