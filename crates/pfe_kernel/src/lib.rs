//! # pfe_kernel: Classical Monte Carlo PFE Engine
//!
//! ## Layer 2 Role
//!
//! Builds on `pfe_core` to provide:
//! - Seeded, instrumented random numbers (`rng`)
//! - Scenario generation under the additive normal model (`mc::scenario`)
//! - Basket exposure evaluation (`mc::exposure`)
//! - The classical estimator: EE, PFE and sample statistics (`estimator`)
//!
//! ## Reproducibility
//!
//! Every entry point takes an explicit seed or [`rng::ScenarioRng`]. The same
//! `(spec, num_samples, antithetic, seed)` always yields a bit-identical
//! [`RiskSummary`]. Concurrent calls are safe as long as each has its own
//! generator.
//!
//! ## Usage Examples
//!
//! ```rust
//! use pfe_core::types::PortfolioSpec;
//! use pfe_kernel::estimate;
//!
//! let spec = PortfolioSpec::default();
//! let a = estimate(&spec, 5_000, true, 42).unwrap();
//! let b = estimate(&spec, 5_000, true, 42).unwrap();
//! assert_eq!(a, b);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Serialisation for `RiskSummary` and friends

#![deny(missing_docs)]

pub mod estimator;
pub mod mc;
pub mod rng;

pub use estimator::{
    estimate, estimate_with_config, estimate_with_rng, ClassicalPfeReport, RiskSummary,
    VarianceReduction,
};
