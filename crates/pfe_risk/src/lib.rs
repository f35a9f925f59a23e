//! # pfe_risk: Benchmarking and Exposure Analytics
//!
//! ## Layer 3 Role
//!
//! Application-level analytics on top of the classical kernel:
//! - [`benchmark`]: PFE error against a large reference run for a ladder of
//!   sample sizes, with independent seeds per size and an optional rayon pool
//! - [`ExposureProfile`]: EE and PFE over a time grid from one set of draws
//! - [`xva`]: counterparty credit parameters and unilateral CVA
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              pfe_risk (L3)              │
//! ├─────────────────────────────────────────┤
//! │  benchmark/  - convergence driver       │
//! │  profile/    - EE, PFE, EPE profiles    │
//! │  xva/        - CreditParams, CVA        │
//! └─────────────────────────────────────────┘
//!          ↓
//! ┌─────────────────────────────────────────┐
//! │            pfe_kernel (L2)              │
//! │  Seeded Monte Carlo PFE estimator       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use pfe_core::types::PortfolioSpec;
//! use pfe_risk::benchmark;
//!
//! let result = benchmark(&PortfolioSpec::default(), &[2_000, 500], 50_000, 42).unwrap();
//!
//! // Points come back in ascending sample-size order
//! assert_eq!(result.sample_sizes(), vec![500, 2_000]);
//! assert!(result.reference_pfe > 0.0);
//! ```

#![deny(missing_docs)]

pub mod benchmark;
pub mod profile;
pub mod xva;

pub use benchmark::{benchmark, BenchmarkDriver, BenchmarkPoint, BenchmarkReport, BenchmarkResult};
pub use profile::{validate_time_grid, ExposureProfile};
pub use xva::{compute_cva, CreditParams};
