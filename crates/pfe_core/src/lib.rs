//! # pfe_core: Foundation for PFE Estimation
//!
//! ## Layer 1 (Foundation) Role
//!
//! pfe_core is the bottom layer of the workspace, providing:
//! - Portfolio specification: `PortfolioSpec`, `AssetModel` (`types::spec`)
//! - Error taxonomy: `PfeError` and validation helpers (`types::error`)
//! - Standard normal CDF/PDF (`math::distributions`)
//! - Sample statistics and the empirical quantile (`math::statistics`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other pfe_* crates and only two external
//! ones:
//! - thiserror: error derive
//! - serde: serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use pfe_core::math::statistics::empirical_quantile;
//! use pfe_core::types::PortfolioSpec;
//!
//! let spec = PortfolioSpec::default();
//! spec.validate().unwrap();
//!
//! let mut exposures = vec![0.0, 0.0, 1.5, 3.0];
//! let pfe = empirical_quantile(&mut exposures, spec.alpha).unwrap();
//! assert_eq!(pfe, 3.0);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Enable serialisation for `PortfolioSpec` and `AssetModel`

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod types;
