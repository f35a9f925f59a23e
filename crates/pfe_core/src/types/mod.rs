//! Portfolio specification and error types.
//!
//! This module provides:
//! - `spec`: [`PortfolioSpec`] and [`AssetModel`], the immutable estimator input
//! - `error`: [`PfeError`] taxonomy and validation helpers

pub mod error;
pub mod spec;

pub use error::{ensure_confidence, ensure_finite, ensure_positive, PfeError, Result};
pub use spec::{AssetModel, PortfolioSpec};
