//! Error types for structured error handling.
//!
//! Every estimator in the workspace reports failures through [`PfeError`].
//! The three categories are deliberately disjoint:
//!
//! - `InvalidParameter`: the caller supplied input violating an invariant.
//!   Always raised before any random variate is drawn.
//! - `QuantileNotFound`: the bisection search exhausted its range without
//!   reaching the confidence level (discretisation range too narrow, or a
//!   noisy oracle under-reporting).
//! - `NumericalDegeneracy`: the data cannot support the requested statistic
//!   (fewer than two samples for a standard deviation, probability mass that
//!   cannot be normalised).

use thiserror::Error;

/// Categorised PFE estimation errors.
///
/// # Examples
/// ```
/// use pfe_core::types::PfeError;
///
/// let err = PfeError::invalid("sigma", "must be positive, got 0");
/// assert_eq!(
///     format!("{}", err),
///     "Invalid parameter 'sigma': must be positive, got 0"
/// );
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PfeError {
    /// An input violates a stated invariant.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name as it appears in the external interface.
        name: &'static str,
        /// Description of the violation.
        reason: String,
    },

    /// The quantile search never reached the confidence level.
    ///
    /// `threshold` is the maximum bin value, which is still returned to the
    /// caller as the best available (under-estimated) answer.
    #[error(
        "Quantile not found: P(E <= {threshold}) = {achieved_probability} < alpha = {alpha}; \
         discretisation range is too narrow"
    )]
    QuantileNotFound {
        /// Requested confidence level.
        alpha: f64,
        /// Largest bin value of the searched distribution.
        threshold: f64,
        /// Cumulative probability reported at `threshold`.
        achieved_probability: f64,
    },

    /// The computation is numerically degenerate.
    #[error("Numerical degeneracy: {0}")]
    NumericalDegeneracy(String),
}

impl PfeError {
    /// Shorthand for [`PfeError::InvalidParameter`].
    #[inline]
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        PfeError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Returns `true` for caller-input errors.
    #[inline]
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, PfeError::InvalidParameter { .. })
    }
}

/// Result alias used across the PFE crates.
pub type Result<T> = std::result::Result<T, PfeError>;

/// Fails with `InvalidParameter` unless `value` is finite and strictly positive.
pub fn ensure_positive(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(PfeError::invalid(
            name,
            format!("must be finite and positive, got {}", value),
        ));
    }
    Ok(())
}

/// Fails with `InvalidParameter` unless `value` is finite.
pub fn ensure_finite(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(PfeError::invalid(name, format!("must be finite, got {}", value)));
    }
    Ok(())
}

/// Fails with `InvalidParameter` unless `alpha` lies in the open interval (0, 1).
pub fn ensure_confidence(alpha: f64) -> Result<()> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(PfeError::invalid(
            "alpha",
            format!("must lie in (0, 1), got {}", alpha),
        ));
    }
    Ok(())
}
