//! Basket exposure evaluation.

use pfe_core::types::PortfolioSpec;

use super::scenario::ScenarioBatch;

/// Exposure of one scenario: `max(w1*s1 + w2*s2 - K, 0)`.
#[inline]
pub fn basket_exposure(spec: &PortfolioSpec, s1: f64, s2: f64) -> f64 {
    (spec.w1 * s1 + spec.w2 * s2 - spec.strike).max(0.0)
}

/// Exposure for every scenario in `batch`, in scenario order.
///
/// Pure and deterministic.
///
/// # Examples
///
/// ```rust
/// use pfe_core::types::PortfolioSpec;
/// use pfe_kernel::mc::{evaluate, ScenarioBatch};
///
/// let batch = ScenarioBatch { s1: vec![110.0, 90.0], s2: vec![100.0, 95.0] };
/// let exposures = evaluate(&batch, &PortfolioSpec::default());
/// assert_eq!(exposures, vec![5.0, 0.0]);
/// ```
pub fn evaluate(batch: &ScenarioBatch, spec: &PortfolioSpec) -> Vec<f64> {
    batch
        .s1
        .iter()
        .zip(batch.s2.iter())
        .map(|(&s1, &s2)| basket_exposure(spec, s1, s2))
        .collect()
}
