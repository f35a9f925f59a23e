//! Unilateral CVA from an expected-exposure profile.

use pfe_core::types::{PfeError, Result};

use super::credit::CreditParams;
use crate::profile::validate_time_grid;

/// Computes unilateral CVA by trapezoidal integration over `time_grid`.
///
/// A single-point grid spans no time and gives zero.
///
/// # Errors
///
/// `InvalidParameter` if `ee` and `time_grid` differ in length, the grid is
/// invalid, or any EE value is negative or not finite.
///
/// # Examples
///
/// ```
/// use pfe_risk::{compute_cva, CreditParams};
///
/// let ee = [0.0, 100.0, 150.0, 100.0, 50.0];
/// let time_grid = [0.0, 0.25, 0.5, 0.75, 1.0];
/// let credit = CreditParams::new(0.02, 0.6).unwrap();
///
/// let cva = compute_cva(&ee, &time_grid, &credit).unwrap();
/// assert!(cva > 0.0);
/// ```
pub fn compute_cva(ee: &[f64], time_grid: &[f64], credit: &CreditParams) -> Result<f64> {
    if ee.len() != time_grid.len() {
        return Err(PfeError::invalid(
            "ee",
            format!(
                "length {} does not match time grid length {}",
                ee.len(),
                time_grid.len()
            ),
        ));
    }
    validate_time_grid(time_grid)?;
    if let Some(&e) = ee.iter().find(|e| !e.is_finite() || **e < 0.0) {
        return Err(PfeError::invalid(
            "ee",
            format!("exposures must be finite and non-negative, got {}", e),
        ));
    }

    let cva: f64 = time_grid
        .windows(2)
        .zip(ee.windows(2))
        .map(|(t, e)| 0.5 * (e[0] + e[1]) * credit.marginal_default_prob(t[0], t[1]))
        .sum();

    Ok(credit.lgd() * cva)
}
