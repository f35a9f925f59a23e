//! Discretized exposure distribution.
//!
//! A [`DiscretizedDistribution`] is a probability mass function over `2^n`
//! bins on `[0, E_max]`. It is built once per quantile search and never
//! modified.

use pfe_core::types::{PfeError, Result};

/// Absolute tolerance on the total probability mass.
pub const MASS_TOLERANCE: f64 = 1e-6;

/// Largest supported bin count (2^20).
pub const MAX_BINS: usize = 1 << 20;

/// Fails with `InvalidParameter` unless `num_bins` is a power of two in
/// `[1, MAX_BINS]`.
pub fn validate_num_bins(num_bins: usize) -> Result<()> {
    if !num_bins.is_power_of_two() || num_bins > MAX_BINS {
        return Err(PfeError::invalid(
            "num_bins",
            format!(
                "must be a positive power of two not above {}, got {}",
                MAX_BINS, num_bins
            ),
        ));
    }
    Ok(())
}

/// Finite-bin approximation of an exposure distribution.
///
/// # Invariants
///
/// - `bin_values.len() == probabilities.len() == 2^n`
/// - probabilities are non-negative and sum to 1 within [`MASS_TOLERANCE`]
/// - bin values are non-decreasing
///
/// # Examples
///
/// ```rust
/// use pfe_quantum::DiscretizedDistribution;
///
/// let dist = DiscretizedDistribution::from_parts(
///     vec![1.0, 2.0, 3.0, 4.0],
///     vec![0.25, 0.25, 0.25, 0.25],
/// )
/// .unwrap();
///
/// assert_eq!(dist.num_qubits(), 2);
/// assert_eq!(dist.cdf_at(2.0), 0.5);
/// assert_eq!(dist.mean(), 2.5);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DiscretizedDistribution {
    bin_values: Vec<f64>,
    probabilities: Vec<f64>,
    bin_width: f64,
    e_max: f64,
    coverage: f64,
}

impl DiscretizedDistribution {
    /// Builds a distribution from explicit bin values and masses.
    ///
    /// Masses are used as given (not renormalised); `coverage` is 1 and
    /// `e_max` is the last bin value.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if the lengths differ, the length is not a power of
    /// two, a value is not finite, values decrease, or a mass is negative.
    /// `NumericalDegeneracy` if the masses do not sum to 1 within
    /// [`MASS_TOLERANCE`].
    pub fn from_parts(bin_values: Vec<f64>, probabilities: Vec<f64>) -> Result<Self> {
        if bin_values.len() != probabilities.len() {
            return Err(PfeError::invalid(
                "probabilities",
                format!(
                    "length {} differs from bin_values length {}",
                    probabilities.len(),
                    bin_values.len()
                ),
            ));
        }
        validate_num_bins(bin_values.len())?;

        if bin_values.iter().any(|v| !v.is_finite()) {
            return Err(PfeError::invalid("bin_values", "must be finite"));
        }
        if bin_values.windows(2).any(|w| w[1] < w[0]) {
            return Err(PfeError::invalid("bin_values", "must be non-decreasing"));
        }
        if probabilities.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return Err(PfeError::invalid(
                "probabilities",
                "must be finite and non-negative",
            ));
        }
        check_total_mass(&probabilities)?;

        let n = bin_values.len();
        let first = bin_values[0];
        let last = bin_values[n - 1];
        let bin_width = if n > 1 {
            (last - first) / (n - 1) as f64
        } else {
            0.0
        };

        Ok(Self {
            bin_values,
            probabilities,
            bin_width,
            e_max: last,
            coverage: 1.0,
        })
    }

    /// Internal constructor for builders that already hold the invariants.
    pub(crate) fn from_validated(
        bin_values: Vec<f64>,
        probabilities: Vec<f64>,
        bin_width: f64,
        e_max: f64,
        coverage: f64,
    ) -> Result<Self> {
        check_total_mass(&probabilities)?;
        Ok(Self {
            bin_values,
            probabilities,
            bin_width,
            e_max,
            coverage,
        })
    }

    /// Representative exposure of each bin.
    #[inline]
    pub fn bin_values(&self) -> &[f64] {
        &self.bin_values
    }

    /// Probability mass of each bin.
    #[inline]
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Number of bins.
    #[inline]
    pub fn len(&self) -> usize {
        self.bin_values.len()
    }

    /// Never true for a constructed distribution.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bin_values.is_empty()
    }

    /// `log2(len())`.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        self.len().trailing_zeros()
    }

    /// Width of each bin.
    #[inline]
    pub fn bin_width(&self) -> f64 {
        self.bin_width
    }

    /// Upper end of the discretized range.
    #[inline]
    pub fn e_max(&self) -> f64 {
        self.e_max
    }

    /// Probability mass that fell inside `[0, E_max]` before renormalising.
    #[inline]
    pub fn coverage(&self) -> f64 {
        self.coverage
    }

    /// `P(E <= threshold)` summed directly over the bins.
    pub fn cdf_at(&self, threshold: f64) -> f64 {
        self.bin_values
            .iter()
            .zip(&self.probabilities)
            .take_while(|&(&v, _)| v <= threshold)
            .map(|(_, &p)| p)
            .sum()
    }

    /// Running sums of the masses.
    pub fn cumulative(&self) -> Vec<f64> {
        self.probabilities
            .iter()
            .scan(0.0, |acc, &p| {
                *acc += p;
                Some(*acc)
            })
            .collect()
    }

    /// Discretized expected exposure `Σ value · mass`.
    pub fn mean(&self) -> f64 {
        self.bin_values
            .iter()
            .zip(&self.probabilities)
            .map(|(v, p)| v * p)
            .sum()
    }
}

fn check_total_mass(probabilities: &[f64]) -> Result<()> {
    let total: f64 = probabilities.iter().sum();
    if !total.is_finite() || (total - 1.0).abs() > MASS_TOLERANCE {
        return Err(PfeError::NumericalDegeneracy(format!(
            "probability mass sums to {}, outside 1 ± {}",
            total, MASS_TOLERANCE
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn uniform(n: usize) -> DiscretizedDistribution {
        let values = (1..=n).map(|i| i as f64).collect();
        let probs = vec![1.0 / n as f64; n];
        DiscretizedDistribution::from_parts(values, probs).unwrap()
    }

    #[test]
    fn test_num_bins_validation() {
        for ok in [1, 2, 8, 1024, MAX_BINS] {
            assert!(validate_num_bins(ok).is_ok(), "{}", ok);
        }
        for bad in [0, 3, 6, 1000, MAX_BINS * 2] {
            assert!(validate_num_bins(bad).unwrap_err().is_invalid_parameter(), "{}", bad);
        }
    }

    #[test]
    fn test_from_parts_rejects_bad_inputs() {
        assert!(DiscretizedDistribution::from_parts(vec![1.0, 2.0], vec![1.0]).is_err());
        assert!(DiscretizedDistribution::from_parts(vec![1.0, 2.0, 3.0], vec![0.5, 0.25, 0.25])
            .is_err());
        assert!(DiscretizedDistribution::from_parts(vec![2.0, 1.0], vec![0.5, 0.5]).is_err());
        assert!(DiscretizedDistribution::from_parts(vec![1.0, 2.0], vec![1.5, -0.5]).is_err());
        assert!(DiscretizedDistribution::from_parts(vec![1.0, f64::NAN], vec![0.5, 0.5]).is_err());
    }

    #[test]
    fn test_from_parts_mass_not_one() {
        let err = DiscretizedDistribution::from_parts(vec![1.0, 2.0], vec![0.5, 0.4]).unwrap_err();
        assert!(matches!(err, PfeError::NumericalDegeneracy(_)));
    }

    #[test]
    fn test_accessors() {
        let d = uniform(8);
        assert_eq!(d.len(), 8);
        assert!(!d.is_empty());
        assert_eq!(d.num_qubits(), 3);
        assert_relative_eq!(d.bin_width(), 1.0);
        assert_eq!(d.e_max(), 8.0);
        assert_eq!(d.coverage(), 1.0);
    }

    #[test]
    fn test_cdf_and_cumulative_agree() {
        let d = uniform(8);
        let cum = d.cumulative();
        for (i, &v) in d.bin_values().iter().enumerate() {
            assert_relative_eq!(d.cdf_at(v), cum[i], epsilon = 1e-15);
        }
        assert_eq!(d.cdf_at(0.5), 0.0);
        assert_relative_eq!(d.cdf_at(100.0), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_mean() {
        assert_relative_eq!(uniform(8).mean(), 4.5, epsilon = 1e-15);
    }
}
