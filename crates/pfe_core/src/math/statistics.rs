//! Sample statistics over exposure vectors.
//!
//! The quantile here is the ceiling-rank order statistic: the smallest
//! sample `x` such that at least `alpha * N` samples are `<= x`. No
//! interpolation between order statistics.

use crate::types::{ensure_confidence, PfeError, Result};

/// Arithmetic mean.
///
/// # Errors
///
/// `NumericalDegeneracy` for an empty slice.
pub fn mean(samples: &[f64]) -> Result<f64> {
    if samples.is_empty() {
        return Err(PfeError::NumericalDegeneracy(
            "mean of an empty sample".to_string(),
        ));
    }
    Ok(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Unbiased sample standard deviation (divisor `N - 1`).
///
/// # Errors
///
/// `NumericalDegeneracy` when fewer than two samples are given.
pub fn sample_std(samples: &[f64]) -> Result<f64> {
    let n = samples.len();
    if n < 2 {
        return Err(PfeError::NumericalDegeneracy(format!(
            "sample standard deviation needs at least 2 samples, got {}",
            n
        )));
    }
    let m = mean(samples)?;
    let ss: f64 = samples.iter().map(|x| (x - m) * (x - m)).sum();
    Ok((ss / (n - 1) as f64).sqrt())
}

/// Zero-based rank of the `alpha` order statistic in a sample of size `n`.
///
/// `ceil(alpha * n) - 1`, clamped to `[0, n - 1]`. `n` must be positive.
#[inline]
pub fn quantile_rank(alpha: f64, n: usize) -> usize {
    let k = (alpha * n as f64).ceil() as usize;
    k.saturating_sub(1).min(n.saturating_sub(1))
}

/// Empirical `alpha` quantile of an already sorted slice.
///
/// # Errors
///
/// `InvalidParameter` for `alpha` outside (0, 1), `NumericalDegeneracy` for
/// an empty slice.
pub fn quantile_sorted(sorted: &[f64], alpha: f64) -> Result<f64> {
    ensure_confidence(alpha)?;
    if sorted.is_empty() {
        return Err(PfeError::NumericalDegeneracy(
            "quantile of an empty sample".to_string(),
        ));
    }
    Ok(sorted[quantile_rank(alpha, sorted.len())])
}

/// Empirical `alpha` quantile, reordering `samples` in place.
///
/// Uses selection rather than a full sort, so the cost is linear in the
/// sample size. The slice order afterwards is unspecified.
///
/// # Examples
///
/// ```
/// use pfe_core::math::statistics::empirical_quantile;
///
/// let mut xs: Vec<f64> = (1..=100).map(f64::from).collect();
/// assert_eq!(empirical_quantile(&mut xs, 0.95).unwrap(), 95.0);
/// ```
///
/// # Errors
///
/// Same as [`quantile_sorted`].
pub fn empirical_quantile(samples: &mut [f64], alpha: f64) -> Result<f64> {
    ensure_confidence(alpha)?;
    if samples.is_empty() {
        return Err(PfeError::NumericalDegeneracy(
            "quantile of an empty sample".to_string(),
        ));
    }
    let rank = quantile_rank(alpha, samples.len());
    let (_, value, _) = samples.select_nth_unstable_by(rank, |a, b| a.total_cmp(b));
    Ok(*value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_mean() {
        assert_relative_eq!(mean(&[1.0, 2.0, 3.0, 4.0]).unwrap(), 2.5);
        assert!(mean(&[]).is_err());
    }

    #[test]
    fn test_sample_std_uses_n_minus_one() {
        // deviations -1.5, -0.5, 0.5, 1.5 -> ss = 5, var = 5/3
        let s = sample_std(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_relative_eq!(s, (5.0_f64 / 3.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_sample_std_degenerate() {
        assert!(matches!(
            sample_std(&[1.0]),
            Err(PfeError::NumericalDegeneracy(_))
        ));
        assert!(sample_std(&[]).is_err());
        assert_eq!(sample_std(&[2.0, 2.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_quantile_rank() {
        assert_eq!(quantile_rank(0.95, 100), 94);
        assert_eq!(quantile_rank(0.951, 100), 95);
        assert_eq!(quantile_rank(0.5, 1), 0);
        assert_eq!(quantile_rank(0.001, 10), 0);
        assert_eq!(quantile_rank(0.999, 10), 9);
    }

    #[test]
    fn test_empirical_quantile_matches_sorted() {
        let mut xs = vec![5.0_f64, 1.0, 4.0, 2.0, 3.0];
        let mut sorted = xs.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));

        for alpha in [0.1, 0.2, 0.5, 0.6, 0.99] {
            let q = empirical_quantile(&mut xs, alpha).unwrap();
            assert_eq!(q, quantile_sorted(&sorted, alpha).unwrap());
        }
        // ceil(0.5 * 5) - 1 = 2
        assert_eq!(quantile_sorted(&sorted, 0.5).unwrap(), 3.0);
    }

    #[test]
    fn test_quantile_rejects_bad_alpha() {
        let mut xs = vec![1.0, 2.0];
        assert!(empirical_quantile(&mut xs, 0.0).unwrap_err().is_invalid_parameter());
        assert!(empirical_quantile(&mut xs, 1.0).unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_quantile_with_ties_at_zero() {
        let mut xs = vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 2.0, 3.0];
        // ceil(6.5) - 1 = 6, ceil(7.5) - 1 = 7
        assert_eq!(empirical_quantile(&mut xs, 0.65).unwrap(), 0.0);
        assert_eq!(empirical_quantile(&mut xs, 0.75).unwrap(), 1.0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_quantile_covers_alpha(
            xs in prop::collection::vec(-1e3f64..1e3, 1..200),
            alpha in 0.01f64..0.99,
        ) {
            let mut work = xs.clone();
            let q = empirical_quantile(&mut work, alpha).unwrap();
            let below = xs.iter().filter(|&&x| x <= q).count() as f64;
            prop_assert!(below >= alpha * xs.len() as f64 - 1e-9);
            prop_assert!(xs.contains(&q));
        }

        #[test]
        fn prop_quantile_monotone_in_alpha(
            xs in prop::collection::vec(0.0f64..100.0, 2..100),
            a in 0.01f64..0.98,
            da in 0.0f64..0.01,
        ) {
            let mut w1 = xs.clone();
            let mut w2 = xs.clone();
            let lo = empirical_quantile(&mut w1, a).unwrap();
            let hi = empirical_quantile(&mut w2, a + da).unwrap();
            prop_assert!(hi >= lo);
        }
    }
}
