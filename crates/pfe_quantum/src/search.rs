//! Bisection quantile search over bin indices.
//!
//! Finds the smallest bin value `y` with `P(E <= y) >= alpha`, querying an
//! oracle for `P(E <= y)`. The predicate is monotone for any valid CDF, so
//! `ceil(log2(n))` queries suffice for exact oracles. Noisy oracles may
//! answer non-monotonically; the search still terminates in the same number
//! of steps.

use pfe_core::types::{ensure_confidence, PfeError, Result};
use tracing::debug;

use crate::distribution::DiscretizedDistribution;
use crate::oracle::{CumulativeProbabilityOracle, ExactCdfOracle};

/// Result of a successful quantile search.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuantileEstimate {
    /// Bin value at the located index.
    pub threshold: f64,
    /// Oracle answer at `threshold`.
    pub achieved_probability: f64,
    /// Located bin index.
    pub bin_index: usize,
    /// Number of oracle queries made.
    pub oracle_calls: usize,
}

/// Locates the `alpha` quantile of `dist` using `oracle`.
///
/// # Errors
///
/// - `InvalidParameter` for `alpha` outside (0, 1).
/// - `QuantileNotFound` when even the largest bin falls short of `alpha`;
///   the error carries the largest bin value and its probability.
/// - Any error the oracle returns.
///
/// # Examples
///
/// ```rust
/// use pfe_quantum::{find_quantile, DiscretizedDistribution, ExactCdfOracle};
///
/// let dist = DiscretizedDistribution::from_parts(
///     (1..=8).map(f64::from).collect(),
///     vec![0.125; 8],
/// )
/// .unwrap();
///
/// let q = find_quantile(&dist, 0.25, &mut ExactCdfOracle::new(&dist)).unwrap();
/// assert_eq!(q.threshold, 2.0);
/// assert_eq!(q.bin_index, 1);
/// ```
pub fn find_quantile<O>(
    dist: &DiscretizedDistribution,
    alpha: f64,
    oracle: &mut O,
) -> Result<QuantileEstimate>
where
    O: CumulativeProbabilityOracle + ?Sized,
{
    ensure_confidence(alpha)?;
    let values = dist.bin_values();
    if values.is_empty() {
        return Err(PfeError::invalid("num_bins", "distribution has no bins"));
    }

    let mut lo = 0usize;
    let mut hi = values.len() - 1;
    let mut calls = 0usize;
    // Oracle answer at the current `hi`, once `hi` has moved.
    let mut p_hi: Option<f64> = None;

    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let p = oracle.cumulative_probability(values[mid])?;
        calls += 1;
        debug!(lo, hi, mid, threshold = values[mid], p, "bisection step");

        if p >= alpha {
            hi = mid;
            p_hi = Some(p);
        } else {
            lo = mid + 1;
        }
    }

    let achieved_probability = match p_hi {
        Some(p) => p,
        None => {
            calls += 1;
            oracle.cumulative_probability(values[lo])?
        }
    };

    if achieved_probability < alpha {
        return Err(PfeError::QuantileNotFound {
            alpha,
            threshold: values[lo],
            achieved_probability,
        });
    }

    Ok(QuantileEstimate {
        threshold: values[lo],
        achieved_probability,
        bin_index: lo,
        oracle_calls: calls,
    })
}

/// Quantile search with the exact cumulative-sum oracle.
pub fn exact_quantile(dist: &DiscretizedDistribution, alpha: f64) -> Result<QuantileEstimate> {
    find_quantile(dist, alpha, &mut ExactCdfOracle::new(dist))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform8() -> DiscretizedDistribution {
        DiscretizedDistribution::from_parts((1..=8).map(f64::from).collect(), vec![0.125; 8])
            .unwrap()
    }

    #[test]
    fn test_breakpoints_exact() {
        let dist = uniform8();
        for k in 1..=8 {
            let alpha = k as f64 / 8.0;
            if alpha >= 1.0 {
                continue;
            }
            let q = exact_quantile(&dist, alpha).unwrap();
            assert_eq!(q.bin_index, k - 1, "alpha = {}", alpha);
            assert_eq!(q.threshold, k as f64);
        }
    }

    #[test]
    fn test_just_above_breakpoint_moves_up() {
        let dist = uniform8();
        let q = exact_quantile(&dist, 0.25 + 1e-9).unwrap();
        assert_eq!(q.bin_index, 2);
        let q = exact_quantile(&dist, 0.25 - 1e-9).unwrap();
        assert_eq!(q.bin_index, 1);
    }

    #[test]
    fn test_call_count_is_logarithmic() {
        let dist = uniform8();
        let q = exact_quantile(&dist, 0.3).unwrap();
        assert_eq!(q.oracle_calls, 3);
    }

    #[test]
    fn test_top_bin_needs_final_query() {
        let dist = uniform8();
        let q = exact_quantile(&dist, 0.95).unwrap();
        assert_eq!(q.bin_index, 7);
        assert_eq!(q.achieved_probability, 1.0);
        assert_eq!(q.oracle_calls, 4);
    }

    #[test]
    fn test_quantile_not_found() {
        let dist = uniform8();
        // Under-reporting oracle
        let mut oracle = |_t: f64| 0.5;
        match find_quantile(&dist, 0.9, &mut oracle) {
            Err(PfeError::QuantileNotFound {
                alpha,
                threshold,
                achieved_probability,
            }) => {
                assert_eq!(alpha, 0.9);
                assert_eq!(threshold, 8.0);
                assert_eq!(achieved_probability, 0.5);
            }
            other => panic!("expected QuantileNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_alpha_queries_nothing() {
        let dist = uniform8();
        let mut calls = 0;
        let mut oracle = |_t: f64| {
            calls += 1;
            1.0
        };
        assert!(find_quantile(&dist, 1.0, &mut oracle)
            .unwrap_err()
            .is_invalid_parameter());
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_single_bin() {
        let dist = DiscretizedDistribution::from_parts(vec![3.0], vec![1.0]).unwrap();
        let q = exact_quantile(&dist, 0.5).unwrap();
        assert_eq!(q.threshold, 3.0);
        assert_eq!(q.oracle_calls, 1);
    }

    #[test]
    fn test_oracle_error_propagates() {
        struct Failing;
        impl CumulativeProbabilityOracle for Failing {
            fn cumulative_probability(&mut self, _threshold: f64) -> Result<f64> {
                Err(PfeError::NumericalDegeneracy("broken".to_string()))
            }
        }
        let dist = uniform8();
        assert!(matches!(
            find_quantile(&dist, 0.5, &mut Failing),
            Err(PfeError::NumericalDegeneracy(_))
        ));
    }
}
