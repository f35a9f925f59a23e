//! Counterparty credit parameters.

use pfe_core::types::{PfeError, Result};

/// Flat hazard rate and loss given default of a counterparty.
///
/// Survival to `t` is `Q(t) = exp(-λt)`.
///
/// # Examples
///
/// ```
/// use pfe_risk::CreditParams;
///
/// let credit = CreditParams::new(0.02, 0.6).unwrap();
/// assert!((credit.survival_prob(1.0) - 0.9802).abs() < 1e-4);
/// assert!((credit.recovery_rate() - 0.4).abs() < 1e-12);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreditParams {
    hazard_rate: f64,
    lgd: f64,
}

impl CreditParams {
    /// Creates credit parameters.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if `hazard_rate` is negative or not finite, or if
    /// `lgd` lies outside `[0, 1]`.
    pub fn new(hazard_rate: f64, lgd: f64) -> Result<Self> {
        if !hazard_rate.is_finite() || hazard_rate < 0.0 {
            return Err(PfeError::invalid(
                "hazard_rate",
                format!("must be finite and non-negative, got {}", hazard_rate),
            ));
        }
        if !(0.0..=1.0).contains(&lgd) {
            return Err(PfeError::invalid(
                "lgd",
                format!("must lie in [0, 1], got {}", lgd),
            ));
        }
        Ok(Self { hazard_rate, lgd })
    }

    /// Annualised hazard rate.
    #[inline]
    pub fn hazard_rate(&self) -> f64 {
        self.hazard_rate
    }

    /// Loss given default.
    #[inline]
    pub fn lgd(&self) -> f64 {
        self.lgd
    }

    /// `1 - lgd`.
    #[inline]
    pub fn recovery_rate(&self) -> f64 {
        1.0 - self.lgd
    }

    /// Survival probability to `t`.
    #[inline]
    pub fn survival_prob(&self, t: f64) -> f64 {
        (-self.hazard_rate * t).exp()
    }

    /// Default probability by `t`.
    #[inline]
    pub fn default_prob(&self, t: f64) -> f64 {
        1.0 - self.survival_prob(t)
    }

    /// Probability of default in `(t1, t2]`.
    #[inline]
    pub fn marginal_default_prob(&self, t1: f64, t2: f64) -> f64 {
        self.survival_prob(t1) - self.survival_prob(t2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_validation() {
        assert!(CreditParams::new(0.0, 0.0).is_ok());
        assert!(CreditParams::new(0.05, 1.0).is_ok());

        match CreditParams::new(-0.01, 0.6) {
            Err(PfeError::InvalidParameter { name, .. }) => assert_eq!(name, "hazard_rate"),
            other => panic!("expected hazard_rate error, got {:?}", other),
        }
        match CreditParams::new(0.01, 1.2) {
            Err(PfeError::InvalidParameter { name, .. }) => assert_eq!(name, "lgd"),
            other => panic!("expected lgd error, got {:?}", other),
        }
        assert!(CreditParams::new(f64::INFINITY, 0.6).is_err());
        assert!(CreditParams::new(0.01, f64::NAN).is_err());
    }

    #[test]
    fn test_default_probabilities() {
        let credit = CreditParams::new(0.03, 0.6).unwrap();
        assert_eq!(credit.survival_prob(0.0), 1.0);
        assert_relative_eq!(
            credit.default_prob(2.0),
            1.0 - (-0.06_f64).exp(),
            epsilon = 1e-15
        );
        assert_relative_eq!(
            credit.marginal_default_prob(0.0, 1.0) + credit.marginal_default_prob(1.0, 2.0),
            credit.default_prob(2.0),
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_zero_hazard_never_defaults() {
        let credit = CreditParams::new(0.0, 0.6).unwrap();
        assert_eq!(credit.marginal_default_prob(0.0, 10.0), 0.0);
    }
}
