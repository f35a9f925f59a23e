//! Immutable portfolio specification for the two-asset basket call.
//!
//! A [`PortfolioSpec`] is a plain value: built once per estimation call,
//! passed by reference, never mutated or merged with shared defaults.

use super::error::{ensure_confidence, ensure_finite, ensure_positive, Result};

/// Additive normal model for a single asset.
///
/// The terminal price at horizon `t` is
///
/// ```text
/// S(t) = s0 + mu * t + sigma * sqrt(t) * Z,    Z ~ N(0, 1)
/// ```
///
/// # Examples
///
/// ```
/// use pfe_core::types::AssetModel;
///
/// let asset = AssetModel::new(100.0, 0.05, 0.2);
/// assert_eq!(asset.price_at(1.0, 0.0), 100.05);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssetModel {
    /// Initial price (currency units).
    pub s0: f64,
    /// Drift per unit time.
    pub mu: f64,
    /// Volatility per unit time. Must be strictly positive.
    pub sigma: f64,
}

impl AssetModel {
    /// Creates a new asset model.
    #[inline]
    pub fn new(s0: f64, mu: f64, sigma: f64) -> Self {
        Self { s0, mu, sigma }
    }

    /// Terminal price at horizon `t` for the standard normal draw `z`.
    #[inline]
    pub fn price_at(&self, t: f64, z: f64) -> f64 {
        self.s0 + self.mu * t + self.sigma * t.sqrt() * z
    }

    /// Mean of the terminal price at horizon `t`.
    #[inline]
    pub fn mean_at(&self, t: f64) -> f64 {
        self.s0 + self.mu * t
    }

    /// Standard deviation of the terminal price at horizon `t`.
    #[inline]
    pub fn std_at(&self, t: f64) -> f64 {
        self.sigma * t.sqrt()
    }

    fn validate(&self) -> Result<()> {
        ensure_finite("s0", self.s0)?;
        ensure_finite("mu", self.mu)?;
        ensure_positive("sigma", self.sigma)
    }
}

impl Default for AssetModel {
    fn default() -> Self {
        Self {
            s0: 100.0,
            mu: 0.05,
            sigma: 0.2,
        }
    }
}

/// Two-asset basket call specification.
///
/// Exposure at the horizon is `E = max(w1*S1 + w2*S2 - strike, 0)` with the
/// two assets simulated independently.
///
/// # Invariants
///
/// - `sigma > 0` for both assets
/// - `tau > 0`
/// - `0 < alpha < 1`
///
/// Construction does not validate; every estimator calls [`validate`] (or
/// [`validate_model`]) before doing any work so that invalid specs fail fast.
///
/// [`validate`]: PortfolioSpec::validate
/// [`validate_model`]: PortfolioSpec::validate_model
///
/// # Examples
///
/// ```
/// use pfe_core::types::{AssetModel, PortfolioSpec};
///
/// let spec = PortfolioSpec::basket(0.5, 0.5, 100.0, AssetModel::new(100.0, 0.05, 0.2), 1.0, 0.95);
/// assert!(spec.validate().is_ok());
///
/// let bad = spec.with_alpha(1.5);
/// assert!(bad.validate().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortfolioSpec {
    /// Weight of asset 1 (unitless, need not sum to 1 with `w2`).
    pub w1: f64,
    /// Weight of asset 2.
    pub w2: f64,
    /// Basket strike K (currency units).
    pub strike: f64,
    /// Per-asset models.
    pub assets: [AssetModel; 2],
    /// Time horizon in years.
    pub tau: f64,
    /// Confidence level for PFE.
    pub alpha: f64,
}

impl PortfolioSpec {
    /// Creates a basket whose two assets share the same model.
    #[inline]
    pub fn basket(w1: f64, w2: f64, strike: f64, asset: AssetModel, tau: f64, alpha: f64) -> Self {
        Self {
            w1,
            w2,
            strike,
            assets: [asset, asset],
            tau,
            alpha,
        }
    }

    /// Returns a copy with per-asset models replaced.
    #[inline]
    pub fn with_assets(mut self, asset1: AssetModel, asset2: AssetModel) -> Self {
        self.assets = [asset1, asset2];
        self
    }

    /// Returns a copy with a different confidence level.
    #[inline]
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Returns a copy with a different horizon.
    #[inline]
    pub fn with_tau(mut self, tau: f64) -> Self {
        self.tau = tau;
        self
    }

    /// Validates the model parameters (everything except `alpha`).
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if a weight, strike, price or drift is not finite,
    /// if either `sigma <= 0`, or if `tau <= 0`.
    pub fn validate_model(&self) -> Result<()> {
        ensure_finite("w1", self.w1)?;
        ensure_finite("w2", self.w2)?;
        ensure_finite("strike", self.strike)?;
        for asset in &self.assets {
            asset.validate()?;
        }
        ensure_positive("tau", self.tau)
    }

    /// Validates the whole specification, confidence level first.
    pub fn validate(&self) -> Result<()> {
        ensure_confidence(self.alpha)?;
        self.validate_model()
    }

    /// Mean of the basket value `V = w1*S1 + w2*S2 - K` at the horizon.
    pub fn basket_mean(&self) -> f64 {
        self.w1 * self.assets[0].mean_at(self.tau) + self.w2 * self.assets[1].mean_at(self.tau)
            - self.strike
    }

    /// Standard deviation of the basket value at the horizon.
    ///
    /// The assets are independent, so variances add.
    pub fn basket_std(&self) -> f64 {
        let v1 = self.w1 * self.assets[0].std_at(self.tau);
        let v2 = self.w2 * self.assets[1].std_at(self.tau);
        (v1 * v1 + v2 * v2).sqrt()
    }
}

impl Default for PortfolioSpec {
    /// Equal-weight at-the-money basket: `w = 0.5/0.5`, `K = s0 = 100`,
    /// `mu = 0.05`, `sigma = 0.2`, `tau = 1`, `alpha = 0.95`.
    fn default() -> Self {
        Self::basket(0.5, 0.5, 100.0, AssetModel::default(), 1.0, 0.95)
    }
}
