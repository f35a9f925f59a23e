//! Monte Carlo simulation configuration.

use pfe_core::types::{PfeError, Result};

/// Maximum number of base draws per estimation call.
pub const MAX_SAMPLES: usize = 10_000_000;

/// Fails with `InvalidParameter` unless `0 < num_samples <= MAX_SAMPLES`.
pub fn validate_num_samples(num_samples: usize) -> Result<()> {
    if num_samples == 0 || num_samples > MAX_SAMPLES {
        return Err(PfeError::invalid(
            "num_samples",
            format!("must be in range [1, {}], got {}", MAX_SAMPLES, num_samples),
        ));
    }
    Ok(())
}

/// Classical simulation settings.
///
/// Use [`SimulationConfig::builder`] to construct instances.
///
/// # Examples
///
/// ```rust
/// use pfe_kernel::mc::SimulationConfig;
///
/// let config = SimulationConfig::builder()
///     .num_samples(10_000)
///     .seed(42)
///     .build()
///     .expect("valid configuration");
///
/// assert!(config.antithetic());
/// assert_eq!(config.samples_used(), 20_000);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationConfig {
    num_samples: usize,
    antithetic: bool,
    seed: Option<u64>,
}

impl SimulationConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::default()
    }

    /// Number of base normal draws per asset.
    #[inline]
    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    /// Whether each draw is paired with its negation.
    #[inline]
    pub fn antithetic(&self) -> bool {
        self.antithetic
    }

    /// Optional seed for reproducibility.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Number of scenarios actually produced.
    #[inline]
    pub fn samples_used(&self) -> usize {
        if self.antithetic {
            2 * self.num_samples
        } else {
            self.num_samples
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if `num_samples` is 0 or greater than [`MAX_SAMPLES`].
    pub fn validate(&self) -> Result<()> {
        validate_num_samples(self.num_samples)
    }
}

/// Builder for [`SimulationConfig`].
///
/// Antithetic sampling is on unless switched off.
#[derive(Clone, Debug)]
pub struct SimulationConfigBuilder {
    num_samples: Option<usize>,
    antithetic: bool,
    seed: Option<u64>,
}

impl Default for SimulationConfigBuilder {
    fn default() -> Self {
        Self {
            num_samples: None,
            antithetic: true,
            seed: None,
        }
    }
}

impl SimulationConfigBuilder {
    /// Sets the number of base draws.
    #[inline]
    pub fn num_samples(mut self, num_samples: usize) -> Self {
        self.num_samples = Some(num_samples);
        self
    }

    /// Enables or disables antithetic pairing.
    #[inline]
    pub fn antithetic(mut self, antithetic: bool) -> Self {
        self.antithetic = antithetic;
        self
    }

    /// Sets the seed for reproducibility.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets or clears the seed.
    #[inline]
    pub fn maybe_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if `num_samples` is unset or out of range.
    pub fn build(self) -> Result<SimulationConfig> {
        let num_samples = self
            .num_samples
            .ok_or_else(|| PfeError::invalid("num_samples", "must be specified"))?;

        let config = SimulationConfig {
            num_samples,
            antithetic: self.antithetic,
            seed: self.seed,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = SimulationConfig::builder().num_samples(1000).build().unwrap();
        assert_eq!(config.num_samples(), 1000);
        assert!(config.antithetic());
        assert_eq!(config.seed(), None);
        assert_eq!(config.samples_used(), 2000);
    }

    #[test]
    fn test_builder_plain_sampling() {
        let config = SimulationConfig::builder()
            .num_samples(500)
            .antithetic(false)
            .seed(7)
            .build()
            .unwrap();
        assert_eq!(config.samples_used(), 500);
        assert_eq!(config.seed(), Some(7));
    }

    #[test]
    fn test_builder_missing_samples() {
        let err = SimulationConfig::builder().build().unwrap_err();
        assert!(matches!(
            err,
            PfeError::InvalidParameter {
                name: "num_samples",
                ..
            }
        ));
    }

    #[test]
    fn test_num_samples_bounds() {
        assert!(validate_num_samples(0).is_err());
        assert!(validate_num_samples(1).is_ok());
        assert!(validate_num_samples(MAX_SAMPLES).is_ok());
        assert!(validate_num_samples(MAX_SAMPLES + 1).is_err());
    }
}
