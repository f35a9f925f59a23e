//! Terminal-price scenario generation.
//!
//! Normal draws are held separately from prices so the same draws can be
//! mapped to several horizons (see [`ScenarioBatch::at_horizon`]).

use pfe_core::types::{PortfolioSpec, Result};

use super::config::validate_num_samples;
use crate::rng::ScenarioRng;

/// Independent standard normal draws for the two assets.
///
/// Under antithetic pairing only the `base_len()` positive draws are stored;
/// scenarios `[base_len, 2 * base_len)` use the negated draws.
#[derive(Clone, Debug)]
pub struct StandardNormalPairs {
    z1: Vec<f64>,
    z2: Vec<f64>,
    antithetic: bool,
}

impl StandardNormalPairs {
    /// Draws `num_samples` pairs, interleaving `z1[i]`, `z2[i]`.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if `num_samples` is 0 or too large. Nothing is drawn
    /// in that case.
    pub fn draw(num_samples: usize, antithetic: bool, rng: &mut ScenarioRng) -> Result<Self> {
        validate_num_samples(num_samples)?;

        let mut z1 = Vec::with_capacity(num_samples);
        let mut z2 = Vec::with_capacity(num_samples);
        for _ in 0..num_samples {
            z1.push(rng.gen_normal());
            z2.push(rng.gen_normal());
        }

        Ok(Self { z1, z2, antithetic })
    }

    /// Number of stored draws per asset.
    #[inline]
    pub fn base_len(&self) -> usize {
        self.z1.len()
    }

    /// Number of scenarios these draws expand to.
    #[inline]
    pub fn len(&self) -> usize {
        if self.antithetic {
            2 * self.base_len()
        } else {
            self.base_len()
        }
    }

    /// Always false for a successfully drawn set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.z1.is_empty()
    }

    /// Whether negated draws are appended.
    #[inline]
    pub fn antithetic(&self) -> bool {
        self.antithetic
    }

    /// Iterates `(z1, z2)` over all scenarios, positive half first.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        let positive = self.z1.iter().copied().zip(self.z2.iter().copied());
        let negative = self
            .z1
            .iter()
            .zip(self.z2.iter())
            .map(|(&a, &b)| (-a, -b))
            .take(if self.antithetic { self.base_len() } else { 0 });
        positive.chain(negative)
    }
}

/// Terminal prices of the two assets, one entry per scenario.
#[derive(Clone, Debug, PartialEq)]
pub struct ScenarioBatch {
    /// Asset 1 prices.
    pub s1: Vec<f64>,
    /// Asset 2 prices.
    pub s2: Vec<f64>,
}

impl ScenarioBatch {
    /// Maps the draws to prices at horizon `t` under the additive normal model.
    pub fn at_horizon(spec: &PortfolioSpec, pairs: &StandardNormalPairs, t: f64) -> Self {
        let [a1, a2] = spec.assets;
        let (s1, s2): (Vec<f64>, Vec<f64>) = pairs
            .iter()
            .map(|(z1, z2)| (a1.price_at(t, z1), a2.price_at(t, z2)))
            .unzip();
        Self { s1, s2 }
    }

    /// Number of scenarios.
    #[inline]
    pub fn len(&self) -> usize {
        self.s1.len()
    }

    /// True when the batch holds no scenarios.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.s1.is_empty()
    }
}

/// Draws terminal-price scenarios at `spec.tau` with an explicit generator.
///
/// Produces `num_samples` scenarios, or `2 * num_samples` when `antithetic`.
///
/// # Errors
///
/// `InvalidParameter` if `sigma <= 0`, `tau <= 0` or `num_samples` is out of
/// range. Validation runs before the first draw.
pub fn generate_with_rng(
    spec: &PortfolioSpec,
    num_samples: usize,
    antithetic: bool,
    rng: &mut ScenarioRng,
) -> Result<ScenarioBatch> {
    spec.validate_model()?;
    let pairs = StandardNormalPairs::draw(num_samples, antithetic, rng)?;
    Ok(ScenarioBatch::at_horizon(spec, &pairs, spec.tau))
}

/// Draws terminal-price scenarios from a freshly seeded generator.
///
/// # Examples
///
/// ```rust
/// use pfe_core::types::PortfolioSpec;
/// use pfe_kernel::mc::generate;
///
/// let batch = generate(&PortfolioSpec::default(), 100, true, 42).unwrap();
/// assert_eq!(batch.len(), 200);
/// ```
pub fn generate(
    spec: &PortfolioSpec,
    num_samples: usize,
    antithetic: bool,
    seed: u64,
) -> Result<ScenarioBatch> {
    let mut rng = ScenarioRng::from_seed(seed);
    generate_with_rng(spec, num_samples, antithetic, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pfe_core::types::AssetModel;

    #[test]
    fn test_antithetic_doubles_and_mirrors() {
        let spec = PortfolioSpec::default();
        let batch = generate(&spec, 50, true, 1).unwrap();
        assert_eq!(batch.len(), 100);

        // Mirror around the drift-adjusted mean
        let centre = spec.assets[0].mean_at(spec.tau);
        for i in 0..50 {
            assert_relative_eq!(
                batch.s1[i] - centre,
                -(batch.s1[i + 50] - centre),
                epsilon = 1e-10
            );
        }
    }

    #[test]
    fn test_plain_sampling_length() {
        let batch = generate(&PortfolioSpec::default(), 50, false, 1).unwrap();
        assert_eq!(batch.len(), 50);
        assert_eq!(batch.s2.len(), 50);
    }

    #[test]
    fn test_same_seed_bit_identical() {
        let spec = PortfolioSpec::default();
        let a = generate(&spec, 1000, true, 99).unwrap();
        let b = generate(&spec, 1000, true, 99).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_antithetic_prefix_matches_plain() {
        let spec = PortfolioSpec::default();
        let plain = generate(&spec, 20, false, 5).unwrap();
        let anti = generate(&spec, 20, true, 5).unwrap();
        assert_eq!(&anti.s1[..20], &plain.s1[..]);
        assert_eq!(&anti.s2[..20], &plain.s2[..]);
    }

    #[test]
    fn test_rejects_invalid_inputs_without_drawing() {
        let mut rng = ScenarioRng::from_seed(0);

        let zero_sigma = PortfolioSpec::default().with_assets(
            AssetModel::new(100.0, 0.05, 0.0),
            AssetModel::new(100.0, 0.05, 0.2),
        );
        assert!(generate_with_rng(&zero_sigma, 10, true, &mut rng)
            .unwrap_err()
            .is_invalid_parameter());

        let zero_tau = PortfolioSpec::default().with_tau(0.0);
        assert!(generate_with_rng(&zero_tau, 10, true, &mut rng).is_err());

        assert!(generate_with_rng(&PortfolioSpec::default(), 0, true, &mut rng).is_err());

        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_at_horizon_reuses_draws() {
        let spec = PortfolioSpec::default();
        let mut rng = ScenarioRng::from_seed(3);
        let pairs = StandardNormalPairs::draw(10, false, &mut rng).unwrap();

        let t0 = ScenarioBatch::at_horizon(&spec, &pairs, 0.0);
        assert!(t0.s1.iter().all(|&s| (s - 100.0).abs() < 1e-12));

        let t1 = ScenarioBatch::at_horizon(&spec, &pairs, 1.0);
        let t4 = ScenarioBatch::at_horizon(&spec, &pairs, 4.0);
        for i in 0..10 {
            // Shock scales with sqrt(t)
            let d1 = t1.s1[i] - spec.assets[0].mean_at(1.0);
            let d4 = t4.s1[i] - spec.assets[0].mean_at(4.0);
            assert_relative_eq!(d4, 2.0 * d1, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_pairs_iter_order() {
        let mut rng = ScenarioRng::from_seed(11);
        let pairs = StandardNormalPairs::draw(3, true, &mut rng).unwrap();
        let all: Vec<(f64, f64)> = pairs.iter().collect();
        assert_eq!(all.len(), 6);
        for i in 0..3 {
            assert_eq!(all[i + 3].0, -all[i].0);
            assert_eq!(all[i + 3].1, -all[i].1);
        }
    }
}
