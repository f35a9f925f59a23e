//! Monte Carlo scenario pipeline.
//!
//! ```text
//! SimulationConfig ──► StandardNormalPairs ──► ScenarioBatch ──► exposures
//!   (validation)         (ScenarioRng)          (at_horizon)     (evaluate)
//! ```
//!
//! Each stage is a batch operation over the whole sample; draws, prices and
//! exposures are owned by the estimation call that created them.

mod config;
mod exposure;
mod scenario;

pub use config::{validate_num_samples, SimulationConfig, SimulationConfigBuilder, MAX_SAMPLES};
pub use exposure::{basket_exposure, evaluate};
pub use scenario::{generate, generate_with_rng, ScenarioBatch, StandardNormalPairs};
