//! # Random Number Generation
//!
//! Explicitly seeded generators for scenario sampling.
//!
//! - [`ScenarioRng`]: `StdRng` wrapper with seed tracking and a draw counter
//! - [`substream_seed`]: independent per-run seeds from a master seed
//! - [`resolve_seed`]: choose a seed when the caller omitted one
//!
//! Reproducibility comes from threading a seed through every sampling call.
//! Concurrent estimations each construct their own generator.
//!
//! ```rust
//! use pfe_kernel::rng::{substream_seed, ScenarioRng};
//!
//! let master = 42;
//! let mut rng = ScenarioRng::from_seed(substream_seed(master, 3));
//! let mut buffer = vec![0.0; 1000];
//! rng.fill_normal(&mut buffer);
//! ```

mod prng;
mod seed;

pub use prng::ScenarioRng;
pub use seed::{resolve_seed, substream_seed};
