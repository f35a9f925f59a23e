//! Credit valuation adjustment.
//!
//! - [`CreditParams`]: flat hazard-rate default model with loss given default
//! - [`compute_cva`]: unilateral CVA from an EE profile
//!
//! ```text
//! CVA = LGD × Σ ½(EE(tᵢ) + EE(tᵢ₊₁)) × PD(tᵢ, tᵢ₊₁)
//! ```

mod credit;
mod cva;

pub use credit::CreditParams;
pub use cva::compute_cva;
