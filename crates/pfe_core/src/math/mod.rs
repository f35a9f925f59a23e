//! Numerical helpers shared by the estimators.
//!
//! - `distributions`: standard normal CDF and PDF
//! - `statistics`: mean, sample standard deviation, empirical quantile

pub mod distributions;
pub mod statistics;

pub use distributions::{norm_cdf, norm_pdf, normal_cdf};
pub use statistics::{empirical_quantile, mean, quantile_rank, quantile_sorted, sample_std};
