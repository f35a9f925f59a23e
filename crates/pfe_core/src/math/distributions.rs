//! Standard normal distribution functions.
//!
//! Closed-form moments of the basket value are normal, so the discretiser
//! needs Φ to assign bin probabilities without sampling.

/// Square root of 2.
const SQRT_2: f64 = std::f64::consts::SQRT_2;

/// 1 / sqrt(2 * pi)
const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Complementary error function, Abramowitz and Stegun 7.1.26.
///
/// Maximum absolute error 1.5e-7 for all x.
#[inline]
fn erfc_approx(x: f64) -> f64 {
    const A1: f64 = 0.254_829_592;
    const A2: f64 = -0.284_496_736;
    const A3: f64 = 1.421_413_741;
    const A4: f64 = -1.453_152_027;
    const A5: f64 = 1.061_405_429;
    const P: f64 = 0.327_591_1;

    let abs_x = x.abs();
    let t = 1.0 / (1.0 + P * abs_x);

    // Horner
    let poly = A1 + t * (A2 + t * (A3 + t * (A4 + t * A5)));
    let erfc_abs = t * poly * (-abs_x * abs_x).exp();

    if x < 0.0 {
        2.0 - erfc_abs
    } else {
        erfc_abs
    }
}

/// Standard normal cumulative distribution function.
///
/// Computes Φ(x) = P(X <= x) for X ~ N(0, 1) as `0.5 * erfc(-x / sqrt(2))`.
///
/// Non-decreasing in `x` and bounded to `[0, 1]`; infinities map to the
/// endpoints.
///
/// # Examples
/// ```
/// use pfe_core::math::distributions::norm_cdf;
///
/// assert!((norm_cdf(0.0) - 0.5).abs() < 1e-7);
/// assert!(norm_cdf(-3.0) < 0.01);
/// assert_eq!(norm_cdf(f64::INFINITY), 1.0);
/// ```
#[inline]
pub fn norm_cdf(x: f64) -> f64 {
    if x == f64::INFINITY {
        return 1.0;
    }
    if x == f64::NEG_INFINITY {
        return 0.0;
    }
    (0.5 * erfc_approx(-x / SQRT_2)).clamp(0.0, 1.0)
}

/// Standard normal probability density function.
///
/// # Examples
/// ```
/// use pfe_core::math::distributions::norm_pdf;
///
/// assert!((norm_pdf(0.0) - 0.3989422804).abs() < 1e-9);
/// ```
#[inline]
pub fn norm_pdf(x: f64) -> f64 {
    FRAC_1_SQRT_2PI * (-0.5 * x * x).exp()
}

/// CDF of N(mean, std²) evaluated at `x`.
///
/// `std` must be strictly positive.
#[inline]
pub fn normal_cdf(x: f64, mean: f64, std: f64) -> f64 {
    norm_cdf((x - mean) / std)
}
