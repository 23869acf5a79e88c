//! # Standard Normal
//!
//! Error function and standard normal CDF.

use std::f64::consts::{FRAC_2_SQRT_PI, SQRT_2};

/// Beyond this magnitude `erf` is ±1 to double precision.
const ERF_SATURATION: f64 = 6.0;

/// Error function.
///
/// Uses the everywhere-convergent series
/// `erf(x) = 2/√π · e^(−x²) · Σ 2ⁿ x^(2n+1) / (1·3·…·(2n+1))`,
/// whose terms are all of one sign, and saturates to ±1 for |x| ≥ 6.
pub fn erf(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if x.abs() >= ERF_SATURATION {
        return x.signum();
    }
    let x2 = x * x;
    let mut term = x;
    let mut sum = x;
    let mut n = 0.0_f64;
    while term.abs() > f64::EPSILON * sum.abs() * 0.25 && n < 500.0 {
        n += 1.0;
        term *= 2.0 * x2 / (2.0 * n + 1.0);
        sum += term;
    }
    FRAC_2_SQRT_PI * (-x2).exp() * sum
}

/// `Φ(z)`, the standard normal cumulative distribution function.
pub fn standard_normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / SQRT_2))
}
