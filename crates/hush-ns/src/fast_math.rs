//! Fast log/exp approximations for the estimator hot path.
//!
//! Accuracy is traded for speed; the estimators only need the log domain
//! for quantile tracking and flatness ratios, where ~1% error is
//! inconsequential.

use core::f32::consts::{LN_2, LOG2_E};

/// Approximate log2 via the IEEE 754 bit pattern.
///
/// The float's raw bits, read as an integer, are an affine function of
/// `log2(x)` up to mantissa curvature.
///
/// Debug-asserts `x > 0`.
#[inline]
fn fast_log2(x: f32) -> f32 {
    debug_assert!(x > 0.0);
    // 1 / 2^23 and the bias offset.
    x.to_bits() as f32 * 1.192_092_9e-7 - 126.942_695
}

/// Approximate 2^x.
#[inline]
fn fast_exp2(x: f32) -> f32 {
    x.exp2()
}

/// Approximate natural log: `ln(x) = log2(x) · ln(2)`.
#[inline]
pub fn log_approximation(x: f32) -> f32 {
    fast_log2(x) * LN_2
}

/// Approximate e^x: `e^x = 2^(x · log2(e))`.
#[inline]
pub fn exp_approximation(x: f32) -> f32 {
    fast_exp2(x * LOG2_E)
}

/// Batch natural log.
pub fn log_approximation_batch(x: &[f32], y: &mut [f32]) {
    for (xi, yi) in x.iter().zip(y.iter_mut()) {
        *yi = log_approximation(*xi);
    }
}

/// Batch e^x.
pub fn exp_approximation_batch(x: &[f32], y: &mut [f32]) {
    for (xi, yi) in x.iter().zip(y.iter_mut()) {
        *yi = exp_approximation(*xi);
    }
}
