//! Shared numeric normalisation.
//!
//! Every site that can produce an unknown value (interpolation edges,
//! percent-change degenerates, lag edges) routes through [`zero_if_missing`]
//! so the zero-fill policy lives in one place.

/// `NaN` and `±inf` become `0.0`; finite values pass through.
#[inline]
pub fn zero_if_missing(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Round to `decimals` places, ties to even (`rint(x * 10^d) / 10^d`).
///
/// Non-finite values are returned unchanged.
pub fn round_half_even(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round_ties_even() / scale
}
