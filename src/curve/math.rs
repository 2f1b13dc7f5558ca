//! Scalar helpers shared by the sampler and the curve builders.

use super::Point;

/// Convert decibels to linear amplitude. Never clamps; the result is always positive.
#[inline]
pub fn decibels_to_amplitude(decibels: f64) -> f64 {
    10.0_f64.powf(decibels / 20.0)
}

/// Cubic ease-in/ease-out with zero slope at both ends.
#[inline]
pub fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

/// Re-map `value` from the `in_min..in_max` range onto `out_min..out_max`
/// along a straight line. Extrapolates outside the input range.
#[inline]
pub fn map_linear(value: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    let t = (value - in_min) / (in_max - in_min);
    t * (out_max - out_min) + out_min
}

/// Signed area under the straight line through `a` and `b`, from `a.x` to `b.x`.
#[inline]
pub fn integrate_linear(a: Point, b: Point) -> f64 {
    -0.5 * (a.x - b.x) * (a.y + b.y)
}
