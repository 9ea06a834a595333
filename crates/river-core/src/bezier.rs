//! Pure Bezier math: Bernstein-form evaluation for any number of control points.
//!
//! The same evaluation drives the ribbon tessellation (the geometry stage
//! runs the identical formula on the GPU) and the particle emission anchors,
//! so it must stay deterministic and side-effect free.

use crate::Vec3;
use serde::Serialize;

/// Upper bound on emission samples per frame, reached only with extreme flow speeds.
pub const MAX_EMISSION_SAMPLES: usize = 1024;

/// A sampled point along a Bezier curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurveSample {
    pub position: Vec3,
    /// Unit tangent (zero where the curve is degenerate).
    pub tangent: Vec3,
    /// Curve parameter of this sample.
    pub t: f32,
}

/// Evaluate the Bezier curve defined by `points` at parameter `t`.
///
/// Uses the explicit Bernstein form of degree `n - 1`, building each binomial
/// coefficient from the previous one. Values of `t` outside `[0, 1]`
/// extrapolate the polynomial. An empty point list evaluates to the origin.
pub fn bezier_point(points: &[Vec3], t: f32) -> Vec3 {
    let n = points.len();
    let mut result = Vec3::ZERO;
    let mut c = 1.0_f32;
    for (i, &point) in points.iter().enumerate() {
        if i > 0 {
            // Multiply before dividing so integer-valued coefficients stay exact
            c = c * (n - i) as f32 / i as f32;
        }
        let weight = c * (1.0 - t).powi((n - 1 - i) as i32) * t.powi(i as i32);
        result += point * weight;
    }
    result
}

/// First derivative of the curve at `t` (the hodograph).
///
/// Zero when fewer than two control points are given.
pub fn bezier_derivative(points: &[Vec3], t: f32) -> Vec3 {
    let n = points.len();
    if n < 2 {
        return Vec3::ZERO;
    }
    let deltas: Vec<Vec3> = points.windows(2).map(|w| w[1] - w[0]).collect();
    bezier_point(&deltas, t) * (n - 1) as f32
}

/// Sample `count` evenly spaced points from `t = 0` to `t = 1` inclusive.
pub fn sample_bezier(points: &[Vec3], count: usize) -> Vec<CurveSample> {
    match count {
        0 => Vec::new(),
        1 => vec![sample_at(points, 0.0)],
        _ => (0..count)
            .map(|i| sample_at(points, i as f32 / (count - 1) as f32))
            .collect(),
    }
}

/// Sample the curve at a single parameter, with its unit tangent.
pub fn sample_at(points: &[Vec3], t: f32) -> CurveSample {
    CurveSample {
        position: bezier_point(points, t),
        tangent: bezier_derivative(points, t).normalized(),
        t,
    }
}

/// Curve parameters at which the splash effect is emitted for a given flow speed.
///
/// Produces `offset, offset + 1/speed, offset + 2/speed, ...` while the value
/// stays within 1. A non-positive or non-finite speed emits nothing.
pub fn emission_parameters(speed: f32, offset: f32) -> Vec<f32> {
    if !speed.is_finite() || !offset.is_finite() || speed <= 0.0 {
        return Vec::new();
    }
    let step = 1.0 / speed;
    let mut params = Vec::new();
    for k in 0..MAX_EMISSION_SAMPLES {
        let t = offset + k as f32 * step;
        if t > 1.0 {
            break;
        }
        params.push(t);
    }
    params
}
