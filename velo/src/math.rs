//! Small numeric helpers shared by the graph store and the route model.

use std::sync::Arc;

/// Integer division rounding towards positive infinity.
///
/// # Panics
///
/// Panics if `y == 0`.
pub fn ceil_div(x: u32, y: u32) -> u32 {
    assert!(y > 0, "ceil_div by zero");
    x.div_ceil(y)
}

/// Value at `x` of the line through `(0, y0)` and `(1, y1)`.
pub fn interpolate(y0: f64, y1: f64, x: f64) -> f64 {
    (y1 - y0).mul_add(x, y0)
}

/// Clamp `v` into `[min, max]`.
///
/// # Panics
///
/// Panics if `min > max`.
pub fn clamp(min: f64, v: f64, max: f64) -> f64 {
    assert!(min <= max, "empty clamp interval [{min}, {max}]");
    v.max(min).min(max)
}

/// Signed length of the projection of `AP` onto `AB`.
pub fn projection_length(a_x: f64, a_y: f64, b_x: f64, b_y: f64, p_x: f64, p_y: f64) -> f64 {
    let (u_x, u_y) = (p_x - a_x, p_y - a_y);
    let (v_x, v_y) = (b_x - a_x, b_y - a_y);
    u_x.mul_add(v_x, u_y * v_y) / v_x.hypot(v_y)
}

/// A piecewise-linear function through evenly spaced samples on `[0, x_max]`.
///
/// Outside that interval the function is constant, equal to the first or last
/// sample. Cloning is cheap: the samples are shared.
#[derive(Debug, Clone)]
pub struct Sampled {
    samples: Arc<[f32]>,
    x_max: f64,
}

impl Sampled {
    /// Build a sampled function.
    ///
    /// # Panics
    ///
    /// Panics if fewer than two samples are given or `x_max` is not positive.
    pub fn new(samples: impl Into<Arc<[f32]>>, x_max: f64) -> Self {
        let samples = samples.into();
        assert!(
            samples.len() >= 2 && x_max > 0.0,
            "a sampled function needs at least 2 samples over a positive domain"
        );
        Self { samples, x_max }
    }

    /// Evaluate the function at `x`.
    pub fn at(&self, x: f64) -> f64 {
        let last = self.samples.len() - 1;
        if x >= self.x_max {
            return self.samples[last] as f64;
        }
        if x <= 0.0 {
            return self.samples[0] as f64;
        }
        let step = self.x_max / last as f64;
        let scaled = x / step;
        let index = (scaled as usize).min(last - 1);
        interpolate(
            self.samples[index] as f64,
            self.samples[index + 1] as f64,
            scaled - index as f64,
        )
    }

    /// The samples the function interpolates.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }
}
