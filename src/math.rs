//! Angle and vector utilities for the tilt-compass core

use nalgebra::{ComplexField, RealField, Vector3};

/// Mathematical constants
pub const DEG_TO_RAD: f32 = core::f32::consts::PI / 180.0;
pub const RAD_TO_DEG: f32 = 180.0 / core::f32::consts::PI;

/// Normalize an angle in degrees into the half-open range [0, 360)
///
/// # Example
/// ```
/// use tilt_compass::wrap_to_0_360;
///
/// assert_eq!(wrap_to_0_360(370.0), 10.0);
/// assert_eq!(wrap_to_0_360(-90.0), 270.0);
/// assert_eq!(wrap_to_0_360(360.0), 0.0);
/// ```
pub fn wrap_to_0_360(angle_deg: f32) -> f32 {
    let wrapped = angle_deg % 360.0;
    if wrapped < 0.0 {
        // Adding 360 to a tiny negative rounds to exactly 360.0 in f32,
        // which would escape the half-open range.
        let wrapped = wrapped + 360.0;
        if wrapped >= 360.0 { 0.0 } else { wrapped }
    } else {
        wrapped
    }
}

/// Extension trait for Vector3 operations
pub trait Vector3Ext {
    /// Calculate the magnitude of the vector
    fn magnitude(&self) -> f32;

    /// Normalize the vector, returning zero vector if magnitude is zero
    fn safe_normalize(&self) -> Vector3<f32>;

    /// True if all three components are finite numbers
    fn is_finite_vector(&self) -> bool;
}

impl Vector3Ext for Vector3<f32> {
    fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    fn safe_normalize(&self) -> Vector3<f32> {
        let mag = Vector3Ext::magnitude(self);
        if mag > 0.0 {
            *self / mag
        } else {
            Vector3::zeros()
        }
    }

    fn is_finite_vector(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Exponential moving average over a wrapping angle
///
/// Smoothing is performed on the unit-circle representation (cosine, sine)
/// of the angle and converted back with atan2. Averaging the raw degree
/// value would produce artifacts at the 359° → 0° wrap boundary: the mean
/// of 359 and 1 is 180, while the mean direction is 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct AngleSmoother {
    /// Accumulated (cos, sin) state, `None` until the first update seeds it
    state: Option<(f32, f32)>,
}

impl AngleSmoother {
    /// Create an unseeded smoother
    pub fn new() -> Self {
        Self { state: None }
    }

    /// Fold in a new angle and return the smoothed angle in [0, 360)
    ///
    /// `alpha` is the weight of the new sample (0 < alpha <= 1). The first
    /// update seeds the accumulator with the raw angle.
    pub fn update(&mut self, alpha: f32, angle_deg: f32) -> f32 {
        let angle_rad = angle_deg * DEG_TO_RAD;
        let (cos, sin) = match self.state {
            Some((prev_cos, prev_sin)) => (
                prev_cos + alpha * (angle_rad.cos() - prev_cos),
                prev_sin + alpha * (angle_rad.sin() - prev_sin),
            ),
            None => (angle_rad.cos(), angle_rad.sin()),
        };
        self.state = Some((cos, sin));
        wrap_to_0_360(sin.atan2(cos) * RAD_TO_DEG)
    }

    /// Current smoothed angle in [0, 360), `None` before the first update
    pub fn current(&self) -> Option<f32> {
        self.state
            .map(|(cos, sin)| wrap_to_0_360(sin.atan2(cos) * RAD_TO_DEG))
    }

    /// Discard the accumulated state
    pub fn reset(&mut self) {
        self.state = None;
    }
}

/// Exponential moving average over a plain scalar
///
/// Used for pitch and roll, whose ranges contain no wrap boundary.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarSmoother {
    state: Option<f32>,
}

impl ScalarSmoother {
    /// Create an unseeded smoother
    pub fn new() -> Self {
        Self { state: None }
    }

    /// Fold in a new value and return the smoothed value
    pub fn update(&mut self, alpha: f32, value: f32) -> f32 {
        let smoothed = match self.state {
            Some(prev) => prev + alpha * (value - prev),
            None => value,
        };
        self.state = Some(smoothed);
        smoothed
    }

    /// Current smoothed value, `None` before the first update
    pub fn current(&self) -> Option<f32> {
        self.state
    }

    /// Discard the accumulated state
    pub fn reset(&mut self) {
        self.state = None;
    }
}
