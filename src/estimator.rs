//! Orientation estimation from gravity and magnetic field vectors
//!
//! # Axis convention
//!
//! Device frame: X to the right of the screen, Y out the top edge, Z out
//! of the screen face. At rest face-up the accelerometer reads +9.8 on Z
//! (the gravity direction, i.e. "up" in the device frame).
//!
//! The rotation matrix is built with rows `[east, north, gravity]`, where
//! `east = normalize(mag × gravity)` and `north = gravity × east`. Every
//! derived angle sign depends on this exact convention:
//!
//! - azimuth = atan2(R[0][1], R[1][1]), wrapped to [0, 360), clockwise
//!   from magnetic north
//! - pitch = asin(-R[2][1]), negative when the top edge tips away
//! - roll = atan2(-R[2][0], R[2][2])

use nalgebra::{ComplexField, Matrix3, RealField, Vector3};

use crate::buffer::SampleBuffer;
use crate::math::{AngleSmoother, RAD_TO_DEG, ScalarSmoother, Vector3Ext, wrap_to_0_360};
use crate::types::{EstimatorSettings, Orientation, OrientationStatus};

/// Inputs with magnitude below this are degenerate and rejected
const MIN_VECTOR_MAGNITUDE: f32 = 1e-3;

/// Standard gravity in m/s²
const STANDARD_GRAVITY: f32 = 9.80665;

/// Turns a gravity/magnetic vector pair into a smoothed orientation
///
/// Pure apart from its smoothing accumulators: recomputation reads the
/// sample buffer and mutates nothing else, so it can run on every buffer
/// update or on a fixed-rate tick without changing semantics. Invalid
/// inputs (missing, stale, non-finite, or degenerate) surface as
/// [`OrientationStatus::Invalid`] and leave the accumulators untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrientationEstimator {
    settings: EstimatorSettings,
    azimuth_smoother: AngleSmoother,
    pitch_smoother: ScalarSmoother,
    roll_smoother: ScalarSmoother,
    orientation: Orientation,
}

impl OrientationEstimator {
    /// Create an estimator with the given settings
    ///
    /// Settings are assumed validated (see [`EstimatorSettings::validate`]).
    pub fn new(settings: EstimatorSettings) -> Self {
        Self {
            settings,
            azimuth_smoother: AngleSmoother::new(),
            pitch_smoother: ScalarSmoother::new(),
            roll_smoother: ScalarSmoother::new(),
            orientation: Orientation::default(),
        }
    }

    /// Recompute the orientation from the buffer at time `now_ms`
    ///
    /// A stream with no sample inside the staleness window makes the
    /// result Invalid rather than silently reusing an old reading.
    pub fn update(&mut self, buffer: &SampleBuffer, now_ms: u64) -> Orientation {
        let window = self.settings.staleness_window_ms;

        let Some(accelerometer) = buffer.fresh_accelerometer(now_ms, window) else {
            log::debug!("accelerometer sample missing or stale at {now_ms} ms");
            return self.invalidate();
        };
        let Some(magnetometer) = buffer.fresh_magnetometer(now_ms, window) else {
            log::debug!("magnetometer sample missing or stale at {now_ms} ms");
            return self.invalidate();
        };

        self.compute(accelerometer.vector, magnetometer.vector)
    }

    /// Last published orientation
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Clear the smoothing accumulators and the published orientation
    pub fn reset(&mut self) {
        self.azimuth_smoother.reset();
        self.pitch_smoother.reset();
        self.roll_smoother.reset();
        self.orientation = Orientation::default();
    }

    fn compute(&mut self, accelerometer: Vector3<f32>, magnetometer: Vector3<f32>) -> Orientation {
        if !accelerometer.is_finite_vector() || !magnetometer.is_finite_vector() {
            log::debug!("rejecting non-finite sensor vector");
            return self.invalidate();
        }

        let accelerometer_magnitude = Vector3Ext::magnitude(&accelerometer);
        if accelerometer_magnitude < MIN_VECTOR_MAGNITUDE
            || Vector3Ext::magnitude(&magnetometer) < MIN_VECTOR_MAGNITUDE
        {
            log::debug!("rejecting degenerate sensor vector");
            return self.invalidate();
        }

        let gravity = accelerometer / accelerometer_magnitude;
        let field = magnetometer.safe_normalize();

        // East is perpendicular to both the field and gravity. The cross
        // product collapses when the field is (anti-)parallel to gravity,
        // which happens at the magnetic poles or under hard interference.
        let east = field.cross(&gravity);
        if Vector3Ext::magnitude(&east) < MIN_VECTOR_MAGNITUDE {
            log::debug!("magnetic field parallel to gravity, no horizontal reference");
            return self.invalidate();
        }
        let east = east.safe_normalize();
        let north = gravity.cross(&east);

        // Rows [east, north, gravity]; see the module docs for why this
        // ordering is load-bearing.
        let rotation = Matrix3::from_rows(&[
            east.transpose(),
            north.transpose(),
            gravity.transpose(),
        ]);

        let raw_azimuth = wrap_to_0_360(rotation[(0, 1)].atan2(rotation[(1, 1)]) * RAD_TO_DEG);
        let raw_pitch = (-rotation[(2, 1)]).clamp(-1.0, 1.0).asin() * RAD_TO_DEG;
        let raw_roll = (-rotation[(2, 0)]).atan2(rotation[(2, 2)]) * RAD_TO_DEG;

        let alpha = self.settings.smoothing_factor;
        let status = if (accelerometer_magnitude - STANDARD_GRAVITY).abs()
            > self.settings.gravity_tolerance
        {
            OrientationStatus::Unreliable
        } else {
            OrientationStatus::Valid
        };

        self.orientation = Orientation {
            azimuth_deg: self.azimuth_smoother.update(alpha, raw_azimuth),
            pitch_deg: self.pitch_smoother.update(alpha, raw_pitch),
            roll_deg: self.roll_smoother.update(alpha, raw_roll),
            status,
        };
        self.orientation
    }

    /// Flag the published orientation Invalid without disturbing the
    /// smoothing accumulators; a later valid reading resumes from them.
    fn invalidate(&mut self) -> Orientation {
        self.orientation.status = OrientationStatus::Invalid;
        self.orientation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SensorSample;

    const FLAT_GRAVITY: Vector3<f32> = Vector3::new(0.0, 0.0, 9.8);
    const NORTH_FIELD: Vector3<f32> = Vector3::new(0.0, 20.0, -40.0);

    fn estimator() -> OrientationEstimator {
        OrientationEstimator::new(EstimatorSettings::default())
    }

    fn compute(
        estimator: &mut OrientationEstimator,
        accelerometer: Vector3<f32>,
        magnetometer: Vector3<f32>,
    ) -> Orientation {
        let mut buffer = SampleBuffer::new();
        buffer.store_accelerometer(SensorSample::new(accelerometer, 0));
        buffer.store_magnetometer(SensorSample::new(magnetometer, 0));
        estimator.update(&buffer, 0)
    }

    /// Field from a device yawed clockwise by `azimuth_deg` while flat.
    /// The horizontal field component projects onto the device axes.
    fn field_at_azimuth(azimuth_deg: f32) -> Vector3<f32> {
        let azimuth_rad = azimuth_deg.to_radians();
        Vector3::new(
            -20.0 * azimuth_rad.sin(),
            20.0 * azimuth_rad.cos(),
            -40.0,
        )
    }

    #[test]
    fn test_golden_flat_north() {
        // Regression baseline for the documented axis convention: flat
        // device facing north must report exactly (0, 0, 0).
        let mut estimator = estimator();
        let orientation = compute(&mut estimator, FLAT_GRAVITY, NORTH_FIELD);

        assert_eq!(orientation.status, OrientationStatus::Valid);
        assert!(
            orientation.azimuth_deg < 0.1 || orientation.azimuth_deg > 359.9,
            "azimuth was {}",
            orientation.azimuth_deg
        );
        assert!(orientation.pitch_deg.abs() < 0.1);
        assert!(orientation.roll_deg.abs() < 0.1);
    }

    #[test]
    fn test_cardinal_azimuths() {
        for (azimuth, label) in [(0.0, "N"), (90.0, "E"), (180.0, "S"), (270.0, "W")] {
            let mut estimator = estimator();
            let orientation = compute(&mut estimator, FLAT_GRAVITY, field_at_azimuth(azimuth));

            let mut error = (orientation.azimuth_deg - azimuth).abs();
            if error > 180.0 {
                error = 360.0 - error;
            }
            assert!(
                error < 0.5,
                "{label}: expected {azimuth}°, got {}",
                orientation.azimuth_deg
            );
        }
    }

    #[test]
    fn test_azimuth_always_normalized() {
        let mut estimator = estimator();
        for tenth_deg in (0..3600).step_by(75) {
            let orientation = compute(
                &mut estimator,
                FLAT_GRAVITY,
                field_at_azimuth(tenth_deg as f32 * 0.1),
            );
            assert!(
                (0.0..360.0).contains(&orientation.azimuth_deg),
                "azimuth {} out of range",
                orientation.azimuth_deg
            );
        }
    }

    #[test]
    fn test_tilt_compensation() {
        // Pitching the device forward 30° must barely move the heading.
        let mut flat = estimator();
        let flat_orientation = compute(&mut flat, FLAT_GRAVITY, field_at_azimuth(60.0));

        let pitch_rad = 30.0f32.to_radians();
        let tilted_gravity = Vector3::new(0.0, -9.8 * pitch_rad.sin(), 9.8 * pitch_rad.cos());
        let tilted_field = {
            let flat_field = field_at_azimuth(60.0);
            // Rotate the field into the pitched device frame.
            Vector3::new(
                flat_field.x,
                flat_field.y * pitch_rad.cos() - flat_field.z * pitch_rad.sin(),
                flat_field.y * pitch_rad.sin() + flat_field.z * pitch_rad.cos(),
            )
        };
        let mut tilted = estimator();
        let tilted_orientation = compute(&mut tilted, tilted_gravity, tilted_field);

        let drift = (flat_orientation.azimuth_deg - tilted_orientation.azimuth_deg).abs();
        assert!(
            drift < 1.0,
            "tilt compensation failed: flat {}°, tilted {}°",
            flat_orientation.azimuth_deg,
            tilted_orientation.azimuth_deg
        );
    }

    #[test]
    fn test_pitch_sign() {
        // Top edge tipped up: gravity gains a -Y component in the device
        // frame, pitch reported positive under this convention.
        let pitch_rad = 20.0f32.to_radians();
        let gravity = Vector3::new(0.0, -9.8 * pitch_rad.sin(), 9.8 * pitch_rad.cos());
        let field = Vector3::new(
            0.0,
            20.0 * pitch_rad.cos() + 40.0 * pitch_rad.sin(),
            20.0 * pitch_rad.sin() - 40.0 * pitch_rad.cos(),
        );

        let mut estimator = estimator();
        let orientation = compute(&mut estimator, gravity, field);
        assert_eq!(orientation.status, OrientationStatus::Valid);
        assert!(
            (orientation.pitch_deg - 20.0).abs() < 0.5,
            "pitch was {}",
            orientation.pitch_deg
        );
    }

    #[test]
    fn test_degenerate_accelerometer_preserves_smoother() {
        let mut estimator = estimator();

        // Converge on 10°.
        for _ in 0..100 {
            compute(&mut estimator, FLAT_GRAVITY, field_at_azimuth(10.0));
        }
        let before = estimator.orientation().azimuth_deg;
        assert!((before - 10.0).abs() < 0.5);

        // Degenerate input: Invalid, angles untouched.
        let orientation = compute(&mut estimator, Vector3::zeros(), NORTH_FIELD);
        assert_eq!(orientation.status, OrientationStatus::Invalid);
        assert_eq!(orientation.azimuth_deg, before);

        // The next valid reading resumes from the old accumulator: one
        // sample at 90° moves the heading only partway there.
        let resumed = compute(&mut estimator, FLAT_GRAVITY, field_at_azimuth(90.0));
        assert_eq!(resumed.status, OrientationStatus::Valid);
        assert!(resumed.azimuth_deg > 15.0 && resumed.azimuth_deg < 60.0);
    }

    #[test]
    fn test_non_finite_input_invalid() {
        let mut estimator = estimator();
        let orientation = compute(
            &mut estimator,
            Vector3::new(f32::NAN, 0.0, 9.8),
            NORTH_FIELD,
        );
        assert_eq!(orientation.status, OrientationStatus::Invalid);
    }

    #[test]
    fn test_field_parallel_to_gravity_invalid() {
        let mut estimator = estimator();
        let orientation = compute(
            &mut estimator,
            FLAT_GRAVITY,
            Vector3::new(0.0, 0.0, 44.7),
        );
        assert_eq!(orientation.status, OrientationStatus::Invalid);
    }

    #[test]
    fn test_linear_acceleration_flags_unreliable() {
        // 14 m/s² total acceleration: well outside the gravity band, but
        // the estimate is still computed and delivered.
        let mut estimator = estimator();
        let orientation = compute(
            &mut estimator,
            Vector3::new(0.0, 0.0, 14.0),
            NORTH_FIELD,
        );

        assert_eq!(orientation.status, OrientationStatus::Unreliable);
        assert!(orientation.is_usable());
        assert!(orientation.azimuth_deg < 0.1 || orientation.azimuth_deg > 359.9);
    }

    #[test]
    fn test_staleness_invalidates() {
        let mut estimator = estimator();
        let mut buffer = SampleBuffer::new();
        buffer.store_accelerometer(SensorSample::new(FLAT_GRAVITY, 1000));
        buffer.store_magnetometer(SensorSample::new(NORTH_FIELD, 1000));

        assert_eq!(
            estimator.update(&buffer, 1400).status,
            OrientationStatus::Valid
        );

        // 600 ms later the samples fall outside the 500 ms window.
        assert_eq!(
            estimator.update(&buffer, 1600).status,
            OrientationStatus::Invalid
        );

        // A fresh magnetometer alone is not enough.
        buffer.store_magnetometer(SensorSample::new(NORTH_FIELD, 1600));
        assert_eq!(
            estimator.update(&buffer, 1600).status,
            OrientationStatus::Invalid
        );

        buffer.store_accelerometer(SensorSample::new(FLAT_GRAVITY, 1610));
        assert_eq!(
            estimator.update(&buffer, 1620).status,
            OrientationStatus::Valid
        );
    }

    #[test]
    fn test_reset_clears_accumulators() {
        let mut estimator = estimator();
        for _ in 0..50 {
            compute(&mut estimator, FLAT_GRAVITY, field_at_azimuth(200.0));
        }
        estimator.reset();
        assert_eq!(estimator.orientation().status, OrientationStatus::Invalid);

        // First reading after reset seeds the smoother directly.
        let orientation = compute(&mut estimator, FLAT_GRAVITY, field_at_azimuth(90.0));
        assert!((orientation.azimuth_deg - 90.0).abs() < 0.5);
    }
}
