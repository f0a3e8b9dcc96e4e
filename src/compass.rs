//! Full compass pipeline: buffer, estimator, classifiers, monitor

use crate::buffer::SampleBuffer;
use crate::calibration::CalibrationMonitor;
use crate::direction::CompassDirection;
use crate::estimator::OrientationEstimator;
use crate::level::LevelClassifier;
use crate::types::{
    Accuracy, CalibrationState, CompassSettings, LevelState, Orientation, OrientationStatus,
    SensorSample, SettingsError,
};

/// Owns the complete fusion and classification pipeline
///
/// The two platform sensor callbacks feed [`Compass::ingest_accelerometer`]
/// and [`Compass::ingest_magnetometer`]; each ingest replaces that stream's
/// buffer slot and recomputes. Hosts that prefer a fixed display rate call
/// [`Compass::tick`] instead of recomputing per sample; both modes share
/// the same estimator semantics, including staleness handling.
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use tilt_compass::{Accuracy, Compass, CompassDirection, SensorSample};
///
/// let mut compass = Compass::new();
///
/// compass.ingest_accelerometer(
///     SensorSample::new(Vector3::new(0.0, 0.0, 9.8), 0),
///     Accuracy::High,
/// );
/// compass.ingest_magnetometer(
///     SensorSample::new(Vector3::new(0.0, 20.0, -40.0), 5),
///     Accuracy::High,
/// );
///
/// assert_eq!(compass.direction(), Some(CompassDirection::North));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Compass {
    buffer: SampleBuffer,
    estimator: OrientationEstimator,
    level: LevelClassifier,
    calibration: CalibrationMonitor,
}

impl Compass {
    /// Create a compass with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a compass with custom settings
    pub fn with_settings(settings: CompassSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self {
            buffer: SampleBuffer::new(),
            estimator: OrientationEstimator::new(settings.estimator),
            level: LevelClassifier::new(settings.level),
            calibration: CalibrationMonitor::new(settings.calibration),
        })
    }

    /// Deliver an accelerometer sample and its accuracy tier
    ///
    /// Recomputes at the sample's own timestamp (event-driven mode).
    pub fn ingest_accelerometer(&mut self, sample: SensorSample, accuracy: Accuracy) {
        self.calibration.report_accelerometer(accuracy);
        let now_ms = sample.timestamp_ms;
        self.buffer.store_accelerometer(sample);
        self.recompute(now_ms);
    }

    /// Deliver a magnetometer sample and its accuracy tier
    pub fn ingest_magnetometer(&mut self, sample: SensorSample, accuracy: Accuracy) {
        self.calibration.report_magnetometer(accuracy);
        let now_ms = sample.timestamp_ms;
        self.buffer.store_magnetometer(sample);
        self.recompute(now_ms);
    }

    /// Recompute without new data (fixed-rate mode)
    ///
    /// Enforces the staleness window against `now_ms`: a stream that has
    /// gone quiet turns the orientation Invalid rather than freezing the
    /// display on an old heading.
    pub fn tick(&mut self, now_ms: u64) -> Orientation {
        self.recompute(now_ms)
    }

    /// Current orientation estimate
    pub fn orientation(&self) -> Orientation {
        self.estimator.orientation()
    }

    /// Current 8-point direction label, `None` while the orientation is
    /// Invalid (the classifier never sees unusable azimuths)
    pub fn direction(&self) -> Option<CompassDirection> {
        let orientation = self.estimator.orientation();
        orientation
            .is_usable()
            .then(|| CompassDirection::from_azimuth(orientation.azimuth_deg))
    }

    /// Current level state
    pub fn level(&self) -> LevelState {
        self.level.state()
    }

    /// Current debounced calibration signal
    pub fn calibration(&self) -> CalibrationState {
        self.calibration.state()
    }

    /// Drop all samples, accumulators, and classifier state
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.estimator.reset();
        self.level.reset();
        self.calibration.reset();
    }

    fn recompute(&mut self, now_ms: u64) -> Orientation {
        let orientation = self.estimator.update(&self.buffer, now_ms);
        // Invalid estimates carry stale angles; the level state holds
        // until a usable reading arrives.
        if orientation.status != OrientationStatus::Invalid {
            self.level.update(orientation.pitch_deg, orientation.roll_deg);
        }
        orientation
    }
}
