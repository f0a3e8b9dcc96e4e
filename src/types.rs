//! Core types and settings for the tilt-compass core

use nalgebra::Vector3;
use thiserror_no_std::Error;

/// Sensor accuracy tier reported by the platform alongside every sample
///
/// Ordered from worst to best so that the aggregate accuracy of two
/// streams is simply the minimum of their latest reports.
///
/// # Example
/// ```
/// use tilt_compass::Accuracy;
///
/// let aggregate = Accuracy::High.min(Accuracy::Low);
/// assert_eq!(aggregate, Accuracy::Low);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Accuracy {
    /// Sensor output cannot be trusted
    Unreliable,
    /// Heavy distortion or bias suspected
    Low,
    /// Usable with some residual error
    Medium,
    /// Fully calibrated
    High,
}

/// A single timestamped tri-axis reading from one sensor stream
///
/// Whether the vector means gravity or magnetic field is determined by
/// which stream produced it. A slot in the sample buffer holds at most one
/// of these; each new reading replaces the previous one wholesale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSample {
    /// Raw sensor vector in the device frame
    pub vector: Vector3<f32>,
    /// Delivery timestamp in milliseconds, monotonic clock
    pub timestamp_ms: u64,
}

impl SensorSample {
    /// Create a sample from a vector and its delivery timestamp
    pub fn new(vector: Vector3<f32>, timestamp_ms: u64) -> Self {
        Self {
            vector,
            timestamp_ms,
        }
    }
}

/// Validity of an orientation estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrientationStatus {
    /// Both inputs fresh and physically plausible
    Valid,
    /// Computed, but the accelerometer deviates from standard gravity
    /// (device under linear acceleration); display with a caveat
    Unreliable,
    /// A sample is missing, stale, non-finite, or degenerate; the angle
    /// fields are meaningless and must not be read
    #[default]
    Invalid,
}

/// Smoothed orientation estimate in degrees
///
/// `azimuth_deg` is always normalized into [0, 360). Pitch comes from an
/// arcsine and lives in [-90, 90]; roll comes from an atan2 and lives in
/// [-180, 180]. When `status` is [`OrientationStatus::Invalid`] the angle
/// fields hold their previous values and carry no meaning.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Orientation {
    /// Compass heading, degrees clockwise from magnetic north, [0, 360)
    pub azimuth_deg: f32,
    /// Forward/backward tilt, degrees
    pub pitch_deg: f32,
    /// Left/right tilt, degrees
    pub roll_deg: f32,
    /// Whether the angles may be consumed
    pub status: OrientationStatus,
}

impl Orientation {
    /// True unless the estimate is [`OrientationStatus::Invalid`]
    ///
    /// Unreliable estimates are still usable; the flag is advisory.
    pub fn is_usable(&self) -> bool {
        self.status != OrientationStatus::Invalid
    }
}

/// Whether the device rests level or is tilted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelState {
    /// Pitch and roll within the level band
    #[default]
    Flat,
    /// Pitch or roll beyond the enter threshold
    Tilted,
}

/// Debounced calibration quality signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalibrationState {
    /// Recent accuracy reports are Medium or better
    #[default]
    Good,
    /// Sustained Low or Unreliable reports; advise a figure-eight motion
    NeedsCalibration,
}

/// Orientation estimator settings
///
/// # Example
/// ```
/// use tilt_compass::EstimatorSettings;
///
/// let settings = EstimatorSettings {
///     smoothing_factor: 0.1,      // heavier smoothing
///     staleness_window_ms: 1000,  // tolerate 1 Hz sensors
///     ..Default::default()
/// };
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct EstimatorSettings {
    /// Weight of each new sample in the exponential moving average,
    /// in (0, 1]; 1.0 disables smoothing
    pub smoothing_factor: f32,
    /// Allowed deviation of accelerometer magnitude from standard gravity
    /// (m/s²) before the estimate is flagged Unreliable
    pub gravity_tolerance: f32,
    /// Maximum age of a sample before it no longer counts as current;
    /// older samples make the estimate Invalid instead of silently stale
    pub staleness_window_ms: u64,
}

impl Default for EstimatorSettings {
    fn default() -> Self {
        Self {
            smoothing_factor: 0.2,
            gravity_tolerance: 1.5,
            staleness_window_ms: 500,
        }
    }
}

impl EstimatorSettings {
    /// Check the settings for internal consistency
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.smoothing_factor.is_finite()
            || self.smoothing_factor <= 0.0
            || self.smoothing_factor > 1.0
        {
            return Err(SettingsError::SmoothingFactor {
                value: self.smoothing_factor,
            });
        }
        if !self.gravity_tolerance.is_finite() || self.gravity_tolerance < 0.0 {
            return Err(SettingsError::GravityTolerance {
                value: self.gravity_tolerance,
            });
        }
        if self.staleness_window_ms == 0 {
            return Err(SettingsError::StalenessWindow);
        }
        Ok(())
    }
}

/// Level classifier settings
///
/// The exit threshold must be strictly below the enter threshold; the gap
/// between them is the hysteresis band that suppresses flicker when the
/// device rests near the boundary.
#[derive(Debug, Clone, Copy)]
pub struct LevelSettings {
    /// Tilt angle (degrees) that must be exceeded to leave Flat
    pub enter_deg: f32,
    /// Tilt angle (degrees) both axes must drop below to return to Flat
    pub exit_deg: f32,
}

impl Default for LevelSettings {
    fn default() -> Self {
        Self {
            enter_deg: 5.0,
            exit_deg: 3.0,
        }
    }
}

impl LevelSettings {
    /// Check the settings for internal consistency
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.enter_deg.is_finite()
            || !self.exit_deg.is_finite()
            || self.enter_deg <= 0.0
            || self.exit_deg < 0.0
            || self.exit_deg >= self.enter_deg
        {
            return Err(SettingsError::HysteresisBand {
                enter_deg: self.enter_deg,
                exit_deg: self.exit_deg,
            });
        }
        Ok(())
    }
}

/// Calibration monitor settings
#[derive(Debug, Clone, Copy)]
pub struct CalibrationSettings {
    /// Consecutive aggregate reports required before the calibration state
    /// flips, in either direction
    pub debounce_count: u32,
}

impl Default for CalibrationSettings {
    fn default() -> Self {
        Self { debounce_count: 3 }
    }
}

impl CalibrationSettings {
    /// Check the settings for internal consistency
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.debounce_count == 0 {
            return Err(SettingsError::DebounceCount);
        }
        Ok(())
    }
}

/// Combined settings for the full compass pipeline
#[derive(Debug, Clone, Copy, Default)]
pub struct CompassSettings {
    /// Orientation estimator settings
    pub estimator: EstimatorSettings,
    /// Level classifier settings
    pub level: LevelSettings,
    /// Calibration monitor settings
    pub calibration: CalibrationSettings,
}

impl CompassSettings {
    /// Check all component settings for internal consistency
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.estimator.validate()?;
        self.level.validate()?;
        self.calibration.validate()
    }
}

/// Settings rejected at construction
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum SettingsError {
    /// Smoothing factor outside (0, 1]
    #[error("smoothing factor {value} outside (0, 1]")]
    SmoothingFactor {
        /// Offending value
        value: f32,
    },
    /// Negative or non-finite gravity tolerance
    #[error("gravity tolerance {value} must be finite and non-negative")]
    GravityTolerance {
        /// Offending value
        value: f32,
    },
    /// Zero staleness window would invalidate every sample
    #[error("staleness window must be at least 1 ms")]
    StalenessWindow,
    /// Exit threshold must sit strictly below enter threshold
    #[error("hysteresis band invalid: enter {enter_deg}°, exit {exit_deg}°")]
    HysteresisBand {
        /// Configured enter threshold
        enter_deg: f32,
        /// Configured exit threshold
        exit_deg: f32,
    },
    /// Zero debounce count would make the signal flap on single reports
    #[error("debounce count must be at least 1")]
    DebounceCount,
}
