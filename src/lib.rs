#![no_std]

//! Tilt-compass - a sensor fusion core for handheld compass applications
//!
//! Fuses raw accelerometer and magnetometer readings into a stable compass
//! heading, an 8-point direction label, a Flat/Tilted level state, and a
//! debounced calibration-quality signal. The platform plumbing around it
//! (permission prompts, widgets, location lookups, share sheets) stays
//! outside; this crate is the in-process computation contract only.
//!
//! # Features
//!
//! - Tilt-compensated heading from a gravity/magnetic-field vector pair
//! - Wrap-safe exponential smoothing performed in unit-circle space
//! - Total, half-open 8-sector direction classification
//! - Level detection with enter/exit hysteresis
//! - Symmetric debounce of per-sensor accuracy reports
//! - Staleness tracking so quiet sensors invalidate the estimate
//! - `#![no_std]` compatible for embedded and mobile-FFI hosts
//!
//! # Quick Start
//!
//! ```rust
//! use nalgebra::Vector3;
//! use tilt_compass::{Accuracy, Compass, SensorSample};
//!
//! let mut compass = Compass::new();
//!
//! // Sensor callbacks deliver timestamped readings with an accuracy tier.
//! compass.ingest_accelerometer(
//!     SensorSample::new(Vector3::new(0.0, 0.0, 9.8), 0),   // m/s²
//!     Accuracy::High,
//! );
//! compass.ingest_magnetometer(
//!     SensorSample::new(Vector3::new(0.0, 20.0, -40.0), 5), // µT
//!     Accuracy::High,
//! );
//!
//! let orientation = compass.orientation();
//! if let Some(direction) = compass.direction() {
//!     // e.g. render "137° SE"
//!     let _label = direction.abbreviation();
//! }
//! ```

mod buffer;
mod calibration;
mod compass;
mod direction;
mod estimator;
mod level;
mod math;
mod types;

// Re-export all public types and functions
pub use buffer::SampleBuffer;
pub use calibration::CalibrationMonitor;
pub use compass::Compass;
pub use direction::CompassDirection;
pub use estimator::OrientationEstimator;
pub use level::LevelClassifier;
pub use math::{AngleSmoother, DEG_TO_RAD, RAD_TO_DEG, ScalarSmoother, Vector3Ext, wrap_to_0_360};
pub use types::*;
