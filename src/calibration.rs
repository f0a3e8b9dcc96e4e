//! Debounced calibration-quality monitor

use crate::types::{Accuracy, CalibrationSettings, CalibrationState};

/// Tracks per-stream accuracy reports and debounces the exposed signal
///
/// The platform reports an accuracy tier alongside every sample. The
/// instantaneous aggregate is the worst of the two streams' latest tiers;
/// a stream that has not reported yet counts as Unreliable. The exposed
/// state flips Good → NeedsCalibration only after `debounce_count`
/// consecutive aggregates at Low or worse, and back only after the same
/// number of consecutive aggregates at Medium or better. The two streak
/// counters are independent and reset each other.
///
/// The signal is advisory; it never gates the orientation pipeline.
#[derive(Debug, Clone, Copy)]
pub struct CalibrationMonitor {
    settings: CalibrationSettings,
    accelerometer_accuracy: Option<Accuracy>,
    magnetometer_accuracy: Option<Accuracy>,
    bad_streak: u32,
    good_streak: u32,
    state: CalibrationState,
}

impl CalibrationMonitor {
    /// Create a monitor in the Good state with no reports yet
    ///
    /// Settings are assumed validated (see [`CalibrationSettings::validate`]).
    pub fn new(settings: CalibrationSettings) -> Self {
        Self {
            settings,
            accelerometer_accuracy: None,
            magnetometer_accuracy: None,
            bad_streak: 0,
            good_streak: 0,
            state: CalibrationState::Good,
        }
    }

    /// Record the accuracy tier delivered with an accelerometer sample
    pub fn report_accelerometer(&mut self, accuracy: Accuracy) {
        self.accelerometer_accuracy = Some(accuracy);
        self.observe(self.aggregate());
    }

    /// Record the accuracy tier delivered with a magnetometer sample
    pub fn report_magnetometer(&mut self, accuracy: Accuracy) {
        self.magnetometer_accuracy = Some(accuracy);
        self.observe(self.aggregate());
    }

    /// Worst of the two streams' latest tiers
    pub fn aggregate(&self) -> Accuracy {
        let accelerometer = self.accelerometer_accuracy.unwrap_or(Accuracy::Unreliable);
        let magnetometer = self.magnetometer_accuracy.unwrap_or(Accuracy::Unreliable);
        accelerometer.min(magnetometer)
    }

    /// Current debounced state
    pub fn state(&self) -> CalibrationState {
        self.state
    }

    /// Forget all reports and return to the Good state
    pub fn reset(&mut self) {
        self.accelerometer_accuracy = None;
        self.magnetometer_accuracy = None;
        self.bad_streak = 0;
        self.good_streak = 0;
        self.state = CalibrationState::Good;
    }

    fn observe(&mut self, aggregate: Accuracy) {
        if aggregate <= Accuracy::Low {
            self.bad_streak = self.bad_streak.saturating_add(1);
            self.good_streak = 0;
            if self.state == CalibrationState::Good
                && self.bad_streak >= self.settings.debounce_count
            {
                self.state = CalibrationState::NeedsCalibration;
                log::info!(
                    "calibration degraded after {} consecutive reports at {:?} or worse",
                    self.bad_streak,
                    Accuracy::Low
                );
            }
        } else {
            self.good_streak = self.good_streak.saturating_add(1);
            self.bad_streak = 0;
            if self.state == CalibrationState::NeedsCalibration
                && self.good_streak >= self.settings.debounce_count
            {
                self.state = CalibrationState::Good;
                log::info!(
                    "calibration recovered after {} consecutive reports at {:?} or better",
                    self.good_streak,
                    Accuracy::Medium
                );
            }
        }
    }
}

impl Default for CalibrationMonitor {
    fn default() -> Self {
        Self::new(CalibrationSettings::default())
    }
}
