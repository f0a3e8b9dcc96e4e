//! Latest-sample buffer for the two sensor streams

use crate::types::SensorSample;

/// Holds the single most recent sample from each sensor stream
///
/// Each stream owns exactly one slot and replaces it wholesale on every
/// delivery; samples are never merged or queued. Readers see either the
/// old or the new complete sample. Staleness is decided at read time
/// against a caller-supplied window, so the buffer itself stays free of
/// clock state.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleBuffer {
    accelerometer: Option<SensorSample>,
    magnetometer: Option<SensorSample>,
}

impl SampleBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the accelerometer slot
    pub fn store_accelerometer(&mut self, sample: SensorSample) {
        self.accelerometer = Some(sample);
    }

    /// Replace the magnetometer slot
    pub fn store_magnetometer(&mut self, sample: SensorSample) {
        self.magnetometer = Some(sample);
    }

    /// Latest accelerometer sample regardless of age
    pub fn accelerometer(&self) -> Option<&SensorSample> {
        self.accelerometer.as_ref()
    }

    /// Latest magnetometer sample regardless of age
    pub fn magnetometer(&self) -> Option<&SensorSample> {
        self.magnetometer.as_ref()
    }

    /// Accelerometer sample no older than `window_ms` at `now_ms`
    pub fn fresh_accelerometer(&self, now_ms: u64, window_ms: u64) -> Option<&SensorSample> {
        self.accelerometer
            .as_ref()
            .filter(|sample| is_fresh(sample, now_ms, window_ms))
    }

    /// Magnetometer sample no older than `window_ms` at `now_ms`
    pub fn fresh_magnetometer(&self, now_ms: u64, window_ms: u64) -> Option<&SensorSample> {
        self.magnetometer
            .as_ref()
            .filter(|sample| is_fresh(sample, now_ms, window_ms))
    }

    /// Drop both samples
    pub fn clear(&mut self) {
        self.accelerometer = None;
        self.magnetometer = None;
    }
}

/// A sample delivered "in the future" relative to `now_ms` counts as fresh;
/// the two streams run on independent clocks and may race the tick.
fn is_fresh(sample: &SensorSample, now_ms: u64, window_ms: u64) -> bool {
    now_ms.saturating_sub(sample.timestamp_ms) <= window_ms
}
