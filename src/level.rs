//! Flat/Tilted classification with hysteresis

use crate::types::{LevelSettings, LevelState};

/// Hysteresis state machine over pitch and roll
///
/// The device enters Tilted when either axis strictly exceeds the enter
/// threshold and returns to Flat only once both axes drop strictly below
/// the lower exit threshold. A single threshold would flicker on every
/// tremor near the boundary; the band between the two absorbs it.
#[derive(Debug, Clone, Copy)]
pub struct LevelClassifier {
    settings: LevelSettings,
    state: LevelState,
}

impl LevelClassifier {
    /// Create a classifier in the Flat state
    ///
    /// Settings are assumed validated (see [`LevelSettings::validate`]).
    pub fn new(settings: LevelSettings) -> Self {
        Self {
            settings,
            state: LevelState::Flat,
        }
    }

    /// Fold in a new pitch/roll pair and return the resulting state
    ///
    /// Non-finite inputs leave the state unchanged; the estimator never
    /// produces them, and a stuck reading must not flip the display.
    pub fn update(&mut self, pitch_deg: f32, roll_deg: f32) -> LevelState {
        let pitch = pitch_deg.abs();
        let roll = roll_deg.abs();

        self.state = match self.state {
            LevelState::Flat
                if pitch > self.settings.enter_deg || roll > self.settings.enter_deg =>
            {
                LevelState::Tilted
            }
            LevelState::Tilted
                if pitch < self.settings.exit_deg && roll < self.settings.exit_deg =>
            {
                LevelState::Flat
            }
            unchanged => unchanged,
        };
        self.state
    }

    /// Current state without folding in a new reading
    pub fn state(&self) -> LevelState {
        self.state
    }

    /// Return to the Flat state
    pub fn reset(&mut self) {
        self.state = LevelState::Flat;
    }
}

impl Default for LevelClassifier {
    fn default() -> Self {
        Self::new(LevelSettings::default())
    }
}
