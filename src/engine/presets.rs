//! Timing-bar parameters for the four reflex modes.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::timing_bar::{TargetMotion, TargetRange, TimingBarConfig};
use crate::difficulty::SpeedTable;

pub fn individual() -> TimingBarConfig {
    TimingBarConfig {
        speeds: SpeedTable::new(0.4, 0.7, 1.1, 1.6),
        jitter_band: 0.4,
        marker_width: 15.0,
        target_width: 20.0,
        max_travel: 85.0,
        initial_target: 40.0,
        target_motion: TargetMotion::Chance {
            per_tick: 0.015,
            range: TargetRange::new(20.0, 50.0),
        },
    }
}

pub fn precision() -> TimingBarConfig {
    TimingBarConfig {
        speeds: SpeedTable::new(0.4, 0.7, 1.0, 1.5),
        jitter_band: 0.0,
        marker_width: 12.0,
        target_width: 15.0,
        max_travel: 88.0,
        // centred: 42.5..57.5
        initial_target: 42.5,
        target_motion: TargetMotion::Static,
    }
}

pub fn chaos() -> TimingBarConfig {
    TimingBarConfig {
        speeds: SpeedTable::new(0.5, 0.8, 1.2, 1.8),
        jitter_band: 0.5,
        marker_width: 12.0,
        target_width: 25.0,
        max_travel: 88.0,
        initial_target: 37.5,
        target_motion: TargetMotion::Chance {
            per_tick: 0.02,
            range: TargetRange::new(0.0, 63.0),
        },
    }
}

/// One lane; competitive mode runs two independent copies.
pub fn competitive() -> TimingBarConfig {
    TimingBarConfig {
        speeds: SpeedTable::new(0.4, 0.7, 1.0, 1.4),
        jitter_band: 0.0,
        marker_width: 15.0,
        target_width: 20.0,
        max_travel: 85.0,
        initial_target: 40.0,
        target_motion: TargetMotion::Chance {
            per_tick: 0.015,
            range: TargetRange::new(20.0, 50.0),
        },
    }
}

/// The active preset set. Owned by the session and overridable from JSON.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Presets {
    pub individual: TimingBarConfig,
    pub precision: TimingBarConfig,
    pub chaos: TimingBarConfig,
    pub competitive: TimingBarConfig,
}

impl Default for Presets {
    fn default() -> Self {
        Self {
            individual: individual(),
            precision: precision(),
            chaos: chaos(),
            competitive: competitive(),
        }
    }
}

impl Presets {
    /// Parse a (possibly partial) preset document; omitted modes keep their
    /// built-in values.
    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, crate::error::GameError> {
        Ok(serde_json::from_str(json)?)
    }
}
