//! Data-driven game balance
//!
//! Every number the simulation depends on lives in [`Tuning`]. Defaults mirror
//! the shipped game; a JSON file can override any subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Failure to produce a usable [`Tuning`]
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Game balance and layout parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Play field ===
    pub field_min_x: f32,
    pub field_max_x: f32,
    pub floor_y: f32,
    pub spawn_y: f32,
    /// Distance kept between a drop and the field edges
    pub drop_margin: f32,

    // === Difficulty ===
    /// Fastest allowed spawn interval (seconds)
    pub min_drop_speed: f32,
    /// Slowest allowed spawn interval (seconds)
    pub max_drop_speed: f32,
    /// Pause between a cleared wave and the next level
    pub level_transition_delay: f32,

    // === Continues ===
    pub starting_continues: u32,
    pub max_continues: u32,
    pub reward_continues: u32,

    // === Drop animation ===
    pub drop_appear_duration: f32,
    pub drop_stretch_duration: f32,
    pub drop_fall_duration: f32,

    // === Game over cleanup ===
    pub clear_initial_delay: f32,
    pub clear_stagger: f32,

    // === Player ===
    pub player_half_width: f32,
    pub player_height: f32,
    pub autopilot_speed: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_min_x: FIELD_MIN_X,
            field_max_x: FIELD_MAX_X,
            floor_y: FLOOR_Y,
            spawn_y: SPAWN_Y,
            drop_margin: DROP_MARGIN,

            min_drop_speed: MIN_DROP_SPEED,
            max_drop_speed: MAX_DROP_SPEED,
            level_transition_delay: LEVEL_TRANSITION_DELAY,

            starting_continues: STARTING_CONTINUES,
            max_continues: MAX_CONTINUES,
            reward_continues: REWARD_CONTINUES,

            drop_appear_duration: DROP_APPEAR_DURATION,
            drop_stretch_duration: DROP_STRETCH_DURATION,
            drop_fall_duration: DROP_FALL_DURATION,

            clear_initial_delay: CLEAR_INITIAL_DELAY,
            clear_stagger: CLEAR_STAGGER,

            player_half_width: PLAYER_HALF_WIDTH,
            player_height: PLAYER_HEIGHT,
            autopilot_speed: AUTOPILOT_SPEED,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json_str(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Serialize to pretty JSON (for writing a starter file)
    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Leftmost x a drop may spawn at
    #[inline]
    pub fn drop_min_x(&self) -> f32 {
        self.field_min_x + self.drop_margin
    }

    /// Rightmost x a drop may spawn at
    #[inline]
    pub fn drop_max_x(&self) -> f32 {
        self.field_max_x - self.drop_margin
    }

    /// Horizontal centre of the field (player home)
    #[inline]
    pub fn field_center_x(&self) -> f32 {
        (self.field_min_x + self.field_max_x) / 2.0
    }

    /// Every float field, by name
    fn float_fields(&self) -> [(&'static str, f32); 18] {
        [
            ("field_min_x", self.field_min_x),
            ("field_max_x", self.field_max_x),
            ("floor_y", self.floor_y),
            ("spawn_y", self.spawn_y),
            ("drop_margin", self.drop_margin),
            ("min_drop_speed", self.min_drop_speed),
            ("max_drop_speed", self.max_drop_speed),
            ("level_transition_delay", self.level_transition_delay),
            ("drop_appear_duration", self.drop_appear_duration),
            ("drop_stretch_duration", self.drop_stretch_duration),
            ("drop_fall_duration", self.drop_fall_duration),
            ("clear_initial_delay", self.clear_initial_delay),
            ("clear_stagger", self.clear_stagger),
            ("player_half_width", self.player_half_width),
            ("player_height", self.player_height),
            ("autopilot_speed", self.autopilot_speed),
            ("drop_min_x", self.drop_min_x()),
            ("drop_max_x", self.drop_max_x()),
        ]
    }

    /// Reject tuning the simulation cannot run with.
    ///
    /// Comparisons are written so that NaN fails them.
    pub fn validate(&self) -> Result<(), TuningError> {
        let invalid = |msg: String| -> Result<(), TuningError> { Err(TuningError::Invalid(msg)) };

        if let Some((name, value)) = self.float_fields().into_iter().find(|(_, v)| !v.is_finite()) {
            return invalid(format!("{} must be finite (got {})", name, value));
        }
        if !(self.drop_margin >= 0.0) {
            return invalid(format!("drop_margin must be >= 0 (got {})", self.drop_margin));
        }
        if !(self.drop_min_x() <= self.drop_max_x()) {
            return invalid(format!(
                "drop range is empty: [{}, {}]",
                self.drop_min_x(),
                self.drop_max_x()
            ));
        }
        if !(self.spawn_y > self.floor_y) {
            return invalid("spawn_y must be above floor_y".into());
        }
        if !(self.min_drop_speed > 0.0 && self.min_drop_speed <= self.max_drop_speed) {
            return invalid(format!(
                "drop speed bounds must satisfy 0 < min <= max (got [{}, {}])",
                self.min_drop_speed, self.max_drop_speed
            ));
        }
        if !(self.level_transition_delay >= 0.0) {
            return invalid("level_transition_delay must be >= 0".into());
        }
        if self.starting_continues > self.max_continues {
            return invalid(format!(
                "starting_continues ({}) exceeds max_continues ({})",
                self.starting_continues, self.max_continues
            ));
        }
        if !(self.drop_appear_duration >= 0.0 && self.drop_stretch_duration >= 0.0) {
            return invalid("drop animation durations must be >= 0".into());
        }
        if !(self.drop_fall_duration > 0.0) {
            return invalid("drop_fall_duration must be > 0".into());
        }
        if !(self.clear_initial_delay >= 0.0 && self.clear_stagger >= 0.0) {
            return invalid("clear delays must be >= 0".into());
        }
        if !(self.player_half_width > 0.0 && self.player_height > 0.0) {
            return invalid("player size must be positive".into());
        }
        if !(self.autopilot_speed >= 0.0) {
            return invalid("autopilot_speed must be >= 0".into());
        }
        Ok(())
    }
}
