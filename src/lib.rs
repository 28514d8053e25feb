//! Gloop Drop - catch the falling gloop before it hits the floor
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, placement, contacts, progression)
//! - `platform`: Collaborator traits (renderer, rewards) and a headless world
//! - `audio`: Sound effect triggers
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Fixed simulation timestep used by the headless runner (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Play field, in scene points
    pub const FIELD_MIN_X: f32 = 0.0;
    pub const FIELD_MAX_X: f32 = 1336.0;
    /// Top of the foreground, where the player stands
    pub const FLOOR_Y: f32 = 220.0;
    /// Drops appear at 2.5x the player's height
    pub const SPAWN_Y: f32 = FLOOR_Y * 2.5;
    /// Gloop sprite is ~38pt wide; drops keep two widths from the edges
    pub const DROP_MARGIN: f32 = 76.0;

    /// Fastest spawn cadence (seconds between drops)
    pub const MIN_DROP_SPEED: f32 = 0.12;
    /// Slowest spawn cadence
    pub const MAX_DROP_SPEED: f32 = 1.0;

    /// "Get Ready!" pause between levels
    pub const LEVEL_TRANSITION_DELAY: f32 = 2.25;

    /// Continue budget
    pub const STARTING_CONTINUES: u32 = 1;
    pub const MAX_CONTINUES: u32 = 4;
    /// Continues granted per watched reward
    pub const REWARD_CONTINUES: u32 = 1;

    /// Drop animation: fade in, stretch, then fall to the floor
    pub const DROP_APPEAR_DURATION: f32 = 0.25;
    pub const DROP_STRETCH_DURATION: f32 = 1.0;
    pub const DROP_FALL_DURATION: f32 = 1.0;

    /// Remaining drops pop one by one after a game over
    pub const CLEAR_INITIAL_DELAY: f32 = 1.0;
    pub const CLEAR_STAGGER: f32 = 0.15;

    /// Player catch box half width
    pub const PLAYER_HALF_WIDTH: f32 = 60.0;
    /// Player sprite height (catch line sits on top of it)
    pub const PLAYER_HEIGHT: f32 = 90.0;
    /// Autopilot drag speed (points per second)
    pub const AUTOPILOT_SPEED: f32 = 1400.0;
}
