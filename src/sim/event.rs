//! Notifications emitted by the simulation
//!
//! The game never calls into views directly. Each transition appends events
//! that the host drains and forwards to its renderer and audio.

use glam::Vec2;

use super::state::{DropId, Facing, GamePhase};
use crate::audio::SoundEffect;

/// Player sprite animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAnimation {
    Walk,
    Die,
}

/// Something the presentation layer should react to
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A drop appeared; it fades in, stretches, then falls over `fall_duration`
    SpawnItem {
        id: DropId,
        position: Vec2,
        label: u32,
        fall_duration: f32,
    },
    CollectedReaction {
        id: DropId,
        /// Where the player caught it (for the "gloop" chomp label)
        player_x: f32,
    },
    MissedReaction {
        id: DropId,
    },
    /// Drop node can be taken out of the scene
    RemoveItem {
        id: DropId,
    },
    ShowMessage(String),
    HideMessage,
    ScoreChanged(u64),
    LevelChanged(u32),
    ContinuesChanged(u32),
    StartButtonVisible(bool),
    PlayerMoved {
        x: f32,
        facing: Facing,
    },
    /// Player walks back to the home position after a game over
    PlayerReturnHome {
        x: f32,
        /// Left when walking back from the right half, otherwise right
        facing: Facing,
    },
    PlayerAnimation(PlayerAnimation),
    Sound(SoundEffect),
    PhaseChanged(GamePhase),
}
