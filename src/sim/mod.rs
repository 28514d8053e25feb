//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time advances only through `Game::update`
//! - Seeded RNG only
//! - Drops addressed by id, in spawn order
//! - No rendering or platform dependencies beyond plain-data events

pub mod collision;
pub mod difficulty;
pub mod event;
pub mod placement;
pub mod progression;
pub mod scheduler;
pub mod state;
pub mod tick;

pub use collision::{Body, Category, CollisionPolicy, Contact, ContactOutcome};
pub use difficulty::{DifficultyCurve, WaveParams};
pub use event::{GameEvent, PlayerAnimation};
pub use placement::{DropBand, DropPlacementPlanner, MAX_DRIFT, PlacementHistory};
pub use progression::Game;
pub use scheduler::{DelayKey, DelayQueue, SpawnScheduler, SpawnTick};
pub use state::{DropId, DropItem, DropState, DropTable, Facing, GamePhase, Player, RunState};
pub use tick::{FixedStep, TickInput, tick};
