//! Game state and core simulation types
//!
//! Drops are plain data addressed by [`DropId`]; the renderer maps ids to its
//! own visual nodes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first start
    #[default]
    Idle,
    /// A wave is spawning or resolving
    Running,
    /// Wave cleared, "Get Ready!" pause before the next level
    AwaitingLevelTransition,
    /// Run ended by a missed drop
    GameOver,
}

impl GamePhase {
    /// True while a run is in progress (drags are accepted, start is ignored)
    pub fn in_progress(self) -> bool {
        matches!(self, GamePhase::Running | GamePhase::AwaitingLevelTransition)
    }
}

/// Per-run counters
#[derive(Debug, Clone, PartialEq)]
pub struct RunState {
    pub level: u32,
    pub score: u64,
    pub drops_expected: u32,
    pub drops_collected: u32,
    pub drops_remaining_to_spawn: u32,
    /// Seconds between spawns for the current wave
    pub drop_speed: f32,
    pub continues_remaining: u32,
}

impl RunState {
    /// Fresh run at level 1 carrying over the continue budget
    pub fn new(continues_remaining: u32) -> Self {
        Self {
            level: 1,
            score: 0,
            drops_expected: 0,
            drops_collected: 0,
            drops_remaining_to_spawn: 0,
            drop_speed: crate::consts::MAX_DROP_SPEED,
            continues_remaining,
        }
    }

    /// Every expected drop of the wave has been caught
    pub fn wave_cleared(&self) -> bool {
        self.drops_expected > 0 && self.drops_collected == self.drops_expected
    }
}

/// Stable handle for a drop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DropId(pub u32);

impl std::fmt::Display for DropId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "drop#{}", self.0)
    }
}

/// Drop lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropState {
    Falling,
    Collected,
    Missed,
}

/// A falling collectible
#[derive(Debug, Clone, PartialEq)]
pub struct DropItem {
    pub id: DropId,
    /// Spawn position
    pub position: Vec2,
    /// Countdown label
    pub sequence: u32,
    pub state: DropState,
}

/// Drops of the current run, sorted by id
#[derive(Debug, Clone)]
pub struct DropTable {
    drops: Vec<DropItem>,
    next_id: u32,
}

impl Default for DropTable {
    fn default() -> Self {
        Self {
            drops: Vec::new(),
            next_id: 1,
        }
    }
}

impl DropTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a falling drop and return its id
    pub fn spawn(&mut self, position: Vec2, sequence: u32) -> DropId {
        let id = DropId(self.next_id);
        self.next_id = id.0 + 1;
        self.drops.push(DropItem {
            id,
            position,
            sequence,
            state: DropState::Falling,
        });
        id
    }

    pub fn get(&self, id: DropId) -> Option<&DropItem> {
        self.drops
            .binary_search_by_key(&id, |d| d.id)
            .ok()
            .map(|i| &self.drops[i])
    }

    /// Move a falling drop to a terminal state. Returns false if it was not falling.
    pub fn resolve(&mut self, id: DropId, state: DropState) -> bool {
        match self.drops.binary_search_by_key(&id, |d| d.id) {
            Ok(i) if self.drops[i].state == DropState::Falling => {
                self.drops[i].state = state;
                true
            }
            _ => false,
        }
    }

    /// Forget drops that reached a terminal state
    pub fn prune_resolved(&mut self) {
        self.drops.retain(|d| d.state == DropState::Falling);
    }

    /// Remove every drop, returning their ids in spawn order
    pub fn clear(&mut self) -> Vec<DropId> {
        self.drops.drain(..).map(|d| d.id).collect()
    }

    pub fn len(&self) -> usize {
        self.drops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drops.is_empty()
    }
}

/// Which way the player sprite faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// Player character (moves along the floor only)
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub x: f32,
    pub facing: Facing,
    pub dragging: bool,
}

impl Player {
    pub fn new(x: f32) -> Self {
        Self {
            x,
            facing: Facing::Right,
            dragging: false,
        }
    }

    /// Drag to `x` (already clamped), turning toward the movement
    pub fn drag_to(&mut self, x: f32) {
        if x < self.x {
            self.facing = Facing::Left;
        } else if x > self.x {
            self.facing = Facing::Right;
        }
        self.x = x;
        self.dragging = true;
    }

    pub fn release(&mut self) {
        self.dragging = false;
    }

    /// Walk back to `home`, facing the direction of travel
    pub fn walk_home(&mut self, home: f32) {
        self.facing = if self.x > home {
            Facing::Left
        } else {
            Facing::Right
        };
        self.x = home;
        self.dragging = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_ids_are_unique_and_sorted() {
        let mut table = DropTable::new();
        let a = table.spawn(Vec2::new(10.0, 0.0), 3);
        let b = table.spawn(Vec2::new(20.0, 0.0), 2);
        assert!(a < b);
        assert_eq!(table.get(b).map(|d| d.sequence), Some(2));
        assert_eq!(table.get(DropId(99)), None);
    }

    #[test]
    fn test_resolve_only_once() {
        let mut table = DropTable::new();
        let id = table.spawn(Vec2::ZERO, 1);
        assert!(table.resolve(id, DropState::Collected));
        assert!(!table.resolve(id, DropState::Missed));
        assert_eq!(table.get(id).map(|d| d.state), Some(DropState::Collected));

        table.prune_resolved();
        assert!(table.is_empty());
    }

    #[test]
    fn test_clear_reports_remaining_in_spawn_order() {
        let mut table = DropTable::new();
        let a = table.spawn(Vec2::ZERO, 3);
        let b = table.spawn(Vec2::ZERO, 2);
        let c = table.spawn(Vec2::ZERO, 1);
        table.resolve(b, DropState::Collected);
        table.prune_resolved();
        table.resolve(c, DropState::Missed);

        assert_eq!(table.clear(), vec![a, c]);
        assert_eq!(table.len(), 0);
        // Ids keep increasing after a clear
        assert!(table.spawn(Vec2::ZERO, 1) > c);
    }

    #[test]
    fn test_player_facing_follows_drag() {
        let mut player = Player::new(100.0);
        player.drag_to(80.0);
        assert_eq!(player.facing, Facing::Left);
        player.drag_to(80.0);
        assert_eq!(player.facing, Facing::Left);
        player.drag_to(120.0);
        assert_eq!(player.facing, Facing::Right);
        assert!(player.dragging);
        player.release();
        assert!(!player.dragging);
    }

    #[test]
    fn test_default_table_ids_start_at_one() {
        let mut table = DropTable::default();
        assert_eq!(table.spawn(Vec2::ZERO, 1), DropId(1));
        assert_eq!(DropTable::new().spawn(Vec2::ZERO, 1), DropId(1));
    }

    #[test]
    fn test_walk_home_faces_center() {
        let mut player = Player::new(1000.0);
        player.drag_to(1100.0);
        player.walk_home(668.0);
        assert_eq!(player.x, 668.0);
        assert_eq!(player.facing, Facing::Left);
        assert!(!player.dragging);

        let mut player = Player::new(100.0);
        player.drag_to(50.0);
        player.walk_home(668.0);
        assert_eq!(player.facing, Facing::Right);
    }

    #[test]
    fn test_phase_in_progress() {
        assert!(!GamePhase::Idle.in_progress());
        assert!(GamePhase::Running.in_progress());
        assert!(GamePhase::AwaitingLevelTransition.in_progress());
        assert!(!GamePhase::GameOver.in_progress());
    }
}
