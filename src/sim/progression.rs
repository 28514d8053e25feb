//! Level, score and continue state machine
//!
//! [`Game`] owns the run and orchestrates the other simulation parts:
//! it asks the curve for each wave, arms the spawner, places drops, and turns
//! classified contacts into score, level transitions and game overs.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::{CollisionPolicy, Contact, ContactOutcome};
use super::difficulty::DifficultyCurve;
use super::event::{GameEvent, PlayerAnimation};
use super::placement::{DropBand, DropPlacementPlanner, PlacementHistory};
use super::scheduler::{DelayKey, DelayQueue, SpawnScheduler, SpawnTick};
use super::state::{DropId, DropState, DropTable, GamePhase, Player, RunState};
use crate::audio::SoundEffect;
use crate::platform::RewardProvider;
use crate::tuning::{Tuning, TuningError};

pub const START_MESSAGE: &str = "Tap to start game";
pub const GET_READY_MESSAGE: &str = "Get Ready!";
pub const GAME_OVER_MESSAGE: &str = "Game Over\nTap to try again";

/// Actions waiting on the delay queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    AdvanceLevel,
    RemoveDrop(DropId),
}

/// The gameplay simulation
#[derive(Debug, Clone)]
pub struct Game {
    tuning: Tuning,
    curve: DifficultyCurve,
    band: DropBand,
    rng: Pcg32,
    phase: GamePhase,
    run: RunState,
    planner: DropPlacementPlanner,
    spawner: SpawnScheduler,
    delays: DelayQueue<Deferred>,
    drops: DropTable,
    player: Player,
    /// Simulation time in seconds
    clock: f64,
    events: Vec<GameEvent>,
}

impl Game {
    /// Create an idle game. Fails if the tuning cannot produce a playable field.
    pub fn new(tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        tuning.validate()?;

        let band = DropBand::new(tuning.field_min_x, tuning.field_max_x, tuning.drop_margin);
        let curve = DifficultyCurve::new(tuning.min_drop_speed, tuning.max_drop_speed);
        let run = RunState::new(tuning.starting_continues);
        let player = Player::new(tuning.field_center_x());

        let mut game = Self {
            tuning,
            curve,
            band,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Idle,
            run,
            planner: DropPlacementPlanner::new(),
            spawner: SpawnScheduler::new(),
            delays: DelayQueue::new(),
            drops: DropTable::new(),
            player,
            clock: 0.0,
            events: Vec::new(),
        };

        game.emit(GameEvent::ScoreChanged(game.run.score));
        game.emit(GameEvent::LevelChanged(game.run.level));
        game.emit(GameEvent::ContinuesChanged(game.run.continues_remaining));
        game.emit(GameEvent::StartButtonVisible(true));
        game.emit(GameEvent::ShowMessage(START_MESSAGE.to_string()));

        log::info!("Game created with seed {}", seed);
        Ok(game)
    }

    // === Accessors ===

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn run(&self) -> &RunState {
        &self.run
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn drops(&self) -> &DropTable {
        &self.drops
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn placement_history(&self) -> &PlacementHistory {
        self.planner.history()
    }

    /// True while spawn ticks are still pending for the wave
    pub fn is_spawning(&self) -> bool {
        self.spawner.is_active()
    }

    /// True while the "Get Ready!" delay is pending
    pub fn level_transition_pending(&self) -> bool {
        self.delays.contains(DelayKey::LevelTransition)
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    // === Input handlers ===

    /// Start button. Starts a fresh run from `Idle` or `GameOver`.
    pub fn on_start_pressed(&mut self) {
        if self.phase.in_progress() {
            log::debug!("Start ignored: run already in progress");
            return;
        }

        self.run = RunState::new(self.run.continues_remaining);
        self.planner.reset();
        self.emit(GameEvent::ScoreChanged(self.run.score));
        self.emit(GameEvent::LevelChanged(self.run.level));

        log::info!("New run started");
        self.start_wave();
    }

    /// Continue button. Resumes a failed run at the same level and score.
    pub fn on_continue_pressed(&mut self) {
        if self.phase != GamePhase::GameOver {
            log::debug!("Continue ignored in phase {:?}", self.phase);
            return;
        }
        if self.run.continues_remaining == 0 {
            log::debug!("Continue ignored: no continues left");
            return;
        }

        self.run.continues_remaining -= 1;
        self.emit(GameEvent::ContinuesChanged(self.run.continues_remaining));

        log::info!(
            "Continue used at level {} ({} left)",
            self.run.level,
            self.run.continues_remaining
        );
        self.start_wave();
    }

    /// Player dragged to `x`. Ignored unless a run is in progress.
    pub fn on_player_drag(&mut self, x: f32) {
        if !self.phase.in_progress() {
            return;
        }
        let x = x.clamp(self.tuning.field_min_x, self.tuning.field_max_x);
        self.player.drag_to(x);
        self.emit(GameEvent::PlayerMoved {
            x,
            facing: self.player.facing,
        });
    }

    pub fn on_player_released(&mut self) {
        self.player.release();
    }

    /// Begin-contact notification from physics
    pub fn on_contact(&mut self, contact: Contact) {
        match CollisionPolicy::classify(&contact) {
            ContactOutcome::Collected(id) => self.collect(id),
            ContactOutcome::Missed(id) => self.miss(id),
            ContactOutcome::Ignored => {
                log::trace!("Ignored contact {:?}", contact.categories());
            }
        }
    }

    /// Add the reward continues, capped at the maximum
    pub fn grant_reward(&mut self) {
        let before = self.run.continues_remaining;
        let after = before
            .saturating_add(self.tuning.reward_continues)
            .min(self.tuning.max_continues);

        if after == before {
            log::warn!("Reward granted but continues already at max ({})", before);
        } else {
            log::info!("Reward granted: continues {} -> {}", before, after);
        }
        self.run.continues_remaining = after;
        self.emit(GameEvent::ContinuesChanged(after));
    }

    /// Ask `provider` for a reward and apply every grant it reports
    pub fn request_reward(&mut self, provider: &mut dyn RewardProvider) {
        let mut grants = 0u32;
        provider.request_reward(&mut || grants += 1);
        if grants == 0 {
            log::debug!("Reward not granted");
        }
        for _ in 0..grants {
            self.grant_reward();
        }
    }

    // === Time ===

    /// Advance the clock by `dt` seconds, firing due spawns and delayed actions in order
    pub fn update(&mut self, dt: f32) {
        let target = self.clock + dt.max(0.0) as f64;

        loop {
            let spawn_due = self.spawner.next_due().filter(|&t| t <= target);
            let delay_due = self.delays.next_due().filter(|&t| t <= target);

            match (spawn_due, delay_due) {
                (None, None) => break,
                (Some(spawn), Some(delay)) if delay < spawn => self.fire_delayed(delay),
                (Some(spawn), _) => self.fire_spawn(spawn),
                (None, Some(delay)) => self.fire_delayed(delay),
            }
        }

        self.clock = target;
    }

    fn fire_spawn(&mut self, due: f64) {
        self.clock = self.clock.max(due);
        if let Some(tick) = self.spawner.poll(self.clock, &mut self.run) {
            self.spawn_drop(tick);
        }
    }

    fn fire_delayed(&mut self, due: f64) {
        self.clock = self.clock.max(due);
        let Some((_, action)) = self.delays.pop_due(self.clock) else {
            return;
        };
        match action {
            Deferred::AdvanceLevel => self.advance_level(),
            Deferred::RemoveDrop(id) => self.emit(GameEvent::RemoveItem { id }),
        }
    }

    // === Transitions ===

    fn start_wave(&mut self) {
        let take = self.rng.random_range(1..=3u8);
        self.emit(GameEvent::Sound(SoundEffect::Mumble(take)));
        self.emit(GameEvent::PlayerAnimation(PlayerAnimation::Walk));

        let wave = self.curve.wave(self.run.level);
        self.run.drops_expected = wave.drop_count;
        self.run.drops_collected = 0;
        self.run.drops_remaining_to_spawn = wave.drop_count;
        self.run.drop_speed = wave.drop_speed;

        self.spawner.start(self.clock, wave.drop_speed, &self.run);
        self.set_phase(GamePhase::Running);

        self.emit(GameEvent::HideMessage);
        self.emit(GameEvent::StartButtonVisible(false));

        log::info!(
            "Wave started: level {} with {} drops every {:.3}s",
            self.run.level,
            wave.drop_count,
            wave.drop_speed
        );
    }

    fn spawn_drop(&mut self, tick: SpawnTick) {
        let x = self.planner.next_x(&mut self.rng, &self.band, self.run.level);
        let position = Vec2::new(x, self.tuning.spawn_y);
        let id = self.drops.spawn(position, tick.sequence);

        log::debug!("Spawned {} #{} at x={:.1}", id, tick.sequence, x);
        self.emit(GameEvent::SpawnItem {
            id,
            position,
            label: tick.sequence,
            fall_duration: self.tuning.drop_fall_duration,
        });
    }

    fn collect(&mut self, id: DropId) {
        if self.phase != GamePhase::Running {
            log::debug!("Collect of {} ignored in phase {:?}", id, self.phase);
            return;
        }
        if self.run.drops_collected >= self.run.drops_expected {
            return;
        }
        if !self.drops.resolve(id, DropState::Collected) {
            log::debug!("Collect of {} ignored: not falling", id);
            return;
        }
        self.drops.prune_resolved();

        self.run.drops_collected += 1;
        self.run.score += self.run.level as u64;

        self.emit(GameEvent::Sound(SoundEffect::Collect));
        self.emit(GameEvent::CollectedReaction {
            id,
            player_x: self.player.x,
        });
        self.emit(GameEvent::RemoveItem { id });
        self.emit(GameEvent::ScoreChanged(self.run.score));

        self.check_wave_complete();
    }

    fn check_wave_complete(&mut self) {
        if !self.run.wave_cleared() || self.phase != GamePhase::Running {
            return;
        }

        self.set_phase(GamePhase::AwaitingLevelTransition);
        self.emit(GameEvent::ShowMessage(GET_READY_MESSAGE.to_string()));
        self.delays.schedule(
            self.clock,
            self.tuning.level_transition_delay,
            DelayKey::LevelTransition,
            Deferred::AdvanceLevel,
        );

        log::info!(
            "Level {} cleared (score {})",
            self.run.level,
            self.run.score
        );
    }

    fn advance_level(&mut self) {
        if self.phase != GamePhase::AwaitingLevelTransition {
            return;
        }
        self.run.level += 1;
        self.emit(GameEvent::LevelChanged(self.run.level));
        self.start_wave();
    }

    fn miss(&mut self, id: DropId) {
        if !self.phase.in_progress() {
            log::debug!("Miss of {} ignored in phase {:?}", id, self.phase);
            return;
        }
        if !self.drops.resolve(id, DropState::Missed) {
            log::debug!("Miss of {} ignored: not falling", id);
            return;
        }

        self.emit(GameEvent::Sound(SoundEffect::Miss));
        self.emit(GameEvent::MissedReaction { id });
        self.game_over();
    }

    fn game_over(&mut self) {
        self.spawner.cancel();
        self.delays.cancel(DelayKey::LevelTransition);

        self.set_phase(GamePhase::GameOver);
        self.emit(GameEvent::ShowMessage(GAME_OVER_MESSAGE.to_string()));
        self.emit(GameEvent::PlayerAnimation(PlayerAnimation::Die));

        self.player.walk_home(self.tuning.field_center_x());
        self.emit(GameEvent::PlayerReturnHome {
            x: self.player.x,
            facing: self.player.facing,
        });

        // Remaining drops leave the simulation now and pop off screen one by one
        for (i, id) in self.drops.clear().into_iter().enumerate() {
            let delay = self.tuning.clear_initial_delay + self.tuning.clear_stagger * i as f32;
            self.delays.schedule(
                self.clock,
                delay,
                DelayKey::ClearDrops,
                Deferred::RemoveDrop(id),
            );
        }

        self.emit(GameEvent::StartButtonVisible(true));

        log::info!(
            "Game over at level {} with score {} ({} continues left)",
            self.run.level,
            self.run.score,
            self.run.continues_remaining
        );
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            self.phase = phase;
            self.emit(GameEvent::PhaseChanged(phase));
        }
    }

    fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}
