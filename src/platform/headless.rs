//! Headless world and autopilot
//!
//! Stands in for the scene graph and physics engine: drops hang at the spawn
//! line while they fade in and stretch, then fall linearly to the floor.
//! Contacts are reported the way the physics engine would report them.

use serde::{Deserialize, Serialize};

use super::{Renderer, RewardProvider, dispatch};
use crate::audio::AudioTrigger;
use crate::consts::SIM_DT;
use crate::sim::{Body, Contact, DropId, FixedStep, Game, GameEvent, GamePhase, TickInput};
use crate::tuning::Tuning;

#[derive(Debug, Clone)]
struct FallingBody {
    id: DropId,
    x: f32,
    age: f32,
    /// Fall time for this drop
    fall_duration: f32,
    /// Physics body removed (contact already reported or run ended)
    inert: bool,
}

/// Kinematic stand-in for the physics scene
#[derive(Debug, Clone)]
pub struct HeadlessWorld {
    spawn_y: f32,
    floor_y: f32,
    hang_time: f32,
    player_x: f32,
    player_half_width: f32,
    player_height: f32,
    bodies: Vec<FallingBody>,
}

impl HeadlessWorld {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            spawn_y: tuning.spawn_y,
            floor_y: tuning.floor_y,
            hang_time: tuning.drop_appear_duration + tuning.drop_stretch_duration,
            player_x: tuning.field_center_x(),
            player_half_width: tuning.player_half_width,
            player_height: tuning.player_height,
            bodies: Vec::new(),
        }
    }

    /// Number of drops still able to make contact
    pub fn live_drops(&self) -> usize {
        self.bodies.iter().filter(|b| !b.inert).count()
    }

    /// Mirror what a scene graph would do for each event
    pub fn observe(&mut self, event: &GameEvent) {
        match event {
            GameEvent::SpawnItem {
                id,
                position,
                fall_duration,
                ..
            } => self.bodies.push(FallingBody {
                id: *id,
                x: position.x,
                age: 0.0,
                fall_duration: *fall_duration,
                inert: false,
            }),
            GameEvent::RemoveItem { id } => self.bodies.retain(|b| b.id != *id),
            GameEvent::PlayerMoved { x, .. } | GameEvent::PlayerReturnHome { x, .. } => {
                self.player_x = *x
            }
            GameEvent::PhaseChanged(GamePhase::GameOver) => {
                // Drops freeze in place and lose their physics bodies
                for body in &mut self.bodies {
                    body.inert = true;
                }
            }
            _ => {}
        }
    }

    fn height_of(&self, body: &FallingBody) -> f32 {
        let t = ((body.age - self.hang_time) / body.fall_duration).clamp(0.0, 1.0);
        self.spawn_y - (self.spawn_y - self.floor_y) * t
    }

    /// Advance falling drops and report begin-contacts
    pub fn step(&mut self, dt: f32) -> Vec<Contact> {
        let mut contacts = Vec::new();
        let catch_line = self.floor_y + self.player_height;

        for i in 0..self.bodies.len() {
            if self.bodies[i].inert {
                continue;
            }
            if self.height_of(&self.bodies[i]) > self.floor_y {
                self.bodies[i].age += dt;
            }

            let y = self.height_of(&self.bodies[i]);
            let body = &self.bodies[i];
            let under_player = (body.x - self.player_x).abs() <= self.player_half_width;

            let contact = if y <= catch_line && y > self.floor_y && under_player {
                Some(Contact::new(Body::player(), Body::item(body.id)))
            } else if y <= self.floor_y {
                Some(Contact::new(Body::item(body.id), Body::ground()))
            } else {
                None
            };

            if let Some(contact) = contact {
                self.bodies[i].inert = true;
                contacts.push(contact);
            }
        }
        contacts
    }

    /// Drop that will reach the player first
    pub fn most_urgent(&self) -> Option<(DropId, f32)> {
        self.bodies
            .iter()
            .filter(|b| !b.inert)
            .max_by(|a, b| {
                a.age
                    .partial_cmp(&b.age)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(b.id.cmp(&a.id))
            })
            .map(|b| (b.id, b.x))
    }
}

/// Drags the player under the most urgent drop
#[derive(Debug, Clone, Copy)]
pub struct Autopilot {
    /// Max drag speed (points per second)
    pub speed: f32,
}

impl Autopilot {
    pub fn new(speed: f32) -> Self {
        Self { speed }
    }

    /// Next drag position, or `None` when nothing needs catching
    pub fn steer(&self, world: &HeadlessWorld, player_x: f32, dt: f32) -> Option<f32> {
        let (_, target) = world.most_urgent()?;
        let max_step = self.speed * dt;
        let delta = (target - player_x).clamp(-max_step, max_step);
        Some(player_x + delta)
    }
}

/// Outcome of an autoplay session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AutoplayReport {
    pub seconds: f32,
    pub best_level: u32,
    pub final_level: u32,
    pub final_score: u64,
    pub drops_caught: u32,
    pub game_overs: u32,
    pub continues_used: u32,
    pub rewards_granted: u32,
    pub final_phase: GamePhase,
}

/// Play `game` with the autopilot for up to `seconds` of simulated time.
///
/// Starts the run if idle, spends continues after each game over, and asks
/// `rewards` for more when out of them. Stops at the time limit or once the
/// run is over for good.
pub fn run_autoplay(
    game: &mut Game,
    seconds: f32,
    renderer: &mut dyn Renderer,
    audio: &mut dyn AudioTrigger,
    mut rewards: Option<&mut dyn RewardProvider>,
) -> AutoplayReport {
    let mut world = HeadlessWorld::new(game.tuning());
    let autopilot = Autopilot::new(game.tuning().autopilot_speed);
    let mut step = FixedStep::new();
    let mut input = TickInput::default();
    let mut report = AutoplayReport::default();

    let mut elapsed = 0.0f32;
    while elapsed < seconds {
        match game.phase() {
            GamePhase::Idle => input.start = true,
            GamePhase::GameOver => {
                if game.run().continues_remaining == 0 {
                    let Some(provider) = rewards.as_deref_mut() else {
                        break;
                    };
                    let before = game.run().continues_remaining;
                    game.request_reward(provider);
                    if game.run().continues_remaining == before {
                        break;
                    }
                    report.rewards_granted += game.run().continues_remaining - before;
                }
                input.continue_run = true;
                report.continues_used += 1;
            }
            _ => {}
        }

        input.drag_x = autopilot.steer(&world, game.player().x, SIM_DT);

        let ticks = step.advance(game, &mut input, SIM_DT);
        elapsed += SIM_DT;

        let events = game.drain_events();
        for event in &events {
            world.observe(event);
            match event {
                GameEvent::CollectedReaction { .. } => report.drops_caught += 1,
                GameEvent::PhaseChanged(GamePhase::GameOver) => report.game_overs += 1,
                _ => {}
            }
        }
        dispatch(events, renderer, audio);

        report.best_level = report.best_level.max(game.run().level);
        input.contacts = world.step(ticks as f32 * SIM_DT);
    }

    report.seconds = elapsed;
    report.final_level = game.run().level;
    report.final_score = game.run().score;
    report.final_phase = game.phase();
    log::info!(
        "Autoplay finished after {:.1}s: level {}, score {}, {} game over(s)",
        elapsed,
        report.final_level,
        report.final_score,
        report.game_overs
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SilentAudio;
    use crate::platform::LogRenderer;
    use crate::sim::ContactOutcome;
    use crate::sim::CollisionPolicy;
    use glam::Vec2;

    fn spawn(id: u32, x: f32) -> GameEvent {
        GameEvent::SpawnItem {
            id: DropId(id),
            position: Vec2::new(x, Tuning::default().spawn_y),
            label: 1,
            fall_duration: 1.0,
        }
    }

    fn step_for(world: &mut HeadlessWorld, seconds: f32) -> Vec<Contact> {
        let mut contacts = Vec::new();
        let mut t = 0.0;
        while t < seconds {
            contacts.extend(world.step(SIM_DT));
            t += SIM_DT;
        }
        contacts
    }

    #[test]
    fn test_drop_under_player_is_caught() {
        let tuning = Tuning::default();
        let mut world = HeadlessWorld::new(&tuning);
        world.observe(&spawn(1, tuning.field_center_x() + 10.0));

        // Still hanging at the spawn line
        assert!(step_for(&mut world, 1.0).is_empty());

        let contacts = step_for(&mut world, 2.0);
        assert_eq!(contacts.len(), 1);
        assert_eq!(
            CollisionPolicy::classify(&contacts[0]),
            ContactOutcome::Collected(DropId(1))
        );
        assert_eq!(world.live_drops(), 0);
    }

    #[test]
    fn test_drop_away_from_player_hits_ground() {
        let tuning = Tuning::default();
        let mut world = HeadlessWorld::new(&tuning);
        world.observe(&spawn(2, tuning.drop_min_x()));

        let contacts = step_for(&mut world, 3.0);
        assert_eq!(contacts.len(), 1);
        assert_eq!(
            CollisionPolicy::classify(&contacts[0]),
            ContactOutcome::Missed(DropId(2))
        );
    }

    #[test]
    fn test_game_over_freezes_drops() {
        let tuning = Tuning::default();
        let mut world = HeadlessWorld::new(&tuning);
        world.observe(&spawn(3, tuning.drop_min_x()));
        world.observe(&GameEvent::PhaseChanged(GamePhase::GameOver));
        assert!(step_for(&mut world, 5.0).is_empty());

        world.observe(&GameEvent::RemoveItem { id: DropId(3) });
        assert!(world.most_urgent().is_none());
    }

    #[test]
    fn test_autopilot_moves_toward_oldest_drop() {
        let tuning = Tuning::default();
        let mut world = HeadlessWorld::new(&tuning);
        world.observe(&spawn(1, 200.0));
        world.step(0.5);
        world.observe(&spawn(2, 1200.0));

        let pilot = Autopilot::new(600.0);
        let next = pilot.steer(&world, 668.0, 0.1).unwrap();
        assert!((next - 608.0).abs() < 1e-3);
    }

    #[test]
    fn test_autoplay_clears_level_one() {
        let mut game = Game::new(Tuning::default(), 2024).unwrap();
        let mut renderer = LogRenderer::default();
        let report = run_autoplay(&mut game, 16.0, &mut renderer, &mut SilentAudio, None);

        assert_eq!(report.game_overs, 0);
        assert!(report.best_level >= 2, "report: {report:?}");
        assert!(report.drops_caught >= 10);
    }

    struct AlwaysGrant;

    impl RewardProvider for AlwaysGrant {
        fn request_reward(&mut self, on_granted: &mut dyn FnMut()) {
            on_granted();
        }
    }

    #[test]
    fn test_autoplay_eventually_loses_and_spends_rewards() {
        let tuning = Tuning {
            starting_continues: 0,
            // Player never moves, so sooner or later a drop lands away from it
            autopilot_speed: 0.0,
            ..Default::default()
        };
        let mut game = Game::new(tuning, 5).unwrap();
        let mut renderer = LogRenderer::default();
        let mut provider = AlwaysGrant;
        let report = run_autoplay(
            &mut game,
            30.0,
            &mut renderer,
            &mut SilentAudio,
            Some(&mut provider),
        );

        assert!(report.game_overs >= 1);
        assert!(report.rewards_granted >= 1);
        assert_eq!(report.rewards_granted, report.continues_used);
    }
}
