//! Platform abstraction layer
//!
//! Collaborators the simulation talks to:
//! - Renderer/animator (consumes [`GameEvent`]s)
//! - Reward provider (rewarded ads granting continues)
//! - Headless world standing in for physics when there is no scene graph

pub mod headless;

use glam::Vec2;

use crate::audio::AudioTrigger;
use crate::sim::{DropId, Facing, GameEvent, GamePhase, PlayerAnimation};

/// View layer. Maps drop ids to its own nodes.
pub trait Renderer {
    fn spawn_item(&mut self, id: DropId, position: Vec2, label: u32, fall_duration: f32);
    fn play_collected_reaction(&mut self, id: DropId, player_x: f32);
    fn play_missed_reaction(&mut self, id: DropId);
    fn show_message(&mut self, text: &str);
    fn hide_message(&mut self);
    fn update_score_display(&mut self, score: u64);
    fn update_level_display(&mut self, level: u32);
    fn update_continue_indicator(&mut self, remaining: u32);

    fn remove_item(&mut self, _id: DropId) {}
    fn set_start_button_visible(&mut self, _visible: bool) {}
    fn move_player(&mut self, _x: f32, _facing: Facing) {}
    fn move_player_home(&mut self, _x: f32, _facing: Facing) {}
    fn play_player_animation(&mut self, _animation: PlayerAnimation) {}
    fn phase_changed(&mut self, _phase: GamePhase) {}
}

/// Rewarded content (e.g. "watch an ad for a continue").
///
/// Call `on_granted` once per reward earned; not calling it means declined.
pub trait RewardProvider {
    fn request_reward(&mut self, on_granted: &mut dyn FnMut());
}

impl GameEvent {
    /// Deliver this event to the renderer or audio
    pub fn dispatch(self, renderer: &mut dyn Renderer, audio: &mut dyn AudioTrigger) {
        match self {
            GameEvent::SpawnItem {
                id,
                position,
                label,
                fall_duration,
            } => renderer.spawn_item(id, position, label, fall_duration),
            GameEvent::CollectedReaction { id, player_x } => {
                renderer.play_collected_reaction(id, player_x)
            }
            GameEvent::MissedReaction { id } => renderer.play_missed_reaction(id),
            GameEvent::RemoveItem { id } => renderer.remove_item(id),
            GameEvent::ShowMessage(text) => renderer.show_message(&text),
            GameEvent::HideMessage => renderer.hide_message(),
            GameEvent::ScoreChanged(score) => renderer.update_score_display(score),
            GameEvent::LevelChanged(level) => renderer.update_level_display(level),
            GameEvent::ContinuesChanged(n) => renderer.update_continue_indicator(n),
            GameEvent::StartButtonVisible(visible) => renderer.set_start_button_visible(visible),
            GameEvent::PlayerMoved { x, facing } => renderer.move_player(x, facing),
            GameEvent::PlayerReturnHome { x, facing } => renderer.move_player_home(x, facing),
            GameEvent::PlayerAnimation(animation) => renderer.play_player_animation(animation),
            GameEvent::Sound(effect) => audio.play(effect),
            GameEvent::PhaseChanged(phase) => renderer.phase_changed(phase),
        }
    }
}

/// Forward drained events to the renderer and audio in emission order
pub fn dispatch<I>(events: I, renderer: &mut dyn Renderer, audio: &mut dyn AudioTrigger)
where
    I: IntoIterator<Item = GameEvent>,
{
    for event in events {
        event.dispatch(renderer, audio);
    }
}

/// Renderer that narrates the game through `log`
#[derive(Debug, Default)]
pub struct LogRenderer {
    /// Drops currently on screen
    pub on_screen: usize,
}

impl Renderer for LogRenderer {
    fn spawn_item(&mut self, id: DropId, position: Vec2, label: u32, _fall_duration: f32) {
        self.on_screen += 1;
        log::debug!("[view] {} '{}' appears at ({:.0}, {:.0})", id, label, position.x, position.y);
    }

    fn play_collected_reaction(&mut self, id: DropId, player_x: f32) {
        log::debug!("[view] gloop! {} caught at x={:.0}", id, player_x);
    }

    fn play_missed_reaction(&mut self, id: DropId) {
        log::debug!("[view] {} splats", id);
    }

    fn show_message(&mut self, text: &str) {
        log::info!("[view] message: {}", text.replace('\n', " / "));
    }

    fn hide_message(&mut self) {}

    fn update_score_display(&mut self, score: u64) {
        log::debug!("[view] Score: {}", score);
    }

    fn update_level_display(&mut self, level: u32) {
        log::info!("[view] Level: {}", level);
    }

    fn update_continue_indicator(&mut self, remaining: u32) {
        log::info!("[view] continues remaining: {}", remaining);
    }

    fn remove_item(&mut self, _id: DropId) {
        self.on_screen = self.on_screen.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SoundEffect;
    use crate::sim::Game;
    use crate::tuning::Tuning;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
        sounds: Vec<SoundEffect>,
    }

    impl Renderer for Recorder {
        fn spawn_item(&mut self, id: DropId, _p: Vec2, label: u32, _f: f32) {
            self.calls.push(format!("spawn {} {}", id.0, label));
        }
        fn play_collected_reaction(&mut self, id: DropId, _x: f32) {
            self.calls.push(format!("collected {}", id.0));
        }
        fn play_missed_reaction(&mut self, id: DropId) {
            self.calls.push(format!("missed {}", id.0));
        }
        fn show_message(&mut self, text: &str) {
            self.calls.push(format!("show {}", text));
        }
        fn hide_message(&mut self) {
            self.calls.push("hide".into());
        }
        fn update_score_display(&mut self, score: u64) {
            self.calls.push(format!("score {}", score));
        }
        fn update_level_display(&mut self, level: u32) {
            self.calls.push(format!("level {}", level));
        }
        fn update_continue_indicator(&mut self, remaining: u32) {
            self.calls.push(format!("continues {}", remaining));
        }
    }

    impl AudioTrigger for Recorder {
        fn play(&mut self, effect: SoundEffect) {
            self.sounds.push(effect);
        }
    }

    #[test]
    fn test_dispatch_preserves_order() {
        let mut game = Game::new(Tuning::default(), 8).unwrap();
        let mut renderer = Recorder::default();
        let mut audio = Recorder::default();
        dispatch(game.drain_events(), &mut renderer, &mut audio);

        assert_eq!(
            renderer.calls,
            vec!["score 0", "level 1", "continues 1", "show Tap to start game"]
        );
    }

    #[test]
    fn test_dispatch_routes_sounds_to_audio() {
        let mut game = Game::new(Tuning::default(), 8).unwrap();
        game.drain_events();
        game.on_start_pressed();

        let mut renderer = Recorder::default();
        let mut audio = Recorder::default();
        dispatch(game.drain_events(), &mut renderer, &mut audio);

        assert!(matches!(audio.sounds.as_slice(), [SoundEffect::Mumble(1..=3)]));
        assert!(renderer.calls.contains(&"hide".to_string()));
    }

    #[test]
    fn test_single_event_dispatch() {
        let mut renderer = Recorder::default();
        let mut audio = Recorder::default();
        GameEvent::MissedReaction { id: DropId(7) }.dispatch(&mut renderer, &mut audio);
        GameEvent::Sound(SoundEffect::Miss).dispatch(&mut renderer, &mut audio);

        assert_eq!(renderer.calls, vec!["missed 7"]);
        assert_eq!(audio.sounds, vec![SoundEffect::Miss]);
    }
}
