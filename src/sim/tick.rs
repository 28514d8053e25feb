//! Fixed timestep driver
//!
//! Hosts collect input between frames into a [`TickInput`] and feed real
//! frame time to a [`FixedStep`], which advances the game in `SIM_DT` steps.

use super::collision::Contact;
use super::progression::Game;
use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Input gathered for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Start button tapped
    pub start: bool,
    /// Continue button tapped
    pub continue_run: bool,
    /// Latest drag position of the player
    pub drag_x: Option<f32>,
    /// Touch released
    pub release: bool,
    /// Contacts reported by physics since the last tick
    pub contacts: Vec<Contact>,
}

impl TickInput {
    /// Clear one-shot inputs after they have been processed
    pub fn clear_one_shots(&mut self) {
        self.start = false;
        self.continue_run = false;
        self.drag_x = None;
        self.release = false;
        self.contacts.clear();
    }
}

/// Apply `input` then advance the game by `dt`.
///
/// Contacts resolve before time moves, so a miss cancels any tick due in this step.
pub fn tick(game: &mut Game, input: &TickInput, dt: f32) {
    if input.start {
        game.on_start_pressed();
    }
    if input.continue_run {
        game.on_continue_pressed();
    }
    if let Some(x) = input.drag_x {
        game.on_player_drag(x);
    }
    if input.release {
        game.on_player_released();
    }
    for contact in &input.contacts {
        game.on_contact(*contact);
    }

    game.update(dt);
}

/// Accumulates variable frame time into fixed simulation steps
#[derive(Debug, Clone, Default)]
pub struct FixedStep {
    accumulator: f32,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run as many fixed ticks as `frame_dt` covers. Returns the number of ticks run.
    ///
    /// One-shot input is consumed by the first tick.
    pub fn advance(&mut self, game: &mut Game, input: &mut TickInput, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, 0.1);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(game, input, SIM_DT);
            input.clear_one_shots();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }
}
