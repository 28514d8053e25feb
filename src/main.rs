//! Gloop Drop headless runner
//!
//! Plays the game with the autopilot and prints a JSON report.
//!
//! Usage: `gloop-drop [tuning.json|-] [seed] [seconds]`

#[cfg(not(target_arch = "wasm32"))]
use gloop_drop::audio::LogAudio;
#[cfg(not(target_arch = "wasm32"))]
use gloop_drop::platform::headless::run_autoplay;
#[cfg(not(target_arch = "wasm32"))]
use gloop_drop::platform::{LogRenderer, RewardProvider};
#[cfg(not(target_arch = "wasm32"))]
use gloop_drop::sim::Game;
#[cfg(not(target_arch = "wasm32"))]
use gloop_drop::{Tuning, TuningError};

#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_SECONDS: f32 = 120.0;

/// Grants every reward it is asked for
#[cfg(not(target_arch = "wasm32"))]
struct GenerousSponsor {
    granted: u32,
}

#[cfg(not(target_arch = "wasm32"))]
impl RewardProvider for GenerousSponsor {
    fn request_reward(&mut self, on_granted: &mut dyn FnMut()) {
        self.granted += 1;
        log::info!("Reward #{} watched", self.granted);
        on_granted();
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(arg: Option<&str>) -> Result<Tuning, TuningError> {
    match arg {
        None | Some("-") => Ok(Tuning::default()),
        Some(path) => Tuning::load(path),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Gloop Drop (headless) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();

    let tuning = match load_tuning(args.first().map(String::as_str)) {
        Ok(tuning) => tuning,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let seed = match args.get(1).map(|s| s.parse::<u64>()) {
        None => 0x6c6f_6f70,
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            log::error!("Invalid seed '{}': {}", args[1], e);
            std::process::exit(1);
        }
    };

    let seconds = match args.get(2).map(|s| s.parse::<f32>()) {
        None => DEFAULT_SECONDS,
        Some(Ok(seconds)) if seconds > 0.0 => seconds,
        _ => {
            log::error!("Invalid duration '{}'", args[2]);
            std::process::exit(1);
        }
    };

    let mut game = match Game::new(tuning, seed) {
        Ok(game) => game,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let mut renderer = LogRenderer::default();
    let mut audio = LogAudio::default();
    let mut sponsor = GenerousSponsor { granted: 0 };
    let report = run_autoplay(
        &mut game,
        seconds,
        &mut renderer,
        &mut audio,
        Some(&mut sponsor),
    );

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Failed to serialize report: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts embed the library directly; there is no wasm entry point
}
