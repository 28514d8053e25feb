//! Sound effect triggers
//!
//! The simulation only names sounds; playback belongs to the host.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Drop caught by the player
    Collect,
    /// Drop splatted on the floor
    Miss,
    /// Player mumbles as a wave starts (one of three takes)
    Mumble(u8),
}

impl SoundEffect {
    /// Asset name for the effect
    pub fn file_name(&self) -> String {
        match self {
            SoundEffect::Collect => "collect.wav".to_string(),
            SoundEffect::Miss => "miss.wav".to_string(),
            SoundEffect::Mumble(take) => format!("blob_mumble-{}", take),
        }
    }
}

/// Something that can play sound effects
pub trait AudioTrigger {
    fn play(&mut self, effect: SoundEffect);
}

/// Audio sink that drops everything (headless runs, muted hosts)
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAudio;

impl AudioTrigger for SilentAudio {
    fn play(&mut self, _effect: SoundEffect) {}
}

/// Audio sink that logs each effect
#[derive(Debug, Clone, Default)]
pub struct LogAudio {
    pub muted: bool,
}

impl AudioTrigger for LogAudio {
    fn play(&mut self, effect: SoundEffect) {
        if !self.muted {
            log::trace!("sfx {}", effect.file_name());
        }
    }
}
