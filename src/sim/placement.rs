//! Snake-like drop placement
//!
//! Successive drops drift from the previous drop's x by a level-scaled step
//! instead of landing anywhere in the field. The walk is bounded by the field
//! margins and its step widens with level.

use rand::Rng;

/// Upper cap on the per-drop horizontal step
pub const MAX_DRIFT: f32 = 400.0;

/// Horizontal band drops may spawn in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropBand {
    pub min_x: f32,
    pub max_x: f32,
    pub margin: f32,
}

impl DropBand {
    pub fn new(min_x: f32, max_x: f32, margin: f32) -> Self {
        Self { min_x, max_x, margin }
    }

    #[inline]
    pub fn low(&self) -> f32 {
        self.min_x + self.margin
    }

    #[inline]
    pub fn high(&self) -> f32 {
        self.max_x - self.margin
    }

    #[inline]
    pub fn clamp(&self, x: f32) -> f32 {
        x.clamp(self.low(), self.high())
    }
}

/// Range of the random step for `level`: `[50 + level, 60 * level]`
pub fn drift_range(level: u32) -> (f32, f32) {
    let level = level.max(1) as f32;
    (50.0 + level, 60.0 * level)
}

/// Remembers where the last drop went
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacementHistory {
    pub previous_drop_x: Option<f32>,
}

/// Plans the x coordinate of each new drop
#[derive(Debug, Clone, Default)]
pub struct DropPlacementPlanner {
    history: PlacementHistory,
}

impl DropPlacementPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &PlacementHistory {
        &self.history
    }

    /// Forget the walk (new run)
    pub fn reset(&mut self) {
        self.history.previous_drop_x = None;
    }

    /// Draw the next drop position
    pub fn next_x<R: Rng>(&mut self, rng: &mut R, band: &DropBand, level: u32) -> f32 {
        let base = rng.random_range(band.low()..=band.high());

        let (lo, hi) = drift_range(level);
        let modifier = rng.random_range(lo..=hi.max(lo)).min(MAX_DRIFT);

        let previous = *self.history.previous_drop_x.get_or_insert(base);

        let x = if previous < base {
            previous + modifier
        } else {
            previous - modifier
        };
        let x = band.clamp(x);

        self.history.previous_drop_x = Some(x);
        x
    }
}
