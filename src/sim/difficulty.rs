//! Level difficulty curve
//!
//! Maps a level to the size of its wave and the spawn cadence.

use crate::consts::{MAX_DROP_SPEED, MIN_DROP_SPEED};

/// Parameters for one wave of drops
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveParams {
    /// Number of drops spawned during the wave
    pub drop_count: u32,
    /// Seconds between spawns (smaller is harder)
    pub drop_speed: f32,
}

/// Hand-tuned difficulty progression
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyCurve {
    pub min_drop_speed: f32,
    pub max_drop_speed: f32,
}

impl Default for DifficultyCurve {
    fn default() -> Self {
        Self {
            min_drop_speed: MIN_DROP_SPEED,
            max_drop_speed: MAX_DROP_SPEED,
        }
    }
}

impl DifficultyCurve {
    pub fn new(min_drop_speed: f32, max_drop_speed: f32) -> Self {
        Self {
            min_drop_speed,
            max_drop_speed,
        }
    }

    /// Drops in the wave for `level`.
    ///
    /// Linear through level 5, then fixed steps. The jump from 50 to 75 is intended.
    pub fn drop_count(level: u32) -> u32 {
        match level {
            0..=5 => level * 10,
            6 => 75,
            7 => 100,
            _ => 150,
        }
    }

    /// Spawn interval for `level` with `drop_count` drops, clamped to the curve bounds
    pub fn drop_speed(&self, level: u32, drop_count: u32) -> f32 {
        let level = level as f32;
        let count = drop_count.max(1) as f32;
        let speed = 1.0 / (level + level / count);
        speed.clamp(self.min_drop_speed, self.max_drop_speed)
    }

    /// Full wave parameters for `level`
    pub fn wave(&self, level: u32) -> WaveParams {
        let drop_count = Self::drop_count(level);
        WaveParams {
            drop_count,
            drop_speed: self.drop_speed(level, drop_count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_drop_count_steps() {
        for level in 1..=5 {
            assert_eq!(DifficultyCurve::drop_count(level), level * 10);
        }
        assert_eq!(DifficultyCurve::drop_count(6), 75);
        assert_eq!(DifficultyCurve::drop_count(7), 100);
        assert_eq!(DifficultyCurve::drop_count(8), 150);
        assert_eq!(DifficultyCurve::drop_count(42), 150);
    }

    #[test]
    fn test_level_one_wave() {
        let wave = DifficultyCurve::default().wave(1);
        assert_eq!(wave.drop_count, 10);
        // 1 / (1 + 1/10)
        assert!((wave.drop_speed - 1.0 / 1.1).abs() < 1e-6);
    }

    #[test]
    fn test_high_levels_hit_speed_floor() {
        let curve = DifficultyCurve::default();
        // 1 / (9 + 9/150) ~ 0.110, below the floor
        assert_eq!(curve.wave(9).drop_speed, MIN_DROP_SPEED);
        assert_eq!(curve.wave(500).drop_speed, MIN_DROP_SPEED);
    }

    #[test]
    fn test_custom_bounds_clamp() {
        let curve = DifficultyCurve::new(0.5, 0.6);
        assert_eq!(curve.wave(1).drop_speed, 0.6);
        assert_eq!(curve.wave(4).drop_speed, 0.5);
    }

    proptest! {
        #[test]
        fn prop_drop_speed_within_bounds(level in 1u32..10_000) {
            let curve = DifficultyCurve::default();
            let speed = curve.wave(level).drop_speed;
            prop_assert!(speed >= MIN_DROP_SPEED);
            prop_assert!(speed <= MAX_DROP_SPEED);
        }

        #[test]
        fn prop_speed_never_slows_down(level in 1u32..1_000) {
            let curve = DifficultyCurve::default();
            prop_assert!(curve.wave(level + 1).drop_speed <= curve.wave(level).drop_speed);
        }
    }
}
