//! Scoring module - layer-clear points, level progression and the fall curve
//!
//! Points are a flat lookup by the number of layers cleared with one lock (no
//! level multiplier, no combos). The level is derived from the running total of
//! cleared layers, and the level selects the gravity interval.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{
    FALL_CURVE_KEYFRAMES, FALL_INTERVAL_MIN_MS, SCORE_PER_1, SCORE_PER_2, SCORE_PER_3,
    SCORE_PER_4_PLUS,
};

/// Points awarded per lock, keyed by layers cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreTable {
    pub enabled: bool,
    pub per_1: u32,
    pub per_2: u32,
    pub per_3: u32,
    /// Applies to four or more layers.
    pub per_4_plus: u32,
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self {
            enabled: true,
            per_1: SCORE_PER_1,
            per_2: SCORE_PER_2,
            per_3: SCORE_PER_3,
            per_4_plus: SCORE_PER_4_PLUS,
        }
    }
}

impl ScoreTable {
    /// Points for clearing `layers` layers at once.
    pub fn points_for(&self, layers: usize) -> u32 {
        if !self.enabled {
            return 0;
        }
        match layers {
            0 => 0,
            1 => self.per_1,
            2 => self.per_2,
            3 => self.per_3,
            _ => self.per_4_plus,
        }
    }
}

/// Level reached after `total_cleared` layers.
///
/// `1 + total / every`; a cadence of 0 is treated as 1.
pub fn level_for(total_cleared: u32, every: u32) -> u32 {
    1 + total_cleared / every.max(1)
}

/// Gravity interval as a function of level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallCurve {
    /// `(level, interval_ms)` pairs, strictly increasing in level.
    pub keyframes: Vec<(u32, u32)>,
    /// Floor applied after interpolation.
    pub min_interval_ms: u32,
}

impl Default for FallCurve {
    fn default() -> Self {
        Self {
            keyframes: FALL_CURVE_KEYFRAMES.to_vec(),
            min_interval_ms: FALL_INTERVAL_MIN_MS,
        }
    }
}

impl FallCurve {
    /// Check the curve is usable and never gets slower as the level rises.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.keyframes.is_empty() {
            return Err(ConfigError::InvalidFallCurve("no keyframes"));
        }
        if self.min_interval_ms == 0 {
            return Err(ConfigError::InvalidFallCurve("minimum interval must be positive"));
        }
        for pair in self.keyframes.windows(2) {
            let ((l0, ms0), (l1, ms1)) = (pair[0], pair[1]);
            if l1 <= l0 {
                return Err(ConfigError::InvalidFallCurve(
                    "keyframe levels must be strictly increasing",
                ));
            }
            if ms1 > ms0 {
                return Err(ConfigError::InvalidFallCurve(
                    "keyframe intervals must not increase with level",
                ));
            }
        }
        Ok(())
    }

    /// Fall interval for `level` in milliseconds.
    ///
    /// Linear between keyframes, constant beyond either end, never below
    /// `min_interval_ms`.
    pub fn interval_ms(&self, level: u32) -> u32 {
        let raw = match (self.keyframes.first(), self.keyframes.last()) {
            (Some(&(l0, ms0)), _) if level <= l0 => ms0,
            (_, Some(&(ln, msn))) if level >= ln => msn,
            (Some(_), Some(_)) => self
                .keyframes
                .windows(2)
                .find(|w| level >= w[0].0 && level < w[1].0)
                .map(|w| lerp(w[0], w[1], level))
                .unwrap_or(self.min_interval_ms),
            _ => self.min_interval_ms,
        };
        raw.max(self.min_interval_ms)
    }
}

fn lerp((l0, ms0): (u32, u32), (l1, ms1): (u32, u32), level: u32) -> u32 {
    let span = u64::from(l1 - l0);
    let t = u64::from(level - l0);
    let (a, b) = (u64::from(ms0), u64::from(ms1));
    let v = if b <= a {
        a - (a - b) * t / span
    } else {
        a + (b - a) * t / span
    };
    v as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_lookup() {
        let table = ScoreTable::default();
        assert_eq!(table.points_for(0), 0);
        assert_eq!(table.points_for(1), 100);
        assert_eq!(table.points_for(2), 300);
        assert_eq!(table.points_for(3), 500);
        assert_eq!(table.points_for(4), 800);
        assert_eq!(table.points_for(9), 800);
    }

    #[test]
    fn test_points_disabled() {
        let table = ScoreTable {
            enabled: false,
            ..ScoreTable::default()
        };
        assert_eq!(table.points_for(4), 0);
    }

    #[test]
    fn test_level_calculation() {
        assert_eq!(level_for(0, 2), 1);
        assert_eq!(level_for(1, 2), 1);
        assert_eq!(level_for(2, 2), 2);
        assert_eq!(level_for(7, 2), 4);
        assert_eq!(level_for(5, 0), 6);
    }

    #[test]
    fn test_fall_interval_keyframes() {
        let curve = FallCurve::default();
        assert_eq!(curve.interval_ms(1), 900);
        assert_eq!(curve.interval_ms(5), 650);
        assert_eq!(curve.interval_ms(10), 400);
        assert_eq!(curve.interval_ms(20), 200);
    }

    #[test]
    fn test_fall_interval_interpolates() {
        let curve = FallCurve::default();
        // 900 -> 650 over 4 levels
        assert_eq!(curve.interval_ms(3), 775);
        // 400 -> 200 over 10 levels
        assert_eq!(curve.interval_ms(15), 300);
    }

    #[test]
    fn test_fall_interval_clamps_past_ends() {
        let curve = FallCurve::default();
        assert_eq!(curve.interval_ms(0), 900);
        assert_eq!(curve.interval_ms(500), 200);

        let fast = FallCurve {
            keyframes: vec![(1, 300), (2, 50)],
            min_interval_ms: 120,
        };
        assert_eq!(fast.interval_ms(2), 120);
        assert_eq!(fast.interval_ms(u32::MAX), 120);
    }

    #[test]
    fn test_fall_interval_never_increases() {
        let curve = FallCurve::default();
        let mut prev = curve.interval_ms(1);
        for level in 2..64 {
            let cur = curve.interval_ms(level);
            assert!(cur <= prev, "level {level}: {cur} > {prev}");
            assert!(cur >= curve.min_interval_ms);
            prev = cur;
        }
    }

    #[test]
    fn test_fall_curve_validation() {
        assert!(FallCurve::default().validate().is_ok());

        let empty = FallCurve {
            keyframes: vec![],
            ..FallCurve::default()
        };
        assert!(empty.validate().is_err());

        let unordered = FallCurve {
            keyframes: vec![(5, 500), (5, 400)],
            ..FallCurve::default()
        };
        assert!(unordered.validate().is_err());

        let slower = FallCurve {
            keyframes: vec![(1, 500), (2, 600)],
            ..FallCurve::default()
        };
        assert!(slower.validate().is_err());

        let zero_floor = FallCurve {
            min_interval_ms: 0,
            ..FallCurve::default()
        };
        assert!(zero_floor.validate().is_err());
    }
}
