//! Per-die shake animation parameters.
//!
//! Each die gets its own period and start offset so a row of rolling dice
//! does not move in lockstep. Parameters are drawn again every time a roll
//! starts.

use rand::Rng;
use std::f32::consts::TAU;
use std::time::Duration;

/// Shortest shake period, in seconds.
pub const MIN_PERIOD_SECS: f32 = 0.25;
/// Longest shake period (exclusive), in seconds.
pub const MAX_PERIOD_SECS: f32 = 0.45;
/// Furthest the animation may start "in the past", in seconds.
pub const MAX_LEAD_SECS: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShakeParams {
    /// Length of one full shake cycle in seconds.
    pub period_secs: f32,
    /// Start delay in seconds, always in (-0.5, 0]. Negative delays start
    /// the cycle part-way through.
    pub delay_secs: f32,
}

impl ShakeParams {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            period_secs: rng.gen_range(MIN_PERIOD_SECS..MAX_PERIOD_SECS),
            delay_secs: -rng.gen_range(0.0..MAX_LEAD_SECS),
        }
    }

    /// Fresh parameters for each of `count` dice.
    pub fn for_dice<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<Self> {
        (0..count).map(|_| Self::random(rng)).collect()
    }

    /// Position within the cycle at `elapsed`, in [0, 1).
    pub fn phase_at(&self, elapsed: Duration) -> f32 {
        let t = elapsed.as_secs_f32() - self.delay_secs;
        (t / self.period_secs).rem_euclid(1.0)
    }

    /// Horizontal displacement in whole cells: -1, 0 or 1.
    pub fn offset_at(&self, elapsed: Duration) -> i8 {
        let wave = (self.phase_at(elapsed) * TAU).sin();
        if wave > 0.5 {
            1
        } else if wave < -0.5 {
            -1
        } else {
            0
        }
    }
}

impl Default for ShakeParams {
    fn default() -> Self {
        Self {
            period_secs: MIN_PERIOD_SECS,
            delay_secs: 0.0,
        }
    }
}
