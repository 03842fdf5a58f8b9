//! Roll sequencer state machine.
//!
//! A roll is a short run of timed shuffle ticks followed by one settling
//! tick. The sequencer only tracks *when* those happen; the controller
//! decides what each tick does to the dice.
//!
//! Every roll (and every cancellation) bumps a generation counter. Ticks are
//! stamped with the generation they were scheduled for, so a tick that
//! outlives its roll is recognized as stale and dropped.

use std::time::{Duration, Instant};

/// Identifies which roll a scheduled tick belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickToken {
    generation: u64,
}

impl TickToken {
    pub fn generation(self) -> u64 {
        self.generation
    }
}

/// Whether a roll is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RollPhase {
    #[default]
    Idle,
    Rolling {
        started_at: Instant,
    },
}

/// What the controller should do with a delivered tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The tick belongs to a finished or superseded roll. Ignore it.
    Stale,
    /// Still shuffling: rattle, redraw the dice and schedule the next tick.
    Shuffle,
    /// Time is up: draw the final dice. The sequencer is idle again.
    Settle,
}

#[derive(Debug, Clone)]
pub struct RollSequencer {
    tick_interval: Duration,
    roll_duration: Duration,
    phase: RollPhase,
    generation: u64,
}

impl RollSequencer {
    pub fn new(tick_interval: Duration, roll_duration: Duration) -> Self {
        Self {
            tick_interval,
            roll_duration,
            phase: RollPhase::Idle,
            generation: 0,
        }
    }

    /// Begin a roll at `now`.
    ///
    /// Returns the token for the first tick, which should fire after
    /// [`tick_interval`](Self::tick_interval). Returns `None` if a roll is
    /// already running.
    pub fn start(&mut self, now: Instant) -> Option<TickToken> {
        if self.is_rolling() {
            return None;
        }
        self.generation += 1;
        self.phase = RollPhase::Rolling { started_at: now };
        Some(self.current_token())
    }

    /// Classify a tick delivered at `now`.
    ///
    /// Settling returns the sequencer to idle, which also makes any further
    /// tick with the same token stale.
    pub fn advance(&mut self, token: TickToken, now: Instant) -> TickOutcome {
        let RollPhase::Rolling { started_at } = self.phase else {
            return TickOutcome::Stale;
        };
        if token.generation != self.generation {
            return TickOutcome::Stale;
        }

        if now.saturating_duration_since(started_at) >= self.roll_duration {
            self.phase = RollPhase::Idle;
            TickOutcome::Settle
        } else {
            TickOutcome::Shuffle
        }
    }

    /// Abandon any roll in progress and invalidate outstanding tokens.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.phase = RollPhase::Idle;
    }

    pub fn is_rolling(&self) -> bool {
        matches!(self.phase, RollPhase::Rolling { .. })
    }

    pub fn phase(&self) -> RollPhase {
        self.phase
    }

    /// Time since the current roll started, or `None` when idle.
    pub fn elapsed(&self, now: Instant) -> Option<Duration> {
        match self.phase {
            RollPhase::Rolling { started_at } => Some(now.saturating_duration_since(started_at)),
            RollPhase::Idle => None,
        }
    }

    pub fn current_token(&self) -> TickToken {
        TickToken {
            generation: self.generation,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn roll_duration(&self) -> Duration {
        self.roll_duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequencer() -> RollSequencer {
        RollSequencer::new(Duration::from_millis(80), Duration::from_millis(1000))
    }

    #[test]
    fn test_start_while_rolling_is_rejected() {
        let mut seq = sequencer();
        let now = Instant::now();
        assert!(seq.start(now).is_some());
        assert!(seq.start(now).is_none());
        assert!(seq.is_rolling());
    }

    #[test]
    fn test_shuffles_until_duration_then_settles() {
        let mut seq = sequencer();
        let t0 = Instant::now();
        let token = seq.start(t0).unwrap();

        let mut shuffles = 0;
        let mut at = t0;
        loop {
            at += seq.tick_interval();
            match seq.advance(token, at) {
                TickOutcome::Shuffle => shuffles += 1,
                TickOutcome::Settle => break,
                TickOutcome::Stale => panic!("token should be live"),
            }
        }

        // 80, 160, ..., 960 shuffle; 1040 settles
        assert_eq!(shuffles, 12);
        assert!(!seq.is_rolling());
        assert_eq!(seq.advance(token, at), TickOutcome::Stale);
    }

    #[test]
    fn test_settles_exactly_at_threshold() {
        let mut seq = sequencer();
        let t0 = Instant::now();
        let token = seq.start(t0).unwrap();
        assert_eq!(
            seq.advance(token, t0 + Duration::from_millis(999)),
            TickOutcome::Shuffle
        );
        assert_eq!(
            seq.advance(token, t0 + Duration::from_millis(1000)),
            TickOutcome::Settle
        );
    }

    #[test]
    fn test_cancel_invalidates_token() {
        let mut seq = sequencer();
        let t0 = Instant::now();
        let token = seq.start(t0).unwrap();
        seq.cancel();
        assert!(!seq.is_rolling());
        assert_eq!(
            seq.advance(token, t0 + Duration::from_millis(80)),
            TickOutcome::Stale
        );
    }

    #[test]
    fn test_old_token_stale_after_new_roll() {
        let mut seq = sequencer();
        let t0 = Instant::now();
        let old = seq.start(t0).unwrap();
        seq.cancel();
        let new = seq.start(t0).unwrap();
        assert_ne!(old, new);

        let at = t0 + Duration::from_millis(80);
        assert_eq!(seq.advance(old, at), TickOutcome::Stale);
        assert_eq!(seq.advance(new, at), TickOutcome::Shuffle);
    }

    #[test]
    fn test_elapsed() {
        let mut seq = sequencer();
        let t0 = Instant::now();
        assert_eq!(seq.elapsed(t0), None);
        seq.start(t0);
        assert_eq!(
            seq.elapsed(t0 + Duration::from_millis(250)),
            Some(Duration::from_millis(250))
        );
    }
}
