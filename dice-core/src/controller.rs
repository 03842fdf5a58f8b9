//! The dice controller: all roller state and the side effects of rolling.
//!
//! The controller owns the dice count, the dice on the table, the last total
//! and the roll sequencer. Front ends read state from it and forward user
//! input (`adjust`, `roll`) and delivered timer ticks (`on_tick`) to it.
//!
//! Platform capabilities are injected and optional:
//! - audio: opened on the first user gesture, one rattle burst per tick
//! - speech: one spoken verdict per settled roll
//! - timer: delivers the next tick after the configured interval
//!
//! A missing capability only removes its side effect; rolling always works.

use rand::RngCore;
use std::time::Duration;

use crate::audio::{AudioContext, AudioFactory};
use crate::config::RollerConfig;
use crate::dice::{DiceCount, DiceSet, Verdict};
use crate::sequencer::{RollSequencer, TickOutcome, TickToken};
use crate::shake::ShakeParams;
use crate::speech::{SpeechOutput, VerdictSpeaker};
use crate::timer::{Clock, SystemClock, Timer};

/// Result of a settled roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollOutcome {
    pub total: u32,
    pub verdict: Verdict,
}

pub struct DiceController {
    config: RollerConfig,
    count: DiceCount,
    dice: DiceSet,
    outcome: Option<RollOutcome>,
    shake: Vec<ShakeParams>,
    sequencer: RollSequencer,
    rolls_completed: u64,

    rng: Box<dyn RngCore>,
    clock: Box<dyn Clock>,
    timer: Box<dyn Timer>,
    audio: AudioContext,
    speaker: Option<VerdictSpeaker>,

    shut_down: bool,
}

impl DiceController {
    /// Create a controller with no audio or speech.
    pub fn new(config: RollerConfig, timer: Box<dyn Timer>) -> Self {
        let count = config.initial_dice;
        let sequencer = RollSequencer::new(config.tick_interval(), config.roll_duration());
        Self {
            count,
            dice: DiceSet::new(count),
            outcome: None,
            shake: vec![ShakeParams::default(); count.as_usize()],
            sequencer,
            rolls_completed: 0,
            rng: Box::new(rand::thread_rng()),
            clock: Box::new(SystemClock),
            timer,
            audio: AudioContext::silent(),
            speaker: None,
            shut_down: false,
            config,
        }
    }

    /// Play rattle bursts through the output opened by `factory`.
    ///
    /// Ignored when audio is disabled in the config.
    pub fn with_audio(mut self, factory: AudioFactory) -> Self {
        if self.config.audio.enabled {
            self.audio = AudioContext::new(factory);
        }
        self
    }

    /// Speak verdicts through `engine`.
    ///
    /// Ignored when speech is disabled in the config.
    pub fn with_speech(mut self, engine: Box<dyn SpeechOutput>) -> Self {
        if self.config.speech.enabled {
            self.speaker = Some(VerdictSpeaker::new(engine, self.config.speech.clone()));
        }
        self
    }

    pub fn with_rng(mut self, rng: Box<dyn RngCore>) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Change the dice count by `delta`, clamped to 1..=8.
    ///
    /// Does nothing while rolling. A change clears the last total and
    /// resizes the dice, padding with ones or dropping from the end.
    pub fn adjust(&mut self, delta: i32) {
        if self.shut_down || self.is_rolling() {
            return;
        }
        self.audio.acquire();

        let count = self.count.adjusted(delta);
        if count == self.count {
            return;
        }
        tracing::debug!(from = %self.count, to = %count, "Dice count changed");
        self.count = count;
        self.outcome = None;
        self.dice.resize(count);
        self.shake.resize(count.as_usize(), ShakeParams::default());
    }

    /// Start a roll. Does nothing if one is already running.
    pub fn roll(&mut self) {
        if self.shut_down {
            return;
        }
        let Some(token) = self.sequencer.start(self.clock.now()) else {
            return;
        };
        self.audio.acquire();

        self.outcome = None;
        self.shake = ShakeParams::for_dice(self.count.as_usize(), &mut *self.rng);
        tracing::info!(dice = %self.count, "Roll started");
        self.timer.schedule(self.sequencer.tick_interval(), token);
    }

    /// Handle a tick delivered by the timer.
    ///
    /// Every live tick rattles. Shuffle ticks redraw every die and schedule
    /// the next tick. The settling tick draws the final dice, records the
    /// total and speaks the verdict. Stale ticks change nothing.
    pub fn on_tick(&mut self, token: TickToken) -> TickOutcome {
        if self.shut_down {
            return TickOutcome::Stale;
        }
        let outcome = self.sequencer.advance(token, self.clock.now());
        match outcome {
            TickOutcome::Stale => {
                tracing::debug!(generation = token.generation(), "Ignoring stale tick");
            }
            TickOutcome::Shuffle => {
                self.audio.play_burst(&self.config.audio, &mut *self.rng);
                self.dice.reroll(&mut *self.rng);
                self.timer.schedule(self.sequencer.tick_interval(), token);
            }
            TickOutcome::Settle => {
                self.audio.play_burst(&self.config.audio, &mut *self.rng);
                self.dice.reroll(&mut *self.rng);
                let total = self.dice.total();
                let verdict = Verdict::judge(total, self.count);
                self.outcome = Some(RollOutcome { total, verdict });
                self.rolls_completed += 1;
                tracing::info!(
                    dice = %self.dice.display(),
                    total,
                    %verdict,
                    "Roll settled"
                );
                if let Some(speaker) = &mut self.speaker {
                    speaker.announce(verdict);
                }
            }
        }
        outcome
    }

    /// Tear down: cancel the pending tick, close audio and silence speech.
    ///
    /// Every later call is a no-op. Also run on drop.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        self.sequencer.cancel();
        self.timer.cancel();
        self.audio.release();
        if let Some(speaker) = &mut self.speaker {
            speaker.cancel();
        }
        tracing::debug!("Dice controller shut down");
    }

    pub fn count(&self) -> DiceCount {
        self.count
    }

    pub fn dice(&self) -> &DiceSet {
        &self.dice
    }

    pub fn total(&self) -> Option<u32> {
        self.outcome.map(|o| o.total)
    }

    pub fn verdict(&self) -> Option<Verdict> {
        self.outcome.map(|o| o.verdict)
    }

    pub fn outcome(&self) -> Option<RollOutcome> {
        self.outcome
    }

    pub fn is_rolling(&self) -> bool {
        self.sequencer.is_rolling()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Whether the count controls should accept input.
    pub fn can_adjust(&self, delta: i32) -> bool {
        !self.shut_down && !self.is_rolling() && self.count.adjusted(delta) != self.count
    }

    /// Time since the current roll started, for animation.
    pub fn roll_elapsed(&self) -> Option<Duration> {
        self.sequencer.elapsed(self.clock.now())
    }

    /// Shake parameters for each die, re-drawn at the start of every roll.
    pub fn shake(&self) -> &[ShakeParams] {
        &self.shake
    }

    pub fn rolls_completed(&self) -> u64 {
        self.rolls_completed
    }

    pub fn audio_active(&self) -> bool {
        self.audio.is_active()
    }

    pub fn speech_enabled(&self) -> bool {
        self.speaker.is_some()
    }

    pub fn config(&self) -> &RollerConfig {
        &self.config
    }
}

impl Drop for DiceController {
    fn drop(&mut self) {
        self.shutdown();
    }
}
