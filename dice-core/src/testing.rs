//! Testing utilities for the dice roller.
//!
//! This module provides deterministic stand-ins for every capability the
//! controller consumes:
//! - `ManualClock` and `ManualTimer` for stepping through a roll by hand
//! - `RecordingAudio` and `RecordingSpeech` for asserting on side effects
//! - `TestHarness` for running complete rolls with a seeded RNG
//!
//! All doubles are cheap shared handles: keep a clone, give one to the
//! controller, and inspect the clone afterwards.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::audio::{AudioOutput, NoiseBurst};
use crate::config::RollerConfig;
use crate::controller::{DiceController, RollOutcome};
use crate::error::CapabilityError;
use crate::sequencer::{TickOutcome, TickToken};
use crate::speech::{SpeechOutput, Utterance, VoiceInfo};
use crate::timer::{Clock, Timer};

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// A timer that records the pending tick instead of firing it.
#[derive(Debug, Clone, Default)]
pub struct ManualTimer {
    pending: Rc<RefCell<Option<(Duration, TickToken)>>>,
    scheduled: Rc<Cell<usize>>,
    cancelled: Rc<Cell<usize>>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The pending tick, if any, without consuming it.
    pub fn pending(&self) -> Option<(Duration, TickToken)> {
        *self.pending.borrow()
    }

    /// Remove and return the pending tick, as if it fired.
    pub fn take(&self) -> Option<(Duration, TickToken)> {
        self.pending.borrow_mut().take()
    }

    pub fn scheduled_count(&self) -> usize {
        self.scheduled.get()
    }

    pub fn cancel_count(&self) -> usize {
        self.cancelled.get()
    }
}

impl Timer for ManualTimer {
    fn schedule(&mut self, delay: Duration, token: TickToken) {
        self.scheduled.set(self.scheduled.get() + 1);
        *self.pending.borrow_mut() = Some((delay, token));
    }

    fn cancel(&mut self) {
        self.cancelled.set(self.cancelled.get() + 1);
        *self.pending.borrow_mut() = None;
    }
}

/// Audio output that keeps every burst it is asked to play.
#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    bursts: Rc<RefCell<Vec<NoiseBurst>>>,
    opened: Rc<Cell<usize>>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// An [`AudioFactory`](crate::audio::AudioFactory) that hands out this
    /// recorder and counts how often it was opened.
    pub fn factory(&self) -> crate::audio::AudioFactory {
        let recorder = self.clone();
        Box::new(move || -> Result<Box<dyn AudioOutput>, CapabilityError> {
            recorder.opened.set(recorder.opened.get() + 1);
            Ok(Box::new(recorder))
        })
    }

    pub fn burst_count(&self) -> usize {
        self.bursts.borrow().len()
    }

    pub fn bursts(&self) -> Vec<NoiseBurst> {
        self.bursts.borrow().clone()
    }

    pub fn open_count(&self) -> usize {
        self.opened.get()
    }
}

impl AudioOutput for RecordingAudio {
    fn play(&mut self, burst: NoiseBurst) -> Result<(), CapabilityError> {
        self.bursts.borrow_mut().push(burst);
        Ok(())
    }
}

/// One call made on a [`RecordingSpeech`], in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum SpeechEvent {
    Cancel,
    Speak(Utterance),
}

/// Speech engine that records utterances and cancellations.
#[derive(Debug, Clone, Default)]
pub struct RecordingSpeech {
    voices: Rc<RefCell<Vec<VoiceInfo>>>,
    events: Rc<RefCell<Vec<SpeechEvent>>>,
}

impl RecordingSpeech {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_voices(voices: Vec<VoiceInfo>) -> Self {
        let speech = Self::default();
        speech.set_voices(voices);
        speech
    }

    /// Replace the advertised voice list, e.g. once "loading" finishes.
    pub fn set_voices(&self, voices: Vec<VoiceInfo>) {
        *self.voices.borrow_mut() = voices;
    }

    /// Every cancel and speak call so far.
    pub fn events(&self) -> Vec<SpeechEvent> {
        self.events.borrow().clone()
    }

    pub fn spoken(&self) -> Vec<Utterance> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                SpeechEvent::Speak(utterance) => Some(utterance.clone()),
                SpeechEvent::Cancel => None,
            })
            .collect()
    }

    pub fn last_spoken(&self) -> Option<Utterance> {
        self.spoken().pop()
    }

    pub fn cancel_count(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|event| **event == SpeechEvent::Cancel)
            .count()
    }
}

impl SpeechOutput for RecordingSpeech {
    fn voices(&mut self) -> Vec<VoiceInfo> {
        self.voices.borrow().clone()
    }

    fn cancel(&mut self) {
        self.events.borrow_mut().push(SpeechEvent::Cancel);
    }

    fn speak(&mut self, utterance: &Utterance) -> Result<(), CapabilityError> {
        self.events
            .borrow_mut()
            .push(SpeechEvent::Speak(utterance.clone()));
        Ok(())
    }
}

/// Drives a controller wired to manual doubles.
pub struct TestHarness {
    pub controller: DiceController,
    pub timer: ManualTimer,
    pub clock: ManualClock,
    pub audio: RecordingAudio,
    pub speech: RecordingSpeech,
}

impl TestHarness {
    pub fn new(config: RollerConfig, seed: u64) -> Self {
        let timer = ManualTimer::new();
        let clock = ManualClock::new();
        let audio = RecordingAudio::new();
        let speech = RecordingSpeech::new();

        let controller = DiceController::new(config, Box::new(timer.clone()))
            .with_clock(Box::new(clock.clone()))
            .with_rng(Box::new(StdRng::seed_from_u64(seed)))
            .with_audio(audio.factory())
            .with_speech(Box::new(speech.clone()));

        Self {
            controller,
            timer,
            clock,
            audio,
            speech,
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(RollerConfig::default(), seed)
    }

    /// Fire the pending tick after advancing the clock by its delay.
    pub fn fire(&mut self) -> Option<TickOutcome> {
        let (delay, token) = self.timer.take()?;
        self.clock.advance(delay);
        Some(self.controller.on_tick(token))
    }

    /// Start a roll and fire ticks until it settles.
    ///
    /// Returns the settled outcome and the number of shuffle ticks seen.
    pub fn roll_to_completion(&mut self) -> (Option<RollOutcome>, usize) {
        self.controller.roll();
        let mut shuffles = 0;
        while let Some(outcome) = self.fire() {
            match outcome {
                TickOutcome::Shuffle => shuffles += 1,
                TickOutcome::Settle | TickOutcome::Stale => break,
            }
        }
        (self.controller.outcome(), shuffles)
    }

    /// Set the dice count from the current value using `adjust` steps.
    pub fn set_count(&mut self, count: u8) {
        let delta = count as i32 - self.controller.count().get() as i32;
        self.controller.adjust(delta);
    }
}
