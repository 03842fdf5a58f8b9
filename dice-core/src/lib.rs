//! Dice roller engine.
//!
//! This crate provides:
//! - Six-sided dice, a clamped dice count and the rolled collection
//! - A timed roll sequencer that shuffles the dice before settling
//! - Procedural rattle sound synthesis
//! - Spoken win/lose verdicts with language-aware voice selection
//!
//! Platform capabilities (audio output, speech, timers) are traits injected
//! into [`DiceController`]; each may be absent.
//!
//! # Quick Start
//!
//! ```ignore
//! use dice_core::{DiceController, RollerConfig, TokioTimer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let (timer, mut ticks) = TokioTimer::channel(tokio::runtime::Handle::current());
//!     let mut dice = DiceController::new(RollerConfig::default(), Box::new(timer));
//!
//!     dice.adjust(2);
//!     dice.roll();
//!     while let Some(token) = ticks.recv().await {
//!         dice.on_tick(token);
//!         if !dice.is_rolling() {
//!             break;
//!         }
//!     }
//!     println!("{} = {:?}", dice.dice().display(), dice.total());
//! }
//! ```

pub mod audio;
pub mod config;
pub mod controller;
pub mod dice;
pub mod error;
pub mod sequencer;
pub mod shake;
pub mod speech;
pub mod testing;
pub mod timer;

// Primary public API
pub use audio::{AudioContext, AudioFactory, AudioOutput, NoiseBurst};
pub use config::{AudioConfig, RollerConfig, SpeechConfig};
pub use controller::{DiceController, RollOutcome};
pub use dice::{DiceCount, DiceSet, DieValue, Verdict};
pub use error::{CapabilityError, ConfigError};
pub use sequencer::{RollPhase, RollSequencer, TickOutcome, TickToken};
pub use shake::ShakeParams;
pub use speech::{select_voice, SpeechOutput, Utterance, VerdictSpeaker, VoiceInfo};
pub use testing::TestHarness;
pub use timer::{Clock, SystemClock, Timer, TokioClock, TokioTimer};
