//! Roller configuration.
//!
//! Defaults reproduce the stock behavior: 80 ms shuffle ticks for one
//! second, a 100 ms low-passed noise burst per tick and a high, slightly
//! fast voice for the verdict.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::dice::DiceCount;
use crate::error::ConfigError;

/// Top-level configuration for a [`DiceController`](crate::DiceController).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollerConfig {
    /// Dice on the table at startup.
    pub initial_dice: DiceCount,

    /// Delay between shuffle ticks.
    pub tick_interval_ms: u64,

    /// How long a roll shuffles before settling.
    pub roll_duration_ms: u64,

    pub audio: AudioConfig,

    pub speech: SpeechConfig,
}

/// Rattle sound synthesis parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub enabled: bool,
    pub sample_rate: u32,
    /// Length of each noise buffer.
    pub burst_ms: u64,
    /// Low-pass cutoff frequency.
    pub cutoff_hz: f32,
    /// Envelope gain at the start of the burst.
    pub start_gain: f32,
    /// Envelope gain once the decay finishes.
    pub end_gain: f32,
    /// Time for the envelope to fall from `start_gain` to `end_gain`.
    pub decay_ms: u64,
}

/// Spoken verdict parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub enabled: bool,
    /// BCP 47 language tag used for the utterance and voice selection.
    pub lang: String,
    /// Pitch relative to the engine's normal pitch.
    pub pitch: f32,
    /// Rate relative to the engine's normal rate.
    pub rate: f32,
    /// Volume in 0.0..=1.0.
    pub volume: f32,
    pub win_phrase: String,
    pub lose_phrase: String,
}

impl Default for RollerConfig {
    fn default() -> Self {
        Self {
            initial_dice: DiceCount::default(),
            tick_interval_ms: 80,
            roll_duration_ms: 1000,
            audio: AudioConfig::default(),
            speech: SpeechConfig::default(),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sample_rate: 44_100,
            burst_ms: 100,
            cutoff_hz: 1000.0,
            start_gain: 0.05,
            end_gain: 0.001,
            decay_ms: 50,
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            lang: "en-US".to_string(),
            pitch: 1.6,
            rate: 1.1,
            volume: 1.0,
            win_phrase: "Congratulations, you win!".to_string(),
            lose_phrase: "Keep trying!".to_string(),
        }
    }
}

impl RollerConfig {
    /// Load a JSON config file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: RollerConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `DICE_*` overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// Recognized keys: `DICE_COUNT`, `DICE_LANG`, `DICE_MUTE`, `DICE_QUIET`.
    pub fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(count) = lookup("DICE_COUNT").and_then(|v| v.trim().parse::<i64>().ok()) {
            self.initial_dice = DiceCount::clamped(count);
        }
        if let Some(lang) = lookup("DICE_LANG").filter(|v| !v.trim().is_empty()) {
            self.speech.lang = lang.trim().to_string();
        }
        if lookup("DICE_MUTE").is_some_and(|v| is_truthy(&v)) {
            self.audio.enabled = false;
        }
        if lookup("DICE_QUIET").is_some_and(|v| is_truthy(&v)) {
            self.speech.enabled = false;
        }
    }

    /// Check that timing and synthesis parameters are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::invalid("tick_interval_ms", "must be positive"));
        }
        if self.roll_duration_ms < self.tick_interval_ms {
            return Err(ConfigError::invalid(
                "roll_duration_ms",
                format!(
                    "{} ms is shorter than one {} ms tick",
                    self.roll_duration_ms, self.tick_interval_ms
                ),
            ));
        }
        self.audio.validate()?;
        self.speech.validate()
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn roll_duration(&self) -> Duration {
        Duration::from_millis(self.roll_duration_ms)
    }
}

impl AudioConfig {
    /// Highest accepted output sample rate.
    pub const MAX_SAMPLE_RATE: u32 = 192_000;

    /// Longest accepted burst or decay. A burst is synthesized on every tick.
    pub const MAX_BURST_MS: u64 = 1000;

    fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=Self::MAX_SAMPLE_RATE).contains(&self.sample_rate) {
            return Err(ConfigError::invalid(
                "audio.sample_rate",
                format!("must be between 1 and {} Hz", Self::MAX_SAMPLE_RATE),
            ));
        }
        if !(1..=Self::MAX_BURST_MS).contains(&self.burst_ms) {
            return Err(ConfigError::invalid(
                "audio.burst_ms",
                format!("must be between 1 and {} ms", Self::MAX_BURST_MS),
            ));
        }
        if self.decay_ms > Self::MAX_BURST_MS {
            return Err(ConfigError::invalid(
                "audio.decay_ms",
                format!("must not exceed {} ms", Self::MAX_BURST_MS),
            ));
        }
        let nyquist = self.sample_rate as f32 / 2.0;
        if !(self.cutoff_hz > 0.0 && self.cutoff_hz < nyquist) {
            return Err(ConfigError::invalid(
                "audio.cutoff_hz",
                format!("must be between 0 and {nyquist} Hz"),
            ));
        }
        if !(self.start_gain > 0.0 && self.end_gain > 0.0) {
            return Err(ConfigError::invalid("audio gains", "must be positive"));
        }
        if self.end_gain > self.start_gain {
            return Err(ConfigError::invalid(
                "audio.end_gain",
                "must not exceed start_gain",
            ));
        }
        Ok(())
    }
}

impl SpeechConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(ConfigError::invalid("speech.volume", "must be in 0.0..=1.0"));
        }
        if self.pitch <= 0.0 || self.rate <= 0.0 {
            return Err(ConfigError::invalid("speech pitch/rate", "must be positive"));
        }
        Ok(())
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
