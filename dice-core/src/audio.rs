//! Rattle sound synthesis and the lazily opened audio output.
//!
//! Each shuffle tick produces one short burst: white noise, low-passed,
//! shaped by a fast exponential decay. The samples are handed to the output
//! and dropped; nothing is kept between ticks.

use rand::Rng;
use std::f32::consts::PI;
use std::fmt;

use crate::config::AudioConfig;
use crate::error::CapabilityError;

/// One synthesized mono burst.
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseBurst {
    pub sample_rate: u32,
    pub samples: Vec<f32>,
}

impl NoiseBurst {
    /// Synthesize a burst from `config`.
    pub fn synthesize<R: Rng + ?Sized>(config: &AudioConfig, rng: &mut R) -> Self {
        let len = (config.sample_rate as u64 * config.burst_ms / 1000) as usize;
        let envelope = Envelope::new(config, config.sample_rate);
        let mut filter = LowPass::new(config.cutoff_hz, config.sample_rate as f32);

        let samples = (0..len)
            .map(|i| {
                let noise: f32 = rng.gen_range(-1.0..1.0);
                filter.process(noise) * envelope.gain_at(i)
            })
            .collect();

        Self {
            sample_rate: config.sample_rate,
            samples,
        }
    }

    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()))
    }
}

/// Exponential ramp from `start_gain` to `end_gain`, then held.
#[derive(Debug, Clone, Copy)]
struct Envelope {
    start: f32,
    end: f32,
    decay_samples: usize,
}

impl Envelope {
    fn new(config: &AudioConfig, sample_rate: u32) -> Self {
        Self {
            start: config.start_gain,
            end: config.end_gain,
            decay_samples: (sample_rate as u64 * config.decay_ms / 1000) as usize,
        }
    }

    fn gain_at(&self, index: usize) -> f32 {
        if index >= self.decay_samples {
            return self.end;
        }
        let progress = index as f32 / self.decay_samples as f32;
        self.start * (self.end / self.start).powf(progress)
    }
}

/// Second-order low-pass biquad (Butterworth Q).
#[derive(Debug, Clone)]
struct LowPass {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl LowPass {
    fn new(cutoff_hz: f32, sample_rate: f32) -> Self {
        let q = std::f32::consts::FRAC_1_SQRT_2;
        let w0 = 2.0 * PI * cutoff_hz / sample_rate;
        let alpha = w0.sin() / (2.0 * q);
        let cos_w0 = w0.cos();
        let a0 = 1.0 + alpha;

        Self {
            b0: (1.0 - cos_w0) / 2.0 / a0,
            b1: (1.0 - cos_w0) / a0,
            b2: (1.0 - cos_w0) / 2.0 / a0,
            a1: -2.0 * cos_w0 / a0,
            a2: (1.0 - alpha) / a0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    fn process(&mut self, x: f32) -> f32 {
        let y = self.b0 * x + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }
}

/// A device that can play a burst immediately, fire-and-forget.
pub trait AudioOutput {
    fn play(&mut self, burst: NoiseBurst) -> Result<(), CapabilityError>;
}

/// Opens the platform audio output. Called at most once.
pub type AudioFactory = Box<dyn FnOnce() -> Result<Box<dyn AudioOutput>, CapabilityError>>;

enum AudioState {
    /// Not opened yet; waiting for the first user gesture.
    Dormant(AudioFactory),
    Active(Box<dyn AudioOutput>),
    /// No audio: never configured, failed to open, or released.
    Silent,
}

/// The audio output owned by the controller.
///
/// Opened on the first user interaction rather than at startup, and closed
/// on teardown. Once silent it stays silent.
pub struct AudioContext {
    state: AudioState,
}

impl AudioContext {
    pub fn new(factory: AudioFactory) -> Self {
        Self {
            state: AudioState::Dormant(factory),
        }
    }

    /// A context with no output at all.
    pub fn silent() -> Self {
        Self {
            state: AudioState::Silent,
        }
    }

    /// Open the output if it has not been opened yet.
    pub fn acquire(&mut self) {
        self.state = match std::mem::replace(&mut self.state, AudioState::Silent) {
            AudioState::Dormant(factory) => match factory() {
                Ok(output) => {
                    tracing::debug!("Audio output opened");
                    AudioState::Active(output)
                }
                Err(e) => {
                    tracing::warn!("Rolling without sound: {e}");
                    AudioState::Silent
                }
            },
            other => other,
        };
    }

    /// Synthesize and play one burst. Does nothing unless the output is open.
    pub fn play_burst<R: Rng + ?Sized>(&mut self, config: &AudioConfig, rng: &mut R) {
        let AudioState::Active(output) = &mut self.state else {
            return;
        };
        let burst = NoiseBurst::synthesize(config, rng);
        if let Err(e) = output.play(burst) {
            tracing::debug!("Dropped rattle burst: {e}");
        }
    }

    /// Close the output. The context stays silent afterwards.
    pub fn release(&mut self) {
        if matches!(self.state, AudioState::Active(_)) {
            tracing::debug!("Audio output released");
        }
        self.state = AudioState::Silent;
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, AudioState::Active(_))
    }
}

impl fmt::Debug for AudioContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            AudioState::Dormant(_) => "dormant",
            AudioState::Active(_) => "active",
            AudioState::Silent => "silent",
        };
        f.debug_struct("AudioContext").field("state", &state).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_burst_length() {
        let config = AudioConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let burst = NoiseBurst::synthesize(&config, &mut rng);
        assert_eq!(burst.samples.len(), 4410);
        assert!((burst.duration_secs() - 0.1).abs() < 1e-4);
    }

    #[test]
    fn test_burst_is_quiet_and_decays() {
        let config = AudioConfig::default();
        let mut rng = StdRng::seed_from_u64(2);
        let burst = NoiseBurst::synthesize(&config, &mut rng);

        assert!(burst.peak() > 0.0);
        assert!(burst.peak() < 0.1);

        // The tail after the decay is held near end_gain and far quieter
        // than the attack.
        let decay_end = 44_100 * 50 / 1000;
        let head = &burst.samples[..decay_end / 5];
        let tail = &burst.samples[decay_end..];
        let rms = |s: &[f32]| (s.iter().map(|x| x * x).sum::<f32>() / s.len() as f32).sqrt();
        assert!(rms(tail) < rms(head) / 5.0);
    }

    #[test]
    fn test_envelope_endpoints() {
        let config = AudioConfig::default();
        let env = Envelope::new(&config, 1000);
        assert!((env.gain_at(0) - 0.05).abs() < 1e-6);
        assert!((env.gain_at(50) - 0.001).abs() < 1e-6);
        assert!((env.gain_at(90) - 0.001).abs() < 1e-6);
        assert!(env.gain_at(10) > env.gain_at(20));
    }

    #[test]
    fn test_low_pass_attenuates_high_frequencies() {
        let rate = 44_100.0;
        let tone = |freq: f32| {
            let mut lp = LowPass::new(1000.0, rate);
            let out: Vec<f32> = (0..4410)
                .map(|i| lp.process((2.0 * PI * freq * i as f32 / rate).sin()))
                .collect();
            out[2205..].iter().fold(0.0f32, |acc, s| acc.max(s.abs()))
        };
        assert!(tone(100.0) > 0.9);
        assert!(tone(10_000.0) < 0.05);
    }

    struct Failing;

    impl AudioOutput for Failing {
        fn play(&mut self, _burst: NoiseBurst) -> Result<(), CapabilityError> {
            Err(CapabilityError::Playback("device gone".into()))
        }
    }

    #[test]
    fn test_failed_open_stays_silent() {
        let mut ctx = AudioContext::new(Box::new(
            || -> Result<Box<dyn AudioOutput>, CapabilityError> {
                Err(CapabilityError::AudioUnavailable("no device".into()))
            },
        ));
        ctx.acquire();
        assert!(!ctx.is_active());
        ctx.acquire();
        assert!(!ctx.is_active());
    }

    #[test]
    fn test_playback_errors_are_swallowed() {
        let mut ctx = AudioContext::new(Box::new(
            || -> Result<Box<dyn AudioOutput>, CapabilityError> { Ok(Box::new(Failing)) },
        ));
        ctx.acquire();
        assert!(ctx.is_active());
        let mut rng = StdRng::seed_from_u64(0);
        ctx.play_burst(&AudioConfig::default(), &mut rng);
        ctx.release();
        assert!(!ctx.is_active());
    }
}
