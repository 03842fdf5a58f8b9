//! Spoken verdicts through the platform speech engine.

use tts::{Tts, Voice};

use dice_core::{CapabilityError, SpeechOutput, Utterance, VoiceInfo};

pub struct TtsSpeech {
    tts: Tts,
    /// Voices from the last listing, to map a chosen id back to the engine
    voices: Vec<Voice>,
}

impl TtsSpeech {
    pub fn new() -> Result<Self, CapabilityError> {
        let tts = Tts::default().map_err(|e| CapabilityError::SpeechUnavailable(e.to_string()))?;
        tracing::info!("Initialized speech engine");
        Ok(Self {
            tts,
            voices: Vec::new(),
        })
    }

    /// Scale a value given relative to the engine's normal setting into
    /// the engine's supported range.
    fn scaled(relative: f32, normal: f32, min: f32, max: f32) -> f32 {
        (normal * relative).clamp(min, max)
    }

    fn apply(&mut self, utterance: &Utterance) -> Result<(), tts::Error> {
        let features = self.tts.supported_features();
        if features.pitch {
            let pitch = Self::scaled(
                utterance.pitch,
                self.tts.normal_pitch(),
                self.tts.min_pitch(),
                self.tts.max_pitch(),
            );
            self.tts.set_pitch(pitch)?;
        }
        if features.rate {
            let rate = Self::scaled(
                utterance.rate,
                self.tts.normal_rate(),
                self.tts.min_rate(),
                self.tts.max_rate(),
            );
            self.tts.set_rate(rate)?;
        }
        if features.volume {
            let volume = Self::scaled(
                utterance.volume,
                self.tts.max_volume(),
                self.tts.min_volume(),
                self.tts.max_volume(),
            );
            self.tts.set_volume(volume)?;
        }
        if features.voice {
            if let Some(wanted) = &utterance.voice {
                if let Some(voice) = self.voices.iter().find(|v| v.id() == wanted.id) {
                    self.tts.set_voice(voice)?;
                }
            }
        }
        Ok(())
    }
}

impl SpeechOutput for TtsSpeech {
    fn voices(&mut self) -> Vec<VoiceInfo> {
        if !self.tts.supported_features().voice {
            return Vec::new();
        }
        match self.tts.voices() {
            Ok(voices) => self.voices = voices,
            Err(e) => {
                tracing::debug!("Voice list unavailable: {e}");
                self.voices.clear();
            }
        }
        self.voices
            .iter()
            .map(|v| VoiceInfo {
                id: v.id(),
                name: v.name(),
                lang: v.language().to_string(),
            })
            .collect()
    }

    fn cancel(&mut self) {
        if let Err(e) = self.tts.stop() {
            tracing::debug!("Failed to stop speech: {e}");
        }
    }

    fn speak(&mut self, utterance: &Utterance) -> Result<(), CapabilityError> {
        if let Err(e) = self.apply(utterance) {
            tracing::debug!("Speech settings not applied: {e}");
        }
        self.tts
            .speak(utterance.text.as_str(), true)
            .map(|_| ())
            .map_err(|e| CapabilityError::Speech(e.to_string()))
    }
}
