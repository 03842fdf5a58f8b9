//! Spoken verdicts.
//!
//! When a roll settles the controller cancels anything still being said and
//! speaks one short phrase. Voice selection prefers a voice for the
//! configured language and otherwise leaves the engine on its default.

use crate::config::SpeechConfig;
use crate::dice::Verdict;
use crate::error::CapabilityError;

/// A voice offered by the speech engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceInfo {
    pub id: String,
    pub name: String,
    /// BCP 47 language tag as reported by the engine, e.g. `en-US`.
    pub lang: String,
}

/// Everything needed to speak one phrase.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub lang: String,
    pub pitch: f32,
    pub rate: f32,
    pub volume: f32,
    /// `None` leaves the engine on its default voice.
    pub voice: Option<VoiceInfo>,
}

/// A text-to-speech engine.
pub trait SpeechOutput {
    /// Voices currently known to the engine. May be empty, e.g. while the
    /// platform is still loading its voice list.
    fn voices(&mut self) -> Vec<VoiceInfo>;

    /// Stop whatever is being spoken and drop anything queued.
    fn cancel(&mut self);

    fn speak(&mut self, utterance: &Utterance) -> Result<(), CapabilityError>;
}

/// Pick a voice for `lang`.
///
/// An exact tag match wins, then a voice sharing the primary language
/// subtag (`en-GB` for `en-US`). Tags compare case-insensitively with `_`
/// treated as `-`.
pub fn select_voice<'a>(voices: &'a [VoiceInfo], lang: &str) -> Option<&'a VoiceInfo> {
    let wanted = normalize_tag(lang);
    let primary = primary_subtag(&wanted);

    voices
        .iter()
        .find(|v| normalize_tag(&v.lang) == wanted)
        .or_else(|| {
            voices
                .iter()
                .find(|v| primary_subtag(&normalize_tag(&v.lang)) == primary)
        })
}

fn normalize_tag(tag: &str) -> String {
    tag.trim().replace('_', "-").to_ascii_lowercase()
}

fn primary_subtag(tag: &str) -> &str {
    tag.split('-').next().unwrap_or(tag)
}

/// Speaks verdicts through an engine using the configured voice settings.
pub struct VerdictSpeaker {
    engine: Box<dyn SpeechOutput>,
    config: SpeechConfig,
}

impl VerdictSpeaker {
    pub fn new(engine: Box<dyn SpeechOutput>, config: SpeechConfig) -> Self {
        Self { engine, config }
    }

    /// Build the utterance for `verdict` against the engine's current
    /// voice list.
    pub fn utterance(&mut self, verdict: Verdict) -> Utterance {
        let text = match verdict {
            Verdict::Win => self.config.win_phrase.clone(),
            Verdict::Lose => self.config.lose_phrase.clone(),
        };
        let voices = self.engine.voices();
        let voice = select_voice(&voices, &self.config.lang).cloned();
        if voice.is_none() {
            tracing::debug!(
                lang = %self.config.lang,
                available = voices.len(),
                "No matching voice, using engine default"
            );
        }

        Utterance {
            text,
            lang: self.config.lang.clone(),
            pitch: self.config.pitch,
            rate: self.config.rate,
            volume: self.config.volume,
            voice,
        }
    }

    /// Interrupt any previous line and announce `verdict`.
    pub fn announce(&mut self, verdict: Verdict) {
        self.engine.cancel();
        let utterance = self.utterance(verdict);
        if let Err(e) = self.engine.speak(&utterance) {
            tracing::warn!("Could not speak verdict: {e}");
        }
    }

    pub fn cancel(&mut self) {
        self.engine.cancel();
    }
}
