//! Platform audio and speech backends.
//!
//! Each backend sits behind a cargo feature. Without the feature the roller
//! simply runs without that side effect.

#[cfg(feature = "audio")]
mod audio;
#[cfg(feature = "speech")]
mod speech;

use dice_core::{AudioFactory, SpeechOutput};

/// Factory for the default audio output, if built with audio support.
#[cfg(feature = "audio")]
pub fn audio_factory() -> Option<AudioFactory> {
    Some(Box::new(audio::RodioOutput::open_boxed))
}

#[cfg(not(feature = "audio"))]
pub fn audio_factory() -> Option<AudioFactory> {
    tracing::debug!("Built without the audio feature; rolling silently");
    None
}

/// The platform speech engine, if built with speech support and one is
/// available.
#[cfg(feature = "speech")]
pub fn speech_engine() -> Option<Box<dyn SpeechOutput>> {
    match speech::TtsSpeech::new() {
        Ok(engine) => Some(Box::new(engine)),
        Err(e) => {
            tracing::warn!("Verdicts will not be spoken: {e}");
            None
        }
    }
}

#[cfg(not(feature = "speech"))]
pub fn speech_engine() -> Option<Box<dyn SpeechOutput>> {
    tracing::debug!("Built without the speech feature; verdicts are shown only");
    None
}
