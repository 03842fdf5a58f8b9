//! Error types for the dice roller.
//!
//! Nothing in the roll logic itself can fail. Errors only come from the
//! platform capabilities (audio, speech) and from loading configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Failure reported by an audio or speech backend.
///
/// The controller never surfaces these to the user. They are logged and the
/// capability is skipped.
#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("Audio output unavailable: {0}")]
    AudioUnavailable(String),
    #[error("Audio playback failed: {0}")]
    Playback(String),
    #[error("Speech engine unavailable: {0}")]
    SpeechUnavailable(String),
    #[error("Speech failed: {0}")]
    Speech(String),
}

/// Errors from loading or validating a [`RollerConfig`](crate::RollerConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
