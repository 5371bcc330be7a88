//! Error types for the speech-recognition adapter.

use tempo_core::TempoError;

/// Errors from the voice input adapter.
#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    #[error("speech recognition is not supported: {0}")]
    Unsupported(String),
    #[error("speech capture is already active")]
    AlreadyListening,
    #[error("recognizer error: {0}")]
    Backend(String),
}

impl From<VoiceError> for TempoError {
    fn from(err: VoiceError) -> Self {
        TempoError::Voice(err.to_string())
    }
}
