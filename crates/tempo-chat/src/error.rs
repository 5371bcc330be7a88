//! Error types for the turn-taking engine.

use tempo_core::TempoError;

/// Errors from the turn-taking engine.
///
/// Deliberately small: empty submissions are a silent no-op and completion
/// failures become a fallback turn, so neither surfaces as an error.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("a turn is already being processed")]
    Busy,
}

impl From<ChatError> for TempoError {
    fn from(err: ChatError) -> Self {
        TempoError::Chat(err.to_string())
    }
}
