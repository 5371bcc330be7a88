//! Error types for the completion client.

use tempo_core::TempoError;

/// Errors from the hosted chat-completion client.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("API key is not set; export it in the configured environment variable")]
    MissingApiKey,
    #[error("request failed: {0}")]
    Request(String),
    #[error("upstream error {status}: {message}")]
    Upstream { status: u16, message: String },
    #[error("response parse failed: {0}")]
    Parse(String),
    #[error("response contained no choices")]
    EmptyChoices,
}

impl From<CompletionError> for TempoError {
    fn from(err: CompletionError) -> Self {
        TempoError::Completion(err.to_string())
    }
}
