//! Hosted chat-completion client for Tempo.
//!
//! One awaited POST per turn against an OpenAI-compatible endpoint, bearer
//! authenticated, with the fixed tutoring persona prepended to the mapped
//! conversation history. No retries, no streaming, no request timeout.

pub mod client;
pub mod error;
pub mod persona;
pub mod protocol;

pub use client::{Completion, CompletionClient};
pub use error::CompletionError;
pub use persona::TUTOR_PERSONA;
pub use protocol::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
