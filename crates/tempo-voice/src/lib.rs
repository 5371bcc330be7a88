//! Speech-recognition adapter for Tempo.
//!
//! Wraps a platform speech-recognition capability behind a small trait and an
//! explicit event channel: recognizers emit `VoiceEvent`s (partial/final
//! transcripts, errors, end-of-capture) over a `tokio` mpsc sender, and the
//! capability is resolved once at startup. Absence of every backend degrades
//! the application to text-only input; it is not fatal.

pub mod capability;
pub mod error;
pub mod event;
pub mod recognizer;
pub mod session;

pub use capability::Capability;
pub use error::VoiceError;
pub use event::{VoiceEvent, VoiceEventSender};
pub use recognizer::{Recognizer, RecognizerConfig, ScriptedRecognizer, SystemRecognizer};
pub use session::VoiceSession;
