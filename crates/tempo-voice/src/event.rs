//! Recognizer events delivered over an explicit channel.
//!
//! Replaces callback-style wiring: a recognizer owns a `VoiceEventSender` and
//! pushes events into it; the consumer drains the matching receiver.

use tokio::sync::mpsc;

/// An event emitted by a speech recognizer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VoiceEvent {
    /// An interim transcript for the utterance in progress.
    Partial(String),
    /// The recognizer judged the utterance complete.
    Final(String),
    /// A runtime recognizer error. Listening must be forced off.
    Error(String),
    /// Capture ended (stopped by the caller or by the recognizer).
    Ended,
}

/// Sending half of the recognizer event channel.
pub type VoiceEventSender = mpsc::UnboundedSender<VoiceEvent>;

/// Create a recognizer event channel.
pub fn channel() -> (VoiceEventSender, mpsc::UnboundedReceiver<VoiceEvent>) {
    mpsc::unbounded_channel()
}
