//! Ephemeral per-capture session state.

use crate::event::VoiceEvent;

/// State of the current voice capture, reset on each start.
///
/// Folded from recognizer events: partials and finals update `transcript`,
/// an error records a user-visible message and forces `listening` off.
#[derive(Clone, Debug, Default)]
pub struct VoiceSession {
    /// Whether capture is currently active.
    pub listening: bool,
    /// The latest transcript (interim or final) for the utterance.
    pub transcript: String,
    /// User-visible error from the recognizer, if any.
    pub error: Option<String>,
}

impl VoiceSession {
    /// Create an idle session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset for a fresh capture.
    pub fn start(&mut self) {
        self.listening = true;
        self.transcript.clear();
        self.error = None;
    }

    /// Fold a recognizer event into the session.
    pub fn apply(&mut self, event: &VoiceEvent) {
        match event {
            VoiceEvent::Partial(text) | VoiceEvent::Final(text) => {
                self.transcript = text.clone();
            }
            VoiceEvent::Error(message) => {
                self.error = Some(format!("Speech recognition error: {}", message));
                self.listening = false;
            }
            VoiceEvent::Ended => {
                self.listening = false;
            }
        }
    }

    /// Clear the captured transcript.
    pub fn reset_transcript(&mut self) {
        self.transcript.clear();
    }
}

// =============================================================================
// Tests
// =============================================================================
