use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{Speaker, Timestamp};

/// All domain events that can occur during a tutoring session.
///
/// Events are emitted by the turn controller and the voice adapter and
/// consumed by the application's logging listener. They carry enough context
/// to reconstruct the session timeline without storing message bodies.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[non_exhaustive]
pub enum DomainEvent {
    // =========================================================================
    // Conversation Events
    // =========================================================================
    /// A conversation session started with the seeded greeting.
    ConversationStarted {
        session_id: Uuid,
        timestamp: Timestamp,
    },

    /// A turn was appended to the conversation.
    TurnAppended {
        session_id: Uuid,
        speaker: Speaker,
        text_length: usize,
        timestamp: Timestamp,
    },

    /// A completion request was dispatched to the hosted model.
    CompletionRequested {
        session_id: Uuid,
        history_turns: usize,
        timestamp: Timestamp,
    },

    /// A completion request returned a reply.
    CompletionSucceeded {
        session_id: Uuid,
        reply_length: usize,
        latency_ms: u64,
        timestamp: Timestamp,
    },

    /// A completion request failed; a fallback turn was appended instead.
    CompletionFailed {
        session_id: Uuid,
        reason: String,
        timestamp: Timestamp,
    },

    /// The speaking indicator was switched on.
    SpeakingStarted {
        session_id: Uuid,
        duration_ms: u64,
        timestamp: Timestamp,
    },

    /// The speaking indicator was switched off.
    SpeakingEnded {
        session_id: Uuid,
        timestamp: Timestamp,
    },

    // =========================================================================
    // Voice Events
    // =========================================================================
    /// The recognizer started listening.
    ListeningStarted {
        language: String,
        timestamp: Timestamp,
    },

    /// The recognizer stopped listening.
    ListeningStopped { timestamp: Timestamp },

    /// The recognizer reported a runtime error; listening was forced off.
    RecognitionFailed {
        reason: String,
        timestamp: Timestamp,
    },

    // =========================================================================
    // Application Lifecycle Events
    // =========================================================================
    /// Application started successfully.
    ApplicationStarted {
        version: String,
        voice_available: bool,
        timestamp: Timestamp,
    },

    /// Application is shutting down.
    ApplicationShutdown {
        uptime_secs: u64,
        timestamp: Timestamp,
    },
}

impl DomainEvent {
    /// Returns the timestamp of the event.
    pub fn timestamp(&self) -> Timestamp {
        match self {
            DomainEvent::ConversationStarted { timestamp, .. }
            | DomainEvent::TurnAppended { timestamp, .. }
            | DomainEvent::CompletionRequested { timestamp, .. }
            | DomainEvent::CompletionSucceeded { timestamp, .. }
            | DomainEvent::CompletionFailed { timestamp, .. }
            | DomainEvent::SpeakingStarted { timestamp, .. }
            | DomainEvent::SpeakingEnded { timestamp, .. }
            | DomainEvent::ListeningStarted { timestamp, .. }
            | DomainEvent::ListeningStopped { timestamp }
            | DomainEvent::RecognitionFailed { timestamp, .. }
            | DomainEvent::ApplicationStarted { timestamp, .. }
            | DomainEvent::ApplicationShutdown { timestamp, .. } => *timestamp,
        }
    }

    /// Returns a human-readable event name for logging.
    pub fn event_name(&self) -> &'static str {
        match self {
            DomainEvent::ConversationStarted { .. } => "conversation_started",
            DomainEvent::TurnAppended { .. } => "turn_appended",
            DomainEvent::CompletionRequested { .. } => "completion_requested",
            DomainEvent::CompletionSucceeded { .. } => "completion_succeeded",
            DomainEvent::CompletionFailed { .. } => "completion_failed",
            DomainEvent::SpeakingStarted { .. } => "speaking_started",
            DomainEvent::SpeakingEnded { .. } => "speaking_ended",
            DomainEvent::ListeningStarted { .. } => "listening_started",
            DomainEvent::ListeningStopped { .. } => "listening_stopped",
            DomainEvent::RecognitionFailed { .. } => "recognition_failed",
            DomainEvent::ApplicationStarted { .. } => "application_started",
            DomainEvent::ApplicationShutdown { .. } => "application_shutdown",
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
