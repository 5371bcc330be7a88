use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp used throughout the system.
pub type Timestamp = DateTime<Utc>;

// =============================================================================
// Enums
// =============================================================================

/// Who produced a conversation turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    /// The learner typing or speaking into the microphone.
    User,
    /// The tutoring model.
    Assistant,
}

impl Speaker {
    /// Returns the chat-completion role string for this speaker.
    pub fn role_str(&self) -> &'static str {
        match self {
            Speaker::User => "user",
            Speaker::Assistant => "assistant",
        }
    }
}

// =============================================================================
// Core types
// =============================================================================

/// One message in the conversation.
///
/// Turns are append-only and ordered by insertion; they carry no identity
/// beyond their position in the conversation. Held only in memory for the
/// duration of a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// The message text.
    pub text: String,
    /// Who produced the turn.
    pub speaker: Speaker,
    /// When the turn was appended.
    pub timestamp: Timestamp,
}

impl Turn {
    /// Create a user turn stamped with the current time.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            speaker: Speaker::User,
            timestamp: Utc::now(),
        }
    }

    /// Create an assistant turn stamped with the current time.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            speaker: Speaker::Assistant,
            timestamp: Utc::now(),
        }
    }

    /// Returns whether this turn came from the user.
    pub fn is_user(&self) -> bool {
        self.speaker == Speaker::User
    }
}

/// A BCP-47 language tag for speech recognition.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageTag(pub String);

impl Default for LanguageTag {
    fn default() -> Self {
        Self("en-US".to_string())
    }
}

impl LanguageTag {
    /// Returns the tag as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for LanguageTag {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// =============================================================================
// Tests
// =============================================================================
