//! In-memory conversation state.

use chrono::Utc;
use uuid::Uuid;

use tempo_core::{Timestamp, Turn};

/// An ordered, append-only sequence of turns for one session.
///
/// Insertion order is the only ordering: it is used both for rendering and
/// for the history sent to the completion client. The conversation lives in
/// memory only and is destroyed when the process exits.
#[derive(Clone, Debug)]
pub struct Conversation {
    id: Uuid,
    started_at: Timestamp,
    turns: Vec<Turn>,
}

impl Conversation {
    /// Create a conversation seeded with the assistant greeting.
    pub fn new(greeting: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            turns: vec![Turn::assistant(greeting)],
        }
    }

    /// Create an empty conversation (no seeded greeting).
    pub fn empty() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            turns: Vec::new(),
        }
    }

    /// Session identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// When the session started.
    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    /// Append a turn.
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// All turns in insertion order.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Number of turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether the conversation holds no turns.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// The most recent turn, if any.
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }
}

// =============================================================================
// Tests
// =============================================================================
