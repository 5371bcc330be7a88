//! Turn-taking state machine with thread-safe transitions.
//!
//! Enforces valid transitions for the submission lifecycle:
//! - Idle -> Processing (turn submitted, completion request in flight)
//! - Processing -> Idle (reply appended, or fallback appended on failure)
//!
//! While Processing, new submissions are rejected.

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::error::ChatError;

/// Operational state of the turn controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnState {
    /// No turn in flight. Ready for a submission.
    Idle,
    /// A completion request is in flight. Input is disabled.
    Processing,
}

impl fmt::Display for TurnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnState::Idle => write!(f, "Idle"),
            TurnState::Processing => write!(f, "Processing"),
        }
    }
}

impl TurnState {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &TurnState) -> bool {
        matches!(
            (self, target),
            (TurnState::Idle, TurnState::Processing) | (TurnState::Processing, TurnState::Idle)
        )
    }
}

/// Thread-safe state machine for turn-taking transitions.
///
/// Wraps `TurnState` in an `Arc<Mutex<>>` so the controller can be shared
/// across tasks. All transitions are validated before being applied.
#[derive(Debug, Clone)]
pub struct StateMachine {
    state: Arc<Mutex<TurnState>>,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine {
    /// Create a new state machine initialized to `Idle`.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(TurnState::Idle)),
        }
    }

    /// Returns the current state.
    pub fn current(&self) -> TurnState {
        *self.state.lock().expect("state mutex poisoned")
    }

    /// Attempt to transition to the target state.
    ///
    /// Returns `ChatError::Busy` when a submission arrives while Processing,
    /// and a generic rejection for any other invalid transition.
    pub fn transition(&self, target: TurnState) -> Result<(), ChatError> {
        let mut state = self.state.lock().expect("state mutex poisoned");
        if state.can_transition_to(&target) {
            tracing::debug!("Turn state: {} -> {}", *state, target);
            *state = target;
            Ok(())
        } else {
            Err(ChatError::Busy)
        }
    }

    /// Force the state machine back to Idle (used for error recovery).
    pub fn reset(&self) {
        let mut state = self.state.lock().expect("state mutex poisoned");
        if *state != TurnState::Idle {
            tracing::warn!("Turn state machine reset to Idle from {}", *state);
            *state = TurnState::Idle;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
