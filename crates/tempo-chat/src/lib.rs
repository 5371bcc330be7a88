//! Turn-taking engine for Tempo.
//!
//! Holds the in-memory conversation, drives the idle/processing state
//! machine around the single awaited completion call, toggles the speaking
//! indicator, and funnels final voice transcripts through the same submit
//! path as typed input.

pub mod controller;
pub mod conversation;
pub mod error;
pub mod speaking;
pub mod state;
pub mod voice_flow;

pub use controller::{Submission, TurnController};
pub use conversation::Conversation;
pub use error::ChatError;
pub use speaking::SpeakingIndicator;
pub use state::{StateMachine, TurnState};
pub use voice_flow::run_voice_loop;
