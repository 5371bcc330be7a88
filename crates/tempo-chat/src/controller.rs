//! Turn-taking controller.
//!
//! Reacts to a submission (typed or voice-final) by appending the user turn,
//! invoking the completion seam, appending the reply, and holding the
//! speaking flag on for the configured duration. Submissions are rejected
//! while a request is in flight; a failed request appends exactly one fixed
//! fallback turn and never propagates an error to the caller.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

use tempo_completion::Completion;
use tempo_core::config::ChatConfig;
use tempo_core::events::DomainEvent;
use tempo_core::Turn;

use crate::conversation::Conversation;
use crate::error::ChatError;
use crate::speaking::SpeakingIndicator;
use crate::state::{StateMachine, TurnState};

/// Outcome of one submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    /// The model replied; the reply turn was appended.
    Replied(String),
    /// The completion request failed; the fixed fallback turn was appended.
    Fallback(String),
    /// Whitespace-only input. Nothing appended, nothing sent.
    Ignored,
    /// A turn is already in flight. Nothing appended, nothing sent.
    Busy,
}

/// Coordinates conversation state, the completion call, and display flags.
pub struct TurnController<C: Completion> {
    conversation: Mutex<Conversation>,
    state: StateMachine,
    completion: Arc<C>,
    speaking: SpeakingIndicator,
    config: ChatConfig,
    events: Option<UnboundedSender<DomainEvent>>,
}

impl<C: Completion> TurnController<C> {
    /// Create a controller over a fresh conversation seeded with the greeting.
    pub fn new(completion: Arc<C>, config: ChatConfig) -> Self {
        let conversation = Conversation::new(&config.greeting);
        Self {
            conversation: Mutex::new(conversation),
            state: StateMachine::new(),
            completion,
            speaking: SpeakingIndicator::new(),
            config,
            events: None,
        }
    }

    /// Attach a domain-event sender.
    pub fn with_events(mut self, events: UnboundedSender<DomainEvent>) -> Self {
        let session_id = self.session_id();
        self.events = Some(events);
        self.emit(DomainEvent::ConversationStarted {
            session_id,
            timestamp: Utc::now(),
        });
        self
    }

    /// The session identifier of the underlying conversation.
    pub fn session_id(&self) -> Uuid {
        self.conversation
            .lock()
            .expect("conversation mutex poisoned")
            .id()
    }

    /// Snapshot of the conversation turns in insertion order.
    pub fn turns(&self) -> Vec<Turn> {
        self.conversation
            .lock()
            .expect("conversation mutex poisoned")
            .turns()
            .to_vec()
    }

    /// The speaking display flag.
    pub fn speaking(&self) -> &SpeakingIndicator {
        &self.speaking
    }

    /// Whether a completion request is currently in flight.
    pub fn is_processing(&self) -> bool {
        self.state.current() == TurnState::Processing
    }

    /// Submit one message through the turn-taking loop.
    ///
    /// Whitespace-only input and submissions while processing are rejected
    /// without side effects. Otherwise the user turn is appended, the
    /// completion seam is invoked with the history as it stood before this
    /// message, and either the reply or the fixed fallback is appended.
    pub async fn submit(&self, text: &str) -> Result<Submission, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Submission::Ignored);
        }
        if text.chars().count() > self.config.max_message_length {
            return Err(ChatError::MessageTooLong(self.config.max_message_length));
        }
        if self.state.transition(TurnState::Processing).is_err() {
            tracing::debug!("Submission rejected while a turn is in flight");
            return Ok(Submission::Busy);
        }

        let (session_id, history) = {
            let mut conversation = self
                .conversation
                .lock()
                .expect("conversation mutex poisoned");
            let history = conversation.turns().to_vec();
            conversation.push(Turn::user(text));
            (conversation.id(), history)
        };

        self.emit(DomainEvent::TurnAppended {
            session_id,
            speaker: tempo_core::Speaker::User,
            text_length: text.len(),
            timestamp: Utc::now(),
        });
        self.emit(DomainEvent::CompletionRequested {
            session_id,
            history_turns: history.len(),
            timestamp: Utc::now(),
        });

        let started = Instant::now();
        let outcome = match self.completion.complete(&history, text).await {
            Ok(reply) => {
                self.append_assistant(session_id, &reply);
                self.emit(DomainEvent::CompletionSucceeded {
                    session_id,
                    reply_length: reply.len(),
                    latency_ms: started.elapsed().as_millis() as u64,
                    timestamp: Utc::now(),
                });
                self.start_speaking(session_id);
                Submission::Replied(reply)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Completion request failed, appending fallback");
                let fallback = self.config.fallback_reply.clone();
                self.append_assistant(session_id, &fallback);
                self.emit(DomainEvent::CompletionFailed {
                    session_id,
                    reason: e.to_string(),
                    timestamp: Utc::now(),
                });
                Submission::Fallback(fallback)
            }
        };

        if self.state.transition(TurnState::Idle).is_err() {
            self.state.reset();
        }
        Ok(outcome)
    }

    /// Surface a recognizer failure on the domain-event stream.
    pub fn notify_recognition_failed(&self, reason: &str) {
        self.emit(DomainEvent::RecognitionFailed {
            reason: reason.to_string(),
            timestamp: Utc::now(),
        });
    }

    fn append_assistant(&self, session_id: Uuid, text: &str) {
        self.conversation
            .lock()
            .expect("conversation mutex poisoned")
            .push(Turn::assistant(text));
        self.emit(DomainEvent::TurnAppended {
            session_id,
            speaker: tempo_core::Speaker::Assistant,
            text_length: text.len(),
            timestamp: Utc::now(),
        });
    }

    fn start_speaking(&self, session_id: Uuid) {
        let duration_ms = self.config.speaking_duration_ms;
        let handle = self.speaking.trigger(Duration::from_millis(duration_ms));
        self.emit(DomainEvent::SpeakingStarted {
            session_id,
            duration_ms,
            timestamp: Utc::now(),
        });

        if let Some(events) = self.events.clone() {
            tokio::spawn(async move {
                if handle.await.is_ok() {
                    let _ = events.send(DomainEvent::SpeakingEnded {
                        session_id,
                        timestamp: Utc::now(),
                    });
                }
            });
        }
    }

    fn emit(&self, event: DomainEvent) {
        if let Some(ref events) = self.events {
            // The listener may have shut down already; events are advisory.
            let _ = events.send(event);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tempo_completion::CompletionError;
    use tempo_core::Speaker;
    use tokio::sync::Notify;

    /// Replies with a fixed string and records what it was asked.
    struct FixedCompletion {
        reply: String,
        calls: Mutex<Vec<(usize, String)>>,
    }

    impl FixedCompletion {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Completion for FixedCompletion {
        async fn complete(
            &self,
            history: &[Turn],
            new_message: &str,
        ) -> Result<String, CompletionError> {
            self.calls
                .lock()
                .unwrap()
                .push((history.len(), new_message.to_string()));
            Ok(self.reply.clone())
        }
    }

    /// Always fails.
    struct FailingCompletion;

    #[async_trait]
    impl Completion for FailingCompletion {
        async fn complete(&self, _: &[Turn], _: &str) -> Result<String, CompletionError> {
            Err(CompletionError::Upstream {
                status: 500,
                message: "internal error".to_string(),
            })
        }
    }

    /// Blocks until released, to hold the controller in Processing.
    struct GatedCompletion {
        gate: Notify,
        entered: Notify,
    }

    impl GatedCompletion {
        fn new() -> Self {
            Self {
                gate: Notify::new(),
                entered: Notify::new(),
            }
        }
    }

    #[async_trait]
    impl Completion for GatedCompletion {
        async fn complete(&self, _: &[Turn], _: &str) -> Result<String, CompletionError> {
            self.entered.notify_one();
            self.gate.notified().await;
            Ok("released".to_string())
        }
    }

    fn config() -> ChatConfig {
        ChatConfig::default()
    }

    #[tokio::test]
    async fn test_submit_appends_turns_in_order() {
        let completion = Arc::new(FixedCompletion::new("Hi there!"));
        let controller = TurnController::new(Arc::clone(&completion), config());

        let outcome = controller.submit("Hello").await.unwrap();
        assert_eq!(outcome, Submission::Replied("Hi there!".to_string()));

        let turns = controller.turns();
        assert_eq!(turns.len(), 3); // greeting, user, reply
        assert_eq!(turns[0].speaker, Speaker::Assistant);
        assert_eq!(turns[1].speaker, Speaker::User);
        assert_eq!(turns[1].text, "Hello");
        assert_eq!(turns[2].speaker, Speaker::Assistant);
        assert_eq!(turns[2].text, "Hi there!");
        assert!(!controller.is_processing());
    }

    #[tokio::test]
    async fn test_completion_sees_history_without_new_message() {
        let completion = Arc::new(FixedCompletion::new("ok"));
        let controller = TurnController::new(Arc::clone(&completion), config());

        controller.submit("first").await.unwrap();
        controller.submit("second").await.unwrap();

        let calls = completion.calls.lock().unwrap();
        // First call: greeting only. Second: greeting + user + reply.
        assert_eq!(calls[0], (1, "first".to_string()));
        assert_eq!(calls[1], (3, "second".to_string()));
    }

    #[tokio::test]
    async fn test_whitespace_only_submit_is_a_noop() {
        let completion = Arc::new(FixedCompletion::new("never"));
        let controller = TurnController::new(Arc::clone(&completion), config());

        assert_eq!(controller.submit("").await.unwrap(), Submission::Ignored);
        assert_eq!(
            controller.submit("   \t\n").await.unwrap(),
            Submission::Ignored
        );

        assert_eq!(controller.turns().len(), 1); // greeting only
        assert!(completion.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_message_too_long_is_rejected() {
        let completion = Arc::new(FixedCompletion::new("never"));
        let controller = TurnController::new(Arc::clone(&completion), config());

        let long = "x".repeat(2001);
        let result = controller.submit(&long).await;
        assert!(matches!(result, Err(ChatError::MessageTooLong(2000))));
        assert_eq!(controller.turns().len(), 1);
        assert!(!controller.is_processing());
    }

    #[tokio::test]
    async fn test_submission_rejected_while_processing() {
        let completion = Arc::new(GatedCompletion::new());
        let controller = Arc::new(TurnController::new(Arc::clone(&completion), config()));

        let first = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.submit("first").await })
        };

        // Wait until the first submission is inside the completion call.
        completion.entered.notified().await;
        assert!(controller.is_processing());

        let second = controller.submit("second").await.unwrap();
        assert_eq!(second, Submission::Busy);

        completion.gate.notify_one();
        let first = first.await.unwrap().unwrap();
        assert_eq!(first, Submission::Replied("released".to_string()));

        // Only the first submission left turns behind.
        let turns = controller.turns();
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[1].text, "first");
        assert!(!controller.is_processing());
    }

    #[tokio::test]
    async fn test_failure_appends_exactly_one_fallback_turn() {
        let controller = TurnController::new(Arc::new(FailingCompletion), config());

        let outcome = controller.submit("Hello").await.unwrap();
        match outcome {
            Submission::Fallback(reply) => assert!(reply.contains("trouble connecting")),
            other => panic!("expected Fallback, got {:?}", other),
        }

        let turns = controller.turns();
        assert_eq!(turns.len(), 3); // greeting, user, fallback
        assert_eq!(turns[2].speaker, Speaker::Assistant);
        assert!(turns[2].text.contains("trouble connecting"));
        assert!(!controller.is_processing());

        // The controller recovers: the next submission goes through.
        let outcome = controller.submit("again").await.unwrap();
        assert!(matches!(outcome, Submission::Fallback(_)));
        assert_eq!(controller.turns().len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_speaking_flag_on_for_configured_duration() {
        let completion = Arc::new(FixedCompletion::new("Hi there!"));
        let controller = TurnController::new(completion, config());

        controller.submit("Hello").await.unwrap();
        assert!(controller.speaking().is_speaking());

        tokio::time::advance(Duration::from_millis(1999)).await;
        tokio::task::yield_now().await;
        assert!(controller.speaking().is_speaking());

        tokio::time::advance(Duration::from_millis(2)).await;
        tokio::task::yield_now().await;
        assert!(!controller.speaking().is_speaking());
    }

    #[tokio::test]
    async fn test_failure_does_not_trigger_speaking() {
        let controller = TurnController::new(Arc::new(FailingCompletion), config());
        controller.submit("Hello").await.unwrap();
        assert!(!controller.speaking().is_speaking());
    }

    #[tokio::test]
    async fn test_events_trace_the_turn_lifecycle() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let completion = Arc::new(FixedCompletion::new("Hi there!"));
        let controller = TurnController::new(completion, config()).with_events(tx);

        controller.submit("Hello").await.unwrap();

        let mut names = Vec::new();
        while let Ok(event) = rx.try_recv() {
            names.push(event.event_name());
        }
        assert_eq!(
            names,
            vec![
                "conversation_started",
                "turn_appended",
                "completion_requested",
                "turn_appended",
                "completion_succeeded",
                "speaking_started",
            ]
        );
    }
}
