//! Bridges recognizer events into the turn-taking loop.
//!
//! Final transcripts are funneled through the same submit path as typed
//! input, after a short settle delay. Recognizer errors surface on the shared
//! voice session and force listening off; the loop exits on `Ended` or when
//! the recognizer drops its sender.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;

use tempo_completion::Completion;
use tempo_voice::{VoiceEvent, VoiceSession};

use crate::controller::{Submission, TurnController};

/// Consume recognizer events until the capture ends.
pub async fn run_voice_loop<C: Completion>(
    mut events: UnboundedReceiver<VoiceEvent>,
    controller: Arc<TurnController<C>>,
    session: Arc<Mutex<VoiceSession>>,
    settle_delay: Duration,
) {
    while let Some(event) = events.recv().await {
        session
            .lock()
            .expect("voice session mutex poisoned")
            .apply(&event);

        match event {
            VoiceEvent::Partial(_) => {}
            VoiceEvent::Final(text) => {
                // Let local state settle before the turn is sent.
                tokio::time::sleep(settle_delay).await;
                if text.trim().is_empty() {
                    continue;
                }
                match controller.submit(&text).await {
                    Ok(Submission::Replied(_)) | Ok(Submission::Fallback(_)) => {}
                    Ok(Submission::Busy) => {
                        tracing::debug!("Voice submission dropped, a turn is in flight");
                    }
                    Ok(Submission::Ignored) => {}
                    Err(e) => {
                        tracing::warn!(error = %e, "Voice submission rejected");
                    }
                }
            }
            VoiceEvent::Error(message) => {
                tracing::warn!(error = %message, "Recognizer error, listening stopped");
                controller.notify_recognition_failed(&message);
            }
            VoiceEvent::Ended => {
                tracing::debug!("Voice capture ended");
                break;
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
