//! The "speaking" display flag.
//!
//! After each assistant reply the flag is held on for a fixed duration so the
//! UI can animate the tutor talking, then cleared by a timer task.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Shared on/off flag with a timed clear.
///
/// `trigger` bumps a generation counter so an earlier timer that is still
/// sleeping cannot clear the flag set by a later reply.
#[derive(Clone, Debug, Default)]
pub struct SpeakingIndicator {
    speaking: Arc<AtomicBool>,
    generation: Arc<AtomicU64>,
}

impl SpeakingIndicator {
    /// Create an indicator in the off state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the tutor is currently displayed as speaking.
    pub fn is_speaking(&self) -> bool {
        self.speaking.load(Ordering::Relaxed)
    }

    /// Switch the flag on and spawn a timer that clears it after `duration`.
    ///
    /// Returns the timer task handle; the flag is observable immediately.
    pub fn trigger(&self, duration: Duration) -> JoinHandle<()> {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        self.speaking.store(true, Ordering::Relaxed);

        let speaking = Arc::clone(&self.speaking);
        let current = Arc::clone(&self.generation);
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            if current.load(Ordering::Relaxed) == generation {
                speaking.store(false, Ordering::Relaxed);
            }
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_flag_on_for_duration_then_off() {
        let indicator = SpeakingIndicator::new();
        assert!(!indicator.is_speaking());

        let handle = indicator.trigger(Duration::from_millis(2000));
        assert!(indicator.is_speaking());

        // Just before the deadline the flag is still on.
        tokio::time::advance(Duration::from_millis(1999)).await;
        tokio::task::yield_now().await;
        assert!(indicator.is_speaking());

        tokio::time::advance(Duration::from_millis(2)).await;
        handle.await.unwrap();
        assert!(!indicator.is_speaking());
    }

    #[tokio::test(start_paused = true)]
    async fn test_retrigger_extends_the_window() {
        let indicator = SpeakingIndicator::new();

        let first = indicator.trigger(Duration::from_millis(2000));
        tokio::time::advance(Duration::from_millis(1500)).await;

        // A second reply arrives; its window must not be cut short by the
        // first timer expiring.
        let second = indicator.trigger(Duration::from_millis(2000));
        tokio::time::advance(Duration::from_millis(600)).await;
        first.await.unwrap();
        assert!(indicator.is_speaking());

        tokio::time::advance(Duration::from_millis(1500)).await;
        second.await.unwrap();
        assert!(!indicator.is_speaking());
    }

    #[tokio::test]
    async fn test_clones_share_the_flag() {
        let indicator = SpeakingIndicator::new();
        let other = indicator.clone();
        indicator.trigger(Duration::from_secs(60));
        assert!(other.is_speaking());
    }
}
