//! Startup capability detection.
//!
//! The speech feature is polymorphic over whatever backends the platform
//! offers. `Capability::detect` probes them in order exactly once at startup;
//! if none constructs, the feature is `Unavailable` with a user-visible
//! reason and the rest of the application runs text-only.

use crate::error::VoiceError;
use crate::event::VoiceEventSender;
use crate::recognizer::{Recognizer, RecognizerConfig, SystemRecognizer};

/// The resolved speech-recognition capability.
pub enum Capability {
    /// A working recognizer backend.
    Available(Box<dyn Recognizer>),
    /// No backend constructed. Terminal for this component only.
    Unavailable {
        /// User-visible explanation, surfaced as a persistent inline message.
        reason: String,
    },
}

impl Capability {
    /// Probe the platform backends in preference order.
    ///
    /// Currently the system speech service is the only real backend; the
    /// probe list keeps the ordering explicit for when another lands.
    pub fn detect(config: RecognizerConfig, sender: VoiceEventSender) -> Self {
        type Probe = fn(RecognizerConfig, VoiceEventSender) -> Result<Box<dyn Recognizer>, VoiceError>;
        let probes: &[(&str, Probe)] = &[("system", |config, sender| {
            SystemRecognizer::new(config, sender).map(|r| Box::new(r) as Box<dyn Recognizer>)
        })];

        let mut last_reason = String::from("no speech backends registered");
        for (name, probe) in probes {
            match probe(config.clone(), sender.clone()) {
                Ok(recognizer) => {
                    tracing::info!(backend = name, language = %config.language, "Speech recognition available");
                    return Capability::Available(recognizer);
                }
                Err(e) => {
                    tracing::debug!(backend = name, error = %e, "Speech backend probe failed");
                    last_reason = e.to_string();
                }
            }
        }

        tracing::info!(reason = %last_reason, "Speech recognition unavailable, text input only");
        Capability::Unavailable {
            reason: last_reason,
        }
    }

    /// Returns whether a recognizer was resolved.
    pub fn is_available(&self) -> bool {
        matches!(self, Capability::Available(_))
    }
}

// =============================================================================
// Tests
// =============================================================================
