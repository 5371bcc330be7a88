//! Recognizer trait and backends.
//!
//! `SystemRecognizer` wraps the platform speech service where one exists;
//! `ScriptedRecognizer` replays a fixed event sequence for tests and demos.
//! Both emit `VoiceEvent`s over the channel handed to their constructor.

use tempo_core::config::VoiceConfig;
use tempo_core::LanguageTag;

use crate::error::VoiceError;
use crate::event::{VoiceEvent, VoiceEventSender};

/// Recognition parameters shared by all backends.
#[derive(Clone, Debug)]
pub struct RecognizerConfig {
    /// Language to recognize.
    pub language: LanguageTag,
    /// Keep capturing across utterances.
    pub continuous: bool,
    /// Emit partial transcripts while an utterance is in progress.
    pub interim_results: bool,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            language: LanguageTag::default(),
            continuous: true,
            interim_results: true,
        }
    }
}

impl From<&VoiceConfig> for RecognizerConfig {
    fn from(config: &VoiceConfig) -> Self {
        Self {
            language: LanguageTag::from(config.language.as_str()),
            continuous: config.continuous,
            interim_results: config.interim_results,
        }
    }
}

/// A speech recognizer that captures audio and emits transcript events.
///
/// `start` begins continuous capture in the configured language; `stop` ends
/// capture early. Recognizer errors are delivered as `VoiceEvent::Error` and
/// always leave the backend not listening.
pub trait Recognizer: Send {
    /// Begin capturing speech.
    fn start(&mut self) -> Result<(), VoiceError>;

    /// Stop capturing. A no-op when not listening.
    fn stop(&mut self);

    /// Whether capture is currently active.
    fn is_listening(&self) -> bool;
}

// =============================================================================
// SystemRecognizer
// =============================================================================

/// Recognizer backed by the operating system's speech service.
///
/// Only Windows ships a usable dictation service; on other platforms the
/// constructor fails and capability detection reports the feature as
/// unavailable. Audio capture itself is driven by the OS service; this type
/// tracks the listening lifecycle and forwards its events.
pub struct SystemRecognizer {
    config: RecognizerConfig,
    sender: VoiceEventSender,
    listening: bool,
}

impl SystemRecognizer {
    /// Create a system recognizer, failing where the platform has no
    /// speech service.
    pub fn new(config: RecognizerConfig, sender: VoiceEventSender) -> Result<Self, VoiceError> {
        if !cfg!(target_os = "windows") {
            return Err(VoiceError::Unsupported(
                "no system speech service on this platform".to_string(),
            ));
        }
        Ok(Self {
            config,
            sender,
            listening: false,
        })
    }

    /// The language this recognizer was configured with.
    pub fn language(&self) -> &LanguageTag {
        &self.config.language
    }
}

impl Recognizer for SystemRecognizer {
    fn start(&mut self) -> Result<(), VoiceError> {
        if self.listening {
            return Err(VoiceError::AlreadyListening);
        }
        tracing::debug!(
            language = %self.config.language,
            continuous = self.config.continuous,
            "System speech capture started"
        );
        self.listening = true;
        Ok(())
    }

    fn stop(&mut self) {
        if !self.listening {
            return;
        }
        self.listening = false;
        // Receiver may already be gone during shutdown.
        let _ = self.sender.send(VoiceEvent::Ended);
        tracing::debug!("System speech capture stopped");
    }

    fn is_listening(&self) -> bool {
        self.listening
    }
}

// =============================================================================
// ScriptedRecognizer
// =============================================================================

/// Recognizer that replays a fixed sequence of events on `start`.
///
/// Used by controller tests and by the `--scripted-voice` demo mode. The
/// script is drained on the first `start`; an `Ended` event is appended when
/// the script does not already terminate with one.
pub struct ScriptedRecognizer {
    script: Vec<VoiceEvent>,
    sender: VoiceEventSender,
    listening: bool,
}

impl ScriptedRecognizer {
    /// Create a scripted recognizer over the given event sequence.
    pub fn new(script: Vec<VoiceEvent>, sender: VoiceEventSender) -> Self {
        Self {
            script,
            sender,
            listening: false,
        }
    }
}

impl Recognizer for ScriptedRecognizer {
    fn start(&mut self) -> Result<(), VoiceError> {
        if self.listening {
            return Err(VoiceError::AlreadyListening);
        }
        self.listening = true;

        let script = std::mem::take(&mut self.script);
        let ends = matches!(script.last(), Some(VoiceEvent::Ended));
        for event in script {
            if self.sender.send(event).is_err() {
                break;
            }
        }
        if !ends {
            let _ = self.sender.send(VoiceEvent::Ended);
        }
        self.listening = false;
        Ok(())
    }

    fn stop(&mut self) {
        if self.listening {
            self.listening = false;
            let _ = self.sender.send(VoiceEvent::Ended);
        }
    }

    fn is_listening(&self) -> bool {
        self.listening
    }
}

// =============================================================================
// Tests
// =============================================================================
