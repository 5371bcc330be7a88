//! Tempo application binary - composition root.
//!
//! Ties together the Tempo crates into a single executable:
//! 1. Load configuration from TOML (CLI > env > defaults)
//! 2. Build the completion client once and share it by reference
//! 3. Resolve the speech capability once (text-only when unavailable)
//! 4. Spawn the voice event loop and the domain-event listener
//! 5. Run the interactive read-line loop on stdin

mod cli;

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use tempo_chat::{run_voice_loop, Submission, TurnController};
use tempo_completion::CompletionClient;
use tempo_core::events::DomainEvent;
use tempo_core::{Speaker, TempoConfig};
use tempo_voice::{
    Capability, Recognizer, RecognizerConfig, ScriptedRecognizer, VoiceEvent, VoiceSession,
};

use cli::CliArgs;

/// Log domain events as they flow out of the controller and the voice loop.
async fn event_listener(mut events: UnboundedReceiver<DomainEvent>) {
    while let Some(event) = events.recv().await {
        match &event {
            DomainEvent::CompletionFailed { reason, .. } => {
                tracing::warn!(event = event.event_name(), reason = %reason, "domain event");
            }
            DomainEvent::RecognitionFailed { reason, .. } => {
                tracing::warn!(event = event.event_name(), reason = %reason, "domain event");
            }
            _ => {
                tracing::debug!(event = event.event_name(), "domain event");
            }
        }
    }
}

/// Build the voice script replayed by `--scripted-voice`.
fn scripted_events(transcript: &str) -> Vec<VoiceEvent> {
    let mut events = Vec::new();
    if let Some(first_word) = transcript.split_whitespace().next() {
        events.push(VoiceEvent::Partial(first_word.to_string()));
    }
    events.push(VoiceEvent::Final(transcript.to_string()));
    events
}

/// Print any turns appended since the last render.
fn print_new_turns(controller: &TurnController<CompletionClient>, printed: &mut usize) {
    let turns = controller.turns();
    for turn in &turns[*printed..] {
        match turn.speaker {
            Speaker::User => println!("You: {}", turn.text),
            Speaker::Assistant => println!("Tempo: {}", turn.text),
        }
    }
    *printed = turns.len();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = TempoConfig::load_or_default(&config_file);
    if let Some(language) = args.resolve_language() {
        config.voice.language = language;
    }
    if let Some(level) = args.resolve_log_level() {
        config.general.log_level = level;
    }

    // Tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
        )
        .init();

    tracing::info!("Starting Tempo v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");
    let started = Instant::now();

    // Completion client: constructed once, shared by reference.
    let completion = match CompletionClient::from_config(config.llm.clone()) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            tracing::error!(error = %e, env_var = %config.llm.api_key_env, "Cannot start without an API key");
            return Err(e.into());
        }
    };
    tracing::info!(model = completion.model(), "Completion client ready");

    // Domain events.
    let (events_tx, events_rx): (UnboundedSender<DomainEvent>, _) =
        tokio::sync::mpsc::unbounded_channel();
    tokio::spawn(event_listener(events_rx));

    // Turn controller.
    let controller = Arc::new(
        TurnController::new(Arc::clone(&completion), config.chat.clone())
            .with_events(events_tx.clone()),
    );

    // Voice capability, resolved once.
    let voice_session = Arc::new(Mutex::new(VoiceSession::new()));
    let mut active_recognizer: Option<Box<dyn Recognizer>> = None;

    if !args.no_voice {
        let (voice_tx, voice_rx) = tempo_voice::event::channel();
        let capability = match args.scripted_voice {
            Some(ref transcript) => Capability::Available(Box::new(ScriptedRecognizer::new(
                scripted_events(transcript),
                voice_tx,
            ))),
            None => Capability::detect(RecognizerConfig::from(&config.voice), voice_tx),
        };

        match capability {
            Capability::Available(mut recognizer) => {
                voice_session
                    .lock()
                    .expect("voice session mutex poisoned")
                    .start();
                match recognizer.start() {
                    Ok(()) => {
                        let _ = events_tx.send(DomainEvent::ListeningStarted {
                            language: config.voice.language.clone(),
                            timestamp: chrono::Utc::now(),
                        });
                        active_recognizer = Some(recognizer);

                        let controller = Arc::clone(&controller);
                        let session = Arc::clone(&voice_session);
                        let settle = Duration::from_millis(config.voice.settle_delay_ms);
                        tokio::spawn(async move {
                            run_voice_loop(voice_rx, controller, session, settle).await;
                        });
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to start speech capture");
                        println!("(voice input failed to start: {}; type your messages)", e);
                    }
                }
            }
            Capability::Unavailable { reason } => {
                // Terminal for voice only; the session continues text-only.
                println!("(voice input unavailable: {}; type your messages)", reason);
            }
        }
    }

    let _ = events_tx.send(DomainEvent::ApplicationStarted {
        version: env!("CARGO_PKG_VERSION").to_string(),
        voice_available: active_recognizer.is_some(),
        timestamp: chrono::Utc::now(),
    });

    // === Interactive loop ===

    let mut printed = 0usize;
    print_new_turns(&controller, &mut printed); // greeting

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    let mut render_tick = tokio::time::interval(Duration::from_millis(250));

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    None => break, // EOF
                    Some(line) => {
                        let line = line.trim().to_string();
                        if line == "/quit" || line == "/exit" {
                            break;
                        }
                        // The user turn is echoed by the renderer below.
                        match controller.submit(&line).await {
                            Ok(Submission::Busy) => {
                                println!("(Tempo is still thinking, one moment)");
                            }
                            Ok(_) => {}
                            Err(e) => println!("({})", e),
                        }
                        print_new_turns(&controller, &mut printed);
                        if controller.speaking().is_speaking() {
                            println!("(Tempo is speaking...)");
                        }
                    }
                }
            }
            _ = render_tick.tick() => {
                // Voice-driven turns arrive outside the read-line path.
                print_new_turns(&controller, &mut printed);
                let error = voice_session
                    .lock()
                    .expect("voice session mutex poisoned")
                    .error
                    .take();
                if let Some(message) = error {
                    println!("({})", message);
                }
            }
        }
    }

    // === Shutdown ===

    if let Some(mut recognizer) = active_recognizer {
        recognizer.stop();
        let _ = events_tx.send(DomainEvent::ListeningStopped {
            timestamp: chrono::Utc::now(),
        });
    }
    let _ = events_tx.send(DomainEvent::ApplicationShutdown {
        uptime_secs: started.elapsed().as_secs(),
        timestamp: chrono::Utc::now(),
    });
    tracing::info!("Goodbye");

    Ok(())
}
