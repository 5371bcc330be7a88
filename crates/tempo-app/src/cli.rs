//! CLI argument definitions for the Tempo application.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// Tempo — a conversational English-practice tutor with voice input.
#[derive(Parser, Debug)]
#[command(name = "tempo", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Speech recognition language tag (e.g. en-US).
    #[arg(long = "language")]
    pub language: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Disable voice input entirely (text only).
    #[arg(long = "no-voice")]
    pub no_voice: bool,

    /// Replay a scripted voice capture instead of probing real backends.
    #[arg(long = "scripted-voice", value_name = "TRANSCRIPT")]
    pub scripted_voice: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > TEMPO_CONFIG env var > ~/.tempo/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("TEMPO_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the recognition language.
    ///
    /// Priority: --language flag > config file value.
    /// Returns `None` if not overridden.
    pub fn resolve_language(&self) -> Option<String> {
        self.language.clone()
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value.
    /// Returns `None` if not overridden.
    pub fn resolve_log_level(&self) -> Option<String> {
        self.log_level.clone()
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".tempo").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".tempo").join("config.toml");
    }
    PathBuf::from("config.toml")
}
