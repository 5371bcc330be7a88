//! The completion client: one request, one response, the reply returned whole.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use tempo_core::config::LlmConfig;
use tempo_core::Turn;

use crate::error::CompletionError;
use crate::persona::TUTOR_PERSONA;
use crate::protocol::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, UpstreamErrorBody,
};

/// History length past which the unbounded-context warning fires once.
const HISTORY_WARN_TURNS: usize = 200;

/// The seam the turn controller talks to.
///
/// Implemented by `CompletionClient` for the hosted endpoint and by test
/// doubles in the chat crate.
#[async_trait]
pub trait Completion: Send + Sync {
    /// Send the persona, the mapped history, and the new user message;
    /// return the assistant's reply text atomically.
    async fn complete(
        &self,
        history: &[Turn],
        new_message: &str,
    ) -> Result<String, CompletionError>;
}

/// Client for an OpenAI-compatible chat-completion endpoint.
///
/// Constructed once by the composition root and shared by `Arc`; holds the
/// bearer token resolved from the configured environment variable. The
/// underlying `reqwest::Client` is built without a timeout: the caller's
/// processing state simply waits on an unresponsive upstream.
pub struct CompletionClient {
    http: reqwest::Client,
    config: LlmConfig,
    api_key: String,
    history_warned: AtomicBool,
}

impl CompletionClient {
    /// Create a client with an explicit API key.
    ///
    /// Fails with `MissingApiKey` when the key is empty.
    pub fn new(config: LlmConfig, api_key: String) -> Result<Self, CompletionError> {
        let api_key = api_key.trim().to_string();
        if api_key.is_empty() {
            return Err(CompletionError::MissingApiKey);
        }
        Ok(Self {
            http: reqwest::Client::new(),
            config,
            api_key,
            history_warned: AtomicBool::new(false),
        })
    }

    /// Create a client reading the key from the env var named in the config.
    pub fn from_config(config: LlmConfig) -> Result<Self, CompletionError> {
        let api_key =
            std::env::var(&config.api_key_env).map_err(|_| CompletionError::MissingApiKey)?;
        Self::new(config, api_key)
    }

    /// The model this client sends with every request.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Build the request body: persona, then the history in insertion order,
    /// then the new user message.
    fn build_request(&self, history: &[Turn], new_message: &str) -> ChatCompletionRequest {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(TUTOR_PERSONA));
        messages.extend(history.iter().map(ChatMessage::from_turn));
        messages.push(ChatMessage::user(new_message));

        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }
}

#[async_trait]
impl Completion for CompletionClient {
    async fn complete(
        &self,
        history: &[Turn],
        new_message: &str,
    ) -> Result<String, CompletionError> {
        // Context grows with the session and is never windowed. Flag it once
        // so long sessions show up in the logs before the endpoint rejects them.
        if history.len() > HISTORY_WARN_TURNS
            && !self.history_warned.swap(true, Ordering::Relaxed)
        {
            tracing::warn!(
                turns = history.len(),
                "Conversation history is unbounded and has grown large"
            );
        }

        let url = format!("{}/chat/completions", self.config.api_base);
        let body = self.build_request(history, new_message);

        tracing::debug!(
            model = %self.config.model,
            messages = body.messages.len(),
            "Dispatching completion request"
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<UpstreamErrorBody>(&text)
                .ok()
                .and_then(|b| b.error)
                .map(|e| e.message)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .map(str::to_string)
                        .unwrap_or(text)
                });
            return Err(CompletionError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::Parse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(CompletionError::EmptyChoices)
    }
}

// =============================================================================
// Tests
// =============================================================================
