//! Completion dispatcher.
//!
//! One call per exchange: the composed system instruction plus the templated
//! user prompt go out to the chat-completions provider with fixed sampling
//! parameters, and the first choice's text comes back.  No internal retry;
//! retrying a failed exchange is the client's decision.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, warn};

/// Sampling parameters (fixed by design; coaching answers should be short
/// and moderately varied).
const TEMPERATURE: f32 = 0.7;
const TOP_P: f32 = 0.9;
const FREQUENCY_PENALTY: f32 = 0.5;
const PRESENCE_PENALTY: f32 = 0.5;
const MAX_TOKENS: u32 = 100;

/// Failures surfaced by the dispatcher.
///
/// Both variants map to a generic 500 at the HTTP boundary; detail stays in
/// the server logs.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Network failure, timeout, or a non-success provider status.
    #[error("completion provider call failed: {0}")]
    Upstream(String),

    /// The provider answered 2xx but returned no usable choice.
    #[error("completion provider returned no choices")]
    EmptyCompletion,
}

/// Seam for the completion provider, mockable in router-level tests.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Run one completion: `system` instruction + `user` prompt → answer text.
    async fn complete(&self, system: &str, user: &str) -> Result<String, DispatchError>;
}

/// Production backend speaking the OpenAI chat-completions protocol.
pub struct OpenAiBackend {
    client: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
}

impl OpenAiBackend {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    async fn complete(&self, system: &str, user: &str) -> Result<String, DispatchError> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user",   "content": user },
            ],
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
            "top_p": TOP_P,
            "frequency_penalty": FREQUENCY_PENALTY,
            "presence_penalty": PRESENCE_PENALTY,
        });

        debug!(model = %self.model, prompt_len = user.len(), "dispatching completion");

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| DispatchError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), detail = %detail, "provider returned error status");
            return Err(DispatchError::Upstream(format!("provider returned HTTP {status}")));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| DispatchError::Upstream(format!("malformed provider response: {e}")))?;

        first_choice(completion)
    }
}

// ── Provider response shape ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Extract the first choice's text, treating an absent or empty content
/// field the same as an empty choice list.
fn first_choice(completion: ChatCompletion) -> Result<String, DispatchError> {
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|text| !text.is_empty())
        .ok_or(DispatchError::EmptyCompletion)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
