//! Text completion providers.
//!
//! The counselor, dream journal, and miracle question flows all talk to a
//! language model through [`CompletionProvider`]. The trait keeps those
//! features decoupled from any one vendor: the default implementation posts
//! to an OpenAI-compatible chat endpoint, and [`ScriptedProvider`] stands in
//! wherever a fixed reply is enough.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::error::{CoreError, Result};

/// Default chat completions endpoint (OpenRouter, OpenAI-compatible).
pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default model served through the endpoint above.
pub const DEFAULT_MODEL: &str = "meta-llama/llama-3.1-70b-instruct";

/// Environment variable consulted for the API key when none is configured.
pub const DEFAULT_API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

const ATTRIBUTION_REFERER: &str = "https://obsidiana-app.vercel.app";
const ATTRIBUTION_TITLE: &str = "Obsidiana App";

/// A source of model completions.
///
/// Implementations must be thread-safe since providers are shared behind
/// `Arc` across concurrent feature calls.
#[async_trait]
pub trait CompletionProvider: Send + Sync + Debug {
    /// Short identifier for logging.
    fn name(&self) -> &str;

    /// Send a system instruction and a user prompt, return the reply text.
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}

/// Chat completion client for OpenAI-compatible endpoints.
#[derive(Debug, Clone)]
pub struct HttpCompletionClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    key_env: String,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

impl HttpCompletionClient {
    /// Create a client for the default endpoint.
    ///
    /// A missing key does not fail construction. The key is checked on each
    /// call so callers can fall back to canned guidance instead.
    pub fn new(model: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: model.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            key_env: DEFAULT_API_KEY_ENV.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Create a client whose key comes from the environment.
    pub fn from_env(model: impl Into<String>, env_var: &str) -> Self {
        let api_key = std::env::var(env_var).ok();
        let mut client = Self::new(model, api_key);
        client.key_env = env_var.to_string();
        client
    }

    /// Override the endpoint, e.g. for a self-hosted gateway.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Override the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn request_failed(&self, cause: reqwest::Error) -> CoreError {
        CoreError::CompletionRequestFailed {
            endpoint: self.endpoint.clone(),
            model: self.model.clone(),
            cause,
        }
    }
}

#[async_trait]
impl CompletionProvider for HttpCompletionClient {
    fn name(&self) -> &str {
        "http"
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| CoreError::CompletionKeyMissing {
                env_var: self.key_env.clone(),
            })?;

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            temperature: self.temperature,
        };

        tracing::debug!(model = %self.model, endpoint = %self.endpoint, "requesting completion");

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("HTTP-Referer", ATTRIBUTION_REFERER)
            .header("X-Title", ATTRIBUTION_TITLE)
            .json(&request)
            .send()
            .await
            .map_err(|cause| self.request_failed(cause))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|cause| self.request_failed(cause))?;
            tracing::warn!(status = status.as_u16(), "completion rejected");
            return Err(CoreError::CompletionRejected {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|cause| self.request_failed(cause))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(CoreError::CompletionEmpty {
                model: self.model.clone(),
            });
        }

        Ok(content)
    }
}

/// Provider that answers every prompt with one fixed reply.
///
/// Used by tests and by demo sessions that run without network access.
#[derive(Debug, Clone)]
pub struct ScriptedProvider {
    pub reply: String,
}

impl ScriptedProvider {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
        Ok(self.reply.clone())
    }
}
