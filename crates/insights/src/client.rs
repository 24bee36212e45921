//! OpenAI-compatible chat-completions client.
//!
//! Sends one user message per call and returns the first choice's content.
//! There are no retries; a failed call surfaces as a [`SummarizationError`].

use crate::error::{Result, SummarizationError};
use crate::summarizer::InsightGenerator;
use async_trait::async_trait;
use reqwest::Client;
use sales_kpi_core::{require_credential, InsightsConfig};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

// =============================================================================
// Configuration
// =============================================================================

/// Connection settings for the chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiClientConfig {
    /// Base URL, without the `/chat/completions` suffix.
    pub base_url: String,

    /// Model identifier sent with every request.
    pub model: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for OpenAiClientConfig {
    fn default() -> Self {
        Self::from(&InsightsConfig::default())
    }
}

impl From<&InsightsConfig> for OpenAiClientConfig {
    fn from(settings: &InsightsConfig) -> Self {
        Self {
            base_url: settings.api_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            timeout_secs: settings.timeout_secs,
        }
    }
}

impl OpenAiClientConfig {
    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

// =============================================================================
// Client
// =============================================================================

pub struct OpenAiClient {
    config: OpenAiClientConfig,
    http: Client,
    api_key: SecretString,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .finish_non_exhaustive()
    }
}

impl OpenAiClient {
    /// Creates a client with an explicit credential.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: OpenAiClientConfig, api_key: SecretString) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SummarizationError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            config,
            http,
            api_key,
        })
    }

    /// Creates a client from the `[insights]` settings, reading the credential
    /// from the environment variable they name.
    ///
    /// # Errors
    /// Returns [`SummarizationError::MissingCredential`] if the variable is unset
    /// or blank.
    pub fn from_settings(settings: &InsightsConfig) -> Result<Self> {
        let api_key = require_credential(&settings.api_key_env)?;
        Self::new(OpenAiClientConfig::from(settings), api_key)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Sends `prompt` as a single user message and returns the completion text.
    ///
    /// # Errors
    /// Returns an error on timeout, transport failure, a non-success status, or
    /// a body without a first choice.
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let request = ChatRequest {
            model: &self.config.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        tracing::debug!(url = %url, model = %self.config.model, prompt_len = prompt.len(), "POST chat completion");

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(SummarizationError::api(status.as_u16(), text));
        }

        let body = response.text().await?;
        parse_completion(&body)
    }
}

#[async_trait]
impl InsightGenerator for OpenAiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.complete(prompt).await
    }
}

fn parse_completion(body: &str) -> Result<String> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| SummarizationError::MalformedResponse(e.to_string()))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| SummarizationError::MalformedResponse("no completion in response".to_string()))
}
