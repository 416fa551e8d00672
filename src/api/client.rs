//! Chat client contract and the REST chat-completions adapter.
//!
//! This module is the only place that knows the provider's wire format.
//! Workflows and parsers deal in [`ChatMessage`] sequences and plain text.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::error::ClientError;
use super::message::ChatMessage;

/// The public OpenRouter endpoint used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Per-request generation options.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatOptions {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub stop: Option<Vec<String>>,
}

/// Sends role-tagged messages to a language model and returns its reply text.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn send(&self, messages: &[ChatMessage], options: &ChatOptions)
        -> Result<String, ClientError>;

    /// Validates untyped `{role|type, content}` objects, then sends them.
    /// Every message is checked before any network call is made.
    async fn send_untyped(
        &self,
        messages: &[serde_json::Value],
        options: &ChatOptions,
    ) -> Result<String, ClientError> {
        let typed = messages
            .iter()
            .map(ChatMessage::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        self.send(&typed, options).await
    }
}

#[async_trait]
impl ChatClient for Arc<dyn ChatClient> {
    async fn send(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<String, ClientError> {
        (**self).send(messages, options).await
    }
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<&'a [String]>,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat client for OpenAI-compatible `/chat/completions` endpoints (OpenRouter by default).
pub struct OpenRouterClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
    timeout_secs: u64,
}

impl OpenRouterClient {
    /// Builds a client. Fails with a configuration error when the key is blank.
    pub fn new(
        api_key: impl Into<String>,
        base_url: &str,
        timeout_secs: u64,
    ) -> Result<Self, ClientError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ClientError::Configuration(
                "API key is empty".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;

        Ok(Self {
            http,
            api_key,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            timeout_secs,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The reqwest timeout also covers reading the body, so both stages map through here.
    fn request_error(&self, e: reqwest::Error) -> ClientError {
        if e.is_timeout() {
            ClientError::Timeout(self.timeout_secs)
        } else {
            ClientError::from(e)
        }
    }
}

#[async_trait]
impl ChatClient for OpenRouterClient {
    async fn send(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<String, ClientError> {
        let payload = CompletionRequest {
            model: &options.model,
            messages: messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            stop: options.stop.as_deref(),
        };

        info!(
            model = %options.model,
            messages = messages.len(),
            endpoint = %self.endpoint,
            "chat completion request prepared"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.request_error(e))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "provider returned an error status");
            return Err(ClientError::UpstreamApi {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: CompletionResponse = serde_json::from_str(&body)
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.unwrap_or_default())
            .ok_or_else(|| ClientError::MalformedResponse("response has no choices".to_string()))?;

        debug!(chars = content.chars().count(), "chat completion received");
        Ok(content)
    }
}
