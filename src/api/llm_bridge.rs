//! Bridge to the `llm` crate so any of its providers can serve the workflows.

use async_trait::async_trait;
use llm::builder::{LLMBackend, LLMBuilder};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use super::client::{ChatClient, ChatOptions};
use super::error::ClientError;
use super::message::{ChatMessage, ChatRole};

/// A [`ChatClient`] backed by an `llm` crate provider (OpenAI, Anthropic, Ollama, ...).
///
/// A provider is built for every request from the stored settings, so no
/// conversation state survives between calls.
pub struct LlmBridgeClient {
    backend: LLMBackend,
    api_key: Option<String>,
    base_url: Option<String>,
    timeout_secs: u64,
}

impl LlmBridgeClient {
    /// Creates a bridge for a backend name understood by `llm` (e.g. `openai`, `anthropic`).
    ///
    /// `base_url` overrides the backend's default endpoint; relative API paths
    /// are joined onto it, so it is stored with a trailing slash.
    pub fn new(
        backend: &str,
        api_key: Option<String>,
        base_url: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, ClientError> {
        let backend = LLMBackend::from_str(backend)
            .map_err(|_| ClientError::Configuration(format!("Unknown provider: {}", backend)))?;
        Ok(Self {
            backend,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: base_url
                .filter(|u| !u.trim().is_empty())
                .map(|u| format!("{}/", u.trim().trim_end_matches('/'))),
            timeout_secs,
        })
    }
}

#[async_trait]
impl ChatClient for LlmBridgeClient {
    async fn send(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<String, ClientError> {
        let folded = fold_system_messages(messages);
        if options.stop.is_some() {
            debug!("stop sequences are not forwarded through the llm bridge");
        }

        let mut builder = LLMBuilder::new()
            .backend(self.backend.clone())
            .model(options.model.clone())
            .temperature(options.temperature)
            .max_tokens(options.max_tokens);
        if let Some(api_key) = &self.api_key {
            builder = builder.api_key(api_key.clone());
        }
        if let Some(base_url) = &self.base_url {
            builder = builder.base_url(base_url.clone());
        }
        let provider = builder.build()?;

        let request = folded
            .iter()
            .map(|m| match m.role {
                ChatRole::Assistant => llm::chat::ChatMessage::assistant()
                    .content(m.content.clone())
                    .build(),
                _ => llm::chat::ChatMessage::user()
                    .content(m.content.clone())
                    .build(),
            })
            .collect::<Vec<_>>();

        info!(model = %options.model, messages = request.len(), "llm bridge request prepared");

        let response = tokio::time::timeout(
            Duration::from_secs(self.timeout_secs),
            provider.chat(&request),
        )
        .await
        .map_err(|_| ClientError::Timeout(self.timeout_secs))??;

        Ok(response.text().unwrap_or_default())
    }
}

/// Merges system messages into the first user message.
///
/// `llm` chat messages carry only user and assistant roles; the system
/// instructions are prepended under a `System:` header instead.
fn fold_system_messages(messages: &[ChatMessage]) -> Vec<ChatMessage> {
    let system = messages
        .iter()
        .filter(|m| m.role == ChatRole::System)
        .map(|m| m.content.trim())
        .collect::<Vec<_>>()
        .join("\n\n");

    let mut rest: Vec<ChatMessage> = messages
        .iter()
        .filter(|m| m.role != ChatRole::System)
        .cloned()
        .collect();

    if system.is_empty() {
        return rest;
    }

    match rest.iter_mut().find(|m| m.role == ChatRole::User) {
        Some(first_user) => {
            first_user.content = format!("System:\n{}\n\nUser:\n{}", system, first_user.content.trim());
        }
        None => rest.insert(0, ChatMessage::user(format!("System:\n{}", system))),
    }
    rest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::tests::{spawn_provider, spawn_slow_provider};
    use axum::http::StatusCode;
    use serde_json::json;

    fn options() -> ChatOptions {
        ChatOptions {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 200,
            stop: None,
        }
    }

    #[test]
    fn folds_system_into_first_user_message() {
        let folded = fold_system_messages(&[
            ChatMessage::system("Be terse."),
            ChatMessage::user("\nTheme: rust\n"),
            ChatMessage::assistant("1. Ownership"),
            ChatMessage::user("more"),
        ]);
        assert_eq!(folded.len(), 3);
        assert_eq!(folded[0].content, "System:\nBe terse.\n\nUser:\nTheme: rust");
        assert_eq!(folded[2].content, "more");
    }

    #[test]
    fn system_only_becomes_user_message() {
        let folded = fold_system_messages(&[ChatMessage::system("only")]);
        assert_eq!(folded, vec![ChatMessage::user("System:\nonly")]);
    }

    #[test]
    fn passes_through_without_system() {
        let msgs = vec![ChatMessage::user("hi")];
        assert_eq!(fold_system_messages(&msgs), msgs);
    }

    #[tokio::test]
    async fn sends_folded_messages_through_openai_backend() {
        let reply = json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 0,
            "model": "gpt-4o-mini",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "1. Ownership"},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 3, "total_tokens": 13}
        });
        let (base, seen) = spawn_provider(StatusCode::OK, reply).await;
        let client =
            LlmBridgeClient::new("openai", Some("secret".to_string()), Some(base), 5).unwrap();

        let text = client
            .send(
                &[ChatMessage::system("be brief"), ChatMessage::user("topics")],
                &options(),
            )
            .await
            .unwrap();
        assert_eq!(text, "1. Ownership");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let (auth, body) = &seen[0];
        assert_eq!(auth.as_deref(), Some("Bearer secret"));
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "user");
        let wire = body["messages"].to_string();
        assert!(wire.contains("System:\\nbe brief\\n\\nUser:\\ntopics"), "{}", wire);
    }

    #[tokio::test]
    async fn slow_backend_times_out() {
        let base = spawn_slow_provider(Duration::from_secs(3)).await;
        let client = LlmBridgeClient::new("openai", Some("k".to_string()), Some(base), 1).unwrap();
        assert!(matches!(
            client.send(&[ChatMessage::user("x")], &options()).await,
            Err(ClientError::Timeout(1))
        ));
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let client = LlmBridgeClient::new(
            "openai",
            None,
            Some("http://localhost:8080/v1".to_string()),
            5,
        )
        .unwrap();
        assert_eq!(client.base_url.as_deref(), Some("http://localhost:8080/v1/"));
    }

    #[test]
    fn rejects_unknown_backend() {
        assert!(matches!(
            LlmBridgeClient::new("not-a-backend", None, None, 10),
            Err(ClientError::Configuration(_))
        ));
    }
}
