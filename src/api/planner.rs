//! The main entry point for running the blog planning workflows.

use std::sync::Arc;
use tracing::info;

use crate::core::config::AppConfig;

use super::client::{ChatClient, OpenRouterClient, DEFAULT_BASE_URL};
use super::error::PlannerError;
use super::llm_bridge::LlmBridgeClient;
use super::runner::{OutlineRunner, TopicRunner};
use super::state::{OutlineGenerationState, TopicIdeationState};
use super::workflow::{outline_generation_workflow, topic_ideation_workflow};
use super::{OutlineOutcome, TopicOutcome};

/// Runs the topic and outline workflows against a chat client.
///
/// Create it once at startup and share it. It holds only read-only
/// configuration and a stateless client; every invocation builds its own
/// workflow state.
#[derive(Clone)]
pub struct BlogPlanner {
    config: Arc<AppConfig>,
    client: Arc<dyn ChatClient>,
}

impl BlogPlanner {
    /// Builds the chat client selected by `config.backend`.
    pub fn from_config(config: AppConfig) -> Result<Self, PlannerError> {
        let client: Arc<dyn ChatClient> = if config.backend.eq_ignore_ascii_case("openrouter") {
            Arc::new(OpenRouterClient::new(
                config.api_key.clone(),
                config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL),
                config.timeout_secs,
            )?)
        } else {
            Arc::new(LlmBridgeClient::new(
                &config.backend,
                Some(config.api_key.clone()),
                config.base_url.clone(),
                config.timeout_secs,
            )?)
        };
        info!(backend = %config.backend, model = %config.model, "planner initialized");
        Ok(Self::new(Arc::new(config), client))
    }

    pub fn new(config: Arc<AppConfig>, client: Arc<dyn ChatClient>) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Creates a runner for brainstorming topics on `theme`.
    pub fn topics<'a>(&'a self, theme: &'a str) -> TopicRunner<'a> {
        TopicRunner::new(self, theme)
    }

    /// Creates a runner for outlining `topic`.
    pub fn outline<'a>(&'a self, topic: &'a str) -> OutlineRunner<'a> {
        OutlineRunner::new(self, topic)
    }

    /// Runs topic ideation for exactly `num_suggestions` ideas.
    pub async fn run_topic_ideation(&self, theme: &str, num_suggestions: usize) -> TopicOutcome {
        let workflow = topic_ideation_workflow(
            Arc::clone(&self.client),
            self.config.chat_options(),
            self.config.topic_fallback.clone(),
        );
        let state = workflow
            .invoke(TopicIdeationState::new(theme, num_suggestions))
            .await;
        let (topics, error) = state.into_parts();
        TopicOutcome {
            topics: topics.unwrap_or_default(),
            error,
        }
    }

    /// Runs outline generation. A missing or blank audience becomes the configured default.
    pub async fn run_outline_generation(
        &self,
        topic: &str,
        audience: Option<&str>,
    ) -> OutlineOutcome {
        let audience = audience
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or(&self.config.default_audience);

        let workflow =
            outline_generation_workflow(Arc::clone(&self.client), self.config.chat_options());
        let state = workflow
            .invoke(OutlineGenerationState::new(topic, audience))
            .await;
        let (outline, error) = state.into_parts();
        OutlineOutcome { outline, error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::tests::spawn_provider;
    use crate::api::error::ClientError;
    use crate::api::outline::tests::sample;
    use crate::api::workflow::tests::ScriptedClient;
    use crate::core::config::tests::test_config;
    use crate::core::config::DEFAULT_AUDIENCE;
    use axum::http::StatusCode;
    use serde_json::json;

    fn planner(client: Arc<ScriptedClient>) -> BlogPlanner {
        BlogPlanner::new(Arc::new(test_config("http://unused")), client)
    }

    #[tokio::test]
    async fn missing_audience_uses_configured_default() {
        let raw = serde_json::to_string(&sample()).unwrap();
        for audience in [None, Some(""), Some("   ")] {
            let client = ScriptedClient::reply(&raw);
            let outcome = planner(client.clone())
                .run_outline_generation("Ethics of AI", audience)
                .await;
            assert_eq!(outcome.outline, Some(sample()));
            let seen = client.seen.lock().unwrap();
            assert!(seen[0][1]
                .content
                .contains(&format!("Target Audience: {}", DEFAULT_AUDIENCE)));
        }
    }

    #[tokio::test]
    async fn explicit_audience_is_kept() {
        let client = ScriptedClient::reply(&serde_json::to_string(&sample()).unwrap());
        planner(client.clone())
            .run_outline_generation("t", Some("data engineers"))
            .await;
        assert!(client.seen.lock().unwrap()[0][1]
            .content
            .contains("Target Audience: data engineers"));
    }

    #[tokio::test]
    async fn topic_outcome_on_error_is_empty() {
        let client = ScriptedClient::new(vec![Err(ClientError::Timeout(5))]);
        let outcome = planner(client).run_topic_ideation("t", 3).await;
        assert!(outcome.topics.is_empty());
        assert_eq!(outcome.error.as_deref(), Some("Request timed out after 5s"));
    }

    #[tokio::test]
    async fn runner_defaults_count_from_config() {
        let reply: String = (1..=8).map(|i| format!("{}. T{}\n", i, i)).collect();
        let client = ScriptedClient::reply(&reply);
        let p = planner(client.clone());
        let outcome = p.topics("Rust").run().await;
        assert_eq!(outcome.topics.len(), p.config().default_num_topics);

        let client = ScriptedClient::reply(&reply);
        let outcome = planner(client).topics("Rust").count(2).run().await;
        assert_eq!(outcome.topics, vec!["T1", "T2"]);
    }

    #[tokio::test]
    async fn end_to_end_against_provider_stub() {
        let reply = json!({"choices": [{"message": {"content": "1. Ethics of AI\n2. Remote Work Trends"}}]});
        let (base, seen) = spawn_provider(StatusCode::OK, reply).await;
        let p = BlogPlanner::from_config(test_config(&base)).unwrap();

        let outcome = p.run_topic_ideation("Technology", 2).await;
        assert_eq!(outcome.topics, vec!["Ethics of AI", "Remote Work Trends"]);
        assert_eq!(outcome.error, None);
        assert_eq!(seen.lock().unwrap()[0].1["model"], "test/model");
    }

    #[tokio::test]
    async fn llm_backend_uses_configured_base_url() {
        let reply = json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 0,
            "model": "test/model",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "1. Ethics of AI\n2. Remote Work Trends"},
                "finish_reason": "stop"
            }]
        });
        let (base, seen) = spawn_provider(StatusCode::OK, reply).await;
        let mut config = test_config(&base);
        config.backend = "openai".to_string();
        let p = BlogPlanner::from_config(config).unwrap();

        let outcome = p.run_topic_ideation("Technology", 2).await;
        assert_eq!(outcome.error, None);
        assert_eq!(outcome.topics, vec!["Ethics of AI", "Remote Work Trends"]);
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn provider_401_surfaces_as_error_message() {
        let (base, _) = spawn_provider(StatusCode::UNAUTHORIZED, json!({"error": "bad key"})).await;
        let p = BlogPlanner::from_config(test_config(&base)).unwrap();

        let outcome = p.run_outline_generation("t", None).await;
        assert_eq!(outcome.outline, None);
        assert!(outcome.error.unwrap().starts_with("Error code: 401"));
    }
}
