//! Two-node workflows: generate, then format/validate.
//!
//! Nodes never return errors. Whatever fails inside a node is written to the
//! state's `error_message`, so [`Workflow::invoke`] always hands back a
//! completed state.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use super::client::{ChatClient, ChatOptions};
use super::error::PlannerError;
use super::outline::BlogOutline;
use super::parser::{parse_outline, parse_topics, truncate_for_log, TopicFallback, MAX_RAW_LOG_CHARS};
use super::prompts::{outline_messages, topic_messages};
use super::state::{OutlineGenerationState, TopicIdeationState};

/// A single step of a workflow.
#[async_trait]
pub trait Node<S>: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(&self, state: &mut S);
}

/// A fixed, linear sequence of nodes run once each, in order.
pub struct Workflow<S> {
    name: &'static str,
    nodes: Vec<Box<dyn Node<S>>>,
}

impl<S: Send> Workflow<S> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            nodes: Vec::new(),
        }
    }

    /// Appends a node after the current last node.
    pub fn node(mut self, node: impl Node<S> + 'static) -> Self {
        self.nodes.push(Box::new(node));
        self
    }

    pub fn node_names(&self) -> Vec<&'static str> {
        self.nodes.iter().map(|n| n.name()).collect()
    }

    /// Runs every node against `state` and returns the terminal state.
    pub async fn invoke(&self, mut state: S) -> S {
        for node in &self.nodes {
            info!(workflow = self.name, node = node.name(), "entering node");
            node.run(&mut state).await;
        }
        state
    }
}

/// Asks the model for topic ideas and parses its numbered list.
pub struct BrainstormTopics {
    client: Arc<dyn ChatClient>,
    options: ChatOptions,
    fallback: TopicFallback,
}

impl BrainstormTopics {
    async fn generate(&self, state: &TopicIdeationState) -> Result<Vec<String>, PlannerError> {
        let messages = topic_messages(state.original_theme(), state.num_suggestions());
        let reply = self.client.send(&messages, &self.options).await?;
        Ok(parse_topics(&reply, state.num_suggestions(), &self.fallback))
    }
}

#[async_trait]
impl Node<TopicIdeationState> for BrainstormTopics {
    fn name(&self) -> &'static str {
        "brainstorm_topics"
    }

    async fn run(&self, state: &mut TopicIdeationState) {
        match self.generate(state).await {
            Ok(topics) => state.succeed(topics),
            Err(e) => {
                warn!(error = %e, "topic brainstorming failed");
                state.fail(e.to_string());
            }
        }
    }
}

/// Drops blank topics. No-op when brainstorming failed.
pub struct FormatTopics;

#[async_trait]
impl Node<TopicIdeationState> for FormatTopics {
    fn name(&self) -> &'static str {
        "format_topics"
    }

    async fn run(&self, state: &mut TopicIdeationState) {
        if let Some(topics) = state.topics_mut() {
            topics.retain(|t| !t.trim().is_empty());
        }
    }
}

/// Asks the model for a JSON outline and decodes it.
pub struct GenerateOutline {
    client: Arc<dyn ChatClient>,
    options: ChatOptions,
}

impl GenerateOutline {
    async fn generate(&self, state: &OutlineGenerationState) -> Result<BlogOutline, PlannerError> {
        let messages = outline_messages(state.selected_topic(), state.target_audience());
        let reply = self.client.send(&messages, &self.options).await?;
        parse_outline(&reply).map_err(|e| {
            warn!(
                raw = %truncate_for_log(e.raw(), MAX_RAW_LOG_CHARS),
                "model output did not conform to the outline schema"
            );
            PlannerError::from(e)
        })
    }
}

#[async_trait]
impl Node<OutlineGenerationState> for GenerateOutline {
    fn name(&self) -> &'static str {
        "generate_outline"
    }

    async fn run(&self, state: &mut OutlineGenerationState) {
        match self.generate(state).await {
            Ok(outline) => state.succeed(outline),
            Err(e) => {
                warn!(error = %e, "outline generation failed");
                state.fail(e.to_string());
            }
        }
    }
}

/// Re-validates the decoded outline. Keeps the outline when flagging an error.
pub struct FormatOutline;

#[async_trait]
impl Node<OutlineGenerationState> for FormatOutline {
    fn name(&self) -> &'static str {
        "format_outline"
    }

    async fn run(&self, state: &mut OutlineGenerationState) {
        let Some(outline) = state.generated_outline() else {
            return;
        };
        if let Err(e) = outline.validate() {
            warn!(error = %e, "outline failed validation");
            state.flag(PlannerError::from(e).to_string());
        }
    }
}

/// `brainstorm_topics -> format_topics`
pub fn topic_ideation_workflow(
    client: Arc<dyn ChatClient>,
    options: ChatOptions,
    fallback: TopicFallback,
) -> Workflow<TopicIdeationState> {
    Workflow::new("topic_ideation")
        .node(BrainstormTopics {
            client,
            options,
            fallback,
        })
        .node(FormatTopics)
}

/// `generate_outline -> format_outline`
pub fn outline_generation_workflow(
    client: Arc<dyn ChatClient>,
    options: ChatOptions,
) -> Workflow<OutlineGenerationState> {
    Workflow::new("outline_generation")
        .node(GenerateOutline { client, options })
        .node(FormatOutline)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::error::ClientError;
    use crate::api::message::ChatMessage;
    use crate::api::outline::tests::sample;
    use std::sync::Mutex;

    /// Replays canned replies and records every request it receives.
    pub(crate) struct ScriptedClient {
        replies: Mutex<Vec<Result<String, ClientError>>>,
        pub(crate) seen: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl ScriptedClient {
        pub(crate) fn new(replies: Vec<Result<String, ClientError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies),
                seen: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn reply(text: &str) -> Arc<Self> {
            Self::new(vec![Ok(text.to_string())])
        }
    }

    #[async_trait]
    impl ChatClient for ScriptedClient {
        async fn send(
            &self,
            messages: &[ChatMessage],
            _options: &ChatOptions,
        ) -> Result<String, ClientError> {
            self.seen.lock().unwrap().push(messages.to_vec());
            let mut replies = self.replies.lock().unwrap();
            if replies.is_empty() {
                return Err(ClientError::Transport("no scripted reply left".to_string()));
            }
            replies.remove(0)
        }
    }

    pub(crate) fn options() -> ChatOptions {
        ChatOptions {
            model: "test/model".to_string(),
            temperature: 0.7,
            max_tokens: 1500,
            stop: None,
        }
    }

    fn topics_flow(client: Arc<ScriptedClient>) -> Workflow<TopicIdeationState> {
        topic_ideation_workflow(client, options(), TopicFallback::default())
    }

    #[tokio::test]
    async fn nodes_run_in_declared_order() {
        let flow = topics_flow(ScriptedClient::reply(""));
        assert_eq!(flow.node_names(), vec!["brainstorm_topics", "format_topics"]);
        let flow = outline_generation_workflow(ScriptedClient::reply(""), options());
        assert_eq!(flow.node_names(), vec!["generate_outline", "format_outline"]);
    }

    #[tokio::test]
    async fn topic_workflow_parses_reply() {
        let client = ScriptedClient::reply("1. Ethics of AI\n2. Remote Work Trends\n3. Extra");
        let state = topics_flow(client.clone())
            .invoke(TopicIdeationState::new("Tech", 2))
            .await;

        assert_eq!(
            state.generated_topics().unwrap(),
            ["Ethics of AI", "Remote Work Trends"]
        );
        assert_eq!(state.error_message(), None);
        assert_eq!(state.original_theme(), "Tech");

        let seen = client.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0][0].content.contains("Output exactly 2 topic suggestions."));
    }

    #[tokio::test]
    async fn topic_workflow_captures_upstream_error() {
        let client = ScriptedClient::new(vec![Err(ClientError::UpstreamApi {
            status: 401,
            body: "{\"error\":\"unauthorized\"}".to_string(),
        })]);
        let state = topics_flow(client).invoke(TopicIdeationState::new("Tech", 3)).await;

        assert_eq!(state.generated_topics(), None);
        let msg = state.error_message().unwrap();
        assert!(msg.contains("401"), "{}", msg);
    }

    #[tokio::test]
    async fn format_topics_drops_blank_entries() {
        let client = ScriptedClient::reply("1.\n2. Kept\n3.   ");
        let state = topics_flow(client).invoke(TopicIdeationState::new("T", 5)).await;
        assert_eq!(state.generated_topics().unwrap(), ["Kept"]);
    }

    #[tokio::test]
    async fn outline_workflow_decodes_reply() {
        let raw = serde_json::to_string(&sample()).unwrap();
        let client = ScriptedClient::reply(&raw);
        let state = outline_generation_workflow(client.clone(), options())
            .invoke(OutlineGenerationState::new("Ethics of AI", "writers"))
            .await;

        assert_eq!(state.generated_outline(), Some(&sample()));
        assert_eq!(state.error_message(), None);
        assert!(client.seen.lock().unwrap()[0][1]
            .content
            .contains("Target Audience: writers"));
    }

    #[tokio::test]
    async fn outline_workflow_reports_parse_error() {
        let client = ScriptedClient::reply("not json at all");
        let state = outline_generation_workflow(client, options())
            .invoke(OutlineGenerationState::new("t", "a"))
            .await;

        assert_eq!(state.generated_outline(), None);
        assert!(state.error_message().unwrap().starts_with("Failed to parse outline"));
    }

    #[tokio::test]
    async fn format_outline_flags_but_keeps_outline() {
        let mut outline = sample();
        outline.sections[0].key_points.clear();
        let client = ScriptedClient::reply(&serde_json::to_string(&outline).unwrap());
        let state = outline_generation_workflow(client, options())
            .invoke(OutlineGenerationState::new("t", "a"))
            .await;

        assert_eq!(state.generated_outline(), Some(&outline));
        assert_eq!(
            state.error_message(),
            Some("Outline structure invalid: section 0 has no key points")
        );
    }

    #[tokio::test]
    async fn format_nodes_are_noops_after_failure() {
        let mut state = OutlineGenerationState::new("t", "a");
        state.fail("boom".to_string());
        let before = state.clone();
        FormatOutline.run(&mut state).await;
        assert_eq!(state, before);

        let mut state = TopicIdeationState::new("t", 1);
        state.fail("boom".to_string());
        let before = state.clone();
        FormatTopics.run(&mut state).await;
        assert_eq!(state, before);
    }
}
