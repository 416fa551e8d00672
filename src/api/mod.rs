//! High-level API for running the topic ideation and outline generation workflows.

mod client;
mod error;
mod llm_bridge;
mod message;
mod outline;
mod parser;
mod planner;
mod prompts;
mod runner;
mod state;
mod workflow;

use serde::Serialize;

pub use client::{ChatClient, ChatOptions, OpenRouterClient, DEFAULT_BASE_URL};
pub use error::{ClientError, ConfigError, ParseError, PlannerError, ValidationError};
pub use llm_bridge::LlmBridgeClient;
pub use message::{ChatMessage, ChatRole};
pub use outline::{BlogOutline, OutlineSection};
pub use parser::{parse_outline, parse_topics, TopicFallback};
pub use planner::BlogPlanner;
pub use prompts::{outline_messages, render_template, topic_messages, PromptTemplate};
pub use runner::{OutlineRunner, TopicRunner};
pub use state::{OutlineGenerationState, TopicIdeationState};
pub use workflow::{
    outline_generation_workflow, topic_ideation_workflow, BrainstormTopics, FormatOutline,
    FormatTopics, GenerateOutline, Node, Workflow,
};

/// Result of a topic ideation run. `topics` is empty when `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicOutcome {
    pub topics: Vec<String>,
    pub error: Option<String>,
}

/// Result of an outline generation run. Check `error` first: a validation
/// failure keeps the outline that failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlineOutcome {
    pub outline: Option<BlogOutline>,
    pub error: Option<String>,
}
