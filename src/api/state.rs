//! State threaded through the workflow nodes.
//!
//! Inputs are fixed at construction. Outputs are written by the nodes: the
//! generate node sets either the output or `error_message`, the format node
//! may add an `error_message` while keeping the output.

use serde::Serialize;

use super::outline::BlogOutline;

/// State of the topic ideation workflow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicIdeationState {
    original_theme: String,
    num_suggestions: usize,
    generated_topics: Option<Vec<String>>,
    error_message: Option<String>,
}

impl TopicIdeationState {
    pub fn new(theme: impl Into<String>, num_suggestions: usize) -> Self {
        Self {
            original_theme: theme.into(),
            num_suggestions,
            generated_topics: None,
            error_message: None,
        }
    }

    pub fn original_theme(&self) -> &str {
        &self.original_theme
    }

    pub fn num_suggestions(&self) -> usize {
        self.num_suggestions
    }

    pub fn generated_topics(&self) -> Option<&[String]> {
        self.generated_topics.as_deref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub(crate) fn succeed(&mut self, topics: Vec<String>) {
        self.generated_topics = Some(topics);
        self.error_message = None;
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.generated_topics = None;
        self.error_message = Some(message);
    }

    pub(crate) fn topics_mut(&mut self) -> Option<&mut Vec<String>> {
        self.generated_topics.as_mut()
    }

    /// Splits the final state into its output and error.
    pub fn into_parts(self) -> (Option<Vec<String>>, Option<String>) {
        (self.generated_topics, self.error_message)
    }
}

/// State of the outline generation workflow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlineGenerationState {
    selected_topic: String,
    target_audience: String,
    generated_outline: Option<BlogOutline>,
    error_message: Option<String>,
}

impl OutlineGenerationState {
    pub fn new(topic: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            selected_topic: topic.into(),
            target_audience: audience.into(),
            generated_outline: None,
            error_message: None,
        }
    }

    pub fn selected_topic(&self) -> &str {
        &self.selected_topic
    }

    pub fn target_audience(&self) -> &str {
        &self.target_audience
    }

    pub fn generated_outline(&self) -> Option<&BlogOutline> {
        self.generated_outline.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub(crate) fn succeed(&mut self, outline: BlogOutline) {
        self.generated_outline = Some(outline);
        self.error_message = None;
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.generated_outline = None;
        self.error_message = Some(message);
    }

    /// Records a validation failure without dropping the outline.
    pub(crate) fn flag(&mut self, message: String) {
        self.error_message = Some(message);
    }

    pub fn into_parts(self) -> (Option<BlogOutline>, Option<String>) {
        (self.generated_outline, self.error_message)
    }
}
