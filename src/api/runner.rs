//! Fluent runners for the topic and outline workflows.

use super::planner::BlogPlanner;
use super::{OutlineOutcome, TopicOutcome};

/// A fluent builder to configure and execute topic ideation.
pub struct TopicRunner<'a> {
    planner: &'a BlogPlanner,
    theme: &'a str,
    count: Option<usize>,
}

impl<'a> TopicRunner<'a> {
    pub(crate) fn new(planner: &'a BlogPlanner, theme: &'a str) -> Self {
        Self {
            planner,
            theme,
            count: None,
        }
    }

    /// Sets how many topics to request.
    /// If not set, the configured default is used.
    pub fn count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    pub async fn run(self) -> TopicOutcome {
        let count = self
            .count
            .unwrap_or(self.planner.config().default_num_topics);
        self.planner.run_topic_ideation(self.theme, count).await
    }
}

/// A fluent builder to configure and execute outline generation.
pub struct OutlineRunner<'a> {
    planner: &'a BlogPlanner,
    topic: &'a str,
    audience: Option<&'a str>,
}

impl<'a> OutlineRunner<'a> {
    pub(crate) fn new(planner: &'a BlogPlanner, topic: &'a str) -> Self {
        Self {
            planner,
            topic,
            audience: None,
        }
    }

    /// Sets the target audience described to the model.
    pub fn audience(mut self, audience: &'a str) -> Self {
        self.audience = Some(audience);
        self
    }

    pub async fn run(self) -> OutlineOutcome {
        self.planner
            .run_outline_generation(self.topic, self.audience)
            .await
    }
}
