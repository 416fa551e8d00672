//! Prompt templates for the topic and outline workflows.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

use super::message::ChatMessage;
use super::outline::BlogOutline;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}").expect("placeholder pattern is valid"));

const TOPIC_IDEATION_SYSTEM: &str = r#"
You are an expert blog topic ideator and content strategist. Your goal is to generate compelling, relevant, and distinct blog post titles or ideas based on a given theme.
Consider the following when generating topics:
- **Clarity:** Is the topic clear and easy to understand?
- **Interest:** Is the topic likely to be interesting to a general audience, or the specified target audience (if provided)?
- **Specificity:** Is the topic specific enough to be covered well in a single blog post, but not too narrow?
- **Uniqueness:** Does it offer a fresh angle or perspective if the theme is common?
- **SEO Potential (Implicit):** Think about topics that people might be searching for, even if keywords aren't explicitly requested yet.

Output exactly {{num_suggestions}} topic suggestions.
Each suggestion should be a single, concise title or idea.
Present the suggestions as a numbered list, with each topic on a new line. For example:
1. Topic one
2. Topic two
3. Topic three
"#;

const TOPIC_IDEATION_HUMAN: &str = r#"
Theme: {{theme}}
Number of suggestions to generate: {{num_suggestions}}
"#;

const OUTLINE_GENERATION_SYSTEM: &str = r#"
You are an expert content planner and blog outliner. Your task is to create a comprehensive and well-structured blog post outline for the given topic and target audience.
The outline should be practical and provide a clear roadmap for writing the actual blog post.

Your output MUST be a valid JSON object that strictly adheres to the following schema:
{{format_instructions}}

Consider these elements for a strong outline:
- **Catchy Title Suggestion:** A compelling title that grabs attention.
- **Engaging Introduction Hook:** A brief idea (1-2 sentences) on how to start the post to captivate the reader.
- **Logical Sections:** Break down the topic into 2-5 main sections, each with a clear heading (e.g., H2 or H3).
- **Key Points per Section:** For each section, list 2-4 key bullet points or sub-topics that should be covered. These should be actionable or informative.
- **Insightful Conclusion Summary:** A brief idea (1-2 sentences) on how to summarize the key takeaways and conclude the post.
- **Relevant Call to Action (Optional):** If appropriate for the topic, suggest a CTA (e.g., "Share your thoughts," "Try this out," "Learn more here").

Ensure the JSON output is complete and correctly formatted.
"#;

const OUTLINE_GENERATION_HUMAN: &str = r#"
Blog Post Topic: {{topic}}
Target Audience: {{audience}}
"#;

/// A system + user template pair with `{{name}}` placeholders.
#[derive(Debug, Clone, Copy)]
pub struct PromptTemplate {
    pub system: &'static str,
    pub human: &'static str,
}

/// Prompts for brainstorming topic ideas. Slots: `theme`, `num_suggestions`.
pub const TOPIC_IDEATION: PromptTemplate = PromptTemplate {
    system: TOPIC_IDEATION_SYSTEM,
    human: TOPIC_IDEATION_HUMAN,
};

/// Prompts for outlining a post. Slots: `format_instructions`, `topic`, `audience`.
pub const OUTLINE_GENERATION: PromptTemplate = PromptTemplate {
    system: OUTLINE_GENERATION_SYSTEM,
    human: OUTLINE_GENERATION_HUMAN,
};

impl PromptTemplate {
    /// Substitutes the variables into both templates and wraps them as messages.
    pub fn render(&self, vars: &HashMap<&str, String>) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(render_template(self.system, vars)),
            ChatMessage::user(render_template(self.human, vars)),
        ]
    }
}

/// Messages asking for `num_suggestions` topic ideas on `theme`.
pub fn topic_messages(theme: &str, num_suggestions: usize) -> Vec<ChatMessage> {
    let vars = HashMap::from([
        ("theme", theme.to_string()),
        ("num_suggestions", num_suggestions.to_string()),
    ]);
    TOPIC_IDEATION.render(&vars)
}

/// Messages asking for an outline of `topic` aimed at `audience`.
pub fn outline_messages(topic: &str, audience: &str) -> Vec<ChatMessage> {
    let vars = HashMap::from([
        ("format_instructions", BlogOutline::format_instructions()),
        ("topic", topic.to_string()),
        ("audience", audience.to_string()),
    ]);
    OUTLINE_GENERATION.render(&vars)
}

/// Renders a template string with the given variables. Unknown slots become empty.
pub fn render_template(template: &str, vars: &HashMap<&str, String>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures| {
            vars.get(&caps[1]).map(String::as_str).unwrap_or("").to_string()
        })
        .into_owned()
}
