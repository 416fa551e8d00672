//! The structured blog outline produced by the outline workflow.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

use super::error::ValidationError;

/// Represents a section in the blog post outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OutlineSection {
    /// The heading for this section (e.g., H2, H3)
    pub heading: String,
    /// Bullet points or key ideas for this section
    pub key_points: Vec<String>,
}

/// Represents the complete blog post outline structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BlogOutline {
    /// A catchy title for the blog post
    pub title_suggestion: String,
    /// A brief idea for an engaging introduction
    pub introduction_hook: String,
    /// The main sections of the blog post
    pub sections: Vec<OutlineSection>,
    /// A brief idea for the conclusion
    pub conclusion_summary: String,
    /// A suggested call to action, if applicable
    #[serde(default)]
    pub call_to_action: Option<String>,
}

impl BlogOutline {
    /// JSON schema of the outline, without the root `$schema`/`title` noise.
    pub fn json_schema() -> serde_json::Value {
        let schema = schemars::schema_for!(BlogOutline);
        let mut value = serde_json::to_value(&schema).unwrap_or_default();
        if let Some(obj) = value.as_object_mut() {
            obj.remove("$schema");
            obj.remove("title");
        }
        value
    }

    /// Instructions telling a model how to shape its reply, generated from [`Self::json_schema`].
    pub fn format_instructions() -> String {
        let schema = Self::json_schema().to_string();
        let mut out = String::new();
        out.push_str(
            "The output should be formatted as a JSON instance that conforms to the JSON schema below.\n\n",
        );
        out.push_str(
            "As an example, for the schema {\"properties\": {\"foo\": {\"description\": \"a list of strings\", \"type\": \"array\", \"items\": {\"type\": \"string\"}}}, \"required\": [\"foo\"]}\n",
        );
        out.push_str(
            "the object {\"foo\": [\"bar\", \"baz\"]} is a well-formatted instance of the schema. The object {\"properties\": {\"foo\": [\"bar\", \"baz\"]}} is not well-formatted.\n\n",
        );
        let _ = write!(out, "Here is the output schema:\n```\n{}\n```", schema);
        out
    }

    /// Structural check applied while parsing: at least one section.
    pub fn validate_structure(&self) -> Result<(), ValidationError> {
        if self.sections.is_empty() {
            return Err(ValidationError::NoSections);
        }
        Ok(())
    }

    /// Full schema check: structure plus non-blank text fields and key points in every section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.validate_structure()?;

        for (name, value) in [
            ("title_suggestion", &self.title_suggestion),
            ("introduction_hook", &self.introduction_hook),
            ("conclusion_summary", &self.conclusion_summary),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::EmptyField(name.to_string()));
            }
        }

        for (i, section) in self.sections.iter().enumerate() {
            if section.heading.trim().is_empty() {
                return Err(ValidationError::EmptyField(format!("sections[{}].heading", i)));
            }
            if section.key_points.is_empty() {
                return Err(ValidationError::NoKeyPoints(i));
            }
        }
        Ok(())
    }

    /// Renders the outline as a Markdown document.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();
        let _ = write!(md, "# {}\n\n", self.title_suggestion);
        let _ = write!(md, "## Introduction\n{}\n\n", self.introduction_hook);

        for section in &self.sections {
            let _ = writeln!(md, "## {}", section.heading);
            for point in &section.key_points {
                let _ = writeln!(md, "- {}", point);
            }
            md.push('\n');
        }

        let _ = write!(md, "## Conclusion\n{}\n\n", self.conclusion_summary);

        if let Some(cta) = self.call_to_action.as_deref().filter(|c| !c.is_empty()) {
            let _ = writeln!(md, "### Call to Action\n{}", cta);
        }
        md
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample() -> BlogOutline {
        BlogOutline {
            title_suggestion: "Ethics of AI".to_string(),
            introduction_hook: "Who is responsible when a model errs?".to_string(),
            sections: vec![
                OutlineSection {
                    heading: "Bias".to_string(),
                    key_points: vec!["Data".to_string(), "Evaluation".to_string()],
                },
                OutlineSection {
                    heading: "Accountability".to_string(),
                    key_points: vec!["Audits".to_string()],
                },
            ],
            conclusion_summary: "Ethics is a practice.".to_string(),
            call_to_action: Some("Share your thoughts".to_string()),
        }
    }

    #[test]
    fn schema_lists_required_fields() {
        let schema = BlogOutline::json_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        for field in ["title_suggestion", "introduction_hook", "sections", "conclusion_summary"] {
            assert!(required.contains(&field), "{} should be required", field);
        }
        assert!(!required.contains(&"call_to_action"));
        assert!(schema.get("$schema").is_none());
    }

    #[test]
    fn format_instructions_embed_schema() {
        let text = BlogOutline::format_instructions();
        assert!(text.contains("Here is the output schema:"));
        assert!(text.contains("key_points"));
        assert!(text.contains("A catchy title for the blog post"));
    }

    #[test]
    fn validate_accepts_sample() {
        assert_eq!(sample().validate(), Ok(()));
    }

    #[test]
    fn validate_flags_semantic_problems() {
        let mut o = sample();
        o.sections[1].key_points.clear();
        assert_eq!(o.validate(), Err(ValidationError::NoKeyPoints(1)));
        assert_eq!(o.validate_structure(), Ok(()));

        let mut o = sample();
        o.title_suggestion = "  ".to_string();
        assert_eq!(
            o.validate(),
            Err(ValidationError::EmptyField("title_suggestion".to_string()))
        );

        let mut o = sample();
        o.sections.clear();
        assert_eq!(o.validate_structure(), Err(ValidationError::NoSections));
    }

    #[test]
    fn markdown_rendering() {
        let md = sample().to_markdown();
        assert!(md.starts_with("# Ethics of AI\n\n## Introduction\nWho is responsible"));
        assert!(md.contains("## Bias\n- Data\n- Evaluation\n\n"));
        assert!(md.contains("## Conclusion\nEthics is a practice.\n\n"));
        assert!(md.ends_with("### Call to Action\nShare your thoughts\n"));

        let mut o = sample();
        o.call_to_action = None;
        assert!(!o.to_markdown().contains("Call to Action"));
    }

    #[test]
    fn json_round_trip() {
        let o = sample();
        let text = serde_json::to_string(&o).unwrap();
        assert_eq!(serde_json::from_str::<BlogOutline>(&text).unwrap(), o);
    }
}
