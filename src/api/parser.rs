//! Turns raw model replies into topic lists and validated outlines.

use tracing::warn;

use super::error::ParseError;
use super::outline::BlogOutline;

pub(super) const MAX_RAW_LOG_CHARS: usize = 2_000;

/// What topic parsing returns when no line of a non-empty reply could be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicFallback {
    /// Replies shorter than this many characters are returned whole as one topic.
    pub max_chars: usize,
    /// Placeholder returned for longer replies.
    pub sentinel: String,
}

impl Default for TopicFallback {
    fn default() -> Self {
        Self {
            max_chars: 200,
            sentinel: "Could not parse topics, see logs.".to_string(),
        }
    }
}

/// Extracts up to `limit` topics from a model reply.
///
/// Lines are trimmed and blank lines skipped; a leading `<digits>.` prefix is
/// stripped. Unnumbered lines count as topics too. Never fails.
pub fn parse_topics(raw: &str, limit: usize, fallback: &TopicFallback) -> Vec<String> {
    let topics: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(strip_numbering)
        .take(limit)
        .collect();

    if !topics.is_empty() || raw.is_empty() {
        return topics;
    }

    warn!(
        raw = %truncate_for_log(raw, MAX_RAW_LOG_CHARS),
        "could not parse topics as expected"
    );
    if raw.chars().count() < fallback.max_chars {
        vec![raw.to_string()]
    } else {
        vec![fallback.sentinel.clone()]
    }
}

fn strip_numbering(line: &str) -> String {
    match line.split_once('.') {
        Some((prefix, rest)) if !prefix.is_empty() && prefix.bytes().all(|b| b.is_ascii_digit()) => {
            rest.trim().to_string()
        }
        _ => line.to_string(),
    }
}

/// Strictly decodes an outline reply and checks it against the outline schema.
///
/// A reply wrapped in a single Markdown code fence is unwrapped first. There is
/// no partial recovery: anything else that is not a complete outline object fails.
pub fn parse_outline(raw: &str) -> Result<BlogOutline, ParseError> {
    let fail = |reason: String| ParseError::Outline {
        reason,
        raw: raw.to_string(),
    };

    let body = strip_code_fence(raw);
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| fail(format!("invalid JSON: {}", e)))?;
    if !value.is_object() {
        return Err(fail("expected a JSON object".to_string()));
    }

    let outline: BlogOutline = serde_json::from_value(value)
        .map_err(|e| fail(format!("does not match outline schema: {}", e)))?;
    outline
        .validate_structure()
        .map_err(|e| fail(format!("does not match outline schema: {}", e)))?;

    Ok(outline)
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed
        .strip_prefix("```")
        .and_then(|rest| rest.strip_suffix("```"))
    else {
        return trimmed;
    };
    match inner.split_once('\n') {
        Some((lang, body)) if !lang.contains('{') => body.trim(),
        _ => inner.trim(),
    }
}

pub(crate) fn truncate_for_log(input: &str, max_chars: usize) -> String {
    let char_count = input.chars().count();
    if char_count <= max_chars {
        return input.to_string();
    }
    let mut preview: String = input.chars().take(max_chars).collect();
    preview.push_str(&format!("... [truncated, total_chars={}]", char_count));
    preview
}
