//! Role-tagged chat messages exchanged with a chat client.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::ClientError;

/// The author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    /// The role tag used on the wire by chat-completions providers.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChatRole {
    type Err = ClientError;

    /// Accepts provider role tags as well as the `human`/`ai` message type names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(ChatRole::System),
            "user" | "human" => Ok(ChatRole::User),
            "assistant" | "ai" => Ok(ChatRole::Assistant),
            other => Err(ClientError::UnsupportedMessageFormat(format!(
                "Unknown message type: {}",
                other
            ))),
        }
    }
}

/// A single message in a chat request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

impl TryFrom<&serde_json::Value> for ChatMessage {
    type Error = ClientError;

    /// Builds a message from an untyped JSON object carrying `content` and
    /// either `role` or `type`.
    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        let unsupported = || ClientError::UnsupportedMessageFormat(value.to_string());

        let obj = value.as_object().ok_or_else(unsupported)?;
        let tag = obj
            .get("role")
            .or_else(|| obj.get("type"))
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                ClientError::UnsupportedMessageFormat(format!(
                    "Message missing required keys: {}",
                    value
                ))
            })?;
        let content = obj
            .get("content")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                ClientError::UnsupportedMessageFormat(format!(
                    "Message missing required keys: {}",
                    value
                ))
            })?;

        Ok(Self {
            role: tag.parse()?,
            content: content.to_string(),
        })
    }
}
