//! Error types for the library API.

use llm::error::LLMError;
use thiserror::Error;

/// Errors raised while resolving the process configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The API credential is absent. Fatal, reported before any workflow runs.
    #[error("API key environment variable '{0}' is not set. Please set it in your .env file or environment variables.")]
    MissingCredential(String),

    /// A configuration value is out of range or malformed.
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// The configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid TOML.
    #[error("Failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Errors produced by a chat client while talking to the remote provider.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The client was built with an unusable configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A message could not be mapped to a provider role. Detected before any network call.
    #[error("Unsupported message format: {0}")]
    UnsupportedMessageFormat(String),

    /// The provider answered with a non-success status.
    #[error("Error code: {status} - {body}")]
    UpstreamApi { status: u16, body: String },

    /// The request never produced an HTTP response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// No response arrived within the configured bound.
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// The provider answered 2xx but the body lacks `choices[0].message`.
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    /// An error surfaced by the `llm` crate backend.
    #[error("LLM backend error: {0}")]
    Llm(String),
}

impl From<LLMError> for ClientError {
    fn from(err: LLMError) -> Self {
        ClientError::Llm(err.to_string())
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

/// Errors from turning model text into structured data.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The outline reply was not valid JSON or did not match the outline schema.
    #[error("Failed to parse outline: {reason}")]
    Outline { reason: String, raw: String },
}

impl ParseError {
    /// The raw model text that failed to parse.
    pub fn raw(&self) -> &str {
        match self {
            ParseError::Outline { raw, .. } => raw,
        }
    }
}

/// A decoded outline that violates the outline schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("field '{0}' must not be empty")]
    EmptyField(String),

    #[error("outline must contain at least one section")]
    NoSections,

    #[error("section {0} has no key points")]
    NoKeyPoints(usize),
}

/// A comprehensive error type for failures outside a workflow boundary.
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Outline structure invalid: {0}")]
    Validation(#[from] ValidationError),
}
