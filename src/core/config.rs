//! Loads the process configuration from `~/.blog-planner/config.toml` and the environment.

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::{ChatOptions, ConfigError, TopicFallback};

pub const DEFAULT_API_KEY_ENV: &str = "NON_REASONING_API_KEY";
pub const DEFAULT_MODEL: &str = "openai/gpt-4-turbo";
pub const DEFAULT_NUM_TOPICS: usize = 5;
pub const DEFAULT_AUDIENCE: &str = "general readers interested in technology and innovation";
pub const MAX_NUM_TOPICS: usize = 10;

#[derive(Deserialize, Debug, Default)]
struct FileConfig {
    api_key_env: Option<String>,
    backend: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
    default_num_topics: Option<usize>,
    default_audience: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    timeout_secs: Option<u64>,
    #[serde(default)]
    topic_fallback: FallbackConfig,
}

#[derive(Deserialize, Debug, Default)]
struct FallbackConfig {
    max_chars: Option<usize>,
    sentinel: Option<String>,
}

/// Read-only settings resolved once at process start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    /// `openrouter` for the REST adapter, otherwise an `llm` backend name.
    pub backend: String,
    pub model: String,
    /// Provider endpoint override. The REST adapter falls back to OpenRouter;
    /// `llm` backends fall back to their own default endpoint.
    pub base_url: Option<String>,
    pub default_num_topics: usize,
    pub default_audience: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    pub topic_fallback: TopicFallback,
}

impl AppConfig {
    /// Loads `.env`, the config file (explicit path or the default location) and
    /// the environment. Fails if the API credential is missing.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => default_config_path().filter(|p| p.exists()),
        };
        let file = match path {
            Some(p) => toml::from_str(&fs::read_to_string(p)?)?,
            None => FileConfig::default(),
        };

        Self::resolve(file, |key| env::var(key).ok())
    }

    /// Parses a TOML document and resolves it against `lookup` instead of the process environment.
    pub fn from_toml_str(
        content: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        Self::resolve(toml::from_str(content)?, lookup)
    }

    fn resolve(
        file: FileConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let key_env = file
            .api_key_env
            .unwrap_or_else(|| DEFAULT_API_KEY_ENV.to_string());
        let api_key = lookup(&key_env).ok_or(ConfigError::MissingCredential(key_env))?;

        let default_num_topics = match lookup("DEFAULT_NUM_TOPICS") {
            Some(v) => v.trim().parse::<usize>().map_err(|_| {
                ConfigError::Invalid(format!("DEFAULT_NUM_TOPICS must be an integer, got '{}'", v))
            })?,
            None => file.default_num_topics.unwrap_or(DEFAULT_NUM_TOPICS),
        };
        if !(1..=MAX_NUM_TOPICS).contains(&default_num_topics) {
            return Err(ConfigError::Invalid(format!(
                "default number of topics must be between 1 and {}, got {}",
                MAX_NUM_TOPICS, default_num_topics
            )));
        }

        let timeout_secs = match lookup("BLOG_PLANNER_TIMEOUT_SECS") {
            Some(v) => v.trim().parse::<u64>().map_err(|_| {
                ConfigError::Invalid(format!(
                    "BLOG_PLANNER_TIMEOUT_SECS must be an integer, got '{}'",
                    v
                ))
            })?,
            None => file.timeout_secs.unwrap_or(60),
        };
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout must be at least 1 second".to_string()));
        }

        let defaults = TopicFallback::default();

        Ok(Self {
            api_key,
            backend: lookup("BLOG_PLANNER_BACKEND")
                .or(file.backend)
                .unwrap_or_else(|| "openrouter".to_string()),
            model: lookup("DEFAULT_MODEL")
                .or(file.model)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: lookup("BLOG_PLANNER_BASE_URL").or(file.base_url),
            default_num_topics,
            default_audience: lookup("DEFAULT_AUDIENCE")
                .or(file.default_audience)
                .unwrap_or_else(|| DEFAULT_AUDIENCE.to_string()),
            temperature: file.temperature.unwrap_or(0.7),
            max_tokens: file.max_tokens.unwrap_or(1500),
            timeout_secs,
            topic_fallback: TopicFallback {
                max_chars: file.topic_fallback.max_chars.unwrap_or(defaults.max_chars),
                sentinel: file.topic_fallback.sentinel.unwrap_or(defaults.sentinel),
            },
        })
    }

    /// Generation options shared by both workflows.
    pub fn chat_options(&self) -> ChatOptions {
        ChatOptions {
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stop: None,
        }
    }
}

/// `~/.blog-planner/config.toml`, if HOME is known.
pub fn default_config_path() -> Option<PathBuf> {
    let home = env::var("HOME").ok()?;
    Some(PathBuf::from(home).join(".blog-planner").join("config.toml"))
}
