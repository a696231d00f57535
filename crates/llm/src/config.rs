//! Provider configuration loaded from the environment.

use std::str::FromStr;
use std::time::Duration;

use application::{ApplicationError, ApplicationResult};

pub const DEFAULT_CLAUDE_MODEL: &str = "claude-3-5-haiku-latest";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 1536;

const DEFAULT_MAX_TOKENS: u32 = 4096;
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for the Claude completion provider.
#[derive(Debug, Clone)]
pub struct ClaudeConfig {
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
    /// Overrides the production endpoint, used by tests.
    pub base_url: Option<String>,
}

impl ClaudeConfig {
    pub fn from_env() -> ApplicationResult<Self> {
        let api_key = required_var("CLAUDE_API_KEY")?;
        Ok(Self {
            api_key,
            model: string_var("CLAUDE_MODEL", DEFAULT_CLAUDE_MODEL),
            max_tokens: numeric_var("CLAUDE_MAX_TOKENS", DEFAULT_MAX_TOKENS)?,
            temperature: numeric_var("CLAUDE_TEMPERATURE", DEFAULT_TEMPERATURE)?,
            timeout: Duration::from_secs(numeric_var(
                "CLAUDE_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )?),
            base_url: None,
        })
    }
}

/// Settings for the OpenAI embedding provider.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub dimensions: usize,
    pub timeout: Duration,
    /// Overrides the production endpoint, used by tests.
    pub base_url: Option<String>,
}

impl OpenAiConfig {
    pub fn from_env() -> ApplicationResult<Self> {
        let api_key = required_var("OPENAI_API_KEY")?;
        Ok(Self {
            api_key,
            model: string_var("OPENAI_EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL),
            dimensions: numeric_var("OPENAI_EMBEDDING_DIMENSIONS", DEFAULT_EMBEDDING_DIMENSIONS)?,
            timeout: Duration::from_secs(numeric_var(
                "OPENAI_API_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )?),
            base_url: None,
        })
    }
}

fn required_var(key: &str) -> ApplicationResult<String> {
    match std::env::var(key) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ApplicationError::configuration(format!("{key} is not set"))),
    }
}

fn string_var(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn numeric_var<T: FromStr + Copy>(key: &str, default: T) -> ApplicationResult<T> {
    match std::env::var(key) {
        Ok(raw) => raw.parse().map_err(|_| {
            ApplicationError::configuration(format!("{key} has an invalid value: {raw}"))
        }),
        Err(_) => Ok(default),
    }
}
