//! Environment-driven application configuration.
//!
//! Every field has a default, so an empty environment yields a working
//! configuration pointing at a local `llama-server`.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;
use url::Url;
use validator::Validate;

use crate::brain::RepetitionConfig;
use crate::error::AppError;
use crate::models::ModelConfig;
use crate::session::SessionConfig;

pub const DEFAULT_LLM_URL: &str = "http://localhost:8080";

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" | "bunyan" => Ok(LogFormat::Json),
            other => Err(AppError::Config(format!("Unknown log format: {}", other))),
        }
    }
}

/// Connection settings for the text-generation server.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LlmConfig {
    /// Base URL of the `llama-server`, without trailing slash.
    pub server_url: String,
    /// Bearer token sent with every request, if set.
    #[serde(skip_serializing)]
    pub auth_token: Option<String>,
    /// Per-request timeout in seconds.
    #[validate(range(min = 1, max = 600))]
    pub request_timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_LLM_URL.to_string(),
            auth_token: None,
            request_timeout_secs: 120,
        }
    }
}

impl LlmConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    #[validate(nested)]
    pub llm: LlmConfig,
    #[validate(nested)]
    pub model: ModelConfig,
    #[validate(nested)]
    pub repetition: RepetitionConfig,
    #[validate(nested)]
    pub session: SessionConfig,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Build the configuration from `AGRIBOT_*` variables and validate it.
    ///
    /// Does not read `.env`; the binary calls `dotenv` before this.
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = AppConfig::default();

        let config = AppConfig {
            llm: LlmConfig {
                server_url: parse_server_url(
                    env::var("AGRIBOT_LLM_URL").ok().as_deref(),
                )?,
                auth_token: env::var("LLAMA_AUTH_TOKEN")
                    .ok()
                    .filter(|token| !token.trim().is_empty()),
                request_timeout_secs: env_or(
                    "AGRIBOT_LLM_TIMEOUT_SECS",
                    defaults.llm.request_timeout_secs,
                )?,
            },
            model: ModelConfig {
                temperature: env_or("AGRIBOT_TEMPERATURE", defaults.model.temperature)?,
                max_tokens: env_or("AGRIBOT_MAX_TOKENS", defaults.model.max_tokens)?,
            },
            repetition: RepetitionConfig {
                similarity_threshold: env_or(
                    "AGRIBOT_SIMILARITY_THRESHOLD",
                    defaults.repetition.similarity_threshold,
                )?,
                min_fragment_chars: env_or(
                    "AGRIBOT_MIN_FRAGMENT_CHARS",
                    defaults.repetition.min_fragment_chars,
                )?,
                min_compare_chars: env_or(
                    "AGRIBOT_MIN_COMPARE_CHARS",
                    defaults.repetition.min_compare_chars,
                )?,
            },
            session: SessionConfig {
                max_history_messages: env_or(
                    "AGRIBOT_MAX_HISTORY",
                    defaults.session.max_history_messages,
                )?,
                max_sessions: env_or("AGRIBOT_MAX_SESSIONS", defaults.session.max_sessions)?,
            },
            log_format: env_or("AGRIBOT_LOG_FORMAT", defaults.log_format)?,
        };

        config.validate()?;
        debug!(server_url = %config.llm.server_url, "Configuration loaded");
        Ok(config)
    }
}

fn parse_server_url(raw: Option<&str>) -> Result<String, AppError> {
    let raw = match raw.map(str::trim) {
        Some(value) if !value.is_empty() => value,
        _ => DEFAULT_LLM_URL,
    };
    let url = Url::parse(raw)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::Config(format!(
            "AGRIBOT_LLM_URL must be http or https, got '{}'",
            url.scheme()
        )));
    }
    Ok(url.as_str().trim_end_matches('/').to_string())
}

fn env_or<T>(name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{}='{}': {}", name, raw, e))),
        _ => Ok(default),
    }
}
