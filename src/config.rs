use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434/api/generate";
const DEFAULT_OLLAMA_MODEL: &str = "qwen:7b-chat";
const DEFAULT_TIMEOUT_SECONDS: f64 = 120.0;
const DEFAULT_TEMPERATURE: f32 = 0.2;
const DEFAULT_MAX_RETRIES: usize = 2;
const DEFAULT_BACKOFF_SECONDS: f64 = 0.3;
const DEFAULT_POOL_SIZE: usize = 10;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_MAX_PROMPT_CHARS: usize = 12_000;
const DEFAULT_NUM_PREDICT: u32 = 500;
const DEFAULT_SUMMARY_LANGUAGE: &str = "Chinese";
const DEFAULT_SUMMARY_MAX_CHARS: usize = 300;
const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
const DEFAULT_SERVER_PORT: u16 = 8000;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the summary service.
///
/// Built once at startup and shared read-only (behind an `Arc`) by the pipeline, the
/// HTTP router and the CLI.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Full URL of the Ollama generation endpoint.
    pub ollama_url: String,
    /// Model identifier sent with every generation request.
    pub ollama_model: String,
    /// Per-attempt wall-clock timeout covering connect and read.
    pub ollama_timeout: Duration,
    /// Sampling temperature passed in the generation options.
    pub ollama_temperature: f32,
    /// Retry budget for a single logical backend call.
    pub ollama_max_retries: usize,
    /// Backoff factor applied between retries.
    pub ollama_backoff: Duration,
    /// Maximum idle pooled connections kept for the backend host.
    pub ollama_pool_size: usize,
    /// Largest accepted upload, in bytes.
    pub max_upload_bytes: usize,
    /// Largest document text embedded into a prompt, in characters.
    pub max_prompt_chars: usize,
    /// Maximum number of tokens the model may generate.
    pub summary_num_predict: u32,
    /// Language the summary is requested in.
    pub summary_language: String,
    /// Length bound stated in the prompt, in characters.
    pub summary_max_chars: usize,
    /// Address the HTTP server binds to.
    pub server_host: String,
    /// Port the HTTP server binds to.
    pub server_port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            ollama_model: DEFAULT_OLLAMA_MODEL.to_string(),
            ollama_timeout: Duration::from_secs_f64(DEFAULT_TIMEOUT_SECONDS),
            ollama_temperature: DEFAULT_TEMPERATURE,
            ollama_max_retries: DEFAULT_MAX_RETRIES,
            ollama_backoff: Duration::from_secs_f64(DEFAULT_BACKOFF_SECONDS),
            ollama_pool_size: DEFAULT_POOL_SIZE,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_prompt_chars: DEFAULT_MAX_PROMPT_CHARS,
            summary_num_predict: DEFAULT_NUM_PREDICT,
            summary_language: DEFAULT_SUMMARY_LANGUAGE.to_string(),
            summary_max_chars: DEFAULT_SUMMARY_MAX_CHARS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    ///
    /// Unset or blank variables fall back to their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            ollama_url: load_env_optional("OLLAMA_URL").unwrap_or(defaults.ollama_url),
            ollama_model: load_env_optional("OLLAMA_MODEL").unwrap_or(defaults.ollama_model),
            ollama_timeout: load_seconds("OLLAMA_TIMEOUT_SECONDS", defaults.ollama_timeout)?,
            ollama_temperature: load_parsed("OLLAMA_TEMPERATURE", defaults.ollama_temperature)?,
            ollama_max_retries: load_parsed("OLLAMA_MAX_RETRIES", defaults.ollama_max_retries)?,
            ollama_backoff: load_backoff("OLLAMA_BACKOFF_SECONDS", defaults.ollama_backoff)?,
            ollama_pool_size: load_parsed("OLLAMA_POOL_SIZE", defaults.ollama_pool_size)?,
            max_upload_bytes: load_positive("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            max_prompt_chars: load_positive("MAX_PROMPT_CHARS", defaults.max_prompt_chars)?,
            summary_num_predict: load_parsed("SUMMARY_NUM_PREDICT", defaults.summary_num_predict)?,
            summary_language: load_env_optional("SUMMARY_LANGUAGE")
                .unwrap_or(defaults.summary_language),
            summary_max_chars: load_positive("SUMMARY_MAX_CHARS", defaults.summary_max_chars)?,
            server_host: load_env_optional("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: load_parsed("SERVER_PORT", defaults.server_port)?,
        })
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn load_parsed<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    load_env_optional(key)
        .map(|value| {
            value
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key.to_string()))
        })
        .transpose()
        .map(|value| value.unwrap_or(default))
}

fn load_positive(key: &str, default: usize) -> Result<usize, ConfigError> {
    match load_parsed(key, default)? {
        0 => Err(ConfigError::InvalidValue(key.to_string())),
        value => Ok(value),
    }
}

fn load_seconds(key: &str, default: Duration) -> Result<Duration, ConfigError> {
    let seconds: f64 = load_parsed(key, default.as_secs_f64())?;
    if seconds.is_finite() && seconds > 0.0 {
        Ok(Duration::from_secs_f64(seconds))
    } else {
        Err(ConfigError::InvalidValue(key.to_string()))
    }
}

fn load_backoff(key: &str, default: Duration) -> Result<Duration, ConfigError> {
    let seconds: f64 = load_parsed(key, default.as_secs_f64())?;
    if seconds.is_finite() && seconds >= 0.0 {
        Ok(Duration::from_secs_f64(seconds))
    } else {
        Err(ConfigError::InvalidValue(key.to_string()))
    }
}

/// Load `.env` (when present) and build the configuration from the process environment.
pub fn load_config() -> Result<Config, ConfigError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    tracing::debug!(
        ollama_url = %config.ollama_url,
        model = %config.ollama_model,
        timeout_secs = config.ollama_timeout.as_secs_f64(),
        max_upload_bytes = config.max_upload_bytes,
        max_prompt_chars = config.max_prompt_chars,
        "Loaded configuration"
    );
    Ok(config)
}
