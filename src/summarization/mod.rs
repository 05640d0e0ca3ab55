//! Summary generation through a locally hosted text-generation backend.
//!
//! The [`Summarizer`] truncates document text to the prompt ceiling, wraps it in a fixed
//! instruction template, sends it through a [`GenerationBackend`] and validates the reply.
//! The production backend is [`OllamaBackend`]; tests substitute in-memory fakes.

mod ollama;
pub mod prompt;
pub mod retry;
pub mod types;

pub use ollama::OllamaBackend;
pub use retry::RetryPolicy;
pub use types::{BackendReply, GenerationOptions, GenerationRequest};

use crate::config::Config;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::{Duration, Instant};
use thiserror::Error;

const BODY_EXCERPT_CHARS: usize = 200;

/// Errors surfaced while generating a summary.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Backend could not be reached.
    #[error(
        "Cannot reach the local Ollama service ({0}). Check that: 1. Ollama is running; \
         2. port 11434 is not used by another process; 3. `ollama serve` has been started"
    )]
    Unreachable(String),
    /// Backend did not answer within the configured deadline.
    #[error(
        "Ollama did not answer within {:?}; retry later or shorten the document",
        .timeout
    )]
    Timeout {
        /// Per-attempt deadline that was exceeded.
        timeout: Duration,
    },
    /// Backend answered with a non-success status and no error message.
    #[error("Ollama returned {status}: {body}")]
    BackendStatus {
        /// Final HTTP status.
        status: StatusCode,
        /// Excerpt of the response body.
        body: String,
    },
    /// Backend reported an explicit error.
    #[error("Ollama returned an error: {0}")]
    BackendReported(String),
    /// Backend reply was not the expected JSON object.
    #[error("Malformed Ollama response: {0}")]
    Protocol(String),
    /// Backend reply carried no usable summary.
    #[error("Ollama returned no summary")]
    EmptyResponse,
    /// Anything else that went wrong while preparing or sending the call.
    #[error("Summary generation failed: {0}")]
    Unexpected(String),
}

/// Interface implemented by generation backends.
///
/// Implementations own transport concerns (pooling, timeouts, retries) and return the final
/// reply untouched; validation happens in [`Summarizer`].
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Send one logical generation request.
    async fn generate(&self, request: &GenerationRequest) -> Result<BackendReply, GenerationError>;
}

/// Static generation parameters shared by every request.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    /// Model identifier.
    pub model: String,
    /// Ceiling on document characters embedded in the prompt.
    pub max_prompt_chars: usize,
    /// Token budget for the generated summary.
    pub num_predict: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Language the summary is requested in.
    pub language: String,
    /// Length bound stated in the prompt.
    pub max_summary_chars: usize,
}

impl GenerationSettings {
    /// Pick the generation parameters out of the service configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            model: config.ollama_model.clone(),
            max_prompt_chars: config.max_prompt_chars,
            num_predict: config.summary_num_predict,
            temperature: config.ollama_temperature,
            language: config.summary_language.clone(),
            max_summary_chars: config.summary_max_chars,
        }
    }
}

/// Builds prompts, calls the backend and unwraps its reply.
pub struct Summarizer {
    backend: Box<dyn GenerationBackend>,
    settings: GenerationSettings,
}

impl Summarizer {
    /// Wrap an arbitrary backend.
    pub fn new(backend: Box<dyn GenerationBackend>, settings: GenerationSettings) -> Self {
        Self { backend, settings }
    }

    /// Build a summarizer backed by Ollama.
    pub fn from_config(config: &Config) -> Result<Self, GenerationError> {
        let backend = OllamaBackend::new(config)?;
        Ok(Self::new(
            Box::new(backend),
            GenerationSettings::from_config(config),
        ))
    }

    /// Generation parameters in use.
    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Build the request body for `text`, truncating it to the prompt ceiling.
    pub fn build_request(&self, text: &str) -> GenerationRequest {
        let embedded = prompt::truncate_chars(text, self.settings.max_prompt_chars);
        if embedded.len() < text.len() {
            tracing::debug!(
                limit = self.settings.max_prompt_chars,
                "Document text truncated for prompt"
            );
        }
        GenerationRequest {
            model: self.settings.model.clone(),
            prompt: prompt::build_prompt(
                embedded,
                &self.settings.language,
                self.settings.max_summary_chars,
            ),
            stream: false,
            options: GenerationOptions {
                temperature: self.settings.temperature,
                num_predict: self.settings.num_predict,
            },
        }
    }

    /// Summarize document text.
    pub async fn summarize(&self, text: &str) -> Result<String, GenerationError> {
        tracing::info!(model = %self.settings.model, "Requesting summary from Ollama");
        let request = self.build_request(text);
        let started = Instant::now();

        let result = match self.backend.generate(&request).await {
            Ok(reply) => validate_reply(reply),
            Err(error) => Err(error),
        };

        match &result {
            Ok(summary) => tracing::info!(
                summary_chars = summary.chars().count(),
                elapsed_secs = started.elapsed().as_secs_f64(),
                "Ollama summary generated"
            ),
            Err(error) => tracing::error!(
                error = %error,
                elapsed_secs = started.elapsed().as_secs_f64(),
                "Summary generation failed"
            ),
        }
        result
    }
}

/// Turn the final backend reply into a summary or a classified failure.
///
/// An explicit `error` field wins over the HTTP status; otherwise a non-success status fails,
/// then the body must be a JSON object with a non-blank string `response`.
pub fn validate_reply(reply: BackendReply) -> Result<String, GenerationError> {
    let parsed = serde_json::from_str::<Value>(&reply.body);

    if let Some(message) = parsed.as_ref().ok().and_then(reported_error) {
        return Err(GenerationError::BackendReported(message));
    }

    if !reply.status.is_success() {
        return Err(GenerationError::BackendStatus {
            status: reply.status,
            body: prompt::truncate_chars(reply.body.trim(), BODY_EXCERPT_CHARS).to_string(),
        });
    }

    let object = match parsed {
        Ok(Value::Object(object)) => object,
        Ok(other) => {
            return Err(GenerationError::Protocol(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            )));
        }
        Err(error) => return Err(GenerationError::Protocol(error.to_string())),
    };

    match object.get("response") {
        Some(Value::String(summary)) if !summary.trim().is_empty() => {
            Ok(summary.trim().to_string())
        }
        _ => Err(GenerationError::EmptyResponse),
    }
}

/// Any non-empty `error` value counts as a failure; `null`, `false`, `0`, `""`, `[]` and `{}`
/// do not.
fn reported_error(value: &Value) -> Option<String> {
    match value.get("error")? {
        Value::Null | Value::Bool(false) => None,
        Value::Number(number) if number.as_f64() == Some(0.0) => None,
        Value::String(message) if message.is_empty() => None,
        Value::String(message) if message.trim().is_empty() => Some(message.clone()),
        Value::String(message) => Some(message.trim().to_string()),
        Value::Array(items) if items.is_empty() => None,
        Value::Object(map) if map.is_empty() => None,
        other => Some(other.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
