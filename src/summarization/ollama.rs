//! Ollama HTTP backend with pooled connections, per-attempt timeout and retry budgets.

use super::retry::{FailureClass, RetryPolicy, is_retryable_status};
use super::types::{BackendReply, GenerationRequest};
use super::{GenerationBackend, GenerationError};
use crate::config::Config;
use async_trait::async_trait;
use backon::Retryable;
use reqwest::{Client, header::CONTENT_TYPE};
use std::time::Duration;

/// Generation backend that posts to a local Ollama runtime.
///
/// Holds one pooled `reqwest::Client`; construct it once and share it across requests.
pub struct OllamaBackend {
    http: Client,
    endpoint: String,
    timeout: Duration,
    retry: RetryPolicy,
}

/// Failure of a single attempt, before retry decisions are made.
#[derive(Debug)]
enum AttemptError {
    Transport(reqwest::Error),
    RetryableStatus(BackendReply),
}

impl AttemptError {
    fn class(&self) -> FailureClass {
        match self {
            Self::Transport(error) if error.is_connect() => FailureClass::Connect,
            Self::Transport(_) => FailureClass::Read,
            Self::RetryableStatus(_) => FailureClass::Status,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Transport(error) => error.to_string(),
            Self::RetryableStatus(reply) => format!("status {}", reply.status),
        }
    }
}

impl OllamaBackend {
    /// Build a backend from configuration.
    pub fn new(config: &Config) -> Result<Self, GenerationError> {
        let http = Client::builder()
            .user_agent(concat!("docsum/", env!("CARGO_PKG_VERSION")))
            .timeout(config.ollama_timeout)
            .pool_max_idle_per_host(config.ollama_pool_size)
            .build()
            .map_err(|error| {
                GenerationError::Unexpected(format!("failed to build HTTP client: {error}"))
            })?;
        tracing::debug!(
            endpoint = %config.ollama_url,
            timeout_secs = config.ollama_timeout.as_secs_f64(),
            pool_size = config.ollama_pool_size,
            "Initialized Ollama HTTP client"
        );
        Ok(Self {
            http,
            endpoint: config.ollama_url.clone(),
            timeout: config.ollama_timeout,
            retry: RetryPolicy::from_config(config),
        })
    }

    /// Replace the retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Endpoint URL requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn attempt(&self, request: &GenerationRequest) -> Result<BackendReply, AttemptError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json; charset=utf-8")
            .json(request)
            .send()
            .await
            .map_err(AttemptError::Transport)?;
        let status = response.status();
        let body = response.text().await.map_err(AttemptError::Transport)?;
        let reply = BackendReply { status, body };
        if is_retryable_status(status) {
            Err(AttemptError::RetryableStatus(reply))
        } else {
            Ok(reply)
        }
    }

    fn classify(&self, error: reqwest::Error) -> GenerationError {
        if error.is_timeout() {
            tracing::error!(endpoint = %self.endpoint, "Ollama call timed out");
            GenerationError::Timeout {
                timeout: self.timeout,
            }
        } else if error.is_builder() {
            GenerationError::Unexpected(error.to_string())
        } else {
            tracing::error!(endpoint = %self.endpoint, error = %error, "Cannot reach Ollama");
            GenerationError::Unreachable(error.to_string())
        }
    }
}

#[async_trait]
impl GenerationBackend for OllamaBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<BackendReply, GenerationError> {
        let mut budget = self.retry.budget();
        let outcome = (|| self.attempt(request))
            .retry(self.retry.backoff())
            .when(|error: &AttemptError| budget.try_consume(error.class()))
            .notify(|error: &AttemptError, delay: Duration| {
                tracing::warn!(
                    endpoint = %self.endpoint,
                    cause = %error.describe(),
                    delay_ms = delay.as_millis() as u64,
                    "Ollama attempt failed; retrying"
                );
            })
            .await;

        match outcome {
            Ok(reply) => Ok(reply),
            // Retries exhausted on a retryable status: hand the last reply to validation.
            Err(AttemptError::RetryableStatus(reply)) => Ok(reply),
            Err(AttemptError::Transport(error)) => Err(self.classify(error)),
        }
    }
}
