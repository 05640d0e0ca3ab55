//! Wire types exchanged with the generation backend.

use reqwest::StatusCode;
use serde::Serialize;

/// JSON body posted to the Ollama `/api/generate` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    /// Model identifier understood by the backend.
    pub model: String,
    /// Fully constructed prompt.
    pub prompt: String,
    /// Always `false`: the service needs one complete reply.
    pub stream: bool,
    /// Sampling and length options.
    pub options: GenerationOptions,
}

/// Generation options forwarded verbatim to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationOptions {
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum number of tokens to generate.
    pub num_predict: u32,
}

/// Final HTTP response from the backend, after transport-level retries.
#[derive(Debug, Clone)]
pub struct BackendReply {
    /// HTTP status of the last attempt.
    pub status: StatusCode,
    /// Raw response body.
    pub body: String,
}

impl BackendReply {
    /// Convenience constructor, mostly for fakes.
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}
