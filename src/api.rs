//! HTTP surface for the document summary service.
//!
//! This module exposes a compact Axum router:
//!
//! - `POST /summarize-word` – Multipart upload (field `file`) of a `.docx` document. Returns
//!   `{ "code": 200, "message": ..., "data": { "original_text", "summary" } }` where
//!   `original_text` is a preview of the extracted text.
//! - `GET /health` – Static status naming the configured model; never contacts the backend.
//! - `GET /metrics` – Pipeline counters.
//! - `GET /commands` – Machine-readable command catalog for quick discovery by tools/hosts.
//!
//! Every failure is returned as `{ "code": <status>, "message": <text> }` with the matching
//! HTTP status.

use crate::config::Config;
use crate::metrics::MetricsSnapshot;
use crate::processing::{DocumentUpload, SummaryApi, SummaryError};
use axum::{
    Json, Router,
    extract::{
        DefaultBodyLimit, Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Multipart field carrying the document.
pub const UPLOAD_FIELD: &str = "file";
/// Allowance for multipart boundaries and headers on top of the upload ceiling.
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

struct AppState<S> {
    service: Arc<S>,
    config: Arc<Config>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            config: Arc::clone(&self.config),
        }
    }
}

/// Build the HTTP router exposing the summary API surface.
pub fn create_router<S>(service: Arc<S>, config: Arc<Config>) -> Router
where
    S: SummaryApi + 'static,
{
    let body_limit = config
        .max_upload_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);
    Router::new()
        .route("/summarize-word", post(summarize_word::<S>))
        .route("/health", get(health_check::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .route("/commands", get(get_commands))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .with_state(AppState { service, config })
}

/// Success envelope for `POST /summarize-word`.
#[derive(Serialize)]
struct SummaryEnvelope {
    code: u16,
    message: &'static str,
    data: SummaryData,
}

#[derive(Serialize)]
struct SummaryData {
    /// Extracted text, cut to the preview length.
    original_text: String,
    summary: String,
}

/// Accept a `.docx` upload, extract its text and return a generated summary.
async fn summarize_word<S>(
    State(state): State<AppState<S>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SummaryEnvelope>, AppError>
where
    S: SummaryApi,
{
    let multipart = multipart.map_err(|rejection| {
        SummaryError::MissingUpload(format!(
            "expected a multipart form with a '{UPLOAD_FIELD}' field ({})",
            rejection.body_text()
        ))
    })?;
    let upload = read_upload(multipart, state.config.max_upload_bytes).await?;
    tracing::info!(filename = %upload.filename, "Received /summarize-word request");

    let outcome = state.service.summarize_document(upload).await?;
    tracing::info!(
        extracted_chars = outcome.extracted_chars,
        "Summary request completed"
    );
    Ok(Json(SummaryEnvelope {
        code: StatusCode::OK.as_u16(),
        message: "Summary generated",
        data: SummaryData {
            original_text: outcome.preview,
            summary: outcome.summary,
        },
    }))
}

/// Pull the first `file` field out of the form.
async fn read_upload(mut multipart: Multipart, limit: usize) -> Result<DocumentUpload, AppError> {
    let into_error = |error: MultipartError| {
        if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
            SummaryError::Oversize { limit }
        } else {
            SummaryError::MissingUpload(error.body_text())
        }
    };

    while let Some(field) = multipart.next_field().await.map_err(into_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(into_error)?;
        return Ok(DocumentUpload::new(filename, bytes.to_vec()));
    }

    Err(SummaryError::MissingUpload(format!("form field '{UPLOAD_FIELD}' is required")).into())
}

/// Response body for `GET /health`.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    model: String,
    message: String,
}

/// Report liveness and the configured model.
async fn health_check<S>(State(state): State<AppState<S>>) -> Json<HealthResponse> {
    let model = state.config.ollama_model.clone();
    Json(HealthResponse {
        status: "ok",
        message: format!("Summary service is running; Ollama model: {model}"),
        model,
    })
}

/// Return pipeline counters.
async fn get_metrics<S>(State(state): State<AppState<S>>) -> Json<MetricsSnapshot>
where
    S: SummaryApi,
{
    Json(state.service.metrics_snapshot())
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands for discovery/UX in hosts and tools.
async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "summarize_word",
                method: "POST",
                path: "/summarize-word",
                description: "Upload a .docx file as multipart field 'file'. Response returns { \"code\": 200, \"message\": string, \"data\": { \"original_text\": string, \"summary\": string } }.",
            },
            CommandDescriptor {
                name: "health",
                method: "GET",
                path: "/health",
                description: "Static liveness status naming the configured Ollama model.",
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Return summary counters useful for observability dashboards.",
            },
        ],
    })
}

/// Failure envelope body.
#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

struct AppError(SummaryError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.0.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self.0, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self.0, "Request rejected");
        }
        let body = ErrorBody {
            code: status.as_u16(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<SummaryError> for AppError {
    fn from(inner: SummaryError) -> Self {
        Self(inner)
    }
}
