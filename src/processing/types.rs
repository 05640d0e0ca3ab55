//! Core data types and error definitions for the summary pipeline.

use crate::extraction::ExtractionError;
use crate::summarization::{GenerationError, prompt::truncate_chars};
use axum::http::StatusCode;
use thiserror::Error;

/// Characters of extracted text echoed back to the caller.
pub const PREVIEW_CHARS: usize = 500;
/// Marker appended to a preview that was cut short.
pub const PREVIEW_ELLIPSIS: &str = "...";

/// One uploaded document.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    /// Filename declared by the uploader.
    pub filename: String,
    /// Raw document bytes.
    pub bytes: Vec<u8>,
}

impl DocumentUpload {
    /// Pair a filename with its contents.
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }
}

/// Result of a completed summarization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryOutcome {
    /// Extracted text, cut to [`PREVIEW_CHARS`] characters.
    pub preview: String,
    /// Generated summary.
    pub summary: String,
    /// Length of the full extracted text, in characters.
    pub extracted_chars: usize,
}

/// Errors emitted by the summary pipeline.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// Request did not carry a document.
    #[error("Missing upload: {0}")]
    MissingUpload(String),
    /// Upload exceeded the configured ceiling.
    #[error("File too large; upload a Word document of at most {limit} bytes")]
    Oversize {
        /// Configured ceiling, in bytes.
        limit: usize,
    },
    /// Document could not be turned into text.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    /// Summary could not be generated.
    #[error(transparent)]
    Generation(#[from] GenerationError),
    /// Any other fault while handling the request.
    #[error("Unexpected failure: {0}")]
    Unexpected(String),
}

impl SummaryError {
    /// HTTP status surfaced to callers.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingUpload(_) => StatusCode::BAD_REQUEST,
            Self::Oversize { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Extraction(error) => match error {
                ExtractionError::UnsupportedFormat { .. }
                | ExtractionError::LegacyFormat { .. }
                | ExtractionError::NoContent => StatusCode::BAD_REQUEST,
                ExtractionError::Parse(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Generation(error) => match error {
                GenerationError::Unreachable(_) => StatusCode::SERVICE_UNAVAILABLE,
                GenerationError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                GenerationError::BackendStatus { .. }
                | GenerationError::BackendReported(_)
                | GenerationError::Protocol(_)
                | GenerationError::EmptyResponse => StatusCode::BAD_GATEWAY,
                GenerationError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Cut `text` to `limit` characters, marking the cut with [`PREVIEW_ELLIPSIS`].
pub fn preview(text: &str, limit: usize) -> String {
    let head = truncate_chars(text, limit);
    if head.len() < text.len() {
        format!("{head}{PREVIEW_ELLIPSIS}")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn preview_keeps_short_text() {
        assert_eq!(preview("short", PREVIEW_CHARS), "short");
        let exact = "x".repeat(PREVIEW_CHARS);
        assert_eq!(preview(&exact, PREVIEW_CHARS), exact);
    }

    #[test]
    fn preview_cuts_long_text_with_ellipsis() {
        let text = "a".repeat(500_001);
        let cut = preview(&text, 500);
        assert_eq!(cut, format!("{}...", "a".repeat(500)));
    }

    #[test]
    fn preview_counts_characters_not_bytes() {
        let text = "字".repeat(600);
        let cut = preview(&text, PREVIEW_CHARS);
        assert_eq!(cut.chars().count(), PREVIEW_CHARS + PREVIEW_ELLIPSIS.len());
        assert!(cut.ends_with(PREVIEW_ELLIPSIS));
    }

    #[test]
    fn statuses_follow_error_taxonomy() {
        let cases: Vec<(SummaryError, StatusCode)> = vec![
            (
                ExtractionError::UnsupportedFormat {
                    filename: "a.pdf".into(),
                }
                .into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                ExtractionError::LegacyFormat {
                    filename: "a.doc".into(),
                }
                .into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                SummaryError::Oversize { limit: 10 },
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
            (ExtractionError::NoContent.into(), StatusCode::BAD_REQUEST),
            (
                ExtractionError::Parse("bad zip".into()).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                GenerationError::Unreachable("refused".into()).into(),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                GenerationError::Timeout {
                    timeout: Duration::from_secs(1),
                }
                .into(),
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (
                GenerationError::BackendReported("boom".into()).into(),
                StatusCode::BAD_GATEWAY,
            ),
            (
                GenerationError::Protocol("bad json".into()).into(),
                StatusCode::BAD_GATEWAY,
            ),
            (GenerationError::EmptyResponse.into(), StatusCode::BAD_GATEWAY),
            (
                SummaryError::Unexpected("worker panicked".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.status(), status, "{error}");
        }
    }

    #[test]
    fn messages_carry_underlying_causes() {
        let parse: SummaryError = ExtractionError::Parse("invalid zip header".into()).into();
        assert!(parse.to_string().contains("invalid zip header"));

        let reported: SummaryError = GenerationError::BackendReported("model missing".into()).into();
        assert!(reported.to_string().contains("model missing"));

        let unreachable: SummaryError = GenerationError::Unreachable("refused".into()).into();
        assert!(unreachable.to_string().contains("ollama serve"));
    }
}
