//! Document service coordinating upload checks, extraction and summarization.

use crate::{
    config::Config,
    extraction::{self, ExtractedText},
    metrics::{MetricsSnapshot, SummaryMetrics},
    processing::types::{DocumentUpload, PREVIEW_CHARS, SummaryError, SummaryOutcome, preview},
    summarization::Summarizer,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Runs the full pipeline for one upload: format and size gate, DOCX extraction on a blocking
/// worker, then a summary request to the generation backend.
///
/// Requests share nothing but the backend connection pool and the metrics counters, so one
/// service instance behind an `Arc` serves every concurrent request.
pub struct DocumentService {
    config: Arc<Config>,
    summarizer: Summarizer,
    metrics: Arc<SummaryMetrics>,
}

/// Abstraction over the pipeline used by external surfaces (HTTP, CLI).
#[async_trait]
pub trait SummaryApi: Send + Sync {
    /// Extract and summarize one uploaded document.
    async fn summarize_document(
        &self,
        upload: DocumentUpload,
    ) -> Result<SummaryOutcome, SummaryError>;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

impl DocumentService {
    /// Build the service with an Ollama-backed summarizer.
    pub fn new(config: Arc<Config>) -> Result<Self, SummaryError> {
        let summarizer = Summarizer::from_config(&config)?;
        Ok(Self::with_summarizer(config, summarizer))
    }

    /// Build the service around an existing summarizer.
    pub fn with_summarizer(config: Arc<Config>, summarizer: Summarizer) -> Self {
        Self {
            config,
            summarizer,
            metrics: Arc::new(SummaryMetrics::new()),
        }
    }

    /// Extract and summarize one uploaded document.
    pub async fn summarize_document(
        &self,
        upload: DocumentUpload,
    ) -> Result<SummaryOutcome, SummaryError> {
        tracing::info!(
            filename = %upload.filename,
            bytes = upload.bytes.len(),
            "Summarizing document"
        );
        let text = self.extract_text(upload).await?;

        let summary = self
            .summarizer
            .summarize(text.as_str())
            .await
            .inspect_err(|_| self.metrics.record_generation_failure())?;

        let extracted_chars = text.char_count();
        self.metrics.record_summary(extracted_chars as u64);
        tracing::info!(
            extracted_chars,
            summary_chars = summary.chars().count(),
            "Document summarized"
        );

        Ok(SummaryOutcome {
            preview: preview(text.as_str(), PREVIEW_CHARS),
            summary,
            extracted_chars,
        })
    }

    /// Check and extract an upload without contacting the backend.
    pub async fn extract_text(&self, upload: DocumentUpload) -> Result<ExtractedText, SummaryError> {
        let DocumentUpload { filename, bytes } = upload;

        if let Err(error) = extraction::check_filename(&filename) {
            tracing::warn!(filename = %filename, "Unsupported document format");
            self.metrics.record_rejected();
            return Err(error.into());
        }

        let limit = self.config.max_upload_bytes;
        if bytes.len() > limit {
            tracing::warn!(
                filename = %filename,
                bytes = bytes.len(),
                limit,
                "Upload exceeds size limit"
            );
            self.metrics.record_rejected();
            return Err(SummaryError::Oversize { limit });
        }

        let extracted = tokio::task::spawn_blocking(move || extraction::extract(&bytes, &filename))
            .await
            .map_err(|error| {
                tracing::error!(error = %error, "Extraction worker failed");
                self.metrics.record_extraction_failure();
                SummaryError::Unexpected(format!("extraction worker failed: {error}"))
            })?;

        extracted.map_err(|error| {
            self.metrics.record_extraction_failure();
            SummaryError::from(error)
        })
    }

    /// Configuration the service was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Return the current metrics snapshot.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[async_trait]
impl SummaryApi for DocumentService {
    async fn summarize_document(
        &self,
        upload: DocumentUpload,
    ) -> Result<SummaryOutcome, SummaryError> {
        DocumentService::summarize_document(self, upload).await
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        DocumentService::metrics_snapshot(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::{ExtractionError, fixtures::docx_bytes};
    use crate::summarization::{
        GenerationError, GenerationSettings,
        fakes::{FakeBackend, settings},
    };
    use reqwest::StatusCode;

    fn service_with(backend: &FakeBackend, config: Config) -> DocumentService {
        let summarizer = Summarizer::new(Box::new(backend.clone()), settings());
        DocumentService::with_summarizer(Arc::new(config), summarizer)
    }

    fn summary_backend() -> FakeBackend {
        FakeBackend::replying(StatusCode::OK, r#"{"response": "  Summary here.  "}"#)
    }

    #[tokio::test]
    async fn summarizes_docx_end_to_end() {
        let backend = summary_backend();
        let service = service_with(&backend, Config::default());
        let upload = DocumentUpload::new(
            "report.docx",
            docx_bytes(&["Title", "", "  Body text.  ", "   "]),
        );

        let outcome = service.summarize_document(upload).await.expect("outcome");

        assert_eq!(outcome.preview, "Title\nBody text.");
        assert_eq!(outcome.summary, "Summary here.");
        assert_eq!(outcome.extracted_chars, 16);
        assert!(backend.requests()[0].prompt.contains("Title\nBody text."));
        assert_eq!(service.metrics_snapshot().documents_summarized, 1);
    }

    #[tokio::test]
    async fn unsupported_format_skips_extraction_and_backend() {
        let backend = summary_backend();
        let service = service_with(&backend, Config::default());

        let error = service
            .summarize_document(DocumentUpload::new("slides.pptx", b"junk".to_vec()))
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            SummaryError::Extraction(ExtractionError::UnsupportedFormat { .. })
        ));

        let error = service
            .summarize_document(DocumentUpload::new("old.doc", b"junk".to_vec()))
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            SummaryError::Extraction(ExtractionError::LegacyFormat { .. })
        ));

        assert!(backend.requests().is_empty());
        assert_eq!(service.metrics_snapshot().rejected_uploads, 2);
    }

    #[tokio::test]
    async fn oversize_upload_is_rejected_before_parsing() {
        let backend = summary_backend();
        let config = Config {
            max_upload_bytes: 8,
            ..Config::default()
        };
        let service = service_with(&backend, config);

        // Nine bytes of garbage: parsing would fail, so an Oversize error proves it never ran.
        let error = service
            .summarize_document(DocumentUpload::new("big.docx", vec![0u8; 9]))
            .await
            .unwrap_err();
        assert!(matches!(error, SummaryError::Oversize { limit: 8 }));
        assert_eq!(error.status(), StatusCode::PAYLOAD_TOO_LARGE);

        // Exactly at the limit is accepted by the size gate and reaches the parser.
        let error = service
            .summarize_document(DocumentUpload::new("edge.docx", vec![0u8; 8]))
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            SummaryError::Extraction(ExtractionError::Parse(_))
        ));
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn blank_document_never_reaches_backend() {
        let backend = summary_backend();
        let service = service_with(&backend, Config::default());

        let error = service
            .summarize_document(DocumentUpload::new("blank.docx", docx_bytes(&["", "  "])))
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            SummaryError::Extraction(ExtractionError::NoContent)
        ));
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert!(backend.requests().is_empty());
        assert_eq!(service.metrics_snapshot().extraction_failures, 1);
    }

    #[tokio::test]
    async fn backend_failure_fails_whole_request() {
        let backend = FakeBackend::with(|| {
            Err(GenerationError::Timeout {
                timeout: std::time::Duration::from_secs(120),
            })
        });
        let service = service_with(&backend, Config::default());

        let error = service
            .summarize_document(DocumentUpload::new("report.docx", docx_bytes(&["Body"])))
            .await
            .unwrap_err();

        assert_eq!(error.status(), StatusCode::GATEWAY_TIMEOUT);
        let snapshot = service.metrics_snapshot();
        assert_eq!(snapshot.generation_failures, 1);
        assert_eq!(snapshot.documents_summarized, 0);
    }

    #[tokio::test]
    async fn long_documents_are_truncated_in_prompt_and_preview() {
        let backend = summary_backend();
        let summarizer = Summarizer::new(
            Box::new(backend.clone()),
            GenerationSettings {
                max_prompt_chars: 50,
                ..settings()
            },
        );
        let service = DocumentService::with_summarizer(Arc::new(Config::default()), summarizer);
        let body = "x".repeat(600);

        let outcome = service
            .summarize_document(DocumentUpload::new("long.docx", docx_bytes(&[&body])))
            .await
            .expect("outcome");

        assert_eq!(outcome.preview, format!("{}...", "x".repeat(PREVIEW_CHARS)));
        assert_eq!(outcome.extracted_chars, 600);
        let prompt = &backend.requests()[0].prompt;
        assert!(prompt.contains(&"x".repeat(50)));
        assert!(!prompt.contains(&"x".repeat(51)));
    }
}
