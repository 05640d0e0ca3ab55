use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing summarization activity.
#[derive(Default)]
pub struct SummaryMetrics {
    documents_summarized: AtomicU64,
    rejected_uploads: AtomicU64,
    extraction_failures: AtomicU64,
    generation_failures: AtomicU64,
    characters_extracted: AtomicU64,
}

impl SummaryMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a summarized document and the number of characters extracted from it.
    pub fn record_summary(&self, characters: u64) {
        self.documents_summarized.fetch_add(1, Ordering::Relaxed);
        self.characters_extracted
            .fetch_add(characters, Ordering::Relaxed);
    }

    /// Record an upload refused before parsing (format or size).
    pub fn record_rejected(&self) {
        self.rejected_uploads.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a document that could not be turned into text.
    pub fn record_extraction_failure(&self) {
        self.extraction_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed backend call.
    pub fn record_generation_failure(&self) {
        self.generation_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            documents_summarized: self.documents_summarized.load(Ordering::Relaxed),
            rejected_uploads: self.rejected_uploads.load(Ordering::Relaxed),
            extraction_failures: self.extraction_failures.load(Ordering::Relaxed),
            generation_failures: self.generation_failures.load(Ordering::Relaxed),
            characters_extracted: self.characters_extracted.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of the counters used for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Documents summarized successfully since startup.
    pub documents_summarized: u64,
    /// Uploads refused because of their format or size.
    pub rejected_uploads: u64,
    /// Uploads whose text could not be extracted.
    pub extraction_failures: u64,
    /// Backend calls that did not produce a summary.
    pub generation_failures: u64,
    /// Characters extracted across all summarized documents.
    pub characters_extracted: u64,
}
