//! Document-to-text extraction.
//!
//! Only Office Open XML word-processing documents (`.docx`) are accepted. Legacy binary
//! `.doc` files are recognised so callers can ask for a conversion instead of a generic
//! rejection. Extraction walks the body paragraphs in order, trims each one, drops the blank
//! ones and joins the rest with newlines.

mod docx;

use std::fmt;
use thiserror::Error;

/// File extension accepted by the extractor (compared case-insensitively).
pub const ACCEPTED_EXTENSION: &str = ".docx";
/// Older binary format that is recognised but not supported.
pub const LEGACY_EXTENSION: &str = ".doc";

/// Errors produced while turning an uploaded document into text.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Filename does not carry the accepted extension.
    #[error("Only .docx Word documents are supported (got '{filename}')")]
    UnsupportedFormat {
        /// Filename as declared by the uploader.
        filename: String,
    },
    /// Filename carries the legacy binary Word extension.
    #[error("Legacy .doc files are not supported; save '{filename}' as .docx and upload it again")]
    LegacyFormat {
        /// Filename as declared by the uploader.
        filename: String,
    },
    /// Document parsed but every paragraph was blank.
    #[error("The Word document contains no text")]
    NoContent,
    /// Document bytes could not be parsed as a DOCX container.
    #[error("Failed to parse Word document: {0}")]
    Parse(String),
}

/// Normalized document text: trimmed, non-empty paragraphs joined by `\n`.
///
/// Never empty; construct it through [`ExtractedText::from_paragraphs`] or [`extract`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText(String);

impl ExtractedText {
    /// Join paragraphs in order, trimming each and skipping those left empty.
    ///
    /// Returns `None` when nothing remains.
    pub fn from_paragraphs<I, S>(paragraphs: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut text = String::new();
        for paragraph in paragraphs {
            let trimmed = paragraph.as_ref().trim();
            if trimmed.is_empty() {
                continue;
            }
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(trimmed);
        }
        if text.is_empty() { None } else { Some(Self(text)) }
    }

    /// Borrow the text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters (not bytes).
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    /// Take ownership of the underlying string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for ExtractedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExtractedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reject filenames the extractor cannot handle, before any byte is read.
pub fn check_filename(filename: &str) -> Result<(), ExtractionError> {
    let lowered = filename.to_lowercase();
    if lowered.ends_with(LEGACY_EXTENSION) {
        return Err(ExtractionError::LegacyFormat {
            filename: filename.to_string(),
        });
    }
    if !lowered.ends_with(ACCEPTED_EXTENSION) {
        return Err(ExtractionError::UnsupportedFormat {
            filename: filename.to_string(),
        });
    }
    Ok(())
}

/// Extract normalized text from a DOCX document.
///
/// CPU-bound; async callers should run it on a blocking worker.
pub fn extract(bytes: &[u8], filename: &str) -> Result<ExtractedText, ExtractionError> {
    check_filename(filename)?;
    tracing::info!(filename, bytes = bytes.len(), "Parsing Word document");

    let paragraphs = docx::read_paragraphs(bytes).map_err(|error| {
        tracing::error!(filename, error = %error, "Failed to parse Word document");
        error
    })?;

    match ExtractedText::from_paragraphs(&paragraphs) {
        Some(text) => {
            tracing::info!(
                filename,
                paragraphs = paragraphs.len(),
                chars = text.char_count(),
                "Document parsed"
            );
            Ok(text)
        }
        None => {
            tracing::warn!(filename, "Document has no usable text");
            Err(ExtractionError::NoContent)
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::docx_bytes;
    use super::*;

    #[test]
    fn joins_trimmed_paragraphs_in_order() {
        let text = ExtractedText::from_paragraphs(["Title", "", "  Body text.  ", "   "])
            .expect("text");
        assert_eq!(text.as_str(), "Title\nBody text.");
    }

    #[test]
    fn blank_paragraphs_yield_nothing() {
        assert!(ExtractedText::from_paragraphs(["", "  ", "\t\n"]).is_none());
        assert!(ExtractedText::from_paragraphs(Vec::<String>::new()).is_none());
    }

    #[test]
    fn filename_gate_distinguishes_legacy_format() {
        assert!(check_filename("report.docx").is_ok());
        assert!(check_filename("REPORT.DOCX").is_ok());
        assert!(matches!(
            check_filename("report.doc"),
            Err(ExtractionError::LegacyFormat { .. })
        ));
        assert!(matches!(
            check_filename("Report.DOC"),
            Err(ExtractionError::LegacyFormat { .. })
        ));
        assert!(matches!(
            check_filename("report.pdf"),
            Err(ExtractionError::UnsupportedFormat { .. })
        ));
        assert!(matches!(
            check_filename(""),
            Err(ExtractionError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn surrounding_whitespace_is_part_of_the_filename() {
        assert!(matches!(
            check_filename("report.docx "),
            Err(ExtractionError::UnsupportedFormat { .. })
        ));
        assert!(matches!(
            check_filename("report.doc\t"),
            Err(ExtractionError::UnsupportedFormat { .. })
        ));
        assert!(check_filename(" report.docx").is_ok());
    }

    #[test]
    fn unsupported_filename_is_rejected_before_parsing() {
        let error = extract(b"not a zip archive", "notes.txt").unwrap_err();
        assert!(matches!(error, ExtractionError::UnsupportedFormat { .. }));
    }

    #[test]
    fn extracts_paragraphs_from_docx() {
        let bytes = docx_bytes(&["Title", "", "  Body text.  ", "   "]);
        let text = extract(&bytes, "sample.docx").expect("extracted");
        assert_eq!(text.as_str(), "Title\nBody text.");
    }

    #[test]
    fn blank_document_reports_no_content() {
        let bytes = docx_bytes(&["", "   ", ""]);
        let error = extract(&bytes, "blank.docx").unwrap_err();
        assert!(matches!(error, ExtractionError::NoContent));
    }

    #[test]
    fn corrupt_bytes_report_parse_error() {
        let error = extract(b"definitely not a docx", "broken.docx").unwrap_err();
        match error {
            ExtractionError::Parse(message) => assert!(!message.is_empty()),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
