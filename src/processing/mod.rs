//! Request pipeline: upload checks, text extraction and summary generation.

mod service;
pub mod types;

pub use service::{DocumentService, SummaryApi};
pub use types::{
    DocumentUpload, PREVIEW_CHARS, PREVIEW_ELLIPSIS, SummaryError, SummaryOutcome, preview,
};
