#![deny(missing_docs)]

//! Core library for the Word document summary service.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// DOCX text extraction.
pub mod extraction;
/// Structured logging and tracing setup.
pub mod logging;
/// Pipeline outcome counters.
pub mod metrics;
/// Request pipeline tying extraction and summarization together.
pub mod processing;
/// Prompt construction and generation backend access.
pub mod summarization;
