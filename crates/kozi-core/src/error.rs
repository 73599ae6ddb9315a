//! Error types for the chat core crate.

use kozi_transcript::TranscriptError;
use thiserror::Error;

/// Errors returned by chat core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A rule category has no candidate replies.
    #[error("category '{0}' has no replies")]
    EmptyCategory(String),
    /// A rule category has no trigger keywords.
    #[error("category '{0}' has no keywords")]
    NoKeywords(String),
    /// The fallback category has no candidate replies.
    #[error("fallback category has no replies")]
    EmptyFallback,
    /// Reply generation failed.
    #[error("reply generation failed: {0}")]
    Generation(String),
    /// Transcript persistence error.
    #[error("transcript error: {0}")]
    Transcript(#[from] TranscriptError),
}
