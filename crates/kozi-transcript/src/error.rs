//! Error types for transcript persistence.

/// Errors returned by transcript storage backends and the store.
#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serializing the transcript failed.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Persisted data under the key could not be decoded.
    #[error("malformed transcript under key {key}: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    /// Storage key cannot be used by the backend.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}
