//! Chat transcript records and their persistence.

pub mod error;
pub mod model;
pub mod storage;
pub mod store;

/// Transcript error type.
pub use error::TranscriptError;
/// Message record model.
pub use model::{Message, Sender};
/// Storage interface and the built-in backends.
pub use storage::{DEFAULT_STORAGE_KEY, FileStorage, MemoryStorage, TranscriptStorage};
/// Session transcript.
pub use store::{Initialization, TranscriptStore};
