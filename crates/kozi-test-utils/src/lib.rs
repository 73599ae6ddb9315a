//! Test helpers shared across Kozi crates.

pub mod events;
pub mod generator;
pub mod random;
pub mod storage;

pub use events::RecordingEventSink;
pub use generator::{FailingGenerator, FixedGenerator, RecordingGenerator};
pub use random::SequenceRandom;
pub use storage::FailingStorage;
