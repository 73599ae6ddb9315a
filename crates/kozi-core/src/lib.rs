//! Chat core for Kozi.
//!
//! This crate owns the keyword responder, simulated latency, and the
//! submission pipeline that ties user input to the persisted transcript.

pub mod chatbot;
pub mod error;
pub mod events;
pub mod latency;
pub mod random;
pub mod responder;
pub mod rules;
pub mod storage;

pub use chatbot::{Chatbot, ChatbotBuilder, IgnoreReason, SubmitOutcome};
pub use error::CoreError;
pub use events::{ChatEvent, EventSink, PipelineState};
pub use latency::Latency;
pub use random::{RandomSource, SeededRandom, ThreadRandom};
pub use responder::{ReplyGenerator, Responder};
pub use rules::{Category, FALLBACK_CATEGORY, RuleTable};
pub use storage::{DEFAULT_STORAGE_DIR, storage_from_config};
