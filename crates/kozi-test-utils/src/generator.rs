use async_trait::async_trait;
use kozi_core::{CoreError, ReplyGenerator};
use parking_lot::Mutex;

/// Always replies with the same text.
#[derive(Debug, Clone)]
pub struct FixedGenerator {
    reply: String,
}

impl FixedGenerator {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

#[async_trait]
impl ReplyGenerator for FixedGenerator {
    async fn generate(&self, _input: &str) -> Result<String, CoreError> {
        Ok(self.reply.clone())
    }
}

/// Always fails to produce a reply.
#[derive(Debug, Clone, Default)]
pub struct FailingGenerator;

#[async_trait]
impl ReplyGenerator for FailingGenerator {
    async fn generate(&self, _input: &str) -> Result<String, CoreError> {
        Err(CoreError::Generation("generator unavailable".to_string()))
    }
}

/// Echoes input back and records every prompt it receives.
#[derive(Debug, Default)]
pub struct RecordingGenerator {
    prompts: Mutex<Vec<String>>,
}

impl RecordingGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl ReplyGenerator for RecordingGenerator {
    async fn generate(&self, input: &str) -> Result<String, CoreError> {
        self.prompts.lock().push(input.to_string());
        Ok(format!("echo: {input}"))
    }
}
