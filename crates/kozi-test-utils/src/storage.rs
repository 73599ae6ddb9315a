use kozi_transcript::{Message, TranscriptError, TranscriptStorage};
use parking_lot::Mutex;
use std::io;

/// Storage whose writes always fail; loads return whatever was seeded.
#[derive(Debug, Default)]
pub struct FailingStorage {
    seeded: Vec<Message>,
    attempts: Mutex<usize>,
}

impl FailingStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_messages(seeded: Vec<Message>) -> Self {
        Self {
            seeded,
            attempts: Mutex::new(0),
        }
    }

    /// Number of save or clear calls observed.
    pub fn attempts(&self) -> usize {
        *self.attempts.lock()
    }

    fn fail(&self) -> TranscriptError {
        *self.attempts.lock() += 1;
        io::Error::other("storage unavailable").into()
    }
}

impl TranscriptStorage for FailingStorage {
    fn load(&self) -> Result<Vec<Message>, TranscriptError> {
        Ok(self.seeded.clone())
    }

    fn save(&self, _messages: &[Message]) -> Result<(), TranscriptError> {
        Err(self.fail())
    }

    fn clear(&self) -> Result<(), TranscriptError> {
        Err(self.fail())
    }
}
