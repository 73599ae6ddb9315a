//! Session transcript mirrored into a storage backend.

use crate::error::TranscriptError;
use crate::model::{Message, Sender};
use crate::storage::TranscriptStorage;
use log::{debug, info, warn};
use std::sync::Arc;

/// How a transcript was brought up at session start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Initialization {
    /// Storage was discarded and the transcript reseeded with the welcome message.
    Fresh,
    /// A previously persisted transcript was adopted.
    Restored { messages: usize },
}

/// Ordered, append-only log of the current session's messages.
///
/// The in-memory sequence is authoritative. Every mutation persists the whole
/// sequence; when persisting fails the in-memory change is kept and the error
/// is returned to the caller.
pub struct TranscriptStore {
    storage: Arc<dyn TranscriptStorage>,
    welcome_message: String,
    messages: Vec<Message>,
}

impl TranscriptStore {
    /// Create an empty, uninitialized transcript.
    pub fn new(storage: Arc<dyn TranscriptStorage>, welcome_message: impl Into<String>) -> Self {
        Self {
            storage,
            welcome_message: welcome_message.into(),
            messages: Vec::new(),
        }
    }

    /// Bring the transcript up for a new session.
    ///
    /// Unless `restore` is set, anything persisted by an earlier session is
    /// discarded and the transcript is reset. With `restore`, a non-empty
    /// persisted transcript is adopted as-is; unreadable storage is treated as
    /// empty. The welcome message is in memory even when an error is returned.
    pub fn initialize(&mut self, restore: bool) -> Result<Initialization, TranscriptError> {
        if restore {
            let persisted = self.load().unwrap_or_else(|err| {
                warn!("failed to read persisted transcript: {err}");
                Vec::new()
            });
            if !persisted.is_empty() {
                info!("restored transcript (messages={})", persisted.len());
                let restored = persisted.len();
                self.messages = persisted;
                return Ok(Initialization::Restored { messages: restored });
            }
            debug!("no persisted transcript to restore");
        }
        self.reset()?;
        Ok(Initialization::Fresh)
    }

    /// Append a record stamped with the current time and persist the transcript.
    ///
    /// The record stays in memory even when persisting fails.
    pub fn append(
        &mut self,
        content: impl Into<String>,
        sender: Sender,
    ) -> Result<Message, TranscriptError> {
        let message = Message::new(content, sender);
        self.push(message.clone())?;
        Ok(message)
    }

    /// Append an already-built record and persist the transcript.
    ///
    /// The record stays in memory even when persisting fails.
    pub fn push(&mut self, message: Message) -> Result<(), TranscriptError> {
        debug!(
            "appended message (sender={}, content_len={}, total={})",
            message.sender().as_str(),
            message.content().len(),
            self.messages.len() + 1
        );
        self.messages.push(message);
        self.storage.save(&self.messages)
    }

    /// Clear persisted and in-memory state, then seed the welcome message.
    pub fn reset(&mut self) -> Result<Message, TranscriptError> {
        let cleared = self.storage.clear();
        if let Err(err) = &cleared {
            warn!("failed to clear persisted transcript: {err}");
        }
        self.messages.clear();
        let welcome = self.append(self.welcome_message.clone(), Sender::Bot)?;
        cleared?;
        info!("transcript reset");
        Ok(welcome)
    }

    /// Read the persisted transcript.
    ///
    /// Malformed persisted data is treated as an empty transcript.
    pub fn load(&self) -> Result<Vec<Message>, TranscriptError> {
        match self.storage.load() {
            Ok(messages) => Ok(messages),
            Err(TranscriptError::Malformed { key, source }) => {
                warn!("ignoring malformed persisted transcript (key={key}): {source}");
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }

    /// Messages in insertion order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
