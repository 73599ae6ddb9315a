//! Storage backends holding the serialized transcript under a single key.

use crate::error::TranscriptError;
use crate::model::Message;
use log::{debug, info};
use parking_lot::Mutex;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Key the transcript is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "koziChatHistory";

/// Key-value persistence for a whole transcript.
///
/// Every save replaces the stored sequence wholesale.
pub trait TranscriptStorage: Send + Sync {
    /// Read the persisted transcript, or an empty sequence when nothing is stored.
    ///
    /// Undecodable data yields [`TranscriptError::Malformed`].
    fn load(&self) -> Result<Vec<Message>, TranscriptError>;
    /// Replace the persisted transcript.
    fn save(&self, messages: &[Message]) -> Result<(), TranscriptError>;
    /// Remove the persisted transcript.
    fn clear(&self) -> Result<(), TranscriptError>;
}

/// Encode a transcript as the persisted JSON array.
fn encode(messages: &[Message]) -> Result<String, TranscriptError> {
    Ok(serde_json::to_string(messages)?)
}

/// Decode the persisted JSON array stored under `key`.
///
/// Any undecodable input, including invalid UTF-8, is [`TranscriptError::Malformed`].
fn decode(key: &str, raw: &[u8]) -> Result<Vec<Message>, TranscriptError> {
    serde_json::from_slice(raw).map_err(|source| TranscriptError::Malformed {
        key: key.to_string(),
        source,
    })
}

/// In-process storage, useful for tests and ephemeral sessions.
#[derive(Debug)]
pub struct MemoryStorage {
    key: String,
    slot: Mutex<Option<String>>,
}

impl MemoryStorage {
    /// Create an empty store for the given key.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            slot: Mutex::new(None),
        }
    }

    /// Create a store pre-populated with raw persisted contents.
    pub fn with_raw(key: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            slot: Mutex::new(Some(raw.into())),
        }
    }

    /// Raw persisted contents, if any.
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().clone()
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new(DEFAULT_STORAGE_KEY)
    }
}

impl TranscriptStorage for MemoryStorage {
    fn load(&self) -> Result<Vec<Message>, TranscriptError> {
        match self.slot.lock().as_deref() {
            Some(raw) => decode(&self.key, raw.as_bytes()),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, messages: &[Message]) -> Result<(), TranscriptError> {
        let raw = encode(messages)?;
        *self.slot.lock() = Some(raw);
        Ok(())
    }

    fn clear(&self) -> Result<(), TranscriptError> {
        *self.slot.lock() = None;
        Ok(())
    }
}

/// File-backed storage writing `<root>/<key>.json`.
#[derive(Debug)]
pub struct FileStorage {
    /// Directory holding the transcript file.
    root: PathBuf,
    key: String,
    /// Serialize write access to the transcript file.
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// Create a file store under the given root, creating it if needed.
    pub fn new(root: impl AsRef<Path>, key: impl Into<String>) -> Result<Self, TranscriptError> {
        let key = key.into();
        if key.is_empty() || key.contains(['/', '\\']) || key == "." || key == ".." {
            return Err(TranscriptError::InvalidKey(key));
        }
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        info!(
            "initialized file transcript storage (root={}, key={})",
            root.display(),
            key
        );
        Ok(Self {
            root,
            key,
            write_lock: Mutex::new(()),
        })
    }

    /// Path to the transcript file.
    pub fn path(&self) -> PathBuf {
        self.root.join(format!("{}.json", self.key))
    }

    /// Path to the temporary file used for atomic rewrites.
    fn temp_path(&self) -> PathBuf {
        self.root.join(format!("{}.json.tmp", self.key))
    }
}

impl TranscriptStorage for FileStorage {
    fn load(&self) -> Result<Vec<Message>, TranscriptError> {
        let path = self.path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read(&path)?;
        decode(&self.key, &raw)
    }

    /// Rewrite the transcript atomically via a temp file.
    fn save(&self, messages: &[Message]) -> Result<(), TranscriptError> {
        let raw = encode(messages)?;
        let _guard = self.write_lock.lock();
        let temp_path = self.temp_path();
        {
            let mut file = OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .open(&temp_path)?;
            file.write_all(raw.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(temp_path, self.path())?;
        debug!(
            "saved transcript (key={}, messages={}, bytes={})",
            self.key,
            messages.len(),
            raw.len()
        );
        Ok(())
    }

    fn clear(&self) -> Result<(), TranscriptError> {
        let _guard = self.write_lock.lock();
        let path = self.path();
        if path.exists() {
            fs::remove_file(path)?;
            debug!("cleared transcript (key={})", self.key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{FileStorage, MemoryStorage, TranscriptStorage};
    use crate::{Message, Sender, TranscriptError};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn sample() -> Vec<Message> {
        vec![
            Message::new("Hello! I'm your AI assistant.", Sender::Bot),
            Message::new("hi", Sender::User),
        ]
    }

    #[test]
    fn memory_storage_replaces_contents_on_save() {
        let storage = MemoryStorage::default();
        assert_eq!(storage.load().expect("empty load"), Vec::new());

        let messages = sample();
        storage.save(&messages).expect("save");
        storage.save(&messages[..1]).expect("save shorter");
        assert_eq!(storage.load().expect("load"), messages[..1].to_vec());

        storage.clear().expect("clear");
        assert_eq!(storage.raw(), None);
    }

    #[test]
    fn memory_storage_reports_malformed_data() {
        let storage = MemoryStorage::with_raw("koziChatHistory", "{not json");
        let err = storage.load().unwrap_err();
        assert!(matches!(err, TranscriptError::Malformed { ref key, .. } if key == "koziChatHistory"));
    }

    #[test]
    fn file_storage_persists_json_array() {
        let temp = tempdir().expect("tempdir");
        let storage = FileStorage::new(temp.path(), "koziChatHistory").expect("storage");
        let messages = sample();
        storage.save(&messages).expect("save");

        let raw = std::fs::read_to_string(storage.path()).expect("read");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("json");
        assert_eq!(value.as_array().map(Vec::len), Some(2));
        assert_eq!(value[1]["sender"], "user");

        let reopened = FileStorage::new(temp.path(), "koziChatHistory").expect("reopen");
        assert_eq!(reopened.load().expect("load"), messages);
        assert!(!temp.path().join("koziChatHistory.json.tmp").exists());
    }

    #[test]
    fn file_storage_reports_invalid_utf8_as_malformed() {
        let temp = tempdir().expect("tempdir");
        let storage = FileStorage::new(temp.path(), "koziChatHistory").expect("storage");
        std::fs::write(storage.path(), [0xff, 0xfe, b'[', b']']).expect("write");
        let err = storage.load().unwrap_err();
        assert!(matches!(err, TranscriptError::Malformed { ref key, .. } if key == "koziChatHistory"));
    }

    #[test]
    fn file_storage_clear_is_idempotent() {
        let temp = tempdir().expect("tempdir");
        let storage = FileStorage::new(temp.path(), "history").expect("storage");
        storage.clear().expect("clear missing");
        storage.save(&sample()).expect("save");
        storage.clear().expect("clear");
        assert!(!storage.path().exists());
        assert_eq!(storage.load().expect("load"), Vec::new());
    }

    #[test]
    fn file_storage_rejects_path_like_keys() {
        let temp = tempdir().expect("tempdir");
        let err = FileStorage::new(temp.path(), "../escape").unwrap_err();
        assert!(matches!(err, TranscriptError::InvalidKey(_)));
    }
}
