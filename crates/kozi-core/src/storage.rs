//! Storage backend selection from config.

use crate::error::CoreError;
use kozi_config::{StorageBackend, StorageConfig};
use kozi_transcript::{FileStorage, MemoryStorage, TranscriptStorage};
use log::debug;
use std::sync::Arc;

/// Directory used by the file backend when no path is configured.
pub const DEFAULT_STORAGE_DIR: &str = ".kozi/storage";

/// Open the storage backend described by config.
pub fn storage_from_config(
    config: &StorageConfig,
) -> Result<Arc<dyn TranscriptStorage>, CoreError> {
    match config.backend {
        StorageBackend::Memory => {
            debug!("using in-memory transcript storage (key={})", config.key);
            Ok(Arc::new(MemoryStorage::new(config.key.clone())))
        }
        StorageBackend::File => {
            let root = config.path.as_deref().unwrap_or(DEFAULT_STORAGE_DIR);
            Ok(Arc::new(FileStorage::new(root, config.key.clone())?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::storage_from_config;
    use kozi_config::{StorageBackend, StorageConfig};
    use kozi_transcript::{Message, Sender};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn file_backend_writes_under_configured_path() {
        let temp = tempdir().expect("tempdir");
        let config = StorageConfig {
            backend: StorageBackend::File,
            path: Some(temp.path().join("store").display().to_string()),
            key: "history".to_string(),
            restore_on_start: false,
        };
        let storage = storage_from_config(&config).expect("storage");
        storage
            .save(&[Message::new("hi", Sender::User)])
            .expect("save");
        assert!(temp.path().join("store").join("history.json").exists());
    }

    #[test]
    fn memory_backend_starts_empty() {
        let config = StorageConfig {
            backend: StorageBackend::Memory,
            path: None,
            key: "history".to_string(),
            restore_on_start: false,
        };
        let storage = storage_from_config(&config).expect("storage");
        assert_eq!(storage.load().expect("load"), Vec::new());
    }

    #[test]
    fn invalid_key_is_rejected() {
        let temp = tempdir().expect("tempdir");
        let config = StorageConfig {
            backend: StorageBackend::File,
            path: Some(temp.path().display().to_string()),
            key: "a/b".to_string(),
            restore_on_start: false,
        };
        assert!(storage_from_config(&config).is_err());
    }
}
