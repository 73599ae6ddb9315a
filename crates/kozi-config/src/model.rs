//! Configuration schema for Kozi.

use serde::{Deserialize, Serialize};

/// Root config for the Kozi chat assistant.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KoziConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub responder: ResponderConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl KoziConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> KoziConfigBuilder {
        KoziConfigBuilder::new()
    }
}

/// Builder for assembling a `KoziConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct KoziConfigBuilder {
    config: KoziConfig,
}

impl KoziConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: KoziConfig::default(),
        }
    }

    /// Replace the chat pipeline configuration.
    pub fn chat(mut self, chat: ChatConfig) -> Self {
        self.config.chat = chat;
        self
    }

    /// Replace the responder configuration.
    pub fn responder(mut self, responder: ResponderConfig) -> Self {
        self.config.responder = responder;
        self
    }

    /// Replace the transcript storage configuration.
    pub fn storage(mut self, storage: StorageConfig) -> Self {
        self.config.storage = storage;
        self
    }

    /// Finalize and return the built `KoziConfig`.
    pub fn build(self) -> KoziConfig {
        self.config
    }
}

/// Submission pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Bot message seeded into every fresh transcript.
    #[serde(default = "default_welcome_message")]
    pub welcome_message: String,
    /// Bot message appended when reply generation fails.
    #[serde(default = "default_apology_message")]
    pub apology_message: String,
    #[serde(default)]
    pub latency: LatencyConfig,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            welcome_message: default_welcome_message(),
            apology_message: default_apology_message(),
            latency: LatencyConfig::default(),
        }
    }
}

/// Default welcome message for a fresh transcript.
fn default_welcome_message() -> String {
    "Hello! I'm your AI assistant. How can I help you today?".to_string()
}

/// Default apology used when a reply cannot be produced.
fn default_apology_message() -> String {
    "I'm sorry, I encountered an error. Please try again.".to_string()
}

/// Simulated reply latency, drawn uniformly from `[min_ms, max_ms)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LatencyConfig {
    #[serde(default = "default_latency_min_ms")]
    pub min_ms: u64,
    #[serde(default = "default_latency_max_ms")]
    pub max_ms: u64,
}

impl LatencyConfig {
    /// Latency that never suspends.
    pub fn none() -> Self {
        Self {
            min_ms: 0,
            max_ms: 0,
        }
    }
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            min_ms: default_latency_min_ms(),
            max_ms: default_latency_max_ms(),
        }
    }
}

fn default_latency_min_ms() -> u64 {
    1000
}

fn default_latency_max_ms() -> u64 {
    3000
}

/// Keyword rule table overrides.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ResponderConfig {
    /// Ordered categories replacing the built-in table when set.
    #[serde(default)]
    pub rules: Option<Vec<CategoryConfig>>,
    /// Replies used when no category matches.
    #[serde(default)]
    pub fallback: Option<Vec<String>>,
    /// Seed for a deterministic random source.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// A single keyword category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryConfig {
    pub name: String,
    pub keywords: Vec<String>,
    pub replies: Vec<String>,
}

/// Backend used to persist the transcript.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Memory,
}

/// Transcript storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Directory for the file backend (defaults to `.kozi/storage`).
    #[serde(default)]
    pub path: Option<String>,
    /// Storage key holding the serialized transcript.
    #[serde(default = "default_storage_key")]
    pub key: String,
    /// Adopt a previously persisted transcript on initialization instead of
    /// discarding it.
    #[serde(default)]
    pub restore_on_start: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: None,
            key: default_storage_key(),
            restore_on_start: false,
        }
    }
}

/// Default storage key for the transcript.
fn default_storage_key() -> String {
    "koziChatHistory".to_string()
}
