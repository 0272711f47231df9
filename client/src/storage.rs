//! Key-value storage abstraction
//!
//! Browser local storage is an external collaborator, so it sits behind a
//! trait: `MemoryStore` for tests and ephemeral sessions, `FileStore` for
//! a persistent single-file JSON document. Failures on write are logged
//! and swallowed; persistence is best-effort by contract.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Persisted storage keys. Tokens are duplicated under two historical
/// naming schemes for compatibility with documents written by older
/// frontend versions.
pub mod keys {
    pub const TOKEN: &str = "token";
    pub const ACCESS_TOKEN: &str = "access_token";
    pub const REFRESH_TOKEN_CAMEL: &str = "refreshToken";
    pub const REFRESH_TOKEN: &str = "refresh_token";
    pub const TOKEN_EXPIRY: &str = "tokenExpiry";
    pub const USER_DATA: &str = "userData";
    pub const DEMO_MODE: &str = "demo_mode";
}

/// Minimal key-value service contract, mirroring `localStorage`.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory store backed by a mutex-guarded map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }
}

/// File-backed store. The whole map is written out as one JSON object on
/// every mutation; individual get/set calls are serialized by the inner
/// mutex but read-modify-write sequences spanning several calls are not.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Open a store at `path`, loading any existing content. An unreadable
    /// or unparsable file starts an empty store rather than failing.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = std::fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    fn persist(&self, entries: &HashMap<String, String>) {
        match serde_json::to_string(entries) {
            Ok(raw) => {
                if let Err(err) = std::fs::write(&self.path, raw) {
                    tracing::error!("Failed to persist store to {:?}: {}", self.path, err);
                }
            }
            Err(err) => tracing::error!("Failed to serialize store: {}", err),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
            self.persist(&entries);
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
            self.persist(&entries);
        }
    }
}
