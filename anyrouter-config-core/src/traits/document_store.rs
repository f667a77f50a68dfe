//! 文档存储抽象 Trait

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{CoreError, CoreResult};

/// Keyed raw-text storage, the local-storage analogue the persisted document lives in
///
/// Implementations only move text; encoding, decoding and version handling stay in
/// the core. Every call is synchronous and local.
///
/// Platform implementation:
/// - `JsonFileStore` (anyrouter-config-app): one JSON file per key in a data directory
/// - `InMemoryDocumentStore`: process-local, for tests and ephemeral sessions
pub trait DocumentStore: Send + Sync {
    /// Reads the raw text stored under `key`
    ///
    /// # Returns
    /// * `Ok(Some(raw))` - a value is stored
    /// * `Ok(None)` - nothing stored under `key`
    fn read(&self, key: &str) -> CoreResult<Option<String>>;

    /// Overwrites the value under `key` wholesale
    ///
    /// # Arguments
    /// * `key` - storage key
    /// * `raw` - serialized document
    fn write(&self, key: &str, raw: &str) -> CoreResult<()>;

    /// Deletes the value under `key`; deleting a missing key is not an error
    fn remove(&self, key: &str) -> CoreResult<()>;
}

/// In-memory document store
///
/// Default implementation, available on all platforms.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> CoreError {
    CoreError::StorageError("in-memory store lock poisoned".to_string())
}

impl DocumentStore for InMemoryDocumentStore {
    fn read(&self, key: &str) -> CoreResult<Option<String>> {
        Ok(self.entries.read().map_err(poisoned)?.get(key).cloned())
    }

    fn write(&self, key: &str, raw: &str) -> CoreResult<()> {
        self.entries
            .write()
            .map_err(poisoned)?
            .insert(key.to_string(), raw.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        self.entries.write().map_err(poisoned)?.remove(key);
        Ok(())
    }
}
