//! In-memory catalog store
//!
//! Keeps the snapshot in process memory. Clones share the same buffer, so a
//! test can hand one clone to a `Catalog` and inspect or sabotage the other.

use std::sync::{Arc, Mutex, MutexGuard};

use super::error::{StorageError, StorageResult};
use super::CatalogStore;

#[derive(Debug, Default)]
struct MemoryState {
    bytes: Option<Vec<u8>>,
    fail_saves: bool,
    save_count: usize,
}

/// Snapshot store backed by a shared in-memory buffer
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `bytes`
    pub fn with_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let store = Self::new();
        store.lock().bytes = Some(bytes.into());
        store
    }

    /// Current stored bytes
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.lock().bytes.clone()
    }

    /// Make subsequent saves fail (or succeed again)
    pub fn set_fail_saves(&self, fail: bool) {
        self.lock().fail_saves = fail;
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.lock().save_count
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl CatalogStore for MemoryStore {
    fn load(&self) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.lock().bytes.clone())
    }

    fn save(&self, bytes: &[u8]) -> StorageResult<()> {
        let mut state = self.lock();
        if state.fail_saves {
            return Err(StorageError::Unavailable(
                "memory store is refusing writes".to_string(),
            ));
        }
        state.bytes = Some(bytes.to_vec());
        state.save_count += 1;
        Ok(())
    }

    fn preserve_corrupt(&self) -> StorageResult<Option<std::path::PathBuf>> {
        self.lock().bytes = None;
        Ok(None)
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
