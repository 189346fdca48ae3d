//! Storage layer
//!
//! The catalog is persisted as one opaque snapshot (see [`crate::document`]).
//! A [`CatalogStore`] only moves those bytes in and out of durable storage;
//! it knows nothing about albums or photos.
//!
//! - [`FileStore`]: a single file, written atomically (temp file + rename)
//! - [`MemoryStore`]: process memory, for tests and throwaway catalogs

pub mod error;
pub mod memory;
pub mod persistence;

use std::path::PathBuf;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryStore;
pub use persistence::FileStore;

/// Durable home for the catalog snapshot
pub trait CatalogStore: Send {
    /// Read the last saved snapshot, `None` if nothing was ever saved
    fn load(&self) -> StorageResult<Option<Vec<u8>>>;

    /// Replace the stored snapshot with `bytes`
    fn save(&self, bytes: &[u8]) -> StorageResult<()>;

    /// Move an unreadable snapshot aside so the next save starts clean
    ///
    /// Returns where the old data went, if the store keeps it anywhere.
    fn preserve_corrupt(&self) -> StorageResult<Option<PathBuf>> {
        Ok(None)
    }

    /// Human-readable description of where data lives
    fn location(&self) -> String;
}
