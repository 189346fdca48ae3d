//! File-backed catalog persistence
//!
//! Saves and loads the catalog snapshot to/from the filesystem.
//! Uses atomic writes (write to temp file, then rename) to prevent corruption.
//!
//! Storage location: `~/.local/share/phototag/catalog.json` (configurable via `Config`)

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::{StorageError, StorageResult};
use super::CatalogStore;
use crate::config::Config;

/// Catalog snapshot kept in a single file
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store for the snapshot file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store at the location named by the configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.catalog_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if a snapshot exists on disk
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Size of the snapshot in bytes, if it exists
    pub fn size(&self) -> Option<u64> {
        fs::metadata(&self.path).ok().map(|m| m.len())
    }

    /// Where an unreadable snapshot is moved by [`CatalogStore::preserve_corrupt`]
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| OsString::from("catalog"));
        name.push(".corrupt.backup");
        self.path.with_file_name(name)
    }
}

impl CatalogStore for FileStore {
    fn load(&self) -> StorageResult<Option<Vec<u8>>> {
        if !self.path.exists() {
            debug!(path = ?self.path, "No catalog on disk");
            return Ok(None);
        }

        let bytes = fs::read(&self.path).map_err(|e| StorageError::reading(&self.path, e))?;
        debug!(path = ?self.path, bytes = bytes.len(), "Read catalog");
        Ok(Some(bytes))
    }

    fn save(&self, bytes: &[u8]) -> StorageResult<()> {
        atomic_write(&self.path, bytes)?;
        debug!(path = ?self.path, bytes = bytes.len(), "Wrote catalog");
        Ok(())
    }

    fn preserve_corrupt(&self) -> StorageResult<Option<PathBuf>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let backup = self.backup_path();
        fs::rename(&self.path, &backup).map_err(|source| StorageError::Rename {
            from: self.path.clone(),
            to: backup.clone(),
            source,
        })?;
        Ok(Some(backup))
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
///
/// This ensures the target file is never left in a partially-written state.
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    // Same directory, so the rename stays on one filesystem
    let temp_path = path.with_extension("tmp");

    let mut file = File::create(&temp_path).map_err(|e| StorageError::writing(&temp_path, e))?;
    file.write_all(data)
        .map_err(|e| StorageError::writing(&temp_path, e))?;
    file.sync_all()
        .map_err(|e| StorageError::writing(&temp_path, e))?;

    if let Err(source) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(StorageError::Rename {
            from: temp_path,
            to: path.to_path_buf(),
            source,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("catalog.json"));

        // Initially nothing stored
        assert!(!store.exists());
        assert!(store.load().unwrap().is_none());

        store.save(b"{\"albums\": []}").unwrap();
        assert!(store.exists());
        assert_eq!(store.size(), Some(14));

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, b"{\"albums\": []}");
    }

    #[test]
    fn test_save_replaces_previous_contents() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("catalog.json"));

        store.save(b"first version, rather long").unwrap();
        store.save(b"second").unwrap();

        assert_eq!(store.load().unwrap().unwrap(), b"second");
        assert!(!temp_dir.path().join("catalog.tmp").exists());
    }

    #[test]
    fn test_from_config() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            data_dir: temp_dir.path().to_path_buf(),
            ..Config::default()
        };

        let store = FileStore::from_config(&config);
        assert_eq!(store.path(), temp_dir.path().join("catalog.json"));
        assert_eq!(store.location(), store.path().display().to_string());
    }

    #[test]
    fn test_preserve_corrupt_moves_file_aside() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("catalog.json"));

        // Nothing to preserve yet
        assert!(store.preserve_corrupt().unwrap().is_none());

        store.save(b"not json").unwrap();
        let backup = store.preserve_corrupt().unwrap().unwrap();

        assert_eq!(backup, temp_dir.path().join("catalog.json.corrupt.backup"));
        assert!(!store.exists());
        assert_eq!(fs::read(&backup).unwrap(), b"not json");
    }

    #[test]
    fn test_unreadable_path_is_read_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("catalog.json");
        fs::create_dir(&path).unwrap();
        let store = FileStore::new(&path);

        let err = store.load().unwrap_err();
        assert!(matches!(err, StorageError::Read { .. }));

        // Whatever sits at the path can still be moved aside
        let backup = store.preserve_corrupt().unwrap().unwrap();
        assert!(backup.is_dir());
        assert!(!store.exists());
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let nested_path = temp_dir
            .path()
            .join("a")
            .join("b")
            .join("c")
            .join("file.json");

        atomic_write(&nested_path, b"test data").unwrap();

        assert!(nested_path.exists());
        let content = fs::read_to_string(&nested_path).unwrap();
        assert_eq!(content, "test data");
    }

    #[test]
    fn test_save_into_file_parent_fails() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, b"i am a file").unwrap();

        let store = FileStore::new(blocker.join("catalog.json"));
        let err = store.save(b"data").unwrap_err();
        assert!(matches!(err, StorageError::CreateDirectory { .. }));
    }
}
