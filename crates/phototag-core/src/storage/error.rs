//! Storage error handling
//!
//! Errors a snapshot store can raise while reading, writing or setting aside
//! the catalog file, plus the snapshot encoding failures the catalog reports
//! through the same type.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::document::DocumentError;

/// Errors from loading or saving the catalog snapshot
#[derive(Error, Debug)]
pub enum StorageError {
    /// The snapshot's directory could not be created
    #[error("Failed to create data directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Permission denied: cannot access '{path}'")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No space left to save '{path}'")]
    DiskFull {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read catalog '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write catalog '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Replacing the snapshot, or moving a damaged one aside, failed
    #[error("Failed to move '{from}' to '{to}': {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Stored catalog could not be decoded
    #[error("Catalog at '{location}' is corrupted: {source}")]
    CorruptDocument {
        location: String,
        #[source]
        source: DocumentError,
    },

    #[error("Failed to encode catalog: {0}")]
    Encode(#[source] DocumentError),

    /// Store refused the operation (in-memory stores)
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    /// Error for a failed read of `path`
    pub fn reading(path: &Path, source: io::Error) -> Self {
        classify(path, source).unwrap_or_else(|source| StorageError::Read {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Error for a failed write of `path`
    pub fn writing(path: &Path, source: io::Error) -> Self {
        classify(path, source).unwrap_or_else(|source| StorageError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// What the user can do about this error, if anything
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            StorageError::DiskFull { .. } => Some("Free up disk space and try again."),
            StorageError::PermissionDenied { .. } => {
                Some("Check the permissions of the data directory and the catalog file.")
            }
            StorageError::CorruptDocument { .. } => {
                Some("Set recovery = \"reset\" to start from an empty catalog; the damaged file is kept as a .corrupt.backup copy.")
            }
            StorageError::CreateDirectory { .. } => {
                Some("Check data_dir in the configuration, or point catalog_file somewhere writable.")
            }
            _ => None,
        }
    }
}

/// Pick out the failures with a specific remedy; hand back the rest
fn classify(path: &Path, source: io::Error) -> Result<StorageError, io::Error> {
    let path = path.to_path_buf();
    if source.kind() == io::ErrorKind::PermissionDenied {
        Ok(StorageError::PermissionDenied { path, source })
    } else if is_disk_full(&source) {
        Ok(StorageError::DiskFull { path, source })
    } else {
        Err(source)
    }
}

// ENOSPC on unix, ERROR_DISK_FULL on windows
fn is_disk_full(error: &io::Error) -> bool {
    matches!(error.raw_os_error(), Some(28) | Some(112))
        || error.to_string().to_lowercase().contains("no space left")
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_classification() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err = StorageError::writing(Path::new("/test/path"), io_err);

        assert!(matches!(err, StorageError::PermissionDenied { .. }));
        assert!(err.to_string().contains("/test/path"));
        assert!(err.recovery_suggestion().is_some());
    }

    #[test]
    fn test_disk_full_detection() {
        let by_code = StorageError::writing(Path::new("/full"), io::Error::from_raw_os_error(28));
        assert!(matches!(by_code, StorageError::DiskFull { .. }));

        let by_message = io::Error::new(io::ErrorKind::Other, "No space left on device");
        let err = StorageError::writing(Path::new("/full"), by_message);
        assert!(matches!(err, StorageError::DiskFull { .. }));
    }

    #[test]
    fn test_unclassified_errors_keep_direction() {
        let read = StorageError::reading(
            Path::new("/data/catalog.json"),
            io::Error::new(io::ErrorKind::InvalidData, "bad sector"),
        );
        assert!(matches!(read, StorageError::Read { .. }));
        assert!(read.recovery_suggestion().is_none());

        let write = StorageError::writing(
            Path::new("/data/catalog.tmp"),
            io::Error::new(io::ErrorKind::Interrupted, "interrupted"),
        );
        assert!(matches!(write, StorageError::Write { .. }));
    }

    #[test]
    fn test_corrupt_document_display() {
        let err = StorageError::CorruptDocument {
            location: "/data/catalog.json".to_string(),
            source: DocumentError::UnsupportedVersion(9),
        };

        let msg = err.to_string();
        assert!(msg.contains("corrupted"));
        assert!(msg.contains("/data/catalog.json"));
        assert!(err.recovery_suggestion().unwrap().contains("backup"));
    }
}
