//! Sharing one catalog between callers
//!
//! `Catalog` is a single-owner value. When several threads need it, wrap it
//! in a [`SharedCatalog`]: every operation runs under one lock covering the
//! album list and every album's photos, so multi-step operations such as
//! moves stay consistent for all readers.

use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use anyhow::Result;
use tracing::debug;

use crate::catalog::Catalog;

/// A catalog behind one coarse lock
#[derive(Clone)]
pub struct SharedCatalog {
    inner: Arc<Mutex<Catalog>>,
}

impl SharedCatalog {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            inner: Arc::new(Mutex::new(catalog)),
        }
    }

    /// Run a read-only operation under the lock
    pub fn with<R>(&self, f: impl FnOnce(&Catalog) -> R) -> R {
        let guard = self.lock();
        f(&*guard)
    }

    /// Run a mutating operation under the lock
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut Catalog) -> R) -> R {
        let mut guard = self.lock();
        f(&mut *guard)
    }

    // Poisoning is ignored: mutators change memory in one step before saving
    fn lock(&self) -> MutexGuard<'_, Catalog> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Opens a shared catalog at most once, on first use
///
/// ```ignore
/// static CATALOG: CatalogCell = CatalogCell::new();
///
/// let catalog = CATALOG.get_or_open(Catalog::open)?;
/// ```
pub struct CatalogCell {
    cell: OnceLock<SharedCatalog>,
    init: Mutex<()>,
}

impl CatalogCell {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
            init: Mutex::new(()),
        }
    }

    /// The shared catalog, if it has been opened
    pub fn get(&self) -> Option<&SharedCatalog> {
        self.cell.get()
    }

    /// Return the shared catalog, calling `open` if this is the first use
    ///
    /// Concurrent first callers wait for one `open`; a failed open leaves the
    /// cell empty so a later call can retry.
    pub fn get_or_open(&self, open: impl FnOnce() -> Result<Catalog>) -> Result<&SharedCatalog> {
        if let Some(shared) = self.cell.get() {
            return Ok(shared);
        }

        let _guard = self.init.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(shared) = self.cell.get() {
            return Ok(shared);
        }

        let catalog = open()?;
        debug!("Opened shared catalog");
        Ok(self.cell.get_or_init(|| SharedCatalog::new(catalog)))
    }
}

impl Default for CatalogCell {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Album, Photo};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn test_concurrent_mutations() {
        let shared = SharedCatalog::new(Catalog::in_memory());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let shared = shared.clone();
                thread::spawn(move || {
                    shared.with_mut(|c| c.add_album(Album::new(format!("Album {}", i))))
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap().unwrap());
        }
        assert_eq!(shared.with(|c| c.album_count()), 8);
    }

    #[test]
    fn test_moves_are_never_observed_half_done() {
        let mut catalog = Catalog::in_memory();
        catalog.add_album(Album::new("A")).unwrap();
        catalog.add_album(Album::new("B")).unwrap();
        catalog.add_photo("A", Photo::new("p.jpg")).unwrap();
        let shared = SharedCatalog::new(catalog);

        let mover = {
            let shared = shared.clone();
            thread::spawn(move || {
                for _ in 0..200 {
                    shared.with_mut(|c| c.move_photo("p.jpg", "A", "B")).unwrap();
                    shared.with_mut(|c| c.move_photo("p.jpg", "B", "A")).unwrap();
                }
            })
        };

        for _ in 0..200 {
            let holders = shared.with(|c| {
                c.albums()
                    .iter()
                    .filter(|a| a.contains_photo("p.jpg"))
                    .count()
            });
            assert_eq!(holders, 1);
        }
        mover.join().unwrap();
    }

    #[test]
    fn test_cell_opens_once() {
        let cell = CatalogCell::new();
        let opens = AtomicUsize::new(0);

        thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    cell.get_or_open(|| {
                        opens.fetch_add(1, Ordering::SeqCst);
                        Ok(Catalog::in_memory())
                    })
                    .unwrap();
                });
            }
        });

        assert_eq!(opens.load(Ordering::SeqCst), 1);
        assert!(cell.get().is_some());
    }

    #[test]
    fn test_cell_retries_after_failed_open() {
        let cell = CatalogCell::new();

        assert!(cell
            .get_or_open(|| anyhow::bail!("store unavailable"))
            .is_err());
        assert!(cell.get().is_none());

        assert!(cell.get_or_open(|| Ok(Catalog::in_memory())).is_ok());
    }
}
