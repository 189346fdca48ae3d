//! The photo catalog
//!
//! The `Catalog` owns every album, answers tag queries, and writes the full
//! snapshot back to its store after each successful mutation.
//!
//! ## Mutation results
//!
//! Mutators return `StorageResult<bool>`:
//! - `Ok(true)`: applied and saved
//! - `Ok(false)`: rejected (duplicate name, missing album, ...); nothing changed
//! - `Err(_)`: applied in memory, but the save failed. The change is not
//!   rolled back; the catalog stays dirty until a later save succeeds.
//!
//! ## Usage
//!
//! ```ignore
//! let mut catalog = Catalog::open()?;
//!
//! catalog.add_album(Album::new("Trip"))?;
//! catalog.add_photo("Trip", Photo::new("/pics/img1.jpg"))?;
//! catalog.add_tag("Trip", "/pics/img1.jpg", Tag::person("Jon"))?;
//!
//! let hits = catalog.search_by_tag(TagKind::Person, "jo");
//! ```

use std::collections::{BTreeSet, HashSet};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{Config, RecoveryPolicy};
use crate::document;
use crate::models::{starts_with_folded, Album, Photo, Tag, TagKind};
use crate::search::{Combinator, SearchHit, SearchRequest};
use crate::storage::{CatalogStore, FileStore, StorageError, StorageResult};

/// Counts shown by status output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub albums: usize,
    pub photos: usize,
    pub tags: usize,
}

/// All albums, their photos, and the store they are saved to
pub struct Catalog {
    /// Albums in insertion order
    albums: Vec<Album>,
    /// Where snapshots go; `None` means nothing is persisted
    store: Option<Box<dyn CatalogStore>>,
    /// Changes applied since the last successful save
    dirty: bool,
    /// Timestamp of the snapshot last loaded or saved
    last_saved: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("albums", &self.albums)
            .field("store", &self.store_location())
            .field("dirty", &self.dirty)
            .field("last_saved", &self.last_saved)
            .finish()
    }
}

impl Catalog {
    /// An empty catalog that is never persisted
    pub fn in_memory() -> Self {
        Self {
            albums: Vec::new(),
            store: None,
            dirty: false,
            last_saved: None,
        }
    }

    /// Open the catalog described by the default configuration
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Self::open_with_config(&config)
    }

    /// Open the file-backed catalog named by `config`
    pub fn open_with_config(config: &Config) -> Result<Self> {
        Self::open_with_store(FileStore::from_config(config), config.recovery)
    }

    /// Open a catalog over any store
    ///
    /// A store with nothing in it is a first run. A store that cannot be read
    /// or decoded either fails the open (`Strict`) or is set aside and
    /// replaced by an empty catalog (`Reset`).
    pub fn open_with_store(
        store: impl CatalogStore + 'static,
        recovery: RecoveryPolicy,
    ) -> Result<Self> {
        let (albums, last_saved) = load_albums(&store, recovery)
            .with_context(|| format!("Failed to open catalog at {}", store.location()))?;

        info!(
            location = %store.location(),
            albums = albums.len(),
            "Opened catalog"
        );

        Ok(Self {
            albums,
            store: Some(Box::new(store)),
            dirty: false,
            last_saved,
        })
    }

    /// Flush outstanding changes and release the store
    ///
    /// If the final save fails the catalog is handed back with the error, so
    /// its unsaved changes can be retried.
    pub fn close(mut self) -> Result<(), (Self, StorageError)> {
        if self.dirty {
            if let Err(e) = self.flush() {
                return Err((self, e));
            }
        }
        info!(location = ?self.store_location(), "Closed catalog");
        Ok(())
    }

    // ==================== Album Operations ====================

    /// All albums in catalog order
    pub fn albums(&self) -> &[Album] {
        &self.albums
    }

    pub fn album_count(&self) -> usize {
        self.albums.len()
    }

    /// Find an album by name, ignoring case
    pub fn album(&self, name: &str) -> Option<&Album> {
        self.albums.iter().find(|a| a.is_named(name))
    }

    pub fn contains_album(&self, name: &str) -> bool {
        self.album(name).is_some()
    }

    /// Append an album unless one with the same name (ignoring case) exists
    pub fn add_album(&mut self, album: Album) -> StorageResult<bool> {
        if self.contains_album(album.name()) {
            debug!(album = album.name(), "Rejected duplicate album");
            return Ok(false);
        }
        self.albums.push(album);
        self.commit()
    }

    /// Remove an album and every photo in it
    pub fn remove_album(&mut self, name: &str) -> StorageResult<bool> {
        let Some(idx) = self.position(name) else {
            return Ok(false);
        };
        self.albums.remove(idx);
        self.commit()
    }

    /// Rename an album
    ///
    /// Fails if a different album already uses `new_name` (ignoring case).
    /// Renaming an album to a case variant of its own name is allowed.
    pub fn rename_album(&mut self, name: &str, new_name: &str) -> StorageResult<bool> {
        let Some(idx) = self.position(name) else {
            return Ok(false);
        };
        let taken = self
            .albums
            .iter()
            .enumerate()
            .any(|(i, a)| i != idx && a.is_named(new_name));
        if taken {
            debug!(album = name, new_name, "Rejected rename to existing name");
            return Ok(false);
        }
        self.albums[idx].rename(new_name);
        self.commit()
    }

    // ==================== Photo Operations ====================

    /// Add a photo to an album unless its locator is already there
    pub fn add_photo(&mut self, album: &str, photo: Photo) -> StorageResult<bool> {
        let Some(idx) = self.position(album) else {
            return Ok(false);
        };
        if !self.albums[idx].add_photo(photo) {
            return Ok(false);
        }
        self.commit()
    }

    /// Remove a photo (and its tags) from an album
    pub fn remove_photo(&mut self, album: &str, locator: &str) -> StorageResult<bool> {
        let Some(idx) = self.position(album) else {
            return Ok(false);
        };
        if self.albums[idx].remove_photo(locator).is_none() {
            return Ok(false);
        }
        self.commit()
    }

    /// Move a photo, tags included, from `source` to `target`
    ///
    /// Fails without changes if either album is missing, the photo is not in
    /// `source`, or `target` already holds a photo with the same locator.
    pub fn move_photo(&mut self, locator: &str, source: &str, target: &str) -> StorageResult<bool> {
        let (Some(src), Some(dst)) = (self.position(source), self.position(target)) else {
            return Ok(false);
        };
        if self.albums[dst].contains_photo(locator) {
            debug!(locator, target, "Rejected move into album that has the photo");
            return Ok(false);
        }
        let Some(photo) = self.albums[src].remove_photo(locator) else {
            return Ok(false);
        };
        self.albums[dst].add_photo(photo);
        self.commit()
    }

    /// Look up a photo in a named album
    pub fn photo(&self, album: &str, locator: &str) -> Option<&Photo> {
        self.album(album)?.photo_by_locator(locator)
    }

    // ==================== Tag Operations ====================

    /// Tag a photo; fails if the photo is missing or already has the tag
    pub fn add_tag(&mut self, album: &str, locator: &str, tag: Tag) -> StorageResult<bool> {
        let Some(photo) = self.photo_mut(album, locator) else {
            return Ok(false);
        };
        if !photo.add_tag(tag) {
            return Ok(false);
        }
        self.commit()
    }

    /// Remove a tag (matched ignoring case) from a photo
    pub fn remove_tag(&mut self, album: &str, locator: &str, tag: &Tag) -> StorageResult<bool> {
        let Some(photo) = self.photo_mut(album, locator) else {
            return Ok(false);
        };
        if !photo.remove_tag(tag) {
            return Ok(false);
        }
        self.commit()
    }

    /// Every distinct value of `kind` across the catalog
    ///
    /// Values are distinct as written: `Jon` and `jon` are both reported.
    pub fn all_tag_values(&self, kind: TagKind) -> BTreeSet<&str> {
        self.photos()
            .flat_map(|(photo, _)| photo.tag_values(kind))
            .collect()
    }

    /// Values of `kind` starting with `prefix` (ignoring case), for suggestions
    pub fn tag_values_with_prefix(&self, kind: TagKind, prefix: &str) -> Vec<&str> {
        self.all_tag_values(kind)
            .into_iter()
            .filter(|value| starts_with_folded(value, prefix))
            .collect()
    }

    // ==================== Search ====================

    /// Photos with a `kind` tag whose value starts with `prefix`
    pub fn search_by_tag(&self, kind: TagKind, prefix: &str) -> Vec<SearchHit<'_>> {
        self.collect_hits(|photo| photo.has_tag_with_prefix(kind, prefix))
    }

    /// Photos matching both conditions
    pub fn search_by_tags_and(
        &self,
        kind1: TagKind,
        prefix1: &str,
        kind2: TagKind,
        prefix2: &str,
    ) -> Vec<SearchHit<'_>> {
        self.collect_hits(|photo| {
            photo.has_tag_with_prefix(kind1, prefix1) && photo.has_tag_with_prefix(kind2, prefix2)
        })
    }

    /// Photos matching either condition
    ///
    /// A locator is reported once, at its first position in traversal order,
    /// even if it appears in several albums.
    pub fn search_by_tags_or(
        &self,
        kind1: TagKind,
        prefix1: &str,
        kind2: TagKind,
        prefix2: &str,
    ) -> Vec<SearchHit<'_>> {
        self.collect_unique_hits(|photo| {
            photo.has_tag_with_prefix(kind1, prefix1) || photo.has_tag_with_prefix(kind2, prefix2)
        })
    }

    /// Run a search as submitted from a search form
    ///
    /// An empty primary prefix returns nothing. An empty secondary prefix
    /// falls back to the single-query search.
    pub fn search(&self, request: &SearchRequest) -> Vec<SearchHit<'_>> {
        let primary = &request.primary;
        if primary.prefix.is_empty() {
            return Vec::new();
        }

        match &request.secondary {
            Some((Combinator::And, second)) if !second.prefix.is_empty() => {
                self.collect_hits(|photo| primary.matches(photo) && second.matches(photo))
            }
            Some((Combinator::Or, second)) if !second.prefix.is_empty() => {
                self.collect_unique_hits(|photo| primary.matches(photo) || second.matches(photo))
            }
            _ => self.collect_hits(|photo| primary.matches(photo)),
        }
    }

    // ==================== Stats ====================

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            albums: self.albums.len(),
            photos: self.albums.iter().map(Album::photo_count).sum(),
            tags: self.photos().map(|(photo, _)| photo.tags().len()).sum(),
        }
    }

    // ==================== Persistence ====================

    /// True if changes are applied in memory but not yet saved
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// When the current state was last loaded from or written to the store
    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.last_saved
    }

    /// Description of the backing store, `None` for in-memory catalogs
    pub fn store_location(&self) -> Option<String> {
        self.store.as_ref().map(|s| s.location())
    }

    /// Write the full snapshot to the store
    ///
    /// Without a store this does nothing.
    pub fn flush(&mut self) -> StorageResult<()> {
        let Some(store) = self.store.as_ref() else {
            self.dirty = false;
            return Ok(());
        };

        let now = Utc::now();
        let result = document::encode_at(&self.albums, now)
            .map_err(StorageError::Encode)
            .and_then(|bytes| store.save(&bytes));

        match result {
            Ok(()) => {
                self.dirty = false;
                self.last_saved = Some(now);
                debug!(location = %store.location(), "Saved catalog");
                Ok(())
            }
            Err(e) => {
                warn!(
                    location = %store.location(),
                    error = %e,
                    "Failed to save catalog; changes are kept in memory"
                );
                Err(e)
            }
        }
    }

    fn commit(&mut self) -> StorageResult<bool> {
        self.dirty = true;
        self.flush()?;
        Ok(true)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.albums.iter().position(|a| a.is_named(name))
    }

    fn photo_mut(&mut self, album: &str, locator: &str) -> Option<&mut Photo> {
        let idx = self.position(album)?;
        self.albums[idx].photo_by_locator_mut(locator)
    }

    /// Every photo with its album, albums in order, photos in album order
    fn photos(&self) -> impl Iterator<Item = (&Photo, &Album)> + '_ {
        self.albums
            .iter()
            .flat_map(|album| album.photos().iter().map(move |photo| (photo, album)))
    }

    fn collect_hits(&self, predicate: impl Fn(&Photo) -> bool) -> Vec<SearchHit<'_>> {
        self.photos()
            .filter(|&(photo, _)| predicate(photo))
            .map(|(photo, album)| SearchHit { photo, album })
            .collect()
    }

    /// Like `collect_hits`, keeping only the first hit for each locator
    fn collect_unique_hits(&self, predicate: impl Fn(&Photo) -> bool) -> Vec<SearchHit<'_>> {
        let mut seen = HashSet::new();
        self.photos()
            .filter(|&(photo, _)| predicate(photo))
            .filter(|&(photo, _)| seen.insert(photo.locator()))
            .map(|(photo, album)| SearchHit { photo, album })
            .collect()
    }
}

/// Read the stored snapshot, applying the recovery policy
fn load_albums(
    store: &dyn CatalogStore,
    recovery: RecoveryPolicy,
) -> StorageResult<(Vec<Album>, Option<DateTime<Utc>>)> {
    let bytes = match store.load() {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            info!(location = %store.location(), "No saved catalog, starting empty");
            return Ok((Vec::new(), None));
        }
        Err(e) if recovery == RecoveryPolicy::Reset => {
            set_aside(store, &e)?;
            return Ok((Vec::new(), None));
        }
        Err(e) => return Err(e),
    };

    match document::decode(&bytes) {
        Ok(snapshot) => {
            debug!(saved_at = %snapshot.saved_at, "Decoded catalog snapshot");
            Ok((snapshot.albums, Some(snapshot.saved_at)))
        }
        Err(source) if recovery == RecoveryPolicy::Reset => {
            set_aside(store, &source)?;
            Ok((Vec::new(), None))
        }
        Err(source) => Err(StorageError::CorruptDocument {
            location: store.location(),
            source,
        }),
    }
}

/// Move unusable stored data out of the way before starting empty
///
/// If the data cannot be moved, opening fails: the next save would
/// overwrite it.
fn set_aside(store: &dyn CatalogStore, cause: &dyn std::fmt::Display) -> StorageResult<()> {
    match store.preserve_corrupt() {
        Ok(Some(backup)) => {
            warn!(
                error = %cause,
                backup = %backup.display(),
                "Catalog is unreadable; kept a backup and starting empty"
            );
            Ok(())
        }
        Ok(None) => {
            warn!(error = %cause, "Catalog is unreadable; starting empty");
            Ok(())
        }
        Err(e) => {
            warn!(
                error = %cause,
                backup_error = %e,
                "Catalog is unreadable and could not be backed up"
            );
            Err(e)
        }
    }
}
