//! Catalog snapshot format
//!
//! The whole catalog is written as one self-describing JSON document:
//!
//! ```text
//! {
//!   "format": "phototag-catalog",
//!   "version": 1,
//!   "saved_at": "2024-05-01T12:00:00Z",
//!   "albums": [
//!     { "name": "Trip", "photos": [
//!       { "locator": "file:///pics/img1.jpg",
//!         "tags": [ { "kind": "person", "value": "Jon" } ] } ] } ]
//! }
//! ```
//!
//! Record types here are separate from the models so the stored layout can
//! evolve without touching the in-memory graph. Decoding rebuilds the graph
//! through the model methods, so the uniqueness rules hold for loaded data too.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::models::{Album, Photo, Tag, TagKind};

/// Value of the `format` field
pub const FORMAT_NAME: &str = "phototag-catalog";

/// Current snapshot version
pub const CURRENT_VERSION: u32 = 1;

/// Errors that can occur while encoding or decoding a snapshot
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown document format '{0}'")]
    UnknownFormat(String),

    #[error("Unsupported catalog version {0} (this build reads version {})", CURRENT_VERSION)]
    UnsupportedVersion(u32),
}

/// A decoded catalog snapshot
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// When the snapshot was written
    pub saved_at: DateTime<Utc>,
    /// Albums in catalog order
    pub albums: Vec<Album>,
}

/// Just enough of the document to decide whether the body can be read
#[derive(Deserialize)]
struct Header {
    format: String,
    version: u32,
}

#[derive(Serialize, Deserialize)]
struct SnapshotRecord {
    format: String,
    version: u32,
    saved_at: DateTime<Utc>,
    #[serde(default)]
    albums: Vec<AlbumRecord>,
}

#[derive(Serialize, Deserialize)]
struct AlbumRecord {
    name: String,
    #[serde(default)]
    photos: Vec<PhotoRecord>,
}

#[derive(Serialize, Deserialize)]
struct PhotoRecord {
    locator: String,
    #[serde(default)]
    tags: Vec<TagRecord>,
}

#[derive(Serialize, Deserialize)]
struct TagRecord {
    kind: TagKind,
    value: String,
}

impl From<&Album> for AlbumRecord {
    fn from(album: &Album) -> Self {
        Self {
            name: album.name().to_string(),
            photos: album.photos().iter().map(PhotoRecord::from).collect(),
        }
    }
}

impl From<&Photo> for PhotoRecord {
    fn from(photo: &Photo) -> Self {
        Self {
            locator: photo.locator().to_string(),
            tags: photo
                .tags()
                .iter()
                .map(|tag| TagRecord {
                    kind: tag.kind(),
                    value: tag.value().to_string(),
                })
                .collect(),
        }
    }
}

/// Encode albums as a snapshot stamped with the current time
pub fn encode(albums: &[Album]) -> Result<Vec<u8>, DocumentError> {
    encode_at(albums, Utc::now())
}

/// Encode albums as a snapshot stamped with `saved_at`
pub fn encode_at(albums: &[Album], saved_at: DateTime<Utc>) -> Result<Vec<u8>, DocumentError> {
    let record = SnapshotRecord {
        format: FORMAT_NAME.to_string(),
        version: CURRENT_VERSION,
        saved_at,
        albums: albums.iter().map(AlbumRecord::from).collect(),
    };
    Ok(serde_json::to_vec_pretty(&record)?)
}

/// Decode a snapshot
///
/// Entries that would break a uniqueness rule (a second album with the same
/// name, a repeated locator within an album, a repeated tag on a photo) are
/// dropped with a warning; the first occurrence wins.
pub fn decode(bytes: &[u8]) -> Result<Snapshot, DocumentError> {
    let header: Header = serde_json::from_slice(bytes)?;
    if header.format != FORMAT_NAME {
        return Err(DocumentError::UnknownFormat(header.format));
    }
    if header.version != CURRENT_VERSION {
        return Err(DocumentError::UnsupportedVersion(header.version));
    }

    let record: SnapshotRecord = serde_json::from_slice(bytes)?;
    let mut albums: Vec<Album> = Vec::with_capacity(record.albums.len());

    for album_record in record.albums {
        if albums.iter().any(|a| a.is_named(&album_record.name)) {
            warn!(album = %album_record.name, "Dropping album with duplicate name");
            continue;
        }

        let mut album = Album::new(album_record.name);
        for photo_record in album_record.photos {
            let mut photo = Photo::new(photo_record.locator);
            for tag_record in photo_record.tags {
                let tag = Tag::new(tag_record.kind, tag_record.value);
                if !photo.add_tag(tag) {
                    warn!(locator = photo.locator(), "Dropping duplicate tag");
                }
            }

            let locator = photo.locator().to_string();
            if !album.add_photo(photo) {
                warn!(album = album.name(), %locator, "Dropping duplicate photo");
            }
        }
        albums.push(album);
    }

    Ok(Snapshot {
        saved_at: record.saved_at,
        albums,
    })
}
