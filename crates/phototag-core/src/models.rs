//! Data models for phototag
//!
//! Defines the core data structures: Tag, Photo, and Album.
//!
//! Identity rules differ per type:
//! - `Tag`: kind and value, compared case-insensitively
//! - `Photo`: locator, compared exactly
//! - `Album`: name, compared case-insensitively
//!
//! Case-insensitive identity is computed from a folded shadow key, the stored
//! strings keep the casing the user typed.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::resolver::{self, NameResolver};

/// Fold a string into the key used for case-insensitive membership.
pub(crate) fn fold(s: &str) -> String {
    s.to_lowercase()
}

/// Case-insensitive string equality
pub(crate) fn eq_folded(a: &str, b: &str) -> bool {
    a == b || fold(a) == fold(b)
}

/// Case-insensitive "starts with". An empty prefix always matches.
pub(crate) fn starts_with_folded(value: &str, prefix: &str) -> bool {
    prefix.is_empty() || fold(value).starts_with(&fold(prefix))
}

/// The category of a tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    Person,
    Location,
}

impl TagKind {
    /// Every kind, in display order
    pub const ALL: [TagKind; 2] = [TagKind::Person, TagKind::Location];

    /// Lower-case name used in storage and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            TagKind::Person => "person",
            TagKind::Location => "location",
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when text does not name a known tag kind
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown tag kind '{0}'. Valid kinds: person, location")]
pub struct ParseTagKindError(pub String);

impl FromStr for TagKind {
    type Err = ParseTagKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TagKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseTagKindError(s.to_string()))
    }
}

/// A typed tag attached to a photo
///
/// Equality and hashing ignore case, so `person: Jon` and `PERSON: jon`
/// are the same tag.
#[derive(Debug, Clone, Serialize)]
pub struct Tag {
    kind: TagKind,
    value: String,
}

impl Tag {
    /// Create a new tag
    pub fn new(kind: TagKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    /// Shorthand for a person tag
    pub fn person(value: impl Into<String>) -> Self {
        Self::new(TagKind::Person, value)
    }

    /// Shorthand for a location tag
    pub fn location(value: impl Into<String>) -> Self {
        Self::new(TagKind::Location, value)
    }

    pub fn kind(&self) -> TagKind {
        self.kind
    }

    /// The value with its original casing
    pub fn value(&self) -> &str {
        &self.value
    }

    /// True if the kind matches and the value starts with `prefix`, ignoring case
    pub fn matches_prefix(&self, kind: TagKind, prefix: &str) -> bool {
        self.kind == kind && starts_with_folded(&self.value, prefix)
    }

    /// True if kind and value both match, ignoring case
    pub fn matches_exact(&self, kind: TagKind, value: &str) -> bool {
        self.kind == kind && eq_folded(&self.value, value)
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.matches_exact(other.kind, &other.value)
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        fold(&self.value).hash(state);
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.value)
    }
}

/// A photo, identified by the locator of the underlying image
#[derive(Debug, Clone, Serialize)]
pub struct Photo {
    locator: String,
    tags: Vec<Tag>,
}

impl Photo {
    /// Create an untagged photo for the given locator (URI or path)
    pub fn new(locator: impl Into<String>) -> Self {
        Self {
            locator: locator.into(),
            tags: Vec::new(),
        }
    }

    pub fn locator(&self) -> &str {
        &self.locator
    }

    /// Tags in insertion order
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Add a tag unless an equal one (ignoring case) is already present
    ///
    /// Returns `false` and leaves the photo untouched on a duplicate.
    pub fn add_tag(&mut self, tag: Tag) -> bool {
        if self.tags.contains(&tag) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    /// Remove the tag equal to `tag` (ignoring case)
    pub fn remove_tag(&mut self, tag: &Tag) -> bool {
        match self.tags.iter().position(|t| t == tag) {
            Some(pos) => {
                self.tags.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn has_tag_with_prefix(&self, kind: TagKind, prefix: &str) -> bool {
        self.tags.iter().any(|t| t.matches_prefix(kind, prefix))
    }

    pub fn has_tag(&self, kind: TagKind, value: &str) -> bool {
        self.tags.iter().any(|t| t.matches_exact(kind, value))
    }

    /// Values of every tag of `kind`, in insertion order
    pub fn tag_values(&self, kind: TagKind) -> Vec<&str> {
        self.tags
            .iter()
            .filter(|t| t.kind == kind)
            .map(|t| t.value.as_str())
            .collect()
    }

    /// Human-readable name derived from the locator
    ///
    /// A resolver, when given, may supply a better name (for example one
    /// registered with a media store). Either way the extension is dropped.
    pub fn display_name(&self, resolver: Option<&dyn NameResolver>) -> String {
        resolver::display_name(&self.locator, resolver)
    }
}

impl PartialEq for Photo {
    fn eq(&self, other: &Self) -> bool {
        self.locator == other.locator
    }
}

impl Eq for Photo {}

impl Hash for Photo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.locator.hash(state);
    }
}

/// A named, ordered collection of photos
#[derive(Debug, Clone, Serialize)]
pub struct Album {
    name: String,
    photos: Vec<Photo>,
}

impl Album {
    /// Create an empty album
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            photos: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the album
    ///
    /// No uniqueness check happens here; the catalog owns that rule because
    /// only it can see sibling albums.
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// True if this album is named `name`, ignoring case
    pub fn is_named(&self, name: &str) -> bool {
        eq_folded(&self.name, name)
    }

    /// Photos in insertion order
    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn photo_count(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// Append a photo unless one with the same locator is already here
    pub fn add_photo(&mut self, photo: Photo) -> bool {
        if self.contains_photo(photo.locator()) {
            return false;
        }
        self.photos.push(photo);
        true
    }

    /// Take the photo with `locator` out of the album, handing back ownership
    pub fn remove_photo(&mut self, locator: &str) -> Option<Photo> {
        let pos = self.photos.iter().position(|p| p.locator == locator)?;
        Some(self.photos.remove(pos))
    }

    pub fn contains_photo(&self, locator: &str) -> bool {
        self.photos.iter().any(|p| p.locator == locator)
    }

    pub fn photo_by_locator(&self, locator: &str) -> Option<&Photo> {
        self.photos.iter().find(|p| p.locator == locator)
    }

    pub fn photo_by_locator_mut(&mut self, locator: &str) -> Option<&mut Photo> {
        self.photos.iter_mut().find(|p| p.locator == locator)
    }
}

impl PartialEq for Album {
    fn eq(&self, other: &Self) -> bool {
        self.is_named(&other.name)
    }
}

impl Eq for Album {}

impl Hash for Album {
    fn hash<H: Hasher>(&self, state: &mut H) {
        fold(&self.name).hash(state);
    }
}

impl fmt::Display for Album {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
