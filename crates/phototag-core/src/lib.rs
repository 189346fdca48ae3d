//! phototag Core Library
//!
//! This crate provides the core functionality for phototag: photos grouped
//! into named albums, tagged with people and locations, and found again with
//! prefix tag searches.
//!
//! # Architecture
//!
//! - **Catalog**: owns the album graph, runs queries, saves after mutations
//! - **Snapshot**: versioned JSON document holding the whole catalog
//! - **Store**: moves snapshot bytes to and from durable storage
//!
//! All queries are served directly from the in-memory graph.
//!
//! # Quick Start
//!
//! ```text
//! let mut catalog = Catalog::open()?;
//!
//! // Add an album with a tagged photo
//! catalog.add_album(Album::new("Trip"))?;
//! catalog.add_photo("Trip", Photo::new("/pics/img1.jpg"))?;
//! catalog.add_tag("Trip", "/pics/img1.jpg", Tag::person("Jon"))?;
//!
//! // Query photos
//! let hits = catalog.search_by_tag(TagKind::Person, "jo");
//! ```
//!
//! # Modules
//!
//! - `catalog`: Album/photo/tag operations and search (main entry point)
//! - `models`: Tag, Photo and Album
//! - `search`: Query and result types
//! - `document`: Snapshot encoding
//! - `storage`: Snapshot persistence
//! - `resolver`: Photo display names
//! - `shared`: Catalog access from several threads
//! - `config`: Application configuration

pub mod catalog;
pub mod config;
pub mod document;
pub mod models;
pub mod resolver;
pub mod search;
pub mod shared;
pub mod storage;

pub use catalog::{Catalog, CatalogStats};
pub use config::{Config, RecoveryPolicy};
pub use document::{DocumentError, Snapshot};
pub use models::{Album, ParseTagKindError, Photo, Tag, TagKind};
pub use resolver::NameResolver;
pub use search::{Combinator, SearchHit, SearchRequest, TagQuery};
pub use shared::{CatalogCell, SharedCatalog};
pub use storage::{CatalogStore, FileStore, MemoryStore, StorageError, StorageResult};
