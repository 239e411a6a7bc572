//! Storage layer
//!
//! Moves document bytes to and from a backing medium. The store above it
//! owns the JSON schema; this layer only knows which document it is
//! handling and where it lives.
//!
//! ## Backends
//!
//! - **JsonFileStorage**: `content.json` and `settings.json` in the data
//!   directory, written atomically
//! - **MemoryStorage**: in-process, for tests and ephemeral runs

use std::fmt;

pub mod error;
pub mod persistence;

pub use error::{StorageError, StorageResult};
pub use persistence::{DocumentStorage, JsonFileStorage, MemoryStorage, StorageStats};

/// The two documents the site is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Content,
    Settings,
}

impl DocumentKind {
    /// File name used by file-backed storage
    pub fn file_name(self) -> &'static str {
        match self {
            DocumentKind::Content => "content.json",
            DocumentKind::Settings => "settings.json",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Content => write!(f, "content"),
            DocumentKind::Settings => write!(f, "settings"),
        }
    }
}
