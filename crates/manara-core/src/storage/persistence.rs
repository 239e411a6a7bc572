//! Document persistence
//!
//! Handles saving and loading the content and settings documents.
//! File-backed storage uses atomic writes (write to a uniquely named temp
//! file, then rename) so a reader never observes a partially-written
//! document, even with several processes writing the same data directory.
//!
//! Storage location: `~/.local/share/manara/` (configurable via `Config`)
//!
//! Files:
//! - `content.json` - SiteContent
//! - `settings.json` - SiteSettings
//! - `<name>.corrupt-<timestamp>` - copies of unreadable documents, kept
//!   before they are overwritten

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::debug;

use super::error::{StorageError, StorageResult};
use super::DocumentKind;
use crate::config::Config;

/// A medium the two documents can be stored in
pub trait DocumentStorage: Send + Sync {
    /// Read the raw bytes of a document
    ///
    /// Returns `None` if the document has never been written.
    fn read(&self, kind: DocumentKind) -> StorageResult<Option<Vec<u8>>>;

    /// Replace the document with `data`, all or nothing
    fn write(&self, kind: DocumentKind, data: &[u8]) -> StorageResult<()>;

    /// Forget the document; removing a missing document is not an error
    fn remove(&self, kind: DocumentKind) -> StorageResult<()>;

    /// Where the document lives, for messages
    fn location(&self, kind: DocumentKind) -> PathBuf;

    /// Size in bytes of the stored document, if present
    fn size(&self, kind: DocumentKind) -> Option<u64>;

    /// Copy the stored bytes aside, leaving the document itself in place
    ///
    /// Returns where the copy went, or `None` if nothing is stored.
    fn backup(&self, kind: DocumentKind) -> StorageResult<Option<PathBuf>>;
}

/// Load and parse a document
///
/// Returns `None` if nothing is stored. Bytes that don't match the schema
/// are reported as `InvalidFormat`.
pub fn load_json<T: DeserializeOwned>(
    storage: &dyn DocumentStorage,
    kind: DocumentKind,
) -> StorageResult<Option<T>> {
    let Some(bytes) = storage.read(kind)? else {
        return Ok(None);
    };

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| StorageError::InvalidFormat {
            path: storage.location(kind),
            details: e.to_string(),
        })
}

/// Serialize a document as pretty JSON and write it
pub fn save_json<T: Serialize>(
    storage: &dyn DocumentStorage,
    kind: DocumentKind,
    value: &T,
) -> StorageResult<()> {
    let bytes = serde_json::to_vec_pretty(value)?;
    storage.write(kind, &bytes)
}

/// Sizes of the stored documents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageStats {
    pub content_size: Option<u64>,
    pub settings_size: Option<u64>,
}

impl StorageStats {
    pub fn collect(storage: &dyn DocumentStorage) -> Self {
        Self {
            content_size: storage.size(DocumentKind::Content),
            settings_size: storage.size(DocumentKind::Settings),
        }
    }

    /// Whether the content document has been persisted
    pub fn content_exists(&self) -> bool {
        self.content_size.is_some()
    }

    /// Whether the settings document has been persisted
    pub fn settings_exists(&self) -> bool {
        self.settings_size.is_some()
    }

    pub fn total_size(&self) -> u64 {
        self.content_size.unwrap_or(0) + self.settings_size.unwrap_or(0)
    }

    /// Total size formatted for people (B, KB, MB)
    pub fn total_size_human(&self) -> String {
        let size = self.total_size();
        if size < 1024 {
            format!("{} B", size)
        } else if size < 1024 * 1024 {
            format!("{:.1} KB", size as f64 / 1024.0)
        } else {
            format!("{:.1} MB", size as f64 / (1024.0 * 1024.0))
        }
    }
}

/// File-backed storage: one pretty-printed JSON file per document
pub struct JsonFileStorage {
    data_dir: PathBuf,
}

impl JsonFileStorage {
    /// Create storage rooted at `data_dir`
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Create storage in the configured data directory
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.data_dir.clone())
    }

    fn path(&self, kind: DocumentKind) -> PathBuf {
        self.data_dir.join(kind.file_name())
    }
}

impl DocumentStorage for JsonFileStorage {
    fn read(&self, kind: DocumentKind) -> StorageResult<Option<Vec<u8>>> {
        let path = self.path(kind);
        match fs::read(&path) {
            Ok(bytes) => {
                debug!("Read {} bytes from {:?}", bytes.len(), path);
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::ReadError { path, source: e }),
        }
    }

    fn write(&self, kind: DocumentKind, data: &[u8]) -> StorageResult<()> {
        atomic_write(&self.path(kind), data)
    }

    fn remove(&self, kind: DocumentKind) -> StorageResult<()> {
        let path = self.path(kind);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::from_io(e, path)),
        }
    }

    fn location(&self, kind: DocumentKind) -> PathBuf {
        self.path(kind)
    }

    fn size(&self, kind: DocumentKind) -> Option<u64> {
        fs::metadata(self.path(kind)).ok().map(|m| m.len())
    }

    fn backup(&self, kind: DocumentKind) -> StorageResult<Option<PathBuf>> {
        let path = self.path(kind);
        let target = self.data_dir.join(format!(
            "{}.corrupt-{}",
            kind.file_name(),
            Utc::now().format("%Y%m%dT%H%M%S%.3f")
        ));
        match fs::copy(&path, &target) {
            Ok(_) => {
                debug!("Copied {:?} to {:?}", path, target);
                Ok(Some(target))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::from_io(e, target)),
        }
    }
}

/// In-process storage
///
/// Writes can be made to fail with `set_fail_writes`, which is how the
/// store's failure handling is exercised in tests.
#[derive(Default)]
pub struct MemoryStorage {
    docs: Mutex<HashMap<DocumentKind, Vec<u8>>>,
    backups: Mutex<Vec<(DocumentKind, Vec<u8>)>>,
    fail_writes: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following write fail (or succeed again)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Store raw bytes directly, bypassing the schema
    pub fn insert_raw(&self, kind: DocumentKind, data: impl Into<Vec<u8>>) {
        self.lock().insert(kind, data.into());
    }

    /// Every copy `backup` has taken of a document, oldest first
    pub fn backups(&self, kind: DocumentKind) -> Vec<Vec<u8>> {
        self.backups
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, bytes)| bytes.clone())
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<DocumentKind, Vec<u8>>> {
        // The map is always left consistent, so a poisoned lock is still usable
        self.docs.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DocumentStorage for MemoryStorage {
    fn read(&self, kind: DocumentKind) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.lock().get(&kind).cloned())
    }

    fn write(&self, kind: DocumentKind, data: &[u8]) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::WriteError {
                path: self.location(kind),
                source: io::Error::new(io::ErrorKind::Other, "writes disabled"),
            });
        }
        self.lock().insert(kind, data.to_vec());
        Ok(())
    }

    fn remove(&self, kind: DocumentKind) -> StorageResult<()> {
        self.lock().remove(&kind);
        Ok(())
    }

    fn location(&self, kind: DocumentKind) -> PathBuf {
        PathBuf::from(format!("memory://{}", kind))
    }

    fn size(&self, kind: DocumentKind) -> Option<u64> {
        self.lock().get(&kind).map(|d| d.len() as u64)
    }

    fn backup(&self, kind: DocumentKind) -> StorageResult<Option<PathBuf>> {
        let Some(bytes) = self.lock().get(&kind).cloned() else {
            return Ok(None);
        };
        let mut backups = self.backups.lock().unwrap_or_else(|e| e.into_inner());
        backups.push((kind, bytes));
        Ok(Some(PathBuf::from(format!(
            "memory://{}.corrupt-{}",
            kind,
            backups.len()
        ))))
    }
}

/// Write data to a file atomically
///
/// 1. Write to a fresh temp file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
///
/// Every call gets its own temp file, so concurrent writers (threads or
/// processes) never share or rename each other's bytes. The target is never
/// left in a partially-written state.
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    // Same directory as the target so the rename stays on one filesystem
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| StorageError::CreateDirectory {
        path: parent.to_path_buf(),
        source: e,
    })?;

    let mut temp =
        NamedTempFile::new_in(parent).map_err(|e| StorageError::from_io(e, parent.to_path_buf()))?;
    let temp_path = temp.path().to_path_buf();

    temp.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    temp.as_file()
        .sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    // On failure the temp file is dropped, which deletes it
    temp.persist(path)
        .map_err(|e| StorageError::AtomicWriteFailed {
            from: temp_path,
            to: path.to_path_buf(),
            source: e.error,
        })?;

    debug!("Wrote {} bytes to {:?}", data.len(), path);
    Ok(())
}
