//! Content store
//!
//! The `ContentStore` is the single source of truth for the site's two
//! documents. It defines:
//! - default fallback: a read with nothing persisted returns the built-in
//!   document, without writing it back
//! - shallow merge: an update replaces each branch it names, wholesale
//! - snapshots: export both documents, import either or both
//!
//! ## Consistency
//!
//! Writers are serialized by a mutex, so every read-merge-write sequence
//! sees the result of the previous one and a caller always reads its own
//! writes. Two editors submitting the same branch still overwrite each
//! other: the last write wins and no version check is made.
//!
//! ## Unreadable documents
//!
//! Under the lenient policy a document that exists but cannot be parsed is
//! served as the default. Before a write replaces it, the broken file is
//! copied aside (`content.json.corrupt-<timestamp>`), so nothing is lost.
//!
//! ## Usage
//!
//! ```ignore
//! let store = ContentStore::open(&config);
//!
//! let mut hero = store.get_content()?.hero;
//! hero.title = "عنوان جديد".to_string();
//! store.update_content(PartialSiteContent { hero: Some(hero), ..Default::default() })?;
//! ```

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::models::{
    Achievement, EditError, ItemId, PartialSiteContent, PartialSiteSettings, Service,
    SiteContent, SiteSettings, WisdomQuote,
};
use crate::snapshot::{ImportSummary, Snapshot, SnapshotImport};
use crate::storage::persistence::{load_json, save_json};
use crate::storage::{
    DocumentKind, DocumentStorage, JsonFileStorage, MemoryStorage, StorageError, StorageStats,
};

/// Errors raised by the content store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Neither the persisted document nor the default could be served
    #[error("The {document} document is unavailable: {source}")]
    ContentUnavailable {
        document: DocumentKind,
        #[source]
        source: StorageError,
    },

    /// The backing medium rejected a write; nothing was changed
    #[error("Failed to persist the {document} document: {source}")]
    PersistenceWrite {
        document: DocumentKind,
        #[source]
        source: StorageError,
    },

    /// Snapshot text could not be used; nothing was changed
    #[error("Invalid snapshot: {details}")]
    ImportParse { details: String },

    /// A list edit was rejected
    #[error(transparent)]
    Validation(#[from] EditError),

    /// The snapshot could not be serialized; nothing was written
    #[error("Failed to serialize snapshot: {source}")]
    Export {
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// Machine-readable code for clients
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::ContentUnavailable { .. } => "CONTENT_UNAVAILABLE",
            StoreError::PersistenceWrite { .. } => "PERSISTENCE_WRITE_ERROR",
            StoreError::ImportParse { .. } => "IMPORT_PARSE_ERROR",
            StoreError::Validation(_) => "VALIDATION_ERROR",
            StoreError::Export { .. } => "EXPORT_ERROR",
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// What to do when a persisted document exists but cannot be read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Serve the built-in default and log a warning
    #[default]
    Lenient,
    /// Fail with `ContentUnavailable`
    Strict,
}

/// Where the documents live and whether they have been written yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStatus {
    pub content_path: PathBuf,
    pub settings_path: PathBuf,
    pub content_persisted: bool,
    pub settings_persisted: bool,
    pub content_size: Option<u64>,
    pub settings_size: Option<u64>,
    pub strict: bool,
}

/// Store for the site content and settings documents
pub struct ContentStore {
    storage: Arc<dyn DocumentStorage>,
    policy: FallbackPolicy,
    writes: Mutex<()>,
}

impl ContentStore {
    /// Create a store over any storage medium
    pub fn new(storage: Arc<dyn DocumentStorage>) -> Self {
        Self {
            storage,
            policy: FallbackPolicy::default(),
            writes: Mutex::new(()),
        }
    }

    /// Set the fallback policy
    pub fn with_policy(mut self, policy: FallbackPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Open the file-backed store described by `config`
    pub fn open(config: &Config) -> Self {
        let policy = if config.strict_fallback {
            FallbackPolicy::Strict
        } else {
            FallbackPolicy::Lenient
        };
        debug!("Opening content store in {:?}", config.data_dir);
        Self::new(Arc::new(JsonFileStorage::from_config(config))).with_policy(policy)
    }

    /// A store that keeps nothing beyond the process
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Where a document is persisted
    pub fn location(&self, kind: DocumentKind) -> PathBuf {
        self.storage.location(kind)
    }

    /// Sizes of the persisted documents
    pub fn storage_stats(&self) -> StorageStats {
        StorageStats::collect(self.storage.as_ref())
    }

    /// Persistence status of both documents
    pub fn status(&self) -> StoreStatus {
        let stats = self.storage_stats();
        StoreStatus {
            content_path: self.location(DocumentKind::Content),
            settings_path: self.location(DocumentKind::Settings),
            content_persisted: stats.content_exists(),
            settings_persisted: stats.settings_exists(),
            content_size: stats.content_size,
            settings_size: stats.settings_size,
            strict: self.policy == FallbackPolicy::Strict,
        }
    }

    // ==================== Reads ====================

    /// Get the content document, or the built-in default
    pub fn get_content(&self) -> StoreResult<SiteContent> {
        self.load_or_default(DocumentKind::Content)
    }

    /// Get the settings document, or the built-in default
    pub fn get_settings(&self) -> StoreResult<SiteSettings> {
        self.load_or_default(DocumentKind::Settings)
    }

    // ==================== Updates ====================

    /// Replace each content branch present in `partial`
    ///
    /// Returns the full updated document. On failure the stored document is
    /// left as it was.
    pub fn update_content(&self, partial: PartialSiteContent) -> StoreResult<SiteContent> {
        if partial.is_empty() {
            debug!("Empty content update, nothing to write");
            return self.get_content();
        }

        let _guard = self.lock_writes();
        let branches = partial.branches();

        let next = self
            .load_for_write::<SiteContent>(DocumentKind::Content)?
            .merged(partial);
        self.persist(DocumentKind::Content, &next)?;

        info!("Updated content branches: {}", branches.join(", "));
        Ok(next)
    }

    /// Replace each settings branch present in `partial`
    pub fn update_settings(&self, partial: PartialSiteSettings) -> StoreResult<SiteSettings> {
        if partial.is_empty() {
            debug!("Empty settings update, nothing to write");
            return self.get_settings();
        }

        let _guard = self.lock_writes();
        let branches = partial.branches();

        let next = self
            .load_for_write::<SiteSettings>(DocumentKind::Settings)?
            .merged(partial);
        self.persist(DocumentKind::Settings, &next)?;

        info!("Updated settings branches: {}", branches.join(", "));
        Ok(next)
    }

    /// Apply an edit to a working copy of the content document and persist it
    ///
    /// If `edit` fails nothing is written.
    pub fn edit_content<R>(
        &self,
        edit: impl FnOnce(&mut SiteContent) -> Result<R, EditError>,
    ) -> StoreResult<R> {
        let _guard = self.lock_writes();

        let mut working = self.load_for_write::<SiteContent>(DocumentKind::Content)?;
        let result = edit(&mut working)?;
        self.persist(DocumentKind::Content, &working)?;

        Ok(result)
    }

    // ==================== List editing ====================

    /// Append a service with a freshly minted id
    pub fn add_service(&self, service: Service) -> StoreResult<ItemId> {
        let id = self.edit_content(|content| Ok(content.add_service(service)))?;
        info!("Added service {}", id);
        Ok(id)
    }

    /// Remove a service by id
    pub fn remove_service(&self, id: ItemId) -> StoreResult<Service> {
        let removed = self.edit_content(|content| content.remove_service(id))?;
        info!("Removed service {}", id);
        Ok(removed)
    }

    /// Append a wisdom quote with a freshly minted id
    pub fn add_wisdom_quote(&self, quote: WisdomQuote) -> StoreResult<ItemId> {
        let id = self.edit_content(|content| Ok(content.add_wisdom_quote(quote)))?;
        info!("Added wisdom quote {}", id);
        Ok(id)
    }

    /// Remove a wisdom quote by id
    pub fn remove_wisdom_quote(&self, id: ItemId) -> StoreResult<WisdomQuote> {
        let removed = self.edit_content(|content| content.remove_wisdom_quote(id))?;
        info!("Removed wisdom quote {}", id);
        Ok(removed)
    }

    /// Append an achievement with a freshly minted id
    pub fn add_achievement(&self, achievement: Achievement) -> StoreResult<ItemId> {
        let id = self.edit_content(|content| Ok(content.add_achievement(achievement)))?;
        info!("Added achievement {}", id);
        Ok(id)
    }

    /// Remove an achievement by id
    pub fn remove_achievement(&self, id: ItemId) -> StoreResult<Achievement> {
        let removed = self.edit_content(|content| content.remove_achievement(id))?;
        info!("Removed achievement {}", id);
        Ok(removed)
    }

    // ==================== Snapshots ====================

    /// Both documents as they are now
    pub fn snapshot(&self) -> StoreResult<Snapshot> {
        let _guard = self.lock_writes();
        Ok(Snapshot {
            content: self.get_content()?,
            settings: self.get_settings()?,
        })
    }

    /// Serialize both documents as one JSON object
    pub fn export_snapshot(&self) -> StoreResult<String> {
        self.snapshot()?
            .to_json()
            .map_err(|source| StoreError::Export { source })
    }

    /// Apply a snapshot produced by `export_snapshot` (or a fragment of one)
    ///
    /// The text is fully parsed and validated before anything is written;
    /// on any failure both documents are left as they were.
    pub fn import_snapshot(&self, data: &str) -> StoreResult<ImportSummary> {
        let import =
            SnapshotImport::parse(data).map_err(|details| StoreError::ImportParse { details })?;

        let _guard = self.lock_writes();

        let content = match import.content {
            Some(partial) => Some(
                self.load_for_write::<SiteContent>(DocumentKind::Content)?
                    .merged(partial),
            ),
            None => None,
        };
        let settings = match import.settings {
            Some(partial) => Some(
                self.load_for_write::<SiteSettings>(DocumentKind::Settings)?
                    .merged(partial),
            ),
            None => None,
        };

        let summary = ImportSummary {
            content: content.is_some(),
            settings: settings.is_some(),
        };
        self.commit(content.as_ref(), settings.as_ref())?;

        info!(
            "Imported snapshot (content: {}, settings: {})",
            summary.content, summary.settings
        );
        Ok(summary)
    }

    /// Replace both documents with the built-in defaults
    pub fn reset_to_default(&self) -> StoreResult<()> {
        let _guard = self.lock_writes();
        // Reset discards on purpose, but still keeps a copy of a broken file
        self.keep_if_unreadable::<SiteContent>(DocumentKind::Content)?;
        self.keep_if_unreadable::<SiteSettings>(DocumentKind::Settings)?;
        self.commit(Some(&SiteContent::default()), Some(&SiteSettings::default()))?;
        info!("Reset content and settings to defaults");
        Ok(())
    }

    // ==================== Internals ====================

    fn lock_writes(&self) -> MutexGuard<'_, ()> {
        // The guard protects no data, only ordering
        self.writes.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn load_or_default<T: DeserializeOwned + Default>(&self, kind: DocumentKind) -> StoreResult<T> {
        match load_json::<T>(self.storage.as_ref(), kind) {
            Ok(Some(doc)) => Ok(doc),
            Ok(None) => {
                debug!("No persisted {} document, serving default", kind);
                Ok(T::default())
            }
            Err(e) => self.fallback(kind, e),
        }
    }

    /// Load a document that is about to be replaced
    ///
    /// Same as `load_or_default`, except that an unreadable document the
    /// lenient policy falls back from is copied aside first.
    fn load_for_write<T: DeserializeOwned + Default>(&self, kind: DocumentKind) -> StoreResult<T> {
        match load_json::<T>(self.storage.as_ref(), kind) {
            Ok(doc) => Ok(doc.unwrap_or_default()),
            Err(e) => {
                let doc = self.fallback(kind, e)?;
                self.keep_copy(kind)?;
                Ok(doc)
            }
        }
    }

    fn fallback<T: Default>(&self, kind: DocumentKind, error: StorageError) -> StoreResult<T> {
        match self.policy {
            FallbackPolicy::Lenient => {
                warn!("Could not load {} document, serving default: {}", kind, error);
                Ok(T::default())
            }
            FallbackPolicy::Strict => Err(StoreError::ContentUnavailable {
                document: kind,
                source: error,
            }),
        }
    }

    fn keep_if_unreadable<T: DeserializeOwned>(&self, kind: DocumentKind) -> StoreResult<()> {
        if load_json::<T>(self.storage.as_ref(), kind).is_err() {
            self.keep_copy(kind)?;
        }
        Ok(())
    }

    /// Copy the stored document aside; a failed copy blocks the overwrite
    fn keep_copy(&self, kind: DocumentKind) -> StoreResult<()> {
        match self.storage.backup(kind) {
            Ok(Some(copy)) => {
                warn!("Kept a copy of the unreadable {} document at {:?}", kind, copy);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(source) => {
                warn!("Could not copy the unreadable {} document aside: {}", kind, source);
                Err(StoreError::PersistenceWrite {
                    document: kind,
                    source,
                })
            }
        }
    }

    fn persist<T: Serialize>(&self, kind: DocumentKind, doc: &T) -> StoreResult<()> {
        save_json(self.storage.as_ref(), kind, doc).map_err(|source| {
            warn!("Write of {} document failed: {}", kind, source);
            StoreError::PersistenceWrite {
                document: kind,
                source,
            }
        })
    }

    /// Write one or both documents, undoing the content write if the
    /// settings write fails
    fn commit(
        &self,
        content: Option<&SiteContent>,
        settings: Option<&SiteSettings>,
    ) -> StoreResult<()> {
        let previous_content = match (content, settings) {
            (Some(_), Some(_)) => Some(self.storage.read(DocumentKind::Content).map_err(
                |source| StoreError::PersistenceWrite {
                    document: DocumentKind::Content,
                    source,
                },
            )?),
            _ => None,
        };

        if let Some(content) = content {
            self.persist(DocumentKind::Content, content)?;
        }

        if let Some(settings) = settings {
            if let Err(e) = self.persist(DocumentKind::Settings, settings) {
                if let Some(previous) = previous_content {
                    self.restore(DocumentKind::Content, previous);
                }
                return Err(e);
            }
        }

        Ok(())
    }

    fn restore(&self, kind: DocumentKind, previous: Option<Vec<u8>>) {
        let result = match previous {
            Some(bytes) => self.storage.write(kind, &bytes),
            None => self.storage.remove(kind),
        };
        if let Err(e) = result {
            warn!("Could not roll back {} document: {}", kind, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{About, Hero};
    use tempfile::TempDir;

    fn memory_store() -> (Arc<MemoryStorage>, ContentStore) {
        let storage = Arc::new(MemoryStorage::new());
        let store = ContentStore::new(storage.clone());
        (storage, store)
    }

    #[test]
    fn test_empty_store_serves_defaults() {
        let (storage, store) = memory_store();

        assert_eq!(store.get_content().unwrap(), SiteContent::default());
        assert_eq!(store.get_settings().unwrap(), SiteSettings::default());

        // Reading does not write the default back
        assert!(storage.read(DocumentKind::Content).unwrap().is_none());
        assert!(storage.read(DocumentKind::Settings).unwrap().is_none());
    }

    #[test]
    fn test_shallow_merge_replaces_whole_branch() {
        let (_, store) = memory_store();
        let before = store.get_content().unwrap();

        let new_about = About {
            title: "نبذة".to_string(),
            subtitle: "قصيرة".to_string(),
            description: String::new(),
            achievements: Vec::new(),
            stats: Vec::new(),
        };
        let updated = store
            .update_content(PartialSiteContent {
                about: Some(new_about.clone()),
                ..Default::default()
            })
            .unwrap();

        // The old achievements are gone, not merged in
        assert_eq!(updated.about, new_about);
        assert_eq!(updated.site, before.site);
        assert_eq!(updated.hero, before.hero);
        assert_eq!(updated.services, before.services);
        assert_eq!(updated.wisdom_quotes, before.wisdom_quotes);
        assert_eq!(updated.contact, before.contact);
        assert_eq!(updated.navigation, before.navigation);
    }

    #[test]
    fn test_read_your_writes() {
        let (_, store) = memory_store();

        let mut contact = store.get_content().unwrap().contact;
        contact.phone = "+20 111 222 3333".to_string();
        store
            .update_content(PartialSiteContent {
                contact: Some(contact.clone()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(store.get_content().unwrap().contact, contact);
    }

    #[test]
    fn test_hero_title_scenario() {
        let (_, store) = memory_store();
        let current = store.get_content().unwrap();
        assert_eq!(current.hero.title, "الشيخ عاصم فايد");

        let submitted = Hero {
            title: "عنوان جديد".to_string(),
            ..current.hero.clone()
        };
        let updated = store
            .update_content(PartialSiteContent {
                hero: Some(submitted.clone()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(updated.hero.title, "عنوان جديد");
        assert_eq!(updated.hero, submitted);
    }

    #[test]
    fn test_empty_partial_changes_nothing() {
        let (storage, store) = memory_store();
        let updated = store.update_content(PartialSiteContent::default()).unwrap();
        assert_eq!(updated, SiteContent::default());
        let settings = store.update_settings(PartialSiteSettings::default()).unwrap();
        assert_eq!(settings, SiteSettings::default());

        // Nothing to merge, so nothing is written
        assert!(storage.read(DocumentKind::Content).unwrap().is_none());
        assert!(storage.read(DocumentKind::Settings).unwrap().is_none());
    }

    #[test]
    fn test_update_settings() {
        let (_, store) = memory_store();

        let mut features = store.get_settings().unwrap().features;
        features.admin_mode = true;
        features.live_edit = true;
        let updated = store
            .update_settings(PartialSiteSettings {
                features: Some(features.clone()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(updated.features, features);
        assert_eq!(updated.theme, SiteSettings::default().theme);
        assert_eq!(store.get_settings().unwrap(), updated);
    }

    #[test]
    fn test_failed_write_leaves_state_intact() {
        let (storage, store) = memory_store();

        let mut hero = store.get_content().unwrap().hero;
        hero.title = "قبل".to_string();
        store
            .update_content(PartialSiteContent {
                hero: Some(hero),
                ..Default::default()
            })
            .unwrap();
        let before = store.get_content().unwrap();

        storage.set_fail_writes(true);
        let mut hero = before.hero.clone();
        hero.title = "بعد".to_string();
        let err = store
            .update_content(PartialSiteContent {
                hero: Some(hero),
                ..Default::default()
            })
            .unwrap_err();

        assert!(matches!(err, StoreError::PersistenceWrite { .. }));
        assert_eq!(err.code(), "PERSISTENCE_WRITE_ERROR");
        assert_eq!(store.get_content().unwrap(), before);
    }

    #[test]
    fn test_unreadable_document_falls_back_to_default() {
        let (storage, store) = memory_store();
        storage.insert_raw(DocumentKind::Content, "{ broken");

        assert_eq!(store.get_content().unwrap(), SiteContent::default());

        // The next update overwrites the broken document
        let updated = store
            .update_content(PartialSiteContent {
                navigation: Some(Vec::new()),
                ..Default::default()
            })
            .unwrap();
        assert!(updated.navigation.is_empty());
        assert!(store.get_content().unwrap().navigation.is_empty());

        // The broken bytes were kept before the overwrite
        assert_eq!(
            storage.backups(DocumentKind::Content),
            vec![b"{ broken".to_vec()]
        );
        assert!(storage.backups(DocumentKind::Settings).is_empty());

        // Once the document is readable again no further copies are taken
        store.add_service(Service::placeholder()).unwrap();
        assert_eq!(storage.backups(DocumentKind::Content).len(), 1);
    }

    #[test]
    fn test_unreadable_file_is_copied_aside_before_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            data_dir: temp_dir.path().to_path_buf(),
            ..Config::default()
        };
        std::fs::write(temp_dir.path().join("settings.json"), "[1, 2").unwrap();
        let store = ContentStore::open(&config);

        let mut seo = store.get_settings().unwrap().seo;
        seo.meta_title = "عنوان".to_string();
        store
            .update_settings(PartialSiteSettings {
                seo: Some(seo),
                ..Default::default()
            })
            .unwrap();

        let copies: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|path| {
                path.file_name()
                    .map(|n| n.to_string_lossy().starts_with("settings.json.corrupt-"))
                    .unwrap_or(false)
            })
            .collect();
        assert_eq!(copies.len(), 1);
        assert_eq!(std::fs::read_to_string(&copies[0]).unwrap(), "[1, 2");
        assert_eq!(store.get_settings().unwrap().seo.meta_title, "عنوان");
    }

    #[test]
    fn test_reset_keeps_copy_of_unreadable_document() {
        let (storage, store) = memory_store();
        storage.insert_raw(DocumentKind::Content, "not json");

        store.reset_to_default().unwrap();

        assert_eq!(
            storage.backups(DocumentKind::Content),
            vec![b"not json".to_vec()]
        );
        assert!(storage.backups(DocumentKind::Settings).is_empty());
        assert_eq!(store.get_content().unwrap(), SiteContent::default());
    }

    #[test]
    fn test_strict_policy_reports_unavailable() {
        let storage = Arc::new(MemoryStorage::new());
        let store = ContentStore::new(storage.clone()).with_policy(FallbackPolicy::Strict);

        // Nothing persisted is still fine
        assert!(store.get_settings().is_ok());

        storage.insert_raw(DocumentKind::Settings, "[]");
        let err = store.get_settings().unwrap_err();
        assert!(matches!(
            err,
            StoreError::ContentUnavailable {
                document: DocumentKind::Settings,
                ..
            }
        ));
        assert_eq!(err.code(), "CONTENT_UNAVAILABLE");
    }

    #[test]
    fn test_strict_update_of_unreadable_document_writes_nothing() {
        let storage = Arc::new(MemoryStorage::new());
        let store = ContentStore::new(storage.clone()).with_policy(FallbackPolicy::Strict);
        storage.insert_raw(DocumentKind::Content, "{ broken");

        let err = store
            .update_content(PartialSiteContent {
                navigation: Some(Vec::new()),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::ContentUnavailable {
                document: DocumentKind::Content,
                ..
            }
        ));
        assert!(store.add_service(Service::placeholder()).is_err());
        assert!(store.import_snapshot(r#"{"content": {}}"#).is_err());

        assert_eq!(
            storage.read(DocumentKind::Content).unwrap(),
            Some(b"{ broken".to_vec())
        );
        assert!(storage.backups(DocumentKind::Content).is_empty());
    }

    #[test]
    fn test_max_id_in_list_still_mints_unique_ids() {
        let (_, store) = memory_store();
        let mut services = store.get_content().unwrap().services;
        services[0].id = ItemId(u64::MAX);
        store
            .update_content(PartialSiteContent {
                services: Some(services),
                ..Default::default()
            })
            .unwrap();

        let a = store.add_service(Service::placeholder()).unwrap();
        let b = store.add_service(Service::placeholder()).unwrap();
        assert_ne!(a, b);

        let content = store.get_content().unwrap();
        let mut ids: Vec<_> = content.services.iter().map(|s| s.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), content.services.len());
    }

    #[test]
    fn test_export_error_has_its_own_code() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = StoreError::Export { source };
        assert_eq!(err.code(), "EXPORT_ERROR");
        assert!(err.to_string().starts_with("Failed to serialize snapshot"));
    }

    #[test]
    fn test_added_items_get_unique_ids() {
        let (_, store) = memory_store();

        let a = store.add_service(Service::placeholder()).unwrap();
        let b = store.add_service(Service::placeholder()).unwrap();
        assert_ne!(a, b);

        let quote = store.get_content().unwrap().wisdom_quotes[0].clone();
        let q1 = store.add_wisdom_quote(quote.clone()).unwrap();
        let q2 = store.add_wisdom_quote(quote).unwrap();
        assert_ne!(q1, q2);

        let achievement = store.get_content().unwrap().about.achievements[0].clone();
        let a1 = store.add_achievement(achievement.clone()).unwrap();
        let a2 = store.add_achievement(achievement).unwrap();
        assert_ne!(a1, a2);

        let content = store.get_content().unwrap();
        assert_eq!(content.services.len(), 5);
        assert_eq!(content.wisdom_quotes.len(), 5);
        assert_eq!(content.about.achievements.len(), 7);
    }

    #[test]
    fn test_remove_items() {
        let (_, store) = memory_store();

        let removed = store.remove_service(ItemId(2)).unwrap();
        assert_eq!(removed.title, "تفسير القرآن الكريم");
        store.remove_wisdom_quote(ItemId(1)).unwrap();
        store.remove_achievement(ItemId(5)).unwrap();

        let content = store.get_content().unwrap();
        assert!(content.services.iter().all(|s| s.id != ItemId(2)));
        assert_eq!(content.wisdom_quotes.len(), 2);
        assert_eq!(content.about.achievements.len(), 4);

        let err = store.remove_service(ItemId(2)).unwrap_err();
        assert!(matches!(err, StoreError::Validation(EditError::NotFound { .. })));
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_rejected_edit_writes_nothing() {
        let (storage, store) = memory_store();

        let err = store
            .edit_content(|content| {
                content.hero.title = "لن يحفظ".to_string();
                content.services[0].features.truncate(1);
                content.services[0].remove_feature(0)
            })
            .unwrap_err();

        assert!(matches!(err, StoreError::Validation(EditError::LastFeature)));
        assert!(storage.read(DocumentKind::Content).unwrap().is_none());
        assert_eq!(store.get_content().unwrap(), SiteContent::default());
    }

    #[test]
    fn test_export_import_round_trip() {
        let (_, store) = memory_store();
        store.add_service(Service::placeholder()).unwrap();
        let mut layout = store.get_settings().unwrap().layout;
        layout.enable_animations = false;
        store
            .update_settings(PartialSiteSettings {
                layout: Some(layout),
                ..Default::default()
            })
            .unwrap();

        let content = store.get_content().unwrap();
        let settings = store.get_settings().unwrap();

        let exported = store.export_snapshot().unwrap();
        let summary = store.import_snapshot(&exported).unwrap();

        assert!(summary.content && summary.settings);
        assert_eq!(store.get_content().unwrap(), content);
        assert_eq!(store.get_settings().unwrap(), settings);
    }

    #[test]
    fn test_import_into_another_store() {
        let (_, source) = memory_store();
        let mut site = source.get_content().unwrap().site;
        site.title = "موقع آخر".to_string();
        source
            .update_content(PartialSiteContent {
                site: Some(site.clone()),
                ..Default::default()
            })
            .unwrap();

        let (_, target) = memory_store();
        target
            .import_snapshot(&source.export_snapshot().unwrap())
            .unwrap();

        assert_eq!(target.get_content().unwrap().site, site);
        assert_eq!(target.snapshot().unwrap(), source.snapshot().unwrap());
    }

    #[test]
    fn test_malformed_import_changes_nothing() {
        let (storage, store) = memory_store();
        store.add_service(Service::placeholder()).unwrap();
        let before = store.snapshot().unwrap();

        for bad in ["not json", "42", r#"{"unrelated": true}"#, r#"{"content": {"services": "x"}}"#] {
            let err = store.import_snapshot(bad).unwrap_err();
            assert!(matches!(err, StoreError::ImportParse { .. }), "{}", bad);
            assert_eq!(err.code(), "IMPORT_PARSE_ERROR");
        }

        assert_eq!(store.snapshot().unwrap(), before);
        assert!(storage.read(DocumentKind::Settings).unwrap().is_none());
    }

    #[test]
    fn test_failed_import_rolls_back_content() {
        struct FailingSettings(MemoryStorage);

        impl DocumentStorage for FailingSettings {
            fn read(&self, kind: DocumentKind) -> crate::storage::StorageResult<Option<Vec<u8>>> {
                self.0.read(kind)
            }
            fn write(&self, kind: DocumentKind, data: &[u8]) -> crate::storage::StorageResult<()> {
                if kind == DocumentKind::Settings {
                    return Err(StorageError::NotFound {
                        path: self.location(kind),
                    });
                }
                self.0.write(kind, data)
            }
            fn remove(&self, kind: DocumentKind) -> crate::storage::StorageResult<()> {
                self.0.remove(kind)
            }
            fn location(&self, kind: DocumentKind) -> PathBuf {
                self.0.location(kind)
            }
            fn size(&self, kind: DocumentKind) -> Option<u64> {
                self.0.size(kind)
            }
            fn backup(&self, kind: DocumentKind) -> crate::storage::StorageResult<Option<PathBuf>> {
                self.0.backup(kind)
            }
        }

        let store = ContentStore::new(Arc::new(FailingSettings(MemoryStorage::new())));
        let mut snapshot = store.snapshot().unwrap();
        snapshot.content.hero.title = "لن يبقى".to_string();

        let err = store.import_snapshot(&snapshot.to_json().unwrap()).unwrap_err();
        assert!(matches!(
            err,
            StoreError::PersistenceWrite {
                document: DocumentKind::Settings,
                ..
            }
        ));
        assert_eq!(store.get_content().unwrap(), SiteContent::default());
        assert_eq!(store.storage_stats().content_size, None);
    }

    #[test]
    fn test_reset_to_default() {
        let (_, store) = memory_store();
        store.add_service(Service::placeholder()).unwrap();
        store.remove_wisdom_quote(ItemId(3)).unwrap();
        let mut seo = store.get_settings().unwrap().seo;
        seo.keywords.clear();
        store
            .update_settings(PartialSiteSettings {
                seo: Some(seo),
                ..Default::default()
            })
            .unwrap();

        store.reset_to_default().unwrap();

        assert_eq!(store.get_content().unwrap(), SiteContent::default());
        assert_eq!(store.get_settings().unwrap(), SiteSettings::default());
    }

    #[test]
    fn test_file_backed_store_persists_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            data_dir: temp_dir.path().to_path_buf(),
            ..Config::default()
        };

        let store = ContentStore::open(&config);
        assert!(!store.storage_stats().content_exists());
        let id = store.add_service(Service::placeholder()).unwrap();
        assert!(store.storage_stats().content_exists());
        assert!(!store.storage_stats().settings_exists());

        let reopened = ContentStore::open(&config);
        let content = reopened.get_content().unwrap();
        assert!(content.services.iter().any(|s| s.id == id));
        assert_eq!(
            reopened.location(DocumentKind::Content),
            temp_dir.path().join("content.json")
        );

        let status = reopened.status();
        assert!(status.content_persisted);
        assert!(!status.settings_persisted);
        assert_eq!(status.settings_path, temp_dir.path().join("settings.json"));
        assert!(!status.strict);
    }

    #[test]
    fn test_two_stores_on_one_directory_write_concurrently() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            data_dir: temp_dir.path().to_path_buf(),
            ..Config::default()
        };

        // Separate instances share no write lock, like `serve` and a CLI import
        let handles: Vec<_> = (0..2)
            .map(|i| {
                let store = ContentStore::open(&config);
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        if i == 0 {
                            store.add_service(Service::placeholder()).unwrap();
                        } else {
                            store.reset_to_default().unwrap();
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // Both documents parse, and only the two documents are left
        let store = ContentStore::open(&config).with_policy(FallbackPolicy::Strict);
        store.get_content().unwrap();
        store.get_settings().unwrap();
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_concurrent_updates_of_different_branches_both_land() {
        let (_, store) = memory_store();
        let store = Arc::new(store);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    if i % 2 == 0 {
                        store.add_service(Service::placeholder()).unwrap();
                    } else {
                        let mut seo = store.get_settings().unwrap().seo;
                        seo.keywords.push(format!("k{}", i));
                        store
                            .update_settings(PartialSiteSettings {
                                seo: Some(seo),
                                ..Default::default()
                            })
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let content = store.get_content().unwrap();
        assert_eq!(content.services.len(), 3 + 4);
        let mut ids: Vec<_> = content.services.iter().map(|s| s.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 7);
    }
}
