//! Manara Core Library
//!
//! This crate provides the content backend for a single-author Arabic
//! (right-to-left) personal site: a store for the site's content and
//! settings documents, and the HTTP service the renderer and the editing
//! surface talk to.
//!
//! # Architecture
//!
//! - **Documents**: `SiteContent` (what the pages say) and `SiteSettings`
//!   (how they look), each persisted as one JSON file
//! - **Store**: serves the persisted document or a built-in default, and
//!   applies partial updates by replacing whole branches
//! - **Service**: axum router over a shared `ContentStore`, with bearer
//!   token authorization on every write
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let store = ContentStore::open(&config);
//!
//! let mut contact = store.get_content()?.contact;
//! contact.phone = "+20 100 000 0000".to_string();
//! store.update_content(PartialSiteContent { contact: Some(contact), ..Default::default() })?;
//!
//! let backup = store.export_snapshot()?;
//! ```
//!
//! # Modules
//!
//! - `store`: Content store (main entry point)
//! - `models`: Document types and partial updates
//! - `defaults`: Built-in documents served before anything is saved
//! - `snapshot`: Backup export and import
//! - `storage`: Document persistence
//! - `auth`: Write authorization
//! - `service`: HTTP API
//! - `config`: Application configuration

pub mod auth;
pub mod config;
pub mod defaults;
pub mod models;
pub mod service;
pub mod snapshot;
pub mod storage;
pub mod store;

pub use auth::{AuthError, Authorizer, TokenAuthorizer};
pub use config::Config;
pub use models::{
    EditError, ItemId, PartialSiteContent, PartialSiteSettings, SiteContent, SiteSettings,
};
pub use snapshot::{ImportSummary, Snapshot};
pub use storage::{DocumentKind, StorageError, StorageStats};
pub use store::{ContentStore, FallbackPolicy, StoreError, StoreStatus};
