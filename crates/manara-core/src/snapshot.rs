//! Backup snapshots
//!
//! A snapshot is a single JSON object holding both documents:
//!
//! ```json
//! { "content": { ... }, "settings": { ... } }
//! ```
//!
//! Exports always carry both keys. Imports accept either or both, and each
//! one is applied like an update, so a full document replaces the stored one
//! and a fragment only replaces the branches it names.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{PartialSiteContent, PartialSiteSettings, SiteContent, SiteSettings};

/// File name suggested for downloads
pub const SNAPSHOT_FILE_NAME: &str = "website-backup.json";

/// Both documents at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub content: SiteContent,
    pub settings: SiteSettings,
}

impl Snapshot {
    /// Human-readable JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// What an imported snapshot asks to change
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotImport {
    pub content: Option<PartialSiteContent>,
    pub settings: Option<PartialSiteSettings>,
}

impl SnapshotImport {
    /// Parse snapshot text
    ///
    /// Fails with a description when the text is not JSON, is not an object,
    /// has neither a `content` nor a `settings` key, or when either document
    /// does not match its schema.
    pub fn parse(text: &str) -> Result<Self, String> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| format!("not valid JSON: {}", e))?;

        let Value::Object(mut map) = value else {
            return Err("expected a JSON object".to_string());
        };

        let content = match map.remove("content") {
            None | Some(Value::Null) => None,
            Some(v) => Some(
                serde_json::from_value::<PartialSiteContent>(v)
                    .map_err(|e| format!("invalid content: {}", e))?,
            ),
        };

        let settings = match map.remove("settings") {
            None | Some(Value::Null) => None,
            Some(v) => Some(
                serde_json::from_value::<PartialSiteSettings>(v)
                    .map_err(|e| format!("invalid settings: {}", e))?,
            ),
        };

        if content.is_none() && settings.is_none() {
            return Err("snapshot has neither \"content\" nor \"settings\"".to_string());
        }

        Ok(Self { content, settings })
    }
}

/// What an import changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub content: bool,
    pub settings: bool,
}
