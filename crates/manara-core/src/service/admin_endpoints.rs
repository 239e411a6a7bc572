//! Backup, reset and health endpoints
//!
//! - `GET /api/snapshot` - Both documents, as a downloadable backup
//! - `POST /api/snapshot` - Restore from a backup (either key may be omitted)
//! - `POST /api/reset` - Restore the built-in defaults
//! - `GET /api/health` - Liveness and persistence status

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Serialize;

use super::{AppState, HttpError};
use crate::snapshot::{ImportSummary, Snapshot, SNAPSHOT_FILE_NAME};
use crate::store::StoreError;

const EXPORT_SNAPSHOT: &str = "Failed to export snapshot";
const IMPORT_SNAPSHOT: &str = "Failed to import snapshot";
const RESET: &str = "Failed to reset content";
const HEALTH: &str = "Failed to read status";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub content_persisted: bool,
    pub settings_persisted: bool,
}

/// GET /api/snapshot
async fn export_snapshot(State(state): State<AppState>) -> Result<impl IntoResponse, HttpError> {
    let snapshot = state
        .with_store(EXPORT_SNAPSHOT, |store| store.snapshot())
        .await?;

    let disposition = format!("attachment; filename=\"{}\"", SNAPSHOT_FILE_NAME);
    Ok(([(header::CONTENT_DISPOSITION, disposition)], Json(snapshot)))
}

/// POST /api/snapshot
///
/// ```bash
/// curl -X POST http://localhost:3001/api/snapshot \
///   -H "Authorization: Bearer $TOKEN" \
///   --data-binary @website-backup.json
/// ```
async fn import_snapshot(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ImportSummary>, HttpError> {
    let editor = state.authorize(&headers)?;

    let text = String::from_utf8(body.to_vec()).map_err(|e| {
        HttpError::store(
            IMPORT_SNAPSHOT,
            &StoreError::ImportParse {
                details: e.to_string(),
            },
        )
    })?;

    tracing::info!("Snapshot import by {}", editor.fingerprint);

    state
        .with_store(IMPORT_SNAPSHOT, move |store| store.import_snapshot(&text))
        .await
        .map(Json)
}

/// POST /api/reset
async fn reset(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Snapshot>, HttpError> {
    let editor = state.authorize(&headers)?;
    tracing::info!("Reset to defaults by {}", editor.fingerprint);

    state
        .with_store(RESET, |store| {
            store.reset_to_default()?;
            store.snapshot()
        })
        .await
        .map(Json)
}

/// GET /api/health
async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, HttpError> {
    let status = state
        .with_store(HEALTH, |store| Ok(store.status()))
        .await?;
    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        content_persisted: status.content_persisted,
        settings_persisted: status.settings_persisted,
    }))
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/snapshot", get(export_snapshot).post(import_snapshot))
        .route("/api/reset", post(reset))
        .route("/api/health", get(health))
        .with_state(state)
}
