//! Content and settings endpoints
//!
//! - `GET /api/content` - Current content document (or the default)
//! - `POST /api/content` - Replace the branches named in the body
//! - `GET /api/settings` - Current settings document (or the default)
//! - `POST /api/settings` - Replace the branches named in the body
//!
//! POST bodies are partial documents; every branch present replaces the
//! stored branch wholesale. The response is the full updated document.

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::Json,
    routing::get,
    Router,
};

use super::{AppState, HttpError};
use crate::models::{PartialSiteContent, PartialSiteSettings, SiteContent, SiteSettings};

const FETCH_CONTENT: &str = "Failed to fetch content";
const UPDATE_CONTENT: &str = "Failed to update content";
const FETCH_SETTINGS: &str = "Failed to fetch settings";
const UPDATE_SETTINGS: &str = "Failed to update settings";

/// GET /api/content
///
/// ```bash
/// curl http://localhost:3001/api/content
/// ```
async fn get_content(State(state): State<AppState>) -> Result<Json<SiteContent>, HttpError> {
    state
        .with_store(FETCH_CONTENT, |store| store.get_content())
        .await
        .map(Json)
}

/// POST /api/content
///
/// ```bash
/// curl -X POST http://localhost:3001/api/content \
///   -H "Authorization: Bearer $TOKEN" \
///   -d '{"hero": {"title": "...", "subtitle": "...", "description": "...", "ctaText": "...", "backgroundImage": "..."}}'
/// ```
async fn update_content(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SiteContent>, HttpError> {
    let editor = state.authorize(&headers)?;

    let partial: PartialSiteContent = serde_json::from_slice(&body)
        .map_err(|e| HttpError::invalid_body(UPDATE_CONTENT, e))?;

    tracing::info!(
        "Content update of [{}] by {}",
        partial.branches().join(", "),
        editor.fingerprint
    );

    state
        .with_store(UPDATE_CONTENT, move |store| store.update_content(partial))
        .await
        .map(Json)
}

/// GET /api/settings
async fn get_settings(State(state): State<AppState>) -> Result<Json<SiteSettings>, HttpError> {
    state
        .with_store(FETCH_SETTINGS, |store| store.get_settings())
        .await
        .map(Json)
}

/// POST /api/settings
async fn update_settings(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SiteSettings>, HttpError> {
    let editor = state.authorize(&headers)?;

    let partial: PartialSiteSettings = serde_json::from_slice(&body)
        .map_err(|e| HttpError::invalid_body(UPDATE_SETTINGS, e))?;

    tracing::info!(
        "Settings update of [{}] by {}",
        partial.branches().join(", "),
        editor.fingerprint
    );

    state
        .with_store(UPDATE_SETTINGS, move |store| store.update_settings(partial))
        .await
        .map(Json)
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/content", get(get_content).post(update_content))
        .route("/api/settings", get(get_settings).post(update_settings))
        .with_state(state)
}
