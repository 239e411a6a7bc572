//! HTTP service
//!
//! Exposes the content store to the site renderer and the editing surface
//! as a small JSON API. Reads are open; every POST must carry an
//! `Authorization: Bearer <token>` header accepted by the configured
//! `Authorizer`.
//!
//! # Endpoints
//!
//! - `content_endpoints`: `/api/content` and `/api/settings`
//! - `admin_endpoints`: `/api/snapshot`, `/api/reset`, `/api/health`
//!
//! Failures are returned as `{"error": ..., "code": ...}` with status 401
//! for refused writes and 500 for everything else.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    http::{header, HeaderMap, HeaderValue, Method},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{AdminIdentity, Authorizer, TokenAuthorizer};
use crate::config::Config;
use crate::store::{ContentStore, StoreResult};

mod admin_endpoints;
mod content_endpoints;
mod http_error;

pub use admin_endpoints::HealthResponse;
pub use http_error::HttpError;

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ContentStore>,
    pub authorizer: Arc<dyn Authorizer>,
}

impl AppState {
    pub fn new(store: Arc<ContentStore>, authorizer: Arc<dyn Authorizer>) -> Self {
        Self { store, authorizer }
    }

    /// Check the request's bearer credentials
    pub(crate) fn authorize(&self, headers: &HeaderMap) -> Result<AdminIdentity, HttpError> {
        let header = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        self.authorizer
            .authorize(header)
            .map_err(|e| HttpError::unauthorized(&e))
    }

    /// Run a store call on the blocking pool
    ///
    /// Store calls read and fsync files and may wait on the store's write
    /// lock, so they are kept off the async workers.
    pub(crate) async fn with_store<T, F>(&self, message: &str, call: F) -> Result<T, HttpError>
    where
        T: Send + 'static,
        F: FnOnce(&ContentStore) -> StoreResult<T> + Send + 'static,
    {
        let store = self.store.clone();
        match tokio::task::spawn_blocking(move || call(&store)).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(HttpError::store(message, &e)),
            Err(e) => Err(HttpError::task_failed(message, &e)),
        }
    }
}

/// Build the router with every endpoint module merged in
pub fn create_router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .merge(content_endpoints::routes(state.clone()))
        .merge(admin_endpoints::routes(state))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

/// CORS for the configured origins
///
/// `*` allows any origin. Entries that are not valid header values are
/// skipped with a warning.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(false);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {:?}", origin);
                None
            }
        })
        .collect();

    layer.allow_origin(allowed)
}

/// Serve the store described by `config` until interrupted
pub async fn serve(config: &Config) -> anyhow::Result<()> {
    let store = Arc::new(ContentStore::open(config));
    let authorizer = TokenAuthorizer::new(&config.admin_tokens);

    if authorizer.is_empty() {
        tracing::warn!("No admin tokens configured; every write request will be refused");
    } else {
        tracing::info!("{} admin token(s) configured", authorizer.len());
    }

    let state = AppState::new(store, Arc::new(authorizer));
    let app = create_router(state, &config.cors_origins);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;

    tracing::info!("Serving site content on http://{}", listener.local_addr()?);
    tracing::info!("Data directory: {:?}", config.data_dir);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Could not listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
