//! HTTP server for the in-memory REST mock backend.
//!
//! Puts an [`InMemoryBackend`] behind axum. Every request goes to a single
//! fallback handler, so the backend's own dispatcher decides what is routed.

mod config;
mod convert;

pub use config::ServerConfig;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, Uri};
use axum::Router;
use inmem_core::config::parser::load_config;
use inmem_core::{BackendConfig, DeclarativeOverrides, FileSeed, InMemoryBackend};
use std::sync::Arc;
use tracing::info;

/// Creates the axum application serving the backend.
pub fn create_app(backend: Arc<InMemoryBackend>) -> Router {
    Router::new().fallback(handle_request).with_state(backend)
}

async fn handle_request(
    State(backend): State<Arc<InMemoryBackend>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> axum::response::Response {
    let request = match convert::to_core_request(&method, &uri, &headers, &body) {
        Ok(request) => request,
        Err(rejection) => return rejection,
    };
    convert::to_http_response(backend.handle(request).await)
}

/// Builds the backend from the seed files, config and overrides named in the
/// server configuration.
pub async fn build_backend(config: &ServerConfig) -> anyhow::Result<InMemoryBackend> {
    let seed = FileSeed::load(&config.seed).await?;
    info!(files = seed.sources().len(), collections = seed.database().len(), "Seed loaded");

    let mut backend_config = match &config.config {
        Some(path) => load_config::<BackendConfig>(path).await?,
        None => BackendConfig::default(),
    };
    if let Some(delay) = config.delay {
        backend_config.delay = delay;
    }

    let overrides = match &config.overrides {
        Some(path) => load_config::<DeclarativeOverrides>(path).await?,
        None => DeclarativeOverrides::default(),
    };

    Ok(InMemoryBackend::builder(seed)
        .config(backend_config)
        .overrides(overrides)
        .build())
}

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup. `RUST_LOG` takes
/// precedence over `level`.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("inmem_server={level},inmem_core={level}")));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
