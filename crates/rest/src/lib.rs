//! # sisbase-rest - HTTP API for the SisBase registries
//!
//! This crate exposes the registry collections of [`sisbase_persistence`]
//! over HTTP. One set of generic handlers serves every collection in the
//! [`EntityRegistry`]; the collection is the first path segment.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sisbase_persistence::backends::memory::MemoryBackend;
//! use sisbase_persistence::schema::EntityRegistry;
//! use sisbase_rest::{ServerConfig, create_app_with_config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::default();
//!     let app = create_app_with_config(
//!         MemoryBackend::new(),
//!         EntityRegistry::builtin()?,
//!         config.clone(),
//!     );
//!
//!     let listener = tokio::net::TcpListener::bind(config.socket_addr()).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## API Endpoints
//!
//! | Operation | HTTP Method | URL Pattern |
//! |-----------|-------------|-------------|
//! | banner | GET | `/` |
//! | health | GET | `/health` |
//! | list / search | GET | `/api/[entity]?search=&limit=&offset=` |
//! | create | POST | `/api/[entity]` |
//! | read | GET | `/api/[entity]/[key]` |
//! | view listing | GET | `/api/[entity]/[view]` |
//! | update | PUT | `/api/[entity]/[key]` |
//! | delete | DELETE | `/api/[entity]/[key]` |
//!
//! Listings always answer `200` with a JSON array and send headers that
//! disable caching.
//!
//! ## Error Handling
//!
//! Errors are returned as `{"error": "<message>"}`:
//!
//! | HTTP Status | Cause |
//! |-------------|-------|
//! | 400 | Malformed body, invalid key, missing natural key, bad numeric value |
//! | 404 | Unknown collection, or no record with the key |
//! | 500 | Store failure (details are logged, never returned) |
//! | 503 | Health check failed |
//!
//! ## Architecture
//!
//! - [`error`] - Error types and their HTTP responses
//! - [`config`] - Server configuration
//! - [`state`] - Application state (store, registry, configuration)
//! - [`handlers`] - HTTP request handlers for each operation
//! - [`extractors`] - Request body extraction
//! - [`responses`] - Response header generation
//! - [`routing`] - Route configuration

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod responses;
pub mod routing;
pub mod state;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use config::{ServerConfig, StorageBackendMode};
pub use error::{RestError, RestResult};
pub use state::AppState;

use std::sync::Arc;

use axum::Router;
use sisbase_persistence::EntityStore;
use sisbase_persistence::error::StorageResult;
use sisbase_persistence::schema::EntityRegistry;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Creates the Axum application for the built-in collections with default
/// configuration.
///
/// For more control, use [`create_app_with_config`].
pub fn create_app<S>(storage: S) -> StorageResult<Router>
where
    S: EntityStore + 'static,
{
    Ok(create_app_with_config(
        storage,
        EntityRegistry::builtin()?,
        ServerConfig::default(),
    ))
}

/// Creates the Axum application with a custom registry and configuration.
///
/// # Arguments
///
/// * `storage` - The storage backend to use
/// * `registry` - The collections to serve
/// * `config` - Server configuration
pub fn create_app_with_config<S>(storage: S, registry: EntityRegistry, config: ServerConfig) -> Router
where
    S: EntityStore + 'static,
{
    info!(
        backend = storage.backend_name(),
        collections = registry.len(),
        prefix = %config.normalized_prefix(),
        "Creating SisBase API server"
    );

    let prefix = config.normalized_prefix().to_string();
    let state = AppState::new(Arc::new(storage), registry, config.clone());
    let router = routing::create_routes(state, &prefix);

    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            std::time::Duration::from_secs(config.request_timeout),
        ));

    let router = if config.enable_cors {
        router.layer(build_cors_layer(&config))
    } else {
        router
    };

    router.layer(service_builder)
}

/// Builds the CORS layer based on configuration.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut cors = CorsLayer::new();

    if config.cors_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    if config.cors_methods == "*" {
        cors = cors.allow_methods(Any);
    } else {
        let methods: Vec<_> = config
            .cors_methods
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_methods(methods);
    }

    if config.cors_headers == "*" {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<_> = config
            .cors_headers
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    cors
}

/// Initializes the tracing subscriber for logging.
///
/// Call once at startup. `RUST_LOG` takes precedence over `level`.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "sisbase={level},sisbase_rest={level},sisbase_persistence={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
