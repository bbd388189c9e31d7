//! Route table.
//!
//! Every registered collection shares the same five routes; the handlers
//! resolve the collection from the first path segment.

use axum::{Router, routing::get};
use sisbase_persistence::EntityStore;

use crate::handlers;
use crate::state::AppState;

/// Creates all routes of the HTTP API.
///
/// # Routes
///
/// ## Service-level
/// - `GET /` - Liveness banner
/// - `GET /health` - Health check
///
/// ## Collection-level (under `prefix`)
/// - `GET /{entity}` - List or search
/// - `POST /{entity}` - Create
///
/// ## Record-level (under `prefix`)
/// - `GET /{entity}/{key}` - Read, or list the view named `key`
/// - `PUT /{entity}/{key}` - Update
/// - `DELETE /{entity}/{key}` - Delete
///
/// An empty `prefix` mounts the collection routes at the root.
pub fn create_routes<S>(state: AppState<S>, prefix: &str) -> Router
where
    S: EntityStore + 'static,
{
    let collections = Router::new()
        .route(
            "/{entity}",
            get(handlers::search_handler::<S>).post(handlers::create_handler::<S>),
        )
        .route(
            "/{entity}/{key}",
            get(handlers::read_handler::<S>)
                .put(handlers::update_handler::<S>)
                .delete(handlers::delete_handler::<S>),
        );

    let service = Router::new()
        .route("/", get(handlers::root_handler))
        .route("/health", get(handlers::health_handler::<S>));

    let router = if prefix.is_empty() {
        service.merge(collections)
    } else {
        service.nest(prefix, collections)
    };

    router.with_state(state)
}
