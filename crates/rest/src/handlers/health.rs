//! Liveness banner and health check handlers.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sisbase_persistence::EntityStore;
use tracing::{debug, warn};

use crate::error::{RestError, RestResult};
use crate::state::AppState;

/// Plain-text banner served at `/`.
pub const BANNER: &str = "Servidor de SisBase en funcionamiento.";

/// Message of a failed health check.
pub const UNAVAILABLE_MESSAGE: &str = "El almacenamiento no está disponible.";

/// Handler for the root liveness banner.
///
/// `GET /`
pub async fn root_handler() -> impl IntoResponse {
    BANNER
}

/// Handler for the health check endpoint.
///
/// Runs the store's health check, useful for load balancers and monitoring.
///
/// # HTTP Request
///
/// `GET [base]/health`
///
/// # Response
///
/// - `200 OK` - Store reachable
/// - `503 Service Unavailable` - Store health check failed
pub async fn health_handler<S>(State(state): State<AppState<S>>) -> RestResult<Response>
where
    S: EntityStore,
{
    debug!("Processing health check request");

    let backend_name = state.storage().backend_name();
    if let Err(e) = state.storage().health_check().await {
        warn!(backend = backend_name, error = %e, "Health check failed");
        return Err(RestError::ServiceUnavailable {
            message: UNAVAILABLE_MESSAGE.to_string(),
        });
    }

    let body = serde_json::json!({
        "status": "healthy",
        "backend": backend_name,
        "collections": state.registry().len(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    });

    Ok((StatusCode::OK, Json(body)).into_response())
}
