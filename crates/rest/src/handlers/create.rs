//! Create handler.
//!
//! `POST [base]/[entity]`

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sisbase_persistence::EntityStore;
use sisbase_persistence::types::RecordInput;
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::JsonBody;
use crate::handlers::record_key;
use crate::responses::ResponseHeaders;
use crate::state::AppState;

/// Handler for record creation.
///
/// Surrogate keys are assigned by the store; natural-key collections require
/// the key in the body. Unknown body fields are ignored.
///
/// # Response
///
/// - `201 Created` - Returns the stored record with a `Location` header
/// - `400 Bad Request` - Missing natural key or non-numeric numeric field
/// - `404 Not Found` - Unknown collection
/// - `500 Internal Server Error` - Store failure, including duplicate keys
///
/// # Example
///
/// ```http
/// POST /api/abogados HTTP/1.1
/// Content-Type: application/json
///
/// {"cedula": "1234567", "nombres": "Ana", "apellidos": "Gómez"}
/// ```
pub async fn create_handler<S>(
    State(state): State<AppState<S>>,
    Path(entity): Path<String>,
    JsonBody(body): JsonBody,
) -> RestResult<Response>
where
    S: EntityStore,
{
    debug!(entity = %entity, "Processing create request");

    let schema = state.schema(&entity)?;
    let input = RecordInput::for_create(schema, &body)?;
    let record = state.storage().create(schema, &input).await?;

    let mut headers = ResponseHeaders::new();
    if let Some(key) = record_key(schema, &record) {
        debug!(entity = %entity, key = %key, "Record created");
        headers = headers.with_location(format!(
            "{}/{}/{}",
            state.config().normalized_prefix(),
            schema.name,
            key
        ));
    }

    Ok((StatusCode::CREATED, headers.to_header_map(), Json(record)).into_response())
}
