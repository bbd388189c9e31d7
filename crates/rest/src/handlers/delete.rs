//! Delete handler.
//!
//! `DELETE [base]/[entity]/[key]`

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use sisbase_persistence::EntityStore;
use tracing::debug;

use crate::error::RestResult;
use crate::handlers::{checked_key, found};
use crate::state::AppState;

/// Confirmation message of a successful delete.
pub const DELETED_MESSAGE: &str = "Registro eliminado exitosamente.";

/// Handler for record deletion.
///
/// # Response
///
/// - `200 OK` - `{"message": ..., "deleted_record": {...}}`
/// - `400 Bad Request` - Key not valid for the collection's key column
/// - `404 Not Found` - Unknown collection or no record with this key
pub async fn delete_handler<S>(
    State(state): State<AppState<S>>,
    Path((entity, key)): Path<(String, String)>,
) -> RestResult<Response>
where
    S: EntityStore,
{
    debug!(entity = %entity, key = %key, "Processing delete request");

    let schema = state.schema(&entity)?;
    let key = checked_key(schema, &key)?;

    let record = found(schema, key, state.storage().delete(schema, key).await?)?;
    debug!(entity = %entity, key = %key, "Record deleted");
    Ok((
        StatusCode::OK,
        Json(json!({
            "message": DELETED_MESSAGE,
            "deleted_record": record,
        })),
    )
        .into_response())
}
