//! Update handler.
//!
//! `PUT [base]/[entity]/[key]`

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sisbase_persistence::types::RecordInput;
use sisbase_persistence::{EnrichmentResolver, EntityStore};
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::JsonBody;
use crate::handlers::{checked_key, found};
use crate::state::AppState;

/// Handler for record updates.
///
/// The update is a full replacement of the collection's fields: fields absent
/// from the body are cleared. For collections with an enrichment rule the
/// derived field is recomputed from the secondary collections before the
/// write, overriding any value in the body. Enrichment reads and the write
/// are separate statements; a failure between them leaves the record as it
/// was.
///
/// # Response
///
/// - `200 OK` - Returns the updated record
/// - `400 Bad Request` - Invalid key or field value
/// - `404 Not Found` - Unknown collection or no record with this key
pub async fn update_handler<S>(
    State(state): State<AppState<S>>,
    Path((entity, key)): Path<(String, String)>,
    JsonBody(body): JsonBody,
) -> RestResult<Response>
where
    S: EntityStore,
{
    debug!(entity = %entity, key = %key, "Processing update request");

    let schema = state.schema(&entity)?;
    let key = checked_key(schema, &key)?;
    let mut input = RecordInput::for_update(schema, &body)?;

    if schema.enrichment.is_some() {
        EnrichmentResolver::new(state.storage(), state.registry())
            .apply(schema, &mut input)
            .await?;
    }

    let record = found(schema, key, state.storage().update(schema, key, &input).await?)?;
    debug!(entity = %entity, key = %key, "Record updated");
    Ok((StatusCode::OK, Json(record)).into_response())
}
