//! Read handler.
//!
//! `GET [base]/[entity]/[key]`, which also serves `GET [base]/[entity]/[view]`
//! for collections backed by precomputed views.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sisbase_persistence::schema::{EntitySchema, ViewSchema};
use sisbase_persistence::search::SearchRequest;
use sisbase_persistence::{EntityStore, ViewBackedReader};
use tracing::debug;

use crate::error::RestResult;
use crate::handlers::{checked_key, found};
use crate::responses::ResponseHeaders;
use crate::state::AppState;

/// Handler for reading a record by key.
///
/// A second segment naming one of the collection's views (e.g.
/// `/itaipu/detalles`) lists that view instead, with the same query
/// parameters as [`search_handler`](super::search_handler).
///
/// # Response
///
/// - `200 OK` - The record, or a JSON array for a view
/// - `400 Bad Request` - Key not valid for the collection's key column
/// - `404 Not Found` - Unknown collection or no record with this key
pub async fn read_handler<S>(
    State(state): State<AppState<S>>,
    Path((entity, key)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
) -> RestResult<Response>
where
    S: EntityStore,
{
    let schema = state.schema(&entity)?;

    if let Some(view) = schema.view(&key) {
        return read_view(&state, schema, view, &params).await;
    }

    debug!(entity = %entity, key = %key, "Processing read request");

    let key = checked_key(schema, &key)?;
    let record = found(schema, key, state.storage().get_by_key(schema, key).await?)?;
    Ok((StatusCode::OK, Json(record)).into_response())
}

async fn read_view<S: EntityStore>(
    state: &AppState<S>,
    schema: &EntitySchema,
    view: &ViewSchema,
    params: &HashMap<String, String>,
) -> RestResult<Response> {
    let request = SearchRequest::from_params(&view.profile, params);
    let records = ViewBackedReader::new(state.storage(), schema, view)
        .read(&request, state.pagination())
        .await?;

    debug!(
        entity = %schema.name,
        view = %view.segment,
        count = records.len(),
        "View listing complete"
    );

    Ok((
        StatusCode::OK,
        ResponseHeaders::listing().to_header_map(),
        Json(records),
    )
        .into_response())
}
