//! Listing and search handler.
//!
//! `GET [base]/[entity]?search=<text>&limit=<n>&offset=<n>`

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sisbase_persistence::EntityStore;
use sisbase_persistence::schema::ReadSource;
use sisbase_persistence::search::{SearchPlan, SearchRequest};
use tracing::debug;

use crate::error::RestResult;
use crate::responses::ResponseHeaders;
use crate::state::AppState;

/// Handler for collection listings.
///
/// The search term is read from the collection's query parameter (`search`,
/// or `query` for some collections). Without a usable term the collection's
/// empty-query policy decides between an empty array and a default page.
/// Malformed `limit`/`offset` values fall back to defaults and never fail.
///
/// # Response
///
/// - `200 OK` - JSON array, with cache-disabling headers
/// - `404 Not Found` - Unknown collection
pub async fn search_handler<S>(
    State(state): State<AppState<S>>,
    Path(entity): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> RestResult<Response>
where
    S: EntityStore,
{
    let schema = state.schema(&entity)?;
    let request = SearchRequest::from_params(&schema.search, &params);
    let plan = SearchPlan::build(&schema.search, &request, state.pagination());

    debug!(
        entity = %entity,
        skip = plan.is_skip(),
        plan = ?plan,
        "Processing search request"
    );

    let records = state
        .storage()
        .search(ReadSource::Table(schema), &plan)
        .await?;

    debug!(entity = %entity, count = records.len(), "Search complete");

    Ok((
        StatusCode::OK,
        ResponseHeaders::listing().to_header_map(),
        Json(records),
    )
        .into_response())
}
