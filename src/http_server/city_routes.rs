//! City HTTP Routes
//!
//! CRUD endpoints over the city query module.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use serde_json::Value;

use crate::cities::{CityQueries, STATE_CODE};
use crate::error::QueryError;
use crate::store::Document;

use super::response::RecordsResponse;

type CityState = Arc<CityQueries>;

/// Create city routes
pub fn city_routes(queries: CityState) -> Router {
    Router::new()
        .route("/cities/read", get(read_all_handler))
        .route("/cities", get(list_handler))
        .route("/cities", post(create_handler))
        .route("/cities/{id}", get(get_handler))
        .route("/cities/{id}", patch(patch_handler))
        .route("/cities/{id}", delete(delete_handler))
        .with_state(queries)
}

/// All cities plus a record count
async fn read_all_handler(
    State(queries): State<CityState>,
) -> Result<Json<RecordsResponse<HashMap<String, Document>>>, QueryError> {
    let cities = queries.read().await?;
    let count = cities.len();
    Ok(Json(RecordsResponse::new(cities, count)))
}

/// Parse a `limit` query value; non-positive or unparsable values are
/// ignored
fn parse_limit(raw: &str) -> Option<usize> {
    raw.parse::<usize>().ok().filter(|limit| *limit > 0)
}

/// Keep only records whose state code matches, case-insensitively
fn filter_state_code(list: &mut Vec<Document>, code: &str) {
    list.retain(|rec| {
        rec.get(STATE_CODE)
            .and_then(Value::as_str)
            .unwrap_or("")
            .eq_ignore_ascii_case(code)
    });
}

/// City listing with optional `state_code` and `limit` query params
async fn list_handler(
    State(queries): State<CityState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Vec<Document>> {
    // A connection failure degrades to an empty list on this surface.
    let cities = match queries.read().await {
        Ok(cities) => cities,
        Err(_) => return Json(Vec::new()),
    };

    let mut list: Vec<Document> = cities.into_values().collect();
    if let Some(code) = params.get("state_code").filter(|s| !s.is_empty()) {
        filter_state_code(&mut list, code);
    }
    if let Some(limit) = params.get("limit").and_then(|raw| parse_limit(raw)) {
        list.truncate(limit);
    }
    Json(list)
}

/// Create a city from `{name, state_code, ...}` and return the new record
async fn create_handler(
    State(queries): State<CityState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Option<Document>>), QueryError> {
    let new_id = queries.create(&body).await?;
    let rec = queries.read_one(&new_id).await?;
    Ok((StatusCode::CREATED, Json(rec)))
}

/// Single city by id
async fn get_handler(
    State(queries): State<CityState>,
    Path(id): Path<String>,
) -> Result<Json<Document>, QueryError> {
    let rec = queries
        .read_one(&id)
        .await?
        .ok_or_else(|| QueryError::not_found(format!("city not found: {id}")))?;
    Ok(Json(rec))
}

/// Partially update a city
async fn patch_handler(
    State(queries): State<CityState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Document>, QueryError> {
    // A missing patch target is reported as a bad request on this surface.
    let updated = queries.update(&id, &body).await.map_err(|err| match err {
        QueryError::NotFound(msg) => QueryError::InvalidArgument(msg),
        other => other,
    })?;
    Ok(Json(updated))
}

/// Delete a city by id
async fn delete_handler(
    State(queries): State<CityState>,
    Path(id): Path<String>,
) -> Result<StatusCode, QueryError> {
    queries.delete_by_id(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
