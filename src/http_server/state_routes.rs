//! State HTTP Routes

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::error::QueryError;
use crate::states::StateQueries;
use crate::store::Document;

use super::response::RecordsResponse;

type StatesState = Arc<StateQueries>;

/// Create state routes
pub fn state_routes(queries: StatesState) -> Router {
    Router::new()
        .route("/state/read", get(read_all_handler))
        .route("/state/{code}", get(get_handler))
        .with_state(queries)
}

/// All states plus a record count
async fn read_all_handler(
    State(queries): State<StatesState>,
) -> Json<RecordsResponse<HashMap<String, Document>>> {
    let states = queries.read();
    let count = states.len();
    Json(RecordsResponse::new(states, count))
}

/// Single state by its postal code, e.g. `/state/NY`
async fn get_handler(
    State(queries): State<StatesState>,
    Path(code): Path<String>,
) -> Result<Json<Document>, QueryError> {
    let code = code.to_uppercase();
    queries
        .read_one(&code)
        .map(Json)
        .ok_or_else(|| QueryError::not_found(format!("state not found: {code}")))
}
