//! Meta HTTP Routes
//!
//! Liveness probe, store health check, and live endpoint discovery.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{json, Value};

use crate::store::DocumentStore;

/// Shared state for the meta routes
pub struct MetaState {
    pub store: Arc<dyn DocumentStore>,
    /// Route templates served by the whole server
    pub routes: Vec<String>,
}

/// Store health response: `{ok, message|error}`
#[derive(Debug, Serialize)]
pub struct DbHealthResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Live, fetchable documentation of the available endpoints
#[derive(Debug, Serialize)]
pub struct EndpointsResponse {
    pub endpoints: Vec<String>,
}

/// Create meta routes
pub fn meta_routes(state: Arc<MetaState>) -> Router {
    Router::new()
        .route("/hello", get(hello_handler))
        .route("/health/db", get(db_health_handler))
        .route("/endpoints", get(endpoints_handler))
        .with_state(state)
}

/// Trivial endpoint to see if the server is running at all
async fn hello_handler() -> Json<Value> {
    Json(json!({"hello": "world"}))
}

/// Explicit store connectivity check
async fn db_health_handler(State(state): State<Arc<MetaState>>) -> impl IntoResponse {
    if state.store.ping().await {
        (
            StatusCode::OK,
            Json(DbHealthResponse {
                ok: true,
                message: Some("store reachable".to_string()),
                error: None,
            }),
        )
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(DbHealthResponse {
                ok: false,
                message: None,
                error: Some("store unreachable".to_string()),
            }),
        )
    }
}

/// Sorted list of registered route templates
async fn endpoints_handler(State(state): State<Arc<MetaState>>) -> Json<EndpointsResponse> {
    let mut endpoints = state.routes.clone();
    endpoints.sort();
    Json(EndpointsResponse { endpoints })
}
