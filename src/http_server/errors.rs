//! # HTTP Error Mapping
//!
//! Translates query error kinds into HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::QueryError;

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<QueryError> for ErrorResponse {
    fn from(err: QueryError) -> Self {
        Self {
            code: err.status_code(),
            error: err.to_string(),
        }
    }
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}
