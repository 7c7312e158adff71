//! Query Error Types
//!
//! Unified error handling for the city and state query modules.

use thiserror::Error;

use crate::store::StoreError;

/// Query module result type
pub type QueryResult<T> = Result<T, QueryError>;

/// Caller-visible error kinds for query operations
#[derive(Debug, Clone, Error)]
pub enum QueryError {
    /// Bad type, missing required field, or malformed code/id
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Delete/update target absent
    #[error("not found: {0}")]
    NotFound(String),

    /// Document store unreachable
    #[error("connection failure: {0}")]
    ConnectionFailure(String),
}

impl QueryError {
    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a connection failure error
    pub fn connection_failure(msg: impl Into<String>) -> Self {
        Self::ConnectionFailure(msg.into())
    }

    /// Get error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::ConnectionFailure(_) => "CONNECTION_FAILURE",
        }
    }

    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidArgument(_) => 400,
            Self::NotFound(_) => 404,
            Self::ConnectionFailure(_) => 503,
        }
    }
}

/// Store failures on the read path surface as connection failures.
///
/// Best-effort writes never go through this conversion; their errors are
/// logged and dropped at the call site.
impl From<StoreError> for QueryError {
    fn from(err: StoreError) -> Self {
        Self::ConnectionFailure(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            QueryError::invalid_argument("bad").status_code(),
            400
        );
        assert_eq!(QueryError::not_found("gone").status_code(), 404);
        assert_eq!(
            QueryError::connection_failure("down").status_code(),
            503
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(QueryError::invalid_argument("x").code(), "INVALID_ARGUMENT");
        assert_eq!(QueryError::not_found("x").code(), "NOT_FOUND");
        assert_eq!(
            QueryError::connection_failure("x").code(),
            "CONNECTION_FAILURE"
        );
    }

    #[test]
    fn test_store_error_becomes_connection_failure() {
        let err: QueryError = StoreError::unreachable("no route to host").into();
        assert!(matches!(err, QueryError::ConnectionFailure(_)));
    }
}
