//! Store adapter error types

use thiserror::Error;

/// Store adapter result type
pub type StoreResult<T> = Result<T, StoreError>;

/// Store adapter errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing service cannot be reached
    #[error("store unreachable: {0}")]
    Unreachable(String),

    /// Invalid connection configuration
    #[error("invalid store configuration: {0}")]
    Config(String),

    /// Driver-level failure that is not a connectivity problem
    #[error("store driver error: {0}")]
    Driver(String),

    /// Document could not be encoded/decoded for the wire
    #[error("document encoding error: {0}")]
    Encoding(String),
}

impl StoreError {
    /// Create an unreachable error
    pub fn unreachable(msg: impl Into<String>) -> Self {
        Self::Unreachable(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an encoding error
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::ErrorKind;

        // Server selection and I/O failures mean the service is not
        // reachable; everything else is a driver problem.
        match &*err.kind {
            ErrorKind::ServerSelection { .. } | ErrorKind::Io(_) => {
                Self::Unreachable(err.to_string())
            }
            _ => Self::Driver(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::unreachable("connection refused");
        assert_eq!(err.to_string(), "store unreachable: connection refused");

        let err = StoreError::config("CLOUD_MONGO=1 requires MONGO_USER");
        assert!(err.to_string().starts_with("invalid store configuration"));
    }
}
