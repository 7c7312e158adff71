//! CLI-specific error types
//!
//! All CLI errors are fatal; `main` prints them and exits non-zero.

use std::fmt;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration error
    ConfigError,
    /// Boot failed
    BootFailed,
    /// Store did not answer
    StoreUnreachable,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "CITYSTORE_CLI_CONFIG_ERROR",
            Self::BootFailed => "CITYSTORE_CLI_BOOT_FAILED",
            Self::StoreUnreachable => "CITYSTORE_CLI_STORE_UNREACHABLE",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// Boot failed
    pub fn boot_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::BootFailed, msg)
    }

    /// Store unreachable
    pub fn store_unreachable(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::StoreUnreachable, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CliError::config_error("missing MONGO_USER");
        assert_eq!(
            err.to_string(),
            "CITYSTORE_CLI_CONFIG_ERROR: missing MONGO_USER"
        );
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }
}
