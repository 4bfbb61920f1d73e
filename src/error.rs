//! Error types for the background removal client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Library-level failures outside the workflow's user-facing error banner
#[derive(Error, Debug)]
pub enum ClientError {
    /// Input/output errors (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration or parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// HTTP client construction or request failures
    #[error("Network error: {0}")]
    Network(String),

    /// The service answered with something other than what was asked for
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// A session transition that would break the session invariants
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

impl ClientError {
    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a new unexpected response error
    pub fn unexpected_response<S: Into<String>>(msg: S) -> Self {
        Self::UnexpectedResponse(msg.into())
    }

    /// Create a new invalid transition error
    pub fn invalid_transition<S: Into<String>>(msg: S) -> Self {
        Self::InvalidTransition(msg.into())
    }

    /// Create network error with operation context
    pub fn network<E: std::fmt::Display>(operation: &str, error: E) -> Self {
        Self::Network(format!("{}: {}", operation, error))
    }

    /// Create file I/O error with operation context
    pub fn file_io_error<P: AsRef<std::path::Path>>(
        operation: &str,
        path: P,
        error: &std::io::Error,
    ) -> Self {
        let path_display = path.as_ref().display();
        Self::Io(std::io::Error::new(
            error.kind(),
            format!("Failed to {} '{}': {}", operation, path_display, error),
        ))
    }

    /// Create configuration error with the accepted values
    pub fn config_value_error<T: std::fmt::Display>(
        parameter: &str,
        value: T,
        expected: &str,
    ) -> Self {
        Self::InvalidConfig(format!(
            "Invalid {}: {} (expected: {})",
            parameter, value, expected
        ))
    }
}
