//! Error types for the `DevClub` client

use thiserror::Error;

/// Main error type for the `DevClub` client
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message
        message: String,
    },

    /// A required field is missing or malformed; raised before any request
    #[error("Validation error: {field} - {message}")]
    Validation {
        /// Field that failed validation
        field: String,
        /// Validation error message
        message: String,
    },

    /// The server rejected the bearer token (HTTP 401), or none was present
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Non-401 failure carrying the server-supplied detail
    #[error("{detail}")]
    Request {
        /// HTTP status code
        status: u16,
        /// Human-readable detail from the server, or a generic message
        detail: String,
    },

    /// No response was received
    #[error("{message}")]
    Network {
        /// Error message
        message: String,
    },

    /// Timeout error
    #[error("Operation timed out after {duration_ms}ms")]
    Timeout {
        /// Timeout duration in milliseconds
        duration_ms: u64,
    },

    /// The operation exists in the interface but has no backend behind it yet
    #[error("{operation} is not supported yet")]
    NotImplemented {
        /// Operation name
        operation: String,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Message shown when a request got no response at all
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection.";

impl Error {
    /// Shorthand for a validation failure on `field`
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for an unimplemented operation
    pub fn not_implemented(operation: impl Into<String>) -> Self {
        Self::NotImplemented {
            operation: operation.into(),
        }
    }

    /// Network error with the standard user-facing message
    pub fn network() -> Self {
        Self::Network {
            message: NETWORK_ERROR_MESSAGE.to_string(),
        }
    }

    /// Whether this error came from a 401 and evicted the session
    pub const fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }

    /// Text suitable for a transient user notification
    ///
    /// Unlike `Display`, this drops the category prefix for the errors whose
    /// payload is already a sentence written for the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Authentication(detail) => detail.clone(),
            Self::Validation { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
