//! Error types for the hive client

use hive_core::dto::snapshot::SnapshotError;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the hive
#[derive(Debug, Error)]
pub enum ClientError {
    /// The hive could not be reached at all
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The hive is up but has lost its connection to the message bus
    #[error("hive is disconnected from the message bus: {0}")]
    HiveDisconnect(String),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Snapshot decoded but is internally inconsistent
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(#[from] SnapshotError),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Check if the hive reported a message-bus disconnect
    pub fn is_hive_disconnect(&self) -> bool {
        matches!(self, Self::HiveDisconnect(_))
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 400 && *status < 500)
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 500)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_predicates() {
        assert!(ClientError::api_error(400, "bad").is_client_error());
        assert!(ClientError::api_error(500, "boom").is_server_error());
        assert!(!ClientError::api_error(500, "boom").is_hive_disconnect());
        assert!(ClientError::HiveDisconnect("Failure".to_string()).is_hive_disconnect());
    }
}
