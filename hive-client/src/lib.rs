//! Hive HTTP Client
//!
//! A small, type-safe HTTP client for the hive backend that serves pipeline
//! topology and state and relays operator commands onto the message bus.
//!
//! # Example
//!
//! ```no_run
//! use hive_client::HiveClient;
//!
//! #[tokio::main]
//! async fn main() -> hive_client::Result<()> {
//!     let client = HiveClient::new("http://localhost:8090");
//!
//!     let snapshot = client.fetch_snapshot().await?;
//!     for name in snapshot.info.keys() {
//!         println!("pipeline: {}", name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
mod commands;
mod pipelines;
mod reports;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use hive_core::dto::snapshot::Snapshot;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

/// HTTP client for the hive API
///
/// Endpoints are grouped by concern:
/// - Snapshots of pipeline topology and state
/// - Operator commands
/// - The backend's error report
#[derive(Debug, Clone)]
pub struct HiveClient {
    /// Base URL of the hive (e.g., "http://localhost:8090")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl HiveClient {
    /// Create a new hive client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the hive (e.g., "http://localhost:8090")
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new hive client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use hive_client::HiveClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(10))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = HiveClient::with_client("http://localhost:8090", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the hive
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let response = self.check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response whose body carries no data
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        self.check_status(response).await.map(|_| ())
    }

    /// Maps non-success statuses onto client errors
    ///
    /// 503 is how the hive says it lost the message bus, so it gets its own
    /// variant.
    async fn check_status(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        if status == StatusCode::SERVICE_UNAVAILABLE {
            return Err(ClientError::HiveDisconnect(error_text));
        }

        Err(ClientError::api_error(status.as_u16(), error_text))
    }
}
