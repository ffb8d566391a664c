//! Pulse HTTP Client
//!
//! A type-safe HTTP client for the compute API that hosts plugin instances.
//!
//! The monitor never talks to this client directly: it depends on the
//! [`api::InstanceApi`] trait, which this crate implements for
//! [`ComputeClient`]. Tests substitute their own implementation.
//!
//! # Example
//!
//! ```no_run
//! use pulse_client::ComputeClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), pulse_client::ClientError> {
//!     let client = ComputeClient::new("http://localhost:8000");
//!
//!     let details = client.get_instance(42).await?;
//!     println!("instance 42 is {:?}", details.status);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod error;
mod instances;

// Re-export commonly used types
pub use api::InstanceApi;
pub use error::{ClientError, Result};

use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for the compute API
///
/// Provides typed methods for the endpoints the monitor consumes:
/// - Instance details (status, summary, raw log blob)
/// - Paginated output file listings
#[derive(Debug, Clone)]
pub struct ComputeClient {
    /// Base URL of the compute API (e.g., "http://localhost:8000")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl ComputeClient {
    /// Create a new compute API client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the compute API (e.g., "http://localhost:8000")
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Create a new compute API client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use pulse_client::ComputeClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = ComputeClient::with_client("http://localhost:8000", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the compute API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Handle an API response and deserialize JSON
    ///
    /// Checks the status code and returns an appropriate error if the
    /// request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}
