//! Jenga HTTP Client
//!
//! A small, typed HTTP client for the estimates API. It covers the two calls
//! the background-job flow needs: submitting an estimate job and asking for
//! the status of a previously submitted one.
//!
//! # Example
//!
//! ```no_run
//! use jenga_client::EstimatesClient;
//! use serde_json::json;
//!
//! # async fn example() -> jenga_client::Result<()> {
//! let client = EstimatesClient::new("http://localhost:8000");
//!
//! let handle = client
//!     .submit_estimate(&json!({ "project_name": "Duplex", "total_area": 240.0 }))
//!     .await?;
//! let status = client.task_status(&handle).await?;
//!
//! println!("{} -> {}", handle, status);
//! # Ok(())
//! # }
//! ```

pub mod error;
mod estimates;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use jenga_core::domain::job::JobHandle;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

/// HTTP client for the estimates API
#[derive(Debug, Clone)]
pub struct EstimatesClient {
    /// Base URL of the API server (e.g., "http://localhost:8000")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl EstimatesClient {
    /// Create a new estimates client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the API server (e.g., "http://localhost:8000")
    ///
    /// # Example
    /// ```
    /// use jenga_client::EstimatesClient;
    ///
    /// let client = EstimatesClient::new("http://localhost:8000");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new estimates client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use jenga_client::EstimatesClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = EstimatesClient::with_client("http://localhost:8000", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the API server
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build an endpoint URL from path segments
    ///
    /// Segments are percent-encoded, so opaque task ids are safe to pass.
    /// The path always ends with a slash, which the server's router expects.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ClientError::InvalidUrl(self.base_url.clone()))?;
            path.pop_if_empty().extend(segments).push("");
        }
        Ok(url)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
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
