//! Load Testing HTTP Client
//!
//! A small, type-safe HTTP client for the cloud load testing API and the
//! operation service that tracks its long-running calls.
//!
//! Every mutating call returns an [`Operation`](loadtest_core::domain::operation::Operation);
//! use [`LoadTestingClient::wait_operation_result`] to block until it is done
//! and decode the resource it produced.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use loadtest_client::LoadTestingClient;
//! use loadtest_core::domain::config::Config;
//! use loadtest_core::dto::config::CreateConfigRequest;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = LoadTestingClient::new("https://loadtesting.api.cloud.yandex.net", "t1.token");
//!
//!     let op = client.create_config(&CreateConfigRequest {
//!         folder_id: "b1g0000000000000000".to_string(),
//!         yaml_string: "phantom:\n  enabled: true\n".to_string(),
//!     }).await?;
//!     let config: Config = client.wait_operation_result(op, Duration::from_secs(60)).await?;
//!
//!     println!("Created config: {}", config.id);
//!     Ok(())
//! }
//! ```

mod agents;
mod configs;
pub mod error;
mod operations;
mod reports;
mod test_runs;

// Re-export commonly used types
pub use error::{ClientError, Result};

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

/// Path prefix of the load testing REST API
const API_PREFIX: &str = "loadtesting/api/v1";

/// Default interval between operation status checks
const DEFAULT_OPERATION_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// HTTP client for the load testing API
///
/// This client provides methods for the endpoints the end-to-end suite uses,
/// organized into logical groups:
/// - Agents (create, get, delete)
/// - Configs (create, get)
/// - Tests (create, get)
/// - Reports (table report)
/// - Operations (get, wait)
#[derive(Clone)]
pub struct LoadTestingClient {
    /// Base URL of the load testing API (e.g., "https://loadtesting.api.cloud.yandex.net")
    api_url: String,
    /// Base URL of the operation service
    operation_url: String,
    /// IAM token sent as a bearer credential
    token: String,
    /// How often `wait_operation` checks an operation
    operation_poll_interval: Duration,
    /// HTTP client instance
    client: Client,
}

impl LoadTestingClient {
    /// Create a new load testing client
    ///
    /// Operations are looked up on the same host until
    /// [`with_operation_url`](Self::with_operation_url) says otherwise.
    ///
    /// # Arguments
    /// * `api_url` - The base URL of the load testing API
    /// * `token` - IAM token used for every request
    ///
    /// # Example
    /// ```
    /// use loadtest_client::LoadTestingClient;
    ///
    /// let client = LoadTestingClient::new("http://localhost:8080", "token");
    /// assert_eq!(client.operation_url(), "http://localhost:8080");
    /// ```
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_client(api_url, token, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Arguments
    /// * `api_url` - The base URL of the load testing API
    /// * `token` - IAM token used for every request
    /// * `client` - A configured reqwest Client
    pub fn with_client(api_url: impl Into<String>, token: impl Into<String>, client: Client) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self {
            operation_url: api_url.clone(),
            api_url,
            token: token.into(),
            operation_poll_interval: DEFAULT_OPERATION_POLL_INTERVAL,
            client,
        }
    }

    /// Use a separate host for the operation service
    pub fn with_operation_url(mut self, operation_url: impl Into<String>) -> Self {
        self.operation_url = operation_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Change how often operations are checked while waiting on them
    pub fn with_operation_poll_interval(mut self, interval: Duration) -> Self {
        self.operation_poll_interval = interval;
        self
    }

    /// Get the base URL of the load testing API
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Get the base URL of the operation service
    pub fn operation_url(&self) -> &str {
        &self.operation_url
    }

    pub fn operation_poll_interval(&self) -> Duration {
        self.operation_poll_interval
    }

    /// Build a load testing API URL from a relative path
    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}/{}", self.api_url, API_PREFIX, path)
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
            if status == StatusCode::NOT_FOUND {
                return Err(ClientError::NotFound(error_text));
            }
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}

impl std::fmt::Debug for LoadTestingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadTestingClient")
            .field("api_url", &self.api_url)
            .field("operation_url", &self.operation_url)
            .field("token", &"<redacted>")
            .field("operation_poll_interval", &self.operation_poll_interval)
            .finish()
    }
}
