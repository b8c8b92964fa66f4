//! Relay HTTP Client
//!
//! A small, typed HTTP client for the Jenkins remote access API.
//!
//! It covers the three calls the orchestrator needs: triggering a job,
//! reading a queue entry, and reading a build.
//!
//! # Example
//!
//! ```no_run
//! use relay_client::{Credentials, JenkinsClient};
//! use relay_core::domain::job::JobSpec;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = JenkinsClient::new(
//!         "https://ci.example.com",
//!         Credentials::new("bot", "api-token"),
//!         "build-token",
//!     )?;
//!
//!     let queue = client.submit(&JobSpec::new("deploy").with_parameter("env", "prod")).await?;
//!     println!("Queued at {}", queue);
//!     Ok(())
//! }
//! ```

mod builds;
pub mod error;
mod jobs;
mod queue;
#[cfg(test)]
mod testing;

pub use error::{ClientError, Result};

use reqwest::Client;
use reqwest::redirect::Policy;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Per-request timeout used by [`JenkinsClient::new`]
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Basic-auth credentials for the CI server
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// HTTP client for the Jenkins API
#[derive(Debug, Clone)]
pub struct JenkinsClient {
    /// Base URL of the CI server (e.g., "https://ci.example.com")
    base_url: String,
    credentials: Credentials,
    /// Remote trigger token appended to build requests
    build_token: String,
    client: Client,
}

impl JenkinsClient {
    /// Create a new client with the default request timeout
    pub fn new(
        base_url: impl Into<String>,
        credentials: Credentials,
        build_token: impl Into<String>,
    ) -> Result<Self> {
        Self::with_timeout(base_url, credentials, build_token, DEFAULT_TIMEOUT)
    }

    /// Create a new client whose requests fail after `timeout`
    ///
    /// Redirects are disabled so the queue `Location` of a submission stays
    /// visible even when the server answers with a 3xx.
    pub fn with_timeout(
        base_url: impl Into<String>,
        credentials: Credentials,
        build_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .redirect(Policy::none())
            .timeout(timeout)
            .build()?;
        Ok(Self::with_client(base_url, credentials, build_token, client))
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(
        base_url: impl Into<String>,
        credentials: Credentials,
        build_token: impl Into<String>,
        client: Client,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            build_token: build_token.into(),
            client,
        }
    }

    /// Get the base URL of the CI server
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/job/{name}/`
    fn job_url(&self, job_name: &str) -> String {
        format!("{}/job/{}/", self.base_url, job_name)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Authenticated GET of a JSON document
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Handle an API response and deserialize JSON
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

/// Appends the JSON API suffix to a Jenkins resource URL
pub(crate) fn api_json_url(resource_url: &str) -> String {
    format!("{}/api/json", resource_url.trim_end_matches('/'))
}
