//! Google Drive API client
//!
//! Provides a typed HTTP client for the Drive v3 API. Handles
//! authentication headers, endpoint construction, mandatory timeouts,
//! and the uniform retry/classification policy: transport failures and
//! 5xx responses are retried per policy, a completed 4xx response is
//! classified immediately and never retried.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use tracing::{debug, info, warn};

use skybridge_core::config::DriveSettings;
use skybridge_core::domain::errors::AdapterError;
use skybridge_core::retry::RetryPolicy;

/// Connect timeout for every outbound call
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Total timeout for every outbound call
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for Google Drive API calls
///
/// Wraps `reqwest::Client` with bearer authentication and base URL
/// construction for both the metadata host and the separate upload host.
#[derive(Debug)]
pub struct DriveClient {
    /// The underlying HTTP client
    client: Client,
    /// Base URL for metadata requests
    api_base_url: String,
    /// Base URL for upload requests
    upload_base_url: String,
    /// Current OAuth2 access token
    access_token: String,
}

impl DriveClient {
    /// Creates a new DriveClient from validated connection settings
    ///
    /// # Errors
    /// Fails fast with `ConfigIncomplete` before any network call when
    /// the settings are missing fields, or when the HTTP client cannot
    /// be constructed.
    pub fn from_settings(
        settings: &DriveSettings,
        access_token: impl Into<String>,
    ) -> Result<Self, AdapterError> {
        settings.has_valid_settings()?;
        Self::with_base_urls(
            access_token,
            settings.api_base_url.clone(),
            settings.upload_base_url.clone(),
        )
    }

    /// Creates a new DriveClient with custom base URLs (useful for testing)
    pub fn with_base_urls(
        access_token: impl Into<String>,
        api_base_url: impl Into<String>,
        upload_base_url: impl Into<String>,
    ) -> Result<Self, AdapterError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AdapterError::ConfigIncomplete(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base_url: api_base_url.into(),
            upload_base_url: upload_base_url.into(),
            access_token: access_token.into(),
        })
    }

    /// Updates the access token (e.g., after a token refresh)
    pub fn set_access_token(&mut self, token: impl Into<String>) {
        self.access_token = token.into();
        debug!("Updated DriveClient access token");
    }

    /// Returns a reference to the current access token
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Creates an authenticated request builder against the metadata host
    ///
    /// # Arguments
    /// * `method` - HTTP method
    /// * `path` - API path relative to the base URL (e.g., "/files")
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.api_base_url, path);
        self.client
            .request(method, &url)
            .bearer_auth(&self.access_token)
    }

    /// Creates an authenticated request builder against the upload host
    pub fn upload_request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.upload_base_url, path);
        self.client
            .request(method, &url)
            .bearer_auth(&self.access_token)
    }

    /// Executes a JSON/query request under the given retry policy
    ///
    /// Transport failures and 5xx responses are retried with the policy's
    /// fixed delay until attempts run out; any other completed non-2xx
    /// response is classified immediately via [`classify_error`].
    pub async fn execute_with_retry(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&serde_json::Value>,
        policy: RetryPolicy,
    ) -> Result<Response, AdapterError> {
        let mut attempt: u32 = 0;
        loop {
            let mut request = self.request(method.clone(), path);
            if !query.is_empty() {
                request = request.query(query);
            }
            if let Some(json) = body {
                request = request.json(json);
            }

            match request.send().await {
                Ok(response) if response.status().is_success() => {
                    if attempt > 0 {
                        info!(path, attempt, "Request succeeded after retry");
                    }
                    return Ok(response);
                }
                Ok(response) => {
                    let status = response.status();
                    if is_retryable(status) && policy.should_retry(attempt) {
                        warn!(path, %status, attempt, "Server error, retrying");
                        tokio::time::sleep(policy.delay).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(classify_error(response).await);
                }
                Err(err) if policy.should_retry(attempt) => {
                    warn!(path, %err, attempt, "Transport failure, retrying");
                    tokio::time::sleep(policy.delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    return Err(AdapterError::RemoteUnavailable(err.to_string()));
                }
            }
        }
    }

    /// Returns a reference to the underlying HTTP client
    ///
    /// Useful for requests against absolute URLs (e.g., resumable upload
    /// session URLs) that bypass base URL construction.
    pub(crate) fn http_client(&self) -> &Client {
        &self.client
    }
}

/// Whether a completed response is worth retrying (5xx only)
fn is_retryable(status: StatusCode) -> bool {
    AdapterError::is_retryable_status(status.as_u16())
}

/// Classifies a completed non-2xx response, preserving the provider body
pub(crate) async fn classify_error(response: Response) -> AdapterError {
    let code = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unable to read error body".to_string());
    AdapterError::from_status(code, body)
}
