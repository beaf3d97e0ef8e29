//! Evolution API gateway client
//!
//! Wraps `reqwest::Client` with the gateway's static API-key header and
//! per-endpoint-class timeouts: instance lifecycle calls get the longest
//! budget, status probes the shortest. The retry/classification contract
//! matches the storage adapter: transport failures and 5xx responses are
//! retried per policy, a completed 4xx is classified immediately.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response};
use tracing::{info, warn};

use skybridge_core::config::GatewaySettings;
use skybridge_core::domain::errors::AdapterError;
use skybridge_core::retry::RetryPolicy;

/// Connect timeout for every outbound call
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Total timeout for instance lifecycle calls (create, logout, delete);
/// the gateway can take over a minute to tear down a device session
pub const LIFECYCLE_TIMEOUT: Duration = Duration::from_secs(75);

/// Total timeout for status and pairing probes
pub const STATUS_TIMEOUT: Duration = Duration::from_secs(15);

/// Total timeout for message sends
pub const SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for Evolution API gateway calls
#[derive(Debug)]
pub struct EvolutionClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl EvolutionClient {
    /// Creates a new EvolutionClient from validated connection settings
    pub fn from_settings(settings: &GatewaySettings) -> Result<Self, AdapterError> {
        settings.has_valid_settings()?;
        Self::with_base_url(settings.base_url.clone(), settings.api_key.clone())
    }

    /// Creates a new EvolutionClient with an explicit base URL (useful for testing)
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, AdapterError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| AdapterError::ConfigIncomplete(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    /// Creates a request builder with the API-key header and a timeout
    pub fn request(&self, method: Method, path: &str, timeout: Duration) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client
            .request(method, &url)
            .header("apikey", &self.api_key)
            .timeout(timeout)
    }

    /// Executes a request under the given retry policy
    ///
    /// Transport failures and 5xx responses are retried with the policy's
    /// fixed delay; any other completed non-2xx response is classified
    /// immediately and returned as an error.
    pub async fn execute_with_retry(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
        policy: RetryPolicy,
        timeout: Duration,
    ) -> Result<Response, AdapterError> {
        let mut attempt: u32 = 0;
        loop {
            let mut request = self.request(method.clone(), path, timeout);
            if let Some(json) = body {
                request = request.json(json);
            }

            match request.send().await {
                Ok(response) if response.status().is_success() => {
                    if attempt > 0 {
                        info!(path, attempt, "Gateway request succeeded after retry");
                    }
                    return Ok(response);
                }
                Ok(response) => {
                    let code = response.status().as_u16();
                    if AdapterError::is_retryable_status(code) && policy.should_retry(attempt) {
                        warn!(path, code, attempt, "Gateway server error, retrying");
                        tokio::time::sleep(policy.delay).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(classify_error(response).await);
                }
                Err(err) if policy.should_retry(attempt) => {
                    warn!(path, %err, attempt, "Gateway transport failure, retrying");
                    tokio::time::sleep(policy.delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    return Err(AdapterError::RemoteUnavailable(err.to_string()));
                }
            }
        }
    }
}

/// Classifies a completed non-2xx response, preserving the gateway body
pub(crate) async fn classify_error(response: Response) -> AdapterError {
    let code = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unable to read error body".to_string());
    AdapterError::from_status(code, body)
}
