//! OAuth2 refresh-token flow for the Google Drive API
//!
//! There is no interactive login here: the application is provisioned
//! with a long-lived refresh token obtained out of band, and this module
//! only mints short-lived access tokens from it.
//!
//! ## Components
//!
//! - [`RefreshFlow`] - token-endpoint-only OAuth2 client
//! - [`DriveAuthAdapter`] - classifies refresh failures into the adapter
//!   error taxonomy and produces port-level [`Tokens`]

use chrono::{Duration, Utc};
use oauth2::basic::{
    BasicClient, BasicErrorResponse, BasicErrorResponseType, BasicRequestTokenError,
};
use oauth2::{
    ClientId, ClientSecret, EndpointNotSet, EndpointSet, HttpClientError, RefreshToken,
    TokenResponse, TokenUrl,
};
use tracing::{debug, info};

use skybridge_core::config::DriveSettings;
use skybridge_core::domain::errors::AdapterError;
use skybridge_core::ports::remote_store::Tokens;

/// Google OAuth2 token endpoint
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Fallback access-token lifetime when the provider omits `expires_in`
const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;

// ============================================================================
// RefreshFlow
// ============================================================================

/// OAuth2 refresh flow using the `oauth2` crate
///
/// Only the token endpoint is configured; authorization and redirect
/// endpoints are never used in this flow.
pub struct RefreshFlow {
    client:
        BasicClient<EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>,
}

impl RefreshFlow {
    /// Creates a new RefreshFlow for the given client credentials
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        token_url: &str,
    ) -> Result<Self, AdapterError> {
        let token_uri = TokenUrl::new(token_url.to_string())
            .map_err(|e| AdapterError::ConfigIncomplete(format!("token URL: {e}")))?;

        let client = BasicClient::new(ClientId::new(client_id.into()))
            .set_client_secret(ClientSecret::new(client_secret.into()))
            .set_token_uri(token_uri);

        Ok(Self { client })
    }

    /// Mints a fresh access token from the stored refresh token
    pub async fn refresh(&self, refresh_token: &str) -> Result<Tokens, AdapterError> {
        debug!("Refreshing access token");

        let http_client = reqwest::Client::new();
        let token_result = self
            .client
            .exchange_refresh_token(&RefreshToken::new(refresh_token.to_string()))
            .request_async(&http_client)
            .await
            .map_err(classify_refresh_error)?;

        let expires_at = token_result
            .expires_in()
            .map(|d| Utc::now() + Duration::seconds(d.as_secs() as i64))
            .unwrap_or_else(|| Utc::now() + Duration::seconds(DEFAULT_TOKEN_LIFETIME_SECS));

        // Google does not rotate refresh tokens on this grant; keep the
        // stored one so the caller's settings stay valid.
        let tokens = Tokens {
            access_token: token_result.access_token().secret().to_string(),
            refresh_token: token_result
                .refresh_token()
                .map(|t| t.secret().to_string())
                .or_else(|| Some(refresh_token.to_string())),
            expires_at,
        };

        info!("Access token refreshed");
        Ok(tokens)
    }
}

/// Maps oauth2 request errors into the adapter taxonomy
fn classify_refresh_error(
    err: BasicRequestTokenError<HttpClientError<reqwest::Error>>,
) -> AdapterError {
    match err {
        oauth2::RequestTokenError::ServerResponse(resp) => classify_token_endpoint_error(&resp),
        oauth2::RequestTokenError::Request(e) => AdapterError::RemoteUnavailable(e.to_string()),
        oauth2::RequestTokenError::Parse(e, _) => AdapterError::InvalidResponse(e.to_string()),
        oauth2::RequestTokenError::Other(msg) => AdapterError::InvalidResponse(msg),
    }
}

/// Classifies a token-endpoint error body
///
/// The endpoint reports failures through OAuth error codes, not the
/// transport status: the standard codes are definitive credential or
/// request rejections, while a nonstandard code is how outages surface
/// here and stays retryable.
fn classify_token_endpoint_error(resp: &BasicErrorResponse) -> AdapterError {
    let detail = resp
        .error_description()
        .cloned()
        .unwrap_or_else(|| "no description".to_string());
    match resp.error() {
        BasicErrorResponseType::InvalidClient
        | BasicErrorResponseType::InvalidGrant
        | BasicErrorResponseType::UnauthorizedClient => {
            AdapterError::from_status(401, format!("token endpoint: {:?}: {detail}", resp.error()))
        }
        BasicErrorResponseType::InvalidRequest
        | BasicErrorResponseType::InvalidScope
        | BasicErrorResponseType::UnsupportedGrantType => {
            AdapterError::from_status(400, format!("token endpoint: {:?}: {detail}", resp.error()))
        }
        BasicErrorResponseType::Extension(code) => {
            AdapterError::RemoteUnavailable(format!("token endpoint: {code}: {detail}"))
        }
    }
}

// ============================================================================
// DriveAuthAdapter
// ============================================================================

/// Authentication adapter for Google Drive
///
/// Holds the validated settings and mints access tokens on demand. The
/// provider adapter calls [`refresh`](DriveAuthAdapter::refresh) once
/// before building its HTTP client; a caller that outlives the token's
/// lifetime rebuilds the provider with a fresh one.
#[derive(Debug)]
pub struct DriveAuthAdapter {
    settings: DriveSettings,
    token_url: String,
}

impl DriveAuthAdapter {
    /// Creates a new DriveAuthAdapter from validated settings
    pub fn new(settings: DriveSettings) -> Result<Self, AdapterError> {
        settings.has_valid_settings()?;
        Ok(Self {
            settings,
            token_url: TOKEN_URL.to_string(),
        })
    }

    /// Overrides the token endpoint (useful for testing)
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// Mints a fresh access token from the configured refresh token
    pub async fn refresh(&self) -> Result<Tokens, AdapterError> {
        let flow = RefreshFlow::new(
            self.settings.client_id.clone(),
            self.settings.client_secret.clone(),
            &self.token_url,
        )?;
        flow.refresh(&self.settings.refresh_token).await
    }
}
