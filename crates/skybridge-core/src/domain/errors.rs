//! Error taxonomy for SkyBridge
//!
//! Two layers of errors live here:
//!
//! - [`DomainError`] - validation failures raised while constructing domain
//!   values; these never involve the network.
//! - [`AdapterError`] - the classified failure taxonomy that every adapter
//!   operation surfaces across the port boundary. No provider-specific
//!   exception type ever crosses that boundary; adapters translate HTTP
//!   status codes and transport failures into these variants.
//!
//! Best-effort conveniences (rename, trash/untrash) do not raise at all;
//! they report a [`SoftOutcome`] so callers can distinguish "did not
//! happen, not fatal" from "happened".

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid remote ID format
    #[error("Invalid remote ID: {0}")]
    InvalidRemoteId(String),

    /// Invalid messaging instance name
    #[error("Invalid instance name: {0}")]
    InvalidInstanceName(String),

    /// ID parsing error
    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    /// Invalid entity kind string (from persistence)
    #[error("Invalid entity kind: {0}")]
    InvalidKind(String),

    /// Generic validation failure
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

/// Classified failure of an adapter operation
///
/// Every public adapter operation returns either a normalized success
/// payload or one of these variants. The original provider message is
/// carried in the variant payload for diagnostics; [`user_message`]
/// produces the user-facing text.
///
/// [`user_message`]: AdapterError::user_message
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Required connection settings are missing; no network call was made
    #[error("Configuration incomplete: {0}")]
    ConfigIncomplete(String),

    /// Connection-level failure (DNS, timeout, refused); already retried
    /// per policy before surfacing
    #[error("Remote service unavailable: {0}")]
    RemoteUnavailable(String),

    /// Provider returned a non-2xx response with a classifiable code
    #[error("Remote service rejected the request ({code}): {message}")]
    RemoteRejected {
        /// HTTP status code returned by the provider
        code: u16,
        /// Raw provider error body, kept for diagnostics
        message: String,
    },

    /// Delete attempted on a non-empty folder without the recursive flag
    #[error("Folder is not empty: {0}")]
    NotEmpty(String),

    /// Send attempted while the messaging session is not connected
    #[error("Messaging session is not connected: {0}")]
    NotConnected(String),

    /// Remote-addressing operation attempted on a local-only entity
    #[error("Entity exists only locally and cannot be addressed remotely: {0}")]
    LocalOnlyUnsupported(String),

    /// The local mirror store failed
    #[error("Mirror store error: {0}")]
    Mirror(String),

    /// The provider response could not be parsed or was malformed
    #[error("Invalid response from remote service: {0}")]
    InvalidResponse(String),
}

impl AdapterError {
    /// Classify a completed non-2xx HTTP response
    ///
    /// A completed response is never retried; 4xx and 5xx alike map
    /// straight to [`AdapterError::RemoteRejected`]. Retry decisions are
    /// made by the caller before classification, based on
    /// [`is_retryable_status`].
    pub fn from_status(code: u16, body: impl Into<String>) -> Self {
        Self::RemoteRejected {
            code,
            message: body.into(),
        }
    }

    /// Whether a status code represents a transient server-side failure
    /// worth retrying
    #[must_use]
    pub fn is_retryable_status(code: u16) -> bool {
        (500..600).contains(&code)
    }

    /// Whether this rejection means "the resource already exists"
    ///
    /// A 409 on a creation endpoint is treated as success-equivalent:
    /// the idempotent-create contract resolves it to the existing
    /// resource instead of failing.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::RemoteRejected { code: 409, .. })
    }

    /// Whether this rejection means "the resource does not exist"
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RemoteRejected { code: 404, .. })
    }

    /// User-facing message for this failure
    ///
    /// Each classifiable provider code maps to a distinct message; the
    /// raw provider body stays available via `Display` for diagnostics.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::ConfigIncomplete(field) => {
                format!("Connection is not configured: {field}")
            }
            Self::RemoteUnavailable(_) => {
                "The remote service could not be reached. Check your connection and try again."
                    .to_string()
            }
            Self::RemoteRejected { code: 401, .. } => {
                "The stored credential was rejected. Reconnect the account.".to_string()
            }
            Self::RemoteRejected { code: 403, .. } => {
                "The remote service refused access to this resource.".to_string()
            }
            Self::RemoteRejected { code: 404, .. } => {
                "The requested item no longer exists on the remote service.".to_string()
            }
            Self::RemoteRejected { code: 409, .. } => {
                "The item already exists on the remote service.".to_string()
            }
            Self::RemoteRejected { code, .. } if *code >= 500 => {
                "The remote service reported a temporary problem. Try again shortly.".to_string()
            }
            Self::RemoteRejected { code, .. } => {
                format!("The remote service rejected the request (HTTP {code}).")
            }
            Self::NotEmpty(name) => {
                format!("\"{name}\" is not empty. Confirm recursive deletion to remove it.")
            }
            Self::NotConnected(instance) => {
                format!("Messaging session \"{instance}\" is not connected. Pair the device first.")
            }
            Self::LocalOnlyUnsupported(name) => format!(
                "\"{name}\" was created while the remote service was unreachable and cannot be shared or exported yet."
            ),
            Self::Mirror(_) => "The local catalog could not be updated.".to_string(),
            Self::InvalidResponse(_) => {
                "The remote service returned an unexpected response.".to_string()
            }
        }
    }
}

/// Outcome of a best-effort operation
///
/// Rename, trash and untrash are conveniences, not part of the critical
/// path: their failure degrades to `Degraded` with the reason attached
/// instead of raising, so callers can log and move on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoftOutcome {
    /// The operation took effect remotely
    Applied,
    /// The operation did not take effect; carries the reason
    Degraded(String),
}

impl SoftOutcome {
    /// Whether the operation took effect
    #[must_use]
    pub fn applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}
