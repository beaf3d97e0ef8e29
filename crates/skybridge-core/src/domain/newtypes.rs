//! Domain newtypes with validation
//!
//! This module provides strongly-typed wrappers for domain identifiers.
//! Each newtype ensures data validity at construction time.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::DomainError;

// ============================================================================
// LocalId
// ============================================================================

/// Locally assigned surrogate key for mirror rows
///
/// Stable even when the provider-assigned id changes (e.g., when a
/// local-only fallback row is later reconciled with a real remote object).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalId(Uuid);

impl LocalId {
    /// Create a new random LocalId
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a LocalId from an existing UUID
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID value
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for LocalId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for LocalId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LocalId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| DomainError::InvalidId(format!("Invalid LocalId: {e}")))
    }
}

impl From<Uuid> for LocalId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

// ============================================================================
// RemoteId
// ============================================================================

/// Prefix used for synthesized ids on local-only fallback rows
const LOCAL_ONLY_PREFIX: &str = "local-";

/// Opaque identifier assigned by the remote provider
///
/// For local-only fallback entities the id is synthesized locally with a
/// `local-` prefix, so it can never collide with a provider-assigned id
/// and is trivially recognizable in logs and queries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteId(String);

impl RemoteId {
    /// Create a RemoteId from a provider-assigned identifier
    ///
    /// # Errors
    /// Returns `DomainError::InvalidRemoteId` if the id is empty or
    /// contains whitespace.
    pub fn new(id: String) -> Result<Self, DomainError> {
        if id.is_empty() {
            return Err(DomainError::InvalidRemoteId(
                "Remote id must not be empty".to_string(),
            ));
        }
        if id.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidRemoteId(format!(
                "Remote id must not contain whitespace: {id:?}"
            )));
        }
        Ok(Self(id))
    }

    /// Synthesize a unique id for a local-only fallback entity
    #[must_use]
    pub fn synthesize() -> Self {
        Self(format!("{}{}", LOCAL_ONLY_PREFIX, Uuid::new_v4()))
    }

    /// Whether this id was synthesized locally rather than assigned by
    /// the provider
    #[must_use]
    pub fn is_synthesized(&self) -> bool {
        self.0.starts_with(LOCAL_ONLY_PREFIX)
    }

    /// Get the inner string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RemoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RemoteId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

// ============================================================================
// InstanceName
// ============================================================================

/// Logical name of a messaging instance (one logged-in device session)
///
/// The gateway addresses instances by name in URL path segments, so the
/// character set is restricted to names that never need escaping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceName(String);

impl InstanceName {
    /// Create a validated InstanceName
    ///
    /// # Errors
    /// Returns `DomainError::InvalidInstanceName` if the name is empty or
    /// contains characters outside `[A-Za-z0-9._-]`.
    pub fn new(name: String) -> Result<Self, DomainError> {
        if name.is_empty() {
            return Err(DomainError::InvalidInstanceName(
                "Instance name must not be empty".to_string(),
            ));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        {
            return Err(DomainError::InvalidInstanceName(format!(
                "Instance name contains invalid characters: {name:?}"
            )));
        }
        Ok(Self(name))
    }

    /// Get the inner string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for InstanceName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for InstanceName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}
