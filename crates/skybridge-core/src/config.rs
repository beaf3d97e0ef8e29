//! Configuration module for SkyBridge.
//!
//! Provides typed configuration structs that map to the YAML configuration
//! file, with loading and validation. Connection settings are plain values
//! handed to an adapter's constructor; re-configuration builds a new
//! adapter instance rather than mutating shared state.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::errors::AdapterError;

/// Top-level configuration for SkyBridge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub drive: DriveSettings,
    pub gateway: GatewaySettings,
}

/// Connection settings for the cloud storage provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveSettings {
    /// Base URL for metadata endpoints.
    pub api_base_url: String,
    /// Base URL for upload endpoints (a separate host on this provider).
    pub upload_base_url: String,
    /// OAuth2 client id.
    pub client_id: String,
    /// OAuth2 client secret.
    pub client_secret: String,
    /// Long-lived refresh token used to mint access tokens.
    pub refresh_token: String,
    /// Folder id that acts as the configured root; a `None` parent in
    /// adapter operations resolves here.
    pub root_folder_id: String,
}

impl Default for DriveSettings {
    fn default() -> Self {
        Self {
            api_base_url: "https://www.googleapis.com/drive/v3".to_string(),
            upload_base_url: "https://www.googleapis.com/upload/drive/v3".to_string(),
            client_id: String::new(),
            client_secret: String::new(),
            refresh_token: String::new(),
            root_folder_id: String::new(),
        }
    }
}

impl DriveSettings {
    /// Validity is a precondition for every adapter operation.
    ///
    /// Fails fast with [`AdapterError::ConfigIncomplete`] naming the first
    /// missing field; no network call is attempted.
    pub fn has_valid_settings(&self) -> Result<(), AdapterError> {
        let missing = if self.api_base_url.is_empty() {
            Some("drive.api_base_url")
        } else if self.upload_base_url.is_empty() {
            Some("drive.upload_base_url")
        } else if self.client_id.is_empty() {
            Some("drive.client_id")
        } else if self.client_secret.is_empty() {
            Some("drive.client_secret")
        } else if self.refresh_token.is_empty() {
            Some("drive.refresh_token")
        } else if self.root_folder_id.is_empty() {
            Some("drive.root_folder_id")
        } else {
            None
        };

        match missing {
            Some(field) => Err(AdapterError::ConfigIncomplete(field.to_string())),
            None => Ok(()),
        }
    }
}

/// Connection settings for the messaging gateway.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewaySettings {
    /// Base URL of the gateway.
    pub base_url: String,
    /// Static API key sent on every request.
    pub api_key: String,
    /// Logical name of the managed instance.
    pub instance_name: String,
}

impl GatewaySettings {
    /// Validity is a precondition for every adapter operation.
    pub fn has_valid_settings(&self) -> Result<(), AdapterError> {
        let missing = if self.base_url.is_empty() {
            Some("gateway.base_url")
        } else if self.api_key.is_empty() {
            Some("gateway.api_key")
        } else if self.instance_name.is_empty() {
            Some("gateway.instance_name")
        } else {
            None
        };

        match missing {
            Some(field) => Err(AdapterError::ConfigIncomplete(field.to_string())),
            None => Ok(()),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }
}
