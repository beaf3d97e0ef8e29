//! SkyBridge Drive - Google Drive API client
//!
//! Provides async client for:
//! - OAuth2 token refresh from a stored refresh token
//! - File and folder operations via the Drive v3 API
//! - Size-based upload strategy (simple multipart vs. resumable session)
//! - Export-aware download for provider-native document formats
//!
//! ## Modules
//!
//! - [`auth`] - OAuth2 refresh-token flow components
//! - [`client`] - Drive API HTTP client with timeout/retry policy
//! - [`files`] - Metadata operations (list, create, move, rename, trash, delete)
//! - [`upload`] - File upload operations (simple and resumable/chunked)
//! - [`download`] - Content download with export-format resolution
//! - [`provider`] - `IRemoteStore` port implementation

pub mod auth;
pub mod client;
pub mod download;
pub mod files;
pub mod provider;
pub mod upload;

pub use client::DriveClient;
pub use provider::DriveProvider;
