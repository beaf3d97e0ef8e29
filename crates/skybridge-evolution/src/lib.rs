//! SkyBridge Evolution - WhatsApp gateway client
//!
//! Provides async client for an Evolution API gateway:
//! - Idempotent instance lifecycle (create, logout, delete)
//! - Pairing artifact (QR) retrieval across the gateway's response shapes
//! - Connection-state queries and state-gated text sending
//! - Brazilian phone-number normalization for recipients
//!
//! ## Modules
//!
//! - [`client`] - Gateway HTTP client with API-key auth and per-endpoint timeouts
//! - [`session`] - Instance lifecycle operations
//! - [`pairing`] - Pairing-artifact extraction and retry behavior
//! - [`phone`] - Recipient number normalization
//! - [`send`] - Message sending
//! - [`gateway`] - `IMessagingGateway` port implementation

pub mod client;
pub mod gateway;
pub mod pairing;
pub mod phone;
pub mod send;
pub mod session;

pub use client::EvolutionClient;
pub use gateway::EvolutionGateway;
