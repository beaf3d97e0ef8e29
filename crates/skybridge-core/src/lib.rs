//! SkyBridge Core - Domain logic and business rules
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `RemoteEntity` and its lifecycle (soft delete,
//!   local-only fallback, parent integrity)
//! - **Use cases** - the reconciliation contract shared by both remote
//!   adapters: call the provider, classify failure, degrade to a local
//!   fallback, keep the mirror in step with believed remote state
//! - **Port definitions** - Traits for adapters: `IRemoteStore`,
//!   `IMirrorStore`, `IMessagingGateway`
//! - **Error taxonomy** - classified failures crossing the adapter boundary
//!
//! # Architecture
//!
//! This crate follows the hexagonal (ports & adapters) architecture pattern.
//! The domain module contains pure business logic with no external dependencies.
//! Ports define trait interfaces that adapter crates implement.
//! Use cases orchestrate domain entities through port interfaces.

pub mod config;
pub mod domain;
pub mod ports;
pub mod retry;
pub mod usecases;
