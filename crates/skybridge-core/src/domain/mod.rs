//! Domain entities and value types
//!
//! Pure business logic with no network or database dependencies.

pub mod entity;
pub mod errors;
pub mod newtypes;

pub use entity::{EntityKind, RemoteEntity, MAX_TREE_DEPTH};
pub use errors::{AdapterError, DomainError, SoftOutcome};
pub use newtypes::{InstanceName, LocalId, RemoteId};
