//! Use cases - the reconciliation contract
//!
//! Each use case wires a remote adapter to the local mirror so every
//! mutating remote call leaves the mirror reflecting believed remote
//! state: call the provider, classify failure, degrade to a local
//! fallback where the contract allows it, reconcile the mirror.

pub mod create_entity;
pub mod delete_entity;
pub mod ensure_session;
pub mod list_entities;
mod materialize;
pub mod move_entity;
pub mod upload_entity;

pub use create_entity::CreateEntityUseCase;
pub use delete_entity::{DeleteEntityUseCase, DeleteReport};
pub use ensure_session::EnsureSessionUseCase;
pub use list_entities::ListEntitiesUseCase;
pub use move_entity::MoveEntityUseCase;
pub use upload_entity::UploadEntityUseCase;

#[cfg(test)]
pub(crate) mod test_support;
