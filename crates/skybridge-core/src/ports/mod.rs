//! Port definitions (trait interfaces for adapters)
//!
//! Driven ports in the hexagonal architecture: the remote store (cloud
//! file storage), the messaging gateway, and the local mirror store.
//! Adapter crates provide the concrete implementations.

pub mod messaging_gateway;
pub mod mirror_store;
pub mod remote_store;

pub use messaging_gateway::{
    IMessagingGateway, MessageReceipt, PairingArtifact, PairingOutcome, ReconnectOutcome,
    SessionState,
};
pub use mirror_store::IMirrorStore;
pub use remote_store::{DownloadedContent, EntityDescriptor, IRemoteStore, Tokens};
