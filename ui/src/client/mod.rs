//! IPAM Client Abstraction Layer
//!
//! This module provides the interface the UI uses to talk to the IPAM
//! backend. Pages and the session state only see the [`IpamClient`] trait;
//! [`HttpClient`] implements it over `fetch`, and tests substitute an
//! in-memory mock.

mod http;
#[cfg(test)]
pub(crate) mod mock;

pub use http::HttpClient;

use std::rc::Rc;

use async_trait::async_trait;
use ipam_shared::{
    Device, DeviceDraft, DeviceKey, DevicePatch, Network, NetworkDraft, NetworkPatch, PingStatus,
};
use uuid::Uuid;

/// Error types for IPAM client operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IpamClientError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request failed: HTTP {status}: {message}")]
    RequestFailed { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Could not encode request: {0}")]
    Serialize(String),
}

/// Operations the UI performs against the backend
///
/// A call succeeds only when the backend answers with a 2xx status.
#[async_trait(?Send)]
pub trait IpamClient {
    async fn list_networks(&self) -> Result<Vec<Network>, IpamClientError>;

    /// Create a network from a sparse draft. Returns the records the
    /// backend created, or none when a 2xx answer carried nothing readable.
    async fn create_network(&self, draft: &NetworkDraft) -> Result<Vec<Network>, IpamClientError>;

    async fn update_network(&self, id: Uuid, patch: &NetworkPatch) -> Result<(), IpamClientError>;

    async fn delete_network(&self, id: Uuid) -> Result<(), IpamClientError>;

    /// Split a network into subnets of `prefix` length
    async fn split_subnet(&self, father_id: Uuid, prefix: u8) -> Result<Vec<Network>, IpamClientError>;

    async fn list_devices(&self, network_id: Uuid) -> Result<Vec<Device>, IpamClientError>;

    async fn create_device(&self, draft: &DeviceDraft) -> Result<(), IpamClientError>;

    /// Create a device for every host address of a network
    async fn create_all_devices(&self, network_id: Uuid) -> Result<(), IpamClientError>;

    async fn reserve_device(&self, key: &DeviceKey) -> Result<(), IpamClientError>;

    async fn update_device(&self, key: &DeviceKey, patch: &DevicePatch) -> Result<(), IpamClientError>;

    async fn ping_device(&self, key: &DeviceKey) -> Result<PingStatus, IpamClientError>;
}

/// Client handle shared by every page
pub type SharedClient = Rc<dyn IpamClient>;
