//! In-memory client for session tests

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use async_trait::async_trait;
use ipam_shared::{
    Device, DeviceDraft, DeviceKey, DevicePatch, DeviceStatus, HostCount, Network, NetworkDraft,
    NetworkPatch, PingStatus,
};
use uuid::Uuid;

use super::{IpamClient, IpamClientError};

/// Scriptable stand-in for the backend.
///
/// Create calls pop `create_results`; once that queue is empty they echo the
/// draft back as a freshly created network. Ping calls pop `ping_results`
/// and default to `Pong`.
#[derive(Default)]
pub struct MockClient {
    pub networks: RefCell<Vec<Network>>,
    pub devices: RefCell<Vec<Device>>,

    pub created: RefCell<Vec<NetworkDraft>>,
    pub create_results: RefCell<VecDeque<Result<Vec<Network>, IpamClientError>>>,

    pub updated_networks: RefCell<Vec<(Uuid, NetworkPatch)>>,
    pub deleted_networks: RefCell<Vec<Uuid>>,
    pub splits: RefCell<Vec<(Uuid, u8)>>,

    pub devices_created: RefCell<Vec<DeviceDraft>>,
    pub devices_created_for: RefCell<Vec<Uuid>>,
    pub reserved: RefCell<Vec<DeviceKey>>,
    pub updated_devices: RefCell<Vec<(DeviceKey, DevicePatch)>>,

    pub pinged: RefCell<Vec<DeviceKey>>,
    pub ping_results: RefCell<VecDeque<Result<PingStatus, IpamClientError>>>,
    /// Called with the 1-based ping count while that ping is in flight
    pub on_ping: RefCell<Option<Box<dyn Fn(usize)>>>,

    /// Answer every mutating call with HTTP 500
    pub fail_writes: Cell<bool>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn write_guard(&self) -> Result<(), IpamClientError> {
        if self.fail_writes.get() {
            Err(IpamClientError::RequestFailed {
                status: 500,
                message: "Internal Server Error".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

pub fn network(cidr: &str) -> Network {
    Network {
        id: Uuid::new_v4(),
        network: cidr.to_string(),
        vlan: None,
        description: None,
        available: HostCount(254),
        used: HostCount(0),
        free: HostCount(254),
        father: None,
    }
}

pub fn device(ip: &str, network_id: Uuid) -> Device {
    Device {
        ip: ip.parse().expect("test ip"),
        description: None,
        office_id: None,
        rack: None,
        room: None,
        status: DeviceStatus::Unknown,
        network_id,
        credential: None,
    }
}

#[async_trait(?Send)]
impl IpamClient for MockClient {
    async fn list_networks(&self) -> Result<Vec<Network>, IpamClientError> {
        Ok(self.networks.borrow().clone())
    }

    async fn create_network(&self, draft: &NetworkDraft) -> Result<Vec<Network>, IpamClientError> {
        self.created.borrow_mut().push(draft.clone());

        if let Some(result) = self.create_results.borrow_mut().pop_front() {
            return result;
        }
        self.write_guard()?;

        let mut created = network(draft.network.as_deref().unwrap_or_default());
        created.vlan = draft.vlan.as_deref().and_then(|v| v.parse().ok());
        created.description = draft.description.clone();
        Ok(vec![created])
    }

    async fn update_network(&self, id: Uuid, patch: &NetworkPatch) -> Result<(), IpamClientError> {
        self.write_guard()?;
        self.updated_networks.borrow_mut().push((id, patch.clone()));
        Ok(())
    }

    async fn delete_network(&self, id: Uuid) -> Result<(), IpamClientError> {
        self.write_guard()?;
        self.deleted_networks.borrow_mut().push(id);
        Ok(())
    }

    async fn split_subnet(&self, father_id: Uuid, prefix: u8) -> Result<Vec<Network>, IpamClientError> {
        self.write_guard()?;
        self.splits.borrow_mut().push((father_id, prefix));

        let mut children = vec![network("10.0.0.0/25"), network("10.0.0.128/25")];
        for child in &mut children {
            child.father = Some(father_id);
        }
        Ok(children)
    }

    async fn list_devices(&self, network_id: Uuid) -> Result<Vec<Device>, IpamClientError> {
        Ok(self
            .devices
            .borrow()
            .iter()
            .filter(|d| d.network_id == network_id)
            .cloned()
            .collect())
    }

    async fn create_device(&self, draft: &DeviceDraft) -> Result<(), IpamClientError> {
        self.write_guard()?;
        self.devices_created.borrow_mut().push(draft.clone());

        let mut created = device(&draft.ip.to_string(), draft.network_id);
        created.description = draft.description.clone();
        self.devices.borrow_mut().push(created);
        Ok(())
    }

    async fn create_all_devices(&self, network_id: Uuid) -> Result<(), IpamClientError> {
        self.write_guard()?;
        self.devices_created_for.borrow_mut().push(network_id);
        Ok(())
    }

    async fn reserve_device(&self, key: &DeviceKey) -> Result<(), IpamClientError> {
        self.write_guard()?;
        self.reserved.borrow_mut().push(*key);
        Ok(())
    }

    async fn update_device(&self, key: &DeviceKey, patch: &DevicePatch) -> Result<(), IpamClientError> {
        self.write_guard()?;
        self.updated_devices.borrow_mut().push((*key, patch.clone()));
        Ok(())
    }

    async fn ping_device(&self, key: &DeviceKey) -> Result<PingStatus, IpamClientError> {
        let count = {
            let mut pinged = self.pinged.borrow_mut();
            pinged.push(*key);
            pinged.len()
        };

        if let Some(hook) = self.on_ping.borrow().as_ref() {
            hook(count);
        }

        self.ping_results
            .borrow_mut()
            .pop_front()
            .unwrap_or(Ok(PingStatus::Pong))
    }
}
