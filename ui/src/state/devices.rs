//! Device page state

use ipam_shared::walk::{self, Toggle, WalkReport, WalkRun, WalkSwitch};
use ipam_shared::{Device, DeviceDraft, DeviceKey, DevicePatch, PingStatus};
use leptos::*;
use uuid::Uuid;

use super::{DeviceForm, EditOutcome};
use crate::client::{IpamClientError, SharedClient};

/// Devices of one network plus the walk toggle
#[derive(Clone)]
pub struct DeviceSession {
    pub network_id: Uuid,
    pub devices: RwSignal<Vec<Device>>,
    pub loading: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,
    walk: RwSignal<WalkSwitch>,
    client: SharedClient,
}

impl DeviceSession {
    pub fn new(client: SharedClient, network_id: Uuid) -> Self {
        Self {
            network_id,
            devices: create_rw_signal(Vec::new()),
            loading: create_rw_signal(false),
            error: create_rw_signal(None),
            walk: create_rw_signal(WalkSwitch::new()),
            client,
        }
    }

    pub async fn load(&self) -> Result<(), IpamClientError> {
        self.loading.set(true);
        let result = self.client.list_devices(self.network_id).await;
        self.loading.set(false);

        let devices = self.record_error(result)?;
        tracing::debug!(count = devices.len(), network = %self.network_id, "loaded devices");
        self.devices.set(devices);
        self.error.set(None);
        Ok(())
    }

    /// Create one device from typed input, then reload the listing.
    ///
    /// Input that is not an IP address is reported without a request.
    pub async fn create_device(&self, ip: &str, description: &str) -> Result<(), String> {
        let draft = match DeviceDraft::new(ip, self.network_id, description) {
            Ok(draft) => draft,
            Err(e) => {
                self.error.set(Some(e.to_string()));
                return Err(e.to_string());
            }
        };

        let result = self.client.create_device(&draft).await;
        self.record_error(result).map_err(|e| e.to_string())?;
        tracing::info!(ip = %draft.ip, network = %self.network_id, "device created");
        self.load().await.map_err(|e| e.to_string())
    }

    /// Create a device for every host address, then reload the listing
    pub async fn create_all(&self) -> Result<(), IpamClientError> {
        let result = self.client.create_all_devices(self.network_id).await;
        self.record_error(result)?;
        self.load().await
    }

    pub async fn reserve(&self, key: DeviceKey) -> Result<(), IpamClientError> {
        let result = self.client.reserve_device(&key).await;
        self.record_error(result)?;
        self.patch_device(key, &DevicePatch::reserve());
        Ok(())
    }

    pub async fn ping(&self, key: DeviceKey) -> Result<PingStatus, IpamClientError> {
        let result = self.client.ping_device(&key).await;
        let status = self.record_error(result)?;
        self.record_ping(key, status);
        Ok(status)
    }

    pub async fn save_device(&self, form: &DeviceForm) -> EditOutcome {
        let patch = form.diff();
        if patch.is_empty() {
            return EditOutcome::Unchanged;
        }

        match self.client.update_device(&form.key, &patch).await {
            Ok(()) => {
                self.patch_device(form.key, &patch);
                EditOutcome::Saved
            }
            Err(e) => {
                tracing::warn!("failed to update device {}: {}", form.key.ip, e);
                EditOutcome::Failed(e)
            }
        }
    }

    pub fn is_walking(&self) -> bool {
        self.walk.with(|switch| switch.is_running())
    }

    pub fn is_stopping(&self) -> bool {
        self.walk.with(|switch| switch.is_stopping())
    }

    /// Press the walk button. Returns the run to drive when this press
    /// started a walk; a press while walking only asks it to stop.
    pub fn toggle_walk(&self) -> Option<WalkRun> {
        match self.walk.try_update(|switch| switch.toggle())? {
            Toggle::Started(run) => {
                tracing::info!(network = %self.network_id, "ping walk started");
                Some(run)
            }
            Toggle::Stopping => {
                tracing::info!(network = %self.network_id, "ping walk stopping");
                None
            }
        }
    }

    /// Ping every device listed when the walk started, in order
    pub async fn run_walk(&self, run: WalkRun) -> WalkReport {
        let targets: Vec<DeviceKey> = self
            .devices
            .with_untracked(|devices| devices.iter().map(Device::key).collect());

        let report = walk::walk(
            &targets,
            &run.token,
            |key| {
                let client = self.client.clone();
                let key = *key;
                async move { client.ping_device(&key).await }
            },
            |key, result| match result {
                Ok(status) => self.record_ping(*key, *status),
                Err(e) => tracing::warn!("walk: ping {} failed: {}", key.ip, e),
            },
        )
        .await;

        self.walk.update(|switch| {
            switch.finish(run.id);
        });
        tracing::info!(
            pinged = report.pinged,
            pong = report.pong,
            fail = report.fail,
            cancelled = report.cancelled,
            "ping walk finished"
        );
        report
    }

    fn record_ping(&self, key: DeviceKey, status: PingStatus) {
        self.devices.update(|devices| {
            if let Some(device) = devices.iter_mut().find(|d| d.key() == key) {
                device.status = device.status.after_ping(status);
            }
        });
    }

    fn patch_device(&self, key: DeviceKey, patch: &DevicePatch) {
        self.devices.update(|devices| {
            if let Some(device) = devices.iter_mut().find(|d| d.key() == key) {
                device.apply_patch(patch);
            }
        });
    }

    fn record_error<T>(&self, result: Result<T, IpamClientError>) -> Result<T, IpamClientError> {
        result.map_err(|e| {
            tracing::warn!(network = %self.network_id, "device request failed: {}", e);
            self.error.set(Some(e.to_string()));
            e
        })
    }
}
