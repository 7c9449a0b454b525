//! HTTP IPAM Client
//!
//! Talks to the backend through the browser's `fetch`, either directly or
//! through the console's `/api` proxy.

use gloo_net::http::{Request, RequestBuilder, Response};
use ipam_shared::{
    ApiInfo, ApiVersion, Device, DeviceDraft, DeviceKey, DevicePatch, Endpoint, Endpoints, Method, Network,
    NetworkDraft, NetworkPatch, PingResponse, PingStatus, Records,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::{IpamClient, IpamClientError};

/// `fetch`-based client for the IPAM backend
#[derive(Debug, Clone)]
pub struct HttpClient {
    endpoints: Endpoints,
}

impl HttpClient {
    /// Create a new client
    pub fn new(base_url: &str, version: ApiVersion) -> Self {
        Self {
            endpoints: Endpoints::new(base_url, version),
        }
    }

    /// Ask the console which route layout the backend uses.
    ///
    /// Without a console in front (or when the document cannot be read) the
    /// legacy layout is assumed.
    pub async fn discover() -> Self {
        let origin = window_origin();
        let url = format!("{}/api/info", origin);

        let version = match Request::get(&url).send().await {
            Ok(response) if response.ok() => match response.json::<ApiInfo>().await {
                Ok(info) => {
                    tracing::info!(backend = %info.backend, version = %info.api_version, "discovered IPAM backend");
                    info.api_version
                }
                Err(e) => {
                    tracing::warn!("unreadable /api/info document: {}", e);
                    ApiVersion::default()
                }
            },
            _ => {
                tracing::debug!("no /api/info document, assuming legacy routes");
                ApiVersion::default()
            }
        };

        Self::new(&origin, version)
    }

    fn builder(endpoint: &Endpoint) -> RequestBuilder {
        let builder = match endpoint.method {
            Method::Get => Request::get(&endpoint.url),
            Method::Post => Request::post(&endpoint.url),
            Method::Put => Request::put(&endpoint.url),
            Method::Patch => Request::patch(&endpoint.url),
            Method::Delete => Request::delete(&endpoint.url),
        };
        builder.header("Content-Type", "application/json")
    }

    /// Send a request and fail on anything but a 2xx answer
    async fn call(
        &self,
        endpoint: Endpoint,
        body: Option<serde_json::Value>,
    ) -> Result<Response, IpamClientError> {
        tracing::debug!(method = %endpoint.method, url = %endpoint.url, "backend call");

        let builder = Self::builder(&endpoint);
        let sent = match body {
            Some(body) => builder
                .json(&body)
                .map_err(|e| IpamClientError::Serialize(e.to_string()))?
                .send()
                .await,
            None => builder.send().await,
        };
        let response = sent.map_err(|e| IpamClientError::ConnectionFailed(e.to_string()))?;

        if !response.ok() {
            let status = response.status();
            let message = match response.text().await {
                Ok(text) if !text.is_empty() => text,
                _ => response.status_text(),
            };
            return Err(IpamClientError::RequestFailed { status, message });
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, IpamClientError> {
        response
            .json::<T>()
            .await
            .map_err(|e| IpamClientError::InvalidResponse(e.to_string()))
    }
}

fn encode<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, IpamClientError> {
    serde_json::to_value(value).map_err(|e| IpamClientError::Serialize(e.to_string()))
}

/// Records from a 2xx create answer. The network exists once the backend
/// answered 2xx, so a body that does not decode yields no records instead of
/// an error.
fn created_networks(body: &str) -> Vec<Network> {
    match serde_json::from_str::<Records<Network>>(body) {
        Ok(records) => records.into_vec(),
        Err(e) => {
            tracing::warn!("network created but the answer was unreadable: {}", e);
            Vec::new()
        }
    }
}

fn window_origin() -> String {
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_else(|| "http://localhost:8080".to_string())
}

#[async_trait::async_trait(?Send)]
impl IpamClient for HttpClient {
    async fn list_networks(&self) -> Result<Vec<Network>, IpamClientError> {
        let response = self.call(self.endpoints.list_networks(), None).await?;
        Ok(Self::decode::<Records<Network>>(response).await?.into_vec())
    }

    async fn create_network(&self, draft: &NetworkDraft) -> Result<Vec<Network>, IpamClientError> {
        let response = self
            .call(self.endpoints.create_network(), Some(encode(draft)?))
            .await?;
        let body = response.text().await.unwrap_or_default();
        Ok(created_networks(&body))
    }

    async fn update_network(&self, id: Uuid, patch: &NetworkPatch) -> Result<(), IpamClientError> {
        self.call(self.endpoints.update_network(id), Some(encode(patch)?))
            .await?;
        Ok(())
    }

    async fn delete_network(&self, id: Uuid) -> Result<(), IpamClientError> {
        self.call(self.endpoints.delete_network(id), None).await?;
        Ok(())
    }

    async fn split_subnet(&self, father_id: Uuid, prefix: u8) -> Result<Vec<Network>, IpamClientError> {
        let response = self
            .call(self.endpoints.split_subnet(father_id, prefix), None)
            .await?;
        Ok(Self::decode::<Records<Network>>(response).await?.into_vec())
    }

    async fn list_devices(&self, network_id: Uuid) -> Result<Vec<Device>, IpamClientError> {
        let response = self.call(self.endpoints.list_devices(network_id), None).await?;
        Ok(Self::decode::<Records<Device>>(response).await?.into_vec())
    }

    async fn create_device(&self, draft: &DeviceDraft) -> Result<(), IpamClientError> {
        self.call(self.endpoints.create_device(draft.network_id), Some(encode(draft)?))
            .await?;
        Ok(())
    }

    async fn create_all_devices(&self, network_id: Uuid) -> Result<(), IpamClientError> {
        self.call(self.endpoints.create_all_devices(network_id), None)
            .await?;
        Ok(())
    }

    async fn reserve_device(&self, key: &DeviceKey) -> Result<(), IpamClientError> {
        self.call(self.endpoints.reserve_device(key), Some(encode(&DevicePatch::reserve())?))
            .await?;
        Ok(())
    }

    async fn update_device(&self, key: &DeviceKey, patch: &DevicePatch) -> Result<(), IpamClientError> {
        self.call(self.endpoints.update_device(key), Some(encode(patch)?))
            .await?;
        Ok(())
    }

    async fn ping_device(&self, key: &DeviceKey) -> Result<PingStatus, IpamClientError> {
        let response = self.call(self.endpoints.ping_device(key), None).await?;
        Ok(Self::decode::<PingResponse>(response).await?.ping)
    }
}
