//! CLI subcommands that talk to the IPAM backend directly
//!
//! - `networks`: list networks as a table or JSON
//! - `walk`: ping every device of a network, one at a time

use clap::ValueEnum;
use ipam_shared::walk::{self, CancellationToken, WalkReport};
use ipam_shared::{
    ApiVersion, Device, DeviceKey, Endpoint, Endpoints, Method, Network, PingResponse,
    PingStatus, Records,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use uuid::Uuid;

use crate::error::ConsoleError;

/// HTTP client for the IPAM backend
pub struct BackendClient {
    client: Client,
    endpoints: Endpoints,
}

impl BackendClient {
    pub fn new(backend_url: &str, version: ApiVersion) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            endpoints: Endpoints::new(backend_url, version),
        }
    }

    async fn call<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T, ConsoleError> {
        let method = match endpoint.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };
        tracing::debug!(%method, url = %endpoint.url, "backend call");

        let resp = self.client.request(method, &endpoint.url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ConsoleError::Backend {
                status: status.as_u16(),
                message,
            });
        }
        Ok(resp.json().await?)
    }

    pub async fn list_networks(&self) -> Result<Vec<Network>, ConsoleError> {
        let records: Records<Network> = self.call(self.endpoints.list_networks()).await?;
        Ok(records.into_vec())
    }

    pub async fn list_devices(&self, network_id: Uuid) -> Result<Vec<Device>, ConsoleError> {
        let records: Records<Device> = self.call(self.endpoints.list_devices(network_id)).await?;
        Ok(records.into_vec())
    }

    pub async fn ping_device(&self, key: &DeviceKey) -> Result<PingStatus, ConsoleError> {
        let response: PingResponse = self.call(self.endpoints.ping_device(key)).await?;
        Ok(response.ping)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

const NETWORK_HEADER: [&str; 7] = ["ID", "NETWORK", "VLAN", "DESCRIPTION", "AVAILABLE", "USED", "FREE"];

fn network_line(cells: [&str; 7]) -> String {
    format!(
        "{:<36} {:<20} {:<5} {:<30} {:>10} {:>10} {:>10}",
        cells[0], cells[1], cells[2], cells[3], cells[4], cells[5], cells[6]
    )
}

/// Networks as a fixed-width table
pub fn networks_table(networks: &[Network]) -> String {
    let mut lines = vec![network_line(NETWORK_HEADER), "-".repeat(127)];
    for network in networks {
        let id = network.id.to_string();
        let vlan = network.vlan.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());
        let description = network.description.as_deref().unwrap_or("-");
        let (available, used, free) = (
            network.available.to_string(),
            network.used.to_string(),
            network.free.to_string(),
        );
        lines.push(network_line([
            &id,
            &network.network,
            &vlan,
            description,
            &available,
            &used,
            &free,
        ]));
    }
    lines.join("\n")
}

pub async fn list_networks(client: &BackendClient, format: OutputFormat) -> anyhow::Result<()> {
    let networks = client.list_networks().await?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&networks)?),
        OutputFormat::Table => println!("{}", networks_table(&networks)),
    }
    Ok(())
}

fn describe(result: &Result<PingStatus, ConsoleError>) -> String {
    match result {
        Ok(PingStatus::Pong) => "pong".to_string(),
        Ok(PingStatus::Fail) => "no reply".to_string(),
        Err(e) => format!("error: {}", e),
    }
}

/// Ping every device of `network_id` until done or `token` is cancelled.
/// Each result is handed to `on_result` as soon as it arrives.
pub async fn walk_network<R>(
    client: &BackendClient,
    network_id: Uuid,
    token: &CancellationToken,
    mut on_result: R,
) -> Result<WalkReport, ConsoleError>
where
    R: FnMut(&DeviceKey, &Result<PingStatus, ConsoleError>),
{
    let keys: Vec<DeviceKey> = client
        .list_devices(network_id)
        .await?
        .iter()
        .map(Device::key)
        .collect();
    tracing::info!(devices = keys.len(), network = %network_id, "walk started");

    Ok(walk::walk(
        &keys,
        token,
        |key| client.ping_device(key),
        |key, result| on_result(key, result),
    )
    .await)
}

/// Cancel `token` on the first Ctrl-C. Abort the handle once the walk is over.
fn watch_ctrl_c(token: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Stopping after the current ping...");
            token.cancel();
        }
    })
}

/// `ipam walk`: print each result, stop between pings on Ctrl-C
pub async fn run_walk(client: &BackendClient, network_id: Uuid) -> anyhow::Result<()> {
    let token = CancellationToken::new();
    let watcher = watch_ctrl_c(token.clone());

    let result = walk_network(client, network_id, &token, |key, result| {
        println!("{:<40} {}", key.ip, describe(result));
    })
    .await;
    watcher.abort();
    let report = result?;

    println!(
        "\n{} pinged, {} pong, {} no reply, {} errors{}",
        report.pinged,
        report.pong,
        report.fail,
        report.errors,
        if report.cancelled { " (cancelled)" } else { "" }
    );
    Ok(())
}
