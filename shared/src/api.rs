//! Backend API layout
//!
//! The IPAM backend has shipped two route layouts: a legacy one rooted
//! at `/api` and a versioned one rooted at `/api/v1`. Both the UI and the
//! console build request URLs through [`Endpoints`] so the choice lives in
//! one place.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::models::DeviceKey;

/// Which route layout the backend speaks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    /// Routes under `/api`
    #[default]
    Legacy,
    /// Routes under `/api/v1`
    V1,
}

impl ApiVersion {
    pub fn prefix(self) -> &'static str {
        match self {
            ApiVersion::Legacy => "/api",
            ApiVersion::V1 => "/api/v1",
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiVersion::Legacy => write!(f, "legacy"),
            ApiVersion::V1 => write!(f, "v1"),
        }
    }
}

impl FromStr for ApiVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" | "api" => Ok(ApiVersion::Legacy),
            "v1" => Ok(ApiVersion::V1),
            other => Err(format!("unknown API version '{}' (expected 'legacy' or 'v1')", other)),
        }
    }
}

/// HTTP verb of an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved backend call: verb plus absolute URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub method: Method,
    pub url: String,
}

/// URL builder for one backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base_url: String,
    version: ApiVersion,
}

impl Endpoints {
    /// `base_url` is the origin the API is served from, e.g.
    /// `http://localhost:8080`. An empty base yields relative URLs.
    pub fn new(base_url: &str, version: ApiVersion) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            version,
        }
    }

    fn at(&self, method: Method, path: &str) -> Endpoint {
        Endpoint {
            method,
            url: format!("{}{}{}", self.base_url, self.version.prefix(), path),
        }
    }

    pub fn list_networks(&self) -> Endpoint {
        self.at(Method::Get, "/network/all")
    }

    pub fn create_network(&self) -> Endpoint {
        self.at(Method::Put, "/network/create")
    }

    pub fn update_network(&self, id: Uuid) -> Endpoint {
        self.at(Method::Patch, &format!("/network/{}", id))
    }

    pub fn delete_network(&self, id: Uuid) -> Endpoint {
        match self.version {
            ApiVersion::Legacy => self.at(Method::Delete, &format!("/network/{}", id)),
            ApiVersion::V1 => self.at(Method::Delete, &format!("/network/clean/{}", id)),
        }
    }

    pub fn split_subnet(&self, father_id: Uuid, prefix: u8) -> Endpoint {
        self.at(
            Method::Post,
            &format!("/network/subnet?father_id={}&prefix={}", father_id, prefix),
        )
    }

    pub fn list_devices(&self, network_id: Uuid) -> Endpoint {
        self.at(Method::Get, &format!("/device/all/{}", network_id))
    }

    /// Create one device; v1 names the network in the path
    pub fn create_device(&self, network_id: Uuid) -> Endpoint {
        match self.version {
            ApiVersion::Legacy => self.at(Method::Post, "/device/create"),
            ApiVersion::V1 => self.at(Method::Post, &format!("/device/{}", network_id)),
        }
    }

    pub fn create_all_devices(&self, network_id: Uuid) -> Endpoint {
        self.at(Method::Put, &format!("/device/all/{}", network_id))
    }

    pub fn reserve_device(&self, key: &DeviceKey) -> Endpoint {
        self.at(Method::Patch, &format!("/device/one?{}", key.query()))
    }

    pub fn update_device(&self, key: &DeviceKey) -> Endpoint {
        self.at(Method::Patch, &format!("/device?{}", key.query()))
    }

    pub fn ping_device(&self, key: &DeviceKey) -> Endpoint {
        self.at(Method::Patch, &format!("/device/ping?{}", key.query()))
    }
}

/// Discovery document served by the console at `/api/info`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiInfo {
    /// Backend the console proxies to
    pub backend: String,

    /// Route layout of that backend
    pub api_version: ApiVersion,

    /// Console version
    pub version: String,
}

/// Lenient decoding of record lists
///
/// Depending on the revision, the backend answers with a bare array, a single
/// record, or an object wrapping the records under `data`, `networks` or
/// `devices`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Records<T> {
    Many(Vec<T>),
    Wrapped {
        #[serde(alias = "data", alias = "networks", alias = "devices")]
        items: OneOrMany<T>,
    },
    One(T),
}

/// A single record or a list of them
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> Records<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Records::Many(items) => items,
            Records::Wrapped { items } => items.into_vec(),
            Records::One(item) => vec![item],
        }
    }
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Network;
    use serde_json::json;

    fn key() -> DeviceKey {
        DeviceKey {
            ip: "10.0.0.7".parse().unwrap(),
            network_id: Uuid::nil(),
        }
    }

    #[test]
    fn test_legacy_layout() {
        let api = Endpoints::new("http://ipam.local/", ApiVersion::Legacy);
        let id = Uuid::nil();

        assert_eq!(
            api.create_network(),
            Endpoint {
                method: Method::Put,
                url: "http://ipam.local/api/network/create".to_string(),
            }
        );
        assert_eq!(api.delete_network(id).url, format!("http://ipam.local/api/network/{}", id));
        assert_eq!(
            api.create_device(id),
            Endpoint {
                method: Method::Post,
                url: "http://ipam.local/api/device/create".to_string(),
            }
        );
        assert_eq!(api.update_network(id).method, Method::Patch);
        assert_eq!(
            api.ping_device(&key()).url,
            "http://ipam.local/api/device/ping?ip=10.0.0.7&network_id=00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_v1_layout() {
        let api = Endpoints::new("", ApiVersion::V1);
        let id = Uuid::nil();

        assert_eq!(
            api.create_network(),
            Endpoint {
                method: Method::Put,
                url: "/api/v1/network/create".to_string(),
            }
        );
        assert_eq!(
            api.create_device(id),
            Endpoint {
                method: Method::Post,
                url: format!("/api/v1/device/{}", id),
            }
        );
        assert_eq!(api.delete_network(id).url, format!("/api/v1/network/clean/{}", id));
        assert_eq!(
            api.split_subnet(id, 26).url,
            format!("/api/v1/network/subnet?father_id={}&prefix=26", id)
        );
        assert_eq!(
            api.reserve_device(&key()).url,
            "/api/v1/device/one?ip=10.0.0.7&network_id=00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(
            api.update_device(&key()).url,
            "/api/v1/device?ip=10.0.0.7&network_id=00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_api_version_parsing() {
        assert_eq!("V1".parse::<ApiVersion>(), Ok(ApiVersion::V1));
        assert_eq!("legacy".parse::<ApiVersion>(), Ok(ApiVersion::Legacy));
        assert!("v2".parse::<ApiVersion>().is_err());
        assert_eq!(serde_json::to_value(ApiVersion::V1).unwrap(), json!("v1"));
    }

    #[test]
    fn test_records_accepts_every_shape() {
        let record = json!({
            "id": "00000000-0000-0000-0000-000000000001",
            "network": "10.0.0.0/24",
            "available": 254,
            "used": 0,
            "free": 254
        });

        let bare: Records<Network> = serde_json::from_value(json!([record.clone()])).unwrap();
        let single: Records<Network> = serde_json::from_value(record.clone()).unwrap();
        let listing: Records<Network> =
            serde_json::from_value(json!({"networks": [record.clone()]})).unwrap();
        let envelope: Records<Network> =
            serde_json::from_value(json!({"status": 201, "data": record})).unwrap();

        for records in [bare, single, listing, envelope] {
            let networks = records.into_vec();
            assert_eq!(networks.len(), 1);
            assert_eq!(networks[0].network, "10.0.0.0/24");
        }
    }
}
