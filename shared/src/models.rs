//! IPAM wire models
//!
//! These types mirror the JSON the IPAM backend produces and accepts:
//! - Network and device records
//! - Sparse create / update payloads
//! - Ping results

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use uuid::Uuid;

/// Highest VLAN id the backend accepts
pub const MAX_VLAN: u16 = 4096;

/// Errors raised while building model values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("VLAN id {0} is out of range (0-4096)")]
    InvalidVlan(u64),

    #[error("'{0}' is not a VLAN id")]
    InvalidVlanText(String),

    #[error("'{0}' is not a host count")]
    InvalidHostCount(String),

    #[error("'{0}' is not an IP address")]
    InvalidIp(String),
}

// ============================================================================
// Scalars
// ============================================================================

/// 802.1Q VLAN id
///
/// Accepts either a number or a numeric string on the wire and always
/// serializes as a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Vlan(u16);

impl Vlan {
    pub fn new(id: u16) -> Result<Self, ModelError> {
        if id > MAX_VLAN {
            return Err(ModelError::InvalidVlan(id.into()));
        }
        Ok(Self(id))
    }

    pub fn id(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Vlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Vlan {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s
            .trim()
            .parse::<u16>()
            .map_err(|_| ModelError::InvalidVlanText(s.to_string()))?;
        Self::new(id)
    }
}

impl Serialize for Vlan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.0)
    }
}

impl<'de> Deserialize<'de> for Vlan {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(VlanVisitor)
    }
}

struct VlanVisitor;

impl<'de> Visitor<'de> for VlanVisitor {
    type Value = Vlan;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a VLAN id between 0 and {MAX_VLAN}, as a number or a string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        u16::try_from(v)
            .ok()
            .and_then(|id| Vlan::new(id).ok())
            .ok_or_else(|| E::invalid_value(de::Unexpected::Unsigned(v), &self))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        match u64::try_from(v) {
            Ok(v) => self.visit_u64(v),
            Err(_) => Err(E::invalid_value(de::Unexpected::Signed(v), &self)),
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse()
            .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}

/// Number of host addresses in a network
///
/// IPv6 networks overflow `u64`, so large counts travel as strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct HostCount(pub u128);

impl fmt::Display for HostCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for HostCount {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u128>()
            .map(HostCount)
            .map_err(|_| ModelError::InvalidHostCount(s.to_string()))
    }
}

impl From<u64> for HostCount {
    fn from(value: u64) -> Self {
        Self(value.into())
    }
}

impl Serialize for HostCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match u64::try_from(self.0) {
            Ok(small) => serializer.serialize_u64(small),
            Err(_) => serializer.serialize_str(&self.0.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for HostCount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(HostCountVisitor)
    }
}

struct HostCountVisitor;

impl<'de> Visitor<'de> for HostCountVisitor {
    type Value = HostCount;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a non-negative host count, as a number or a string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(HostCount(v.into()))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<Self::Value, E> {
        Ok(HostCount(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        u128::try_from(v)
            .map(HostCount)
            .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse()
            .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}

// ============================================================================
// Networks
// ============================================================================

/// A network as stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub id: Uuid,

    /// CIDR notation, e.g. `10.0.0.0/24`
    pub network: String,

    #[serde(default)]
    pub vlan: Option<Vlan>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub available: HostCount,

    #[serde(default)]
    pub used: HostCount,

    #[serde(default)]
    pub free: HostCount,

    /// Parent network when this one came from a subnet split
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father: Option<Uuid>,
}

/// Create payload built from a staged row
///
/// Only the fields the user filled in are present. Values are sent as
/// typed; the backend parses the CIDR and the VLAN id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NetworkDraft {
    pub fn is_empty(&self) -> bool {
        self.network.is_none() && self.vlan.is_none() && self.description.is_none()
    }
}

/// Update payload holding only the changed fields of a network
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NetworkPatch {
    pub fn is_empty(&self) -> bool {
        self.network.is_none() && self.vlan.is_none() && self.description.is_none()
    }
}

impl Network {
    /// Apply a patch the backend accepted.
    ///
    /// A VLAN value that does not parse leaves the current VLAN untouched.
    pub fn apply_patch(&mut self, patch: &NetworkPatch) {
        if let Some(network) = &patch.network {
            self.network = network.clone();
        }
        if let Some(vlan) = patch.vlan.as_deref().and_then(|v| v.parse().ok()) {
            self.vlan = Some(vlan);
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
    }
}

// ============================================================================
// Devices
// ============================================================================

/// Device status as tracked by the backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceStatus {
    Reserved,
    #[default]
    Unknown,
    Online,
    Offline,
}

impl DeviceStatus {
    /// Status after a ping, following the backend's own bookkeeping: a
    /// reply brings any device online, a miss only demotes an online one.
    pub fn after_ping(self, ping: PingStatus) -> Self {
        match (self, ping) {
            (_, PingStatus::Pong) => DeviceStatus::Online,
            (DeviceStatus::Online, PingStatus::Fail) => DeviceStatus::Offline,
            (other, PingStatus::Fail) => other,
        }
    }
}

/// Login material attached to a device
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A host address inside a network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub ip: IpAddr,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub office_id: Option<Uuid>,

    #[serde(default)]
    pub rack: Option<String>,

    #[serde(default)]
    pub room: Option<String>,

    #[serde(default)]
    pub status: DeviceStatus,

    pub network_id: Uuid,

    #[serde(default)]
    pub credential: Option<Credential>,
}

impl Device {
    pub fn key(&self) -> DeviceKey {
        DeviceKey {
            ip: self.ip,
            network_id: self.network_id,
        }
    }

    pub fn apply_patch(&mut self, patch: &DevicePatch) {
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        if let Some(rack) = &patch.rack {
            self.rack = Some(rack.clone());
        }
        if let Some(room) = &patch.room {
            self.room = Some(room.clone());
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}

/// Identifies a device: its address plus the network it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceKey {
    pub ip: IpAddr,
    pub network_id: Uuid,
}

impl DeviceKey {
    /// `ip=...&network_id=...`, percent-encoded
    pub fn query(&self) -> String {
        format!(
            "ip={}&network_id={}",
            urlencoding::encode(&self.ip.to_string()),
            self.network_id
        )
    }
}

/// Create payload for a single device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDraft {
    pub ip: IpAddr,

    pub network_id: Uuid,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rack: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
}

impl DeviceDraft {
    /// Draft from typed input. Blank optional fields are left out.
    pub fn new(ip: &str, network_id: Uuid, description: &str) -> Result<Self, ModelError> {
        let ip = ip
            .trim()
            .parse::<IpAddr>()
            .map_err(|_| ModelError::InvalidIp(ip.trim().to_string()))?;
        let description = description.trim();
        Ok(Self {
            ip,
            network_id,
            description: (!description.is_empty()).then(|| description.to_string()),
            rack: None,
            room: None,
        })
    }
}

/// Update payload holding only the changed fields of a device
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevicePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rack: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DeviceStatus>,
}

impl DevicePatch {
    /// `{"status": "Reserved"}`
    pub fn reserve() -> Self {
        Self {
            status: Some(DeviceStatus::Reserved),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.rack.is_none()
            && self.room.is_none()
            && self.status.is_none()
    }
}

/// Outcome of a liveness check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PingStatus {
    Pong,
    Fail,
}

/// Body of a ping answer: `{"ping": "Pong"}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingResponse {
    pub ping: PingStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_vlan_accepts_number_and_string() {
        let from_number: Vlan = serde_json::from_value(json!(20)).unwrap();
        let from_text: Vlan = serde_json::from_value(json!("20")).unwrap();

        assert_eq!(from_number, from_text);
        assert_eq!(serde_json::to_value(from_text).unwrap(), json!(20));
    }

    #[test]
    fn test_vlan_rejects_out_of_range() {
        assert!(serde_json::from_value::<Vlan>(json!(5000)).is_err());
        assert!(serde_json::from_value::<Vlan>(json!("abc")).is_err());
        assert!(serde_json::from_value::<Vlan>(json!(-1)).is_err());
        assert_eq!(Vlan::new(4097), Err(ModelError::InvalidVlan(4097)));
        assert!(Vlan::new(MAX_VLAN).is_ok());
    }

    #[test]
    fn test_host_count_large_values_travel_as_strings() {
        let big = HostCount(1u128 << 64);
        let value = serde_json::to_value(big).unwrap();
        assert_eq!(value, json!("18446744073709551616"));

        let parsed: HostCount = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, big);

        let small: HostCount = serde_json::from_value(json!(254)).unwrap();
        assert_eq!(small, HostCount(254));
    }

    #[test]
    fn test_network_from_backend_json() {
        let network: Network = serde_json::from_value(json!({
            "id": "7b0c9f5e-6a4f-4c1e-9d55-0c2a4f9e8f11",
            "network": "10.0.0.0/24",
            "vlan": "20",
            "description": null,
            "available": 254,
            "used": 0,
            "free": 254
        }))
        .unwrap();

        assert_eq!(network.vlan.map(Vlan::id), Some(20));
        assert_eq!(network.free, HostCount(254));
        assert!(network.father.is_none());
    }

    #[test]
    fn test_draft_omits_missing_fields() {
        let draft = NetworkDraft {
            description: Some("lab".to_string()),
            ..NetworkDraft::default()
        };

        assert_eq!(serde_json::to_value(&draft).unwrap(), json!({"description": "lab"}));
        assert!(NetworkDraft::default().is_empty());
    }

    #[test]
    fn test_network_apply_patch() {
        let mut network = Network {
            id: Uuid::new_v4(),
            network: "10.0.0.0/24".to_string(),
            vlan: None,
            description: None,
            available: HostCount(254),
            used: HostCount(0),
            free: HostCount(254),
            father: None,
        };

        network.apply_patch(&NetworkPatch {
            vlan: Some("30".to_string()),
            description: Some("core".to_string()),
            ..NetworkPatch::default()
        });

        assert_eq!(network.network, "10.0.0.0/24");
        assert_eq!(network.vlan, Some(Vlan(30)));
        assert_eq!(network.description.as_deref(), Some("core"));
    }

    #[test]
    fn test_status_after_ping() {
        assert_eq!(DeviceStatus::Unknown.after_ping(PingStatus::Pong), DeviceStatus::Online);
        assert_eq!(DeviceStatus::Reserved.after_ping(PingStatus::Pong), DeviceStatus::Online);
        assert_eq!(DeviceStatus::Online.after_ping(PingStatus::Fail), DeviceStatus::Offline);
        assert_eq!(DeviceStatus::Unknown.after_ping(PingStatus::Fail), DeviceStatus::Unknown);
        assert_eq!(DeviceStatus::Reserved.after_ping(PingStatus::Fail), DeviceStatus::Reserved);
    }

    #[test]
    fn test_reserve_payload() {
        assert_eq!(
            serde_json::to_value(DevicePatch::reserve()).unwrap(),
            json!({"status": "Reserved"})
        );
    }

    #[test]
    fn test_device_draft_from_input() {
        let network_id = Uuid::nil();
        let draft = DeviceDraft::new(" 10.0.0.9 ", network_id, "  ").unwrap();
        assert_eq!(
            serde_json::to_value(&draft).unwrap(),
            json!({"ip": "10.0.0.9", "network_id": "00000000-0000-0000-0000-000000000000"})
        );

        let draft = DeviceDraft::new("fd00::1", network_id, "core switch").unwrap();
        assert_eq!(draft.description.as_deref(), Some("core switch"));

        assert_eq!(
            DeviceDraft::new("10.0.0.300", network_id, ""),
            Err(ModelError::InvalidIp("10.0.0.300".to_string()))
        );
    }

    #[test]
    fn test_device_key_query_encodes_ipv6() {
        let key = DeviceKey {
            ip: "fe80::1".parse().unwrap(),
            network_id: Uuid::nil(),
        };

        assert_eq!(
            key.query(),
            "ip=fe80%3A%3A1&network_id=00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_credential_debug_redacts_password() {
        let credential = Credential {
            username: "admin".to_string(),
            password: "hunter2".to_string(),
        };

        let debug = format!("{:?}", credential);
        assert!(debug.contains("admin"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_ping_response_shape() {
        let pong: PingResponse = serde_json::from_value(json!({"ping": "Pong"})).unwrap();
        assert_eq!(pong.ping, PingStatus::Pong);
    }
}
