//! Edit forms behind the network and device modals
//!
//! A form remembers the values it was opened with. Saving sends only what
//! changed: a field is included when its trimmed value is non-empty and
//! differs from the original.

use std::str::FromStr;

use ipam_shared::{Device, DeviceKey, DevicePatch, Network, NetworkPatch};
use uuid::Uuid;

use crate::staging::{Field, NetworkFields};

fn changed(original: &str, current: &str) -> Option<String> {
    let current = current.trim();
    (!current.is_empty() && current != original.trim()).then(|| current.to_string())
}

/// State of the network edit modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkForm {
    pub id: Uuid,
    original: NetworkFields,
    pub current: NetworkFields,
    /// "Change network" checkbox; the CIDR is read-only while unticked
    pub change_network: bool,
}

impl NetworkForm {
    pub fn open(network: &Network) -> Self {
        let fields = NetworkFields::from(network);
        Self {
            id: network.id,
            original: fields.clone(),
            current: fields,
            change_network: false,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        self.current.set(field, value);
    }

    pub fn diff(&self) -> NetworkPatch {
        let field = |f: Field| changed(self.original.get(f), self.current.get(f));
        NetworkPatch {
            network: if self.change_network {
                field(Field::Network)
            } else {
                None
            },
            vlan: field(Field::Vlan),
            description: field(Field::Description),
        }
    }
}

/// Editable column of a device row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceField {
    Description,
    Rack,
    Room,
}

impl DeviceField {
    pub const ALL: [DeviceField; 3] = [DeviceField::Description, DeviceField::Rack, DeviceField::Room];

    pub fn as_str(self) -> &'static str {
        match self {
            DeviceField::Description => "description",
            DeviceField::Rack => "rack",
            DeviceField::Room => "room",
        }
    }
}

impl FromStr for DeviceField {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "description" => Ok(DeviceField::Description),
            "rack" => Ok(DeviceField::Rack),
            "room" => Ok(DeviceField::Room),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceFields {
    pub description: String,
    pub rack: String,
    pub room: String,
}

impl DeviceFields {
    pub fn get(&self, field: DeviceField) -> &str {
        match field {
            DeviceField::Description => &self.description,
            DeviceField::Rack => &self.rack,
            DeviceField::Room => &self.room,
        }
    }

    pub fn set(&mut self, field: DeviceField, value: String) {
        match field {
            DeviceField::Description => self.description = value,
            DeviceField::Rack => self.rack = value,
            DeviceField::Room => self.room = value,
        }
    }
}

impl From<&Device> for DeviceFields {
    fn from(device: &Device) -> Self {
        Self {
            description: device.description.clone().unwrap_or_default(),
            rack: device.rack.clone().unwrap_or_default(),
            room: device.room.clone().unwrap_or_default(),
        }
    }
}

/// State of the device edit modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceForm {
    pub key: DeviceKey,
    original: DeviceFields,
    pub current: DeviceFields,
}

impl DeviceForm {
    pub fn open(device: &Device) -> Self {
        let fields = DeviceFields::from(device);
        Self {
            key: device.key(),
            original: fields.clone(),
            current: fields,
        }
    }

    pub fn set(&mut self, field: DeviceField, value: String) {
        self.current.set(field, value);
    }

    pub fn diff(&self) -> DevicePatch {
        let field = |f: DeviceField| changed(self.original.get(f), self.current.get(f));
        DevicePatch {
            description: field(DeviceField::Description),
            rack: field(DeviceField::Rack),
            room: field(DeviceField::Room),
            status: None,
        }
    }
}
