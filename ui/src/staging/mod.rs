//! Staged and confirmed network tables
//!
//! The staging table holds networks the user has typed in but not yet sent.
//! Rows are addressed two ways:
//! - by **position**, the 1-based display index carried in each row's
//!   `data-row` attribute, rewritten by [`StagingTable::renumber`];
//! - by [`RowId`], which never changes while the row lives and is what an
//!   in-flight submission holds on to.
//!
//! Invariant between operations: `rows[i].position == i + 1`.

pub mod action;
mod confirmed;

pub use action::RowAction;
pub use confirmed::{ConfirmedRow, ConfirmedTable};

use std::str::FromStr;

use ipam_shared::{Network, NetworkDraft};

/// Stable identifier of a staged row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(u64);

/// Editable column of a network row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Network,
    Vlan,
    Description,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Network, Field::Vlan, Field::Description];

    /// Value of the `data-field` attribute and the input placeholder
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Network => "network",
            Field::Vlan => "vlan",
            Field::Description => "description",
        }
    }
}

impl FromStr for Field {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "network" => Ok(Field::Network),
            "vlan" => Ok(Field::Vlan),
            "description" => Ok(Field::Description),
            _ => Err(()),
        }
    }
}

/// Raw input values of a network row. Empty string means "not filled".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkFields {
    pub network: String,
    pub vlan: String,
    pub description: String,
}

impl NetworkFields {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Network => &self.network,
            Field::Vlan => &self.vlan,
            Field::Description => &self.description,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Network => self.network = value,
            Field::Vlan => self.vlan = value,
            Field::Description => self.description = value,
        }
    }

    pub fn is_empty(&self) -> bool {
        Field::ALL.iter().all(|f| self.get(*f).is_empty())
    }

    /// Sparse draft of the filled-in fields, or `None` when nothing is filled
    pub fn to_draft(&self) -> Option<NetworkDraft> {
        if self.is_empty() {
            return None;
        }
        let filled = |value: &str| (!value.is_empty()).then(|| value.to_string());
        Some(NetworkDraft {
            network: filled(&self.network),
            vlan: filled(&self.vlan),
            description: filled(&self.description),
        })
    }
}

impl From<&Network> for NetworkFields {
    fn from(network: &Network) -> Self {
        Self {
            network: network.network.clone(),
            vlan: network.vlan.map(|v| v.to_string()).unwrap_or_default(),
            description: network.description.clone().unwrap_or_default(),
        }
    }
}

/// Submission state of a staged row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RowState {
    #[default]
    Pending,
    Submitting,
    /// Last submission failed with this message
    Failed(String),
}

/// A network typed in but not yet persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedRow {
    pub id: RowId,
    pub position: usize,
    pub fields: NetworkFields,
    pub state: RowState,
}

/// Why a row was not submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoSuchRow,
    /// Every field is empty
    Empty,
    /// A submission for this row is already in flight
    InFlight,
}

/// Ordered staging rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagingTable {
    rows: Vec<StagedRow>,
    next_id: u64,
}

impl StagingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[StagedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// "Send all" / "Remove all" only make sense with two or more rows
    pub fn shows_bulk_actions(&self) -> bool {
        self.rows.len() >= 2
    }

    /// Append an empty row at the next position
    pub fn add_row(&mut self) -> RowId {
        self.next_id += 1;
        let id = RowId(self.next_id);
        self.rows.push(StagedRow {
            id,
            position: self.rows.len() + 1,
            fields: NetworkFields::default(),
            state: RowState::Pending,
        });
        id
    }

    pub fn row(&self, position: usize) -> Option<&StagedRow> {
        position.checked_sub(1).and_then(|index| self.rows.get(index))
    }

    pub fn row_by_id(&self, id: RowId) -> Option<&StagedRow> {
        self.rows.iter().find(|row| row.id == id)
    }

    /// Identifiers in display order
    pub fn ids(&self) -> Vec<RowId> {
        self.rows.iter().map(|row| row.id).collect()
    }

    /// Record user input. Editing a failed row makes it pending again.
    pub fn set_field(&mut self, position: usize, field: Field, value: String) -> bool {
        let Some(row) = position
            .checked_sub(1)
            .and_then(|index| self.rows.get_mut(index))
        else {
            return false;
        };

        row.fields.set(field, value);
        if matches!(row.state, RowState::Failed(_)) {
            row.state = RowState::Pending;
        }
        true
    }

    /// Sparse draft of the row's filled-in fields; `None` when the row does
    /// not exist or nothing is filled in
    pub fn collect(&self, position: usize) -> Option<NetworkDraft> {
        self.row(position).and_then(|row| row.fields.to_draft())
    }

    /// Mark a row as submitting and hand back what to send
    pub fn begin_submit(&mut self, id: RowId) -> Result<NetworkDraft, SkipReason> {
        let row = self
            .rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or(SkipReason::NoSuchRow)?;

        if row.state == RowState::Submitting {
            return Err(SkipReason::InFlight);
        }
        let draft = row.fields.to_draft().ok_or(SkipReason::Empty)?;
        row.state = RowState::Submitting;
        Ok(draft)
    }

    pub fn fail(&mut self, id: RowId, message: String) {
        if let Some(row) = self.rows.iter_mut().find(|row| row.id == id) {
            row.state = RowState::Failed(message);
        }
    }

    /// Delete the row at `position` and renumber the rest
    pub fn remove_row(&mut self, position: usize) -> Option<StagedRow> {
        let index = position.checked_sub(1).filter(|i| *i < self.rows.len())?;
        let removed = self.rows.remove(index);
        self.renumber();
        Some(removed)
    }

    pub fn remove_by_id(&mut self, id: RowId) -> Option<StagedRow> {
        let index = self.rows.iter().position(|row| row.id == id)?;
        let removed = self.rows.remove(index);
        self.renumber();
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Reassign positions `1..=N` in display order
    pub fn renumber(&mut self) {
        for (index, row) in self.rows.iter_mut().enumerate() {
            row.position = index + 1;
        }
    }
}
