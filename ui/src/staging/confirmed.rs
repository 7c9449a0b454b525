use ipam_shared::{Network, NetworkPatch};
use uuid::Uuid;

/// A network the backend has acknowledged
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmedRow {
    pub position: usize,
    pub network: Network,
}

impl ConfirmedRow {
    pub fn id(&self) -> Uuid {
        self.network.id
    }
}

/// Server-confirmed networks in display order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfirmedTable {
    rows: Vec<ConfirmedRow>,
}

impl ConfirmedTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[ConfirmedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, position: usize) -> Option<&ConfirmedRow> {
        position.checked_sub(1).and_then(|index| self.rows.get(index))
    }

    pub fn get(&self, id: Uuid) -> Option<&Network> {
        self.rows.iter().map(|row| &row.network).find(|n| n.id == id)
    }

    /// Append one row per record, in payload order
    pub fn append(&mut self, records: impl IntoIterator<Item = Network>) -> usize {
        let before = self.rows.len();
        for network in records {
            let position = self.rows.len() + 1;
            self.rows.push(ConfirmedRow { position, network });
        }
        self.rows.len() - before
    }

    pub fn replace_all(&mut self, records: impl IntoIterator<Item = Network>) {
        self.rows.clear();
        self.append(records);
    }

    pub fn remove(&mut self, id: Uuid) -> Option<Network> {
        let index = self.rows.iter().position(|row| row.id() == id)?;
        let removed = self.rows.remove(index);
        for (index, row) in self.rows.iter_mut().enumerate() {
            row.position = index + 1;
        }
        Some(removed.network)
    }

    /// Patch a row in place; `false` when no row has this id
    pub fn apply_patch(&mut self, id: Uuid, patch: &NetworkPatch) -> bool {
        match self.rows.iter_mut().find(|row| row.id() == id) {
            Some(row) => {
                row.network.apply_patch(patch);
                true
            }
            None => false,
        }
    }
}
