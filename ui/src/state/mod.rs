//! Session State Management
//!
//! [`Session`] owns everything the networks page mutates:
//! - the staging table of networks not yet sent
//! - the confirmed table of networks the backend knows about
//! - the bulk-submit flag
//!
//! It is provided once through Leptos context. Components only read its
//! signals and call its operations.

pub mod devices;
mod edit;

pub use devices::DeviceSession;
pub use edit::{DeviceField, DeviceFields, DeviceForm, NetworkForm};

use leptos::*;
use uuid::Uuid;

use crate::client::{IpamClientError, SharedClient};
use crate::staging::{ConfirmedTable, Field, RowId, SkipReason, StagingTable};

/// Result of submitting one staged row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The row was accepted and this many confirmed rows were appended
    Created(usize),
    /// Nothing was sent
    Skipped(SkipReason),
    /// The backend refused or could not be reached; the row stays staged
    Failed(IpamClientError),
    /// A bulk submission is running
    Busy,
}

/// Tally of a "Send all"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkOutcome {
    pub created: usize,
    pub failed: usize,
    pub skipped: usize,
    /// The staging table ended up empty; reload the page
    pub reload: bool,
}

/// Result of saving an edit modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Nothing changed, nothing sent
    Unchanged,
    Saved,
    Failed(IpamClientError),
}

/// Networks page state
#[derive(Clone)]
pub struct Session {
    pub staging: RwSignal<StagingTable>,
    pub confirmed: RwSignal<ConfirmedTable>,

    /// Set while "Send all" runs
    pub pending: RwSignal<bool>,

    pub loading: RwSignal<bool>,

    /// Last page-level error
    pub error: RwSignal<Option<String>>,

    client: SharedClient,
}

impl Session {
    pub fn new(client: SharedClient) -> Self {
        Self {
            staging: create_rw_signal(StagingTable::new()),
            confirmed: create_rw_signal(ConfirmedTable::new()),
            pending: create_rw_signal(false),
            loading: create_rw_signal(false),
            error: create_rw_signal(None),
            client,
        }
    }

    /// Replace the confirmed table with the backend's listing
    pub async fn load_networks(&self) -> Result<(), IpamClientError> {
        self.loading.set(true);
        let result = self.client.list_networks().await;
        self.loading.set(false);

        match result {
            Ok(networks) => {
                tracing::debug!(count = networks.len(), "loaded networks");
                self.confirmed.update(|table| table.replace_all(networks));
                self.error.set(None);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("failed to load networks: {}", e);
                self.error.set(Some(e.to_string()));
                Err(e)
            }
        }
    }

    pub fn add_row(&self) {
        self.staging.update(|table| {
            table.add_row();
        });
    }

    pub fn remove_row(&self, position: usize) {
        self.staging.update(|table| {
            table.remove_row(position);
        });
    }

    pub fn remove_all(&self) {
        self.staging.update(|table| table.clear());
    }

    pub fn set_field(&self, position: usize, field: Field, value: String) {
        self.staging.update(|table| {
            table.set_field(position, field, value);
        });
    }

    /// Send the staged row at `position`
    pub async fn submit_one(&self, position: usize) -> SubmitOutcome {
        if self.pending.get_untracked() {
            return SubmitOutcome::Busy;
        }
        match self.staging.with_untracked(|table| table.row(position).map(|row| row.id)) {
            Some(id) => self.submit_row(id).await,
            None => SubmitOutcome::Skipped(SkipReason::NoSuchRow),
        }
    }

    async fn submit_row(&self, id: RowId) -> SubmitOutcome {
        let draft = match self.staging.try_update(|table| table.begin_submit(id)) {
            Some(Ok(draft)) => draft,
            Some(Err(reason)) => return SubmitOutcome::Skipped(reason),
            None => return SubmitOutcome::Skipped(SkipReason::NoSuchRow),
        };

        match self.client.create_network(&draft).await {
            Ok(records) if records.is_empty() => {
                self.staging.update(|table| {
                    table.remove_by_id(id);
                });
                tracing::info!("network created without records, reloading the listing");
                self.load_networks().await.ok();
                SubmitOutcome::Created(0)
            }
            Ok(records) => {
                self.staging.update(|table| {
                    table.remove_by_id(id);
                });
                let added = self
                    .confirmed
                    .try_update(|table| table.append(records))
                    .unwrap_or_default();
                tracing::info!(added, "network created");
                SubmitOutcome::Created(added)
            }
            Err(e) => {
                tracing::warn!("failed to create network: {}", e);
                self.staging.update(|table| table.fail(id, e.to_string()));
                SubmitOutcome::Failed(e)
            }
        }
    }

    /// Send every staged row, one request at a time, in display order
    pub async fn submit_all(&self) -> BulkOutcome {
        if self.pending.get_untracked() {
            return BulkOutcome::default();
        }
        self.pending.set(true);

        let ids = self.staging.with_untracked(|table| table.ids());
        let mut outcome = BulkOutcome::default();

        for id in ids {
            match self.submit_row(id).await {
                SubmitOutcome::Created(_) => outcome.created += 1,
                SubmitOutcome::Failed(_) => outcome.failed += 1,
                SubmitOutcome::Skipped(_) | SubmitOutcome::Busy => outcome.skipped += 1,
            }
        }

        self.pending.set(false);
        outcome.reload = self.staging.with_untracked(|table| table.is_empty());
        tracing::info!(
            created = outcome.created,
            failed = outcome.failed,
            skipped = outcome.skipped,
            "bulk submit finished"
        );
        outcome
    }

    /// Send the edit modal's changes and patch the confirmed row
    pub async fn save_network(&self, form: &NetworkForm) -> EditOutcome {
        let patch = form.diff();
        if patch.is_empty() {
            return EditOutcome::Unchanged;
        }

        match self.client.update_network(form.id, &patch).await {
            Ok(()) => {
                self.confirmed.update(|table| {
                    table.apply_patch(form.id, &patch);
                });
                EditOutcome::Saved
            }
            Err(e) => {
                tracing::warn!("failed to update network {}: {}", form.id, e);
                EditOutcome::Failed(e)
            }
        }
    }

    pub async fn delete_network(&self, id: Uuid) -> Result<(), IpamClientError> {
        if let Err(e) = self.client.delete_network(id).await {
            tracing::warn!("failed to delete network {}: {}", id, e);
            self.error.set(Some(e.to_string()));
            return Err(e);
        }
        self.confirmed.update(|table| {
            table.remove(id);
        });
        Ok(())
    }

    /// Split a network and append the subnets it produced
    pub async fn split_subnet(&self, id: Uuid, prefix: u8) -> Result<usize, IpamClientError> {
        match self.client.split_subnet(id, prefix).await {
            Ok(children) => Ok(self
                .confirmed
                .try_update(|table| table.append(children))
                .unwrap_or_default()),
            Err(e) => {
                tracing::warn!("failed to split network {} into /{}: {}", id, prefix, e);
                self.error.set(Some(e.to_string()));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    use futures::executor::block_on;
    use ipam_shared::NetworkDraft;

    use crate::client::mock::{network, MockClient};
    use crate::staging::RowState;

    fn session() -> (Rc<MockClient>, Session) {
        let mock = Rc::new(MockClient::new());
        let session = Session::new(mock.clone());
        (mock, session)
    }

    fn stage(session: &Session, network: &str, vlan: &str, description: &str) {
        session.add_row();
        let position = session.staging.with_untracked(|t| t.len());
        session.set_field(position, Field::Network, network.to_string());
        session.set_field(position, Field::Vlan, vlan.to_string());
        session.set_field(position, Field::Description, description.to_string());
    }

    fn failure() -> IpamClientError {
        IpamClientError::RequestFailed {
            status: 400,
            message: "bad network".to_string(),
        }
    }

    #[test]
    fn test_submit_all_drains_and_requests_reload() {
        let runtime = create_runtime();
        let (mock, session) = session();
        stage(&session, "10.0.0.0/24", "", "");
        stage(&session, "10.0.1.0/24", "20", "lab");

        let outcome = block_on(session.submit_all());

        assert_eq!(outcome.created, 2);
        assert!(outcome.reload);
        assert!(session.staging.with_untracked(|t| t.is_empty()));
        let confirmed: Vec<_> = session
            .confirmed
            .with_untracked(|t| t.rows().iter().map(|r| r.network.network.clone()).collect());
        assert_eq!(confirmed, vec!["10.0.0.0/24", "10.0.1.0/24"]);

        let sent = mock.created.borrow();
        assert_eq!(sent.len(), 2);
        assert_eq!(
            sent[0],
            NetworkDraft {
                network: Some("10.0.0.0/24".to_string()),
                ..Default::default()
            }
        );
        assert!(!session.pending.get_untracked());
        runtime.dispose();
    }

    #[test]
    fn test_description_only_row_is_sent_sparse() {
        let runtime = create_runtime();
        let (mock, session) = session();
        stage(&session, "", "", "lab");

        let outcome = block_on(session.submit_one(1));

        assert_eq!(outcome, SubmitOutcome::Created(1));
        let sent = mock.created.borrow();
        assert_eq!(serde_json::to_value(&sent[0]).unwrap(), serde_json::json!({"description": "lab"}));
        runtime.dispose();
    }

    #[test]
    fn test_empty_row_is_not_sent() {
        let runtime = create_runtime();
        let (mock, session) = session();
        session.add_row();

        assert_eq!(block_on(session.submit_one(1)), SubmitOutcome::Skipped(SkipReason::Empty));
        assert_eq!(block_on(session.submit_one(4)), SubmitOutcome::Skipped(SkipReason::NoSuchRow));
        assert!(mock.created.borrow().is_empty());
        assert_eq!(session.staging.with_untracked(|t| t.len()), 1);
        runtime.dispose();
    }

    #[test]
    fn test_failed_submit_keeps_row_and_marks_it() {
        let runtime = create_runtime();
        let (mock, session) = session();
        mock.create_results.borrow_mut().push_back(Err(failure()));
        stage(&session, "not-a-cidr", "", "");

        let outcome = block_on(session.submit_one(1));

        assert_eq!(outcome, SubmitOutcome::Failed(failure()));
        session.staging.with_untracked(|t| {
            let row = t.row(1).unwrap();
            assert_eq!(row.position, 1);
            assert_eq!(row.fields.network, "not-a-cidr");
            assert_eq!(row.state, RowState::Failed(failure().to_string()));
        });
        assert!(session.confirmed.with_untracked(|t| t.is_empty()));
        // Only the one attempt; nothing retries behind the user's back.
        assert_eq!(mock.created.borrow().len(), 1);
        runtime.dispose();
    }

    #[test]
    fn test_created_without_records_reloads_listing() {
        let runtime = create_runtime();
        let (mock, session) = session();
        mock.create_results.borrow_mut().push_back(Ok(Vec::new()));
        mock.networks.borrow_mut().push(network("10.9.0.0/24"));
        stage(&session, "10.9.0.0/24", "", "");

        let outcome = block_on(session.submit_one(1));

        assert_eq!(outcome, SubmitOutcome::Created(0));
        assert!(session.staging.with_untracked(|t| t.is_empty()));
        let confirmed: Vec<_> = session
            .confirmed
            .with_untracked(|t| t.rows().iter().map(|r| r.network.network.clone()).collect());
        assert_eq!(confirmed, vec!["10.9.0.0/24"]);
        assert_eq!(mock.created.borrow().len(), 1);
        runtime.dispose();
    }

    #[test]
    fn test_submit_all_with_a_failure_keeps_page() {
        let runtime = create_runtime();
        let (mock, session) = session();
        mock.create_results.borrow_mut().push_back(Err(failure()));
        stage(&session, "bogus", "", "");
        stage(&session, "10.0.1.0/24", "", "");
        session.add_row();

        let outcome = block_on(session.submit_all());

        assert_eq!(
            outcome,
            BulkOutcome {
                created: 1,
                failed: 1,
                skipped: 1,
                reload: false,
            }
        );
        let remaining: Vec<_> = session.staging.with_untracked(|t| {
            t.rows()
                .iter()
                .map(|r| (r.position, r.fields.network.clone()))
                .collect()
        });
        assert_eq!(remaining, vec![(1, "bogus".to_string()), (2, String::new())]);
        runtime.dispose();
    }

    #[test]
    fn test_submit_all_on_empty_table_reloads() {
        let runtime = create_runtime();
        let (mock, session) = session();

        let outcome = block_on(session.submit_all());

        assert!(outcome.reload);
        assert!(mock.created.borrow().is_empty());
        runtime.dispose();
    }

    #[test]
    fn test_single_submit_refused_during_bulk() {
        let runtime = create_runtime();
        let (mock, session) = session();
        stage(&session, "10.0.0.0/24", "", "");
        session.pending.set(true);

        assert_eq!(block_on(session.submit_one(1)), SubmitOutcome::Busy);
        assert!(mock.created.borrow().is_empty());
        runtime.dispose();
    }

    #[test]
    fn test_one_response_may_confirm_several_records() {
        let runtime = create_runtime();
        let (mock, session) = session();
        mock.create_results
            .borrow_mut()
            .push_back(Ok(vec![network("10.0.0.0/25"), network("10.0.0.128/25")]));
        stage(&session, "10.0.0.0/24", "", "");

        assert_eq!(block_on(session.submit_one(1)), SubmitOutcome::Created(2));
        assert_eq!(session.confirmed.with_untracked(|t| t.len()), 2);
        runtime.dispose();
    }

    #[test]
    fn test_remove_row_renumbers_remaining() {
        let runtime = create_runtime();
        let (_mock, session) = session();
        stage(&session, "a", "", "");
        stage(&session, "b", "", "");
        stage(&session, "c", "", "");

        session.remove_row(1);

        session.staging.with_untracked(|t| {
            assert_eq!(t.row(1).unwrap().fields.network, "b");
            assert_eq!(t.row(2).unwrap().fields.network, "c");
            assert!(t.shows_bulk_actions());
        });

        session.remove_all();
        assert!(session.staging.with_untracked(|t| t.is_empty()));
        runtime.dispose();
    }

    #[test]
    fn test_save_network_patches_confirmed_row() {
        let runtime = create_runtime();
        let (mock, session) = session();
        let target = network("10.0.0.0/24");
        mock.networks.borrow_mut().push(target.clone());
        block_on(session.load_networks()).unwrap();

        let mut form = NetworkForm::open(&target);
        assert_eq!(block_on(session.save_network(&form)), EditOutcome::Unchanged);

        form.set(Field::Description, "core".to_string());
        assert_eq!(block_on(session.save_network(&form)), EditOutcome::Saved);

        assert_eq!(mock.updated_networks.borrow().len(), 1);
        let description = session
            .confirmed
            .with_untracked(|t| t.get(target.id).and_then(|n| n.description.clone()));
        assert_eq!(description.as_deref(), Some("core"));
        runtime.dispose();
    }

    #[test]
    fn test_failed_save_leaves_row_untouched() {
        let runtime = create_runtime();
        let (mock, session) = session();
        let target = network("10.0.0.0/24");
        mock.networks.borrow_mut().push(target.clone());
        block_on(session.load_networks()).unwrap();
        mock.fail_writes.set(true);

        let mut form = NetworkForm::open(&target);
        form.set(Field::Description, "core".to_string());

        assert!(matches!(block_on(session.save_network(&form)), EditOutcome::Failed(_)));
        assert_eq!(session.confirmed.with_untracked(|t| t.get(target.id).cloned()), Some(target));
        runtime.dispose();
    }

    #[test]
    fn test_delete_and_split() {
        let runtime = create_runtime();
        let (mock, session) = session();
        let parent = network("10.0.0.0/24");
        let other = network("10.9.0.0/24");
        mock.networks.borrow_mut().extend([parent.clone(), other.clone()]);
        block_on(session.load_networks()).unwrap();

        assert_eq!(block_on(session.split_subnet(parent.id, 25)), Ok(2));
        assert_eq!(*mock.splits.borrow(), vec![(parent.id, 25)]);
        assert_eq!(session.confirmed.with_untracked(|t| t.len()), 4);

        block_on(session.delete_network(other.id)).unwrap();
        assert_eq!(*mock.deleted_networks.borrow(), vec![other.id]);
        session.confirmed.with_untracked(|t| {
            assert_eq!(t.len(), 3);
            assert!(t.get(other.id).is_none());
            assert_eq!(t.row(3).unwrap().position, 3);
        });
        runtime.dispose();
    }
}
