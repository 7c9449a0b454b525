//! Networks Page
//!
//! The confirmed networks table, the staging table for new networks, and
//! the modals that edit or split a confirmed network. Both tables decode
//! clicks from a single delegated listener on their `<tbody>`.

mod edit;
mod staging;

use ipam_shared::Network;
use leptos::*;
use leptos_router::*;

use self::edit::{NetworkEditModal, SplitModal};
use self::staging::StagingTableView;
use crate::components::common::{
    clicked_action, confirm, EditIcon, ErrorBanner, PlusIcon, RefreshIcon, SplitIcon, TrashIcon,
};
use crate::staging::{ConfirmedRow, RowAction};
use crate::state::{NetworkForm, Session};

pub(crate) const HEADER_CELL: &str = "px-4 py-3 font-medium";
pub(crate) const CELL: &str = "px-4 py-2 text-sm text-theme";
pub(crate) const INPUT: &str = "w-full px-3 py-2 rounded-lg bg-theme-bg border border-theme-border text-sm text-theme focus:outline-none focus:ring-2 focus:ring-accent focus:border-transparent disabled:opacity-50";

/// All networks plus the staging area for new ones
#[component]
pub fn NetworksPage() -> impl IntoView {
    let session = store_value(expect_context::<Session>());
    let editing = create_rw_signal(Option::<NetworkForm>::None);
    let splitting = create_rw_signal(Option::<Network>::None);

    let (confirmed, loading, error) = session.with_value(|s| (s.confirmed, s.loading, s.error));

    let reload = move || {
        let session = session.get_value();
        spawn_local(async move {
            session.load_networks().await.ok();
        });
    };

    // Fetch networks on mount
    create_effect(move |_| reload());

    let on_click = move |ev: ev::MouseEvent| {
        let Some((action, position)) = clicked_action(&ev) else {
            return;
        };
        let Some(network) = confirmed.with_untracked(|t| t.row(position).map(|r| r.network.clone()))
        else {
            return;
        };

        match action {
            RowAction::Modify => editing.set(Some(NetworkForm::open(&network))),
            RowAction::Split => splitting.set(Some(network)),
            RowAction::Remove => {
                if confirm(&format!("Delete network {}?", network.network)) {
                    let session = session.get_value();
                    spawn_local(async move {
                        session.delete_network(network.id).await.ok();
                    });
                }
            }
            _ => {}
        }
    };

    view! {
        <div class="flex-1 overflow-auto p-6">
            <div class="max-w-7xl mx-auto">
                <div class="flex items-center justify-between mb-6">
                    <h1 class="text-2xl font-bold text-theme">"Networks"</h1>
                    <div class="flex items-center gap-3">
                        <button class="btn-secondary flex items-center gap-2" on:click=move |_| reload()>
                            <RefreshIcon />
                            "Refresh"
                        </button>
                        <button
                            class="btn-primary flex items-center gap-2"
                            on:click=move |_| session.with_value(|s| s.add_row())
                        >
                            <PlusIcon />
                            "Add network"
                        </button>
                    </div>
                </div>

                <ErrorBanner error=error />

                <StagingTableView />

                <div class="bg-theme-surface rounded-xl border border-theme-border overflow-hidden">
                    <table class="w-full">
                        <thead class="bg-theme-bg">
                            <tr class="text-left text-xs text-theme-secondary uppercase tracking-wide">
                                <th class=HEADER_CELL>"#"</th>
                                <th class=HEADER_CELL>"Network"</th>
                                <th class=HEADER_CELL>"VLAN"</th>
                                <th class=HEADER_CELL>"Description"</th>
                                <th class=HEADER_CELL>"Available"</th>
                                <th class=HEADER_CELL>"Used"</th>
                                <th class=HEADER_CELL>"Free"</th>
                                <th class=format!("{} text-right", HEADER_CELL)>"Actions"</th>
                            </tr>
                        </thead>
                        <tbody class="divide-y divide-theme-border" on:click=on_click>
                            {move || confirmed.with(|t| t.rows().iter().map(confirmed_row).collect_view())}
                        </tbody>
                    </table>

                    <Show when=move || !loading.get() && confirmed.with(|t| t.is_empty())>
                        <div class="p-8 text-center text-theme-secondary">"No networks yet"</div>
                    </Show>
                    <Show when=move || loading.get()>
                        <div class="p-8 text-center text-theme-secondary">"Loading networks..."</div>
                    </Show>
                </div>
            </div>

            <NetworkEditModal form=editing />
            <SplitModal target=splitting />
        </div>
    }
}

fn confirmed_row(row: &ConfirmedRow) -> impl IntoView {
    let network = &row.network;
    let position = row.position.to_string();
    let cidr = network.network.clone();

    view! {
        <tr class="hover:bg-theme-surface-hover">
            <td class=format!("{} text-theme-muted", CELL)>{row.position}</td>
            <td class=format!("{} font-mono", CELL)>
                <A href=format!("/devices/{}", network.id) class="text-accent hover:underline">
                    {cidr}
                </A>
            </td>
            <td class=CELL>{network.vlan.map(|v| v.to_string()).unwrap_or_default()}</td>
            <td class=CELL>{network.description.clone().unwrap_or_default()}</td>
            <td class=CELL>{network.available.to_string()}</td>
            <td class=CELL>{network.used.to_string()}</td>
            <td class=CELL>{network.free.to_string()}</td>
            <td class=format!("{} text-right whitespace-nowrap", CELL)>
                <button class="btn-ghost p-1.5" title="Modify" data-action=RowAction::MODIFY data-row=position.clone()>
                    <EditIcon />
                </button>
                <button class="btn-ghost p-1.5" title="Split" data-action=RowAction::SPLIT data-row=position.clone()>
                    <SplitIcon />
                </button>
                <button class="btn-ghost p-1.5 text-red-400" title="Remove" data-action=RowAction::REMOVE data-row=position>
                    <TrashIcon />
                </button>
            </td>
        </tr>
    }
}
