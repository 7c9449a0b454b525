//! Devices Page
//!
//! Devices of one network with reserve, ping and edit controls, plus the
//! walk toggle that pings every device in turn.

mod edit;

use ipam_shared::{Device, DeviceStatus};
use leptos::*;
use leptos_router::*;
use uuid::Uuid;

use self::edit::DeviceEditModal;
use crate::client::SharedClient;
use crate::components::common::{clicked_action, EditIcon, ErrorBanner, LockIcon, PingIcon, PlusIcon};
use crate::components::networks::{CELL, HEADER_CELL, INPUT};
use crate::staging::RowAction;
use crate::state::{DeviceForm, DeviceSession};

/// Route component for `/devices/:network_id`
#[component]
pub fn DevicesPage() -> impl IntoView {
    let params = use_params_map();
    let client = expect_context::<SharedClient>();

    move || {
        let network_id = params.with(|p| p.get("network_id").and_then(|id| id.parse::<Uuid>().ok()));
        match network_id {
            Some(network_id) => {
                view! { <DeviceList session=DeviceSession::new(client.clone(), network_id) /> }.into_view()
            }
            None => view! {
                <div class="p-6 text-red-400">"Unknown network"</div>
            }
            .into_view(),
        }
    }
}

fn status_badge(status: DeviceStatus) -> impl IntoView {
    let (class, label) = match status {
        DeviceStatus::Online => ("text-green-400", "Online"),
        DeviceStatus::Offline => ("text-red-400", "Offline"),
        DeviceStatus::Reserved => ("text-yellow-400", "Reserved"),
        DeviceStatus::Unknown => ("text-theme-muted", "Unknown"),
    };
    view! { <span class=format!("text-xs font-medium {}", class)>{label}</span> }
}

fn device_row(position: usize, device: &Device) -> impl IntoView {
    let row = position.to_string();

    view! {
        <tr class="hover:bg-theme-surface-hover">
            <td class=format!("{} font-mono", CELL)>{device.ip.to_string()}</td>
            <td class=CELL>{device.description.clone().unwrap_or_default()}</td>
            <td class=CELL>{device.rack.clone().unwrap_or_default()}</td>
            <td class=CELL>{device.room.clone().unwrap_or_default()}</td>
            <td class=CELL>{status_badge(device.status)}</td>
            <td class=format!("{} text-right whitespace-nowrap", CELL)>
                <button
                    class="btn-ghost p-1.5 disabled:opacity-50"
                    title="Reserve"
                    data-action=RowAction::RESERVE
                    data-row=row.clone()
                    disabled={device.status == DeviceStatus::Reserved}
                >
                    <LockIcon />
                </button>
                <button class="btn-ghost p-1.5" title="Ping" data-action=RowAction::PING data-row=row.clone()>
                    <PingIcon />
                </button>
                <button class="btn-ghost p-1.5" title="Modify" data-action=RowAction::MODIFY data-row=row>
                    <EditIcon />
                </button>
            </td>
        </tr>
    }
}

#[component]
fn DeviceList(session: DeviceSession) -> impl IntoView {
    let network_id = session.network_id;
    let (devices, loading, error) = (session.devices, session.loading, session.error);
    let session = store_value(session);
    let editing = create_rw_signal(Option::<DeviceForm>::None);

    // Fetch devices on mount
    create_effect(move |_| {
        let session = session.get_value();
        spawn_local(async move {
            session.load().await.ok();
        });
    });

    let on_click = move |ev: ev::MouseEvent| {
        let Some((action, position)) = clicked_action(&ev) else {
            return;
        };
        let Some(device) = devices.with_untracked(|d| d.get(position - 1).cloned()) else {
            return;
        };

        match action {
            RowAction::Modify => editing.set(Some(DeviceForm::open(&device))),
            RowAction::Reserve => {
                let session = session.get_value();
                spawn_local(async move {
                    session.reserve(device.key()).await.ok();
                });
            }
            RowAction::Ping => {
                let session = session.get_value();
                spawn_local(async move {
                    session.ping(device.key()).await.ok();
                });
            }
            _ => {}
        }
    };

    let new_ip = create_rw_signal(String::new());
    let new_description = create_rw_signal(String::new());
    let add_device = move |_| {
        let session = session.get_value();
        let (ip, description) = (new_ip.get_untracked(), new_description.get_untracked());
        spawn_local(async move {
            if session.create_device(&ip, &description).await.is_ok() {
                new_ip.set(String::new());
                new_description.set(String::new());
            }
        });
    };

    let create_all = move |_| {
        let session = session.get_value();
        spawn_local(async move {
            session.create_all().await.ok();
        });
    };

    let toggle_walk = move |_| {
        let session = session.get_value();
        if let Some(run) = session.toggle_walk() {
            spawn_local(async move {
                session.run_walk(run).await;
            });
        }
    };

    let walk_label = move || {
        session.with_value(|s| {
            if s.is_stopping() {
                "Stopping..."
            } else if s.is_walking() {
                "Stop walk"
            } else {
                "Walk"
            }
        })
    };

    view! {
        <div class="flex-1 overflow-auto p-6">
            <div class="max-w-7xl mx-auto">
                <div class="flex items-center justify-between mb-6">
                    <div>
                        <A href="/" class="text-sm text-theme-secondary hover:underline">"← Networks"</A>
                        <h1 class="text-2xl font-bold text-theme">"Devices"</h1>
                        <div class="text-xs text-theme-muted font-mono">{network_id.to_string()}</div>
                    </div>
                    <div class="flex items-center gap-3">
                        <button class="btn-secondary flex items-center gap-2" on:click=create_all>
                            <PlusIcon />
                            "Create all devices"
                        </button>
                        <button
                            class="btn-primary flex items-center gap-2 disabled:opacity-50"
                            disabled=move || session.with_value(|s| s.is_stopping())
                            on:click=toggle_walk
                        >
                            <PingIcon />
                            {walk_label}
                        </button>
                    </div>
                </div>

                <ErrorBanner error=error />

                <div class="mb-4 flex items-center gap-3">
                    <input
                        type="text"
                        class=INPUT
                        placeholder="ip"
                        prop:value=move || new_ip.get()
                        on:input=move |e| new_ip.set(event_target_value(&e))
                    />
                    <input
                        type="text"
                        class=INPUT
                        placeholder="description"
                        prop:value=move || new_description.get()
                        on:input=move |e| new_description.set(event_target_value(&e))
                    />
                    <button
                        class="btn-secondary flex items-center gap-2 whitespace-nowrap disabled:opacity-50"
                        disabled=move || new_ip.with(|ip| ip.trim().is_empty())
                        on:click=add_device
                    >
                        <PlusIcon />
                        "Add device"
                    </button>
                </div>

                <div class="bg-theme-surface rounded-xl border border-theme-border overflow-hidden">
                    <table class="w-full">
                        <thead class="bg-theme-bg">
                            <tr class="text-left text-xs text-theme-secondary uppercase tracking-wide">
                                <th class=HEADER_CELL>"IP"</th>
                                <th class=HEADER_CELL>"Description"</th>
                                <th class=HEADER_CELL>"Rack"</th>
                                <th class=HEADER_CELL>"Room"</th>
                                <th class=HEADER_CELL>"Status"</th>
                                <th class=format!("{} text-right", HEADER_CELL)>"Actions"</th>
                            </tr>
                        </thead>
                        <tbody class="divide-y divide-theme-border" on:click=on_click>
                            {move || devices.with(|d| {
                                d.iter()
                                    .enumerate()
                                    .map(|(index, device)| device_row(index + 1, device))
                                    .collect_view()
                            })}
                        </tbody>
                    </table>

                    <Show when=move || loading.get()>
                        <div class="p-8 text-center text-theme-secondary">"Loading devices..."</div>
                    </Show>
                    <Show when=move || !loading.get() && devices.with(|d| d.is_empty())>
                        <div class="p-8 text-center text-theme-secondary">
                            "No devices yet. Use \"Create all devices\" to add one per host address."
                        </div>
                    </Show>
                </div>
            </div>

            <DeviceEditModal form=editing session=session />
        </div>
    }
}
