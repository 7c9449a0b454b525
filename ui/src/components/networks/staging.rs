use leptos::*;

use super::{CELL, HEADER_CELL, INPUT};
use crate::components::common::{clicked_action, input_target, reload_page, SendIcon, TrashIcon};
use crate::staging::{Field, RowAction, RowState, StagedRow, StagingTable};
use crate::state::{Session, SubmitOutcome};

/// Networks typed in but not yet sent. Hidden while empty.
#[component]
pub fn StagingTableView() -> impl IntoView {
    let session = store_value(expect_context::<Session>());
    let (staging, pending) = session.with_value(|s| (s.staging, s.pending));

    let on_click = move |ev: ev::MouseEvent| {
        let Some((action, position)) = clicked_action(&ev) else {
            return;
        };
        match action {
            RowAction::Send => {
                let session = session.get_value();
                spawn_local(async move {
                    if session.submit_one(position).await == SubmitOutcome::Busy {
                        tracing::debug!(position, "send ignored while sending all");
                    }
                });
            }
            RowAction::Remove => session.with_value(|s| s.remove_row(position)),
            _ => {}
        }
    };

    let on_input = move |ev: ev::Event| {
        let Some((position, field, value)) = input_target(&ev) else {
            return;
        };
        if let Ok(field) = field.parse::<Field>() {
            session.with_value(|s| s.set_field(position, field, value));
        }
    };

    let send_all = move |_| {
        let session = session.get_value();
        spawn_local(async move {
            if session.submit_all().await.reload {
                reload_page();
            }
        });
    };

    view! {
        <Show when=move || staging.with(|t| !t.is_empty())>
            <div class="mb-6 bg-theme-surface rounded-xl border border-theme-border overflow-hidden">
                <div class="flex items-center justify-between px-4 py-3 border-b border-theme-border">
                    <h2 class="text-sm font-semibold text-theme">"New networks"</h2>
                    <Show when=move || staging.with(|t| t.shows_bulk_actions())>
                        <div class="flex items-center gap-2">
                            <button
                                class="btn-secondary text-sm disabled:opacity-50"
                                disabled=move || pending.get()
                                on:click=move |_| session.with_value(|s| s.remove_all())
                            >
                                "Remove all"
                            </button>
                            <button
                                class="btn-primary text-sm disabled:opacity-50"
                                disabled=move || pending.get()
                                on:click=send_all
                            >
                                {move || if pending.get() { "Sending..." } else { "Send all" }}
                            </button>
                        </div>
                    </Show>
                </div>
                <table class="w-full">
                    <thead class="bg-theme-bg">
                        <tr class="text-left text-xs text-theme-secondary uppercase tracking-wide">
                            <th class=HEADER_CELL>"#"</th>
                            <th class=HEADER_CELL>"Network"</th>
                            <th class=HEADER_CELL>"VLAN"</th>
                            <th class=HEADER_CELL>"Description"</th>
                            <th class=HEADER_CELL></th>
                            <th class=format!("{} text-right", HEADER_CELL)>"Actions"</th>
                        </tr>
                    </thead>
                    <tbody class="divide-y divide-theme-border" on:click=on_click on:input=on_input>
                        // Keyed on position too, so renumbered rows re-render with fresh data-row values
                        <For
                            each=move || staging.with(|t| t.rows().to_vec())
                            key=|row| (row.id, row.position)
                            children=move |row| staged_row(staging, pending, row)
                        />
                    </tbody>
                </table>
            </div>
        </Show>
    }
}

fn staged_row(staging: RwSignal<StagingTable>, pending: RwSignal<bool>, row: StagedRow) -> impl IntoView {
    let id = row.id;
    let position = row.position.to_string();
    let state = move || {
        staging
            .with(|t| t.row_by_id(id).map(|r| r.state.clone()))
            .unwrap_or_default()
    };

    let inputs = Field::ALL
        .iter()
        .map(|field| {
            view! {
                <td class=CELL>
                    <input
                        type="text"
                        class=INPUT
                        placeholder=field.as_str()
                        data-row=position.clone()
                        data-field=field.as_str()
                        value=row.fields.get(*field).to_string()
                    />
                </td>
            }
        })
        .collect_view();

    view! {
        <tr>
            <td class=format!("{} text-theme-muted", CELL)>{row.position}</td>
            {inputs}
            <td class=format!("{} text-xs", CELL)>
                {move || match state() {
                    RowState::Pending => None,
                    RowState::Submitting => Some(view! {
                        <span class="text-theme-muted">"Sending..."</span>
                    }.into_view()),
                    RowState::Failed(message) => Some(view! {
                        <span class="text-red-400" title=message.clone()>{message}</span>
                    }.into_view()),
                }}
            </td>
            <td class=format!("{} text-right whitespace-nowrap", CELL)>
                <button
                    class="btn-ghost p-1.5 disabled:opacity-50"
                    title="Send"
                    data-action=RowAction::SEND
                    data-row=position.clone()
                    disabled=move || pending.get() || state() == RowState::Submitting
                >
                    <SendIcon />
                </button>
                <button
                    class="btn-ghost p-1.5 text-red-400"
                    title="Remove"
                    data-action=RowAction::REMOVE
                    data-row=position
                >
                    <TrashIcon />
                </button>
            </td>
        </tr>
    }
}
