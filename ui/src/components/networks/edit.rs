use ipam_shared::Network;
use leptos::*;

use super::INPUT;
use crate::components::common::Modal;
use crate::staging::Field;
use crate::state::{EditOutcome, NetworkForm, Session};

/// Prefix one bit longer than the network's own, as a starting point
fn suggested_prefix(cidr: &str) -> String {
    cidr.rsplit_once('/')
        .and_then(|(_, prefix)| prefix.trim().parse::<u8>().ok())
        .and_then(|prefix| prefix.checked_add(1))
        .map(|prefix| prefix.to_string())
        .unwrap_or_default()
}

/// Edit modal for a confirmed network, open while `form` is `Some`
#[component]
pub fn NetworkEditModal(form: RwSignal<Option<NetworkForm>>) -> impl IntoView {
    let session = store_value(expect_context::<Session>());
    let (saving, set_saving) = create_signal(false);
    let (error, set_error) = create_signal(Option::<String>::None);

    let close = Callback::new(move |_| {
        form.set(None);
        set_error.set(None);
    });

    let value = move |field: Field| {
        form.with(|f| f.as_ref().map(|f| f.current.get(field).to_string()))
            .unwrap_or_default()
    };
    let set = move |field: Field, value: String| {
        form.update(|f| {
            if let Some(f) = f {
                f.set(field, value);
            }
        })
    };
    let change_network = move || form.with(|f| f.as_ref().is_some_and(|f| f.change_network));

    let save = move |_| {
        let Some(current) = form.get_untracked() else {
            return;
        };
        set_saving.set(true);
        set_error.set(None);

        spawn_local(async move {
            match session.get_value().save_network(&current).await {
                EditOutcome::Saved | EditOutcome::Unchanged => form.set(None),
                EditOutcome::Failed(e) => set_error.set(Some(e.to_string())),
            }
            set_saving.set(false);
        });
    };

    view! {
        <Show when=move || form.with(Option::is_some)>
            <Modal title="Edit network" on_close=close>
                <div class="p-4 space-y-4">
                    <div class="space-y-1">
                        <label class="flex items-center gap-2 text-sm text-theme-secondary">
                            <input
                                type="checkbox"
                                prop:checked=change_network
                                on:change=move |e| {
                                    let checked = event_target_checked(&e);
                                    form.update(|f| {
                                        if let Some(f) = f {
                                            f.change_network = checked;
                                        }
                                    });
                                }
                            />
                            "Change network"
                        </label>
                        <input
                            type="text"
                            class=INPUT
                            prop:value=move || value(Field::Network)
                            prop:disabled=move || !change_network()
                            on:input=move |e| set(Field::Network, event_target_value(&e))
                        />
                    </div>

                    <div class="space-y-1">
                        <label class="text-sm text-theme-secondary">"VLAN"</label>
                        <input
                            type="text"
                            class=INPUT
                            prop:value=move || value(Field::Vlan)
                            on:input=move |e| set(Field::Vlan, event_target_value(&e))
                        />
                    </div>

                    <div class="space-y-1">
                        <label class="text-sm text-theme-secondary">"Description"</label>
                        <input
                            type="text"
                            class=INPUT
                            prop:value=move || value(Field::Description)
                            on:input=move |e| set(Field::Description, event_target_value(&e))
                        />
                    </div>

                    {move || error.get().map(|e| view! {
                        <div class="p-3 bg-red-500/10 border border-red-500/30 rounded-lg text-red-400 text-sm">
                            {e}
                        </div>
                    })}
                </div>

                <div class="p-4 border-t border-theme-border flex justify-end gap-3">
                    <button class="btn-secondary" on:click=move |_| close.call(())>
                        "Cancel"
                    </button>
                    <button
                        class="btn-primary disabled:opacity-50"
                        disabled=move || saving.get()
                        on:click=save
                    >
                        {move || if saving.get() { "Saving..." } else { "Save" }}
                    </button>
                </div>
            </Modal>
        </Show>
    }
}

/// Subnet split modal, open while `target` is `Some`
#[component]
pub fn SplitModal(target: RwSignal<Option<Network>>) -> impl IntoView {
    let session = store_value(expect_context::<Session>());
    let (prefix, set_prefix) = create_signal(String::new());
    let (saving, set_saving) = create_signal(false);
    let (error, set_error) = create_signal(Option::<String>::None);

    create_effect(move |_| {
        if let Some(network) = target.get() {
            set_prefix.set(suggested_prefix(&network.network));
        }
    });

    let close = Callback::new(move |_| {
        target.set(None);
        set_error.set(None);
    });

    let title = move || {
        target
            .with(|t| t.as_ref().map(|n| format!("Split {}", n.network)))
            .unwrap_or_default()
    };

    let split = move |_| {
        let Some(id) = target.with_untracked(|t| t.as_ref().map(|n| n.id)) else {
            return;
        };
        let prefix = match prefix.get_untracked().trim().parse::<u8>() {
            Ok(prefix) => prefix,
            Err(_) => {
                set_error.set(Some("Prefix must be a number".to_string()));
                return;
            }
        };
        set_saving.set(true);
        set_error.set(None);

        spawn_local(async move {
            match session.get_value().split_subnet(id, prefix).await {
                Ok(_) => target.set(None),
                Err(e) => set_error.set(Some(e.to_string())),
            }
            set_saving.set(false);
        });
    };

    view! {
        <Show when=move || target.with(Option::is_some)>
            <Modal title=title() on_close=close>
                <div class="p-4 space-y-4">
                    <div class="space-y-1">
                        <label class="text-sm text-theme-secondary">"Subnet prefix length"</label>
                        <input
                            type="number"
                            class=INPUT
                            prop:value=move || prefix.get()
                            on:input=move |e| set_prefix.set(event_target_value(&e))
                        />
                    </div>

                    {move || error.get().map(|e| view! {
                        <div class="p-3 bg-red-500/10 border border-red-500/30 rounded-lg text-red-400 text-sm">
                            {e}
                        </div>
                    })}
                </div>

                <div class="p-4 border-t border-theme-border flex justify-end gap-3">
                    <button class="btn-secondary" on:click=move |_| close.call(())>
                        "Cancel"
                    </button>
                    <button
                        class="btn-primary disabled:opacity-50"
                        disabled=move || saving.get()
                        on:click=split
                    >
                        {move || if saving.get() { "Splitting..." } else { "Split" }}
                    </button>
                </div>
            </Modal>
        </Show>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggested_prefix() {
        assert_eq!(suggested_prefix("10.0.0.0/24"), "25");
        assert_eq!(suggested_prefix("2001:db8::/48"), "49");
        assert_eq!(suggested_prefix("10.0.0.0"), "");
    }
}
