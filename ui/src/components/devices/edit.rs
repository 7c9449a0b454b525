use leptos::*;

use crate::components::common::Modal;
use crate::components::networks::INPUT;
use crate::state::{DeviceField, DeviceForm, DeviceSession, EditOutcome};

#[component]
pub fn DeviceEditModal(
    form: RwSignal<Option<DeviceForm>>,
    session: StoredValue<DeviceSession>,
) -> impl IntoView {
    let (saving, set_saving) = create_signal(false);
    let (error, set_error) = create_signal(Option::<String>::None);

    let close = Callback::new(move |_| {
        form.set(None);
        set_error.set(None);
    });

    let title = move || {
        form.with(|f| f.as_ref().map(|f| format!("Edit {}", f.key.ip)))
            .unwrap_or_default()
    };

    let save = move |_| {
        let Some(current) = form.get_untracked() else {
            return;
        };
        set_saving.set(true);
        set_error.set(None);

        spawn_local(async move {
            match session.get_value().save_device(&current).await {
                EditOutcome::Saved | EditOutcome::Unchanged => form.set(None),
                EditOutcome::Failed(e) => set_error.set(Some(e.to_string())),
            }
            set_saving.set(false);
        });
    };

    let fields = move || {
        DeviceField::ALL
            .iter()
            .map(|field| {
                let field = *field;
                let label = match field {
                    DeviceField::Description => "Description",
                    DeviceField::Rack => "Rack",
                    DeviceField::Room => "Room",
                };
                view! {
                    <div class="space-y-1">
                        <label class="text-sm text-theme-secondary">{label}</label>
                        <input
                            type="text"
                            class=INPUT
                            placeholder=field.as_str()
                            prop:value=move || {
                                form.with(|f| f.as_ref().map(|f| f.current.get(field).to_string()))
                                    .unwrap_or_default()
                            }
                            on:input=move |e| {
                                let value = event_target_value(&e);
                                form.update(|f| {
                                    if let Some(f) = f {
                                        f.set(field, value);
                                    }
                                });
                            }
                        />
                    </div>
                }
            })
            .collect_view()
    };

    view! {
        <Show when=move || form.with(Option::is_some)>
            <Modal title=title() on_close=close>
                <div class="p-4 space-y-4">
                    {fields()}

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
