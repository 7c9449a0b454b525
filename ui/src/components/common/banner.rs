use leptos::*;

/// Dismissable error message, hidden while `error` is `None`
#[component]
pub fn ErrorBanner(error: RwSignal<Option<String>>) -> impl IntoView {
    move || {
        error.get().map(|message| {
            view! {
                <div class="mb-4 p-3 flex items-center justify-between bg-red-500/10 border border-red-500/30 rounded-lg text-red-400 text-sm">
                    <span>{message}</span>
                    <button class="ml-4 hover:text-red-300" on:click=move |_| error.set(None)>
                        "✕"
                    </button>
                </div>
            }
        })
    }
}
