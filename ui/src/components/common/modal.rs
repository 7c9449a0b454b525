use leptos::*;

/// Centered dialog with a title bar and a close button
#[component]
pub fn Modal(
    #[prop(into)] title: String,
    #[prop(into)] on_close: Callback<()>,
    children: Children,
) -> impl IntoView {
    view! {
        <div class="fixed inset-0 bg-black/50 backdrop-blur-sm flex items-center justify-center z-50">
            <div class="bg-theme-surface rounded-xl w-[450px] shadow-xl border border-theme-border">
                <div class="flex items-center justify-between p-4 border-b border-theme-border">
                    <h2 class="text-lg font-semibold text-theme">{title}</h2>
                    <button
                        class="p-1.5 hover:bg-theme-surface-hover rounded-lg text-theme-secondary hover:text-theme transition-colors"
                        on:click=move |_| on_close.call(())
                    >
                        "✕"
                    </button>
                </div>
                {children()}
            </div>
        </div>
    }
}
