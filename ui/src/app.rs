//! Root Application Component
//!
//! This module contains the main App component that sets up:
//! - Backend discovery through the console's `/api/info`
//! - The shared client and page session contexts
//! - Routing

use std::rc::Rc;

use leptos::*;
use leptos_meta::*;
use leptos_router::*;

use crate::client::{HttpClient, SharedClient};
use crate::components::devices::DevicesPage;
use crate::components::networks::NetworksPage;
use crate::state::Session;

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    // Pick the route layout before anything talks to the backend
    let client = create_local_resource(|| (), |_| HttpClient::discover());

    view! {
        <Title text="IPAM" />
        <Suspense fallback=|| view! {
            <div class="p-8 text-center text-theme-secondary">"Connecting..."</div>
        }>
            {move || client.get().map(|client| view! { <Shell client=Rc::new(client) /> })}
        </Suspense>
    }
}

#[component]
fn Shell(client: SharedClient) -> impl IntoView {
    provide_context(client.clone());
    provide_context(Session::new(client));

    view! {
        <Router>
            <main class="min-h-screen bg-theme-bg">
                <Routes>
                    <Route path="/" view=NetworksPage />
                    <Route path="/devices/:network_id" view=DevicesPage />
                    <Route path="/*any" view=|| view! { <Redirect path="/" /> } />
                </Routes>
            </main>
        </Router>
    }
}
