//! IPAM UI Entry Point
//!
//! Initializes logging and mounts the Leptos app to the DOM.

use ipam_ui::App;
use leptos::*;
use tracing_wasm::WASMLayerConfigBuilder;

fn main() {
    let config = WASMLayerConfigBuilder::default()
        .set_max_level(tracing::Level::DEBUG)
        .build();
    tracing_wasm::set_as_global_default_with_config(config);

    tracing::info!("Starting IPAM UI");

    mount_to_body(|| view! { <App /> });
}
