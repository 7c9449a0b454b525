//! Common/Shared UI Components
//!
//! Icons, the error banner, the modal frame, and the helpers every table
//! uses to decode delegated events.

mod banner;
mod icons;
mod modal;

pub use banner::ErrorBanner;
pub use icons::*;
pub use modal::Modal;

use gloo_timers::future::TimeoutFuture;
use leptos::*;
use wasm_bindgen::JsCast;

use crate::staging::RowAction;

/// Give the last re-render a frame before the page goes away
const RELOAD_DELAY_MS: u32 = 50;

/// The action control a click landed on, if any
///
/// Clicks on a control's icon bubble up to the nearest element carrying
/// `data-action`; that element's `data-action` and `data-row` decide.
pub fn clicked_action(ev: &web_sys::Event) -> Option<(RowAction, usize)> {
    let target = ev.target()?.dyn_into::<web_sys::Element>().ok()?;
    let control = target.closest("[data-action]").ok()??;
    RowAction::parse(
        &control.get_attribute("data-action")?,
        &control.get_attribute("data-row")?,
    )
}

/// `data-row`, `data-field` and value of the input an event came from
pub fn input_target(ev: &web_sys::Event) -> Option<(usize, String, String)> {
    let input = ev.target()?.dyn_into::<web_sys::HtmlInputElement>().ok()?;
    let position = input.get_attribute("data-row")?.parse().ok()?;
    let field = input.get_attribute("data-field")?;
    Some((position, field, input.value()))
}

/// Reload the whole page
pub fn reload_page() {
    spawn_local(async {
        TimeoutFuture::new(RELOAD_DELAY_MS).await;
        let reloaded = web_sys::window()
            .map(|window| window.location().reload())
            .unwrap_or(Ok(()));
        if let Err(e) = reloaded {
            tracing::warn!("page reload failed: {:?}", e);
        }
    });
}

/// Ask the user to confirm a destructive action
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message(message).ok())
        .unwrap_or(false)
}
