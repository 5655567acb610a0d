//! Widget gallery: every registered widget mounted inside a theme scope.

mod web_app;

pub use web_app::{Gallery, SiteApp, SECTIONS};

#[cfg(all(feature = "csr", target_arch = "wasm32"))]
pub fn mount() {
    console_error_panic_hook::set_once();
    if let Err(err) = widget_host_web::define_widgets() {
        leptos::logging::warn!("widget definition failed: {err}");
    }
    leptos::mount_to_body(|| leptos::view! { <SiteApp /> })
}
