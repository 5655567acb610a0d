//! Leptos entry point for placing widgets in a view tree.

use leptos::*;

/// Renders `<tag>` with the given attributes and light-DOM children, then upgrades it
/// into its widget once mounted. The widget is detached when the owner is cleaned up.
#[component]
pub fn WidgetElement(
    /// Registered custom element name, e.g. `y-button`.
    #[prop(into)]
    tag: String,
    /// Initial attributes.
    #[prop(optional)]
    attrs: Vec<(&'static str, String)>,
    /// Light-DOM content distributed into the widget's slots.
    #[prop(optional)]
    children: Option<Children>,
) -> impl IntoView {
    let node_ref = create_node_ref::<html::Custom>();
    let mut element = html::custom(html::Custom::new(tag)).node_ref(node_ref);
    for (name, value) in attrs {
        element = element.attr(name, value);
    }
    if let Some(children) = children {
        element = element.child(children());
    }
    bind(node_ref);
    element
}

/// Upgrades the mounted element and releases it on cleanup.
#[cfg(target_arch = "wasm32")]
fn bind(node_ref: NodeRef<html::Custom>) {
    use crate::define::{release, upgrade};

    create_effect(move |_| {
        if let Some(mounted) = node_ref.get() {
            let dom: &web_sys::Element = &mounted;
            if let Err(err) = upgrade(dom) {
                logging::warn!("{err}");
            }
        }
    });
    on_cleanup(move || {
        if let Some(mounted) = node_ref.get_untracked() {
            let dom: &web_sys::Element = &mounted;
            release(dom);
        }
    });
}

/// Native builds render markup only; there is no element to upgrade.
#[cfg(not(target_arch = "wasm32"))]
fn bind(_node_ref: NodeRef<html::Custom>) {}
