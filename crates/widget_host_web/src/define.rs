//! Element upgrades: binds registered custom elements in the document to widget
//! instances and keeps their attributes and slots in sync.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use js_sys::Array;
use serde_json::Value;
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{
    Element, Event, HtmlElement, MutationObserver, MutationObserverInit, MutationRecord, NodeList,
    ShadowRoot, ShadowRootInit, ShadowRootMode,
};
use widget_contract::{
    AnyWidget, AssignedNode, AttributeMap, ElementKey, SlotAssignments, Widget, WidgetHost,
    WidgetInstance, WidgetVisitor,
};
use widget_kit::{is_registered, visit_tag, TAGS};

use crate::{
    browser::web_host,
    convert::group_slots,
    error::HostError,
    surface::{is_form_entry, ShadowSurface},
    theme_fetch::FetchThemeSource,
};

/// Host-managed attributes that never reach widget state.
const UNFORWARDED: &[&str] = &["class", "style"];

type MutationCallback = Closure<dyn FnMut(Array, MutationObserver)>;

struct Upgraded {
    widget: Rc<dyn AnyWidget>,
    observer: MutationObserver,
    _on_mutation: MutationCallback,
    root: ShadowRoot,
    on_slotchange: Closure<dyn FnMut(Event)>,
}

thread_local! {
    static UPGRADED: RefCell<HashMap<ElementKey, Upgraded>> = RefCell::new(HashMap::new());
    static DOCUMENT_OBSERVER: RefCell<Option<(MutationObserver, MutationCallback)>> =
        const { RefCell::new(None) };
}

struct Construct {
    host: Rc<dyn WidgetHost>,
    key: ElementKey,
    surface: ShadowSurface,
    attrs: AttributeMap,
}

impl WidgetVisitor for Construct {
    type Output = Rc<dyn AnyWidget>;

    fn visit<W: Widget>(self) -> Self::Output {
        Rc::new(WidgetInstance::<W>::new(
            self.host,
            self.key,
            Box::new(self.surface),
            self.attrs,
        ))
    }
}

fn widget_of(key: ElementKey) -> Option<Rc<dyn AnyWidget>> {
    UPGRADED.with(|upgraded| upgraded.borrow().get(&key).map(|entry| Rc::clone(&entry.widget)))
}

fn attributes_of(element: &Element) -> AttributeMap {
    let names = element.get_attribute_names();
    AttributeMap::from_pairs(names.iter().filter_map(|name| {
        let name = name.as_string()?;
        if UNFORWARDED.contains(&name.as_str()) {
            return None;
        }
        let value = element.get_attribute(&name)?;
        Some((name, value))
    }))
}

/// Light-DOM children grouped by slot. Comments and the hidden form input are skipped.
fn slots_of(element: &Element) -> SlotAssignments {
    let children = element.child_nodes();
    group_slots((0..children.length()).filter_map(|index| {
        let child = children.item(index)?;
        if let Some(child) = child.dyn_ref::<Element>() {
            if is_form_entry(child) {
                return None;
            }
            let slot = child.get_attribute("slot").unwrap_or_default();
            let tag = child.tag_name().to_ascii_lowercase();
            return Some((slot, AssignedNode::Element { tag }));
        }
        (child.node_type() == web_sys::Node::TEXT_NODE)
            .then(|| (String::new(), AssignedNode::Text(child.text_content().unwrap_or_default())))
    }))
}

fn forward_attribute(key: ElementKey, name: &str) {
    if UNFORWARDED.contains(&name) {
        return;
    }
    let (Some(widget), Some(element)) = (widget_of(key), web_host().element(key)) else {
        return;
    };
    match element.get_attribute(name) {
        Some(value) => widget.set_attribute(name, &value),
        None => widget.remove_attribute(name),
    }
}

fn forward_slots(key: ElementKey) {
    if let (Some(widget), Some(element)) = (widget_of(key), web_host().element(key)) {
        widget.assign_slots(slots_of(&element));
    }
}

/// Binds `element` to the widget registered for its tag. Upgrading an element twice
/// is a no-op.
pub fn upgrade(element: &Element) -> Result<ElementKey, HostError> {
    let tag = element.tag_name().to_ascii_lowercase();
    if !is_registered(&tag) {
        return Err(HostError::Unregistered(tag));
    }
    let host = web_host();
    let key = host.key_of(element);
    if widget_of(key).is_some() {
        return Ok(key);
    }
    let html = element
        .clone()
        .dyn_into::<HtmlElement>()
        .map_err(|_| HostError::Unregistered(tag.clone()))?;
    let root = match element.shadow_root() {
        Some(root) => root,
        None => element
            .attach_shadow(&ShadowRootInit::new(ShadowRootMode::Open))
            .map_err(|err| HostError::ShadowRoot {
                tag: tag.clone(),
                reason: format!("{err:?}"),
            })?,
    };

    let construct = Construct {
        host: host.clone(),
        key,
        surface: ShadowSurface::new(html, root.clone()),
        attrs: attributes_of(element),
    };
    let widget = visit_tag(&tag, construct)?;
    widget.assign_slots(slots_of(element));

    let on_mutation: MutationCallback = Closure::new(move |records: Array, _: MutationObserver| {
        for record in records.iter() {
            let record: MutationRecord = record.unchecked_into();
            match record.attribute_name() {
                Some(name) => forward_attribute(key, &name),
                None => forward_slots(key),
            }
        }
    });
    let observer = MutationObserver::new(on_mutation.as_ref().unchecked_ref())
        .map_err(|err| HostError::dom("new MutationObserver", err))?;
    let init = MutationObserverInit::new();
    init.set_attributes(true);
    init.set_child_list(true);
    observer
        .observe_with_options(element, &init)
        .map_err(|err| HostError::dom("MutationObserver.observe", err))?;

    let on_slotchange = Closure::<dyn FnMut(Event)>::new(move |_: Event| forward_slots(key));
    root.add_event_listener_with_callback("slotchange", on_slotchange.as_ref().unchecked_ref())
        .map_err(|err| HostError::dom("addEventListener", err))?;

    UPGRADED.with(|upgraded| {
        upgraded.borrow_mut().insert(
            key,
            Upgraded {
                widget: Rc::clone(&widget),
                observer,
                _on_mutation: on_mutation,
                root,
                on_slotchange,
            },
        )
    });
    widget.attach();
    Ok(key)
}

/// Detaches the widget bound to `element` and every widget rendered inside it.
pub fn release(element: &Element) {
    let host = web_host();
    let Some(key) = host.known_key(element) else {
        return;
    };
    let Some(entry) = UPGRADED.with(|upgraded| upgraded.borrow_mut().remove(&key)) else {
        return;
    };
    entry.observer.disconnect();
    if let Err(err) = entry.root.remove_event_listener_with_callback(
        "slotchange",
        entry.on_slotchange.as_ref().unchecked_ref(),
    ) {
        leptos::logging::warn!("{}", HostError::dom("removeEventListener", err));
    }
    entry.widget.detach();
    release_within(&entry.root);
    host.forget(key);
}

/// Calls the programmatic method `method` on the widget bound to `element`.
pub fn invoke(element: &Element, method: &str, args: &Value) -> Result<(), HostError> {
    let widget = web_host()
        .known_key(element)
        .and_then(widget_of)
        .ok_or_else(|| HostError::NotUpgraded(element.tag_name().to_ascii_lowercase()))?;
    widget.invoke(method, args)?;
    Ok(())
}

/// Runs `f` over every element of `list`.
fn each_element(list: NodeList, mut f: impl FnMut(&Element)) {
    for index in 0..list.length() {
        if let Some(element) = list.item(index).and_then(|node| node.dyn_into::<Element>().ok()) {
            f(&element);
        }
    }
}

fn upgrade_logged(element: &Element) {
    if let Err(err) = upgrade(element) {
        leptos::logging::warn!("upgrade of <{}> failed: {err}", element.tag_name());
    }
}

fn registered_selector() -> String {
    TAGS.join(",")
}

/// Upgrades every registered element rendered inside `root`.
pub(crate) fn upgrade_within(root: &ShadowRoot) {
    if let Ok(list) = root.query_selector_all(&registered_selector()) {
        each_element(list, upgrade_logged);
    }
}

/// Releases every registered element rendered inside `root`.
pub(crate) fn release_within(root: &ShadowRoot) {
    if let Ok(list) = root.query_selector_all(&registered_selector()) {
        each_element(list, release);
    }
}

fn on_document_mutation(records: Array, _: MutationObserver) {
    let selector = registered_selector();
    for record in records.iter() {
        let record: MutationRecord = record.unchecked_into();
        let added = record.added_nodes();
        for index in 0..added.length() {
            let Some(element) = added.item(index).and_then(|node| node.dyn_into::<Element>().ok())
            else {
                continue;
            };
            if is_registered(&element.tag_name()) {
                upgrade_logged(&element);
            }
            if let Ok(list) = element.query_selector_all(&selector) {
                each_element(list, upgrade_logged);
            }
        }
        let removed = record.removed_nodes();
        for index in 0..removed.length() {
            let Some(element) = removed
                .item(index)
                .and_then(|node| node.dyn_into::<Element>().ok())
            else {
                continue;
            };
            if element.is_connected() {
                continue;
            }
            if let Ok(list) = element.query_selector_all(&selector) {
                each_element(list, release);
            }
            release(&element);
        }
    }
}

/// Installs the fetch theme source, upgrades every registered element already in
/// the document and watches the document for elements added or removed later.
pub fn define_widgets() -> Result<(), HostError> {
    if cfg!(not(target_arch = "wasm32")) {
        return Err(HostError::NoDocument);
    }
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or(HostError::NoDocument)?;
    widget_theme::install_theme_source(Rc::new(FetchThemeSource));

    let installed = DOCUMENT_OBSERVER.with(|slot| slot.borrow().is_some());
    if !installed {
        let callback: MutationCallback = Closure::new(on_document_mutation);
        let observer = MutationObserver::new(callback.as_ref().unchecked_ref())
            .map_err(|err| HostError::dom("new MutationObserver", err))?;
        let init = MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(true);
        observer
            .observe_with_options(&document, &init)
            .map_err(|err| HostError::dom("MutationObserver.observe", err))?;
        DOCUMENT_OBSERVER.with(|slot| *slot.borrow_mut() = Some((observer, callback)));
    }

    let list = document
        .query_selector_all(&registered_selector())
        .map_err(|err| HostError::dom("querySelectorAll", err))?;
    each_element(list, upgrade_logged);
    leptos::logging::log!("widgets defined: {} tags", TAGS.len());
    Ok(())
}
