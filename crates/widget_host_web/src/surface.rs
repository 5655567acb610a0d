//! Shadow-root rendering of widget views.

use serde::Serialize;
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{
    CustomEvent, CustomEventInit, Document, Element, Event, HtmlElement, HtmlInputElement,
    ShadowRoot,
};
use widget_contract::{Dispatcher, EventKind, Node, Patch, PatchOp, Surface, View, WidgetEvent};
use widget_kit::icon::SVG_NS;

use crate::{browser::web_host, define, error::HostError};

const FORM_ENTRY_MARKER: &str = "data-widget-form";

/// Renders into an open shadow root and mirrors host-level state onto the custom element.
pub(crate) struct ShadowSurface {
    host: HtmlElement,
    root: ShadowRoot,
    listeners: Vec<Closure<dyn FnMut(Event)>>,
    form_input: Option<HtmlInputElement>,
}

impl ShadowSurface {
    pub(crate) fn new(host: HtmlElement, root: ShadowRoot) -> Self {
        Self {
            host,
            root,
            listeners: Vec::new(),
            form_input: None,
        }
    }

    fn document(&self) -> Option<Document> {
        self.host.owner_document()
    }
}

/// Whether a light-DOM child is the hidden form input a surface manages.
pub(crate) fn is_form_entry(element: &Element) -> bool {
    element.has_attribute(FORM_ENTRY_MARKER)
}

fn build<Msg: Clone + 'static>(
    document: &Document,
    node: &Node<Msg>,
    parent: &web_sys::Node,
    in_svg: bool,
    dispatcher: &Dispatcher<Msg>,
    listeners: &mut Vec<Closure<dyn FnMut(Event)>>,
) -> Result<(), HostError> {
    let element = match node {
        Node::Text(content) => {
            let text = document.create_text_node(content);
            parent
                .append_child(&text)
                .map_err(|err| HostError::dom("appendChild", err))?;
            return Ok(());
        }
        Node::Element(element) => element,
    };
    let svg = in_svg || element.tag() == "svg";
    let created = if svg {
        document.create_element_ns(Some(SVG_NS), element.tag())
    } else {
        document.create_element(element.tag())
    }
    .map_err(|err| HostError::dom("createElement", err))?;

    for (name, value) in element.attributes() {
        created
            .set_attribute(name, value)
            .map_err(|err| HostError::dom("setAttribute", err))?;
    }
    if !element.classes().is_empty() {
        created
            .set_attribute("class", &element.classes().join(" "))
            .map_err(|err| HostError::dom("setAttribute", err))?;
    }
    let style = element.style_text();
    if !style.is_empty() {
        created
            .set_attribute("style", &style)
            .map_err(|err| HostError::dom("setAttribute", err))?;
    }

    for listener in element.listeners() {
        let kind = listener.kind();
        let listener = listener.clone();
        let dispatcher = dispatcher.clone();
        let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            if listener.stops_propagation() {
                event.stop_propagation();
            }
            let snapshot = web_host().dom_event(&event);
            if let Some(msg) = listener.handle(&snapshot) {
                if kind == EventKind::KeyDown {
                    event.prevent_default();
                }
                dispatcher.send(msg);
            }
        });
        created
            .add_event_listener_with_callback(kind.token(), closure.as_ref().unchecked_ref())
            .map_err(|err| HostError::dom("addEventListener", err))?;
        listeners.push(closure);
    }

    for child in element.child_nodes() {
        build(document, child, &created, svg, dispatcher, listeners)?;
    }
    parent
        .append_child(&created)
        .map_err(|err| HostError::dom("appendChild", err))?;
    if let (Some(input), Some(value)) = (
        created.dyn_ref::<HtmlInputElement>(),
        element.attribute("value"),
    ) {
        input.set_value(value);
    }
    Ok(())
}

fn apply(target: &Element, op: &PatchOp) -> Result<(), HostError> {
    match op {
        PatchOp::SetAttribute { name, value } => {
            target
                .set_attribute(name, value)
                .map_err(|err| HostError::dom("setAttribute", err))?;
            if name == "value" {
                if let Some(input) = target.dyn_ref::<HtmlInputElement>() {
                    input.set_value(value);
                }
            }
        }
        PatchOp::RemoveAttribute { name } => target
            .remove_attribute(name)
            .map_err(|err| HostError::dom("removeAttribute", err))?,
        PatchOp::SetStyle { property, value } => {
            let Some(element) = target.dyn_ref::<HtmlElement>() else {
                return Ok(());
            };
            let style = element.style();
            if value.is_empty() {
                style
                    .remove_property(property)
                    .map_err(|err| HostError::dom("style.removeProperty", err))?;
            } else {
                style
                    .set_property(property, value)
                    .map_err(|err| HostError::dom("style.setProperty", err))?;
            }
        }
        PatchOp::SetClass { class, enabled } => {
            target
                .class_list()
                .toggle_with_force(class, *enabled)
                .map_err(|err| HostError::dom("classList.toggle", err))?;
        }
        PatchOp::SetText(content) => target.set_text_content(Some(content)),
    }
    Ok(())
}

impl<Msg: Clone + 'static> Surface<Msg> for ShadowSurface {
    fn mount(&mut self, view: &View<Msg>, dispatcher: &Dispatcher<Msg>) {
        define::release_within(&self.root);
        self.listeners.clear();
        self.root.set_inner_html("");
        let Some(document) = self.document() else {
            leptos::logging::warn!("{}", HostError::NoDocument);
            return;
        };
        for css in view.styles() {
            match document.create_element("style") {
                Ok(style) => {
                    style.set_text_content(Some(css));
                    let _ = self.root.append_child(&style);
                }
                Err(err) => leptos::logging::warn!("{}", HostError::dom("createElement", err)),
            }
        }
        for node in view.nodes() {
            if let Err(err) = build(
                &document,
                node,
                &self.root,
                false,
                dispatcher,
                &mut self.listeners,
            ) {
                leptos::logging::warn!("render of <{}> failed: {err}", self.host.tag_name());
            }
        }
        define::upgrade_within(&self.root);
    }

    fn patch(&mut self, patches: &[Patch]) {
        for patch in patches {
            let targets = match self.root.query_selector_all(&patch.selector) {
                Ok(targets) => targets,
                Err(err) => {
                    leptos::logging::debug_warn!("bad patch selector {}: {err:?}", patch.selector);
                    continue;
                }
            };
            for index in 0..targets.length() {
                let Some(target) = targets
                    .item(index)
                    .and_then(|node| node.dyn_into::<Element>().ok())
                else {
                    continue;
                };
                if let Err(err) = apply(&target, &patch.op) {
                    leptos::logging::warn!("{err}");
                }
            }
        }
    }

    fn reflect_attribute(&mut self, name: &str, value: Option<&str>) {
        let result = match value {
            Some(value) => self.host.set_attribute(name, value),
            None => self.host.remove_attribute(name),
        };
        if let Err(err) = result {
            leptos::logging::warn!("{}", HostError::dom("reflect attribute", err));
        }
    }

    fn set_host_style(&mut self, property: &str, value: Option<&str>) {
        let style = self.host.style();
        let result = match value {
            Some(value) => style.set_property(property, value),
            None => style.remove_property(property).map(drop),
        };
        if let Err(err) = result {
            leptos::logging::warn!("{}", HostError::dom("host style", err));
        }
    }

    fn emit(&mut self, event: &WidgetEvent) {
        let detail = event
            .detail
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .unwrap_or(wasm_bindgen::JsValue::NULL);
        let init = CustomEventInit::new();
        init.set_bubbles(event.bubbles);
        init.set_composed(event.composed);
        init.set_detail(&detail);
        match CustomEvent::new_with_event_init_dict(&event.name, &init) {
            Ok(custom) => {
                let _ = self.host.dispatch_event(&custom);
            }
            Err(err) => leptos::logging::warn!("{}", HostError::dom("new CustomEvent", err)),
        }
    }

    fn focus(&mut self, selector: &str) {
        let target = self
            .root
            .query_selector(selector)
            .ok()
            .flatten()
            .and_then(|element| element.dyn_into::<HtmlElement>().ok());
        if let Some(target) = target {
            let _ = target.focus();
        }
    }

    fn form_entry_changed(&mut self, entry: Option<(&str, &str)>) {
        let Some((name, value)) = entry else {
            if let Some(input) = self.form_input.take() {
                input.remove();
            }
            return;
        };
        if self.form_input.is_none() {
            let created = self
                .document()
                .and_then(|document| document.create_element("input").ok())
                .and_then(|element| element.dyn_into::<HtmlInputElement>().ok());
            let Some(input) = created else {
                leptos::logging::warn!("{}", HostError::NoDocument);
                return;
            };
            input.set_type("hidden");
            let _ = input.set_attribute(FORM_ENTRY_MARKER, "");
            if let Err(err) = self.host.append_child(&input) {
                leptos::logging::warn!("{}", HostError::dom("appendChild", err));
                return;
            }
            self.form_input = Some(input);
        }
        if let Some(input) = &self.form_input {
            input.set_name(name);
            input.set_value(value);
        }
    }
}
