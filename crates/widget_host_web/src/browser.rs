//! [`WidgetHost`] over the live document.

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    rc::Rc,
};

use js_sys::Reflect;
use serde_json::Value;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    CustomEvent, Element, Event, EventTarget, HtmlFormElement, HtmlInputElement,
    HtmlSelectElement, HtmlTextAreaElement, KeyboardEvent, MouseEvent, ShadowRoot,
};
use widget_contract::{
    events, AnchorRef, Callback, DomEvent, ElementKey, EventKind, EventSink, ListenTarget, Rect,
    Subscription, Viewport, WidgetHost,
};

use crate::convert::parse_transition_duration;

const KEY_PROPERTY: &str = "__widgetKey";

thread_local! {
    static HOST: Rc<WebHost> = Rc::new(WebHost::default());
}

/// Shared browser host for this thread.
pub fn web_host() -> Rc<WebHost> {
    HOST.with(Rc::clone)
}

#[derive(Default)]
/// Browser host. Elements become known (and get an [`ElementKey`]) when a widget is
/// upgraded on them or when they are resolved as anchors or ancestors.
pub struct WebHost {
    elements: RefCell<HashMap<ElementKey, Element>>,
    next_key: Cell<u64>,
}

impl WebHost {
    /// Key of `element`, registering it on first sight.
    pub fn key_of(&self, element: &Element) -> ElementKey {
        if let Some(key) = self.known_key(element) {
            return key;
        }
        let key = ElementKey(self.next_key.get() + 1);
        self.next_key.set(key.0);
        let _ = Reflect::set(
            element,
            &JsValue::from_str(KEY_PROPERTY),
            &JsValue::from_f64(key.0 as f64),
        );
        self.elements.borrow_mut().insert(key, element.clone());
        key
    }

    /// Key of an already known event target.
    pub fn known_key(&self, target: &JsValue) -> Option<ElementKey> {
        Reflect::get(target, &JsValue::from_str(KEY_PROPERTY))
            .ok()
            .and_then(|value| value.as_f64())
            .map(|key| ElementKey(key as u64))
    }

    /// Element registered under `key`.
    pub fn element(&self, key: ElementKey) -> Option<Element> {
        self.elements.borrow().get(&key).cloned()
    }

    /// Drops the registration of `key`.
    pub fn forget(&self, key: ElementKey) {
        if let Some(element) = self.elements.borrow_mut().remove(&key) {
            let _ = Reflect::delete_property(&element, &JsValue::from_str(KEY_PROPERTY));
        }
    }

    /// Snapshot of a browser event for widget handlers.
    pub fn dom_event(&self, event: &Event) -> DomEvent {
        let mut snapshot = DomEvent::default();
        if let Some(keyboard) = event.dyn_ref::<KeyboardEvent>() {
            snapshot.key = Some(keyboard.key());
        }
        if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
            snapshot.client_x = f64::from(mouse.client_x());
            snapshot.client_y = f64::from(mouse.client_y());
        }
        if let Some(custom) = event.dyn_ref::<CustomEvent>() {
            snapshot.detail =
                serde_wasm_bindgen::from_value(custom.detail()).unwrap_or(Value::Null);
        }
        snapshot.value = event.target().and_then(|target| control_value(&target));
        snapshot.path = event
            .composed_path()
            .iter()
            .filter_map(|target| self.known_key(&target))
            .collect();
        snapshot
    }

    fn target(&self, target: ListenTarget) -> Option<EventTarget> {
        let window = web_sys::window()?;
        match target {
            ListenTarget::Window => Some(window.into()),
            ListenTarget::Document => window.document().map(Into::into),
            ListenTarget::Element(key) => self.element(key).map(Into::into),
        }
    }
}

fn control_value(target: &EventTarget) -> Option<String> {
    if let Some(input) = target.dyn_ref::<HtmlInputElement>() {
        Some(input.value())
    } else if let Some(select) = target.dyn_ref::<HtmlSelectElement>() {
        Some(select.value())
    } else {
        target.dyn_ref::<HtmlTextAreaElement>().map(HtmlTextAreaElement::value)
    }
}

fn rect_of(element: &Element) -> Rect {
    let rect = element.get_bounding_client_rect();
    Rect::new(rect.x(), rect.y(), rect.width(), rect.height())
}

impl WidgetHost for WebHost {
    fn listen(
        &self,
        target: ListenTarget,
        kind: EventKind,
        capture: bool,
        sink: EventSink,
    ) -> Subscription {
        let Some(event_target) = self.target(target) else {
            leptos::logging::debug_warn!("listen target {target:?} is unavailable");
            return Subscription::inert();
        };
        let host = web_host();
        let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            sink(&host.dom_event(&event));
        });
        if let Err(err) = event_target.add_event_listener_with_callback_and_bool(
            kind.token(),
            closure.as_ref().unchecked_ref(),
            capture,
        ) {
            leptos::logging::warn!("addEventListener({}) failed: {err:?}", kind.token());
            return Subscription::inert();
        }
        Subscription::new(move || {
            let _ = event_target.remove_event_listener_with_callback_and_bool(
                kind.token(),
                closure.as_ref().unchecked_ref(),
                capture,
            );
        })
    }

    fn set_timeout(&self, delay_ms: u32, callback: Callback) -> Subscription {
        let Some(window) = web_sys::window() else {
            return Subscription::inert();
        };
        let function = Closure::once_into_js(move || callback());
        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        match window
            .set_timeout_with_callback_and_timeout_and_arguments_0(function.unchecked_ref(), delay)
        {
            Ok(handle) => Subscription::new(move || window.clear_timeout_with_handle(handle)),
            Err(err) => {
                leptos::logging::warn!("setTimeout failed: {err:?}");
                Subscription::inert()
            }
        }
    }

    fn request_frame(&self, callback: Callback) -> Subscription {
        let Some(window) = web_sys::window() else {
            return Subscription::inert();
        };
        let function = Closure::once_into_js(move || callback());
        match window.request_animation_frame(function.unchecked_ref()) {
            Ok(handle) => Subscription::new(move || {
                let _ = window.cancel_animation_frame(handle);
            }),
            Err(err) => {
                leptos::logging::warn!("requestAnimationFrame failed: {err:?}");
                Subscription::inert()
            }
        }
    }

    fn viewport(&self) -> Viewport {
        let Some(window) = web_sys::window() else {
            return Viewport::default();
        };
        let dimension = |value: Result<JsValue, JsValue>| value.ok().and_then(|v| v.as_f64());
        match (dimension(window.inner_width()), dimension(window.inner_height())) {
            (Some(width), Some(height)) => Viewport { width, height },
            _ => Viewport::default(),
        }
    }

    fn element_rect(&self, key: ElementKey) -> Option<Rect> {
        self.element(key).map(|element| rect_of(&element))
    }

    fn resolve_anchor(&self, scope: ElementKey, id: &str) -> Option<AnchorRef> {
        let scope = self.element(scope)?;
        let root = scope.get_root_node();
        let found = match root.dyn_ref::<ShadowRoot>() {
            Some(shadow) => shadow.get_element_by_id(id),
            None => web_sys::window()?.document()?.get_element_by_id(id),
        }?;
        Some(AnchorRef {
            key: self.key_of(&found),
            id: Some(id.to_string()),
        })
    }

    fn transition_duration_ms(&self, key: ElementKey, selector: &str) -> u32 {
        let Some(host) = self.element(key) else {
            return 0;
        };
        let target = host
            .shadow_root()
            .and_then(|shadow| shadow.query_selector(selector).ok().flatten())
            .unwrap_or(host);
        web_sys::window()
            .and_then(|window| window.get_computed_style(&target).ok().flatten())
            .and_then(|style| style.get_property_value("transition-duration").ok())
            .map_or(0, |raw| parse_transition_duration(&raw))
    }

    fn navigate(&self, href: &str, push_history: bool) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if !push_history {
            if let Err(err) = window.location().replace(href) {
                leptos::logging::warn!("location.replace({href}) failed: {err:?}");
            }
            return;
        }
        let pushed = window
            .history()
            .and_then(|history| history.push_state_with_url(&JsValue::NULL, "", Some(href)));
        if let Err(err) = pushed {
            leptos::logging::warn!("history.pushState({href}) failed: {err:?}");
            return;
        }
        if let Ok(event) = Event::new(events::POPSTATE) {
            let _ = window.dispatch_event(&event);
        }
    }

    fn request_form_submit(&self, key: ElementKey) {
        let form = self
            .element(key)
            .and_then(|element| element.closest("form").ok().flatten())
            .and_then(|form| form.dyn_into::<HtmlFormElement>().ok());
        if let Some(form) = form {
            if let Err(err) = form.request_submit() {
                leptos::logging::warn!("form.requestSubmit failed: {err:?}");
            }
        }
    }

    fn location_path(&self) -> String {
        web_sys::window()
            .and_then(|window| window.location().pathname().ok())
            .unwrap_or_else(|| "/".to_string())
    }

    fn closest(&self, key: ElementKey, tag: &str) -> Option<ElementKey> {
        let mut node = self.element(key)?.parent_node();
        while let Some(current) = node {
            if let Some(shadow) = current.dyn_ref::<ShadowRoot>() {
                node = Some(shadow.host().into());
                continue;
            }
            if let Some(element) = current.dyn_ref::<Element>() {
                if element.tag_name().eq_ignore_ascii_case(tag) {
                    return Some(self.key_of(element));
                }
            }
            node = current.parent_node();
        }
        None
    }

    fn element_attribute(&self, key: ElementKey, name: &str) -> Option<String> {
        self.element(key)?.get_attribute(name)
    }
}
