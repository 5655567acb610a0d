//! In-memory host for driving widgets without a browser.
//!
//! [`HeadlessHost`] keeps a registry of known elements (ids, rectangles, parents), an
//! ambient listener table, a virtual clock for timers and an explicit frame queue.
//! [`mount`] wires a widget instance to a recording [`HeadlessSurface`] so tests can
//! assert on emitted events, host styles, reflected attributes and form entries.

use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    ops::Deref,
    rc::{Rc, Weak},
};

use crate::{
    attributes::AttributeMap,
    events::{self, WidgetEvent},
    host::{
        AnchorRef, Callback, ElementKey, EventSink, ListenTarget, Rect, Subscription, Viewport,
        WidgetHost,
    },
    lifecycle::{Dispatcher, Surface, Widget, WidgetInstance},
    tree::{DomEvent, EventKind, Patch, View},
};

#[derive(Debug, Clone, Default)]
struct ElementInfo {
    id: Option<String>,
    tag: Option<String>,
    attributes: BTreeMap<String, String>,
    rect: Rect,
    parent: Option<ElementKey>,
    transition_ms: u32,
}

struct ListenerEntry {
    id: u64,
    target: ListenTarget,
    kind: EventKind,
    capture: bool,
    sink: EventSink,
}

struct Timer {
    id: u64,
    due: u64,
    callback: Callback,
}

#[derive(Default)]
struct Inner {
    next_id: Cell<u64>,
    now: Cell<u64>,
    viewport: Cell<Option<Viewport>>,
    elements: RefCell<BTreeMap<ElementKey, ElementInfo>>,
    listeners: RefCell<Vec<ListenerEntry>>,
    timers: RefCell<Vec<Timer>>,
    frames: RefCell<Vec<(u64, Callback)>>,
    navigations: RefCell<Vec<(String, bool)>>,
    location: RefCell<String>,
    submits: RefCell<Vec<ElementKey>>,
}

impl Inner {
    fn next_id(&self) -> u64 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }
}

#[derive(Clone, Default)]
/// Deterministic in-memory [`WidgetHost`].
pub struct HeadlessHost {
    inner: Rc<Inner>,
}

impl HeadlessHost {
    /// Empty host with a 1024×768 viewport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle usable as `Rc<dyn WidgetHost>`.
    pub fn handle(&self) -> Rc<dyn WidgetHost> {
        Rc::new(self.clone())
    }

    /// Registers an element and returns its key.
    pub fn add_element(&self, id: Option<&str>, rect: Rect) -> ElementKey {
        let key = ElementKey(self.inner.next_id());
        self.inner.elements.borrow_mut().insert(
            key,
            ElementInfo {
                id: id.map(str::to_string),
                rect,
                ..ElementInfo::default()
            },
        );
        key
    }

    /// Unregisters an element.
    pub fn remove_element(&self, key: ElementKey) {
        self.inner.elements.borrow_mut().remove(&key);
    }

    /// Moves or resizes an element.
    pub fn set_rect(&self, key: ElementKey, rect: Rect) {
        if let Some(info) = self.inner.elements.borrow_mut().get_mut(&key) {
            info.rect = rect;
        }
    }

    /// Nests `child` inside `parent` for composed-path construction.
    pub fn set_parent(&self, child: ElementKey, parent: ElementKey) {
        if let Some(info) = self.inner.elements.borrow_mut().get_mut(&child) {
            info.parent = Some(parent);
        }
    }

    /// Records the tag name of `key`, used by [`WidgetHost::closest`].
    pub fn set_tag(&self, key: ElementKey, tag: &str) {
        if let Some(info) = self.inner.elements.borrow_mut().get_mut(&key) {
            info.tag = Some(tag.to_string());
        }
    }

    /// Sets (`Some`) or removes (`None`) an attribute on a known element.
    pub fn set_element_attribute(&self, key: ElementKey, name: &str, value: Option<&str>) {
        if let Some(info) = self.inner.elements.borrow_mut().get_mut(&key) {
            match value {
                Some(value) => {
                    info.attributes.insert(name.to_string(), value.to_string());
                }
                None => {
                    info.attributes.remove(name);
                }
            }
        }
    }

    /// Sets the computed transition duration reported for `key`.
    pub fn set_transition_ms(&self, key: ElementKey, duration_ms: u32) {
        if let Some(info) = self.inner.elements.borrow_mut().get_mut(&key) {
            info.transition_ms = duration_ms;
        }
    }

    /// Replaces the viewport size without firing `resize`.
    pub fn set_viewport(&self, width: f64, height: f64) {
        self.inner.viewport.set(Some(Viewport { width, height }));
    }

    /// Composed path from `key` outwards.
    pub fn path_of(&self, key: ElementKey) -> Vec<ElementKey> {
        let elements = self.inner.elements.borrow();
        let mut path = vec![key];
        let mut current = elements.get(&key).and_then(|info| info.parent);
        while let Some(parent) = current {
            if path.contains(&parent) {
                break;
            }
            path.push(parent);
            current = elements.get(&parent).and_then(|info| info.parent);
        }
        path
    }

    /// Virtual time in milliseconds.
    pub fn now(&self) -> u64 {
        self.inner.now.get()
    }

    /// Advances the virtual clock, firing due timers in due order.
    pub fn advance(&self, delay_ms: u64) {
        let deadline = self.inner.now.get() + delay_ms;
        loop {
            let next = {
                let mut timers = self.inner.timers.borrow_mut();
                let index = timers
                    .iter()
                    .enumerate()
                    .filter(|(_, timer)| timer.due <= deadline)
                    .min_by_key(|(_, timer)| (timer.due, timer.id))
                    .map(|(index, _)| index);
                index.map(|index| timers.remove(index))
            };
            let Some(timer) = next else {
                break;
            };
            self.inner.now.set(timer.due.max(self.inner.now.get()));
            (timer.callback)();
        }
        self.inner.now.set(deadline);
    }

    /// Runs every frame callback queued so far; returns how many ran. Callbacks queued
    /// while flushing wait for the next flush.
    pub fn flush_frames(&self) -> usize {
        let frames = std::mem::take(&mut *self.inner.frames.borrow_mut());
        let count = frames.len();
        for (_, callback) in frames {
            callback();
        }
        count
    }

    /// Pending timer count.
    pub fn pending_timers(&self) -> usize {
        self.inner.timers.borrow().len()
    }

    /// Pending frame callback count.
    pub fn pending_frames(&self) -> usize {
        self.inner.frames.borrow().len()
    }

    /// Registered ambient listeners of `kind` on `target`.
    pub fn listener_count(&self, target: ListenTarget, kind: EventKind) -> usize {
        self.inner
            .listeners
            .borrow()
            .iter()
            .filter(|entry| entry.target == target && entry.kind == kind)
            .count()
    }

    /// Every registered ambient listener.
    pub fn total_listeners(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Delivers `event` to listeners of `kind` on `target`, capture listeners first.
    pub fn fire(&self, target: ListenTarget, kind: EventKind, event: &DomEvent) {
        let sinks: Vec<EventSink> = {
            let listeners = self.inner.listeners.borrow();
            let matching = listeners
                .iter()
                .filter(|entry| entry.target == target && entry.kind == kind);
            let (capture, bubble): (Vec<_>, Vec<_>) = matching.partition(|entry| entry.capture);
            capture
                .into_iter()
                .chain(bubble)
                .map(|entry| Rc::clone(&entry.sink))
                .collect()
        };
        for sink in sinks {
            sink(event);
        }
    }

    /// Fires `kind` at `key`: element listeners along the composed path, then the
    /// document and window.
    pub fn dispatch_at(&self, key: ElementKey, kind: EventKind, event: DomEvent) {
        let path = self.path_of(key);
        let event = event.with_path(path.clone());
        for element in &path {
            self.fire(ListenTarget::Element(*element), kind, &event);
            if !kind.bubbles() {
                return;
            }
        }
        self.fire(ListenTarget::Document, kind, &event);
        self.fire(ListenTarget::Window, kind, &event);
    }

    /// Clicks a registered element.
    pub fn click(&self, key: ElementKey) {
        self.dispatch_at(key, EventKind::Click, DomEvent::default());
    }

    /// Clicks the document outside every registered element.
    pub fn click_outside(&self) {
        let event = DomEvent::default();
        self.fire(ListenTarget::Document, EventKind::Click, &event);
        self.fire(ListenTarget::Window, EventKind::Click, &event);
    }

    /// Presses a key with focus on the document body.
    pub fn press_key(&self, key: &str) {
        let event = DomEvent::key(key);
        self.fire(ListenTarget::Document, EventKind::KeyDown, &event);
        self.fire(ListenTarget::Window, EventKind::KeyDown, &event);
    }

    /// Moves the pointer (document-level `pointermove`).
    pub fn pointer_move(&self, client_x: f64, client_y: f64) {
        let event = DomEvent::pointer(client_x, client_y);
        self.fire(ListenTarget::Document, EventKind::PointerMove, &event);
    }

    /// Releases the pointer (document-level `pointerup`).
    pub fn pointer_up(&self, client_x: f64, client_y: f64) {
        let event = DomEvent::pointer(client_x, client_y);
        self.fire(ListenTarget::Document, EventKind::PointerUp, &event);
    }

    /// Scrolls the window.
    pub fn scroll(&self) {
        self.fire(ListenTarget::Window, EventKind::Scroll, &DomEvent::default());
    }

    /// Resizes the viewport and fires `resize`.
    pub fn resize(&self, width: f64, height: f64) {
        self.set_viewport(width, height);
        self.fire(ListenTarget::Window, EventKind::Resize, &DomEvent::default());
    }

    /// Navigations requested so far, with their history flag.
    pub fn navigations(&self) -> Vec<(String, bool)> {
        self.inner.navigations.borrow().clone()
    }

    /// Form submissions requested so far.
    pub fn form_submits(&self) -> Vec<ElementKey> {
        self.inner.submits.borrow().clone()
    }
}

impl WidgetHost for HeadlessHost {
    fn listen(
        &self,
        target: ListenTarget,
        kind: EventKind,
        capture: bool,
        sink: EventSink,
    ) -> Subscription {
        let id = self.inner.next_id();
        self.inner.listeners.borrow_mut().push(ListenerEntry {
            id,
            target,
            kind,
            capture,
            sink,
        });
        let inner = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = inner.upgrade() {
                inner.listeners.borrow_mut().retain(|entry| entry.id != id);
            }
        })
    }

    fn set_timeout(&self, delay_ms: u32, callback: Callback) -> Subscription {
        let id = self.inner.next_id();
        let due = self.inner.now.get() + u64::from(delay_ms);
        self.inner
            .timers
            .borrow_mut()
            .push(Timer { id, due, callback });
        let inner = Rc::downgrade(&self.inner);
        Subscription::new(move || release_timer(&inner, id))
    }

    fn request_frame(&self, callback: Callback) -> Subscription {
        let id = self.inner.next_id();
        self.inner.frames.borrow_mut().push((id, callback));
        let inner = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = inner.upgrade() {
                inner.frames.borrow_mut().retain(|(frame, _)| *frame != id);
            }
        })
    }

    fn viewport(&self) -> Viewport {
        self.inner.viewport.get().unwrap_or_default()
    }

    fn element_rect(&self, key: ElementKey) -> Option<Rect> {
        self.inner.elements.borrow().get(&key).map(|info| info.rect)
    }

    fn resolve_anchor(&self, _scope: ElementKey, id: &str) -> Option<AnchorRef> {
        self.inner
            .elements
            .borrow()
            .iter()
            .find(|(_, info)| info.id.as_deref() == Some(id))
            .map(|(key, _)| AnchorRef {
                key: *key,
                id: Some(id.to_string()),
            })
    }

    fn transition_duration_ms(&self, key: ElementKey, _selector: &str) -> u32 {
        self.inner
            .elements
            .borrow()
            .get(&key)
            .map_or(0, |info| info.transition_ms)
    }

    fn navigate(&self, href: &str, push_history: bool) {
        self.inner
            .navigations
            .borrow_mut()
            .push((href.to_string(), push_history));
        *self.inner.location.borrow_mut() = href.to_string();
        if push_history {
            self.fire(
                ListenTarget::Window,
                EventKind::Custom(events::POPSTATE),
                &DomEvent::default(),
            );
        }
    }

    fn request_form_submit(&self, key: ElementKey) {
        self.inner.submits.borrow_mut().push(key);
    }

    fn location_path(&self) -> String {
        let location = self.inner.location.borrow();
        if location.is_empty() {
            "/".to_string()
        } else {
            location.clone()
        }
    }

    fn closest(&self, key: ElementKey, tag: &str) -> Option<ElementKey> {
        let elements = self.inner.elements.borrow();
        self.path_of(key)
            .into_iter()
            .skip(1)
            .find(|ancestor| {
                elements
                    .get(ancestor)
                    .is_some_and(|info| info.tag.as_deref() == Some(tag))
            })
    }

    fn element_attribute(&self, key: ElementKey, name: &str) -> Option<String> {
        self.inner
            .elements
            .borrow()
            .get(&key)
            .and_then(|info| info.attributes.get(name).cloned())
    }
}

fn release_timer(inner: &Weak<Inner>, id: u64) {
    let Some(inner) = inner.upgrade() else {
        return;
    };
    // Dropping the callback may release further subscriptions; do it after the borrow.
    let removed = {
        let mut timers = inner.timers.borrow_mut();
        timers
            .iter()
            .position(|timer| timer.id == id)
            .map(|index| timers.remove(index))
    };
    drop(removed);
}

#[derive(Debug, Default)]
/// Everything a [`HeadlessSurface`] observed.
pub struct SurfaceLog {
    /// Emitted custom events in order.
    pub events: Vec<WidgetEvent>,
    /// Focus requests in order.
    pub focused: Vec<String>,
    /// Host attributes as reflected by the widget.
    pub reflected: BTreeMap<String, Option<String>>,
    /// Inline styles on the host element.
    pub host_styles: BTreeMap<String, String>,
    /// Current form entry.
    pub form_entry: Option<(String, String)>,
    /// Full renders applied.
    pub mounts: usize,
    /// Patch batches applied.
    pub patches: usize,
}

/// Recording [`Surface`]. Reflected attributes are mirrored onto the host element
/// and built-in events are dispatched along its composed path.
pub struct HeadlessSurface {
    log: Rc<RefCell<SurfaceLog>>,
    host: HeadlessHost,
    key: ElementKey,
}

impl HeadlessSurface {
    /// Surface for the element `key` of `host`, writing into `log`.
    pub fn new(log: Rc<RefCell<SurfaceLog>>, host: &HeadlessHost, key: ElementKey) -> Self {
        Self {
            log,
            host: host.clone(),
            key,
        }
    }
}

impl<Msg> Surface<Msg> for HeadlessSurface {
    fn mount(&mut self, _view: &View<Msg>, _dispatcher: &Dispatcher<Msg>) {
        self.log.borrow_mut().mounts += 1;
    }

    fn patch(&mut self, _patches: &[Patch]) {
        self.log.borrow_mut().patches += 1;
    }

    fn reflect_attribute(&mut self, name: &str, value: Option<&str>) {
        self.host.set_element_attribute(self.key, name, value);
        self.log
            .borrow_mut()
            .reflected
            .insert(name.to_string(), value.map(str::to_string));
    }

    fn set_host_style(&mut self, property: &str, value: Option<&str>) {
        let mut log = self.log.borrow_mut();
        match value {
            Some(value) => {
                log.host_styles
                    .insert(property.to_string(), value.to_string());
            }
            None => {
                log.host_styles.remove(property);
            }
        }
    }

    fn emit(&mut self, event: &WidgetEvent) {
        self.log.borrow_mut().events.push(event.clone());
        if let Some(kind) = events::event_kind(&event.name) {
            self.host
                .dispatch_at(self.key, kind, DomEvent::detail(event.detail.clone()));
        }
    }

    fn focus(&mut self, selector: &str) {
        self.log.borrow_mut().focused.push(selector.to_string());
    }

    fn form_entry_changed(&mut self, entry: Option<(&str, &str)>) {
        self.log.borrow_mut().form_entry =
            entry.map(|(name, value)| (name.to_string(), value.to_string()));
    }
}

/// Widget instance mounted on a [`HeadlessHost`].
pub struct Mounted<W: Widget> {
    instance: WidgetInstance<W>,
    host: HeadlessHost,
    log: Rc<RefCell<SurfaceLog>>,
}

impl<W: Widget> Deref for Mounted<W> {
    type Target = WidgetInstance<W>;

    fn deref(&self) -> &Self::Target {
        &self.instance
    }
}

impl<W: Widget> Mounted<W> {
    /// Constructs an unattached instance registered as an element of `host`.
    pub fn build(host: &HeadlessHost, attrs: &[(&str, &str)]) -> Self {
        let id = attrs
            .iter()
            .find(|(name, _)| *name == "id")
            .map(|(_, value)| *value);
        let key = host.add_element(id, Rect::default());
        host.set_tag(key, W::TAG);
        for (name, value) in attrs {
            host.set_element_attribute(key, name, Some(value));
        }
        let log = Rc::new(RefCell::new(SurfaceLog::default()));
        let instance = WidgetInstance::new(
            host.handle(),
            key,
            Box::new(HeadlessSurface::new(Rc::clone(&log), host, key)),
            AttributeMap::from_pairs(attrs.iter().copied()),
        );
        Self {
            instance,
            host: host.clone(),
            log,
        }
    }

    /// Underlying instance.
    pub fn instance(&self) -> &WidgetInstance<W> {
        &self.instance
    }

    /// Recorded surface output.
    pub fn log(&self) -> std::cell::Ref<'_, SurfaceLog> {
        self.log.borrow()
    }

    /// Emitted events named `name`.
    pub fn events_named(&self, name: &str) -> Vec<WidgetEvent> {
        self.log
            .borrow()
            .events
            .iter()
            .filter(|event| event.name == name)
            .cloned()
            .collect()
    }

    /// Forgets recorded events.
    pub fn clear_events(&self) {
        self.log.borrow_mut().events.clear();
    }

    /// Clicks the first rendered element matching `selector`; the click then reaches
    /// document listeners with this host on its composed path.
    pub fn click(&self, selector: &str) {
        self.fire(selector, EventKind::Click, DomEvent::default());
    }

    /// Presses `key` on the first rendered element matching `selector`.
    pub fn key_down(&self, selector: &str, key: &str) {
        self.fire(selector, EventKind::KeyDown, DomEvent::key(key));
    }

    /// Fires `kind` inside the rendering root, then along the host path unless a
    /// listener stopped it.
    pub fn fire(&self, selector: &str, kind: EventKind, event: DomEvent) {
        let path = self.host.path_of(self.instance.key());
        let event = event.with_path(path);
        let stopped = self
            .instance
            .with_view(|view| view.stops_propagation(selector, kind));
        self.instance.dispatch_dom(selector, kind, &event);
        if kind.bubbles() && !stopped {
            self.host
                .dispatch_at(self.instance.key(), kind, DomEvent { path: Vec::new(), ..event });
        }
    }
}

/// Builds and attaches `W` with `attrs`.
pub fn mount<W: Widget>(host: &HeadlessHost, attrs: &[(&str, &str)]) -> Mounted<W> {
    let mounted = Mounted::build(host, attrs);
    mounted.attach();
    mounted
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn timers_fire_in_due_order_and_cancel() {
        let host = HeadlessHost::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        let first = Rc::clone(&order);
        let second = Rc::clone(&order);
        let _late = host.set_timeout(300, Box::new(move || first.borrow_mut().push(300)));
        let _early = host.set_timeout(100, Box::new(move || second.borrow_mut().push(100)));
        let cancelled = host.set_timeout(200, Box::new(|| panic!("cancelled timer fired")));
        cancelled.cancel();

        host.advance(250);
        assert_eq!(*order.borrow(), vec![100]);
        host.advance(100);
        assert_eq!(*order.borrow(), vec![100, 300]);
        assert_eq!(host.now(), 350);
        assert_eq!(host.pending_timers(), 0);
    }

    #[test]
    fn listeners_are_removed_with_their_subscription() {
        let host = HeadlessHost::new();
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let subscription = host.listen(
            ListenTarget::Document,
            EventKind::Click,
            false,
            Rc::new(move |_| counter.set(counter.get() + 1)),
        );
        host.click_outside();
        assert_eq!(hits.get(), 1);
        drop(subscription);
        host.click_outside();
        assert_eq!(hits.get(), 1);
        assert_eq!(host.total_listeners(), 0);
    }

    #[test]
    fn click_path_includes_ancestors() {
        let host = HeadlessHost::new();
        let outer = host.add_element(Some("outer"), Rect::default());
        let inner = host.add_element(None, Rect::default());
        host.set_parent(inner, outer);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _subscription = host.listen(
            ListenTarget::Document,
            EventKind::Click,
            false,
            Rc::new(move |event: &DomEvent| sink.borrow_mut().push(event.path.clone())),
        );
        host.click(inner);
        assert_eq!(*seen.borrow(), vec![vec![inner, outer]]);
        assert_eq!(
            host.resolve_anchor(inner, "outer").map(|anchor| anchor.key),
            Some(outer)
        );
    }

    #[test]
    fn frames_run_once_per_flush() {
        let host = HeadlessHost::new();
        let ran = Rc::new(Cell::new(false));
        let flag = Rc::clone(&ran);
        let _frame = host.request_frame(Box::new(move || flag.set(true)));
        assert_eq!(host.pending_frames(), 1);
        assert_eq!(host.flush_frames(), 1);
        assert!(ran.get());
        assert_eq!(host.flush_frames(), 0);
    }

    #[test]
    fn closest_walks_tagged_ancestors() {
        let host = HeadlessHost::new();
        let bar = host.add_element(None, Rect::default());
        let outer = host.add_element(None, Rect::default());
        let inner = host.add_element(None, Rect::default());
        host.set_tag(bar, "y-panelbar");
        host.set_tag(outer, "y-panel");
        host.set_tag(inner, "y-panel");
        host.set_parent(outer, bar);
        host.set_parent(inner, outer);

        assert_eq!(host.closest(inner, "y-panel"), Some(outer));
        assert_eq!(host.closest(outer, "y-panel"), None);
        assert_eq!(host.closest(inner, "y-panelbar"), Some(bar));

        host.set_element_attribute(bar, "exclusive", Some(""));
        assert_eq!(host.element_attribute(bar, "exclusive").as_deref(), Some(""));
    }

    #[test]
    fn pushed_navigation_updates_location_and_fires_popstate() {
        let host = HeadlessHost::new();
        let pops = Rc::new(Cell::new(0));
        let counter = Rc::clone(&pops);
        let _subscription = host.listen(
            ListenTarget::Window,
            EventKind::Custom(events::POPSTATE),
            false,
            Rc::new(move |_| counter.set(counter.get() + 1)),
        );
        assert_eq!(host.location_path(), "/");
        host.navigate("/docs", true);
        host.navigate("/about", false);
        assert_eq!(host.location_path(), "/about");
        assert_eq!(pops.get(), 1);
    }
}
