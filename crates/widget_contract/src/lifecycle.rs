//! Widget life-cycle contract and the instance state machine.
//!
//! An instance moves `unattached → attached → (attribute change → rendered)* →
//! detached`. Attribute writes, messages and slot changes are processed one at a time;
//! anything arriving while an item is in flight is queued and handled afterwards in
//! arrival order. Within one item, attribute changes made by the widget itself are
//! delivered to [`Widget::attribute_changed`] in mutation order, each guarded by an
//! old == new check.

use std::{
    cell::{Cell, RefCell},
    collections::{BTreeMap, VecDeque},
    fmt,
    rc::{Rc, Weak},
};

use serde_json::Value;

use crate::{
    attributes::AttributeMap,
    error::WidgetError,
    events::WidgetEvent,
    host::{AnchorRef, ElementKey, ListenTarget, Subscription, WidgetHost},
    slots::SlotAssignments,
    tree::{DomEvent, EventKind, Patch, View},
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// What a widget needs redrawn after handling an input.
pub enum Update {
    /// Nothing visible changed.
    #[default]
    None,
    /// Patch the existing tree in place (keeps in-progress interaction state).
    Patch(Vec<Patch>),
    /// Rebuild the rendering root.
    Render,
}

impl Update {
    /// Combines two updates; a full render absorbs patches.
    pub fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::Render, _) | (_, Self::Render) => Self::Render,
            (Self::Patch(mut first), Self::Patch(second)) => {
                first.extend(second);
                Self::Patch(first)
            }
            (Self::Patch(patches), Self::None) | (Self::None, Self::Patch(patches)) => {
                Self::Patch(patches)
            }
            (Self::None, Self::None) => Self::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Life-cycle phase of an instance.
pub enum Phase {
    /// Constructed, not yet in a document.
    Unattached,
    /// Connected and rendered.
    Attached,
    /// Removed from its document; every attach-time registration released.
    Detached,
}

/// Read-only inputs of [`Widget::render`].
pub struct RenderContext<'a> {
    /// Current attributes.
    pub attrs: &'a AttributeMap,
    /// Current slot assignments.
    pub slots: &'a SlotAssignments,
    /// Host identity of the instance.
    pub key: ElementKey,
}

/// Behavior of one widget type.
///
/// The attribute map is the source of truth; widget structs hold only derived state
/// that attributes cannot express (sort state, drag state, live subscriptions).
pub trait Widget: Sized + 'static {
    /// Messages produced by the widget's own listeners and programmatic methods.
    type Msg: Clone + fmt::Debug + 'static;

    /// Custom element tag.
    const TAG: &'static str;

    /// Attributes whose changes reach [`Widget::attribute_changed`].
    const OBSERVED: &'static [&'static str];

    /// Values applied on attach for omitted attributes.
    const DEFAULTS: &'static [(&'static str, &'static str)] = &[];

    /// Fresh widget state.
    fn create() -> Self;

    /// Runs after defaults are applied and before the first render.
    fn attached(&mut self, _cx: &mut Context<'_, Self>) {}

    /// Reacts to a changed observed attribute.
    fn attribute_changed(
        &mut self,
        _cx: &mut Context<'_, Self>,
        _name: &str,
        _old: Option<&str>,
        _new: Option<&str>,
    ) -> Update {
        Update::Render
    }

    /// Handles a message.
    fn update(&mut self, cx: &mut Context<'_, Self>, msg: Self::Msg) -> Update;

    /// Builds the rendering root's content from attributes and derived state.
    fn render(&self, cx: &RenderContext<'_>) -> View<Self::Msg>;

    /// Reacts to new slot assignments.
    fn slots_changed(&mut self, _cx: &mut Context<'_, Self>) -> Update {
        Update::Render
    }

    /// Releases show/hide-scoped registrations and timers.
    fn detached(&mut self, _cx: &mut Context<'_, Self>) {}

    /// Value contributed to form submission under the `name` attribute.
    fn form_value(&self, _attrs: &AttributeMap) -> Option<String> {
        None
    }

    /// Maps a programmatic method call to a message; `None` for unknown methods.
    fn method(_name: &str, _args: &Value) -> Option<Result<Self::Msg, String>> {
        None
    }
}

/// Cloneable message sender bound to one instance. Sends after the instance is
/// dropped are ignored.
pub struct Dispatcher<Msg> {
    send: Rc<dyn Fn(Msg)>,
}

impl<Msg> Clone for Dispatcher<Msg> {
    fn clone(&self) -> Self {
        Self {
            send: Rc::clone(&self.send),
        }
    }
}

impl<Msg> Dispatcher<Msg> {
    /// Dispatcher calling `send` for every message.
    pub fn new(send: impl Fn(Msg) + 'static) -> Self {
        Self {
            send: Rc::new(send),
        }
    }

    /// Delivers `msg`.
    pub fn send(&self, msg: Msg) {
        (self.send)(msg);
    }
}

impl<Msg> fmt::Debug for Dispatcher<Msg> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Dispatcher")
    }
}

/// Materializes an instance's output: rendering root, host element reflection,
/// emitted events and form participation.
pub trait Surface<Msg> {
    /// Replaces the rendering root's content with `view`.
    fn mount(&mut self, view: &View<Msg>, dispatcher: &Dispatcher<Msg>);
    /// Applies patches to the mounted content.
    fn patch(&mut self, patches: &[Patch]);
    /// Mirrors an attribute write made by the widget onto the host element.
    fn reflect_attribute(&mut self, name: &str, value: Option<&str>);
    /// Sets (`Some`) or removes (`None`) an inline style property on the host element.
    fn set_host_style(&mut self, property: &str, value: Option<&str>);
    /// Dispatches a custom event from the host element.
    fn emit(&mut self, event: &WidgetEvent);
    /// Focuses the first element matching `selector` in the rendering root.
    fn focus(&mut self, selector: &str);
    /// Publishes the form entry (`name`, `value`), or withdraws it.
    fn form_entry_changed(&mut self, entry: Option<(&str, &str)>);
}

enum Effect {
    Reflect(String, Option<String>),
    HostStyle(String, Option<String>),
    Emit(WidgetEvent),
    Focus(String),
}

struct Change {
    name: String,
    old: Option<String>,
    new: Option<String>,
}

/// Mutable view of an instance handed to widget callbacks.
pub struct Context<'a, W: Widget> {
    attrs: &'a mut AttributeMap,
    slots: &'a SlotAssignments,
    changes: &'a mut VecDeque<Change>,
    effects: &'a mut Vec<Effect>,
    retained: &'a mut Vec<Subscription>,
    host: &'a Rc<dyn WidgetHost>,
    dispatcher: &'a Dispatcher<W::Msg>,
    key: ElementKey,
}

impl<'a, W: Widget> Context<'a, W> {
    /// Current attributes.
    pub fn attrs(&self) -> &AttributeMap {
        self.attrs
    }

    /// Attribute value.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attrs.get(name)
    }

    /// Boolean attribute presence.
    pub fn has(&self, name: &str) -> bool {
        self.attrs.has(name)
    }

    /// Current slot assignments.
    pub fn slots(&self) -> &SlotAssignments {
        self.slots
    }

    /// Host identity of this instance.
    pub fn key(&self) -> ElementKey {
        self.key
    }

    /// Host services.
    pub fn host(&self) -> &dyn WidgetHost {
        self.host.as_ref()
    }

    /// Sender for this instance's messages.
    pub fn dispatcher(&self) -> Dispatcher<W::Msg> {
        self.dispatcher.clone()
    }

    /// Writes an attribute; observed changes are delivered after the current callback.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        self.write(name, Some(value.into()));
    }

    /// Removes an attribute.
    pub fn remove_attribute(&mut self, name: &str) {
        self.write(name, None);
    }

    /// Sets or removes a boolean attribute.
    pub fn set_flag(&mut self, name: &str, enabled: bool) {
        if enabled {
            self.set_attribute(name, "");
        } else {
            self.remove_attribute(name);
        }
    }

    fn write(&mut self, name: &str, value: Option<String>) {
        let old = self.attrs.get(name).map(str::to_string);
        if old == value {
            return;
        }
        match &value {
            Some(value) => self.attrs.set(name, value.clone()),
            None => self.attrs.remove(name),
        };
        self.effects
            .push(Effect::Reflect(name.to_string(), value.clone()));
        if is_observed::<W>(name) {
            self.changes.push_back(Change {
                name: name.to_string(),
                old,
                new: value,
            });
        }
    }

    /// Emits a custom event from the host element.
    pub fn emit(&mut self, event: WidgetEvent) {
        self.effects.push(Effect::Emit(event));
    }

    /// Focuses an element of the rendering root after the current update is applied.
    pub fn focus(&mut self, selector: &str) {
        self.effects.push(Effect::Focus(selector.to_string()));
    }

    /// Sets an inline style property on the host element.
    pub fn set_host_style(&mut self, property: &str, value: impl Into<String>) {
        self.effects
            .push(Effect::HostStyle(property.to_string(), Some(value.into())));
    }

    /// Removes an inline style property from the host element.
    pub fn remove_host_style(&mut self, property: &str) {
        self.effects
            .push(Effect::HostStyle(property.to_string(), None));
    }

    /// Registers an ambient listener whose events are mapped to messages.
    pub fn listen(
        &self,
        target: ListenTarget,
        kind: EventKind,
        capture: bool,
        map: impl Fn(&DomEvent) -> Option<W::Msg> + 'static,
    ) -> Subscription {
        let dispatcher = self.dispatcher.clone();
        self.host.listen(
            target,
            kind,
            capture,
            Rc::new(move |event: &DomEvent| {
                if let Some(msg) = map(event) {
                    dispatcher.send(msg);
                }
            }),
        )
    }

    /// Sends `msg` after `delay_ms`.
    pub fn timeout(&self, delay_ms: u32, msg: W::Msg) -> Subscription {
        let dispatcher = self.dispatcher.clone();
        self.host
            .set_timeout(delay_ms, Box::new(move || dispatcher.send(msg)))
    }

    /// Sends `msg` before the next paint.
    pub fn next_frame(&self, msg: W::Msg) -> Subscription {
        let dispatcher = self.dispatcher.clone();
        self.host
            .request_frame(Box::new(move || dispatcher.send(msg)))
    }

    /// Keeps `subscription` alive until the instance detaches.
    pub fn retain(&mut self, subscription: Subscription) {
        self.retained.push(subscription);
    }

    /// Resolves `id` in this instance's root. Missing anchors are skipped silently.
    pub fn resolve_anchor(&self, id: &str) -> Option<AnchorRef> {
        let anchor = self.host.resolve_anchor(self.key, id);
        if anchor.is_none() {
            leptos::logging::debug_warn!("{} anchor `{id}` was not found", W::TAG);
        }
        anchor
    }
}

fn is_observed<W: Widget>(name: &str) -> bool {
    W::OBSERVED.iter().any(|observed| *observed == name)
}

enum Pending<Msg> {
    Msg(Msg),
    Attribute(String, Option<String>),
    Slots(SlotAssignments),
    Attach,
    Detach,
}

struct State<W: Widget> {
    widget: W,
    attrs: AttributeMap,
    slots: SlotAssignments,
    phase: Phase,
    view: Option<View<W::Msg>>,
    retained: Vec<Subscription>,
    host_styles: BTreeMap<String, String>,
    form_entry: Option<(String, String)>,
}

struct Shared<W: Widget> {
    state: RefCell<State<W>>,
    surface: RefCell<Box<dyn Surface<W::Msg>>>,
    host: Rc<dyn WidgetHost>,
    key: ElementKey,
    dispatcher: Dispatcher<W::Msg>,
    queue: RefCell<VecDeque<Pending<W::Msg>>>,
    busy: Cell<bool>,
}

/// One live widget: state, attributes, rendered tree and surface.
pub struct WidgetInstance<W: Widget> {
    shared: Rc<Shared<W>>,
}

impl<W: Widget> Clone for WidgetInstance<W> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<W: Widget> WidgetInstance<W> {
    /// Constructs an unattached instance with its initial attributes.
    pub fn new(
        host: Rc<dyn WidgetHost>,
        key: ElementKey,
        surface: Box<dyn Surface<W::Msg>>,
        attrs: AttributeMap,
    ) -> Self {
        let shared = Rc::new_cyclic(|weak: &Weak<Shared<W>>| {
            let weak = weak.clone();
            Shared {
                state: RefCell::new(State {
                    widget: W::create(),
                    attrs,
                    slots: SlotAssignments::default(),
                    phase: Phase::Unattached,
                    view: None,
                    retained: Vec::new(),
                    host_styles: BTreeMap::new(),
                    form_entry: None,
                }),
                surface: RefCell::new(surface),
                host,
                key,
                dispatcher: Dispatcher::new(move |msg| {
                    if let Some(shared) = weak.upgrade() {
                        shared.process(Pending::Msg(msg));
                    }
                }),
                queue: RefCell::new(VecDeque::new()),
                busy: Cell::new(false),
            }
        });
        Self { shared }
    }

    /// Host identity.
    pub fn key(&self) -> ElementKey {
        self.shared.key
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.shared.state.borrow().phase
    }

    /// Connects the instance: applies defaults, runs [`Widget::attached`], renders.
    pub fn attach(&self) {
        self.shared.process(Pending::Attach);
    }

    /// Disconnects the instance and releases every attach-time registration.
    pub fn detach(&self) {
        self.shared.process(Pending::Detach);
    }

    /// Delivers a message.
    pub fn send(&self, msg: W::Msg) {
        self.shared.process(Pending::Msg(msg));
    }

    /// Message sender for this instance.
    pub fn dispatcher(&self) -> Dispatcher<W::Msg> {
        self.shared.dispatcher.clone()
    }

    /// Writes an attribute from outside the widget.
    pub fn set_attribute(&self, name: &str, value: &str) {
        self.shared
            .process(Pending::Attribute(name.to_string(), Some(value.to_string())));
    }

    /// Removes an attribute from outside the widget.
    pub fn remove_attribute(&self, name: &str) {
        self.shared
            .process(Pending::Attribute(name.to_string(), None));
    }

    /// Boolean attribute setter.
    pub fn set_flag(&self, name: &str, enabled: bool) {
        if enabled {
            self.set_attribute(name, "");
        } else {
            self.remove_attribute(name);
        }
    }

    /// Attribute getter.
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.shared
            .state
            .borrow()
            .attrs
            .get(name)
            .map(str::to_string)
    }

    /// Boolean attribute getter.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.shared.state.borrow().attrs.has(name)
    }

    /// Snapshot of every attribute.
    pub fn attributes(&self) -> AttributeMap {
        self.shared.state.borrow().attrs.clone()
    }

    /// Replaces slot assignments; re-renders when they changed.
    pub fn assign_slots(&self, slots: SlotAssignments) {
        self.shared.process(Pending::Slots(slots));
    }

    /// Inline style property currently set on the host element.
    pub fn host_style(&self, property: &str) -> Option<String> {
        self.shared
            .state
            .borrow()
            .host_styles
            .get(property)
            .cloned()
    }

    /// Current `(name, value)` form entry.
    pub fn form_entry(&self) -> Option<(String, String)> {
        self.shared.state.borrow().form_entry.clone()
    }

    /// Reads the rendered tree.
    pub fn with_view<R>(&self, read: impl FnOnce(&View<W::Msg>) -> R) -> R {
        let state = self.shared.state.borrow();
        match state.view.as_ref() {
            Some(view) => read(view),
            None => read(&View::default()),
        }
    }

    /// Reads the widget's derived state.
    pub fn with_widget<R>(&self, read: impl FnOnce(&W) -> R) -> R {
        read(&self.shared.state.borrow().widget)
    }

    /// Serialized rendering root.
    pub fn markup(&self) -> String {
        self.with_view(View::to_markup)
    }

    /// Fires `kind` at the first rendered element matching `selector` and delivers the
    /// resulting messages.
    pub fn dispatch_dom(&self, selector: &str, kind: EventKind, event: &DomEvent) {
        let messages = self.with_view(|view| view.dispatch(selector, kind, event));
        for msg in messages {
            self.send(msg);
        }
    }

    /// Calls a programmatic method by name.
    pub fn invoke(&self, method: &str, args: &Value) -> Result<(), WidgetError> {
        match W::method(method, args) {
            Some(Ok(msg)) => {
                self.send(msg);
                Ok(())
            }
            Some(Err(reason)) => Err(WidgetError::InvalidArguments {
                tag: W::TAG,
                method: method.to_string(),
                reason,
            }),
            None => {
                leptos::logging::warn!("{} has no method `{method}`", W::TAG);
                Err(WidgetError::UnknownMethod {
                    tag: W::TAG,
                    method: method.to_string(),
                })
            }
        }
    }
}

impl<W: Widget> Shared<W> {
    fn process(&self, item: Pending<W::Msg>) {
        if self.busy.get() {
            self.queue.borrow_mut().push_back(item);
            return;
        }
        self.busy.set(true);
        let mut next = Some(item);
        while let Some(item) = next {
            self.step(item);
            next = self.queue.borrow_mut().pop_front();
        }
        self.busy.set(false);
    }

    fn step(&self, item: Pending<W::Msg>) {
        let mut effects = Vec::new();
        let mut changes = VecDeque::new();
        let mut state = self.state.borrow_mut();
        let State {
            widget,
            attrs,
            slots,
            phase,
            view,
            retained,
            ..
        } = &mut *state;
        let attached = *phase == Phase::Attached;

        let mut update = match item {
            Pending::Attach => {
                if attached {
                    return;
                }
                *phase = Phase::Attached;
                for (name, value) in W::DEFAULTS {
                    if !attrs.has(name) {
                        attrs.set(*name, *value);
                        effects.push(Effect::Reflect(
                            (*name).to_string(),
                            Some((*value).to_string()),
                        ));
                    }
                }
                let mut cx = Context::<W> {
                    attrs: &mut *attrs,
                    slots: &*slots,
                    changes: &mut changes,
                    effects: &mut effects,
                    retained: &mut *retained,
                    host: &self.host,
                    dispatcher: &self.dispatcher,
                    key: self.key,
                };
                widget.attached(&mut cx);
                Update::Render
            }
            Pending::Detach => {
                if !attached {
                    return;
                }
                *phase = Phase::Detached;
                let mut cx = Context::<W> {
                    attrs: &mut *attrs,
                    slots: &*slots,
                    changes: &mut changes,
                    effects: &mut effects,
                    retained: &mut *retained,
                    host: &self.host,
                    dispatcher: &self.dispatcher,
                    key: self.key,
                };
                widget.detached(&mut cx);
                retained.clear();
                changes.clear();
                Update::None
            }
            Pending::Attribute(name, value) => {
                let old = attrs.get(&name).map(str::to_string);
                if old == value {
                    return;
                }
                match &value {
                    Some(value) => attrs.set(name.clone(), value.clone()),
                    None => attrs.remove(&name),
                };
                effects.push(Effect::Reflect(name.clone(), value.clone()));
                if attached && is_observed::<W>(&name) {
                    changes.push_back(Change {
                        name,
                        old,
                        new: value,
                    });
                }
                Update::None
            }
            Pending::Slots(assignments) => {
                if *slots == assignments {
                    return;
                }
                *slots = assignments;
                if !attached {
                    return;
                }
                let mut cx = Context::<W> {
                    attrs: &mut *attrs,
                    slots: &*slots,
                    changes: &mut changes,
                    effects: &mut effects,
                    retained: &mut *retained,
                    host: &self.host,
                    dispatcher: &self.dispatcher,
                    key: self.key,
                };
                widget.slots_changed(&mut cx)
            }
            Pending::Msg(msg) => {
                if !attached {
                    return;
                }
                let mut cx = Context::<W> {
                    attrs: &mut *attrs,
                    slots: &*slots,
                    changes: &mut changes,
                    effects: &mut effects,
                    retained: &mut *retained,
                    host: &self.host,
                    dispatcher: &self.dispatcher,
                    key: self.key,
                };
                widget.update(&mut cx, msg)
            }
        };

        while let Some(change) = changes.pop_front() {
            if *phase != Phase::Attached {
                break;
            }
            let mut cx = Context::<W> {
                attrs: &mut *attrs,
                slots: &*slots,
                changes: &mut changes,
                effects: &mut effects,
                retained: &mut *retained,
                host: &self.host,
                dispatcher: &self.dispatcher,
                key: self.key,
            };
            let next = widget.attribute_changed(
                &mut cx,
                &change.name,
                change.old.as_deref(),
                change.new.as_deref(),
            );
            update = update.merge(next);
        }

        let mut patches = Vec::new();
        let mut mounted = None;
        match update {
            Update::Render => {
                let rendered = widget.render(&RenderContext {
                    attrs,
                    slots,
                    key: self.key,
                });
                mounted = Some(rendered.clone());
                *view = Some(rendered);
            }
            Update::Patch(list) => {
                if let Some(view) = view.as_mut() {
                    for patch in &list {
                        view.apply_patch(patch);
                    }
                }
                patches = list;
            }
            Update::None => {}
        }

        let form_entry = attrs
            .non_empty("name")
            .zip(widget.form_value(attrs))
            .map(|(name, value)| (name.to_string(), value));
        let form_changed = state.form_entry != form_entry;
        if form_changed {
            state.form_entry = form_entry.clone();
        }
        for effect in &effects {
            if let Effect::HostStyle(property, value) = effect {
                match value {
                    Some(value) => {
                        state.host_styles.insert(property.clone(), value.clone());
                    }
                    None => {
                        state.host_styles.remove(property);
                    }
                }
            }
        }
        drop(state);

        let mut surface = self.surface.borrow_mut();
        if let Some(view) = &mounted {
            surface.mount(view, &self.dispatcher);
        }
        if !patches.is_empty() {
            surface.patch(&patches);
        }
        if form_changed {
            surface.form_entry_changed(
                form_entry
                    .as_ref()
                    .map(|(name, value)| (name.as_str(), value.as_str())),
            );
        }
        let mut emitted = Vec::new();
        for effect in effects {
            match effect {
                Effect::Reflect(name, value) => surface.reflect_attribute(&name, value.as_deref()),
                Effect::HostStyle(property, value) => {
                    surface.set_host_style(&property, value.as_deref())
                }
                Effect::Focus(selector) => surface.focus(&selector),
                Effect::Emit(event) => emitted.push(event),
            }
        }
        drop(surface);

        // Emission runs outside the surface borrow; listeners may call back into
        // this instance, which queues behind the current item.
        for event in emitted {
            self.surface.borrow_mut().emit(&event);
        }
    }
}

/// Type-erased instance used by registries and hosts.
pub trait AnyWidget {
    /// Custom element tag.
    fn tag(&self) -> &'static str;
    /// Host identity.
    fn key(&self) -> ElementKey;
    /// Current phase.
    fn phase(&self) -> Phase;
    /// Connects the instance.
    fn attach(&self);
    /// Disconnects the instance.
    fn detach(&self);
    /// Returns whether `name` is an observed attribute.
    fn observes(&self, name: &str) -> bool;
    /// Attribute setter.
    fn set_attribute(&self, name: &str, value: &str);
    /// Attribute removal.
    fn remove_attribute(&self, name: &str);
    /// Attribute getter.
    fn attribute(&self, name: &str) -> Option<String>;
    /// Boolean attribute getter.
    fn has_attribute(&self, name: &str) -> bool;
    /// Boolean attribute setter.
    fn set_flag(&self, name: &str, enabled: bool);
    /// Replaces slot assignments.
    fn assign_slots(&self, slots: SlotAssignments);
    /// Calls a programmatic method.
    fn invoke(&self, method: &str, args: &Value) -> Result<(), WidgetError>;
    /// Current form entry.
    fn form_entry(&self) -> Option<(String, String)>;
    /// Serialized rendering root.
    fn markup(&self) -> String;
}

impl<W: Widget> AnyWidget for WidgetInstance<W> {
    fn tag(&self) -> &'static str {
        W::TAG
    }

    fn key(&self) -> ElementKey {
        WidgetInstance::key(self)
    }

    fn phase(&self) -> Phase {
        WidgetInstance::phase(self)
    }

    fn attach(&self) {
        WidgetInstance::attach(self);
    }

    fn detach(&self) {
        WidgetInstance::detach(self);
    }

    fn observes(&self, name: &str) -> bool {
        is_observed::<W>(name)
    }

    fn set_attribute(&self, name: &str, value: &str) {
        WidgetInstance::set_attribute(self, name, value);
    }

    fn remove_attribute(&self, name: &str) {
        WidgetInstance::remove_attribute(self, name);
    }

    fn attribute(&self, name: &str) -> Option<String> {
        WidgetInstance::attribute(self, name)
    }

    fn has_attribute(&self, name: &str) -> bool {
        WidgetInstance::has_attribute(self, name)
    }

    fn set_flag(&self, name: &str, enabled: bool) {
        WidgetInstance::set_flag(self, name, enabled);
    }

    fn assign_slots(&self, slots: SlotAssignments) {
        WidgetInstance::assign_slots(self, slots);
    }

    fn invoke(&self, method: &str, args: &Value) -> Result<(), WidgetError> {
        WidgetInstance::invoke(self, method, args)
    }

    fn form_entry(&self) -> Option<(String, String)> {
        WidgetInstance::form_entry(self)
    }

    fn markup(&self) -> String {
        WidgetInstance::markup(self)
    }
}

/// Visitor over concrete widget types, used by tag registries to construct instances
/// without naming the type at the call site.
pub trait WidgetVisitor {
    /// Visitor result.
    type Output;
    /// Called with the widget type registered for the visited tag.
    fn visit<W: Widget>(self) -> Self::Output;
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        headless::{mount, HeadlessHost, Mounted},
        tree::el,
    };

    #[derive(Default)]
    struct Probe {
        seen: Vec<String>,
    }

    #[derive(Debug, Clone)]
    enum Msg {
        Bump,
    }

    impl Widget for Probe {
        type Msg = Msg;

        const TAG: &'static str = "x-probe";
        const OBSERVED: &'static [&'static str] = &["count", "mirror"];
        const DEFAULTS: &'static [(&'static str, &'static str)] = &[("count", "0")];

        fn create() -> Self {
            Self::default()
        }

        fn attached(&mut self, cx: &mut Context<'_, Self>) {
            let subscription = cx.listen(ListenTarget::Document, EventKind::Click, false, |_| {
                Some(Msg::Bump)
            });
            cx.retain(subscription);
        }

        fn attribute_changed(
            &mut self,
            cx: &mut Context<'_, Self>,
            name: &str,
            _old: Option<&str>,
            new: Option<&str>,
        ) -> Update {
            self.seen.push(name.to_string());
            if name == "count" {
                cx.set_attribute("mirror", new.unwrap_or_default().to_string());
            }
            Update::Render
        }

        fn update(&mut self, cx: &mut Context<'_, Self>, msg: Msg) -> Update {
            match msg {
                Msg::Bump => {
                    let next = cx.attrs().number("count").unwrap_or(0.0) + 1.0;
                    cx.set_attribute("count", crate::attributes::format_number(next));
                    Update::None
                }
            }
        }

        fn render(&self, cx: &RenderContext<'_>) -> View<Msg> {
            View::new(":host { display: inline; }")
                .child(el("span").text(cx.attrs.get("count").unwrap_or_default()))
        }

        fn form_value(&self, attrs: &AttributeMap) -> Option<String> {
            attrs.get("count").map(str::to_string)
        }
    }

    fn probe(host: &HeadlessHost) -> Mounted<Probe> {
        mount::<Probe>(host, &[("name", "total")])
    }

    #[test]
    fn attach_applies_defaults_and_renders() {
        let host = HeadlessHost::new();
        let widget = probe(&host);
        assert_eq!(widget.phase(), Phase::Attached);
        assert_eq!(widget.attribute("count").as_deref(), Some("0"));
        assert_eq!(
            widget.log().reflected.get("count"),
            Some(&Some("0".to_string()))
        );
        assert_eq!(widget.with_view(View::text_content), "0");
        assert_eq!(
            widget.form_entry(),
            Some(("total".to_string(), "0".to_string()))
        );
    }

    #[test]
    fn self_writes_are_delivered_in_mutation_order() {
        let host = HeadlessHost::new();
        let widget = probe(&host);
        host.click_outside();
        assert_eq!(widget.attribute("count").as_deref(), Some("1"));
        assert_eq!(widget.attribute("mirror").as_deref(), Some("1"));
        assert_eq!(
            widget.with_widget(|probe| probe.seen.clone()),
            vec!["count".to_string(), "mirror".to_string()]
        );
        assert_eq!(widget.log().form_entry, Some(("total".into(), "1".into())));
    }

    #[test]
    fn unchanged_writes_are_ignored() {
        let host = HeadlessHost::new();
        let widget = probe(&host);
        let mounts = widget.log().mounts;
        widget.set_attribute("count", "0");
        assert_eq!(widget.with_widget(|probe| probe.seen.len()), 0);
        assert_eq!(widget.log().mounts, mounts);
    }

    #[test]
    fn detach_releases_ambient_listeners() {
        let host = HeadlessHost::new();
        let widget = probe(&host);
        assert_eq!(host.total_listeners(), 1);
        widget.detach();
        assert_eq!(widget.phase(), Phase::Detached);
        assert_eq!(host.total_listeners(), 0);
        widget.send(Msg::Bump);
        assert_eq!(widget.attribute("count").as_deref(), Some("0"));
    }

    #[test]
    fn unknown_methods_are_reported() {
        let host = HeadlessHost::new();
        let widget = probe(&host);
        assert_eq!(
            widget.invoke("explode", &Value::Null),
            Err(WidgetError::UnknownMethod {
                tag: "x-probe",
                method: "explode".to_string(),
            })
        );
    }
}
