//! Structured render tree produced by widgets.
//!
//! Widgets never assemble markup strings. They build [`Node`] values with typed
//! builders; hosts materialize the tree (web hosts into a shadow root, the headless host
//! in memory) and [`View::to_markup`] serializes it with escaping for comparisons.

use std::{fmt, rc::Rc};

use serde_json::Value;

use crate::{host::ElementKey, selector::Selector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// DOM event kinds widgets listen to.
pub enum EventKind {
    /// Pointer activation.
    Click,
    /// Key press.
    KeyDown,
    /// Pointer press.
    PointerDown,
    /// Pointer movement.
    PointerMove,
    /// Pointer release.
    PointerUp,
    /// Pointer entered the element (does not bubble).
    MouseEnter,
    /// Pointer left the element (does not bubble).
    MouseLeave,
    /// Focus moved into the element or a descendant.
    FocusIn,
    /// Focus left the element or a descendant.
    FocusOut,
    /// Live value edit from a native control.
    Input,
    /// Settled value edit from a native control.
    Change,
    /// Scroll (listened in capture phase on the window).
    Scroll,
    /// Viewport resize.
    Resize,
    /// Assigned slot content changed.
    SlotChange,
    /// Custom event emitted by a nested widget.
    Custom(&'static str),
}

impl EventKind {
    /// DOM event type name.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::KeyDown => "keydown",
            Self::PointerDown => "pointerdown",
            Self::PointerMove => "pointermove",
            Self::PointerUp => "pointerup",
            Self::MouseEnter => "mouseenter",
            Self::MouseLeave => "mouseleave",
            Self::FocusIn => "focusin",
            Self::FocusOut => "focusout",
            Self::Input => "input",
            Self::Change => "change",
            Self::Scroll => "scroll",
            Self::Resize => "resize",
            Self::SlotChange => "slotchange",
            Self::Custom(name) => name,
        }
    }

    /// Whether the event propagates to ancestors.
    pub const fn bubbles(self) -> bool {
        !matches!(
            self,
            Self::MouseEnter | Self::MouseLeave | Self::Scroll | Self::Resize
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Platform-neutral snapshot of a DOM event delivered to handlers.
pub struct DomEvent {
    /// `KeyboardEvent.key` for key events.
    pub key: Option<String>,
    /// Pointer x coordinate in viewport space.
    pub client_x: f64,
    /// Pointer y coordinate in viewport space.
    pub client_y: f64,
    /// Current value of the event target for native form controls.
    pub value: Option<String>,
    /// Custom event detail payload.
    pub detail: Value,
    /// Known elements on the composed path, innermost first.
    pub path: Vec<ElementKey>,
}

impl DomEvent {
    /// Key event for `key`.
    pub fn key(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::default()
        }
    }

    /// Pointer event at viewport coordinates.
    pub fn pointer(client_x: f64, client_y: f64) -> Self {
        Self {
            client_x,
            client_y,
            ..Self::default()
        }
    }

    /// Native control event carrying the target's current value.
    pub fn value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Custom event carrying `detail`.
    pub fn detail(detail: Value) -> Self {
        Self {
            detail,
            ..Self::default()
        }
    }

    /// Returns a copy whose composed path is `path`.
    pub fn with_path(mut self, path: Vec<ElementKey>) -> Self {
        self.path = path;
        self
    }

    /// Returns whether the event passed through the element identified by `key`.
    pub fn passes_through(&self, key: ElementKey) -> bool {
        self.path.contains(&key)
    }

    /// Returns whether the key is one of the activation keys (`Enter`, space).
    pub fn is_activation_key(&self) -> bool {
        matches!(self.key.as_deref(), Some("Enter" | " " | "Spacebar"))
    }
}

type HandlerFn<Msg> = dyn Fn(&DomEvent) -> Option<Msg>;

/// Event handler attached to an element; maps a DOM event to an optional message.
pub struct Listener<Msg> {
    kind: EventKind,
    handler: Rc<HandlerFn<Msg>>,
    stop: bool,
}

impl<Msg> Listener<Msg> {
    /// Event kind handled.
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Runs the handler.
    pub fn handle(&self, event: &DomEvent) -> Option<Msg> {
        (self.handler)(event)
    }

    /// Whether the event stops at this element instead of reaching ancestors.
    pub fn stops_propagation(&self) -> bool {
        self.stop
    }
}

impl<Msg> Clone for Listener<Msg> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            handler: Rc::clone(&self.handler),
            stop: self.stop,
        }
    }
}

impl<Msg> fmt::Debug for Listener<Msg> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("kind", &self.kind)
            .field("stop", &self.stop)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
/// Element node.
pub struct Element<Msg> {
    tag: String,
    attributes: Vec<(String, String)>,
    classes: Vec<String>,
    styles: Vec<(String, String)>,
    listeners: Vec<Listener<Msg>>,
    children: Vec<Node<Msg>>,
}

impl<Msg> Clone for Element<Msg> {
    fn clone(&self) -> Self {
        Self {
            tag: self.tag.clone(),
            attributes: self.attributes.clone(),
            classes: self.classes.clone(),
            styles: self.styles.clone(),
            listeners: self.listeners.clone(),
            children: self.children.clone(),
        }
    }
}

#[derive(Debug)]
/// Node of a render tree.
pub enum Node<Msg> {
    /// Element with attributes, listeners and children.
    Element(Element<Msg>),
    /// Text node.
    Text(String),
}

impl<Msg> Clone for Node<Msg> {
    fn clone(&self) -> Self {
        match self {
            Self::Element(element) => Self::Element(element.clone()),
            Self::Text(text) => Self::Text(text.clone()),
        }
    }
}

/// Starts an element builder.
pub fn el<Msg>(tag: &str) -> Element<Msg> {
    Element::new(tag)
}

/// Text node.
pub fn text<Msg>(value: impl Into<String>) -> Node<Msg> {
    Node::Text(value.into())
}

/// `<slot>` element; `None` is the default slot.
pub fn slot<Msg>(name: Option<&str>) -> Element<Msg> {
    let element = el("slot");
    match name {
        Some(name) => element.attr("name", name),
        None => element,
    }
}

impl<Msg> From<Element<Msg>> for Node<Msg> {
    fn from(element: Element<Msg>) -> Self {
        Self::Element(element)
    }
}

impl<Msg> Element<Msg> {
    /// Creates an element with the lower-cased `tag`.
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: Vec::new(),
            classes: Vec::new(),
            styles: Vec::new(),
            listeners: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Adds a class.
    pub fn class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        for part in class.split_whitespace() {
            if !self.has_class(part) {
                self.classes.push(part.to_string());
            }
        }
        self
    }

    /// Adds a class when `enabled`.
    pub fn class_if(self, enabled: bool, class: impl Into<String>) -> Self {
        if enabled {
            self.class(class)
        } else {
            self
        }
    }

    /// Sets an attribute, replacing a previous value. `class` and `style` are routed
    /// to the class list and inline style.
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attribute(name, value.into());
        self
    }

    /// Sets an attribute when `value` is `Some`.
    pub fn attr_opt(self, name: &str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.attr(name, value),
            None => self,
        }
    }

    /// Boolean attribute: present when `enabled`.
    pub fn flag(self, name: &str, enabled: bool) -> Self {
        if enabled {
            self.attr(name, "")
        } else {
            self
        }
    }

    /// Sets an inline style declaration.
    pub fn style(mut self, property: &str, value: impl Into<String>) -> Self {
        self.set_style(property, value.into());
        self
    }

    /// Appends a child node.
    pub fn child(mut self, child: impl Into<Node<Msg>>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Appends an optional child node.
    pub fn child_opt(self, child: Option<impl Into<Node<Msg>>>) -> Self {
        match child {
            Some(child) => self.child(child),
            None => self,
        }
    }

    /// Appends children.
    pub fn children<I, N>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node<Msg>>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    /// Appends a text child.
    pub fn text(mut self, value: impl Into<String>) -> Self {
        self.children.push(Node::Text(value.into()));
        self
    }

    /// Sends `msg` when `kind` fires on this element or a descendant.
    pub fn on(self, kind: EventKind, msg: Msg) -> Self
    where
        Msg: Clone + 'static,
    {
        self.on_with(kind, move |_| Some(msg.clone()))
    }

    /// Maps `kind` events through `handler`; `None` ignores the event.
    pub fn on_with(
        mut self,
        kind: EventKind,
        handler: impl Fn(&DomEvent) -> Option<Msg> + 'static,
    ) -> Self {
        self.listeners.push(Listener {
            kind,
            handler: Rc::new(handler),
            stop: false,
        });
        self
    }

    /// Keeps `kind` events handled here from reaching ancestor elements or the host.
    pub fn stop_propagation(mut self, kind: EventKind) -> Self {
        for listener in &mut self.listeners {
            if listener.kind == kind {
                listener.stop = true;
            }
        }
        self
    }

    /// Lower-case tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Attribute value. Classes and inline styles are kept in their own lists.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns whether the boolean attribute `name` is present.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Non-class, non-style attributes in insertion order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Class list.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Returns whether the class list contains `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|candidate| candidate == class)
    }

    /// Inline style value for `property`.
    pub fn style_value(&self, property: &str) -> Option<&str> {
        self.styles
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    /// Inline style declarations in insertion order.
    pub fn styles(&self) -> impl Iterator<Item = (&str, &str)> {
        self.styles
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Serialized inline style (`a: b; c: d`), empty when none.
    pub fn style_text(&self) -> String {
        self.styles
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Child nodes.
    pub fn child_nodes(&self) -> &[Node<Msg>] {
        &self.children
    }

    /// Attached listeners.
    pub fn listeners(&self) -> &[Listener<Msg>] {
        &self.listeners
    }

    /// Concatenated descendant text.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// Sets or replaces an attribute in place.
    pub fn set_attribute(&mut self, name: &str, value: String) {
        match name {
            "class" => {
                self.classes = value.split_whitespace().map(str::to_string).collect();
            }
            "style" => {
                self.styles.clear();
                for declaration in value.split(';') {
                    if let Some((property, value)) = declaration.split_once(':') {
                        self.set_style(property.trim(), value.trim().to_string());
                    }
                }
            }
            _ => match self.attributes.iter_mut().find(|(key, _)| key == name) {
                Some(entry) => entry.1 = value,
                None => self.attributes.push((name.to_string(), value)),
            },
        }
    }

    /// Removes an attribute in place.
    pub fn remove_attribute(&mut self, name: &str) {
        match name {
            "class" => self.classes.clear(),
            "style" => self.styles.clear(),
            _ => self.attributes.retain(|(key, _)| key != name),
        }
    }

    /// Sets, replaces or (with an empty value) removes an inline style declaration.
    pub fn set_style(&mut self, property: &str, value: String) {
        if value.is_empty() {
            self.styles.retain(|(name, _)| name != property);
            return;
        }
        match self.styles.iter_mut().find(|(name, _)| name == property) {
            Some(entry) => entry.1 = value,
            None => self.styles.push((property.to_string(), value)),
        }
    }

    /// Adds or removes a class in place.
    pub fn set_class(&mut self, class: &str, enabled: bool) {
        if enabled {
            if !self.has_class(class) {
                self.classes.push(class.to_string());
            }
        } else {
            self.classes.retain(|candidate| candidate != class);
        }
    }

    /// Replaces all children with a single text node.
    pub fn set_text(&mut self, value: String) {
        self.children = vec![Node::Text(value)];
    }

    fn write_markup(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attributes {
            write_attribute(out, name, value);
        }
        if !self.classes.is_empty() {
            write_attribute(out, "class", &self.classes.join(" "));
        }
        if !self.styles.is_empty() {
            write_attribute(out, "style", &self.style_text());
        }
        out.push('>');
        if is_void(&self.tag) {
            return;
        }
        let raw_text = matches!(self.tag.as_str(), "style" | "script");
        for child in &self.children {
            match child {
                Node::Element(element) => element.write_markup(out),
                Node::Text(value) if raw_text => out.push_str(value),
                Node::Text(value) => out.push_str(&escape_text(value)),
            }
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

fn collect_text<Msg>(nodes: &[Node<Msg>], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(value) => out.push_str(value),
            Node::Element(element) if element.tag == "style" => {}
            Node::Element(element) => collect_text(&element.children, out),
        }
    }
}

fn is_void(tag: &str) -> bool {
    matches!(tag, "input" | "img" | "br" | "hr" | "meta" | "link")
}

fn write_attribute(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape_attribute(value));
    out.push('"');
}

/// Escapes text content.
pub fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escapes a double-quoted attribute value.
pub fn escape_attribute(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// In-place modification of an already rendered tree.
pub enum PatchOp {
    /// Set an attribute.
    SetAttribute {
        /// Attribute name.
        name: String,
        /// New value.
        value: String,
    },
    /// Remove an attribute.
    RemoveAttribute {
        /// Attribute name.
        name: String,
    },
    /// Set (or with an empty value, remove) an inline style property.
    SetStyle {
        /// CSS property, custom properties included.
        property: String,
        /// New value.
        value: String,
    },
    /// Add or remove a class.
    SetClass {
        /// Class name.
        class: String,
        /// Whether the class is present afterwards.
        enabled: bool,
    },
    /// Replace the element's children with text.
    SetText(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Patch addressed to every element matching `selector`.
pub struct Patch {
    /// Target selector inside the widget's rendering root.
    pub selector: String,
    /// Modification.
    pub op: PatchOp,
}

impl Patch {
    /// Sets an attribute on matches of `selector`.
    pub fn attribute(selector: &str, name: &str, value: impl Into<String>) -> Self {
        Self {
            selector: selector.to_string(),
            op: PatchOp::SetAttribute {
                name: name.to_string(),
                value: value.into(),
            },
        }
    }

    /// Removes an attribute from matches of `selector`.
    pub fn remove_attribute(selector: &str, name: &str) -> Self {
        Self {
            selector: selector.to_string(),
            op: PatchOp::RemoveAttribute {
                name: name.to_string(),
            },
        }
    }

    /// Sets an inline style property on matches of `selector`.
    pub fn style(selector: &str, property: &str, value: impl Into<String>) -> Self {
        Self {
            selector: selector.to_string(),
            op: PatchOp::SetStyle {
                property: property.to_string(),
                value: value.into(),
            },
        }
    }

    /// Toggles a class on matches of `selector`.
    pub fn class(selector: &str, class: &str, enabled: bool) -> Self {
        Self {
            selector: selector.to_string(),
            op: PatchOp::SetClass {
                class: class.to_string(),
                enabled,
            },
        }
    }

    /// Replaces the text of matches of `selector`.
    pub fn text(selector: &str, value: impl Into<String>) -> Self {
        Self {
            selector: selector.to_string(),
            op: PatchOp::SetText(value.into()),
        }
    }

    /// Applies the operation to one element.
    pub fn apply_to<Msg>(&self, element: &mut Element<Msg>) {
        match &self.op {
            PatchOp::SetAttribute { name, value } => element.set_attribute(name, value.clone()),
            PatchOp::RemoveAttribute { name } => element.remove_attribute(name),
            PatchOp::SetStyle { property, value } => element.set_style(property, value.clone()),
            PatchOp::SetClass { class, enabled } => element.set_class(class, *enabled),
            PatchOp::SetText(value) => element.set_text(value.clone()),
        }
    }
}

#[derive(Debug)]
/// Complete output of one render: scoped style blocks plus content nodes.
pub struct View<Msg> {
    styles: Vec<String>,
    nodes: Vec<Node<Msg>>,
}

impl<Msg> Clone for View<Msg> {
    fn clone(&self) -> Self {
        Self {
            styles: self.styles.clone(),
            nodes: self.nodes.clone(),
        }
    }
}

impl<Msg> Default for View<Msg> {
    fn default() -> Self {
        Self {
            styles: Vec::new(),
            nodes: Vec::new(),
        }
    }
}

impl<Msg> View<Msg> {
    /// View with a single style block.
    pub fn new(style: impl Into<String>) -> Self {
        Self {
            styles: vec![style.into()],
            nodes: Vec::new(),
        }
    }

    /// Appends another style block.
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.styles.push(style.into());
        self
    }

    /// Appends a content node.
    pub fn child(mut self, node: impl Into<Node<Msg>>) -> Self {
        self.nodes.push(node.into());
        self
    }

    /// Appends an optional content node.
    pub fn child_opt(self, node: Option<impl Into<Node<Msg>>>) -> Self {
        match node {
            Some(node) => self.child(node),
            None => self,
        }
    }

    /// Appends content nodes.
    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node<Msg>>,
    {
        self.nodes.extend(nodes.into_iter().map(Into::into));
        self
    }

    /// Style blocks in order.
    pub fn styles(&self) -> &[String] {
        &self.styles
    }

    /// Content nodes in order.
    pub fn nodes(&self) -> &[Node<Msg>] {
        &self.nodes
    }

    /// Concatenated text of all content nodes (style blocks excluded).
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.nodes, &mut out);
        out
    }

    /// Serializes style blocks and content with escaping. Listeners are not part of
    /// the markup.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        for style in &self.styles {
            out.push_str("<style>");
            out.push_str(style);
            out.push_str("</style>");
        }
        for node in &self.nodes {
            match node {
                Node::Element(element) => element.write_markup(&mut out),
                Node::Text(value) => out.push_str(&escape_text(value)),
            }
        }
        out
    }

    /// First element matching `selector` in document order.
    pub fn query(&self, selector: &str) -> Option<&Element<Msg>> {
        let path = self.find_paths(selector).into_iter().next()?;
        self.element_at(&path)
    }

    /// Every element matching `selector` in document order.
    pub fn query_all(&self, selector: &str) -> Vec<&Element<Msg>> {
        self.find_paths(selector)
            .into_iter()
            .filter_map(|path| self.element_at(&path))
            .collect()
    }

    /// Applies a patch to every matching element; returns the number of matches.
    pub fn apply_patch(&mut self, patch: &Patch) -> usize {
        let paths = self.find_paths(&patch.selector);
        for path in &paths {
            if let Some(element) = self.element_at_mut(path) {
                patch.apply_to(element);
            }
        }
        paths.len()
    }

    /// Collects messages for `kind` fired at the first element matching `selector`,
    /// walking from the target to the root when the event bubbles.
    pub fn dispatch(&self, selector: &str, kind: EventKind, event: &DomEvent) -> Vec<Msg> {
        let Some(path) = self.find_paths(selector).into_iter().next() else {
            return Vec::new();
        };
        self.chain(&path, kind)
            .into_iter()
            .flat_map(|element| element.listeners.iter())
            .filter(|listener| listener.kind == kind)
            .filter_map(|listener| listener.handle(event))
            .collect()
    }

    /// Whether a `kind` event on the first match of `selector` stops before leaving
    /// the rendering root.
    pub fn stops_propagation(&self, selector: &str, kind: EventKind) -> bool {
        self.find_paths(selector)
            .into_iter()
            .next()
            .is_some_and(|path| self.chain(&path, kind).iter().any(|element| stops(element, kind)))
    }

    /// Elements a `kind` event visits from the target at `path` outwards.
    fn chain(&self, path: &[usize], kind: EventKind) -> Vec<&Element<Msg>> {
        let mut chain = Vec::with_capacity(path.len());
        for depth in (1..=path.len()).rev() {
            if let Some(element) = self.element_at(&path[..depth]) {
                chain.push(element);
                if stops(element, kind) {
                    break;
                }
            }
            if !kind.bubbles() {
                break;
            }
        }
        chain
    }

    fn find_paths(&self, selector: &str) -> Vec<Vec<usize>> {
        let Some(selector) = Selector::parse(selector) else {
            return Vec::new();
        };
        let mut found = Vec::new();
        let mut ancestors = Vec::new();
        let mut path = Vec::new();
        walk(&self.nodes, &selector, &mut ancestors, &mut path, &mut found);
        found
    }

    fn element_at(&self, path: &[usize]) -> Option<&Element<Msg>> {
        let (first, rest) = path.split_first()?;
        let mut current = match self.nodes.get(*first)? {
            Node::Element(element) => element,
            Node::Text(_) => return None,
        };
        for index in rest {
            current = match current.children.get(*index)? {
                Node::Element(element) => element,
                Node::Text(_) => return None,
            };
        }
        Some(current)
    }

    fn element_at_mut(&mut self, path: &[usize]) -> Option<&mut Element<Msg>> {
        let (first, rest) = path.split_first()?;
        let mut current = match self.nodes.get_mut(*first)? {
            Node::Element(element) => element,
            Node::Text(_) => return None,
        };
        for index in rest {
            current = match current.children.get_mut(*index)? {
                Node::Element(element) => element,
                Node::Text(_) => return None,
            };
        }
        Some(current)
    }
}

fn stops<Msg>(element: &Element<Msg>, kind: EventKind) -> bool {
    element
        .listeners
        .iter()
        .any(|listener| listener.kind == kind && listener.stop)
}

fn walk<'a, Msg>(
    nodes: &'a [Node<Msg>],
    selector: &Selector,
    ancestors: &mut Vec<&'a Element<Msg>>,
    path: &mut Vec<usize>,
    found: &mut Vec<Vec<usize>>,
) {
    for (index, node) in nodes.iter().enumerate() {
        let Node::Element(element) = node else {
            continue;
        };
        path.push(index);
        if selector.matches(element, ancestors) {
            found.push(path.clone());
        }
        ancestors.push(element);
        walk(&element.children, selector, ancestors, path, found);
        ancestors.pop();
        path.pop();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Msg {
        Row(usize),
        Table,
        Hover,
    }

    fn sample() -> View<Msg> {
        View::new(":host { display: block; }").child(
            el("table")
                .class("table")
                .attr("role", "grid")
                .on(EventKind::Click, Msg::Table)
                .child(
                    el("tr")
                        .attr("data-index", "0")
                        .on(EventKind::Click, Msg::Row(0))
                        .on(EventKind::MouseEnter, Msg::Hover)
                        .child(el("td").text("Bob & <Alice>")),
                ),
        )
    }

    #[test]
    fn markup_escapes_text_and_attributes() {
        let view: View<Msg> = View::new("a > b {}").child(
            el("span")
                .attr("title", "say \"hi\"")
                .class("label")
                .style("color", "red")
                .text("1 < 2"),
        );
        assert_eq!(
            view.to_markup(),
            "<style>a > b {}</style><span title=\"say &quot;hi&quot;\" class=\"label\" style=\"color: red\">1 &lt; 2</span>"
        );
    }

    #[test]
    fn text_content_skips_style_blocks() {
        assert_eq!(sample().text_content(), "Bob & <Alice>");
    }

    #[test]
    fn dispatch_bubbles_from_target_to_root() {
        let view = sample();
        assert_eq!(
            view.dispatch("td", EventKind::Click, &DomEvent::default()),
            vec![Msg::Row(0), Msg::Table]
        );
        assert_eq!(
            view.dispatch("tr", EventKind::MouseEnter, &DomEvent::default()),
            vec![Msg::Hover]
        );
        assert!(view
            .dispatch(".missing", EventKind::Click, &DomEvent::default())
            .is_empty());
    }

    #[test]
    fn stopped_listeners_keep_events_from_ancestors() {
        let view: View<Msg> = View::new("").child(
            el("table").on(EventKind::Click, Msg::Table).child(
                el("tr")
                    .on(EventKind::Click, Msg::Row(0))
                    .stop_propagation(EventKind::Click)
                    .on(EventKind::MouseEnter, Msg::Hover)
                    .child(el("td")),
            ),
        );
        assert_eq!(
            view.dispatch("td", EventKind::Click, &DomEvent::default()),
            vec![Msg::Row(0)]
        );
        assert!(view.stops_propagation("td", EventKind::Click));
        assert!(!view.stops_propagation("td", EventKind::MouseEnter));
        assert!(!sample().stops_propagation("td", EventKind::Click));
    }

    #[test]
    fn patches_touch_every_match_without_rebuilding() {
        let mut view = sample();
        let touched = view.apply_patch(&Patch::style("tr", "--fill", "40%"));
        assert_eq!(touched, 1);
        view.apply_patch(&Patch::class("table", "striped", true));
        view.apply_patch(&Patch::text("td", "Charlie"));

        let row = view.query("tr[data-index=\"0\"]").expect("row");
        assert_eq!(row.style_value("--fill"), Some("40%"));
        assert!(view.query("table.striped").is_some());
        assert_eq!(view.text_content(), "Charlie");
    }

    #[test]
    fn class_and_style_attributes_route_to_lists() {
        let mut element: Element<Msg> = el("div").attr("class", "a b");
        element.set_attribute("style", "display: none; color: red".to_string());
        assert!(element.has_class("b"));
        assert_eq!(element.style_value("display"), Some("none"));
        element.set_style("display", String::new());
        assert_eq!(element.style_value("display"), None);
    }
}
