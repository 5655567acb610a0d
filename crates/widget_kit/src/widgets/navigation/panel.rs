use serde_json::{json, Value};
use widget_contract::{
    bool_token, el, events, slot, Context, ElementKey, EventKind, ListenTarget, Patch,
    RenderContext, Subscription, Update, View, Widget, WidgetEvent,
};

use crate::icon::IconName;

const CSS: &str = r#"
:host {
  display: block;
  box-sizing: border-box;
  background: var(--base-background-component, #ffffff);
  color: var(--base-content--, #1d1d1d);
  font-family: var(--font-family-body, sans-serif);
  overflow: hidden;
}
:host([expanded]) { background: var(--base-background-app, #f5f7f9); }
:host([selected]) { color: var(--primary-content--, #0070f3); }
:host([data-is-child="true"]) {
  box-shadow: inset var(--component-panelbar-border-width, 2px) 0 0 0 var(--base-background-active, #d7dbde);
}
:host([data-is-child="true"][selected]) {
  box-shadow: inset var(--component-panelbar-border-width, 2px) 0 0 0 var(--primary-content--, #0070f3);
}
:host([data-is-child="true"]) .header { padding-left: calc(var(--component-panelbar-padding, 4px) * 2); }
.header {
  display: flex;
  align-items: center;
  gap: var(--spacing-medium, 8px);
  padding: var(--component-panelbar-padding, 4px);
  cursor: pointer;
  transition: background 0.2s ease;
  user-select: none;
}
.header:hover { background: var(--base-background-hover, #e6ebef); }
:host([selected]) .header:hover { background: var(--primary-background-active, #d0e4ff); }
:host([data-has-children="false"]) .header { cursor: default; }
.header ::slotted([slot="label"]) { flex-grow: 1; font-size: 1rem; line-height: 1.2; }
.arrow {
  display: inline-flex;
  align-items: center;
  justify-content: center;
  width: 20px;
  height: 20px;
  transition: transform 0.2s ease;
}
:host([expanded]) .arrow { transform: rotate(180deg); }
:host([data-has-children="false"]) .arrow { visibility: hidden; }
.children { display: none; width: 100%; box-sizing: border-box; }
:host([expanded]) .children { display: block; }
"#;

#[derive(Debug, Clone)]
/// Panel messages.
pub enum PanelMsg {
    /// Header click or Enter/Space on the header.
    Activate,
    /// `toggle()`.
    Toggle,
    /// `expand()`.
    Expand,
    /// `collapse()`.
    Collapse,
    /// A panel inside the same panelbar expanded.
    PeerExpanded(ElementKey),
    /// The location changed.
    RouteChanged,
}

#[derive(Debug, Default)]
/// `y-panel`: collapsible, selectable navigation entry.
pub struct Panel {
    route: Option<Subscription>,
}

impl Panel {
    fn has_children(cx: &Context<'_, Self>) -> bool {
        cx.slots().has_content("children")
    }

    /// Reflects `data-has-children`; a panel without children cannot stay expanded.
    fn sync_children(cx: &mut Context<'_, Self>) {
        let has_children = Self::has_children(cx);
        cx.set_attribute("data-has-children", bool_token(has_children));
        if !has_children && cx.has("expanded") {
            cx.remove_attribute("expanded");
        }
    }

    fn watch_route(&mut self, cx: &mut Context<'_, Self>) {
        self.route = None;
        let Some(href) = cx.attrs().non_empty("href").map(str::to_string) else {
            return;
        };
        let matches = cx.host().location_path() == href;
        cx.set_flag("selected", matches);
        self.route = Some(cx.listen(
            ListenTarget::Window,
            EventKind::Custom(events::POPSTATE),
            false,
            |_| Some(PanelMsg::RouteChanged),
        ));
    }

    fn expand(cx: &mut Context<'_, Self>) -> bool {
        if !Self::has_children(cx) || cx.has("expanded") {
            return false;
        }
        cx.set_flag("expanded", true);
        cx.emit(WidgetEvent::new(events::EXPAND, json!({ "expanded": true })));
        true
    }

    fn collapse(cx: &mut Context<'_, Self>) -> bool {
        if !cx.has("expanded") {
            return false;
        }
        cx.set_flag("expanded", false);
        cx.emit(WidgetEvent::new(events::COLLAPSE, json!({ "expanded": false })));
        true
    }

    fn toggle(cx: &mut Context<'_, Self>) {
        if !Self::has_children(cx) {
            return;
        }
        let changed = if cx.has("expanded") {
            Self::collapse(cx)
        } else {
            Self::expand(cx)
        };
        if changed {
            let expanded = cx.has("expanded");
            cx.emit(WidgetEvent::new(events::TOGGLE, json!({ "expanded": expanded })));
        }
    }

    /// A peer collapses this panel when both share the nearest enclosing panel (or
    /// neither has one) and the panelbar is `exclusive`.
    fn is_exclusive_sibling(cx: &Context<'_, Self>, origin: ElementKey) -> bool {
        let host = cx.host();
        let Some(bar) = host.closest(cx.key(), "y-panelbar") else {
            return false;
        };
        host.element_attribute(bar, "exclusive").is_some()
            && host.closest(origin, "y-panel") == host.closest(cx.key(), "y-panel")
    }
}

impl Widget for Panel {
    type Msg = PanelMsg;

    const TAG: &'static str = "y-panel";
    const OBSERVED: &'static [&'static str] = &["selected", "expanded", "href", "history"];

    fn create() -> Self {
        Self::default()
    }

    fn attached(&mut self, cx: &mut Context<'_, Self>) {
        let is_child = cx.host().closest(cx.key(), "y-panel").is_some();
        cx.set_attribute("data-is-child", bool_token(is_child));
        Self::sync_children(cx);
        if let Some(bar) = cx.host().closest(cx.key(), "y-panelbar") {
            let peers = cx.listen(
                ListenTarget::Element(bar),
                EventKind::Custom(events::EXPAND),
                false,
                |event| event.path.first().copied().map(PanelMsg::PeerExpanded),
            );
            cx.retain(peers);
        }
        self.watch_route(cx);
    }

    fn attribute_changed(
        &mut self,
        cx: &mut Context<'_, Self>,
        name: &str,
        _old: Option<&str>,
        _new: Option<&str>,
    ) -> Update {
        match name {
            "expanded" => {
                let expanded = cx.has("expanded") && Self::has_children(cx);
                Update::Patch(vec![Patch::attribute(
                    ".header",
                    "aria-expanded",
                    bool_token(expanded),
                )])
            }
            "href" => {
                self.watch_route(cx);
                Update::None
            }
            _ => Update::None,
        }
    }

    fn slots_changed(&mut self, cx: &mut Context<'_, Self>) -> Update {
        Self::sync_children(cx);
        Update::Render
    }

    fn update(&mut self, cx: &mut Context<'_, Self>, msg: PanelMsg) -> Update {
        match msg {
            PanelMsg::Activate => {
                if let Some(href) = cx.attrs().non_empty("href").map(str::to_string) {
                    let push = cx.attribute("history") != Some("false");
                    cx.host().navigate(&href, push);
                } else if Self::has_children(cx) {
                    Self::toggle(cx);
                } else {
                    cx.emit(WidgetEvent::new(events::SELECT, json!({ "selected": true })));
                }
            }
            PanelMsg::Toggle => Self::toggle(cx),
            PanelMsg::Expand => {
                Self::expand(cx);
            }
            PanelMsg::Collapse => {
                Self::collapse(cx);
            }
            PanelMsg::PeerExpanded(origin) => {
                if origin != cx.key() && Self::is_exclusive_sibling(cx, origin) {
                    Self::collapse(cx);
                }
            }
            PanelMsg::RouteChanged => {
                if let Some(href) = cx.attrs().non_empty("href").map(str::to_string) {
                    let matches = cx.host().location_path() == href;
                    cx.set_flag("selected", matches);
                }
            }
        }
        Update::None
    }

    fn render(&self, cx: &RenderContext<'_>) -> View<PanelMsg> {
        let expanded = cx.attrs.has("expanded") && cx.slots.has_content("children");
        View::new(CSS)
            .child(
                el("div")
                    .class("header")
                    .attr("part", "header")
                    .attr("role", "button")
                    .attr("tabindex", "0")
                    .attr("aria-expanded", bool_token(expanded))
                    .on(EventKind::Click, PanelMsg::Activate)
                    .on_with(EventKind::KeyDown, |event| {
                        event.is_activation_key().then_some(PanelMsg::Activate)
                    })
                    .child(slot(Some("icon")))
                    .child(slot(Some("label")).child(slot(None)))
                    .child(
                        el("span")
                            .class("arrow")
                            .attr("part", "arrow")
                            .child(IconName::ChevronDown.render()),
                    ),
            )
            .child(
                el("div")
                    .class("children")
                    .attr("part", "children")
                    .child(slot(Some("children"))),
            )
    }

    fn detached(&mut self, _cx: &mut Context<'_, Self>) {
        self.route = None;
    }

    fn method(name: &str, _args: &Value) -> Option<Result<PanelMsg, String>> {
        match name {
            "toggle" => Some(Ok(PanelMsg::Toggle)),
            "expand" => Some(Ok(PanelMsg::Expand)),
            "collapse" => Some(Ok(PanelMsg::Collapse)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use widget_contract::{
        headless::{mount, HeadlessHost, Mounted},
        SlotAssignments,
    };

    use super::*;
    use crate::widgets::navigation::PanelBar;

    fn with_children() -> SlotAssignments {
        SlotAssignments::new().with_element("children", "y-panel")
    }

    fn panel_in(host: &HeadlessHost, parent: ElementKey, attrs: &[(&str, &str)]) -> Mounted<Panel> {
        let panel = Mounted::<Panel>::build(host, attrs);
        host.set_parent(panel.key(), parent);
        panel.assign_slots(with_children());
        panel.attach();
        panel
    }

    #[test]
    fn header_toggles_panels_with_children() {
        let host = HeadlessHost::new();
        let panel = Mounted::<Panel>::build(&host, &[]);
        panel.assign_slots(with_children());
        panel.attach();
        assert_eq!(panel.attribute("data-has-children").as_deref(), Some("true"));

        panel.click(".header");
        assert!(panel.has_attribute("expanded"));
        assert_eq!(panel.events_named("expand").len(), 1);
        assert_eq!(
            panel.events_named("toggle")[0].field("expanded"),
            Some(&json!(true))
        );
        panel.with_view(|view| {
            assert_eq!(
                view.query(".header").and_then(|header| header.attribute("aria-expanded")),
                Some("true")
            );
        });

        panel.key_down(".header", "Enter");
        assert!(!panel.has_attribute("expanded"));
        assert_eq!(
            panel.events_named("collapse")[0].field("expanded"),
            Some(&json!(false))
        );
    }

    #[test]
    fn leaf_panels_emit_select_and_cannot_expand() {
        let host = HeadlessHost::new();
        let panel = mount::<Panel>(&host, &[]);
        assert_eq!(panel.attribute("data-has-children").as_deref(), Some("false"));
        panel.click(".header");
        assert_eq!(
            panel.events_named("select")[0].field("selected"),
            Some(&json!(true))
        );
        panel.invoke("expand", &json!(null)).expect("expand");
        assert!(!panel.has_attribute("expanded"));
    }

    #[test]
    fn losing_children_collapses() {
        let host = HeadlessHost::new();
        let panel = Mounted::<Panel>::build(&host, &[("expanded", "")]);
        panel.assign_slots(with_children());
        panel.attach();
        assert!(panel.has_attribute("expanded"));
        panel.assign_slots(SlotAssignments::new());
        assert!(!panel.has_attribute("expanded"));
        assert_eq!(panel.attribute("data-has-children").as_deref(), Some("false"));
    }

    #[test]
    fn exclusive_panelbar_collapses_siblings_only() {
        let host = HeadlessHost::new();
        let bar = mount::<PanelBar>(&host, &[("exclusive", "")]);
        let first = panel_in(&host, bar.key(), &[]);
        let second = panel_in(&host, bar.key(), &[]);
        let nested = panel_in(&host, first.key(), &[]);
        assert_eq!(nested.attribute("data-is-child").as_deref(), Some("true"));
        assert_eq!(first.attribute("data-is-child").as_deref(), Some("false"));

        first.invoke("expand", &json!(null)).expect("expand");
        nested.invoke("expand", &json!(null)).expect("expand");
        assert!(first.has_attribute("expanded"));
        assert!(nested.has_attribute("expanded"));

        second.click(".header");
        assert!(second.has_attribute("expanded"));
        assert!(!first.has_attribute("expanded"));
        assert_eq!(first.events_named("collapse").len(), 1);
    }

    #[test]
    fn non_exclusive_panelbar_keeps_siblings_open() {
        let host = HeadlessHost::new();
        let bar = mount::<PanelBar>(&host, &[]);
        let first = panel_in(&host, bar.key(), &[("expanded", "")]);
        let second = panel_in(&host, bar.key(), &[]);
        second.click(".header");
        assert!(first.has_attribute("expanded"));
        assert!(second.has_attribute("expanded"));
    }

    #[test]
    fn href_navigates_and_tracks_the_route() {
        let host = HeadlessHost::new();
        let docs = mount::<Panel>(&host, &[("href", "/docs")]);
        let about = mount::<Panel>(&host, &[("href", "/about"), ("history", "false")]);
        assert!(!docs.has_attribute("selected"));

        docs.click(".header");
        assert_eq!(host.navigations(), [("/docs".to_string(), true)]);
        assert!(docs.has_attribute("selected"));
        assert!(docs.events_named("select").is_empty());

        about.click(".header");
        assert_eq!(host.navigations()[1], ("/about".to_string(), false));
    }

    #[test]
    fn route_listener_is_released_on_detach() {
        let host = HeadlessHost::new();
        let panel = mount::<Panel>(&host, &[("href", "/docs")]);
        assert_eq!(
            host.listener_count(ListenTarget::Window, EventKind::Custom(events::POPSTATE)),
            1
        );
        panel.detach();
        assert_eq!(host.total_listeners(), 0);
    }
}
