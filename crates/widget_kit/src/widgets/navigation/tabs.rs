use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use widget_contract::{
    bool_token, el, events, slot,
    style::{Rule, StyleSheet},
    Context, EventKind, RenderContext, Size, Update, View, Widget, WidgetEvent,
};

const CSS: &str = r#"
:host { display: flex; font-family: var(--component-tabs-font-family, var(--font-family-body, sans-serif)); }
:host([position="top"]) { flex-direction: column; }
:host([position="bottom"]) { flex-direction: column-reverse; }
:host([position="left"]) { flex-direction: row; }
:host([position="right"]) { flex-direction: row-reverse; }
.tablist { display: flex; gap: 0; position: relative; z-index: 1; }
:host([position="top"]) .tablist { margin-bottom: -1px; }
:host([position="bottom"]) .tablist { margin-top: -1px; }
:host([position="left"]) .tablist { flex-direction: column; margin-right: -1px; }
:host([position="right"]) .tablist { flex-direction: column; margin-left: -1px; }
:host([position="top"]) .tablist button { border-bottom: none; }
:host([position="bottom"]) .tablist button { border-top: none; }
:host([position="left"]) .tablist button { border-right: none; }
:host([position="right"]) .tablist button { border-left: none; }
button {
  background: var(--base-background-border, #d7dbde);
  color: var(--base-content--, #1d1d1d);
  border: var(--component-tab-border-width, 1px) solid var(--base-background-border, #d7dbde);
  margin: 0;
  cursor: pointer;
  font-size: var(--font-size-label, 0.83em);
  display: inline-flex;
  align-items: center;
  transition: background 0.2s ease;
  outline: none;
  font-family: inherit;
}
:host([position="top"]) .tablist button:first-child { border-top-left-radius: var(--component-tab-border-radius-outer, 4px); }
:host([position="top"]) .tablist button:last-child { border-top-right-radius: var(--component-tab-border-radius-outer, 4px); }
:host([position="bottom"]) .tablist button:first-child { border-bottom-left-radius: var(--component-tab-border-radius-outer, 4px); }
:host([position="bottom"]) .tablist button:last-child { border-bottom-right-radius: var(--component-tab-border-radius-outer, 4px); }
:host([position="left"]) .tablist button:first-child { border-top-left-radius: var(--component-tab-border-radius-outer, 4px); }
:host([position="left"]) .tablist button:last-child { border-bottom-left-radius: var(--component-tab-border-radius-outer, 4px); }
:host([position="right"]) .tablist button:first-child { border-top-right-radius: var(--component-tab-border-radius-outer, 4px); }
:host([position="right"]) .tablist button:last-child { border-bottom-right-radius: var(--component-tab-border-radius-outer, 4px); }
button[aria-selected="true"] { background: var(--base-background-component, #ffffff); }
button:focus-visible { outline: 2px solid var(--primary-content--, #0070f3); outline-offset: -1px; }
button[disabled] { opacity: 0.5; cursor: not-allowed; }
.icon-slot { display: inline-flex; align-items: center; margin: 0 4px; }
.tabpanel {
  position: relative;
  z-index: 0;
  border: var(--component-tab-border-width, 1px) solid var(--base-background-border, #d7dbde);
  border-radius: var(--component-tab-border-radius-outer, 4px);
  padding: var(--spacing-large, 24px);
  background: var(--base-background-component, #ffffff);
}
:host([position="top"]) .tabpanel { border-top-left-radius: 0; margin-top: -1px; }
:host([position="bottom"]) .tabpanel { border-bottom-left-radius: 0; margin-bottom: -1px; }
:host([position="left"]) .tabpanel { border-top-left-radius: 0; margin-left: -1px; }
:host([position="right"]) .tabpanel { border-top-right-radius: 0; margin-right: -1px; }
"#;

const POSITIONS: [&str; 4] = ["top", "bottom", "left", "right"];
const SIZES: [&str; 3] = ["small", "medium", "large"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One entry of the `options` JSON list.
pub struct TabOption {
    /// Tab identity, used by `active` and `change`.
    pub id: String,
    /// Button text.
    #[serde(default)]
    pub label: String,
    /// Light-DOM slot shown while the tab is active.
    #[serde(default)]
    pub slot: Option<String>,
    /// Skipped by activation and keyboard focus.
    #[serde(default)]
    pub disabled: bool,
}

/// Active tab id: the `active` attribute when it names an enabled tab, else the first
/// enabled tab.
pub fn resolve_active<'a>(options: &'a [TabOption], active: Option<&str>) -> Option<&'a TabOption> {
    active
        .and_then(|id| options.iter().find(|tab| tab.id == id && !tab.disabled))
        .or_else(|| options.iter().find(|tab| !tab.disabled))
}

/// Next enabled index from `from` in `step` direction, wrapping around.
fn next_enabled(options: &[TabOption], from: usize, step: isize) -> Option<usize> {
    let len = options.len() as isize;
    (1..=len)
        .map(|offset| (from as isize + step * offset).rem_euclid(len) as usize)
        .find(|index| !options[*index].disabled)
}

#[derive(Debug, Clone)]
/// Tabs messages.
pub enum TabsMsg {
    /// Click, Enter/Space or `activate(id)`.
    Activate(String),
    /// Navigation key pressed on the tab at `index`.
    Key {
        /// Index of the focused tab.
        index: usize,
        /// `KeyboardEvent.key`.
        key: String,
    },
}

#[derive(Debug, Default)]
/// `y-tabs`: tab strip with one visible panel slot.
pub struct Tabs;

impl Tabs {
    /// Rewrites unknown `size`/`position` values and resolves `active`.
    fn normalize(cx: &mut Context<'_, Self>) {
        if !cx.attribute("size").is_some_and(|size| SIZES.contains(&size)) {
            cx.set_attribute("size", "medium");
        }
        if !cx
            .attribute("position")
            .is_some_and(|position| POSITIONS.contains(&position))
        {
            cx.set_attribute("position", "top");
        }
        let options: Vec<TabOption> = cx.attrs().json_list("options");
        let resolved = resolve_active(&options, cx.attribute("active")).map(|tab| tab.id.clone());
        if let Some(id) = resolved {
            if cx.attribute("active") != Some(id.as_str()) {
                cx.set_attribute("active", id);
            }
        }
    }
}

impl Widget for Tabs {
    type Msg = TabsMsg;

    const TAG: &'static str = "y-tabs";
    const OBSERVED: &'static [&'static str] = &["options", "active", "size", "position"];
    const DEFAULTS: &'static [(&'static str, &'static str)] =
        &[("size", "medium"), ("position", "top")];

    fn create() -> Self {
        Self
    }

    fn attached(&mut self, cx: &mut Context<'_, Self>) {
        Self::normalize(cx);
    }

    fn attribute_changed(
        &mut self,
        cx: &mut Context<'_, Self>,
        _name: &str,
        _old: Option<&str>,
        _new: Option<&str>,
    ) -> Update {
        Self::normalize(cx);
        Update::Render
    }

    fn update(&mut self, cx: &mut Context<'_, Self>, msg: TabsMsg) -> Update {
        let options: Vec<TabOption> = cx.attrs().json_list("options");
        match msg {
            TabsMsg::Activate(id) => {
                let enabled = options.iter().any(|tab| tab.id == id && !tab.disabled);
                if !enabled || cx.attribute("active") == Some(id.as_str()) {
                    return Update::None;
                }
                cx.set_attribute("active", id.clone());
                cx.emit(WidgetEvent::new(events::CHANGE, json!({ "id": id })));
            }
            TabsMsg::Key { index, key } => {
                let target = match key.as_str() {
                    "ArrowRight" | "ArrowDown" => next_enabled(&options, index, 1),
                    "ArrowLeft" | "ArrowUp" => next_enabled(&options, index, -1),
                    "Home" => options.iter().position(|tab| !tab.disabled),
                    "End" => options.iter().rposition(|tab| !tab.disabled),
                    _ => None,
                };
                if let Some(target) = target {
                    cx.focus(&format!("button[data-index=\"{target}\"]"));
                }
            }
        }
        Update::None
    }

    fn render(&self, cx: &RenderContext<'_>) -> View<TabsMsg> {
        let options: Vec<TabOption> = cx.attrs.json_list("options");
        let active = resolve_active(&options, cx.attrs.get("active"));
        let active_id = active.map(|tab| tab.id.as_str()).unwrap_or_default();
        let size = Size::parse(cx.attrs.get("size")).token();

        let buttons = options.iter().enumerate().map(|(index, tab)| {
            let is_active = tab.id == active_id;
            let icon_slot = |side: &str| {
                let name = format!("{side}-icon-{}", tab.id);
                cx.slots
                    .has_content(&name)
                    .then(|| slot(Some(name.as_str())).class("icon-slot"))
            };
            let button = el("button")
                .attr("id", format!("tab-{}", tab.id))
                .attr("role", "tab")
                .attr("aria-selected", bool_token(is_active))
                .attr("aria-controls", format!("panel-{}", tab.id))
                .attr("aria-disabled", bool_token(tab.disabled))
                .attr("tabindex", if is_active && !tab.disabled { "0" } else { "-1" })
                .attr("data-id", tab.id.clone())
                .attr("data-index", index.to_string())
                .flag("disabled", tab.disabled)
                .child_opt(icon_slot("left"))
                .child(el("span").text(tab.label.clone()))
                .child_opt(icon_slot("right"));
            if tab.disabled {
                return button;
            }
            let id = tab.id.clone();
            button
                .on(EventKind::Click, TabsMsg::Activate(tab.id.clone()))
                .on_with(EventKind::KeyDown, move |event| {
                    let key = event.key.as_deref()?;
                    let handled = matches!(
                        key,
                        "ArrowRight" | "ArrowLeft" | "ArrowUp" | "ArrowDown" | "Home" | "End"
                    );
                    if event.is_activation_key() {
                        Some(TabsMsg::Activate(id.clone()))
                    } else {
                        handled.then(|| TabsMsg::Key {
                            index,
                            key: key.to_string(),
                        })
                    }
                })
        });

        let sheet = StyleSheet::new(CSS).rule(
            Rule::new("button")
                .decl("padding", format!("var(--component-tab-padding-{size}, 8px 16px)"))
                .decl("gap", format!("var(--component-tab-gap-{size}, 4px)")),
        );
        let content_slot = active
            .and_then(|tab| tab.slot.as_deref())
            .filter(|name| !name.is_empty());

        View::new(sheet)
            .child(
                el("div")
                    .class("tablist")
                    .attr("role", "tablist")
                    .children(buttons),
            )
            .child(
                el("div")
                    .class("tabpanel")
                    .attr("id", format!("panel-{active_id}"))
                    .attr("role", "tabpanel")
                    .attr("aria-labelledby", format!("tab-{active_id}"))
                    .child(slot(content_slot)),
            )
    }

    fn method(name: &str, args: &Value) -> Option<Result<TabsMsg, String>> {
        (name == "activate").then(|| {
            args.as_str()
                .or_else(|| args.get("id").and_then(Value::as_str))
                .map(|id| TabsMsg::Activate(id.to_string()))
                .ok_or_else(|| format!("expected a tab id, got {args}"))
        })
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

    const OPTIONS: &str = r#"[
        {"id":"home","label":"Home","slot":"home"},
        {"id":"files","label":"Files","slot":"files","disabled":true},
        {"id":"settings","label":"Settings","slot":"settings"}
    ]"#;

    fn tabs(host: &HeadlessHost, attrs: &[(&str, &str)]) -> Mounted<Tabs> {
        let mut all = vec![("options", OPTIONS)];
        all.extend_from_slice(attrs);
        mount::<Tabs>(host, &all)
    }

    fn selected(tabs: &Mounted<Tabs>) -> Vec<String> {
        tabs.with_view(|view| {
            view.query_all("button[aria-selected=\"true\"]")
                .iter()
                .filter_map(|button| button.attribute("data-id").map(str::to_string))
                .collect()
        })
    }

    #[test]
    fn missing_or_disabled_active_resolves_to_first_enabled() {
        let host = HeadlessHost::new();
        let plain = tabs(&host, &[]);
        assert_eq!(plain.attribute("active").as_deref(), Some("home"));
        let disabled = tabs(&host, &[("active", "files")]);
        assert_eq!(disabled.attribute("active").as_deref(), Some("home"));
        assert_eq!(selected(&disabled), ["home"]);
    }

    #[test]
    fn activation_emits_change_and_swaps_the_panel_slot() {
        let host = HeadlessHost::new();
        let tabs = tabs(&host, &[]);
        tabs.click("button[data-id=\"settings\"]");
        assert_eq!(tabs.attribute("active").as_deref(), Some("settings"));
        assert_eq!(
            tabs.events_named("change")[0].field("id"),
            Some(&json!("settings"))
        );
        tabs.with_view(|view| {
            let panel = view.query(".tabpanel").expect("panel");
            assert_eq!(panel.attribute("aria-labelledby"), Some("tab-settings"));
            assert!(view.query(".tabpanel slot[name=\"settings\"]").is_some());
        });

        tabs.click("button[data-id=\"settings\"]");
        tabs.click("button[data-id=\"files\"]");
        tabs.invoke("activate", &json!("files")).expect("activate");
        assert_eq!(tabs.events_named("change").len(), 1);
    }

    #[test]
    fn arrows_skip_disabled_tabs_and_wrap() {
        let host = HeadlessHost::new();
        let tabs = tabs(&host, &[]);
        tabs.key_down("button[data-index=\"0\"]", "ArrowRight");
        tabs.key_down("button[data-index=\"2\"]", "ArrowRight");
        tabs.key_down("button[data-index=\"0\"]", "ArrowLeft");
        tabs.key_down("button[data-index=\"2\"]", "Home");
        tabs.key_down("button[data-index=\"0\"]", "End");
        assert_eq!(
            tabs.log().focused,
            [
                "button[data-index=\"2\"]",
                "button[data-index=\"0\"]",
                "button[data-index=\"2\"]",
                "button[data-index=\"0\"]",
                "button[data-index=\"2\"]",
            ]
        );
        assert_eq!(tabs.attribute("active").as_deref(), Some("home"));

        tabs.key_down("button[data-index=\"2\"]", "Enter");
        assert_eq!(tabs.attribute("active").as_deref(), Some("settings"));
    }

    #[test]
    fn aria_wiring_and_roving_tabindex() {
        let host = HeadlessHost::new();
        let tabs = tabs(&host, &[]);
        tabs.with_view(|view| {
            let home = view.query("#tab-home").expect("home tab");
            assert_eq!(home.attribute("aria-controls"), Some("panel-home"));
            assert_eq!(home.attribute("tabindex"), Some("0"));
            let files = view.query("#tab-files").expect("files tab");
            assert!(files.has_attribute("disabled"));
            assert_eq!(files.attribute("aria-disabled"), Some("true"));
            assert_eq!(files.attribute("tabindex"), Some("-1"));
            assert!(view.query("[role=\"tablist\"]").is_some());
        });
    }

    #[test]
    fn invalid_size_and_position_fall_back() {
        let host = HeadlessHost::new();
        let tabs = tabs(&host, &[("size", "huge"), ("position", "middle")]);
        assert_eq!(tabs.attribute("size").as_deref(), Some("medium"));
        assert_eq!(tabs.attribute("position").as_deref(), Some("top"));
        tabs.set_attribute("position", "left");
        assert_eq!(tabs.attribute("position").as_deref(), Some("left"));
    }

    #[test]
    fn icon_slots_render_only_when_assigned() {
        let host = HeadlessHost::new();
        let tabs = tabs(&host, &[]);
        assert!(tabs.with_view(|view| view.query(".icon-slot").is_none()));
        tabs.assign_slots(SlotAssignments::new().with_element("left-icon-home", "svg"));
        tabs.with_view(|view| {
            assert!(view
                .query("#tab-home slot[name=\"left-icon-home\"]")
                .is_some());
        });
    }
}
