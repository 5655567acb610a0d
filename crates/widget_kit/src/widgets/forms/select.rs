use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use widget_contract::{
    el, events,
    overlay::{place, Direction},
    slot,
    style::{Rule, StyleSheet},
    AttributeMap, Context, EventKind, Patch, RenderContext, Subscription, Update, View, Widget,
    WidgetEvent,
};

use super::LabelPosition;
use crate::{anchoring::dismissal, icon::IconName};

const BASE_CSS: &str = r#"
:host { display: block; font-family: var(--font-family-body, sans-serif); color: var(--base-content--, #1d1d1d); }
.select-wrapper { display: flex; gap: var(--spacing-2x-small, 4px); position: relative; }
.select-container {
  display: flex;
  align-items: center;
  gap: var(--spacing-x-small, 4px);
  background: var(--base-background-app, #f1f6fa);
  border: var(--component-inputs-border-width, 1px) solid var(--base-background-border, #d7dbde);
  border-radius: var(--component-inputs-border-radius-outer, 4px);
  padding: var(--component-inputs-padding-medium, 8px);
  box-sizing: border-box;
  transition: border-color 0.2s ease-in-out;
  cursor: pointer;
}
.select-container:hover { border-color: var(--base-content--, #1d1d1d); }
.select-container:focus-within { border-color: var(--primary-content--, #0070f3); }
.select-container.is-invalid { border-color: var(--error-background-border, #eda7af); background: var(--error-background-component, #fbe9eb); }
.select-container.is-invalid:hover, .select-container.is-invalid:focus-within { border-color: var(--error-content--, #dc3545); }
.label-wrapper.is-invalid ::slotted([slot="label"]) { color: var(--error-content--, #dc3545); }
::slotted([slot="label"]) { font-weight: 500; font-size: 0.875em; color: var(--base-content-light, #6b6f72); }
.dropdown {
  position: fixed;
  z-index: 1000;
  background: var(--base-background-app, #f1f6fa);
  border: 1px solid var(--base-background-border, #d7dbde);
  border-radius: var(--component-inputs-border-radius-outer, 4px);
  box-shadow: 0 2px 8px rgba(0, 0, 0, 0.1);
  max-height: 200px;
  overflow-y: auto;
  box-sizing: border-box;
  display: none;
}
.dropdown.open { display: block; }
.dropdown-item { padding: var(--spacing-small, 6px); cursor: pointer; }
.dropdown-item:hover { background: var(--base-background-hover, #e6ebef); }
.dropdown-item.selected { background: var(--primary-content--, #0070f3); color: var(--base-background-component, #ffffff); }
.value-display { flex: 1; font-size: 1em; color: inherit; display: flex; flex-wrap: wrap; gap: var(--spacing-x-small, 4px); }
.chevron-icon { display: flex; align-items: center; justify-content: center; margin-left: auto; }
.chevron-icon svg { width: 20px; height: 20px; transition: transform 0.2s ease; transform-origin: center; }
.select-container.open .chevron-icon svg { transform: scaleY(-1); }
"#;

/// Height budget used to decide whether the dropdown flips above the field.
const DROPDOWN_MAX_HEIGHT: f64 = 200.0;

const DEFAULT_PLACEHOLDER: &str = "Select...";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One entry of the `options` JSON list.
pub struct SelectOption {
    /// Submitted value.
    pub value: String,
    /// Visible text.
    #[serde(default)]
    pub label: String,
}

/// Selected values, read from the `value` attribute on every access.
///
/// Multi-select values are comma-joined; blanks and duplicates are dropped and the
/// first occurrence keeps its position.
pub fn selected_values(attrs: &AttributeMap) -> Vec<String> {
    let raw = attrs.get("value").unwrap_or_default();
    if !attrs.has("multiple") {
        return if raw.is_empty() {
            Vec::new()
        } else {
            vec![raw.to_string()]
        };
    }
    let mut values: Vec<String> = Vec::new();
    for value in raw.split(',').map(str::trim).filter(|value| !value.is_empty()) {
        if !values.iter().any(|known| known == value) {
            values.push(value.to_string());
        }
    }
    values
}

fn display_text(attrs: &AttributeMap, options: &[SelectOption], selected: &[String]) -> String {
    let placeholder = || {
        attrs
            .non_empty("placeholder")
            .unwrap_or(DEFAULT_PLACEHOLDER)
            .to_string()
    };
    if attrs.has("multiple") {
        let count = options
            .iter()
            .filter(|option| selected.contains(&option.value))
            .count();
        return if count > 0 {
            format!("{count} Selected")
        } else {
            placeholder()
        };
    }
    options
        .iter()
        .find(|option| selected.first() == Some(&option.value))
        .map(|option| option.label.clone())
        .filter(|label| !label.is_empty())
        .unwrap_or_else(placeholder)
}

fn is_invalid(attrs: &AttributeMap) -> bool {
    attrs.has("invalid") || (attrs.has("required") && selected_values(attrs).is_empty())
}

#[derive(Debug, Clone)]
/// Select messages.
pub enum SelectMsg {
    /// Field clicked.
    Toggle,
    /// Outside click, Escape or a finished choice.
    Close,
    /// Window scrolled or resized while open.
    Reposition,
    /// Dropdown item activated.
    Choose(String),
    /// A tag's remove button was pressed.
    RemoveTag(String),
    /// `clear()`.
    Clear,
}

#[derive(Debug, Default)]
/// `y-select`: single or multiple choice dropdown, optionally showing choices as tags.
pub struct Select {
    open: bool,
    dismiss: Vec<Subscription>,
}

impl Select {
    fn commit(cx: &mut Context<'_, Self>, values: &[String]) {
        let value = values.join(",");
        cx.set_attribute("value", value.clone());
        cx.emit(WidgetEvent::new(events::CHANGE, json!({ "value": value })));
    }

    fn placement_patches(cx: &Context<'_, Self>) -> Vec<Patch> {
        let Some(anchor) = cx.host().element_rect(cx.key()) else {
            return Vec::new();
        };
        let viewport = cx.host().viewport();
        let placement = place(
            anchor,
            anchor.width,
            DROPDOWN_MAX_HEIGHT.min(viewport.height),
            viewport,
            Direction::Down,
        );
        vec![
            Patch::style(".dropdown", "left", format!("{}px", placement.left)),
            Patch::style(".dropdown", "top", format!("{}px", placement.top)),
            Patch::style(".dropdown", "width", format!("{}px", anchor.width)),
        ]
    }

    fn open_patches(&self) -> Vec<Patch> {
        vec![
            Patch::class(".dropdown", "open", self.open),
            Patch::class(".select-container", "open", self.open),
            Patch::attribute(
                ".select-container",
                "aria-expanded",
                if self.open { "true" } else { "false" },
            ),
        ]
    }

    fn show(&mut self, cx: &mut Context<'_, Self>) -> Update {
        self.open = true;
        self.dismiss = dismissal(cx, None, SelectMsg::Close, Some(SelectMsg::Reposition));
        let mut patches = Self::placement_patches(cx);
        patches.extend(self.open_patches());
        Update::Patch(patches)
    }

    fn hide(&mut self) -> Update {
        if !self.open {
            return Update::None;
        }
        self.open = false;
        self.dismiss.clear();
        Update::Patch(self.open_patches())
    }
}

impl Widget for Select {
    type Msg = SelectMsg;

    const TAG: &'static str = "y-select";
    const OBSERVED: &'static [&'static str] = &[
        "label-position",
        "disabled",
        "invalid",
        "required",
        "value",
        "name",
        "placeholder",
        "options",
        "multiple",
        "display-mode",
    ];
    const DEFAULTS: &'static [(&'static str, &'static str)] = &[("label-position", "top")];

    fn create() -> Self {
        Self::default()
    }

    fn attribute_changed(
        &mut self,
        cx: &mut Context<'_, Self>,
        name: &str,
        _old: Option<&str>,
        _new: Option<&str>,
    ) -> Update {
        match name {
            "name" => Update::None,
            "disabled" if cx.has("disabled") => {
                self.hide();
                Update::Render
            }
            _ => Update::Render,
        }
    }

    fn update(&mut self, cx: &mut Context<'_, Self>, msg: SelectMsg) -> Update {
        if cx.has("disabled") {
            return self.hide();
        }
        match msg {
            SelectMsg::Toggle if self.open => self.hide(),
            SelectMsg::Toggle => self.show(cx),
            SelectMsg::Close => self.hide(),
            SelectMsg::Reposition if self.open => Update::Patch(Self::placement_patches(cx)),
            SelectMsg::Reposition => Update::None,
            SelectMsg::Choose(value) => {
                let required = cx.has("required");
                let mut selected = selected_values(cx.attrs());
                if cx.has("multiple") {
                    match selected.iter().position(|known| *known == value) {
                        Some(index) if !required || selected.len() > 1 => {
                            selected.remove(index);
                        }
                        Some(_) => {}
                        None => selected.push(value),
                    }
                } else if selected.first() == Some(&value) && !required {
                    selected.clear();
                } else {
                    selected = vec![value];
                }
                Self::commit(cx, &selected);
                self.hide()
            }
            SelectMsg::RemoveTag(value) => {
                let mut selected = selected_values(cx.attrs());
                if cx.has("required") && selected.len() <= 1 {
                    return Update::None;
                }
                selected.retain(|known| *known != value);
                Self::commit(cx, &selected);
                Update::None
            }
            SelectMsg::Clear => {
                Self::commit(cx, &[]);
                self.hide()
            }
        }
    }

    fn render(&self, cx: &RenderContext<'_>) -> View<SelectMsg> {
        let attrs = cx.attrs;
        let options: Vec<SelectOption> = attrs.json_list("options");
        let selected = selected_values(attrs);
        let invalid = is_invalid(attrs);
        let disabled = attrs.has("disabled");
        let tag_mode = attrs.has("multiple") && attrs.get("display-mode") == Some("tag");
        let position = LabelPosition::parse(attrs.get("label-position"), LabelPosition::Top);

        let sheet = StyleSheet::new(BASE_CSS)
            .rule(
                Rule::new(":host")
                    .decl("opacity", if disabled { "0.75" } else { "1" })
                    .decl("pointer-events", if disabled { "none" } else { "auto" }),
            )
            .rule(Rule::new(".select-wrapper").decl("flex-direction", position.flex_direction()));

        let display = if tag_mode {
            let tags = options
                .iter()
                .filter(|option| selected.contains(&option.value))
                .map(|option| {
                    let value = option.value.clone();
                    el("y-tag")
                        .attr("removable", "")
                        .attr("color", "primary")
                        .attr("style-type", "filled")
                        .attr("data-value", option.value.clone())
                        .text(option.label.clone())
                        .on_with(EventKind::Custom(events::REMOVE), move |_| {
                            Some(SelectMsg::RemoveTag(value.clone()))
                        })
                });
            el("div").class("value-display").children(tags)
        } else {
            el("div")
                .class("value-display")
                .text(display_text(attrs, &options, &selected))
        };

        let items = options.iter().map(|option| {
            let chosen = selected.contains(&option.value);
            el("div")
                .class("dropdown-item")
                .class_if(chosen, "selected")
                .attr("role", "option")
                .attr("aria-selected", if chosen { "true" } else { "false" })
                .attr("data-value", option.value.clone())
                .text(option.label.clone())
                .on(EventKind::Click, SelectMsg::Choose(option.value.clone()))
        });

        View::new(sheet).child(
            el("div")
                .class("select-wrapper")
                .child(
                    el("div")
                        .class("select-container")
                        .class_if(invalid, "is-invalid")
                        .class_if(self.open, "open")
                        .attr("part", "select")
                        .attr("role", "combobox")
                        .attr("tabindex", if disabled { "-1" } else { "0" })
                        .attr("aria-haspopup", "listbox")
                        .attr("aria-expanded", if self.open { "true" } else { "false" })
                        .on(EventKind::Click, SelectMsg::Toggle)
                        .child(display)
                        .child(
                            el("div")
                                .class("chevron-icon")
                                .attr("part", "chevron-icon")
                                .child(IconName::ChevronDown.render()),
                        ),
                )
                .child(
                    el("div")
                        .class("label-wrapper")
                        .class_if(invalid, "is-invalid")
                        .child(slot(Some("label"))),
                )
                .child(
                    el("div")
                        .class("dropdown")
                        .class_if(self.open, "open")
                        .attr("part", "dropdown")
                        .attr("role", "listbox")
                        .attr_opt("aria-multiselectable", attrs.has("multiple").then_some("true"))
                        .children(items),
                ),
        )
    }

    fn detached(&mut self, _cx: &mut Context<'_, Self>) {
        self.open = false;
        self.dismiss.clear();
    }

    fn form_value(&self, attrs: &AttributeMap) -> Option<String> {
        Some(selected_values(attrs).join(","))
    }

    fn method(name: &str, _args: &Value) -> Option<Result<SelectMsg, String>> {
        (name == "clear").then_some(Ok(SelectMsg::Clear))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use widget_contract::{
        headless::{mount, HeadlessHost, Mounted},
        DomEvent, ListenTarget,
    };

    use super::*;

    const FRUIT: &str = r#"[{"value":"apple","label":"Apple"},{"value":"banana","label":"Banana"},{"value":"cherry","label":"Cherry"}]"#;

    fn selected_items(select: &Mounted<Select>) -> usize {
        select.with_view(|view| view.query_all(".dropdown-item.selected").len())
    }

    fn display(select: &Mounted<Select>) -> String {
        select.with_view(|view| {
            view.query(".value-display")
                .map(|display| display.text_content())
                .unwrap_or_default()
        })
    }

    #[test]
    fn multiple_tags_remove_from_the_comma_joined_value() {
        let host = HeadlessHost::new();
        let select = mount::<Select>(
            &host,
            &[
                ("options", FRUIT),
                ("multiple", ""),
                ("display-mode", "tag"),
                ("value", "apple,banana"),
            ],
        );
        assert_eq!(selected_items(&select), 2);

        select.fire(
            r#"y-tag[data-value="apple"]"#,
            EventKind::Custom(events::REMOVE),
            DomEvent::default(),
        );
        assert_eq!(select.attribute("value").as_deref(), Some("banana"));
        assert_eq!(selected_items(&select), 1);
        assert_eq!(
            select.events_named("change")[0].field("value"),
            Some(&json!("banana"))
        );
    }

    #[test]
    fn removing_a_tag_leaves_the_dropdown_closed() {
        let host = HeadlessHost::new();
        let select = mount::<Select>(
            &host,
            &[
                ("options", FRUIT),
                ("multiple", ""),
                ("display-mode", "tag"),
                ("value", "apple,banana"),
            ],
        );
        let tag = mount::<crate::widgets::controls::Tag>(&host, &[("removable", "")]);
        assert!(tag.with_view(|view| view.stops_propagation(".remove", EventKind::Click)));

        select.fire(
            r#"y-tag[data-value="banana"]"#,
            EventKind::Custom(events::REMOVE),
            DomEvent::default(),
        );
        assert_eq!(select.attribute("value").as_deref(), Some("apple"));
        assert!(select.with_view(|view| view.query(".select-container.open").is_none()));
    }

    #[test]
    fn required_keeps_the_last_selection() {
        let host = HeadlessHost::new();
        let select = mount::<Select>(
            &host,
            &[
                ("options", FRUIT),
                ("multiple", ""),
                ("display-mode", "tag"),
                ("required", ""),
                ("value", "cherry"),
            ],
        );
        select.fire(
            r#"y-tag[data-value="cherry"]"#,
            EventKind::Custom(events::REMOVE),
            DomEvent::default(),
        );
        assert_eq!(select.attribute("value").as_deref(), Some("cherry"));
        select.send(SelectMsg::Choose("cherry".to_string()));
        assert_eq!(select.attribute("value").as_deref(), Some("cherry"));
    }

    #[test]
    fn display_text_counts_placeholder_and_label() {
        let host = HeadlessHost::new();
        let multi = mount::<Select>(&host, &[("options", FRUIT), ("multiple", "")]);
        assert_eq!(display(&multi), "Select...");
        multi.set_attribute("value", "apple, cherry");
        assert_eq!(display(&multi), "2 Selected");

        let single = mount::<Select>(&host, &[("options", FRUIT), ("placeholder", "Pick")]);
        assert_eq!(display(&single), "Pick");
        single.set_attribute("value", "banana");
        assert_eq!(display(&single), "Banana");
    }

    #[test]
    fn choosing_toggles_single_value_and_closes() {
        let host = HeadlessHost::new();
        let select = mount::<Select>(&host, &[("options", FRUIT), ("name", "fruit")]);
        select.click(".select-container");
        assert!(select.with_view(|view| view.query(".dropdown.open").is_some()));
        assert_eq!(host.listener_count(ListenTarget::Document, EventKind::Click), 1);

        select.click(r#".dropdown-item[data-value="banana"]"#);
        assert_eq!(select.attribute("value").as_deref(), Some("banana"));
        assert_eq!(
            select.form_entry(),
            Some(("fruit".to_string(), "banana".to_string()))
        );
        assert!(select.with_view(|view| view.query(".dropdown.open").is_none()));
        assert_eq!(host.total_listeners(), 0);

        select.send(SelectMsg::Choose("banana".to_string()));
        assert_eq!(select.attribute("value").as_deref(), Some(""));
    }

    #[test]
    fn outside_click_and_escape_close_the_dropdown() {
        let host = HeadlessHost::new();
        let select = mount::<Select>(&host, &[("options", FRUIT)]);
        select.click(".select-container");
        host.click_outside();
        assert!(select.with_view(|view| view.query(".dropdown.open").is_none()));

        select.click(".select-container");
        host.press_key("Escape");
        assert!(select.with_view(|view| view.query(".dropdown.open").is_none()));
        assert_eq!(host.total_listeners(), 0);
    }

    #[test]
    fn required_without_selection_is_invalid_and_clear_empties() {
        let host = HeadlessHost::new();
        let select = mount::<Select>(&host, &[("options", FRUIT), ("value", "apple")]);
        select.invoke("clear", &json!(null)).expect("clear");
        assert_eq!(select.attribute("value").as_deref(), Some(""));

        select.set_flag("required", true);
        assert!(select.with_view(|view| view.query(".select-container.is-invalid").is_some()));
    }
}
