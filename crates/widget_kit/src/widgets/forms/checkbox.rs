use serde_json::Value;
use widget_contract::{
    bool_token, el, events, slot,
    style::{Rule, StyleSheet},
    AttributeMap, Context, DomEvent, EventKind, RenderContext, Update, View, Widget, WidgetEvent,
};

use super::LabelPosition;
use crate::icon::IconName;

const BASE_CSS: &str = r#"
:host { display: inline-block; font-family: var(--font-family-body, sans-serif); }
.wrapper { display: inline-flex; align-items: center; gap: var(--spacing-x-small, 6px); }
.checkbox {
  width: 20px;
  height: 20px;
  border: 2px solid var(--base-content--, #1d1d1d);
  border-radius: var(--border-radius-small, 4px);
  display: flex;
  align-items: center;
  justify-content: center;
  background: var(--base-background-component, #ffffff);
  box-sizing: border-box;
  transition: border-color 0.2s ease;
}
.checkbox:hover { border-color: var(--primary-content--, #0070f3); }
.checkbox svg { width: 16px; height: 16px; stroke: var(--primary-content--, #0070f3); color: var(--primary-content--, #0070f3); }
.label { font-size: 0.9em; color: var(--base-content--, #1d1d1d); }
.icon { display: flex; align-items: center; justify-content: center; width: 100%; height: 100%; }
"#;

const DEFAULT_VALUE: &str = "on";

#[derive(Debug, Clone)]
/// Checkbox messages.
pub enum CheckboxMsg {
    /// Click, Space/Enter or `toggle()`.
    Toggle,
}

#[derive(Debug, Default)]
/// `y-checkbox`: tri-state checkbox.
pub struct Checkbox;

impl Widget for Checkbox {
    type Msg = CheckboxMsg;

    const TAG: &'static str = "y-checkbox";
    const OBSERVED: &'static [&'static str] = &[
        "checked",
        "disabled",
        "indeterminate",
        "label-position",
        "name",
        "value",
    ];
    const DEFAULTS: &'static [(&'static str, &'static str)] = &[("label-position", "right")];

    fn create() -> Self {
        Self
    }

    fn update(&mut self, cx: &mut Context<'_, Self>, msg: CheckboxMsg) -> Update {
        match msg {
            CheckboxMsg::Toggle => {
                if cx.has("disabled") {
                    return Update::None;
                }
                if cx.has("indeterminate") {
                    cx.remove_attribute("indeterminate");
                    cx.set_flag("checked", true);
                } else {
                    let checked = cx.has("checked");
                    cx.set_flag("checked", !checked);
                }
                cx.emit(WidgetEvent::bare(events::CHANGE));
                Update::None
            }
        }
    }

    fn render(&self, cx: &RenderContext<'_>) -> View<CheckboxMsg> {
        let attrs = cx.attrs;
        let disabled = attrs.has("disabled");
        let checked = attrs.has("checked");
        let indeterminate = attrs.has("indeterminate");
        let position = LabelPosition::parse(attrs.get("label-position"), LabelPosition::Right);
        let aria_checked = if indeterminate {
            "mixed"
        } else {
            bool_token(checked)
        };
        let icon = if indeterminate {
            Some(IconName::Indeterminate)
        } else if checked {
            Some(IconName::Checkmark)
        } else {
            None
        };

        let sheet = StyleSheet::new(BASE_CSS)
            .rule(
                Rule::new(":host")
                    .decl("cursor", if disabled { "not-allowed" } else { "pointer" })
                    .decl("opacity", if disabled { "0.6" } else { "1" }),
            )
            .rule(Rule::new(".wrapper").decl("flex-direction", position.flex_direction()));

        let toggle_on_key = |event: &DomEvent| {
            event.is_activation_key().then_some(CheckboxMsg::Toggle)
        };
        View::new(sheet).child(
            el("div")
                .class("wrapper")
                .child(
                    el("div")
                        .class("checkbox")
                        .attr("part", "checkbox")
                        .attr("role", "checkbox")
                        .attr("tabindex", if disabled { "-1" } else { "0" })
                        .attr("aria-checked", aria_checked)
                        .attr("aria-disabled", bool_token(disabled))
                        .on(EventKind::Click, CheckboxMsg::Toggle)
                        .on_with(EventKind::KeyDown, toggle_on_key)
                        .child(
                            el("span")
                                .class("icon")
                                .child_opt(icon.map(IconName::render::<CheckboxMsg>)),
                        ),
                )
                .child(el("label").class("label").attr("part", "label").child(slot(None))),
        )
    }

    fn form_value(&self, attrs: &AttributeMap) -> Option<String> {
        attrs
            .has("checked")
            .then(|| attrs.non_empty("value").unwrap_or(DEFAULT_VALUE).to_string())
    }

    fn method(name: &str, _args: &Value) -> Option<Result<CheckboxMsg, String>> {
        (name == "toggle").then_some(Ok(CheckboxMsg::Toggle))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use widget_contract::{
        headless::{mount, HeadlessHost},
        AnyWidget, FormData, WidgetInstance,
    };

    use super::*;

    fn aria_checked(checkbox: &WidgetInstance<Checkbox>) -> Option<String> {
        checkbox.with_view(|view| {
            view.query(".checkbox")
                .and_then(|element| element.attribute("aria-checked"))
                .map(str::to_string)
        })
    }

    #[test]
    fn activation_clears_indeterminate_and_checks() {
        let host = HeadlessHost::new();
        let checkbox = mount::<Checkbox>(&host, &[("indeterminate", "")]);
        assert_eq!(aria_checked(&checkbox).as_deref(), Some("mixed"));
        checkbox.click(".checkbox");
        assert!(!checkbox.has_attribute("indeterminate"));
        assert!(checkbox.has_attribute("checked"));
        assert_eq!(aria_checked(&checkbox).as_deref(), Some("true"));
        assert_eq!(checkbox.events_named("change").len(), 1);
    }

    #[test]
    fn keyboard_toggles_and_disabled_blocks() {
        let host = HeadlessHost::new();
        let checkbox = mount::<Checkbox>(&host, &[]);
        checkbox.key_down(".checkbox", " ");
        assert!(checkbox.has_attribute("checked"));
        checkbox.key_down(".checkbox", "Enter");
        assert!(!checkbox.has_attribute("checked"));
        checkbox.set_flag("disabled", true);
        checkbox.click(".checkbox");
        assert!(!checkbox.has_attribute("checked"));
    }

    #[test]
    fn checked_value_is_submitted_under_name() {
        let host = HeadlessHost::new();
        let checkbox = mount::<Checkbox>(
            &host,
            &[("name", "agree"), ("value", "yes"), ("checked", "")],
        );
        let form = FormData::collect([checkbox.instance() as &dyn AnyWidget]);
        assert_eq!(form.get("agree"), Some("yes"));

        checkbox.invoke("toggle", &json!(null)).expect("toggle");
        let form = FormData::collect([checkbox.instance() as &dyn AnyWidget]);
        assert_eq!(form.get("agree"), None);
    }

    #[test]
    fn value_defaults_to_on() {
        let host = HeadlessHost::new();
        let checkbox = mount::<Checkbox>(&host, &[("name", "opt"), ("checked", "")]);
        assert_eq!(
            checkbox.form_entry(),
            Some(("opt".to_string(), "on".to_string()))
        );
        assert_eq!(checkbox.attribute("label-position").as_deref(), Some("right"));
    }
}
