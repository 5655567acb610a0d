use serde_json::Value;
use widget_contract::{
    bool_token, el, events, flag_enabled, slot,
    style::{var, SWITCH_HEIGHT},
    AttributeMap, Context, DomEvent, EventKind, Patch, RenderContext, Size, Update, View, Widget,
    WidgetEvent,
};

use super::LabelPosition;

const CSS: &str = r#"
:host {
  display: inline-flex;
  flex-direction: var(--switch-dir, column-reverse);
  align-items: center;
  gap: var(--spacing-x-small, 4px);
  font-family: var(--font-family-body, sans-serif);
}
label { font-size: var(--font-size-label, 0.83em); color: var(--base-content--, #1d1d1d); }
.switch {
  position: relative;
  display: inline-flex;
  align-items: center;
  background: var(--base-background-component, #ffffff);
  border: var(--component-switch-border-width, 1px) solid var(--base-background-border, #d7dbde);
  border-radius: var(--component-switch-border-radius, 4px);
  cursor: pointer;
  height: var(--switch-height);
  font-size: var(--switch-font-size);
  box-sizing: border-box;
  padding: 2px;
  width: max-content;
}
.track { display: flex; align-items: center; height: 100%; position: relative; z-index: 0; }
.label-content {
  flex: 0 0 auto;
  align-items: center;
  justify-content: center;
  padding: 0 8px;
  white-space: nowrap;
  position: relative;
  z-index: 0;
  color: var(--base-content-light, #6b6f72);
  display: var(--show-labels, flex);
}
.toggle {
  position: absolute;
  top: 2px;
  bottom: 2px;
  left: 2px;
  height: calc(100% - 4px);
  background: var(--toggle-bg, var(--base-content-light, #6b6f72));
  color: var(--base-background-component, #ffffff);
  border-radius: var(--component-switch-border-radius, 4px);
  display: flex;
  align-items: center;
  justify-content: center;
  padding: 0 8px;
  font-weight: 500;
  z-index: 1;
  white-space: nowrap;
  transform: translateX(var(--toggle-x, 0));
  transition: var(--toggle-transition, transform 0.25s ease, background 0.25s ease);
}
.toggle .on, .toggle .off { display: none; }
:host([checked]) .toggle .on { display: inline-flex; }
:host(:not([checked])) .toggle .off { display: inline-flex; }
:host([animate="false"]) .toggle { transition: none !important; }
:host([disabled]) { opacity: 0.6; pointer-events: none; }
"#;

const DEFAULT_VALUE: &str = "on";

#[derive(Debug, Clone)]
/// Switch messages.
pub enum SwitchMsg {
    /// Click, Space/Enter or `toggle()`.
    Toggle,
}

#[derive(Debug, Default)]
/// `y-switch`: on/off toggle whose thumb is driven by host custom properties.
pub struct Switch;

impl Switch {
    fn apply_host_styles(cx: &mut Context<'_, Self>) {
        let size = Size::parse(cx.attribute("size"));
        let checked = cx.has("checked");
        let font_size = match size {
            Size::Small => var("--font-size-small", "12px"),
            Size::Medium => var("--font-size-label", "0.83em"),
            Size::Large => var("--font-size-h4", "1.2em"),
        };
        let position = LabelPosition::parse(cx.attribute("label-position"), LabelPosition::Top);
        let animate = flag_enabled(cx.attribute("animate"), true);
        let show_labels = flag_enabled(cx.attribute("label-display"), true);

        cx.set_host_style("--switch-height", SWITCH_HEIGHT.literal(size));
        cx.set_host_style("--switch-font-size", font_size);
        cx.set_host_style("--toggle-x", if checked { "100%" } else { "0" });
        cx.set_host_style(
            "--toggle-bg",
            if checked {
                var("--primary-content--", "#0070f3")
            } else {
                var("--base-content-light", "#6b6f72")
            },
        );
        cx.set_host_style(
            "--toggle-transition",
            if animate {
                "transform 0.25s ease, background 0.25s ease"
            } else {
                "none"
            },
        );
        cx.set_host_style("--show-labels", if show_labels { "flex" } else { "none" });
        cx.set_host_style("--switch-dir", position.flex_direction());
    }
}

impl Widget for Switch {
    type Msg = SwitchMsg;

    const TAG: &'static str = "y-switch";
    const OBSERVED: &'static [&'static str] = &[
        "checked",
        "disabled",
        "animate",
        "label-display",
        "label-position",
        "size",
        "value",
        "name",
    ];
    const DEFAULTS: &'static [(&'static str, &'static str)] = &[
        ("size", "medium"),
        ("label-display", "true"),
        ("label-position", "top"),
        ("animate", "true"),
    ];

    fn create() -> Self {
        Self
    }

    fn attached(&mut self, cx: &mut Context<'_, Self>) {
        Self::apply_host_styles(cx);
    }

    fn attribute_changed(
        &mut self,
        cx: &mut Context<'_, Self>,
        name: &str,
        _old: Option<&str>,
        _new: Option<&str>,
    ) -> Update {
        Self::apply_host_styles(cx);
        match name {
            "checked" | "disabled" => Update::Patch(vec![
                Patch::attribute(".switch", "aria-checked", bool_token(cx.has("checked"))),
                Patch::attribute(".switch", "aria-disabled", bool_token(cx.has("disabled"))),
                Patch::attribute(".switch", "tabindex", if cx.has("disabled") { "-1" } else { "0" }),
            ]),
            "label-position" => Update::Render,
            _ => Update::None,
        }
    }

    fn update(&mut self, cx: &mut Context<'_, Self>, msg: SwitchMsg) -> Update {
        match msg {
            SwitchMsg::Toggle => {
                if cx.has("disabled") {
                    return Update::None;
                }
                let checked = cx.has("checked");
                cx.set_flag("checked", !checked);
                cx.emit(WidgetEvent::bare(events::CHANGE));
                Update::None
            }
        }
    }

    fn render(&self, cx: &RenderContext<'_>) -> View<SwitchMsg> {
        let attrs = cx.attrs;
        let checked = attrs.has("checked");
        let disabled = attrs.has("disabled");
        let off_text = cx.slots.text("off-label").unwrap_or_else(|| "Off".to_string());
        let on_text = cx.slots.text("on-label").unwrap_or_else(|| "On".to_string());

        let fallback_slot = |name: &str, fallback: &str| slot(Some(name)).text(fallback);
        let toggle_on_key = |event: &DomEvent| event.is_activation_key().then_some(SwitchMsg::Toggle);

        View::new(CSS)
            .child(
                el("div")
                    .class("switch")
                    .attr("part", "switch")
                    .attr("tabindex", if disabled { "-1" } else { "0" })
                    .attr("role", "switch")
                    .attr("aria-checked", bool_token(checked))
                    .attr("aria-disabled", bool_token(disabled))
                    .on(EventKind::Click, SwitchMsg::Toggle)
                    .on_with(EventKind::KeyDown, toggle_on_key)
                    .child(
                        el("div")
                            .class("track")
                            .child(el("div").class("label-content").child(fallback_slot("off-label", "Off")))
                            .child(el("div").class("label-content").child(fallback_slot("on-label", "On"))),
                    )
                    .child(
                        el("div")
                            .class("toggle")
                            .attr("part", "toggle")
                            .child(el("span").class("off").text(off_text))
                            .child(el("span").class("on").text(on_text)),
                    ),
            )
            .child(el("label").child(slot(Some("label"))))
    }

    fn form_value(&self, attrs: &AttributeMap) -> Option<String> {
        let value = attrs.non_empty("value").unwrap_or(DEFAULT_VALUE);
        Some(if attrs.has("checked") { value.to_string() } else { String::new() })
    }

    fn method(name: &str, _args: &Value) -> Option<Result<SwitchMsg, String>> {
        (name == "toggle").then_some(Ok(SwitchMsg::Toggle))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use widget_contract::{
        headless::{mount, HeadlessHost},
        SlotAssignments,
    };

    use super::*;

    #[test]
    fn toggle_moves_the_thumb_and_submits_value() {
        let host = HeadlessHost::new();
        let switch = mount::<Switch>(&host, &[("name", "wifi")]);
        assert_eq!(switch.host_style("--toggle-x").as_deref(), Some("0"));
        assert_eq!(
            switch.form_entry(),
            Some(("wifi".to_string(), String::new()))
        );

        switch.click(".switch");
        assert!(switch.has_attribute("checked"));
        assert_eq!(switch.host_style("--toggle-x").as_deref(), Some("100%"));
        assert_eq!(
            switch.form_entry(),
            Some(("wifi".to_string(), "on".to_string()))
        );
        assert_eq!(switch.events_named("change").len(), 1);
    }

    #[test]
    fn keyboard_and_method_toggle_unless_disabled() {
        let host = HeadlessHost::new();
        let switch = mount::<Switch>(&host, &[]);
        switch.key_down(".switch", "Enter");
        assert!(switch.has_attribute("checked"));
        switch.invoke("toggle", &json!(null)).expect("toggle");
        assert!(!switch.has_attribute("checked"));

        switch.set_flag("disabled", true);
        switch.click(".switch");
        assert!(!switch.has_attribute("checked"));
        switch.with_view(|view| {
            assert_eq!(
                view.query(".switch").and_then(|element| element.attribute("aria-disabled")),
                Some("true")
            );
        });
    }

    #[test]
    fn size_and_options_drive_host_properties() {
        let host = HeadlessHost::new();
        let switch = mount::<Switch>(
            &host,
            &[("size", "large"), ("animate", "false"), ("label-display", "false")],
        );
        assert_eq!(switch.host_style("--switch-height").as_deref(), Some("40px"));
        assert_eq!(switch.host_style("--toggle-transition").as_deref(), Some("none"));
        assert_eq!(switch.host_style("--show-labels").as_deref(), Some("none"));
        assert_eq!(switch.attribute("label-position").as_deref(), Some("top"));
    }

    #[test]
    fn thumb_mirrors_slotted_labels_with_fallbacks() {
        let host = HeadlessHost::new();
        let switch = mount::<Switch>(&host, &[]);
        let thumb_text = || {
            switch.with_view(|view| {
                view.query(".toggle")
                    .map(|toggle| toggle.text_content())
                    .unwrap_or_default()
            })
        };
        assert_eq!(thumb_text(), "OffOn");
        switch.assign_slots(SlotAssignments::new().with_text("on-label", "Yes"));
        assert_eq!(thumb_text(), "OffYes");
    }
}
