use serde_json::{Map, Value};
use widget_contract::{
    bool_token, el, slot,
    slots::hide_if_empty,
    style::{Rule, StyleSheet, CONTROL_HEIGHT, INNER_SPACING, SPACING},
    ColorRole, Context, EventKind, RenderContext, SemanticColor, Size, Update, View, Widget,
    WidgetColor, WidgetEvent,
};

const BASE_CSS: &str = r#"
:host { display: inline-block; }
.button {
  box-sizing: border-box;
  display: inline-flex;
  gap: var(--gap, 8px);
  min-height: var(--button-min-height, 35px);
  min-width: var(--button-min-width, 35px);
  padding: var(--content-padding, 4px) var(--button-padding, 8px);
  justify-content: center;
  align-items: center;
  position: relative;
  overflow: hidden;
  border-radius: var(--border-radius-medium, 4px);
  border: var(--border-width-small, 1px) solid var(--border-color, #1d1d1d);
  background: var(--background-color, #f1f6fa);
  color: var(--text-color, #1d1d1d);
  transition: background-color 0.1s, color 0.1s, border-color 0.1s;
  cursor: pointer;
  width: 100%;
  font-family: var(--font-family-body, sans-serif);
  font-size: var(--font-size-paragraph, 14px);
}
.button:hover:not(:disabled) { background: var(--hover-background-color); color: var(--hover-text-color); }
.button:focus-visible:not(:disabled) { background: var(--focus-background-color); color: var(--focus-text-color); }
.button:active:not(:disabled) { background: var(--active-background-color); color: var(--active-text-color); }
.button:disabled { cursor: not-allowed; opacity: 0.5; }
.icon { display: flex; min-width: 16px; justify-content: center; }
"#;

/// Host attributes mirrored onto the inner native button.
const MIRRORED: [&str; 6] = ["type", "name", "value", "aria-label", "aria-pressed", "aria-hidden"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Fill treatment of a button or tag.
pub enum StyleType {
    /// Colored border and text on the app background.
    #[default]
    Outlined,
    /// Solid content-colored background.
    Filled,
    /// No visible border.
    Flat,
}

impl StyleType {
    /// Attribute token.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Outlined => "outlined",
            Self::Filled => "filled",
            Self::Flat => "flat",
        }
    }

    /// Parses a `style-type` attribute, falling back to `default`.
    pub fn parse(raw: Option<&str>, default: Self) -> Self {
        match raw.map(str::trim) {
            Some("outlined") => Self::Outlined,
            Some("filled") => Self::Filled,
            Some("flat") => Self::Flat,
            _ => default,
        }
    }
}

#[derive(Debug, Clone)]
/// Button messages.
pub enum ButtonMsg {
    /// Inner button activated.
    Click,
}

#[derive(Debug, Default)]
/// `y-button`: themed push button with icon slots and declarative events.
pub struct Button;

impl Widget for Button {
    type Msg = ButtonMsg;

    const TAG: &'static str = "y-button";
    const OBSERVED: &'static [&'static str] = &[
        "color",
        "size",
        "style-type",
        "type",
        "disabled",
        "name",
        "value",
        "aria-label",
        "aria-pressed",
        "aria-hidden",
    ];
    const DEFAULTS: &'static [(&'static str, &'static str)] = &[("size", "medium")];

    fn create() -> Self {
        Self
    }

    fn update(&mut self, cx: &mut Context<'_, Self>, msg: ButtonMsg) -> Update {
        match msg {
            ButtonMsg::Click => {
                if cx.has("disabled") {
                    return Update::None;
                }
                if let Some(name) = cx.attrs().non_empty("data-event") {
                    let detail: Map<String, Value> = cx
                        .attrs()
                        .with_prefix("data-detail-")
                        .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
                        .collect();
                    let event = WidgetEvent::new(name, Value::Object(detail));
                    cx.emit(event);
                }
                if cx.attribute("type") == Some("submit") {
                    cx.host().request_form_submit(cx.key());
                }
                Update::None
            }
        }
    }

    fn render(&self, cx: &RenderContext<'_>) -> View<ButtonMsg> {
        let attrs = cx.attrs;
        let disabled = attrs.has("disabled");
        let color = WidgetColor::parse(attrs.get("color"), SemanticColor::Base);
        let size = Size::parse(attrs.get("size"));
        let style_type = StyleType::parse(attrs.get("style-type"), StyleType::Outlined);

        let content = color.resolve(ColorRole::Content);
        let app = color.resolve(ColorRole::BackgroundApp);
        let (background, border, text) = match style_type {
            StyleType::Outlined => (app.clone(), content.clone(), content.clone()),
            StyleType::Filled => (content.clone(), content.clone(), app.clone()),
            StyleType::Flat => (app.clone(), app.clone(), content.clone()),
        };
        let min_size = CONTROL_HEIGHT.literal(size);
        let sheet = StyleSheet::new(BASE_CSS).rule(
            Rule::new(".button")
                .decl("--background-color", background)
                .decl("--border-color", border)
                .decl("--text-color", text)
                .decl("--hover-background-color", color.resolve(ColorRole::BackgroundHover))
                .decl("--hover-text-color", content.clone())
                .decl("--focus-background-color", color.resolve(ColorRole::BackgroundActive))
                .decl("--focus-text-color", content.clone())
                .decl("--active-background-color", content)
                .decl("--active-text-color", app)
                .decl("--content-padding", INNER_SPACING.resolve(size))
                .decl("--button-padding", SPACING.resolve(size))
                .decl("--gap", SPACING.resolve(size))
                .decl("--button-min-height", min_size)
                .decl("--button-min-width", min_size),
        );

        let mut button = el("button")
            .class("button")
            .attr("part", "button")
            .attr("role", "button")
            .attr("tabindex", "0");
        for name in MIRRORED {
            button = button.attr_opt(name, attrs.get(name));
        }
        let button = button
            .flag("disabled", disabled)
            .attr("aria-disabled", bool_token(disabled))
            .attr("data-style-type", style_type.token())
            .on(EventKind::Click, ButtonMsg::Click)
            .child(hide_if_empty(
                el("span")
                    .class("icon left-icon")
                    .attr("part", "left-icon")
                    .child(slot(Some("left-icon"))),
                cx.slots,
                "left-icon",
                "inline-flex",
            ))
            .child(hide_if_empty(
                el("span")
                    .class("label")
                    .attr("part", "label")
                    .child(slot(None)),
                cx.slots,
                "",
                "inline-flex",
            ))
            .child(hide_if_empty(
                el("span")
                    .class("icon right-icon")
                    .attr("part", "right-icon")
                    .child(slot(Some("right-icon"))),
                cx.slots,
                "right-icon",
                "inline-flex",
            ));

        View::new(sheet).child(button)
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
    fn disabled_round_trips_through_the_attribute() {
        let host = HeadlessHost::new();
        let button = mount::<Button>(&host, &[]);
        button.set_flag("disabled", true);
        assert!(button.has_attribute("disabled"));
        assert_eq!(
            button.with_view(|view| view
                .query("button")
                .and_then(|inner| inner.attribute("aria-disabled"))
                .map(str::to_string)),
            Some("true".to_string())
        );
        button.set_flag("disabled", false);
        assert!(!button.has_attribute("disabled"));
        assert!(button.with_view(|view| view
            .query("button")
            .is_some_and(|inner| !inner.has_attribute("disabled"))));
    }

    #[test]
    fn applies_default_size() {
        let host = HeadlessHost::new();
        let button = mount::<Button>(&host, &[]);
        assert_eq!(button.attribute("size").as_deref(), Some("medium"));
        assert!(button.markup().contains("--button-min-height: 35px;"));
    }

    #[test]
    fn click_emits_declared_event_with_detail() {
        let host = HeadlessHost::new();
        let button = mount::<Button>(
            &host,
            &[
                ("data-event", "save"),
                ("data-detail-id", "7"),
                ("data-detail-kind", "draft"),
            ],
        );
        button.click("button");
        let events = button.events_named("save");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].detail, json!({"id": "7", "kind": "draft"}));
    }

    #[test]
    fn disabled_button_emits_nothing() {
        let host = HeadlessHost::new();
        let button = mount::<Button>(&host, &[("data-event", "save"), ("disabled", "")]);
        button.click("button");
        assert!(button.events_named("save").is_empty());
    }

    #[test]
    fn submit_requests_form_submission() {
        let host = HeadlessHost::new();
        let button = mount::<Button>(&host, &[("type", "submit")]);
        button.click("button");
        assert_eq!(host.form_submits(), vec![button.key()]);
    }

    #[test]
    fn empty_slot_containers_are_hidden() {
        let host = HeadlessHost::new();
        let button = mount::<Button>(&host, &[]);
        button.assign_slots(SlotAssignments::new().with_text("", "Save"));
        button.with_view(|view| {
            let display = |selector: &str| {
                view.query(selector)
                    .and_then(|element| element.style_value("display"))
                    .map(str::to_string)
            };
            assert_eq!(display(".label"), Some("inline-flex".to_string()));
            assert_eq!(display(".left-icon"), Some("none".to_string()));
            assert_eq!(display(".right-icon"), Some("none".to_string()));
        });
    }

    #[test]
    fn style_type_selects_color_roles() {
        let host = HeadlessHost::new();
        let button = mount::<Button>(&host, &[("color", "primary"), ("style-type", "filled")]);
        assert!(button
            .markup()
            .contains("--background-color: var(--primary-content--, #0070f3);"));
    }
}
