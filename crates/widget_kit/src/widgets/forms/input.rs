use serde_json::json;
use widget_contract::{
    el, events, slot,
    style::{Rule, StyleSheet},
    AttributeMap, Context, EventKind, Patch, RenderContext, Size, Update, View, Widget,
    WidgetEvent,
};

use super::LabelPosition;

const BASE_CSS: &str = r#"
:host { display: block; font-family: var(--font-family-body, sans-serif); color: var(--base-content--, #1d1d1d); }
.input-wrapper { position: relative; display: flex; gap: var(--spacing-2x-small, 4px); }
.input-container {
  display: flex;
  flex: 1;
  align-items: center;
  gap: var(--spacing-x-small, 4px);
  border: var(--component-inputs-border-width, 1px) solid var(--base-background-border, #d7dbde);
  border-radius: var(--component-inputs-border-radius-outer, 4px);
  box-sizing: border-box;
  transition: border-color 0.2s ease-in-out;
}
.input-container.is-invalid { border-color: var(--error-background-border, #eda7af); background: var(--error-background-component, #fbe9eb); }
.input-container.is-invalid input { color: var(--error-content--, #dc3545); }
.input-container.is-invalid:hover, .input-container.is-invalid:focus-within { border-color: var(--error-content--, #dc3545); }
.input-container.is-invalid:focus-within input { color: var(--base-content--, #1d1d1d); }
input { all: unset; flex: 1; font-family: inherit; font-size: 1em; color: inherit; min-width: 0; }
.input-container:hover { border-color: var(--base-content--, #1d1d1d); }
.input-container:focus-within { border-color: var(--primary-content--, #0070f3); }
.label-wrapper.is-invalid ::slotted([slot="label"]) { color: var(--error-content--, #dc3545); }
::slotted([slot="label"]) { font-weight: 500; font-size: 0.875em; color: var(--base-content-light, #6b6f72); }
::slotted([slot="left-icon"]), ::slotted([slot="right-icon"]) {
  display: flex;
  align-items: center;
  justify-content: center;
  color: var(--base-content-lighter, #6b6f72);
}
"#;

/// Loose `local@domain` check used for `type="email"`.
fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

/// Explicit `invalid`, required-but-empty, or a malformed email.
fn is_invalid(attrs: &AttributeMap) -> bool {
    let value = attrs.get("value").unwrap_or_default();
    attrs.has("invalid")
        || (attrs.has("required") && value.is_empty())
        || (attrs.get("type") == Some("email") && !value.is_empty() && !looks_like_email(value))
}

#[derive(Debug, Clone)]
/// Input messages.
pub enum InputMsg {
    /// Live edit.
    Input(String),
    /// Committed edit.
    Change(String),
}

#[derive(Debug, Default)]
/// `y-input`: labelled text field.
pub struct Input;

impl Input {
    fn validity_patches(attrs: &AttributeMap) -> Vec<Patch> {
        let invalid = is_invalid(attrs);
        vec![
            Patch::class(".input-container", "is-invalid", invalid),
            Patch::class(".label-wrapper", "is-invalid", invalid),
        ]
    }
}

impl Widget for Input {
    type Msg = InputMsg;

    const TAG: &'static str = "y-input";
    const OBSERVED: &'static [&'static str] = &[
        "type",
        "size",
        "value",
        "placeholder",
        "label-position",
        "disabled",
        "invalid",
        "required",
        "name",
    ];
    const DEFAULTS: &'static [(&'static str, &'static str)] =
        &[("size", "medium"), ("label-position", "top")];

    fn create() -> Self {
        Self
    }

    fn attribute_changed(
        &mut self,
        cx: &mut Context<'_, Self>,
        name: &str,
        _old: Option<&str>,
        new: Option<&str>,
    ) -> Update {
        match name {
            "value" => {
                let mut patches = vec![Patch::attribute("input", "value", new.unwrap_or_default())];
                patches.extend(Self::validity_patches(cx.attrs()));
                Update::Patch(patches)
            }
            "invalid" | "required" => Update::Patch(Self::validity_patches(cx.attrs())),
            "name" => Update::None,
            _ => Update::Render,
        }
    }

    fn update(&mut self, cx: &mut Context<'_, Self>, msg: InputMsg) -> Update {
        if cx.has("disabled") {
            return Update::None;
        }
        match msg {
            InputMsg::Input(value) => {
                cx.set_attribute("value", value.clone());
                cx.emit(WidgetEvent::new(events::INPUT, json!({ "value": value })));
            }
            InputMsg::Change(value) => {
                cx.set_attribute("value", value.clone());
                cx.emit(WidgetEvent::new(events::CHANGE, json!({ "value": value })));
            }
        }
        Update::None
    }

    fn render(&self, cx: &RenderContext<'_>) -> View<InputMsg> {
        let attrs = cx.attrs;
        let disabled = attrs.has("disabled");
        let invalid = is_invalid(attrs);
        let size = Size::parse(attrs.get("size"));
        let position = LabelPosition::parse(attrs.get("label-position"), LabelPosition::Top);
        let padding = match size {
            Size::Small => "var(--component-inputs-padding-small, 4px)",
            Size::Medium => "var(--component-inputs-padding-medium, 8px)",
            Size::Large => "var(--component-inputs-padding-large, 12px)",
        };

        let sheet = StyleSheet::new(BASE_CSS)
            .rule(
                Rule::new(":host")
                    .decl("opacity", if disabled { "0.75" } else { "1" })
                    .decl("pointer-events", if disabled { "none" } else { "auto" }),
            )
            .rule(Rule::new(".input-wrapper").decl("flex-direction", position.flex_direction()))
            .rule(
                Rule::new(".input-container")
                    .decl("padding", padding)
                    .decl(
                        "background",
                        if disabled {
                            "var(--base-background-component, #ffffff)"
                        } else {
                            "var(--base-background-app, #f1f6fa)"
                        },
                    ),
            );

        let input = el("input")
            .attr("part", "input")
            .attr("type", attrs.non_empty("type").unwrap_or("text"))
            .attr("value", attrs.get("value").unwrap_or_default())
            .attr_opt("placeholder", attrs.get("placeholder"))
            .flag("disabled", disabled)
            .flag("required", attrs.has("required"))
            .attr_opt("aria-invalid", invalid.then_some("true"))
            .on_with(EventKind::Input, |event| {
                event.value.clone().map(InputMsg::Input)
            })
            .on_with(EventKind::Change, |event| {
                event.value.clone().map(InputMsg::Change)
            });

        View::new(sheet).child(
            el("div")
                .class("input-wrapper")
                .attr("data-label-position", position.token())
                .child(
                    el("div")
                        .class("input-container")
                        .class_if(invalid, "is-invalid")
                        .child(slot(Some("left-icon")))
                        .child(input)
                        .child(slot(Some("right-icon"))),
                )
                .child(
                    el("div")
                        .class("label-wrapper")
                        .class_if(invalid, "is-invalid")
                        .child(slot(Some("label"))),
                ),
        )
    }

    fn form_value(&self, attrs: &AttributeMap) -> Option<String> {
        Some(attrs.get("value").unwrap_or_default().to_string())
    }
}
