use serde::{Deserialize, Serialize};
use serde_json::json;
use widget_contract::{
    bool_token, el, events, AttributeMap, Context, DomEvent, EventKind, Patch, RenderContext,
    Update, View, Widget, WidgetEvent,
};

const CSS: &str = r#"
:host { display: block; font-family: var(--font-family-body, sans-serif); }
fieldset { border: none; padding: 0; margin: 0; display: flex; flex-direction: column; gap: var(--spacing-x-small, 8px); }
label { display: flex; align-items: center; gap: 0.5em; cursor: pointer; }
input[type="radio"] {
  appearance: none;
  width: 16px;
  height: 16px;
  border: 2px solid var(--base-content--, #1d1d1d);
  border-radius: 50%;
  position: relative;
  outline: none;
  cursor: pointer;
}
input[type="radio"]:checked::after {
  content: '';
  position: absolute;
  top: 2px;
  left: 2px;
  width: 8px;
  height: 8px;
  background: var(--primary-content--, #0070f3);
  border-radius: 50%;
}
input[type="radio"]:focus-visible { outline: 2px solid var(--primary-content--, #0070f3); outline-offset: 2px; }
input[disabled] { opacity: 0.5; cursor: not-allowed; }
"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One choice of a radio group.
pub struct RadioOption {
    /// Submitted value.
    pub value: String,
    /// Visible text.
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Clone)]
/// Radio group messages.
pub enum RadioMsg {
    /// Choose the option with this value.
    Select(String),
    /// Move focus from `from` by `offset` positions, wrapping around.
    MoveFocus {
        /// Index holding focus.
        from: usize,
        /// `1` or `-1`.
        offset: isize,
    },
}

fn option_selector(index: usize) -> String {
    format!("input[data-index=\"{index}\"]")
}

/// Index that keeps the tab stop: the selected option, else the first.
fn tab_stop(options: &[RadioOption], value: Option<&str>) -> usize {
    value
        .and_then(|value| options.iter().position(|option| option.value == value))
        .unwrap_or(0)
}

#[derive(Debug, Default)]
/// `y-radio`: single-choice group built from an `options` JSON list.
pub struct Radio;

impl Radio {
    fn checked_patches(attrs: &AttributeMap) -> Vec<Patch> {
        let options: Vec<RadioOption> = attrs.json_list("options");
        let value = attrs.non_empty("value");
        let stop = tab_stop(&options, value);
        options
            .iter()
            .enumerate()
            .flat_map(|(index, option)| {
                let selector = option_selector(index);
                let selected = value == Some(option.value.as_str());
                [
                    if selected {
                        Patch::attribute(&selector, "checked", "")
                    } else {
                        Patch::remove_attribute(&selector, "checked")
                    },
                    Patch::attribute(&selector, "aria-checked", bool_token(selected)),
                    Patch::attribute(&selector, "tabindex", if index == stop { "0" } else { "-1" }),
                ]
            })
            .collect()
    }
}

impl Widget for Radio {
    type Msg = RadioMsg;

    const TAG: &'static str = "y-radio";
    const OBSERVED: &'static [&'static str] = &["options", "name", "value", "disabled"];

    fn create() -> Self {
        Self
    }

    fn attribute_changed(
        &mut self,
        cx: &mut Context<'_, Self>,
        name: &str,
        _old: Option<&str>,
        _new: Option<&str>,
    ) -> Update {
        if name == "value" {
            Update::Patch(Self::checked_patches(cx.attrs()))
        } else {
            Update::Render
        }
    }

    fn update(&mut self, cx: &mut Context<'_, Self>, msg: RadioMsg) -> Update {
        if cx.has("disabled") {
            return Update::None;
        }
        match msg {
            RadioMsg::Select(value) => {
                cx.set_attribute("value", value.clone());
                cx.emit(WidgetEvent::new(events::CHANGE, json!({ "value": value })));
            }
            RadioMsg::MoveFocus { from, offset } => {
                let len = cx.attrs().json_list::<RadioOption>("options").len();
                if len == 0 {
                    return Update::None;
                }
                let next = (from as isize + offset).rem_euclid(len as isize) as usize;
                cx.focus(&option_selector(next));
            }
        }
        Update::None
    }

    fn render(&self, cx: &RenderContext<'_>) -> View<RadioMsg> {
        let attrs = cx.attrs;
        let options: Vec<RadioOption> = attrs.json_list("options");
        let name = attrs.get("name").unwrap_or_default();
        let value = attrs.non_empty("value");
        let disabled = attrs.has("disabled");
        let stop = tab_stop(&options, value);

        let radios = options.into_iter().enumerate().map(|(index, option)| {
            let selected = value == Some(option.value.as_str());
            let chosen = option.value.clone();
            let on_key = move |event: &DomEvent| match event.key.as_deref() {
                Some("ArrowDown" | "ArrowRight") => Some(RadioMsg::MoveFocus { from: index, offset: 1 }),
                Some("ArrowUp" | "ArrowLeft") => Some(RadioMsg::MoveFocus { from: index, offset: -1 }),
                _ if event.is_activation_key() => Some(RadioMsg::Select(chosen.clone())),
                _ => None,
            };
            el("label").child(
                el("input")
                    .attr("type", "radio")
                    .attr("name", name)
                    .attr("value", option.value.clone())
                    .attr("data-index", index.to_string())
                    .attr("role", "radio")
                    .attr("aria-checked", bool_token(selected))
                    .attr("tabindex", if index == stop { "0" } else { "-1" })
                    .flag("checked", selected)
                    .flag("disabled", disabled)
                    .on(EventKind::Click, RadioMsg::Select(option.value))
                    .on_with(EventKind::KeyDown, on_key),
            )
            .text(option.label)
        });

        View::new(CSS).child(
            el("fieldset")
                .attr("role", "radiogroup")
                .attr_opt("aria-disabled", disabled.then_some("true"))
                .children(radios),
        )
    }

    fn form_value(&self, attrs: &AttributeMap) -> Option<String> {
        attrs.non_empty("value").map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use widget_contract::headless::{mount, HeadlessHost, Mounted};

    use super::*;

    const OPTIONS: &str =
        r#"[{"value":"s","label":"Small"},{"value":"m","label":"Medium"},{"value":"l","label":"Large"}]"#;

    fn tabindexes(radio: &Mounted<Radio>) -> Vec<String> {
        radio.with_view(|view| {
            view.query_all("input")
                .iter()
                .map(|input| input.attribute("tabindex").unwrap_or_default().to_string())
                .collect()
        })
    }

    #[test]
    fn first_option_holds_the_tab_stop_until_selection() {
        let host = HeadlessHost::new();
        let radio = mount::<Radio>(&host, &[("options", OPTIONS), ("name", "size")]);
        assert_eq!(tabindexes(&radio), ["0", "-1", "-1"]);
        assert_eq!(radio.form_entry(), None);

        radio.click(r#"input[value="l"]"#);
        assert_eq!(radio.attribute("value").as_deref(), Some("l"));
        assert_eq!(tabindexes(&radio), ["-1", "-1", "0"]);
        assert_eq!(
            radio.events_named("change")[0].field("value"),
            Some(&json!("l"))
        );
        assert_eq!(
            radio.form_entry(),
            Some(("size".to_string(), "l".to_string()))
        );
    }

    #[test]
    fn arrows_move_focus_with_wraparound_without_selecting() {
        let host = HeadlessHost::new();
        let radio = mount::<Radio>(&host, &[("options", OPTIONS)]);
        radio.key_down(r#"input[data-index="0"]"#, "ArrowUp");
        radio.key_down(r#"input[data-index="2"]"#, "ArrowRight");
        assert_eq!(
            radio.log().focused,
            [r#"input[data-index="2"]"#, r#"input[data-index="0"]"#]
        );
        assert_eq!(radio.attribute("value"), None);
    }

    #[test]
    fn space_selects_the_focused_option() {
        let host = HeadlessHost::new();
        let radio = mount::<Radio>(&host, &[("options", OPTIONS), ("value", "s")]);
        radio.key_down(r#"input[data-index="1"]"#, " ");
        assert_eq!(radio.attribute("value").as_deref(), Some("m"));
        radio.with_view(|view| {
            let checked = view.query("input[checked]").expect("checked radio");
            assert_eq!(checked.attribute("value"), Some("m"));
        });
    }

    #[test]
    fn disabled_group_ignores_input() {
        let host = HeadlessHost::new();
        let radio = mount::<Radio>(&host, &[("options", OPTIONS), ("disabled", "")]);
        radio.click(r#"input[value="m"]"#);
        assert_eq!(radio.attribute("value"), None);
        assert!(radio.events_named("change").is_empty());
    }
}
