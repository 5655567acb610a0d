use serde_json::json;
use widget_contract::{
    el, events, flag_enabled, format_number, slot,
    style::{Rule, StyleSheet, CONTROL_HEIGHT},
    AttributeMap, ColorRole, Context, DomEvent, EventKind, ListenTarget, Patch, RenderContext,
    SemanticColor, Size, Subscription, Update, View, Widget, WidgetColor, WidgetEvent,
};

use super::LabelPosition;

const BASE_CSS: &str = r#"
:host { display: block; font-family: var(--font-family-body, sans-serif); color: var(--base-content--, #1d1d1d); }
.slider-wrapper { display: flex; gap: var(--spacing-2x-small, 4px); }
.slider-header { display: flex; align-items: center; justify-content: space-between; font-size: var(--font-size-label, 0.83em); }
.label { color: var(--base-content--, #1d1d1d); }
.value-label { color: var(--base-content-light, #6b6f72); font-variant-numeric: tabular-nums; }
.slider-track {
  position: relative;
  background: var(--base-background-component, #ffffff);
  border: var(--component-slider-border-width, 1px) solid var(--base-background-border, #d7dbde);
  border-radius: var(--component-slider-border-radius-outer, 4px);
  box-sizing: border-box;
  padding: var(--component-slider-padding, 2px);
  cursor: pointer;
  outline: none;
  touch-action: none;
}
.slider-inner { position: relative; width: 100%; height: 100%; overflow: hidden; }
.fill { position: absolute; pointer-events: none; border-radius: var(--component-slider-border-radius-inner, 2px); }
.thumb {
  position: absolute;
  background: var(--slider-thumb-color);
  border-radius: var(--component-slider-thumb-border-radius, 2px);
  cursor: grab;
  z-index: 1;
  touch-action: none;
}
.thumb:active { cursor: grabbing; }
:host([orientation="vertical"]) .slider-wrapper { align-items: center; }
"#;

const HORIZONTAL_CSS: &str = r#"
.slider-track { width: 100%; }
.fill { top: 0; left: 0; height: 100%; }
.thumb { top: 0; width: 8px; height: 100%; transform: translateX(-50%); }
"#;

const VERTICAL_CSS: &str = r#"
.slider-track { height: var(--component-slider-length, 160px); }
.fill { bottom: 0; left: 0; width: 100%; }
.thumb { left: 0; width: 100%; height: 8px; transform: translateY(50%); }
"#;

#[derive(Debug, Clone, Copy, PartialEq)]
/// Bounds and step of a slider.
pub struct SliderRange {
    /// Lower bound; 0 when missing.
    pub min: f64,
    /// Upper bound; 100 when missing or zero.
    pub max: f64,
    /// Positive step, if any.
    pub step: Option<f64>,
}

impl SliderRange {
    /// Reads `min`, `max` and `step`.
    pub fn from_attrs(attrs: &AttributeMap) -> Self {
        Self {
            min: attrs.number("min").unwrap_or(0.0),
            max: attrs.number("max").filter(|max| *max != 0.0).unwrap_or(100.0),
            step: attrs.number("step").filter(|step| *step > 0.0),
        }
    }

    /// Filled share of `value` in `0..=100`.
    pub fn percentage(&self, value: f64) -> f64 {
        let range = self.max - self.min;
        if range <= 0.0 {
            return 0.0;
        }
        ((value - self.min) / range * 100.0).clamp(0.0, 100.0)
    }
}

/// Clamps `value` into the range and snaps it to the nearest step from `min`.
pub fn snap_value(value: f64, range: SliderRange) -> f64 {
    let clamped = value.max(range.min).min(range.max);
    let Some(step) = range.step else {
        return clamped;
    };
    let steps = ((clamped - range.min) / step).round();
    (range.min + steps * step).max(range.min).min(range.max)
}

fn current_value(attrs: &AttributeMap) -> f64 {
    attrs.number("value").unwrap_or(0.0)
}

fn value_label(attrs: &AttributeMap, range: SliderRange, value: f64) -> String {
    match attrs.get("label-format").map(str::trim) {
        Some("percent") => format!("{}%", range.percentage(value).round()),
        Some("fraction") => format!(
            "{} / {}",
            format_number(value - range.min),
            format_number(range.max - range.min)
        ),
        _ => format_number(value),
    }
}

fn is_vertical(attrs: &AttributeMap) -> bool {
    attrs.get("orientation") == Some("vertical")
}

#[derive(Debug, Clone)]
/// Slider messages.
pub enum SliderMsg {
    /// Pointer pressed on the track or thumb.
    PointerDown {
        /// Viewport x.
        x: f64,
        /// Viewport y.
        y: f64,
    },
    /// Document pointer movement during a drag.
    PointerMove {
        /// Viewport x.
        x: f64,
        /// Viewport y.
        y: f64,
    },
    /// Document pointer release ending a drag.
    PointerUp,
    /// Arrow, Home or End key on the track.
    Key(String),
}

#[derive(Debug, Default)]
/// `y-slider`: range input with keyboard steps and pointer dragging.
pub struct Slider {
    drag: Vec<Subscription>,
}

impl Slider {
    /// Snaps the `value` attribute in place; returns whether it was rewritten.
    fn normalize(cx: &mut Context<'_, Self>) -> bool {
        let range = SliderRange::from_attrs(cx.attrs());
        let raw = cx.attrs().number("value");
        let snapped = format_number(snap_value(raw.unwrap_or(0.0), range));
        if cx.attribute("value") == Some(snapped.as_str()) {
            return false;
        }
        cx.set_attribute("value", snapped);
        true
    }

    fn position_patches(attrs: &AttributeMap) -> Vec<Patch> {
        let range = SliderRange::from_attrs(attrs);
        let value = current_value(attrs);
        let percent = format!("{}%", format_number(range.percentage(value)));
        let (extent, offset) = if is_vertical(attrs) {
            ("height", "bottom")
        } else {
            ("width", "left")
        };
        vec![
            Patch::style(".fill", extent, percent.clone()),
            Patch::style(".thumb", offset, percent),
            Patch::attribute(".slider-track", "aria-valuenow", format_number(value)),
            Patch::text(".value-label", value_label(attrs, range, value)),
        ]
    }

    fn value_at(cx: &Context<'_, Self>, x: f64, y: f64) -> Option<f64> {
        let rect = cx.host().element_rect(cx.key())?;
        let range = SliderRange::from_attrs(cx.attrs());
        let ratio = if is_vertical(cx.attrs()) {
            if rect.height <= 0.0 {
                return None;
            }
            (rect.bottom() - y) / rect.height
        } else {
            if rect.width <= 0.0 {
                return None;
            }
            (x - rect.x) / rect.width
        };
        let raw = range.min + ratio.clamp(0.0, 1.0) * (range.max - range.min);
        Some(snap_value(raw, range))
    }

    fn set_value(cx: &mut Context<'_, Self>, value: f64) -> String {
        let value = format_number(value);
        cx.set_attribute("value", value.clone());
        value
    }

    fn track_pointer(&mut self, cx: &mut Context<'_, Self>, x: f64, y: f64) {
        if let Some(value) = Self::value_at(cx, x, y) {
            let value = Self::set_value(cx, value);
            cx.emit(WidgetEvent::new(events::INPUT, json!({ "value": value })));
        }
    }
}

impl Widget for Slider {
    type Msg = SliderMsg;

    const TAG: &'static str = "y-slider";
    const OBSERVED: &'static [&'static str] = &[
        "value",
        "min",
        "max",
        "step",
        "size",
        "color",
        "disabled",
        "name",
        "orientation",
        "label-display",
        "label-format",
        "label-position",
    ];
    const DEFAULTS: &'static [(&'static str, &'static str)] = &[
        ("size", "medium"),
        ("min", "0"),
        ("max", "100"),
        ("value", "50"),
        ("label-position", "top"),
    ];

    fn create() -> Self {
        Self::default()
    }

    fn attached(&mut self, cx: &mut Context<'_, Self>) {
        Self::normalize(cx);
    }

    fn attribute_changed(
        &mut self,
        cx: &mut Context<'_, Self>,
        name: &str,
        _old: Option<&str>,
        _new: Option<&str>,
    ) -> Update {
        match name {
            "value" => {
                if Self::normalize(cx) {
                    // The snapped write arrives as its own change.
                    return Update::None;
                }
                Update::Patch(Self::position_patches(cx.attrs()))
            }
            "name" => Update::None,
            "min" | "max" | "step" => {
                Self::normalize(cx);
                Update::Render
            }
            "disabled" if cx.has("disabled") => {
                self.drag.clear();
                Update::Render
            }
            _ => Update::Render,
        }
    }

    fn update(&mut self, cx: &mut Context<'_, Self>, msg: SliderMsg) -> Update {
        if cx.has("disabled") {
            self.drag.clear();
            return Update::None;
        }
        match msg {
            SliderMsg::PointerDown { x, y } => {
                self.drag = vec![
                    cx.listen(ListenTarget::Document, EventKind::PointerMove, false, |event| {
                        Some(SliderMsg::PointerMove {
                            x: event.client_x,
                            y: event.client_y,
                        })
                    }),
                    cx.listen(ListenTarget::Document, EventKind::PointerUp, false, |_| {
                        Some(SliderMsg::PointerUp)
                    }),
                ];
                self.track_pointer(cx, x, y);
            }
            SliderMsg::PointerMove { x, y } => {
                if !self.drag.is_empty() {
                    self.track_pointer(cx, x, y);
                }
            }
            SliderMsg::PointerUp => {
                if self.drag.is_empty() {
                    return Update::None;
                }
                self.drag.clear();
                let value = cx.attribute("value").unwrap_or_default().to_string();
                cx.emit(WidgetEvent::new(events::CHANGE, json!({ "value": value })));
            }
            SliderMsg::Key(key) => {
                let range = SliderRange::from_attrs(cx.attrs());
                let value = current_value(cx.attrs());
                let step = range.step.unwrap_or(1.0);
                let next = match key.as_str() {
                    "ArrowRight" | "ArrowUp" => value + step,
                    "ArrowLeft" | "ArrowDown" => value - step,
                    "Home" => range.min,
                    "End" => range.max,
                    _ => return Update::None,
                };
                let value = Self::set_value(cx, snap_value(next, range));
                cx.emit(WidgetEvent::new(events::INPUT, json!({ "value": value })));
                cx.emit(WidgetEvent::new(events::CHANGE, json!({ "value": value })));
            }
        }
        Update::None
    }

    fn render(&self, cx: &RenderContext<'_>) -> View<SliderMsg> {
        let attrs = cx.attrs;
        let range = SliderRange::from_attrs(attrs);
        let value = current_value(attrs);
        let percent = format!("{}%", format_number(range.percentage(value)));
        let disabled = attrs.has("disabled");
        let vertical = is_vertical(attrs);
        let size = Size::parse(attrs.get("size"));
        let color = WidgetColor::parse(attrs.get("color"), SemanticColor::Primary);
        let show_label = flag_enabled(attrs.get("label-display"), true);
        let position = LabelPosition::parse(attrs.get("label-position"), LabelPosition::Top);
        let thickness = CONTROL_HEIGHT.resolve(size);

        let (track_rule, fill_rule, thumb_rule) = if vertical {
            (
                Rule::new(".slider-track").decl("width", thickness),
                Rule::new(".fill").decl("height", percent.clone()),
                Rule::new(".thumb").decl("bottom", percent),
            )
        } else {
            (
                Rule::new(".slider-track").decl("height", thickness),
                Rule::new(".fill").decl("width", percent.clone()),
                Rule::new(".thumb").decl("left", percent),
            )
        };
        let sheet = StyleSheet::new(BASE_CSS)
            .raw(if vertical { VERTICAL_CSS } else { HORIZONTAL_CSS })
            .rule(
                Rule::new(":host")
                    .decl("--slider-thumb-color", color.resolve(ColorRole::Content))
                    .decl("opacity", if disabled { "0.5" } else { "1" })
                    .decl("pointer-events", if disabled { "none" } else { "auto" }),
            )
            .rule(Rule::new(".slider-wrapper").decl("flex-direction", position.flex_direction()))
            .rule(track_rule)
            .rule(fill_rule.decl("background", color.resolve(ColorRole::BackgroundHover)))
            .rule(thumb_rule)
            .rule(
                Rule::new(".slider-track:focus-visible")
                    .decl("border-color", color.resolve(ColorRole::Content)),
            );

        let pointer_down = |event: &DomEvent| {
            Some(SliderMsg::PointerDown {
                x: event.client_x,
                y: event.client_y,
            })
        };
        let key = |event: &DomEvent| match event.key.as_deref() {
            Some(key @ ("ArrowRight" | "ArrowUp" | "ArrowLeft" | "ArrowDown" | "Home" | "End")) => {
                Some(SliderMsg::Key(key.to_string()))
            }
            _ => None,
        };

        let track = el("div")
            .class("slider-track")
            .attr("part", "track")
            .attr("role", "slider")
            .attr("tabindex", if disabled { "-1" } else { "0" })
            .attr("aria-valuenow", format_number(value))
            .attr("aria-valuemin", format_number(range.min))
            .attr("aria-valuemax", format_number(range.max))
            .attr_opt("aria-valuestep", range.step.map(format_number))
            .attr("aria-orientation", if vertical { "vertical" } else { "horizontal" })
            .attr_opt("aria-disabled", disabled.then_some("true"))
            .on_with(EventKind::PointerDown, pointer_down)
            .on_with(EventKind::KeyDown, key)
            .child(
                el("div")
                    .class("slider-inner")
                    .child(el("div").class("fill").attr("part", "fill"))
                    .child(el("div").class("thumb").attr("part", "thumb")),
            );

        let header = el("div")
            .class("slider-header")
            .child(el("span").class("label").child(slot(None)))
            .child_opt(show_label.then(|| {
                el("span")
                    .class("value-label")
                    .attr("part", "value-label")
                    .text(value_label(attrs, range, value))
            }));

        View::new(sheet).child(
            el("div")
                .class("slider-wrapper")
                .child(track)
                .child(header),
        )
    }

    fn detached(&mut self, _cx: &mut Context<'_, Self>) {
        self.drag.clear();
    }

    fn form_value(&self, attrs: &AttributeMap) -> Option<String> {
        Some(format_number(current_value(attrs)))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use widget_contract::{
        headless::{mount, HeadlessHost, Mounted},
        Rect,
    };

    use super::*;

    fn thumb_left(slider: &Mounted<Slider>) -> Option<String> {
        slider.with_view(|view| {
            view.query(".thumb")
                .and_then(|thumb| thumb.style_value("left"))
                .map(str::to_string)
        })
    }

    #[test]
    fn values_snap_to_step_and_clamp() {
        let range = SliderRange {
            min: 0.0,
            max: 100.0,
            step: Some(25.0),
        };
        assert_eq!(snap_value(33.0, range), 25.0);
        assert_eq!(snap_value(150.0, range), 100.0);
        assert_eq!(snap_value(-5.0, range), 0.0);

        let host = HeadlessHost::new();
        let slider = mount::<Slider>(&host, &[("step", "25"), ("value", "33")]);
        assert_eq!(slider.attribute("value").as_deref(), Some("25"));
        slider.set_attribute("value", "150");
        assert_eq!(slider.attribute("value").as_deref(), Some("100"));
    }

    #[test]
    fn defaults_apply_on_attach() {
        let host = HeadlessHost::new();
        let slider = mount::<Slider>(&host, &[("name", "volume")]);
        assert_eq!(slider.attribute("value").as_deref(), Some("50"));
        assert_eq!(slider.attribute("label-position").as_deref(), Some("top"));
        assert_eq!(
            slider.form_entry(),
            Some(("volume".to_string(), "50".to_string()))
        );
    }

    #[test]
    fn arrow_keys_step_and_emit_input_then_change() {
        let host = HeadlessHost::new();
        let slider = mount::<Slider>(&host, &[("step", "10"), ("value", "50")]);
        slider.key_down(".slider-track", "ArrowRight");
        assert_eq!(slider.attribute("value").as_deref(), Some("60"));
        slider.key_down(".slider-track", "End");
        assert_eq!(slider.attribute("value").as_deref(), Some("100"));
        slider.key_down(".slider-track", "ArrowUp");
        assert_eq!(slider.attribute("value").as_deref(), Some("100"));
        assert_eq!(slider.events_named("input").len(), 3);
        assert_eq!(slider.events_named("change").len(), 3);
    }

    #[test]
    fn value_changes_patch_the_thumb_without_rebuilding() {
        let host = HeadlessHost::new();
        let slider = mount::<Slider>(&host, &[("value", "20")]);
        let mounts = slider.log().mounts;
        slider.set_attribute("value", "75");
        assert_eq!(slider.log().mounts, mounts);
        assert_eq!(thumb_left(&slider).as_deref(), Some("75%"));
        assert_eq!(
            slider.with_view(|view| view.query(".value-label").map(|label| label.text_content())),
            Some("75".to_string())
        );
    }

    #[test]
    fn drag_listens_only_during_the_gesture() {
        let host = HeadlessHost::new();
        let slider = Mounted::<Slider>::build(&host, &[("step", "10")]);
        host.set_rect(slider.key(), Rect::new(100.0, 0.0, 200.0, 35.0));
        slider.attach();
        assert_eq!(host.total_listeners(), 0);

        slider.fire(".thumb", EventKind::PointerDown, DomEvent::pointer(150.0, 10.0));
        assert_eq!(slider.attribute("value").as_deref(), Some("30"));
        assert_eq!(
            host.listener_count(ListenTarget::Document, EventKind::PointerMove),
            1
        );

        host.pointer_move(260.0, 10.0);
        assert_eq!(slider.attribute("value").as_deref(), Some("80"));
        host.pointer_move(900.0, 10.0);
        assert_eq!(slider.attribute("value").as_deref(), Some("100"));
        assert!(slider.events_named("change").is_empty());

        host.pointer_up(900.0, 10.0);
        assert_eq!(host.total_listeners(), 0);
        assert_eq!(
            slider.events_named("change")[0].field("value"),
            Some(&json!("100"))
        );
    }

    #[test]
    fn label_formats() {
        let host = HeadlessHost::new();
        let slider = mount::<Slider>(
            &host,
            &[("min", "10"), ("max", "50"), ("value", "30"), ("label-format", "fraction")],
        );
        let label = || {
            slider.with_view(|view| view.query(".value-label").map(|label| label.text_content()))
        };
        assert_eq!(label().as_deref(), Some("20 / 40"));
        slider.set_attribute("label-format", "percent");
        assert_eq!(label().as_deref(), Some("50%"));
        slider.set_attribute("label-display", "false");
        assert_eq!(label(), None);
    }
}
