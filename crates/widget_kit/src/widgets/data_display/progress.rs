use serde_json::Value;
use widget_contract::{
    el, flag_enabled, format_number, slot,
    style::{Rule, StyleSheet, PROGRESS_HEIGHT},
    ColorRole, Context, RenderContext, SemanticColor, Size, Update, View, Widget, WidgetColor,
};

const BASE_CSS: &str = r#"
:host { display: block; font-family: var(--font-family-body, sans-serif); color: var(--base-content--, #1d1d1d); }
.progress-wrapper { display: flex; flex-direction: column; gap: var(--spacing-2x-small, 4px); }
.progress-header { display: flex; align-items: center; justify-content: space-between; font-size: var(--font-size-label, 0.83em); }
.track {
  position: relative;
  width: 100%;
  background: var(--base-background-component, #ffffff);
  border: var(--component-progress-border-width, 1px) solid var(--base-background-border, #d7dbde);
  border-radius: var(--component-progress-border-radius-outer, 4px);
  overflow: hidden;
  box-sizing: border-box;
  padding: var(--component-progress-padding, 0);
}
.bar { position: relative; height: 100%; border-radius: var(--component-progress-border-radius-inner, 2px); overflow: hidden; }
.value-label {
  position: absolute;
  inset: 0;
  display: flex;
  align-items: center;
  justify-content: center;
  font-size: var(--font-size-small, 0.75em);
  font-variant-numeric: tabular-nums;
  white-space: nowrap;
  pointer-events: none;
  font-weight: 600;
}
.value-label--bar { color: var(--base-background-component, #ffffff); }
@keyframes indeterminate {
  0% { transform: translateX(0%); }
  50% { transform: translateX(233%); }
  100% { transform: translateX(0%); }
}
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Text shown inside the track.
pub enum LabelFormat {
    /// Rounded percentage.
    #[default]
    Percent,
    /// `value / max`.
    Value,
    /// `(value - min) / (max - min)`.
    Fraction,
}

impl LabelFormat {
    /// Parses a `label-format` attribute; unknown values are percent.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("value") => Self::Value,
            Some("fraction") => Self::Fraction,
            _ => Self::Percent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Numeric state of a progress bar read from its attributes.
pub struct ProgressRange {
    /// Current value; `None` when unset or not a number.
    pub value: Option<f64>,
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
    /// Positive step, if any.
    pub step: Option<f64>,
}

impl ProgressRange {
    /// Reads `value`, `min`, `max` and `step`. A missing `min` is 0; a missing or zero `max` is 100.
    pub fn from_attrs(attrs: &widget_contract::AttributeMap) -> Self {
        Self {
            value: attrs.number("value"),
            min: attrs.number("min").unwrap_or(0.0),
            max: attrs.number("max").filter(|max| *max != 0.0).unwrap_or(100.0),
            step: attrs.number("step").filter(|step| *step > 0.0),
        }
    }

    /// Filled share in `0..=100`, snapped to the step when one is set.
    pub fn percentage(&self) -> f64 {
        let Some(value) = self.value else {
            return 0.0;
        };
        let range = self.max - self.min;
        if range <= 0.0 {
            return 0.0;
        }
        let mut percent = (value - self.min) / range * 100.0;
        if let Some(step) = self.step {
            let step_percent = step / range * 100.0;
            percent = (percent / step_percent).round() * step_percent;
        }
        percent.clamp(0.0, 100.0)
    }

    /// Label text for `format`; empty without a value.
    pub fn label(&self, format: LabelFormat) -> String {
        let Some(value) = self.value else {
            return String::new();
        };
        match format {
            LabelFormat::Percent => format!("{}%", self.percentage().round()),
            LabelFormat::Value => format!("{} / {}", format_number(value), format_number(self.max)),
            LabelFormat::Fraction => format!(
                "{} / {}",
                format_number(value - self.min),
                format_number(self.max - self.min)
            ),
        }
    }
}

#[derive(Debug, Clone)]
/// Progress messages.
pub enum ProgressMsg {
    /// Adds one step (or 1).
    Increment,
    /// Subtracts one step (or 1).
    Decrement,
}

#[derive(Debug, Default)]
/// `y-progress`: determinate or indeterminate progress bar.
pub struct Progress;

impl Widget for Progress {
    type Msg = ProgressMsg;

    const TAG: &'static str = "y-progress";
    const OBSERVED: &'static [&'static str] = &[
        "value",
        "min",
        "max",
        "step",
        "size",
        "color",
        "label-display",
        "label-format",
        "indeterminate",
        "disabled",
    ];
    const DEFAULTS: &'static [(&'static str, &'static str)] =
        &[("size", "medium"), ("min", "0"), ("max", "100")];

    fn create() -> Self {
        Self
    }

    fn update(&mut self, cx: &mut Context<'_, Self>, msg: ProgressMsg) -> Update {
        let range = ProgressRange::from_attrs(cx.attrs());
        let Some(value) = range.value else {
            return Update::None;
        };
        let step = range.step.unwrap_or(1.0);
        let next = match msg {
            ProgressMsg::Increment => (value + step).min(range.max),
            ProgressMsg::Decrement => (value - step).max(range.min),
        };
        cx.set_attribute("value", format_number(next));
        Update::None
    }

    fn render(&self, cx: &RenderContext<'_>) -> View<ProgressMsg> {
        let attrs = cx.attrs;
        let range = ProgressRange::from_attrs(attrs);
        let indeterminate = attrs.has("indeterminate");
        let disabled = attrs.has("disabled");
        let percent = range.percentage();
        let color = WidgetColor::parse(attrs.get("color"), SemanticColor::Primary);
        let bar_color = color.resolve(ColorRole::Content);
        let size = Size::parse(attrs.get("size"));
        let show_label = flag_enabled(attrs.get("label-display"), true) && !indeterminate;
        let label = if indeterminate {
            String::new()
        } else {
            range.label(LabelFormat::parse(attrs.get("label-format")))
        };

        let bar_rule = if indeterminate {
            Rule::new(".bar")
                .decl("width", "30%")
                .decl("transition", "none")
                .decl("animation", "indeterminate 1.5s ease-in-out infinite")
        } else {
            Rule::new(".bar")
                .decl("width", format!("{}%", format_number(percent)))
                .decl("transition", "width 0.3s ease")
        };
        let fill_share = if percent > 0.0 { percent } else { 1.0 };
        let sheet = StyleSheet::new(BASE_CSS)
            .rule(
                Rule::new(":host")
                    .decl("opacity", if disabled { "0.5" } else { "1" })
                    .decl("pointer-events", if disabled { "none" } else { "auto" }),
            )
            .rule(Rule::new(".track").decl("height", PROGRESS_HEIGHT.resolve(size)))
            .rule(bar_rule.decl("background", bar_color.clone()))
            .rule(Rule::new(".value-label--track").decl("color", bar_color))
            .rule(
                Rule::new(".value-label--bar")
                    .decl("width", format!("calc(100% / ({} / 100))", format_number(fill_share))),
            );

        let track_label = show_label.then(|| {
            el("span")
                .class("value-label value-label--track")
                .attr("part", "value-label")
                .text(label.clone())
        });
        let bar_label = show_label.then(|| {
            el("span")
                .class("value-label value-label--bar")
                .text(label.clone())
        });
        let track = el("div")
            .class("track")
            .attr("part", "track")
            .attr("role", "progressbar")
            .attr(
                "aria-valuenow",
                range.value.map(format_number).unwrap_or_default(),
            )
            .attr("aria-valuemin", format_number(range.min))
            .attr("aria-valuemax", format_number(range.max))
            .attr_opt("aria-busy", indeterminate.then_some("true"))
            .child_opt(track_label)
            .child(el("div").class("bar").attr("part", "bar").child_opt(bar_label));

        View::new(sheet).child(
            el("div")
                .class("progress-wrapper")
                .child(
                    el("div")
                        .class("progress-header")
                        .child(el("span").class("label").child(slot(None))),
                )
                .child(track),
        )
    }

    fn method(name: &str, _args: &Value) -> Option<Result<ProgressMsg, String>> {
        match name {
            "increment" => Some(Ok(ProgressMsg::Increment)),
            "decrement" => Some(Ok(ProgressMsg::Decrement)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use widget_contract::{
        headless::{mount, HeadlessHost},
        AttributeMap,
    };

    use super::*;

    fn range(pairs: &[(&str, &str)]) -> ProgressRange {
        ProgressRange::from_attrs(&AttributeMap::from_pairs(pairs.iter().copied()))
    }

    #[test]
    fn percentage_snaps_to_step_and_clamps() {
        assert_eq!(range(&[("value", "33"), ("step", "25")]).percentage(), 25.0);
        assert_eq!(range(&[("value", "150")]).percentage(), 100.0);
        assert_eq!(range(&[]).percentage(), 0.0);
    }

    #[test]
    fn labels_follow_format() {
        let current = range(&[("value", "30"), ("min", "10"), ("max", "50")]);
        assert_eq!(current.label(LabelFormat::Percent), "50%");
        assert_eq!(current.label(LabelFormat::Value), "30 / 50");
        assert_eq!(current.label(LabelFormat::Fraction), "20 / 40");
    }

    #[test]
    fn indeterminate_is_busy_without_label() {
        let host = HeadlessHost::new();
        let progress = mount::<Progress>(&host, &[("value", "40"), ("indeterminate", "")]);
        progress.with_view(|view| {
            let track = view.query(".track").expect("track");
            assert_eq!(track.attribute("aria-busy"), Some("true"));
            assert_eq!(track.attribute("aria-valuenow"), Some("40"));
            assert!(view.query(".value-label").is_none());
        });
    }

    #[test]
    fn increment_stops_at_max() {
        let host = HeadlessHost::new();
        let progress = mount::<Progress>(&host, &[("value", "95"), ("step", "10")]);
        progress.invoke("increment", &json!(null)).expect("increment");
        assert_eq!(progress.attribute("value").as_deref(), Some("100"));
        assert_eq!(progress.with_view(|view| view.text_content()), "100%100%");
    }
}
