use widget_contract::{
    el, events, slot,
    style::{Rule, StyleSheet, FONT_SIZE, INNER_SPACING, SPACING},
    ColorRole, Context, EventKind, RenderContext, SemanticColor, Size, Update, View, Widget,
    WidgetColor, WidgetEvent,
};

use super::button::StyleType;
use crate::icon::IconName;

const BASE_CSS: &str = r#"
:host { display: inline-block; font-family: var(--font-family-body, sans-serif); }
.tag {
  display: inline-flex;
  align-items: center;
  gap: 4px;
  border: 1px solid transparent;
  transition: background-color 0.2s, color 0.2s;
}
.remove {
  all: unset;
  cursor: pointer;
  display: flex;
  align-items: center;
}
.remove svg { pointer-events: none; width: 14px; height: 14px; }
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Corner treatment of a tag.
pub enum TagShape {
    /// Small radius.
    #[default]
    Square,
    /// Pill.
    Round,
}

impl TagShape {
    /// Parses a `shape` attribute; unknown values are square.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("round") => Self::Round,
            _ => Self::Square,
        }
    }
}

#[derive(Debug, Clone)]
/// Tag messages.
pub enum TagMsg {
    /// Remove button activated.
    Remove,
}

#[derive(Debug, Default)]
/// `y-tag`: compact label, optionally removable.
pub struct Tag;

impl Widget for Tag {
    type Msg = TagMsg;

    const TAG: &'static str = "y-tag";
    const OBSERVED: &'static [&'static str] = &["removable", "color", "style-type", "shape", "size"];

    fn create() -> Self {
        Self
    }

    fn update(&mut self, cx: &mut Context<'_, Self>, msg: TagMsg) -> Update {
        match msg {
            TagMsg::Remove => {
                if cx.has("removable") {
                    cx.emit(WidgetEvent::bare(events::REMOVE));
                }
                Update::None
            }
        }
    }

    fn render(&self, cx: &RenderContext<'_>) -> View<TagMsg> {
        let attrs = cx.attrs;
        let color = WidgetColor::parse(attrs.get("color"), SemanticColor::Base);
        let style_type = StyleType::parse(attrs.get("style-type"), StyleType::Filled);
        let size = Size::parse(attrs.get("size"));
        let radius = match TagShape::parse(attrs.get("shape")) {
            TagShape::Round => "var(--radii-full, 9999px)",
            TagShape::Square => "var(--component-button-border-radius-outer, 4px)",
        };

        let content = color.resolve(ColorRole::Content);
        let surface = color.resolve(ColorRole::BackgroundComponent);
        let (background, foreground, border) = match style_type {
            StyleType::Filled => (content.clone(), surface, "transparent".to_string()),
            StyleType::Outlined => ("transparent".to_string(), content.clone(), content),
            StyleType::Flat => ("transparent".to_string(), content, "transparent".to_string()),
        };
        let sheet = StyleSheet::new(BASE_CSS).rule(
            Rule::new(".tag")
                .decl("background", background)
                .decl("color", foreground)
                .decl("border-color", border)
                .decl("border-radius", radius)
                .decl("font-size", FONT_SIZE.resolve(size))
                .decl(
                    "padding",
                    format!("{} {}", INNER_SPACING.resolve(size), SPACING.resolve(size)),
                ),
        );

        let remove = attrs.has("removable").then(|| {
            el("button")
                .class("remove")
                .attr("type", "button")
                .attr("aria-label", "Remove tag")
                .on(EventKind::Click, TagMsg::Remove)
                .stop_propagation(EventKind::Click)
                .child(IconName::Close.render())
        });
        View::new(sheet).child(
            el("span")
                .class("tag")
                .attr("part", "tag")
                .attr("data-color", color.token())
                .child(slot(None))
                .child_opt(remove),
        )
    }
}
