use widget_contract::{
    el, slot,
    style::{Rule, StyleSheet, BADGE_FONT_SIZE, BADGE_MIN_SIZE, INNER_SPACING},
    ColorRole, Context, RenderContext, SemanticColor, Size, Update, View, Widget, WidgetColor,
};

const BASE_CSS: &str = r#"
:host { position: relative; display: inline-block; }
.badge {
  position: absolute;
  font-weight: bold;
  border-radius: var(--radii-full, 9999px);
  display: flex;
  align-items: center;
  justify-content: center;
  font-family: var(--font-family-mono, monospace);
  z-index: 20;
}
::slotted(*) { position: relative; display: inline-block; }
"#;

const OFFSET: &str = "-10px";

#[derive(Debug, Default)]
/// `y-badge`: small value bubble pinned to a corner of its slotted content.
pub struct Badge;

impl Widget for Badge {
    type Msg = ();

    const TAG: &'static str = "y-badge";
    const OBSERVED: &'static [&'static str] = &["value", "position", "alignment", "color", "size"];

    fn create() -> Self {
        Self
    }

    fn update(&mut self, _cx: &mut Context<'_, Self>, _msg: ()) -> Update {
        Update::None
    }

    fn render(&self, cx: &RenderContext<'_>) -> View<()> {
        let attrs = cx.attrs;
        let value = attrs.get("value").unwrap_or_default();
        let color = WidgetColor::parse(attrs.get("color"), SemanticColor::Primary);
        let size = attrs
            .get("size")
            .map_or(Size::Small, |raw| Size::parse(Some(raw)));
        let vertical = match attrs.get("position").map(str::trim) {
            Some("bottom") => "bottom",
            _ => "top",
        };
        let horizontal = match attrs.get("alignment").map(str::trim) {
            Some("left") => "left",
            _ => "right",
        };
        let min_size = BADGE_MIN_SIZE.literal(size);

        let sheet = StyleSheet::new(BASE_CSS).rule(
            Rule::new(".badge")
                .decl(vertical, OFFSET)
                .decl(horizontal, OFFSET)
                .decl("background", color.resolve(ColorRole::Content))
                .decl("color", color.resolve(ColorRole::BackgroundComponent))
                .decl("font-size", BADGE_FONT_SIZE.resolve(size))
                .decl("padding", INNER_SPACING.resolve(size))
                .decl("min-width", min_size)
                .decl("height", min_size),
        );
        let badge = el("div")
            .class("badge")
            .attr("part", "badge")
            .attr("data-position", vertical)
            .attr("data-alignment", horizontal)
            .text(value);
        let badge = if value.trim().is_empty() {
            badge.style("display", "none")
        } else {
            badge
        };
        View::new(sheet).child(slot(None)).child(badge)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use widget_contract::headless::{mount, HeadlessHost};

    use super::*;

    #[test]
    fn empty_value_hides_the_bubble() {
        let host = HeadlessHost::new();
        let badge = mount::<Badge>(&host, &[]);
        assert_eq!(
            badge.with_view(|view| view
                .query(".badge")
                .and_then(|element| element.style_value("display"))
                .map(str::to_string)),
            Some("none".to_string())
        );
        badge.set_attribute("value", "3");
        assert_eq!(badge.with_view(|view| view.text_content()), "3");
        assert!(badge.with_view(|view| view
            .query(".badge")
            .is_some_and(|element| element.style_value("display").is_none())));
    }

    #[test]
    fn placement_defaults_to_top_right() {
        let host = HeadlessHost::new();
        let badge = mount::<Badge>(&host, &[("value", "9"), ("alignment", "left")]);
        let markup = badge.markup();
        assert!(markup.contains("top: -10px;"));
        assert!(markup.contains("left: -10px;"));
        assert!(markup.contains("min-width: 15px;"));
    }
}
