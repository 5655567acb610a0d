use widget_contract::{
    el, slot,
    slots::hide_if_empty,
    style::var,
    ColorRole, Context, RenderContext, SemanticColor, Update, View, Widget, WidgetColor,
};

const CSS: &str = r#"
:host {
  display: block;
  box-sizing: border-box;
  background: var(--card-background, var(--base-background-component, #ffffff));
  border: var(--card-border-width, 1px) solid var(--card-border-color, var(--base-background-border, #d7dbde));
  border-radius: var(--component-card-border-radius-outer, 8px);
  font-family: var(--font-family-body, sans-serif);
  color: var(--card-content-color, var(--base-content--, #1d1d1d));
  box-shadow: var(--card-box-shadow, none);
}
.header {
  background: var(--card-section-background, var(--base-background-border, #d7dbde));
  padding: var(--component-card-padding-inner, 8px) var(--component-card-padding-outer, 16px);
}
.body { padding: var(--component-card-padding-outer, 16px); }
.footer {
  padding: var(--component-card-padding-inner, 8px) var(--component-card-padding-outer, 16px);
  border-top: var(--component-card-border-width, 1px) solid var(--card-border-color, var(--base-background-border, #d7dbde));
}
::slotted(*) { margin: 0; }
"#;

#[derive(Debug, Default)]
/// `y-card`: header/body/footer surface colored through host custom properties.
pub struct Card;

impl Card {
    fn apply_host_styles(cx: &mut Context<'_, Self>) {
        let color = WidgetColor::parse(cx.attribute("color"), SemanticColor::Base);
        let border = color.resolve(ColorRole::BackgroundBorder);
        cx.set_host_style(
            "--card-content-color",
            WidgetColor::Semantic(SemanticColor::Base).resolve(ColorRole::Content),
        );
        cx.set_host_style("--card-border-color", border.clone());
        cx.set_host_style("--card-background", color.resolve(ColorRole::BackgroundComponent));
        cx.set_host_style("--card-section-background", border);

        if cx.has("raised") {
            cx.set_host_style("--card-border-width", "0");
            cx.set_host_style("--card-box-shadow", var("--base-shadow", "0 2px 8px rgba(0, 0, 0, 0.15)"));
        } else {
            cx.set_host_style("--card-border-width", var("--component-card-border-width", "1px"));
            cx.set_host_style("--card-box-shadow", "none");
        }
    }
}

impl Widget for Card {
    type Msg = ();

    const TAG: &'static str = "y-card";
    const OBSERVED: &'static [&'static str] = &["color", "raised"];

    fn create() -> Self {
        Self
    }

    fn attached(&mut self, cx: &mut Context<'_, Self>) {
        Self::apply_host_styles(cx);
    }

    fn attribute_changed(
        &mut self,
        cx: &mut Context<'_, Self>,
        _name: &str,
        _old: Option<&str>,
        _new: Option<&str>,
    ) -> Update {
        Self::apply_host_styles(cx);
        Update::None
    }

    fn update(&mut self, _cx: &mut Context<'_, Self>, _msg: ()) -> Update {
        Update::None
    }

    fn render(&self, cx: &RenderContext<'_>) -> View<()> {
        let section = |class: &str, name: Option<&str>| {
            el("div")
                .class(class)
                .attr("part", class)
                .child(slot(name))
        };
        View::new(CSS)
            .child(hide_if_empty(
                section("header", Some("header")),
                cx.slots,
                "header",
                "",
            ))
            .child(section("body", None))
            .child(hide_if_empty(
                section("footer", Some("footer")),
                cx.slots,
                "footer",
                "",
            ))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use widget_contract::{
        headless::{mount, HeadlessHost},
        SlotAssignments,
    };

    use super::*;

    #[test]
    fn raised_swaps_border_for_shadow() {
        let host = HeadlessHost::new();
        let card = mount::<Card>(&host, &[]);
        assert_eq!(card.host_style("--card-box-shadow").as_deref(), Some("none"));
        card.set_flag("raised", true);
        assert_eq!(card.host_style("--card-border-width").as_deref(), Some("0"));
    }

    #[test]
    fn color_drives_surface_tokens() {
        let host = HeadlessHost::new();
        let card = mount::<Card>(&host, &[("color", "success")]);
        assert_eq!(
            card.host_style("--card-background").as_deref(),
            Some("var(--success-background-component, #e9f6ec)")
        );
    }

    #[test]
    fn empty_header_and_footer_are_hidden() {
        let host = HeadlessHost::new();
        let card = mount::<Card>(&host, &[]);
        card.assign_slots(SlotAssignments::new().with_element("header", "h3"));
        card.with_view(|view| {
            assert!(view
                .query(".header")
                .is_some_and(|header| header.style_value("display").is_none()));
            assert_eq!(
                view.query(".footer")
                    .and_then(|footer| footer.style_value("display")),
                Some("none")
            );
        });
    }
}
