use widget_contract::{
    el,
    style::{component_token, Rule, StyleSheet, AVATAR_SIZE},
    ColorRole, Context, RenderContext, SemanticColor, Size, Update, View, Widget, WidgetColor,
};

const DEFAULT_ALT: &str = "AN";

/// Display text for an avatar without an image: first letters of the first two
/// words, else the first two characters, upper-cased.
pub fn initials(alt: &str) -> String {
    let mut words = alt.split_whitespace();
    let letters: String = match (words.next(), words.next()) {
        (Some(first), Some(second)) => first.chars().take(1).chain(second.chars().take(1)).collect(),
        _ => alt.trim().chars().take(2).collect(),
    };
    letters.to_uppercase()
}

#[derive(Debug, Default)]
/// `y-avatar`: image or initials in a circle or square.
pub struct Avatar;

impl Widget for Avatar {
    type Msg = ();

    const TAG: &'static str = "y-avatar";
    const OBSERVED: &'static [&'static str] = &["src", "alt", "size", "shape", "color"];

    fn create() -> Self {
        Self
    }

    fn update(&mut self, _cx: &mut Context<'_, Self>, _msg: ()) -> Update {
        Update::None
    }

    fn render(&self, cx: &RenderContext<'_>) -> View<()> {
        let attrs = cx.attrs;
        let alt = attrs.non_empty("alt").unwrap_or(DEFAULT_ALT);
        let size = Size::parse(attrs.get("size"));
        let (shape, corner) = match attrs.get("shape").map(str::trim) {
            Some("square") => ("square", "4px"),
            _ => ("circle", "9999px"),
        };
        let dimension = component_token("avatar", "size", size, AVATAR_SIZE.literal(size));
        let radius = format!("var(--component-avatar-border-radius-{shape}, {corner})");
        let color = WidgetColor::parse(attrs.get("color"), SemanticColor::Primary);

        let host = Rule::new(":host")
            .decl("display", "inline-block")
            .decl("width", dimension.clone())
            .decl("height", dimension.clone())
            .decl("min-width", dimension.clone());
        match attrs.non_empty("src") {
            Some(src) => {
                let sheet = StyleSheet::new(":host { display: inline-block; }")
                    .rule(host)
                    .rule(
                        Rule::new("img")
                            .decl("width", "100%")
                            .decl("height", "100%")
                            .decl("object-fit", "cover")
                            .decl("border-radius", radius),
                    );
                View::new(sheet).child(
                    el("img")
                        .attr("src", src)
                        .attr("alt", alt)
                        .attr("part", "avatar"),
                )
            }
            None => {
                let sheet = StyleSheet::new(
                    ":host { font-family: var(--font-family-header, \"Lexend\"), sans-serif; }\n\
                     .avatar { width: 100%; height: 100%; display: flex; align-items: center; justify-content: center; }\n\
                     .avatar h5 { margin: 0; }",
                )
                .rule(host)
                .rule(
                    Rule::new(".avatar")
                        .decl("border-radius", radius)
                        .decl("background-color", color.resolve(ColorRole::Content))
                        .decl("color", color.resolve(ColorRole::BackgroundComponent)),
                )
                .rule(Rule::new(".avatar h5").decl("font-size", format!("calc({dimension} * 0.5)")));
                View::new(sheet).child(
                    el("div")
                        .class("avatar")
                        .attr("part", "avatar")
                        .attr("role", "img")
                        .attr("aria-label", alt)
                        .child(el("h5").text(initials(alt))),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use widget_contract::headless::{mount, HeadlessHost};

    use super::*;

    #[test]
    fn initials_prefer_two_words() {
        assert_eq!(initials("ada lovelace"), "AL");
        assert_eq!(initials("grace"), "GR");
        assert_eq!(initials("  x  "), "X");
    }

    #[test]
    fn falls_back_to_default_alt() {
        let host = HeadlessHost::new();
        let avatar = mount::<Avatar>(&host, &[]);
        assert_eq!(avatar.with_view(|view| view.text_content()), "AN");
    }

    #[test]
    fn image_replaces_initials() {
        let host = HeadlessHost::new();
        let avatar = mount::<Avatar>(&host, &[("src", "me.png"), ("alt", "Me")]);
        assert!(avatar.with_view(|view| view.query(".avatar").is_none()));
        assert_eq!(
            avatar.with_view(|view| view
                .query("img")
                .and_then(|img| img.attribute("src"))
                .map(str::to_string)),
            Some("me.png".to_string())
        );
    }
}
