use serde::{Deserialize, Serialize};
use serde_json::Value;
use widget_contract::{
    el, format_number,
    overlay::{place, Direction},
    style::{Rule, StyleSheet, FONT_SIZE, INNER_SPACING, SPACING},
    AnchorRef, Context, Element, EventKind, RenderContext, Size, Subscription, Update, View,
    Widget,
};

use crate::{
    anchoring::{anchor_argument, dismissal, AnchorBinding},
    icon::IconName,
};

const BASE_CSS: &str = r#"
ul.menu, ul.submenu {
  list-style: none;
  margin: 0;
  padding: 0;
  background: var(--base-background-component, #ffffff);
  border: var(--component-menu-border-width, 1px) solid var(--base-background-border, #d7dbde);
  border-radius: var(--component-menu-border-radius, 4px);
  box-shadow: var(--base-shadow, 0 2px 8px rgba(0, 0, 0, 0.15));
  min-width: 150px;
  max-height: 300px;
  overflow-y: auto;
}
li.menuitem {
  position: relative;
  cursor: pointer;
  display: flex;
  align-items: center;
  justify-content: space-between;
  white-space: nowrap;
  color: var(--base-content--, #1d1d1d);
}
li.menuitem:hover { background: var(--base-background-hover, #e6ebef); }
ul.submenu { position: absolute; top: 0; left: 100%; display: none; z-index: 1001; }
li.menuitem:hover > ul.submenu, li.menuitem:focus-within > ul.submenu { display: block; }
.submenu-indicator { display: inline-flex; margin-left: 0.5rem; opacity: 0.6; }
.item-content { flex: 1; display: inline-flex; align-items: center; gap: 0.5em; }
"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One entry of the `items` JSON list.
pub struct MenuItem {
    /// Visible text.
    #[serde(default)]
    pub text: String,
    /// Navigation target.
    #[serde(default)]
    pub url: Option<String>,
    /// Built-in icon token.
    #[serde(default)]
    pub icon: Option<String>,
    /// Submenu entries.
    #[serde(default)]
    pub children: Vec<MenuItem>,
}

#[derive(Debug, Clone)]
/// Menu messages.
pub enum MenuMsg {
    /// Anchor click or `toggle()`.
    Toggle,
    /// `show()`.
    Show,
    /// Outside click, Escape or `hide()`.
    Hide,
    /// Window scrolled or resized while visible.
    Reposition,
    /// An item with a `url` was chosen.
    Navigate(String),
    /// Explicit anchor handle.
    SetAnchor(AnchorRef),
}

fn item_list(items: &[MenuItem], class: &str) -> Element<MenuMsg> {
    let entries = items.iter().map(|item| {
        let content = el("span")
            .class("item-content")
            .child_opt(
                item.icon
                    .as_deref()
                    .and_then(IconName::parse)
                    .map(IconName::render::<MenuMsg>),
            )
            .text(item.text.clone());
        let content = match &item.url {
            Some(url) => content.on(EventKind::Click, MenuMsg::Navigate(url.clone())),
            None => content,
        };
        let submenu = (!item.children.is_empty()).then(|| {
            [
                el("span")
                    .class("submenu-indicator")
                    .child(IconName::ChevronRight.render()),
                item_list(&item.children, "submenu"),
            ]
        });
        el("li")
            .class("menuitem")
            .attr("role", "menuitem")
            .attr("tabindex", "0")
            .attr_opt("aria-haspopup", submenu.is_some().then_some("menu"))
            .child(content)
            .children(submenu.into_iter().flatten())
    });
    el("ul").class(class).attr("role", "menu").children(entries)
}

#[derive(Debug, Default)]
/// `y-menu`: anchored popup menu with nested submenus.
pub struct Menu {
    anchor: AnchorBinding,
    dismiss: Vec<Subscription>,
}

impl Menu {
    fn open(&mut self, cx: &mut Context<'_, Self>) {
        self.dismiss = dismissal(
            cx,
            self.anchor.get().cloned(),
            MenuMsg::Hide,
            Some(MenuMsg::Reposition),
        );
        self.position(cx);
    }

    fn close(&mut self, cx: &mut Context<'_, Self>) {
        self.dismiss.clear();
        cx.set_host_style("display", "none");
    }

    fn position(&self, cx: &mut Context<'_, Self>) {
        let anchor_rect = self
            .anchor
            .get()
            .and_then(|anchor| cx.host().element_rect(anchor.key));
        let (Some(anchor_rect), true) = (anchor_rect, cx.has("visible")) else {
            cx.set_host_style("display", "none");
            return;
        };
        let own = cx.host().element_rect(cx.key()).unwrap_or_default();
        let placement = place(
            anchor_rect,
            own.width,
            own.height,
            cx.host().viewport(),
            Direction::parse(cx.attribute("direction")),
        );
        cx.set_host_style("top", format!("{}px", format_number(placement.top)));
        cx.set_host_style("left", format!("{}px", format_number(placement.left)));
        cx.set_host_style("display", "block");
    }
}

impl Widget for Menu {
    type Msg = MenuMsg;

    const TAG: &'static str = "y-menu";
    const OBSERVED: &'static [&'static str] = &["items", "anchor", "visible", "direction", "size"];
    const DEFAULTS: &'static [(&'static str, &'static str)] = &[("items", "[]")];

    fn create() -> Self {
        Self::default()
    }

    fn attached(&mut self, cx: &mut Context<'_, Self>) {
        cx.set_host_style("position", "fixed");
        cx.set_host_style("z-index", "1000");
        cx.set_host_style("display", "none");
        self.anchor.resolve(cx, Some(MenuMsg::Toggle));
        if cx.has("visible") {
            self.open(cx);
        }
    }

    fn attribute_changed(
        &mut self,
        cx: &mut Context<'_, Self>,
        name: &str,
        _old: Option<&str>,
        _new: Option<&str>,
    ) -> Update {
        match name {
            "visible" if cx.has("visible") => self.open(cx),
            "visible" => self.close(cx),
            "anchor" => {
                self.anchor.clear_explicit();
                self.anchor.resolve(cx, Some(MenuMsg::Toggle));
                if cx.has("visible") {
                    self.open(cx);
                }
            }
            "direction" => self.position(cx),
            _ => return Update::Render,
        }
        Update::None
    }

    fn update(&mut self, cx: &mut Context<'_, Self>, msg: MenuMsg) -> Update {
        match msg {
            MenuMsg::Toggle => {
                let visible = cx.has("visible");
                cx.set_flag("visible", !visible);
            }
            MenuMsg::Show => cx.set_flag("visible", true),
            MenuMsg::Hide => cx.set_flag("visible", false),
            MenuMsg::Reposition => self.position(cx),
            MenuMsg::Navigate(url) => {
                cx.host().navigate(&url, true);
                cx.set_flag("visible", false);
            }
            MenuMsg::SetAnchor(anchor) => {
                self.anchor.set_explicit(cx, anchor, Some(MenuMsg::Toggle));
                if cx.has("visible") {
                    self.open(cx);
                }
            }
        }
        Update::None
    }

    fn render(&self, cx: &RenderContext<'_>) -> View<MenuMsg> {
        let items: Vec<MenuItem> = cx.attrs.json_list("items");
        let size = Size::parse(cx.attrs.get("size"));
        let sheet = StyleSheet::new(BASE_CSS)
            .rule(Rule::new("ul.menu, ul.submenu").decl("font-size", FONT_SIZE.resolve(size)))
            .rule(Rule::new("li.menuitem").decl(
                "padding",
                format!("{} {}", INNER_SPACING.resolve(size), SPACING.resolve(size)),
            ));
        View::new(sheet).child(item_list(&items, "menu"))
    }

    fn detached(&mut self, _cx: &mut Context<'_, Self>) {
        self.anchor.release();
        self.dismiss.clear();
    }

    fn method(name: &str, args: &Value) -> Option<Result<MenuMsg, String>> {
        match name {
            "show" => Some(Ok(MenuMsg::Show)),
            "hide" => Some(Ok(MenuMsg::Hide)),
            "toggle" => Some(Ok(MenuMsg::Toggle)),
            "setAnchor" => Some(anchor_argument(args).map(MenuMsg::SetAnchor)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use widget_contract::{
        headless::{mount, HeadlessHost, Mounted},
        Rect,
    };

    use super::*;

    const ITEMS: &str = r#"[
        {"text":"Profile","url":"/profile"},
        {"text":"More","children":[{"text":"Help","url":"/help"}]}
    ]"#;

    fn anchored(host: &HeadlessHost) -> (widget_contract::ElementKey, Mounted<Menu>) {
        let button = host.add_element(Some("menu-button"), Rect::new(20.0, 20.0, 80.0, 30.0));
        let menu = mount::<Menu>(host, &[("anchor", "menu-button"), ("items", ITEMS)]);
        (button, menu)
    }

    #[test]
    fn anchor_click_toggles_and_dismissal_closes() {
        let host = HeadlessHost::new();
        let (button, menu) = anchored(&host);
        assert_eq!(menu.host_style("display").as_deref(), Some("none"));

        host.click(button);
        assert!(menu.has_attribute("visible"));
        assert_eq!(menu.host_style("display").as_deref(), Some("block"));
        host.click(button);
        assert!(!menu.has_attribute("visible"));

        host.click(button);
        host.click_outside();
        assert!(!menu.has_attribute("visible"));

        host.click(button);
        host.press_key("Escape");
        assert!(!menu.has_attribute("visible"));
    }

    #[test]
    fn clicks_inside_the_menu_keep_it_open() {
        let host = HeadlessHost::new();
        let (button, menu) = anchored(&host);
        host.click(button);
        menu.click("li.menuitem");
        assert!(menu.has_attribute("visible"));
    }

    #[test]
    fn no_ambient_listeners_remain_after_detach() {
        let host = HeadlessHost::new();
        let (button, menu) = anchored(&host);
        host.click(button);
        assert!(host.total_listeners() > 1);
        menu.detach();
        assert_eq!(host.total_listeners(), 0);
    }

    #[test]
    fn hidden_menu_holds_only_the_anchor_listener() {
        let host = HeadlessHost::new();
        let (button, _menu) = anchored(&host);
        assert_eq!(host.total_listeners(), 1);
        host.click(button);
        host.click(button);
        assert_eq!(host.total_listeners(), 1);
    }

    #[test]
    fn placement_flips_and_clamps_inside_the_viewport() {
        let host = HeadlessHost::new();
        host.set_viewport(800.0, 600.0);
        let button = host.add_element(Some("corner"), Rect::new(700.0, 560.0, 80.0, 20.0));
        let menu = Mounted::<Menu>::build(&host, &[("anchor", "corner")]);
        host.set_rect(menu.key(), Rect::new(0.0, 0.0, 150.0, 100.0));
        menu.attach();

        host.click(button);
        assert_eq!(menu.host_style("top").as_deref(), Some("460px"));
        assert_eq!(menu.host_style("left").as_deref(), Some("640px"));
    }

    #[test]
    fn url_items_navigate_and_hide() {
        let host = HeadlessHost::new();
        let (button, menu) = anchored(&host);
        host.click(button);
        menu.click(".item-content");
        assert_eq!(host.navigations(), [("/profile".to_string(), true)]);
        assert!(!menu.has_attribute("visible"));
    }

    #[test]
    fn submenus_render_with_indicator() {
        let host = HeadlessHost::new();
        let (_, menu) = anchored(&host);
        menu.with_view(|view| {
            assert_eq!(view.query_all("li.menuitem").len(), 3);
            assert!(view.query("ul.submenu[role=\"menu\"]").is_some());
            assert!(view.query(".submenu-indicator svg").is_some());
        });
    }

    #[test]
    fn explicit_anchor_overrides_the_id_until_the_id_changes() {
        let host = HeadlessHost::new();
        let (button, menu) = anchored(&host);
        let other = host.add_element(None, Rect::new(0.0, 0.0, 10.0, 10.0));
        let second = host.add_element(Some("second-button"), Rect::new(200.0, 20.0, 80.0, 30.0));
        menu.invoke("setAnchor", &json!(other.0)).expect("setAnchor");

        host.click(button);
        assert!(!menu.has_attribute("visible"));
        host.click(other);
        assert!(menu.has_attribute("visible"));
        host.press_key("Escape");
        assert!(!menu.has_attribute("visible"));

        menu.set_attribute("anchor", "second-button");
        host.click(other);
        assert!(!menu.has_attribute("visible"));
        host.click(second);
        assert!(menu.has_attribute("visible"));
        assert_eq!(menu.host_style("left").as_deref(), Some("200px"));
    }

    #[test]
    fn explicit_anchor_survives_detach_and_attach() {
        let host = HeadlessHost::new();
        let (_, menu) = anchored(&host);
        let other = host.add_element(None, Rect::new(0.0, 0.0, 10.0, 10.0));
        menu.invoke("setAnchor", &json!(other.0)).expect("setAnchor");

        menu.detach();
        assert_eq!(host.total_listeners(), 0);
        menu.attach();
        assert_eq!(host.total_listeners(), 1);

        host.click(other);
        assert!(menu.has_attribute("visible"));
    }
}
