use serde::{Deserialize, Serialize};
use serde_json::Value;
use widget_contract::{
    el, slot, Context, Element, EventKind, RenderContext, Size, Update, View, Widget,
};

use super::MenuItem;
use crate::icon::IconName;

const CSS: &str = r#"
:host {
  display: block;
  font-family: var(--font-family-body, sans-serif);
  color: var(--base-content--, #1d1d1d);
}
.appbar {
  display: flex;
  background: var(--base-background-component, #ffffff);
  border: var(--component-sidebar-border-width, 2px) solid var(--base-background-border, #d7dbde);
  border-radius: var(--component-sidebar-border-radius, 4px);
  overflow: hidden;
  padding: var(--component-appbar-padding, var(--component-sidebar-padding, 8px));
  box-sizing: border-box;
}
.appbar.vertical {
  flex-direction: column;
  width: var(--component-appbar-width, 240px);
  height: 100%;
  transition: width 0.2s ease;
}
.appbar.vertical.collapsed { width: var(--component-appbar-collapsed-width, 56px); }
.appbar.horizontal { flex-direction: row; width: 100%; height: auto; align-items: center; }
.appbar-header, .appbar-body, .appbar-footer { flex-shrink: 0; display: flex; gap: 2px; }
.appbar-header { align-items: center; gap: var(--spacing-small, 8px); }
.appbar-body { flex: 1; overflow-y: auto; overflow-x: hidden; }
.appbar.vertical .appbar-body, .appbar.vertical .appbar-footer { flex-direction: column; }
.appbar.horizontal .appbar-body { flex-direction: row; overflow-y: hidden; overflow-x: auto; align-items: center; }
.appbar.vertical .appbar-header {
  border-bottom: var(--component-sidebar-border-width, 2px) solid var(--base-background-border, #d7dbde);
  padding-bottom: var(--component-appbar-padding, 8px);
  margin-bottom: var(--component-appbar-padding, 8px);
}
.appbar.vertical .appbar-footer {
  border-top: var(--component-sidebar-border-width, 2px) solid var(--base-background-border, #d7dbde);
  padding-top: var(--component-appbar-padding, 8px);
  margin-top: var(--component-appbar-padding, 8px);
}
.appbar.horizontal .appbar-header {
  border-right: var(--component-sidebar-border-width, 2px) solid var(--base-background-border, #d7dbde);
  padding-right: var(--component-appbar-padding, 8px);
  margin-right: var(--component-appbar-padding, 8px);
}
.appbar.horizontal .appbar-footer {
  border-left: var(--component-sidebar-border-width, 2px) solid var(--base-background-border, #d7dbde);
  padding-left: var(--component-appbar-padding, 8px);
  margin-left: var(--component-appbar-padding, 8px);
}
.appbar.vertical.collapsed .appbar-header,
.appbar.vertical.collapsed .appbar-body,
.appbar.vertical.collapsed .appbar-footer { align-items: center; }
.appbar.vertical.collapsed .title { display: none; }
.appbar-item { display: block; width: 100%; }
.appbar.horizontal .appbar-item { width: auto; }
.label { flex: 1; text-align: left; white-space: nowrap; }
::slotted(*) { display: block; }
"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One entry of the `items` JSON list.
pub struct AppbarItem {
    /// Button label.
    #[serde(default)]
    pub text: String,
    /// Built-in icon token.
    #[serde(default)]
    pub icon: Option<String>,
    /// Navigation target.
    #[serde(default)]
    pub href: Option<String>,
    /// Entries of the companion menu.
    #[serde(default)]
    pub children: Vec<AppbarItem>,
}

impl AppbarItem {
    fn menu_item(&self) -> MenuItem {
        MenuItem {
            text: self.text.clone(),
            url: self.href.clone(),
            icon: self.icon.clone(),
            children: self.children.iter().map(Self::menu_item).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Bar layout.
pub enum Orientation {
    /// Sidebar.
    Vertical,
    /// Top bar.
    Horizontal,
}

impl Orientation {
    /// Parses an `orientation` attribute; anything but `horizontal` is vertical.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("horizontal") => Self::Horizontal,
            _ => Self::Vertical,
        }
    }

    /// Attribute token.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Vertical => "vertical",
            Self::Horizontal => "horizontal",
        }
    }
}

#[derive(Debug, Clone)]
/// Appbar messages.
pub enum AppbarMsg {
    /// Collapse button or `toggle()`.
    Toggle,
    /// Item with `href` clicked.
    Navigate(String),
}

#[derive(Debug, Default)]
/// `y-appbar`: navigation bar built from `items`, with logo/title header and footer.
pub struct Appbar;

fn item_button(
    index: usize,
    item: &AppbarItem,
    size: Size,
    orientation: Orientation,
    collapsed: bool,
) -> Vec<Element<AppbarMsg>> {
    let id = format!("appbar-item-{index}");
    let icon = item
        .icon
        .as_deref()
        .and_then(IconName::parse)
        .map(|icon| el("span").attr("slot", "left-icon").child(icon.render()));
    let has_menu = !item.children.is_empty();
    let button = el("y-button")
        .class("appbar-item")
        .attr("id", id.clone())
        .attr("color", "base")
        .attr("style-type", "flat")
        .attr("size", size.token())
        .attr_opt("aria-label", collapsed.then(|| item.text.clone()))
        .attr_opt("aria-haspopup", has_menu.then_some("menu"))
        .child_opt(icon)
        .child_opt((!collapsed).then(|| el("span").class("label").text(item.text.clone())))
        .child_opt((has_menu && !collapsed).then(|| {
            el("span")
                .attr("slot", "right-icon")
                .child(IconName::ChevronRight.render())
        }));
    let button = match item.href.as_deref().filter(|href| !href.is_empty()) {
        Some(href) => button.on(EventKind::Click, AppbarMsg::Navigate(href.to_string())),
        None => button,
    };

    let menu = has_menu.then(|| {
        let items: Vec<MenuItem> = item.children.iter().map(AppbarItem::menu_item).collect();
        let direction = match orientation {
            Orientation::Vertical => "right",
            Orientation::Horizontal => "down",
        };
        el("y-menu")
            .attr("anchor", id)
            .attr("direction", direction)
            .attr("size", size.token())
            .attr(
                "items",
                serde_json::to_string(&items).unwrap_or_else(|_| "[]".to_string()),
            )
    });
    std::iter::once(button).chain(menu).collect()
}

impl Widget for Appbar {
    type Msg = AppbarMsg;

    const TAG: &'static str = "y-appbar";
    const OBSERVED: &'static [&'static str] = &["orientation", "collapsed", "size", "items"];
    const DEFAULTS: &'static [(&'static str, &'static str)] =
        &[("orientation", "vertical"), ("size", "medium")];

    fn create() -> Self {
        Self
    }

    fn update(&mut self, cx: &mut Context<'_, Self>, msg: AppbarMsg) -> Update {
        match msg {
            AppbarMsg::Toggle => {
                let collapsed = cx.has("collapsed");
                cx.set_flag("collapsed", !collapsed);
            }
            AppbarMsg::Navigate(href) => cx.host().navigate(&href, true),
        }
        Update::None
    }

    fn render(&self, cx: &RenderContext<'_>) -> View<AppbarMsg> {
        let orientation = Orientation::parse(cx.attrs.get("orientation"));
        let vertical = orientation == Orientation::Vertical;
        let collapsed = vertical && cx.attrs.has("collapsed");
        let size = Size::parse(cx.attrs.get("size"));
        let items: Vec<AppbarItem> = cx.attrs.json_list("items");

        let header = el("div")
            .class("appbar-header")
            .attr("part", "header")
            .child(el("div").class("logo").child(slot(Some("logo"))))
            .child_opt((!collapsed).then(|| el("div").class("title").child(slot(Some("title")))));

        let body = el("div")
            .class("appbar-body")
            .attr("part", "body")
            .children(
                items
                    .iter()
                    .enumerate()
                    .flat_map(|(index, item)| item_button(index, item, size, orientation, collapsed)),
            )
            .child(slot(None));

        let toggle = vertical.then(|| {
            let (label, icon) = if collapsed {
                ("Expand sidebar", IconName::ExpandRight)
            } else {
                ("Collapse sidebar", IconName::CollapseLeft)
            };
            el("y-button")
                .class("collapse-toggle")
                .attr("color", "base")
                .attr("style-type", "flat")
                .attr("size", size.token())
                .attr("aria-label", label)
                .child(el("span").attr("slot", "left-icon").child(icon.render()))
                .on(EventKind::Click, AppbarMsg::Toggle)
        });
        let footer = el("div")
            .class("appbar-footer")
            .attr("part", "footer")
            .child(slot(Some("footer")))
            .child_opt(toggle);

        View::new(CSS).child(
            el("div")
                .class("appbar")
                .class(orientation.token())
                .class_if(collapsed, "collapsed")
                .attr("role", "navigation")
                .child(header)
                .child(body)
                .child(footer),
        )
    }

    fn method(name: &str, _args: &Value) -> Option<Result<AppbarMsg, String>> {
        (name == "toggle").then_some(Ok(AppbarMsg::Toggle))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use widget_contract::headless::{mount, HeadlessHost};

    use super::*;

    const ITEMS: &str = r#"[
        {"text":"Home","icon":"chevron-right","href":"/"},
        {"text":"Projects","children":[{"text":"Alpha","href":"/alpha"}]}
    ]"#;

    #[test]
    fn items_render_as_flat_buttons_with_companion_menus() {
        let host = HeadlessHost::new();
        let appbar = mount::<Appbar>(&host, &[("items", ITEMS)]);
        appbar.with_view(|view| {
            let buttons = view.query_all("y-button.appbar-item");
            assert_eq!(buttons.len(), 2);
            assert_eq!(buttons[0].attribute("style-type"), Some("flat"));
            assert_eq!(buttons[0].attribute("color"), Some("base"));
            let menu = view.query("y-menu").expect("companion menu");
            assert_eq!(menu.attribute("anchor"), Some("appbar-item-1"));
            assert_eq!(menu.attribute("direction"), Some("right"));
            let items: Vec<MenuItem> =
                serde_json::from_str(menu.attribute("items").unwrap_or("[]")).expect("items");
            assert_eq!(items[0].url.as_deref(), Some("/alpha"));
            assert!(view.query("#appbar-item-1 [slot=\"right-icon\"]").is_some());
            assert!(view.query("[role=\"navigation\"]").is_some());
        });
    }

    #[test]
    fn collapse_button_toggles_and_hides_labels() {
        let host = HeadlessHost::new();
        let appbar = mount::<Appbar>(&host, &[("items", ITEMS)]);
        let toggle_label = || {
            appbar.with_view(|view| {
                view.query(".collapse-toggle")
                    .and_then(|button| button.attribute("aria-label"))
                    .map(str::to_string)
            })
        };
        assert_eq!(toggle_label().as_deref(), Some("Collapse sidebar"));

        appbar.click(".collapse-toggle");
        assert!(appbar.has_attribute("collapsed"));
        assert_eq!(toggle_label().as_deref(), Some("Expand sidebar"));
        appbar.with_view(|view| {
            assert!(view.query(".label").is_none());
            assert!(view.query(".title").is_none());
            assert!(view.query("[slot=\"right-icon\"]").is_none());
            assert!(view.query(".appbar.collapsed").is_some());
        });

        appbar.invoke("toggle", &json!(null)).expect("toggle");
        assert!(!appbar.has_attribute("collapsed"));
    }

    #[test]
    fn horizontal_ignores_collapsed_and_opens_menus_downwards() {
        let host = HeadlessHost::new();
        let appbar = mount::<Appbar>(
            &host,
            &[("items", ITEMS), ("orientation", "horizontal"), ("collapsed", "")],
        );
        appbar.with_view(|view| {
            assert!(view.query(".collapse-toggle").is_none());
            assert!(view.query(".appbar.collapsed").is_none());
            assert_eq!(view.query_all(".label").len(), 2);
            assert_eq!(
                view.query("y-menu").and_then(|menu| menu.attribute("direction")),
                Some("down")
            );
        });
    }

    #[test]
    fn href_items_navigate() {
        let host = HeadlessHost::new();
        let appbar = mount::<Appbar>(&host, &[("items", ITEMS)]);
        appbar.click("#appbar-item-0");
        assert_eq!(host.navigations(), [("/".to_string(), true)]);
    }
}
