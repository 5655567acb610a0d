use leptos::*;
use leptos_meta::*;
use leptos_router::*;
use serde_json::{json, Value};
use widget_host_web::{invoke, WidgetElement};

const TOAST_ID: &str = "gallery-toast";
const DIALOG_ID: &str = "gallery-dialog";
const DRAWER_ID: &str = "gallery-drawer";

/// Gallery sections: `(tag, title, view)`.
pub const SECTIONS: &[(&str, &str, fn() -> View)] = &[
    ("y-button", "Button", button_section),
    ("y-tag", "Tag", tag_section),
    ("y-avatar", "Avatar", avatar_section),
    ("y-badge", "Badge", badge_section),
    ("y-card", "Card", card_section),
    ("y-progress", "Progress", progress_section),
    ("y-tooltip", "Tooltip", tooltip_section),
    ("y-panelbar", "Panels", panel_section),
    ("y-appbar", "Appbar", appbar_section),
    ("y-menu", "Menu", menu_section),
    ("y-tabs", "Tabs", tabs_section),
    ("y-table", "Table", table_section),
    ("y-input", "Form controls", form_section),
    ("y-dialog", "Dialog", dialog_section),
    ("y-drawer", "Drawer", drawer_section),
    ("y-toast", "Toast", toast_section),
];

fn attrs(pairs: &[(&'static str, &str)]) -> Vec<(&'static str, String)> {
    pairs
        .iter()
        .map(|(name, value)| (*name, (*value).to_string()))
        .collect()
}

fn call(id: &str, method: &str, args: Value) {
    let Some(element) = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(id))
    else {
        logging::debug_warn!("gallery element #{id} is missing");
        return;
    };
    if let Err(err) = invoke(&element, method, &args) {
        logging::warn!("{method} on #{id} failed: {err}");
    }
}

#[component]
pub fn SiteApp() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="Widget gallery" />
        <Meta name="description" content="Attribute-driven custom element widgets." />

        <Router>
            <main class="site-root">
                <Routes>
                    <Route path="" view=Gallery />
                    <Route path="/widgets/:tag" view=WidgetRoute />
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn ThemeScope(children: Children) -> impl IntoView {
    let (dark, set_dark) = create_signal(false);
    create_effect(move |_| {
        let mode = if dark.get() { "dark" } else { "light" };
        if let Some(scope) = document().query_selector("y-theme.gallery-theme").ok().flatten() {
            let _ = scope.set_attribute("mode", mode);
        }
    });

    view! {
        <label class="mode-switch">
            <input
                type="checkbox"
                on:change=move |event| set_dark.set(event_target_checked(&event))
            />
            " Dark mode"
        </label>
        <WidgetElement tag="y-theme" attrs=attrs(&[("theme", "blue"), ("class", "gallery-theme")])>
            {children()}
        </WidgetElement>
    }
}

#[component]
pub fn Gallery() -> impl IntoView {
    view! {
        <ThemeScope>
            <h1>"Widget gallery"</h1>
            <nav class="gallery-index">
                {SECTIONS
                    .iter()
                    .map(|(tag, title, _)| view! { <A href=format!("/widgets/{tag}")>{*title}</A> })
                    .collect_view()}
            </nav>
            {SECTIONS
                .iter()
                .map(|(tag, title, section)| view! {
                    <section class="gallery-section" id=*tag>
                        <h2>{*title}</h2>
                        {section()}
                    </section>
                })
                .collect_view()}
        </ThemeScope>
    }
}

#[component]
fn WidgetRoute() -> impl IntoView {
    let params = use_params_map();
    let tag = move || params.with(|map| map.get("tag").cloned()).unwrap_or_default();

    view! {
        <ThemeScope>
            <A href="/">"All widgets"</A>
            {move || {
                let tag = tag();
                match SECTIONS.iter().find(|(known, _, _)| *known == tag) {
                    Some((_, title, section)) => view! {
                        <section class="gallery-section">
                            <h2>{*title}</h2>
                            {section()}
                        </section>
                    }
                    .into_view(),
                    None => view! { <p>{format!("No gallery section for `{tag}`.")}</p> }.into_view(),
                }
            }}
        </ThemeScope>
    }
}

fn button_section() -> View {
    view! {
        <WidgetElement tag="y-button" attrs=attrs(&[("color", "primary")])>"Primary"</WidgetElement>
        <WidgetElement tag="y-button" attrs=attrs(&[("color", "success"), ("style-type", "outlined")])>
            "Outlined"
        </WidgetElement>
        <WidgetElement tag="y-button" attrs=attrs(&[("color", "danger"), ("size", "small"), ("disabled", "")])>
            "Disabled"
        </WidgetElement>
    }
    .into_view()
}

fn tag_section() -> View {
    view! {
        <WidgetElement tag="y-tag" attrs=attrs(&[("color", "primary")])>"Rust"</WidgetElement>
        <WidgetElement tag="y-tag" attrs=attrs(&[("color", "warning"), ("removable", ""), ("shape", "pill")])>
            "Removable"
        </WidgetElement>
    }
    .into_view()
}

fn avatar_section() -> View {
    view! {
        <WidgetElement tag="y-avatar" attrs=attrs(&[("alt", "Ada Lovelace"), ("color", "secondary")]) />
        <WidgetElement tag="y-avatar" attrs=attrs(&[("alt", "Grace Hopper"), ("shape", "square"), ("size", "large")]) />
    }
    .into_view()
}

fn badge_section() -> View {
    view! {
        <WidgetElement tag="y-badge" attrs=attrs(&[("value", "7"), ("color", "danger")])>
            <WidgetElement tag="y-button">"Inbox"</WidgetElement>
        </WidgetElement>
    }
    .into_view()
}

fn card_section() -> View {
    view! {
        <WidgetElement tag="y-card" attrs=attrs(&[("raised", "")])>
            <p>"Cards group related content on a raised surface."</p>
        </WidgetElement>
    }
    .into_view()
}

fn progress_section() -> View {
    view! {
        <WidgetElement tag="y-progress" attrs=attrs(&[("value", "40"), ("max", "100")]) />
        <WidgetElement tag="y-progress" attrs=attrs(&[("value", "3"), ("max", "5"), ("step", "1")]) />
    }
    .into_view()
}

fn tooltip_section() -> View {
    view! {
        <WidgetElement tag="y-tooltip" attrs=attrs(&[("text", "Saves the draft"), ("position", "bottom")])>
            <WidgetElement tag="y-button">"Hover me"</WidgetElement>
        </WidgetElement>
    }
    .into_view()
}

fn panel_section() -> View {
    view! {
        <WidgetElement tag="y-panelbar" attrs=attrs(&[("exclusive", "")])>
            <WidgetElement tag="y-panel" attrs=attrs(&[("expanded", "")])>
                <span slot="label">"Display"</span>
                <div slot="children">
                    <WidgetElement tag="y-panel" attrs=attrs(&[("href", "/widgets/y-button"), ("history", "")])>
                        <span slot="label">"Buttons"</span>
                    </WidgetElement>
                    <WidgetElement tag="y-panel" attrs=attrs(&[("href", "/widgets/y-card"), ("history", "")])>
                        <span slot="label">"Cards"</span>
                    </WidgetElement>
                </div>
            </WidgetElement>
            <WidgetElement tag="y-panel">
                <span slot="label">"Forms"</span>
                <div slot="children">
                    <WidgetElement tag="y-panel" attrs=attrs(&[("href", "/widgets/y-input"), ("history", "")])>
                        <span slot="label">"Inputs"</span>
                    </WidgetElement>
                </div>
            </WidgetElement>
        </WidgetElement>
    }
    .into_view()
}

fn appbar_section() -> View {
    let items = json!([
        {"text": "Home", "icon": "home"},
        {"text": "Settings", "icon": "settings"},
    ])
    .to_string();
    view! {
        <WidgetElement tag="y-appbar" attrs=attrs(&[("orientation", "horizontal"), ("items", items.as_str())])>
            <span slot="title">"Gallery"</span>
        </WidgetElement>
    }
    .into_view()
}

fn menu_section() -> View {
    let items = json!([
        {"text": "Profile"},
        {"text": "Docs", "url": "/widgets/y-menu"},
        {"text": "Sign out"},
    ])
    .to_string();
    view! {
        <span id="menu-trigger">"Menu anchor"</span>
        <WidgetElement tag="y-menu" attrs=attrs(&[("items", items.as_str()), ("anchor", "menu-trigger")]) />
    }
    .into_view()
}

fn tabs_section() -> View {
    let options = json!([
        {"id": "overview", "label": "Overview"},
        {"id": "usage", "label": "Usage"},
        {"id": "api", "label": "API"},
    ])
    .to_string();
    view! {
        <WidgetElement tag="y-tabs" attrs=attrs(&[("options", options.as_str()), ("active", "usage")])>
            <div slot="overview">"What the widget is for."</div>
            <div slot="usage">"How to place it in markup."</div>
            <div slot="api">"Attributes, events and methods."</div>
        </WidgetElement>
    }
    .into_view()
}

fn table_section() -> View {
    let columns = json!([
        {"field": "name", "header": "Name"},
        {"field": "role", "header": "Role"},
    ])
    .to_string();
    let data = json!([
        {"name": "Ada", "role": "Analyst"},
        {"name": "Grace", "role": "Admiral"},
        {"name": "Linus", "role": "Maintainer"},
    ])
    .to_string();
    view! {
        <WidgetElement tag="y-table" attrs=attrs(&[("columns", columns.as_str()), ("data", data.as_str()), ("striped", "")]) />
    }
    .into_view()
}

fn form_section() -> View {
    let options = json!([
        {"value": "rust", "label": "Rust"},
        {"value": "zig", "label": "Zig"},
        {"value": "go", "label": "Go"},
    ])
    .to_string();
    view! {
        <form class="gallery-form" on:submit=|event| {
            event.prevent_default();
            logging::log!("gallery form submitted");
        }>
            <WidgetElement tag="y-input" attrs=attrs(&[("name", "title"), ("placeholder", "Title")])>
                <span slot="label">"Title"</span>
            </WidgetElement>
            <WidgetElement tag="y-select" attrs=attrs(&[("name", "language"), ("options", options.as_str()), ("placeholder", "Pick one")])>
                <span slot="label">"Language"</span>
            </WidgetElement>
            <WidgetElement tag="y-radio" attrs=attrs(&[("name", "level"), ("options", options.as_str()), ("value", "rust")]) />
            <WidgetElement tag="y-checkbox" attrs=attrs(&[("name", "terms"), ("checked", "")])>"Accept terms"</WidgetElement>
            <WidgetElement tag="y-switch" attrs=attrs(&[("name", "notify"), ("label-display", "")])>
                <span slot="label">"Notifications"</span>
            </WidgetElement>
            <WidgetElement tag="y-slider" attrs=attrs(&[("name", "volume"), ("value", "30"), ("min", "0"), ("max", "100")]) />
            <WidgetElement tag="y-button" attrs=attrs(&[("type", "submit"), ("color", "primary")])>"Submit"</WidgetElement>
        </form>
    }
    .into_view()
}

fn dialog_section() -> View {
    view! {
        <div on:click=|_| call(DIALOG_ID, "show", Value::Null)>
            <WidgetElement tag="y-button">"Open dialog"</WidgetElement>
        </div>
        <WidgetElement tag="y-dialog" attrs=attrs(&[("id", DIALOG_ID), ("closable", "")])>
            <span slot="header">"Confirm"</span>
            <p slot="body">"Discard the unsaved draft?"</p>
            <div slot="footer" on:click=|_| call(DIALOG_ID, "hide", Value::Null)>
                <WidgetElement tag="y-button" attrs=attrs(&[("color", "danger")])>"Discard"</WidgetElement>
            </div>
        </WidgetElement>
    }
    .into_view()
}

fn drawer_section() -> View {
    view! {
        <div on:click=|_| call(DRAWER_ID, "toggle", Value::Null)>
            <WidgetElement tag="y-button">"Toggle drawer"</WidgetElement>
        </div>
        <WidgetElement tag="y-drawer" attrs=attrs(&[("id", DRAWER_ID), ("position", "right"), ("resizable", "")])>
            <span slot="drawer-header">"Filters"</span>
            <p slot="drawer-body">"Drag the handle to resize."</p>
        </WidgetElement>
    }
    .into_view()
}

fn toast_section() -> View {
    let show = |color: &'static str| {
        move |_: ev::MouseEvent| {
            call(
                TOAST_ID,
                "show",
                json!({"message": format!("A {color} notification"), "color": color}),
            )
        }
    };
    view! {
        <div on:click=show("success")>
            <WidgetElement tag="y-button" attrs=attrs(&[("color", "success")])>"Success toast"</WidgetElement>
        </div>
        <div on:click=show("danger")>
            <WidgetElement tag="y-button" attrs=attrs(&[("color", "danger")])>"Error toast"</WidgetElement>
        </div>
        <div on:click=|_| call(TOAST_ID, "clear", Value::Null)>
            <WidgetElement tag="y-button" attrs=attrs(&[("style-type", "outlined")])>"Clear"</WidgetElement>
        </div>
        <WidgetElement tag="y-toast" attrs=attrs(&[("id", TOAST_ID), ("position", "top-right")]) />
    }
    .into_view()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn every_section_names_a_registered_tag() {
        for (tag, _, _) in SECTIONS {
            assert!(widget_kit::is_registered(tag), "{tag}");
        }
    }

    #[test]
    fn attribute_pairs_are_owned() {
        assert_eq!(
            attrs(&[("color", "primary"), ("size", "small")]),
            vec![("color", "primary".to_string()), ("size", "small".to_string())]
        );
    }
}
