//! `y-theme`: a token scope that injects its sheets and mirrors every token onto the
//! host element as inline custom properties.

use std::collections::BTreeSet;

use widget_contract::{slot, Context, RenderContext, Update, View, Widget};

use crate::{
    catalog::{builtin_theme, bundled_variables, ThemeMode, DEFAULT_THEME},
    error::ThemeError,
    sheet::TokenSheet,
    source::theme_source,
};

#[derive(Debug, Clone)]
/// Theme scope messages.
pub enum ThemeMsg {
    /// An external stylesheet request settled.
    Loaded {
        /// Request generation; stale results are dropped.
        generation: u64,
        /// Requested path.
        path: String,
        /// Stylesheet text or the failure.
        result: Result<String, ThemeError>,
    },
}

#[derive(Debug, Default)]
/// Theme scope widget state.
pub struct Theme {
    generation: u64,
    theme_css: Option<String>,
    theme_tokens: TokenSheet,
    applied: BTreeSet<String>,
}

impl Theme {
    fn refresh(&mut self, cx: &mut Context<'_, Self>) {
        self.generation += 1;
        if let Some(path) = cx.attrs().non_empty("theme-path").map(str::to_string) {
            let generation = self.generation;
            let dispatcher = cx.dispatcher();
            let source = theme_source();
            leptos::spawn_local(async move {
                let result = source.fetch_stylesheet(&path).await;
                dispatcher.send(ThemeMsg::Loaded {
                    generation,
                    path,
                    result,
                });
            });
            return;
        }

        let mode = ThemeMode::parse(cx.attribute("mode"));
        let name = cx.attrs().non_empty("theme").unwrap_or(DEFAULT_THEME);
        let sheet = builtin_theme(name, mode).or_else(|err| {
            leptos::logging::debug_warn!("{err}; using {DEFAULT_THEME}");
            builtin_theme(DEFAULT_THEME, mode)
        });
        match sheet {
            Ok(sheet) => {
                self.theme_css = Some(sheet.to_css(":host"));
                self.theme_tokens = sheet;
            }
            Err(_) => {
                self.theme_css = None;
                self.theme_tokens = TokenSheet::default();
            }
        }
        self.mirror(cx);
    }

    fn mirror(&mut self, cx: &mut Context<'_, Self>) {
        let mut resolved = bundled_variables();
        for (name, value) in self.theme_tokens.iter() {
            resolved.insert(name.to_string(), value.to_string());
        }

        let current: BTreeSet<String> = resolved.iter().map(|(name, _)| name.to_string()).collect();
        for stale in self.applied.difference(&current) {
            cx.remove_host_style(stale);
        }
        for (name, value) in resolved.iter() {
            cx.set_host_style(name, value);
        }
        self.applied = current;
    }
}

impl Widget for Theme {
    type Msg = ThemeMsg;

    const TAG: &'static str = "y-theme";
    const OBSERVED: &'static [&'static str] = &["theme", "mode", "theme-path"];

    fn create() -> Self {
        Self::default()
    }

    fn attached(&mut self, cx: &mut Context<'_, Self>) {
        self.refresh(cx);
    }

    fn attribute_changed(
        &mut self,
        cx: &mut Context<'_, Self>,
        _name: &str,
        _old: Option<&str>,
        _new: Option<&str>,
    ) -> Update {
        self.refresh(cx);
        Update::Render
    }

    fn update(&mut self, cx: &mut Context<'_, Self>, msg: ThemeMsg) -> Update {
        match msg {
            ThemeMsg::Loaded {
                generation,
                result,
                ..
            } => {
                if generation != self.generation {
                    return Update::None;
                }
                match result {
                    Ok(css) => {
                        self.theme_tokens = TokenSheet::parse_css(&css);
                        self.theme_css = Some(css);
                    }
                    Err(err) => {
                        leptos::logging::warn!("{err}");
                        self.theme_css = None;
                        self.theme_tokens = TokenSheet::default();
                    }
                }
                self.mirror(cx);
                Update::Render
            }
        }
    }

    fn render(&self, _cx: &RenderContext<'_>) -> View<ThemeMsg> {
        let view = View::new(bundled_variables().to_css(":host"));
        let view = match &self.theme_css {
            Some(css) => view.with_style(css.clone()),
            None => view,
        };
        view.child(slot(None))
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use pretty_assertions::assert_eq;
    use widget_contract::headless::{mount, HeadlessHost};

    use super::*;
    use crate::source::{install_theme_source, MemoryThemeSource};

    fn install_sheets() -> MemoryThemeSource {
        let source = MemoryThemeSource::default();
        source.insert("custom.css", ":root { --custom-var: hotpink; }");
        source.insert("first.css", ":root { --theme-color: blue; }");
        source.insert("second.css", ":root { --theme-color: green; }");
        install_theme_source(Rc::new(source.clone()));
        source
    }

    #[test]
    fn applies_bundled_variables_and_default_theme() {
        let host = HeadlessHost::new();
        let theme = mount::<Theme>(&host, &[]);
        assert_eq!(theme.host_style("--spacing-medium").as_deref(), Some("8px"));
        assert!(theme
            .host_style("--base-background-app")
            .is_some_and(|value| value.contains("light")));
        assert!(theme
            .host_style("--font-family-body")
            .is_some_and(|value| !value.trim().is_empty()));
        assert_eq!(theme.with_view(|view| view.styles().len()), 2);
    }

    #[test]
    fn mode_and_theme_changes_reapply_tokens() {
        let host = HeadlessHost::new();
        let theme = mount::<Theme>(&host, &[("theme", "blue"), ("mode", "light")]);
        theme.set_attribute("mode", "dark");
        assert!(theme
            .host_style("--base-background-app")
            .is_some_and(|value| value.contains("dark")));
        theme.set_attribute("theme", "orange");
        assert_eq!(
            theme.host_style("--primary-content--").as_deref(),
            Some("var(--orange-3)")
        );
    }

    #[test]
    fn side_by_side_scopes_stay_independent() {
        let host = HeadlessHost::new();
        let light = mount::<Theme>(&host, &[("theme", "blue"), ("mode", "light")]);
        let dark = mount::<Theme>(&host, &[("theme", "blue"), ("mode", "dark")]);
        let light_bg = light.host_style("--base-background-app").expect("light bg");
        let dark_bg = dark.host_style("--base-background-app").expect("dark bg");
        assert!(light_bg.contains("light"));
        assert!(dark_bg.contains("dark"));
        assert_ne!(light_bg, dark_bg);
    }

    #[test]
    fn theme_path_takes_priority_and_keeps_bundled_variables() {
        install_sheets();
        let host = HeadlessHost::new();
        let theme = mount::<Theme>(
            &host,
            &[("theme", "blue"), ("mode", "dark"), ("theme-path", "custom.css")],
        );
        assert_eq!(theme.host_style("--custom-var").as_deref(), Some("hotpink"));
        assert_eq!(theme.host_style("--spacing-medium").as_deref(), Some("8px"));
        assert_eq!(theme.host_style("--primary-content--"), None);

        theme.remove_attribute("theme-path");
        assert_eq!(theme.host_style("--custom-var"), None);
        assert!(theme
            .host_style("--base-background-app")
            .is_some_and(|value| value.contains("dark")));
    }

    #[test]
    fn theme_path_changes_refetch() {
        install_sheets();
        let host = HeadlessHost::new();
        let theme = mount::<Theme>(&host, &[("theme-path", "first.css")]);
        assert_eq!(theme.host_style("--theme-color").as_deref(), Some("blue"));
        theme.set_attribute("theme-path", "second.css");
        assert_eq!(theme.host_style("--theme-color").as_deref(), Some("green"));
    }

    #[test]
    fn failed_fetch_degrades_to_bundled_variables() {
        install_sheets();
        let host = HeadlessHost::new();
        let theme = mount::<Theme>(&host, &[("theme-path", "missing.css")]);
        assert_eq!(theme.host_style("--spacing-medium").as_deref(), Some("8px"));
        assert_eq!(theme.with_view(|view| view.styles().len()), 1);
    }

    #[test]
    fn unknown_theme_falls_back_to_default_family() {
        let host = HeadlessHost::new();
        let theme = mount::<Theme>(&host, &[("theme", "teal")]);
        assert_eq!(
            theme.host_style("--primary-content--").as_deref(),
            Some("var(--blue-7)")
        );
    }
}
