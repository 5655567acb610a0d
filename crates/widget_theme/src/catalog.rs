//! Built-in theme catalog generated at build time from `themes/*.toml`.

use std::{collections::BTreeMap, sync::OnceLock};

use serde::Deserialize;

use crate::{error::ThemeError, sheet::TokenSheet};

include!(concat!(env!("OUT_DIR"), "/theme_catalog_generated.rs"));

/// Theme family applied when `theme` is omitted or unknown.
pub const DEFAULT_THEME: &str = "blue";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Light or dark token table of a theme family.
pub enum ThemeMode {
    /// Light surfaces, dark text.
    #[default]
    Light,
    /// Dark surfaces, light text.
    Dark,
}

impl ThemeMode {
    /// Attribute token.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Parses a `mode` attribute; anything but `dark` is light.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("dark") => Self::Dark,
            _ => Self::Light,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ThemeEntry {
    name: String,
    display_name: String,
    light: BTreeMap<String, String>,
    dark: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CatalogData {
    variables: BTreeMap<String, String>,
    themes: Vec<ThemeEntry>,
}

fn catalog() -> &'static CatalogData {
    static CATALOG: OnceLock<CatalogData> = OnceLock::new();
    CATALOG.get_or_init(|| {
        serde_json::from_str(THEME_CATALOG_JSON).unwrap_or_else(|err| {
            leptos::logging::warn!("theme catalog parse failed: {err}");
            CatalogData::default()
        })
    })
}

/// Returns the generated theme catalog JSON payload.
pub fn theme_catalog_json() -> &'static str {
    THEME_CATALOG_JSON
}

/// Bundled default token sheet applied beneath every theme.
pub fn bundled_variables() -> TokenSheet {
    TokenSheet::from_pairs(catalog().variables.iter().map(|(k, v)| (k.clone(), v.clone())))
}

/// `(name, display name)` of every built-in theme family.
pub fn builtin_themes() -> Vec<(&'static str, &'static str)> {
    catalog()
        .themes
        .iter()
        .map(|entry| (entry.name.as_str(), entry.display_name.as_str()))
        .collect()
}

/// Token sheet of a built-in theme family in `mode`.
pub fn builtin_theme(theme: &str, mode: ThemeMode) -> Result<TokenSheet, ThemeError> {
    let entry = catalog()
        .themes
        .iter()
        .find(|entry| entry.name == theme.trim())
        .ok_or_else(|| ThemeError::UnknownTheme {
            theme: theme.to_string(),
            mode: mode.token(),
        })?;
    let table = match mode {
        ThemeMode::Light => &entry.light,
        ThemeMode::Dark => &entry.dark,
    };
    Ok(TokenSheet::from_pairs(
        table.iter().map(|(k, v)| (k.clone(), v.clone())),
    ))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn catalog_ships_every_family_in_both_modes() {
        let names: Vec<_> = builtin_themes().into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["blue", "orange", "green", "purple", "red"]);
        for name in names {
            for mode in [ThemeMode::Light, ThemeMode::Dark] {
                let sheet = builtin_theme(name, mode).expect("built-in theme");
                assert!(sheet.get("--primary-content--").is_some());
                assert!(sheet.iter().all(|(token, _)| token.starts_with("--")));
            }
        }
    }

    #[test]
    fn base_background_follows_mode() {
        let light = builtin_theme("blue", ThemeMode::Light).expect("blue light");
        let dark = builtin_theme("blue", ThemeMode::Dark).expect("blue dark");
        assert!(light
            .get("--base-background-app")
            .is_some_and(|value| value.contains("light")));
        assert!(dark
            .get("--base-background-app")
            .is_some_and(|value| value.contains("dark")));
    }

    #[test]
    fn bundled_variables_define_spacing() {
        assert_eq!(bundled_variables().get("--spacing-medium"), Some("8px"));
    }

    #[test]
    fn unknown_theme_is_an_error() {
        assert_eq!(
            builtin_theme("teal", ThemeMode::Dark),
            Err(ThemeError::UnknownTheme {
                theme: "teal".to_string(),
                mode: "dark",
            })
        );
    }
}
