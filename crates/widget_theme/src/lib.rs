//! Design tokens and theme scopes for the widget catalog.
//!
//! Token sheets come from three places: the bundled variables sheet, the built-in
//! theme families generated at build time from `themes/*.toml`, and external
//! stylesheets loaded through a [`ThemeSource`]. The [`Theme`] widget (`y-theme`)
//! combines them for its subtree.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod catalog;
pub mod error;
pub mod sheet;
pub mod source;
pub mod widget;

pub use catalog::{
    builtin_theme, builtin_themes, bundled_variables, theme_catalog_json, ThemeMode,
    DEFAULT_THEME,
};
pub use error::ThemeError;
pub use sheet::TokenSheet;
pub use source::{
    install_theme_source, theme_source, MemoryThemeSource, NoopThemeSource, ThemeFuture,
    ThemeSource,
};
pub use widget::{Theme, ThemeMsg};
