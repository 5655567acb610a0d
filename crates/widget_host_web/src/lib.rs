//! Browser host for the widget catalog.
//!
//! Registered tags in the document are upgraded into widget instances that render
//! into open shadow roots:
//! - `browser`: [`WebHost`], the [`widget_contract::WidgetHost`] over `window`/`document`
//! - `surface`: shadow-root rendering, patches, events and form entries
//! - `define`: element upgrades plus attribute and slot forwarding
//! - [`WidgetElement`]: Leptos component placing a widget in a view tree

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod browser;
mod component;
pub mod convert;
mod define;
pub mod error;
mod surface;
mod theme_fetch;

pub use browser::{web_host, WebHost};
pub use component::WidgetElement;
pub use define::{define_widgets, invoke, release, upgrade};
pub use error::HostError;
pub use theme_fetch::FetchThemeSource;
