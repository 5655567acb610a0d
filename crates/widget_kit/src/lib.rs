//! The widget catalog: every concrete `y-*` element, the built-in icon set and the
//! tag registry hosts use to upgrade elements by name.
//!
//! Widgets are plain [`Widget`](widget_contract::Widget) implementations. They run
//! unchanged against the browser host in `widget_host_web` and against the headless
//! host in tests.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod anchoring;
pub mod icon;
pub mod registry;
pub mod widgets;

pub use registry::{is_registered, visit_tag, TAGS};
pub use widgets::{controls, data_display, forms, navigation, overlays};
