//! Shared life-cycle contract for attribute-driven widgets.
//!
//! A widget is a custom element whose public surface is its attributes, its slots and
//! the events it emits. This crate owns everything the widgets have in common: the
//! attribute map, the structured render tree, token-based styling, host services
//! (listeners, timers, frames, geometry) behind [`WidgetHost`], and the instance state
//! machine that serializes attribute changes, messages and re-renders.
//!
//! Concrete widgets live in `widget_kit`; the browser host lives in `widget_host_web`;
//! [`headless`] drives both in tests.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod attributes;
pub mod error;
pub mod events;
pub mod form;
pub mod headless;
pub mod host;
pub mod lifecycle;
pub mod overlay;
pub mod selector;
pub mod slots;
pub mod style;
pub mod tree;

pub use attributes::{
    bool_token, flag_enabled, format_number, parse_json_list, parse_number, AttributeMap,
    PRESENT,
};
pub use error::WidgetError;
pub use events::WidgetEvent;
pub use form::FormData;
pub use host::{
    AnchorRef, Callback, ElementKey, EventSink, ListenTarget, Rect, Subscription, Viewport,
    WidgetHost,
};
pub use lifecycle::{
    AnyWidget, Context, Dispatcher, Phase, RenderContext, Surface, Update, Widget,
    WidgetInstance, WidgetVisitor,
};
pub use overlay::{Direction, Placement, VIEWPORT_MARGIN};
pub use slots::{AssignedNode, SlotAssignments};
pub use style::{ColorRole, SemanticColor, Size, WidgetColor};
pub use tree::{el, slot, text, DomEvent, Element, EventKind, Node, Patch, PatchOp, View};
