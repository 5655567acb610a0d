//! Tag registry: maps custom element names to widget types.
//!
//! Hosts never name concrete widget types. They hand a [`WidgetVisitor`] to
//! [`visit_tag`], which calls it back with the type registered for the tag.

use widget_contract::{WidgetError, WidgetVisitor};
use widget_theme::Theme;

use crate::widgets::{controls::*, data_display::*, forms::*, navigation::*, overlays::*};

macro_rules! registry {
    ($($widget:ty),+ $(,)?) => {
        /// Every registered tag, in registration order.
        pub const TAGS: &[&str] = &[$(<$widget as widget_contract::Widget>::TAG),+];

        /// Calls `visitor` with the widget type registered for `tag`.
        pub fn visit_tag<V: WidgetVisitor>(tag: &str, visitor: V) -> Result<V::Output, WidgetError> {
            let tag = tag.trim().to_ascii_lowercase();
            $(
                if tag == <$widget as widget_contract::Widget>::TAG {
                    return Ok(visitor.visit::<$widget>());
                }
            )+
            leptos::logging::debug_warn!("no widget registered for `{tag}`");
            Err(WidgetError::UnknownTag(tag))
        }
    };
}

registry![
    Button, Tag, Avatar, Badge, Card, Progress, Table, Checkbox, Input, Radio, Select, Slider,
    Switch, Appbar, Menu, Panel, PanelBar, Tabs, Dialog, Drawer, Toast, Tooltip, Theme,
];

/// Returns whether `tag` names a registered widget. Matching ignores ASCII case, as
/// element names do.
pub fn is_registered(tag: &str) -> bool {
    let tag = tag.trim();
    TAGS.iter().any(|known| known.eq_ignore_ascii_case(tag))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use widget_contract::{
        headless::{mount, HeadlessHost},
        AnyWidget, Widget,
    };

    use super::*;

    struct MountHeadless<'a> {
        host: &'a HeadlessHost,
        attrs: &'a [(&'a str, &'a str)],
    }

    impl WidgetVisitor for MountHeadless<'_> {
        type Output = Box<dyn AnyWidget>;

        fn visit<W: Widget>(self) -> Self::Output {
            Box::new(mount::<W>(self.host, self.attrs).instance().clone())
        }
    }

    struct TagOf;

    impl WidgetVisitor for TagOf {
        type Output = &'static str;

        fn visit<W: Widget>(self) -> Self::Output {
            W::TAG
        }
    }

    fn mount_tag(host: &HeadlessHost, tag: &str, attrs: &[(&str, &str)]) -> Box<dyn AnyWidget> {
        visit_tag(tag, MountHeadless { host, attrs }).expect("registered tag")
    }

    #[test]
    fn every_tag_is_unique_and_resolves_to_itself() {
        let mut seen = std::collections::HashSet::new();
        for tag in TAGS {
            assert!(seen.insert(*tag), "duplicate tag {tag}");
            assert_eq!(visit_tag(tag, TagOf).expect("registered"), *tag);
        }
        assert_eq!(TAGS.len(), 23);
        assert_eq!(visit_tag(" Y-BUTTON ", TagOf), Ok("y-button"));
        assert!(is_registered("Y-Theme"));
    }

    #[test]
    fn unknown_tags_are_reported() {
        assert_eq!(
            visit_tag("y-carousel", TagOf),
            Err(WidgetError::UnknownTag("y-carousel".to_string()))
        );
        assert!(!is_registered("div"));
    }

    #[test]
    fn rerendering_unchanged_attributes_is_idempotent() {
        for tag in TAGS {
            let host = HeadlessHost::new();
            let widget = mount_tag(&host, tag, &[]);
            let first = widget.markup();
            for name in ["color", "size", "label"] {
                if widget.observes(name) {
                    let value = widget.attribute(name);
                    widget.set_attribute(name, "__probe__");
                    match value {
                        Some(value) => widget.set_attribute(name, &value),
                        None => widget.remove_attribute(name),
                    }
                }
            }
            assert_eq!(widget.markup(), first, "{tag} re-rendered differently");
        }
    }

    #[test]
    fn boolean_attributes_round_trip() {
        for tag in TAGS {
            let host = HeadlessHost::new();
            let widget = mount_tag(&host, tag, &[]);
            if !widget.observes("disabled") {
                continue;
            }
            widget.set_flag("disabled", true);
            assert!(widget.has_attribute("disabled"), "{tag}");
            assert_eq!(widget.attribute("disabled").as_deref(), Some(""));
            widget.set_flag("disabled", false);
            assert!(!widget.has_attribute("disabled"), "{tag}");
        }
    }

    #[test]
    fn detach_leaves_no_ambient_listeners() {
        for tag in TAGS {
            let host = HeadlessHost::new();
            host.add_element(Some("trigger"), Default::default());
            let widget = mount_tag(&host, tag, &[("anchor", "trigger"), ("visible", "")]);
            widget.detach();
            assert_eq!(host.total_listeners(), 0, "{tag} leaked listeners");
            assert_eq!(host.pending_timers(), 0, "{tag} leaked timers");
        }
    }
}
