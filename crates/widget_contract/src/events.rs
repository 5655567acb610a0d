//! Custom events emitted by widgets to their surroundings.

use serde_json::{Map, Value};

use crate::tree::EventKind;

/// Settled value change.
pub const CHANGE: &str = "change";
/// Live value change.
pub const INPUT: &str = "input";
/// Table sort activation.
pub const SORT: &str = "sort";
/// Panel toggled.
pub const TOGGLE: &str = "toggle";
/// Panel expanded.
pub const EXPAND: &str = "expand";
/// Panel collapsed.
pub const COLLAPSE: &str = "collapse";
/// Tag removal requested.
pub const REMOVE: &str = "remove";
/// Leaf panel selected.
pub const SELECT: &str = "select";
/// Toast displayed.
pub const TOAST_SHOW: &str = "y-toast-show";
/// Toast removed.
pub const TOAST_DISMISS: &str = "y-toast-dismiss";
/// History entry changed.
pub const POPSTATE: &str = "popstate";

const KNOWN: [&str; 11] = [
    CHANGE,
    INPUT,
    SORT,
    TOGGLE,
    EXPAND,
    COLLAPSE,
    REMOVE,
    SELECT,
    TOAST_SHOW,
    TOAST_DISMISS,
    POPSTATE,
];

/// Listenable kind for a built-in event name; `None` for names configured at runtime
/// (button `data-event`).
pub fn event_kind(name: &str) -> Option<EventKind> {
    KNOWN
        .iter()
        .find(|known| **known == name)
        .map(|known| EventKind::Custom(*known))
}

#[derive(Debug, Clone, PartialEq)]
/// Bubbling, composed custom event with a JSON detail payload.
pub struct WidgetEvent {
    /// Event type.
    pub name: String,
    /// Detail payload (`null` when the event carries none).
    pub detail: Value,
    /// Propagates to ancestors.
    pub bubbles: bool,
    /// Crosses shadow boundaries.
    pub composed: bool,
}

impl WidgetEvent {
    /// Bubbling, composed event with `detail`.
    pub fn new(name: impl Into<String>, detail: Value) -> Self {
        Self {
            name: name.into(),
            detail,
            bubbles: true,
            composed: true,
        }
    }

    /// Event without detail.
    pub fn bare(name: impl Into<String>) -> Self {
        Self::new(name, Value::Null)
    }

    /// Event whose detail is built from string pairs.
    pub fn with_string_detail<'a>(
        name: impl Into<String>,
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let detail: Map<String, Value> = pairs
            .into_iter()
            .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
            .collect();
        Self::new(name, Value::Object(detail))
    }

    /// Detail field lookup.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.detail.get(key)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn string_detail_builds_object() {
        let event = WidgetEvent::with_string_detail("saved", [("id", "7")]);
        assert_eq!(event.detail, json!({"id": "7"}));
        assert!(event.bubbles && event.composed);
        assert_eq!(event.field("id"), Some(&json!("7")));
    }

    #[test]
    fn built_in_names_map_to_listenable_kinds() {
        assert_eq!(event_kind("expand"), Some(EventKind::Custom(EXPAND)));
        assert_eq!(event_kind("saved"), None);
    }
}
