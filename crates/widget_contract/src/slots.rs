//! Slot assignment model and the shared empty-slot container helper.

use std::collections::BTreeMap;

use crate::tree::Element;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Light-DOM node assigned to a slot.
pub enum AssignedNode {
    /// Text node content.
    Text(String),
    /// Element, identified by tag name.
    Element {
        /// Lower-case tag name.
        tag: String,
    },
}

impl AssignedNode {
    /// Whitespace-only text counts as empty.
    pub fn is_meaningful(&self) -> bool {
        match self {
            Self::Text(text) => !text.trim().is_empty(),
            Self::Element { .. } => true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Current slot assignments for one widget host, keyed by slot name (`""` = default).
pub struct SlotAssignments {
    slots: BTreeMap<String, Vec<AssignedNode>>,
}

impl SlotAssignments {
    /// No assigned content.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns nodes to `name`, replacing previous content.
    pub fn assign(&mut self, name: &str, nodes: Vec<AssignedNode>) {
        if nodes.is_empty() {
            self.slots.remove(name);
        } else {
            self.slots.insert(name.to_string(), nodes);
        }
    }

    /// Builder form of [`Self::assign`] with a single text node.
    pub fn with_text(mut self, name: &str, value: &str) -> Self {
        self.assign(name, vec![AssignedNode::Text(value.to_string())]);
        self
    }

    /// Builder form of [`Self::assign`] with a single element.
    pub fn with_element(mut self, name: &str, tag: &str) -> Self {
        self.assign(
            name,
            vec![AssignedNode::Element {
                tag: tag.to_ascii_lowercase(),
            }],
        );
        self
    }

    /// Nodes assigned to `name`.
    pub fn assigned(&self, name: &str) -> &[AssignedNode] {
        self.slots.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns whether `name` has content other than whitespace text.
    pub fn has_content(&self, name: &str) -> bool {
        self.assigned(name).iter().any(AssignedNode::is_meaningful)
    }

    /// Concatenated text assigned to `name`, used where a widget mirrors slot text.
    pub fn text(&self, name: &str) -> Option<String> {
        let text: String = self
            .assigned(name)
            .iter()
            .filter_map(|node| match node {
                AssignedNode::Text(text) => Some(text.trim()),
                AssignedNode::Element { .. } => None,
            })
            .collect::<Vec<_>>()
            .join(" ");
        (!text.is_empty()).then_some(text)
    }
}

/// Hides `container` when slot `name` has no meaningful content.
///
/// `display` is the value used when content is present (empty string keeps the
/// stylesheet's value).
pub fn hide_if_empty<Msg>(
    container: Element<Msg>,
    slots: &SlotAssignments,
    name: &str,
    display: &str,
) -> Element<Msg> {
    if slots.has_content(name) {
        if display.is_empty() {
            container
        } else {
            container.style("display", display)
        }
    } else {
        container.style("display", "none")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::tree::el;

    #[test]
    fn whitespace_only_text_is_empty() {
        let slots = SlotAssignments::new().with_text("header", "  \n ");
        assert!(!slots.has_content("header"));
        let slots = slots.with_text("header", " Title ");
        assert!(slots.has_content("header"));
        assert_eq!(slots.text("header"), Some("Title".to_string()));
    }

    #[test]
    fn empty_containers_are_hidden() {
        let slots = SlotAssignments::new().with_element("footer", "BUTTON");
        let header = hide_if_empty(el::<()>("header"), &slots, "header", "");
        let footer = hide_if_empty(el::<()>("footer"), &slots, "footer", "flex");
        assert_eq!(header.style_value("display"), Some("none"));
        assert_eq!(footer.style_value("display"), Some("flex"));
    }
}
