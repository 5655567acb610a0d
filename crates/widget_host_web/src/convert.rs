//! Target-independent conversions between browser values and contract types.

use std::collections::BTreeMap;

use widget_contract::{AssignedNode, SlotAssignments};

/// Longest entry of a computed `transition-duration` list (`"0.3s, 150ms"`), in
/// milliseconds. Unparseable entries count as zero.
pub fn parse_transition_duration(raw: &str) -> u32 {
    raw.split(',')
        .map(str::trim)
        .filter_map(|entry| {
            if let Some(ms) = entry.strip_suffix("ms") {
                ms.trim().parse::<f64>().ok()
            } else {
                entry
                    .strip_suffix('s')
                    .and_then(|secs| secs.trim().parse::<f64>().ok())
                    .map(|secs| secs * 1000.0)
            }
        })
        .filter(|ms| ms.is_finite() && *ms > 0.0)
        .fold(0.0_f64, f64::max)
        .round() as u32
}

/// Groups light-DOM children by their `slot` attribute (`""` for the default slot),
/// keeping document order inside each slot.
pub fn group_slots<I>(children: I) -> SlotAssignments
where
    I: IntoIterator<Item = (String, AssignedNode)>,
{
    let mut grouped: BTreeMap<String, Vec<AssignedNode>> = BTreeMap::new();
    for (slot, node) in children {
        grouped.entry(slot).or_default().push(node);
    }
    let mut assignments = SlotAssignments::new();
    for (slot, nodes) in grouped {
        assignments.assign(&slot, nodes);
    }
    assignments
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn transition_durations_take_the_longest_entry() {
        assert_eq!(parse_transition_duration("0.3s"), 300);
        assert_eq!(parse_transition_duration("150ms, 0.25s"), 250);
        assert_eq!(parse_transition_duration("0s"), 0);
        assert_eq!(parse_transition_duration(""), 0);
        assert_eq!(parse_transition_duration("fast, 80ms"), 80);
    }

    #[test]
    fn children_group_by_slot_name() {
        let slots = group_slots([
            ("".to_string(), AssignedNode::Text("Hello".to_string())),
            (
                "header".to_string(),
                AssignedNode::Element {
                    tag: "h3".to_string(),
                },
            ),
            ("".to_string(), AssignedNode::Text(" world ".to_string())),
        ]);
        assert_eq!(slots.text("").as_deref(), Some("Hello world"));
        assert!(slots.has_content("header"));
        assert!(!slots.has_content("footer"));
    }
}
