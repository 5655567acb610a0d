//! Declarative attribute surface shared by every widget instance.
//!
//! Attributes are the single source of truth for widget state. Boolean attributes use
//! presence/absence; structured values are JSON strings decoded on read.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Ordered attribute map for one widget host element.
pub struct AttributeMap {
    entries: BTreeMap<String, String>,
}

impl AttributeMap {
    /// Creates an empty attribute map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map from `(name, value)` pairs; later duplicates win.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }

    /// Returns the raw value of `name`, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Returns whether `name` is present (boolean attribute semantics).
    pub fn has(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Sets `name` and returns the previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(name.into(), value.into())
    }

    /// Removes `name` and returns the previous value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.entries.remove(name)
    }

    /// Iterates attributes in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Iterates attributes whose name starts with `prefix`, yielding the stripped suffix.
    pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.entries.iter().filter_map(move |(name, value)| {
            name.strip_prefix(prefix)
                .map(|suffix| (suffix, value.as_str()))
        })
    }

    /// Returns the value of `name`, treating an empty string as absent.
    pub fn non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|value| !value.is_empty())
    }

    /// Parses `name` as a finite number.
    pub fn number(&self, name: &str) -> Option<f64> {
        parse_number(self.get(name))
    }

    /// Decodes a JSON list attribute, falling back to an empty list.
    pub fn json_list<T: DeserializeOwned>(&self, name: &str) -> Vec<T> {
        parse_json_list(name, self.get(name))
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Boolean attribute value written when a flag is set.
pub const PRESENT: &str = "";

/// Parses a trimmed finite number.
pub fn parse_number(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|raw| raw.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite())
}

/// Decodes a JSON array attribute. Malformed input yields an empty list.
pub fn parse_json_list<T: DeserializeOwned>(name: &str, raw: Option<&str>) -> Vec<T> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<T>>(raw) {
        Ok(list) => list,
        Err(err) => {
            leptos::logging::debug_warn!("attribute `{name}` is not a valid JSON list: {err}");
            Vec::new()
        }
    }
}

/// Attribute flag that reads `"false"` as off and anything else present as on.
///
/// Used by opt-out flags such as `animate` and `label-display` whose default is on.
pub fn flag_enabled(raw: Option<&str>, default: bool) -> bool {
    match raw {
        None => default,
        Some(value) => !value.eq_ignore_ascii_case("false"),
    }
}

/// Returns the `"true"`/`"false"` token used for ARIA and `data-*` state attributes.
pub const fn bool_token(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Formats a number the way attribute values are written back (no trailing `.0`).
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let text = format!("{value:.6}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Item {
        text: String,
    }

    #[test]
    fn set_and_remove_report_previous_values() {
        let mut attrs = AttributeMap::new();
        assert_eq!(attrs.set("size", "small"), None);
        assert_eq!(attrs.set("size", "large"), Some("small".to_string()));
        assert!(attrs.has("size"));
        assert_eq!(attrs.remove("size"), Some("large".to_string()));
        assert!(!attrs.has("size"));
    }

    #[test]
    fn prefix_iteration_strips_prefix() {
        let attrs = AttributeMap::from_pairs([
            ("data-detail-id", "7"),
            ("data-detail-kind", "save"),
            ("data-event", "saved"),
        ]);
        let details: Vec<_> = attrs.with_prefix("data-detail-").collect();
        assert_eq!(details, vec![("id", "7"), ("kind", "save")]);
    }

    #[test]
    fn malformed_json_lists_fall_back_to_empty() {
        let attrs = AttributeMap::from_pairs([("items", "[{\"text\":")]);
        let items: Vec<Item> = attrs.json_list("items");
        assert!(items.is_empty());

        let attrs = AttributeMap::from_pairs([("items", "[{\"text\":\"Home\"}]")]);
        let items: Vec<Item> = attrs.json_list("items");
        assert_eq!(
            items,
            vec![Item {
                text: "Home".to_string()
            }]
        );
    }

    #[test]
    fn numbers_parse_trimmed_and_reject_nan() {
        assert_eq!(parse_number(Some(" 25 ")), Some(25.0));
        assert_eq!(parse_number(Some("NaN")), None);
        assert_eq!(parse_number(Some("abc")), None);
        assert_eq!(parse_number(None), None);
    }

    #[test]
    fn opt_out_flags_default_on() {
        assert!(flag_enabled(None, true));
        assert!(flag_enabled(Some(""), false));
        assert!(!flag_enabled(Some("false"), true));
    }

    #[test]
    fn numbers_format_without_trailing_zeroes() {
        assert_eq!(format_number(25.0), "25");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(-3.0), "-3");
    }
}
