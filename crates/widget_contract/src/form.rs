//! Form participation: collecting `(name, value)` entries from form-associated widgets.

use crate::lifecycle::AnyWidget;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Ordered multimap of submitted entries, in the order widgets were visited.
pub struct FormData {
    entries: Vec<(String, String)>,
}

impl FormData {
    /// Empty form data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the entries published by `widgets`; widgets without a name or value
    /// contribute nothing.
    pub fn collect<'a>(widgets: impl IntoIterator<Item = &'a dyn AnyWidget>) -> Self {
        let entries = widgets
            .into_iter()
            .filter_map(|widget| widget.form_entry())
            .collect();
        Self { entries }
    }

    /// Appends an entry.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// First value submitted under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, value)| value.as_str())
    }

    /// Every value submitted under `name`.
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(entry, _)| entry == name)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    /// All entries.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether nothing was submitted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn lookups_follow_insertion_order() {
        let mut data = FormData::new();
        data.append("fruit", "apple");
        data.append("agree", "yes");
        data.append("fruit", "banana");
        assert_eq!(data.get("fruit"), Some("apple"));
        assert_eq!(data.get_all("fruit"), vec!["apple", "banana"]);
        assert_eq!(data.get("missing"), None);
        assert_eq!(data.len(), 3);
    }
}
