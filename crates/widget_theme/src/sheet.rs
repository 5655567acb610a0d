//! Ordered custom-property sheets and their CSS text form.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Ordered `--token: value` pairs.
pub struct TokenSheet {
    tokens: Vec<(String, String)>,
}

impl TokenSheet {
    /// Sheet from pairs, keeping the first occurrence order and the last value.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut sheet = Self::default();
        for (name, value) in pairs {
            sheet.insert(name.into(), value.into());
        }
        sheet
    }

    /// Extracts every `--name: value;` declaration from stylesheet text.
    pub fn parse_css(css: &str) -> Self {
        let mut sheet = Self::default();
        let mut rest = css;
        while let Some(start) = rest.find("--") {
            let candidate = &rest[start + 2..];
            let name_len = candidate
                .find(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'))
                .unwrap_or(candidate.len());
            let after_name = candidate[name_len..].trim_start();
            let declaration = (name_len > 0)
                .then(|| after_name.strip_prefix(':'))
                .flatten()
                .and_then(|value| value.find(';').map(|end| (value, end)));
            match declaration {
                Some((value, end)) => {
                    let trimmed = value[..end].trim();
                    if !trimmed.is_empty() {
                        sheet.insert(format!("--{}", &candidate[..name_len]), trimmed.to_string());
                    }
                    rest = &value[end + 1..];
                }
                None => rest = &candidate[name_len..],
            }
        }
        sheet
    }

    /// Sets `name`, replacing an earlier value in place.
    pub fn insert(&mut self, name: String, value: String) {
        match self.tokens.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, existing)) => *existing = value,
            None => self.tokens.push((name, value)),
        }
    }

    /// Value of `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.tokens
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    /// Pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tokens
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns whether the sheet has no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// CSS rule declaring every token under `selector`.
    pub fn to_css(&self, selector: &str) -> String {
        let mut out = format!("{selector} {{\n");
        for (name, value) in &self.tokens {
            out.push_str("  ");
            out.push_str(name);
            out.push_str(": ");
            out.push_str(value);
            out.push_str(";\n");
        }
        out.push_str("}\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_declarations_and_skips_references() {
        let sheet = TokenSheet::parse_css(
            ":root { --theme-color: blue; --accent: var(--theme-color); }\n\
             .x { color: red; --broken }",
        );
        assert_eq!(
            sheet.iter().collect::<Vec<_>>(),
            vec![("--theme-color", "blue"), ("--accent", "var(--theme-color)")]
        );
    }

    #[test]
    fn later_values_win_in_place() {
        let sheet = TokenSheet::from_pairs([("--a", "1"), ("--b", "2"), ("--a", "3")]);
        assert_eq!(sheet.get("--a"), Some("3"));
        assert_eq!(sheet.to_css(":host"), ":host {\n  --a: 3;\n  --b: 2;\n}\n");
    }
}
