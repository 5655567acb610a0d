//! Minimal CSS selector subset used to locate nodes inside a rendered tree.
//!
//! Supported: type selectors, `#id`, `.class`, `[attr]`, `[attr="value"]`, compound
//! selectors, the descendant combinator and the `>` child combinator. The same
//! strings are valid `querySelector` input, so web hosts apply patches with them
//! unchanged.

use crate::tree::Element;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, Option<String>)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Parsed selector: compounds from left to right with the combinator preceding each.
pub struct Selector {
    parts: Vec<(Combinator, Compound)>,
}

impl Selector {
    /// Parses a selector string. Returns `None` for unsupported syntax.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = Vec::new();
        let mut pending = Combinator::Descendant;
        for token in tokenize(raw)? {
            if token == ">" {
                if parts.is_empty() {
                    return None;
                }
                pending = Combinator::Child;
                continue;
            }
            parts.push((pending, parse_compound(&token)?));
            pending = Combinator::Descendant;
        }
        if parts.is_empty() {
            return None;
        }
        Some(Self { parts })
    }

    /// Returns whether `element`, whose ancestors (outermost first) are `ancestors`,
    /// matches this selector.
    pub fn matches<Msg>(&self, element: &Element<Msg>, ancestors: &[&Element<Msg>]) -> bool {
        let last = self.parts.len() - 1;
        compound_matches(&self.parts[last].1, element)
            && self.match_ancestors(last, ancestors)
    }

    fn match_ancestors<Msg>(&self, index: usize, ancestors: &[&Element<Msg>]) -> bool {
        if index == 0 {
            return true;
        }
        let (combinator, _) = self.parts[index];
        let target = &self.parts[index - 1].1;
        match combinator {
            Combinator::Child => match ancestors.split_last() {
                Some((parent, rest)) => {
                    compound_matches(target, parent) && self.match_ancestors(index - 1, rest)
                }
                None => false,
            },
            Combinator::Descendant => (0..ancestors.len()).rev().any(|at| {
                compound_matches(target, ancestors[at])
                    && self.match_ancestors(index - 1, &ancestors[..at])
            }),
        }
    }
}

fn tokenize(raw: &str) -> Option<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_brackets = false;
    let mut quote: Option<char> = None;
    for ch in raw.trim().chars() {
        match quote {
            Some(open) => {
                current.push(ch);
                if ch == open {
                    quote = None;
                }
                continue;
            }
            None if in_brackets && (ch == '"' || ch == '\'') => {
                quote = Some(ch);
                current.push(ch);
                continue;
            }
            None => {}
        }
        match ch {
            '[' => {
                in_brackets = true;
                current.push(ch);
            }
            ']' => {
                in_brackets = false;
                current.push(ch);
            }
            '>' if !in_brackets => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                tokens.push(">".to_string());
            }
            ch if ch.is_whitespace() && !in_brackets => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            ch => current.push(ch),
        }
    }
    if in_brackets || quote.is_some() {
        return None;
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    Some(tokens)
}

fn parse_compound(token: &str) -> Option<Compound> {
    let mut compound = Compound::default();
    let chars: Vec<char> = token.chars().collect();
    let mut at = 0;

    let ident_end = |from: usize| {
        let mut end = from;
        while end < chars.len() && !matches!(chars[end], '.' | '#' | '[') {
            end += 1;
        }
        end
    };

    if at < chars.len() && !matches!(chars[at], '.' | '#' | '[') {
        let end = ident_end(at);
        let tag: String = chars[at..end].iter().collect();
        if tag != "*" {
            compound.tag = Some(tag.to_ascii_lowercase());
        }
        at = end;
    }

    while at < chars.len() {
        match chars[at] {
            '.' => {
                let end = ident_end(at + 1);
                if end == at + 1 {
                    return None;
                }
                compound.classes.push(chars[at + 1..end].iter().collect());
                at = end;
            }
            '#' => {
                let end = ident_end(at + 1);
                if end == at + 1 {
                    return None;
                }
                compound.id = Some(chars[at + 1..end].iter().collect());
                at = end;
            }
            '[' => {
                let close = chars[at..].iter().position(|ch| *ch == ']')? + at;
                let inner: String = chars[at + 1..close].iter().collect();
                compound.attributes.push(parse_attribute(&inner)?);
                at = close + 1;
            }
            _ => return None,
        }
    }
    Some(compound)
}

fn parse_attribute(inner: &str) -> Option<(String, Option<String>)> {
    match inner.split_once('=') {
        None => {
            let name = inner.trim();
            (!name.is_empty()).then(|| (name.to_string(), None))
        }
        Some((name, value)) => {
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|rest| rest.strip_suffix('"'))
                .or_else(|| {
                    value
                        .strip_prefix('\'')
                        .and_then(|rest| rest.strip_suffix('\''))
                })
                .unwrap_or(value);
            Some((name.to_string(), Some(value.to_string())))
        }
    }
}

fn compound_matches<Msg>(compound: &Compound, element: &Element<Msg>) -> bool {
    if let Some(tag) = &compound.tag {
        if element.tag() != tag {
            return false;
        }
    }
    if let Some(id) = &compound.id {
        if element.attribute("id") != Some(id.as_str()) {
            return false;
        }
    }
    if !compound.classes.iter().all(|class| element.has_class(class)) {
        return false;
    }
    compound
        .attributes
        .iter()
        .all(|(name, expected)| match (element.attribute(name), expected) {
            (Some(_), None) => true,
            (Some(actual), Some(expected)) => actual == expected,
            (None, _) => false,
        })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::tree::el;

    #[test]
    fn parses_compounds_and_combinators() {
        assert!(Selector::parse("div.menu > li[data-index=\"2\"] span").is_some());
        assert!(Selector::parse("[unterminated").is_none());
        assert!(Selector::parse("> li").is_none());
        assert!(Selector::parse("").is_none());
    }

    #[test]
    fn compound_matching_checks_every_part() {
        let element = el::<()>("button")
            .attr("id", "save")
            .attr("aria-pressed", "true")
            .class("button")
            .class("primary");
        let selector = Selector::parse("button#save.button.primary[aria-pressed=\"true\"]")
            .expect("selector");
        assert!(selector.matches(&element, &[]));

        let selector = Selector::parse("button.secondary").expect("selector");
        assert!(!selector.matches(&element, &[]));
    }

    #[test]
    fn descendant_and_child_combinators_walk_ancestors() {
        let outer = el::<()>("ul").class("menu");
        let middle = el::<()>("li");
        let inner = el::<()>("span").class("label");

        let descendant = Selector::parse(".menu .label").expect("selector");
        assert!(descendant.matches(&inner, &[&outer, &middle]));

        let child = Selector::parse(".menu > .label").expect("selector");
        assert!(!child.matches(&inner, &[&outer, &middle]));

        let child = Selector::parse("li > .label").expect("selector");
        assert_eq!(child.matches(&inner, &[&outer, &middle]), true);
    }
}
