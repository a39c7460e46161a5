//! Role-specific tag denylist applied before alignment.

use crate::normalize::normalize_category;
use crate::types::Element;
use std::collections::BTreeSet;

/// Tag names excluded from consideration for one role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blacklist {
    tags: BTreeSet<String>,
}

impl Blacklist {
    /// Build from raw tag names. Entries are trimmed and normalized; blanks are ignored.
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tags = tags
            .into_iter()
            .map(|t| t.as_ref().trim().to_string())
            .filter(|t| !t.is_empty())
            .map(|t| normalize_category(&t))
            .collect();
        Self { tags }
    }

    /// Parse a comma-separated list such as `SCRIPT,STYLE,DIV`.
    pub fn parse(line: &str) -> Self {
        Self::new(line.split(','))
    }

    /// Check a normalized tag name against the list.
    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Keep the elements whose tag is not listed, in input order.
    pub fn filter<'a>(&self, elements: &'a [Element]) -> Vec<&'a Element> {
        elements
            .iter()
            .filter(|el| !self.contains(&el.tag_name))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_elements;
    use crate::types::{AttrValue, InputColumns};

    fn element(id: &str, tag: &str) -> Element {
        Element::from_fields(
            0,
            vec![
                ("crawlerId".to_string(), AttrValue::from_text(id)),
                ("tagName".to_string(), AttrValue::from_text(tag)),
                ("textAlign".to_string(), AttrValue::from_text("start")),
            ],
            &InputColumns::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_parse_normalizes_entries() {
        let bl = Blacklist::parse("script, style ,,div");
        assert_eq!(bl.len(), 3);
        assert!(bl.contains("SCRIPT"));
        assert!(bl.contains("STYLE"));
        assert!(bl.contains("DIV"));
        assert!(!bl.contains("div"));
    }

    #[test]
    fn test_empty_line_blocks_nothing() {
        let bl = Blacklist::parse("");
        assert!(bl.is_empty());
    }

    #[test]
    fn test_filter_after_normalization() {
        let batch = normalize_elements(&[element("1", "h1"), element("2", "p"), element("3", "div")]);
        let kept = Blacklist::parse("DIV").filter(&batch);
        let ids: Vec<&str> = kept.iter().map(|el| el.id()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_roles_keep_different_subsets() {
        let batch = normalize_elements(&[element("1", "h1"), element("2", "p"), element("3", "div")]);
        let title = Blacklist::parse("DIV,P").filter(&batch);
        let content = Blacklist::parse("H1").filter(&batch);
        assert_eq!(title.len(), 1);
        assert_eq!(content.len(), 2);
    }
}
