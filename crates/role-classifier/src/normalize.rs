//! Case folding for categorical values.

use crate::types::Element;

/// Canonical form of a categorical value.
pub fn normalize_category(value: &str) -> String {
    value.to_uppercase()
}

/// Return a new batch with every tag name in canonical form.
pub fn normalize_elements(elements: &[Element]) -> Vec<Element> {
    elements
        .iter()
        .map(|el| Element {
            tag_name: normalize_category(&el.tag_name),
            ..el.clone()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AttrValue, InputColumns};

    #[test]
    fn test_normalize_category() {
        assert_eq!(normalize_category("div"), "DIV");
        assert_eq!(normalize_category("H1"), "H1");
        assert_eq!(normalize_category("sEcTiOn"), "SECTION");
    }

    #[test]
    fn test_text_align_untouched() {
        let el = Element::from_fields(
            0,
            vec![
                ("crawlerId".to_string(), AttrValue::from_text("1")),
                ("tagName".to_string(), AttrValue::from_text("p")),
                ("textAlign".to_string(), AttrValue::from_text("left")),
            ],
            &InputColumns::default(),
        )
        .unwrap();

        let out = normalize_elements(std::slice::from_ref(&el));
        assert_eq!(out[0].tag_name, "P");
        assert_eq!(out[0].text_align.as_deref(), Some("left"));
        // Input batch is left as it was.
        assert_eq!(el.tag_name, "p");
    }
}
