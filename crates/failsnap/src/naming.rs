//! Display names derived from test docstrings.
//!
//! `"Check login form. Long explanation..."` on an item parametrized with
//! `{user: "admin", browser: "chrome"}` becomes
//! `Check login form Parameters browser_"chrome", user_"admin"`.

use crate::item::{render_param, Params, TestItem};

/// Derive the display name for `item`, or `None` if it has no docstring.
#[must_use]
pub fn derive_display_name(item: &TestItem) -> Option<String> {
    let doc = item.docstring()?;

    let first_sentence = doc.split('.').next().unwrap_or_default();
    let mut name = first_sentence.split_whitespace().collect::<Vec<_>>().join(" ");

    if let Some(params) = &item.params {
        name.push_str(" Parameters ");
        name.push_str(&format_params(params));
    }

    // Colons are identifier separators in the report
    Some(name.replace(':', ""))
}

fn format_params(params: &Params) -> String {
    let mut keys: Vec<&String> = params.keys().collect();
    keys.sort();
    keys.into_iter()
        .map(|key| format!("{key}_\"{}\"", render_param(&params[key])))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_no_docstring() {
        assert_eq!(derive_display_name(&TestItem::new("test_x")), None);
    }

    #[test]
    fn test_first_sentence_only() {
        let item = TestItem::new("t").with_doc("First sentence. Rest.");
        assert_eq!(derive_display_name(&item).as_deref(), Some("First sentence"));
    }

    #[test]
    fn test_whitespace_collapsed() {
        let item = TestItem::new("t").with_doc("\n    Check   the\n        search\tpage\n    ");
        assert_eq!(
            derive_display_name(&item).as_deref(),
            Some("Check the search page")
        );
    }

    #[test]
    fn test_parameters_sorted() {
        let item = TestItem::new("t")
            .with_doc("Sum works.")
            .with_param("b", 2)
            .with_param("a", 1);
        assert_eq!(
            derive_display_name(&item).as_deref(),
            Some("Sum works Parameters a_\"1\", b_\"2\"")
        );
    }

    #[test]
    fn test_container_parameters() {
        let item = TestItem::new("t")
            .with_doc("Sizes.")
            .with_param("sizes", json!([1, 2]))
            .with_param("names", json!(["a", "b"]))
            .with_param("opts", json!({"k": true}));
        assert_eq!(
            derive_display_name(&item).as_deref(),
            Some("Sizes Parameters names_\"['a', 'b']\", opts_\"{'k' True}\", sizes_\"[1, 2]\"")
        );
    }

    #[test]
    fn test_colons_stripped() {
        let item = TestItem::new("t")
            .with_doc("Open http://example.com page")
            .with_param("url", "https://x.test:8080");
        let name = derive_display_name(&item).unwrap();
        assert_eq!(
            name,
            "Open http//example Parameters url_\"https//x.test8080\""
        );
    }

    #[test]
    fn test_colons_stripped_without_params() {
        let item = TestItem::new("t").with_doc("Note: login required");
        assert_eq!(
            derive_display_name(&item).as_deref(),
            Some("Note login required")
        );
    }

    #[test]
    fn test_docstring_starting_with_period() {
        let item = TestItem::new("t").with_doc(".hidden");
        assert_eq!(derive_display_name(&item).as_deref(), Some(""));
    }

    proptest! {
        #[test]
        fn prop_no_colons_or_line_breaks(
            doc in "[a-zA-Z :\t\n]{1,40}",
            value in "[a-z:]{0,8}",
        ) {
            let item = TestItem::new("t").with_doc(doc).with_param("p", value);
            if let Some(name) = derive_display_name(&item) {
                prop_assert!(!name.contains(':'));
                let base = name.split(" Parameters ").next().unwrap();
                prop_assert!(!base.contains('\n'));
                prop_assert!(!base.contains('\t'));
            }
        }

        #[test]
        fn prop_base_ignores_text_after_first_period(
            head in "[a-zA-Z ]{1,20}",
            tail in "[a-zA-Z. ]{0,20}",
        ) {
            let with_tail = TestItem::new("t").with_doc(format!("{head}.{tail}"));
            let without_tail = TestItem::new("t").with_doc(head);
            prop_assert_eq!(
                derive_display_name(&with_tail),
                derive_display_name(&without_tail)
            );
        }
    }
}
