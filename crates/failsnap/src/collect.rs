//! Collection hooks rewriting test identifiers to docstring names.

use crate::item::TestItem;
use crate::naming::derive_display_name;
use std::collections::HashMap;
use std::io::Write;

/// What the runner should do after collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionOutcome {
    /// Go on and execute the collected items
    Continue,
    /// Collect-only run: names were listed, execute nothing
    ListOnly {
        /// Number of names printed
        listed: usize,
    },
}

impl CollectionOutcome {
    /// Check if execution should stop
    #[must_use]
    pub const fn is_list_only(&self) -> bool {
        matches!(self, Self::ListOnly { .. })
    }
}

/// Rewrite the item's identifier once it has been collected.
///
/// Items without a docstring keep their identifier. Returns whether the
/// identifier changed.
pub fn on_item_collected(item: &mut TestItem) -> bool {
    match derive_display_name(item) {
        Some(name) => {
            tracing::debug!(from = %item.node_id, to = %name, "rewrote test id");
            item.node_id = name;
            true
        }
        None => false,
    }
}

/// Run after the whole collection finished.
///
/// In collect-only mode print one derived name per documented item and
/// return [`CollectionOutcome::ListOnly`]; the caller stops there.
pub fn on_collection_finish<W: Write + ?Sized>(
    items: &[TestItem],
    collect_only: bool,
    out: &mut W,
) -> std::io::Result<CollectionOutcome> {
    warn_duplicate_ids(items);

    if !collect_only {
        return Ok(CollectionOutcome::Continue);
    }

    let mut listed = 0;
    for name in items.iter().filter_map(derive_display_name) {
        writeln!(out, "{name}")?;
        listed += 1;
    }
    Ok(CollectionOutcome::ListOnly { listed })
}

/// Identifiers shared by more than one item, in first-seen order
#[must_use]
pub fn duplicate_ids(items: &[TestItem]) -> Vec<&str> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order = Vec::new();
    for item in items {
        let count = counts.entry(item.node_id.as_str()).or_insert(0);
        *count += 1;
        if *count == 2 {
            order.push(item.node_id.as_str());
        }
    }
    order
}

fn warn_duplicate_ids(items: &[TestItem]) {
    for id in duplicate_ids(items) {
        tracing::warn!(id, "several tests share this display name");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn documented() -> TestItem {
        TestItem::new("test_search")
            .with_node_id("tests/test_search.py::test_search")
            .with_doc("Search returns results. Checks the first page only.")
    }

    fn undocumented() -> TestItem {
        TestItem::new("test_misc").with_node_id("tests/test_misc.py::test_misc")
    }

    mod item_collected_tests {
        use super::*;

        #[test]
        fn test_rewrites_documented_item() {
            let mut item = documented();
            assert!(on_item_collected(&mut item));
            assert_eq!(item.node_id, "Search returns results");
        }

        #[test]
        fn test_leaves_undocumented_item() {
            let mut item = undocumented();
            assert!(!on_item_collected(&mut item));
            assert_eq!(item.node_id, "tests/test_misc.py::test_misc");
        }

        #[test]
        fn test_rewrites_parametrized_item() {
            let mut item = documented()
                .with_node_id("tests/test_search.py::test_search[chrome]")
                .with_param("browser", "chrome");
            on_item_collected(&mut item);
            assert_eq!(
                item.node_id,
                "Search returns results Parameters browser_\"chrome\""
            );
        }
    }

    mod collection_finish_tests {
        use super::*;

        #[test]
        fn test_collect_only_lists_documented_items() {
            let items = vec![documented(), undocumented()];
            let mut out = Vec::new();

            let outcome = on_collection_finish(&items, true, &mut out).unwrap();

            assert_eq!(outcome, CollectionOutcome::ListOnly { listed: 1 });
            assert!(outcome.is_list_only());
            assert_eq!(String::from_utf8(out).unwrap(), "Search returns results\n");
        }

        #[test]
        fn test_normal_run_continues_silently() {
            let items = vec![documented()];
            let mut out = Vec::new();

            let outcome = on_collection_finish(&items, false, &mut out).unwrap();
            assert_eq!(outcome, CollectionOutcome::Continue);
            assert!(out.is_empty());
        }

        #[test]
        fn test_collect_only_with_no_items() {
            let mut out = Vec::new();
            let outcome = on_collection_finish(&[], true, &mut out).unwrap();
            assert_eq!(outcome, CollectionOutcome::ListOnly { listed: 0 });
        }
    }

    mod duplicate_tests {
        use super::*;

        #[test]
        fn test_duplicates_are_reported_not_removed() {
            let mut items = vec![
                documented(),
                documented().with_node_id("other"),
                undocumented(),
            ];
            for item in &mut items {
                on_item_collected(item);
            }

            assert_eq!(duplicate_ids(&items), vec!["Search returns results"]);
            assert_eq!(items.len(), 3);
        }

        #[test]
        fn test_no_duplicates() {
            assert!(duplicate_ids(&[documented(), undocumented()]).is_empty());
        }
    }
}
