//! Breadcrumb ordering for search results
//!
//! Nested benchmarks are ordered by their full ancestor chain
//! (`"root > parent > child"`) instead of their own short title, so search
//! results for one benchmark tree stay together.

use crate::index::{CatalogIndex, ItemRef};

/// Separator between ancestor labels in a breadcrumb key.
pub const BREADCRUMB_SEPARATOR: &str = " > ";

/// Resolve the first trunk path into indexed items.
///
/// Ids missing from the index are dropped.
#[must_use]
pub fn breadcrumb_parts<'a>(entry: &ItemRef, index: &'a CatalogIndex) -> Vec<&'a ItemRef> {
    entry
        .item
        .primary_trunk()
        .unwrap_or_default()
        .iter()
        .filter_map(|id| index.get(id))
        .collect()
}

/// Lowercased sort key for one item.
///
/// Flat kinds and items without a (non-empty) first trunk sort by their own
/// label; everything else sorts by the labels of its resolved ancestors.
#[must_use]
pub fn sort_key(entry: &ItemRef, index: &CatalogIndex) -> String {
    let trunk = entry.item.primary_trunk().unwrap_or_default();
    if entry.item.kind.is_flat() || trunk.is_empty() {
        return entry.label().to_lowercase();
    }
    breadcrumb_parts(entry, index)
        .into_iter()
        .map(|part| part.label())
        .filter(|label| !label.is_empty())
        .collect::<Vec<_>>()
        .join(BREADCRUMB_SEPARATOR)
        .to_lowercase()
}

/// Stable ascending sort by [`sort_key`].
#[must_use]
pub fn breadcrumb_sort(mut items: Vec<ItemRef>, index: &CatalogIndex) -> Vec<ItemRef> {
    items.sort_by_cached_key(|entry| sort_key(entry, index));
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_lens_core::{CatalogItem, ItemKind, ServerMetadata};

    fn fixture() -> CatalogIndex {
        CatalogIndex::build(
            vec![
                CatalogItem::new("a", ItemKind::Benchmark)
                    .with_title("Alpha")
                    .with_trunk(["a"])
                    .top_level(),
                CatalogItem::new("b", ItemKind::Benchmark)
                    .with_title("Beta")
                    .with_trunk(["a", "b"]),
                CatalogItem::new("c", ItemKind::Benchmark)
                    .with_title("Gamma")
                    .with_trunk(["a", "b", "c"]),
                CatalogItem::new("d", ItemKind::Dashboard)
                    .with_title("Zulu Dashboard")
                    .with_trunk(["a", "d"])
                    .top_level(),
                CatalogItem::new("e", ItemKind::Benchmark).with_short_name("echo"),
                CatalogItem::new("f", ItemKind::Control)
                    .with_title("Foxtrot")
                    .with_trunk(["a", "missing", "f"]),
            ],
            &ServerMetadata::default(),
        )
    }

    #[test]
    fn nested_item_uses_ancestor_chain() {
        let index = fixture();
        let c = index.get("c").unwrap();
        assert_eq!(sort_key(c, &index), "alpha > beta > gamma");
    }

    #[test]
    fn dashboards_and_trunkless_items_use_own_label() {
        let index = fixture();
        assert_eq!(sort_key(index.get("d").unwrap(), &index), "zulu dashboard");
        assert_eq!(sort_key(index.get("e").unwrap(), &index), "echo");
    }

    #[test]
    fn empty_first_trunk_uses_own_label() {
        let index = CatalogIndex::build(
            vec![
                CatalogItem::new("x", ItemKind::Benchmark)
                    .with_title("X Ray")
                    .with_trunk(Vec::<String>::new())
                    .with_trunk(["ignored"]),
            ],
            &ServerMetadata::default(),
        );
        assert_eq!(sort_key(index.get("x").unwrap(), &index), "x ray");
    }

    #[test]
    fn unresolved_ancestors_are_dropped() {
        let index = fixture();
        assert_eq!(sort_key(index.get("f").unwrap(), &index), "alpha > foxtrot");
        let parts: Vec<&str> = breadcrumb_parts(index.get("f").unwrap(), &index)
            .into_iter()
            .map(|p| p.id())
            .collect();
        assert_eq!(parts, vec!["a", "f"]);
    }

    #[test]
    fn sort_orders_by_breadcrumb_and_is_stable() {
        let index = fixture();
        let input: Vec<ItemRef> = ["d", "c", "e", "b", "a"]
            .iter()
            .map(|id| index.get(id).unwrap().clone())
            .collect();
        let sorted = breadcrumb_sort(input, &index);
        let sorted: Vec<&str> = sorted.iter().map(|e| e.id()).collect();
        // "alpha" < "alpha > beta" < "alpha > beta > gamma" < "echo" < "zulu dashboard"
        assert_eq!(sorted, vec!["a", "b", "c", "e", "d"]);
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let index = CatalogIndex::build(
            vec![
                CatalogItem::new("one", ItemKind::Dashboard).with_title("Same"),
                CatalogItem::new("two", ItemKind::Dashboard).with_title("same"),
            ],
            &ServerMetadata::default(),
        );
        let forward = breadcrumb_sort(index.items().to_vec(), &index);
        assert_eq!(forward[0].id(), "one");
        let mut reversed = index.items().to_vec();
        reversed.reverse();
        let backward = breadcrumb_sort(reversed, &index);
        assert_eq!(backward[0].id(), "two");
    }
}
