#![forbid(unsafe_code)]

use catalog_lens_core::{CatalogItem, GroupBy, ItemKind, OwningGroup, ServerMetadata};
use catalog_lens_search::{
    CatalogIndex, CatalogView, ItemRef, OTHER_SECTION, SearchQuery, breadcrumb_sort, group_items,
    search_items,
};
use proptest::prelude::*;
use std::collections::HashSet;

// ─── Strategies ──────────────────────────────────────────────────────────────

fn arb_kind() -> impl Strategy<Value = ItemKind> {
    prop_oneof![
        Just(ItemKind::Dashboard),
        Just(ItemKind::Benchmark),
        Just(ItemKind::Snapshot),
        Just(ItemKind::Control),
    ]
}

fn arb_word() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z][a-z]{0,6}").expect("valid regex")
}

fn arb_tags() -> impl Strategy<Value = Vec<(String, String)>> {
    proptest::collection::vec(
        (
            prop_oneof![Just("service"), Just("category"), Just("type"), Just("plugin")],
            arb_word(),
        )
            .prop_map(|(k, v)| (k.to_owned(), v)),
        0..4,
    )
}

/// Catalogs with ids drawn from a small pool so duplicates and dangling
/// trunk references both occur.
fn arb_catalog() -> impl Strategy<Value = Vec<CatalogItem>> {
    proptest::collection::vec(
        (
            0u8..24,
            arb_kind(),
            proptest::option::of(arb_word()),
            arb_tags(),
            proptest::collection::vec(0u8..30, 0..4),
            any::<bool>(),
            prop_oneof![Just("mod.local"), Just("mod.aws"), Just("mod.missing")],
        )
            .prop_map(|(id, kind, title, tags, trunk, top, owner)| {
                let mut item = CatalogItem::new(format!("item.{id}"), kind)
                    .with_short_name(format!("item_{id}"))
                    .owned_by(owner);
                item.title = title;
                for (k, v) in tags {
                    item = item.with_tag(k, v);
                }
                if !trunk.is_empty() {
                    item = item.with_trunk(trunk.into_iter().map(|t| format!("item.{t}")));
                }
                if top {
                    item = item.top_level();
                }
                item
            }),
        0..40,
    )
}

fn arb_query() -> impl Strategy<Value = String> {
    proptest::string::string_regex("( {0,3}[a-z=/]{0,4}){0,3} {0,2}").expect("valid regex")
}

fn metadata() -> ServerMetadata {
    let mut metadata = ServerMetadata {
        current: OwningGroup {
            full_name: Some("mod.local".to_owned()),
            title: Some("Local".to_owned()),
            short_name: None,
        },
        ..ServerMetadata::default()
    };
    metadata.installed_mods.insert(
        "mod.aws".to_owned(),
        OwningGroup {
            full_name: Some("mod.aws".to_owned()),
            title: None,
            short_name: Some("aws".to_owned()),
        },
    );
    metadata
}

fn ids(items: &[ItemRef]) -> Vec<String> {
    items.iter().map(|e| e.id().to_owned()).collect()
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 256, ..ProptestConfig::default() })]

    #[test]
    fn index_ids_unique_and_top_level_subset(catalog in arb_catalog()) {
        let index = CatalogIndex::build(catalog, &metadata());
        let all: Vec<String> = ids(index.items());
        let unique: HashSet<&String> = all.iter().collect();
        prop_assert_eq!(unique.len(), all.len());
        for top in index.top_level() {
            prop_assert!(unique.contains(&top.id().to_owned()));
            prop_assert!(top.item.is_top_level);
        }
    }

    #[test]
    fn search_is_idempotent(catalog in arb_catalog(), raw in arb_query()) {
        let index = CatalogIndex::build(catalog, &metadata());
        let query = SearchQuery::parse(&raw);
        let once = search_items(index.items(), &query);
        let twice = search_items(&once, &query);
        prop_assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn repeated_spaces_match_like_single_spaces(catalog in arb_catalog(), raw in arb_query()) {
        let index = CatalogIndex::build(catalog, &metadata());
        let collapsed = raw.split(' ').filter(|p| !p.is_empty()).collect::<Vec<_>>().join(" ");
        let a = index.search(&SearchQuery::parse(&raw));
        let b = index.search(&SearchQuery::parse(&collapsed));
        prop_assert_eq!(ids(&a), ids(&b));
    }

    #[test]
    fn inactive_query_returns_exactly_top_level(catalog in arb_catalog(), spaces in " {0,4}") {
        let index = CatalogIndex::build(catalog, &metadata());
        let result = index.search(&SearchQuery::parse(&spaces));
        prop_assert_eq!(ids(&result), ids(index.top_level()));
    }

    #[test]
    fn breadcrumb_sort_is_a_permutation(catalog in arb_catalog(), raw in arb_query()) {
        let index = CatalogIndex::build(catalog, &metadata());
        let matched = index.search(&SearchQuery::parse(&raw));
        let mut before = ids(&matched);
        let mut after = ids(&breadcrumb_sort(matched, &index));
        before.sort();
        after.sort();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn other_section_is_always_last(catalog in arb_catalog(), tag in prop_oneof![Just("service"), Just("type")]) {
        let index = CatalogIndex::build(catalog, &metadata());
        for group_by in [GroupBy::OwningGroup, GroupBy::Tag(tag.to_owned())] {
            let sections = group_items(index.items(), &group_by);
            let total: usize = sections.iter().map(|s| s.items.len()).sum();
            prop_assert_eq!(total, index.len());
            if let Some(pos) = sections.iter().position(|s| s.title == OTHER_SECTION) {
                prop_assert_eq!(pos, sections.len() - 1);
            }
            let titles: Vec<&str> = sections
                .iter()
                .map(|s| s.title.as_str())
                .filter(|t| *t != OTHER_SECTION)
                .collect();
            let mut sorted = titles.clone();
            sorted.sort_unstable();
            prop_assert_eq!(titles, sorted);
        }
    }

    #[test]
    fn view_recomputation_is_stable(catalog in arb_catalog(), raw in arb_query()) {
        let index = CatalogIndex::build(catalog, &metadata());
        let group_by = GroupBy::Tag("service".to_owned());
        prop_assert_eq!(
            CatalogView::compute(&index, &raw, &group_by),
            CatalogView::compute(&index, &raw, &group_by)
        );
    }
}

#[test]
fn grouping_example_zebra_other_apple() {
    let index = CatalogIndex::build(
        vec![
            CatalogItem::new("z", ItemKind::Dashboard).with_tag("category", "Zebra"),
            CatalogItem::new("o", ItemKind::Dashboard),
            CatalogItem::new("a", ItemKind::Dashboard).with_tag("category", "Apple"),
        ],
        &ServerMetadata::default(),
    );
    let sections = group_items(index.items(), &GroupBy::Tag("category".to_owned()));
    let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Apple", "Zebra", "Other"]);
}

#[test]
fn breadcrumb_example_alpha_beta_gamma() {
    let index = CatalogIndex::build(
        vec![
            CatalogItem::new("A", ItemKind::Benchmark).with_title("Alpha"),
            CatalogItem::new("B", ItemKind::Benchmark).with_title("Beta"),
            CatalogItem::new("C", ItemKind::Benchmark)
                .with_title("Gamma")
                .with_trunk(["A", "B", "C"]),
            CatalogItem::new("T", ItemKind::Dashboard)
                .with_title("Top Level")
                .top_level(),
        ],
        &ServerMetadata::default(),
    );
    let c = index.get("C").expect("indexed");
    let t = index.get("T").expect("indexed");
    assert_eq!(catalog_lens_search::sort_key(c, &index), "alpha > beta > gamma");
    assert_eq!(catalog_lens_search::sort_key(t, &index), "top level");
}

#[test]
fn multiple_spaces_example() {
    let index = CatalogIndex::build(
        vec![
            CatalogItem::new("x", ItemKind::Dashboard).with_title("a b"),
            CatalogItem::new("y", ItemKind::Dashboard).with_title("a only"),
        ],
        &ServerMetadata::default(),
    );
    let spaced = index.search(&SearchQuery::parse("a   b"));
    let single = index.search(&SearchQuery::parse("a b"));
    assert_eq!(ids(&spaced), ids(&single));
    assert_eq!(ids(&single), vec!["x"]);
}
