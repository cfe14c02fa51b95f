//! Section grouping
//!
//! Items are partitioned by a tag value or by their owning mod. Items without
//! a partition key land in the [`OTHER_SECTION`] bucket, which always sorts
//! after every other section.

use std::cmp::Ordering;

use indexmap::IndexMap;
use serde::Serialize;

use catalog_lens_core::GroupBy;

use crate::index::{IndexedItem, ItemRef};

/// Title of the catch-all section.
pub const OTHER_SECTION: &str = "Other";

/// One titled section of grouped items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogSection {
    pub title: String,
    pub items: Vec<ItemRef>,
}

/// The bucket an item belongs to under `group_by`.
#[must_use]
pub fn partition_key<'e>(entry: &'e IndexedItem, group_by: &GroupBy) -> &'e str {
    match group_by {
        GroupBy::Tag(key) => entry.item.tags.get(key).map_or(OTHER_SECTION, String::as_str),
        GroupBy::OwningGroup => entry.owning_group.label().unwrap_or(OTHER_SECTION),
    }
}

/// Ascending title order with [`OTHER_SECTION`] strictly last.
#[must_use]
pub fn compare_section_titles(a: &str, b: &str) -> Ordering {
    (a == OTHER_SECTION, a).cmp(&(b == OTHER_SECTION, b))
}

/// Partition `items` into sections.
///
/// Items keep their input order inside a section. Sections are sorted with
/// [`compare_section_titles`]; the sort is stable.
pub fn group_items<'a, I>(items: I, group_by: &GroupBy) -> Vec<CatalogSection>
where
    I: IntoIterator<Item = &'a ItemRef>,
{
    let mut buckets: IndexMap<&str, Vec<ItemRef>> = IndexMap::new();
    for entry in items {
        buckets
            .entry(partition_key(entry, group_by))
            .or_default()
            .push(ItemRef::clone(entry));
    }

    let mut sections: Vec<CatalogSection> = buckets
        .into_iter()
        .map(|(title, items)| CatalogSection {
            title: title.to_owned(),
            items,
        })
        .collect();
    sections.sort_by(|a, b| compare_section_titles(&a.title, &b.title));
    sections
}
