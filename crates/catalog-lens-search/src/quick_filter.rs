//! Tag quick filters and item links
//!
//! Catalog rows show a few tags as clickable chips; activating one folds the
//! tag value into the current free-text query.

use catalog_lens_core::{CatalogItem, LensConfig};

/// Tags rendered as quick-filter chips, in the item's tag order.
#[must_use]
pub fn quick_filter_tags<'a>(item: &'a CatalogItem, config: &LensConfig) -> Vec<(&'a str, &'a str)> {
    item.tags
        .iter()
        .filter(|(key, _)| config.is_quick_filter_tag(key))
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect()
}

/// Fold a tag value into the current query.
///
/// The value is appended unless the trimmed query already contains it.
#[must_use]
pub fn merge_tag_into_query(current: &str, tag_value: &str) -> String {
    let existing = current.trim();
    if existing.is_empty() {
        tag_value.to_owned()
    } else if existing.contains(tag_value) {
        existing.to_owned()
    } else {
        format!("{existing} {tag_value}")
    }
}

/// Link target for an item, carrying the search path prefix when one is set.
#[must_use]
pub fn item_href(item: &CatalogItem, search_path_prefix: &[String]) -> String {
    if search_path_prefix.is_empty() {
        format!("/{}", item.id)
    } else {
        format!(
            "/{}?search_path_prefix={}",
            item.id,
            search_path_prefix.join(",")
        )
    }
}
