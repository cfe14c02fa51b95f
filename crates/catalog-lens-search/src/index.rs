//! Catalog index
//!
//! [`CatalogIndex`] is rebuilt from scratch whenever the raw catalog or the
//! server metadata changes. Items are shared as [`ItemRef`] snapshots so every
//! downstream stage (search, sort, grouping) can hold them without copying.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexSet;
use serde::Serialize;

use catalog_lens_core::{CatalogItem, OwningGroup, ServerMetadata};

use crate::query::searchable_text;

/// Shared, read-only handle to an indexed item.
pub type ItemRef = Arc<IndexedItem>;

/// A catalog item with its owning mod resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexedItem {
    #[serde(flatten)]
    pub item: CatalogItem,
    #[serde(rename = "mod")]
    pub owning_group: OwningGroup,
    /// Lowercased haystack used by free-text search.
    #[serde(skip)]
    pub search_text: String,
}

impl IndexedItem {
    #[must_use]
    pub fn new(item: CatalogItem, owning_group: OwningGroup) -> Self {
        let search_text = searchable_text(&item, &owning_group);
        Self {
            item,
            owning_group,
            search_text,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.item.id
    }

    #[must_use]
    pub fn label(&self) -> &str {
        self.item.label()
    }
}

/// Derived, read-only view over the raw catalog.
///
/// # Invariants
/// - every id appears at most once in [`CatalogIndex::items`]
/// - [`CatalogIndex::top_level`] is a subset of [`CatalogIndex::items`]
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    items: Vec<ItemRef>,
    positions: HashMap<String, usize>,
    top_level: Vec<ItemRef>,
    tag_keys: Vec<String>,
    loaded: bool,
}

impl CatalogIndex {
    /// An index for a catalog (or metadata) that has not been loaded yet.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the index from raw items and server metadata.
    ///
    /// Owning mods resolve against the current mod first, then installed
    /// mods; anything else gets an empty record. Duplicate ids keep their
    /// first occurrence.
    pub fn build<I>(raw: I, metadata: &ServerMetadata) -> Self
    where
        I: IntoIterator<Item = CatalogItem>,
    {
        let mut items: Vec<ItemRef> = Vec::new();
        let mut positions = HashMap::new();
        let mut top_level = Vec::new();
        let mut tag_keys: IndexSet<String> = IndexSet::new();
        let mut unresolved = 0usize;

        for item in raw {
            if positions.contains_key(&item.id) {
                tracing::warn!(id = %item.id, "duplicate catalog id dropped");
                continue;
            }
            let owning_group = if let Some(group) = metadata.resolve(&item.owning_group_id) {
                group.clone()
            } else {
                unresolved += 1;
                tracing::trace!(
                    id = %item.id,
                    owning_group = %item.owning_group_id,
                    "owning group unresolved"
                );
                OwningGroup::default()
            };

            for key in item.tags.keys() {
                tag_keys.insert(key.clone());
            }

            let is_top_level = item.is_top_level;
            positions.insert(item.id.clone(), items.len());
            let entry = Arc::new(IndexedItem::new(item, owning_group));
            if is_top_level {
                top_level.push(Arc::clone(&entry));
            }
            items.push(entry);
        }

        tracing::debug!(
            items = items.len(),
            top_level = top_level.len(),
            tag_keys = tag_keys.len(),
            unresolved,
            "catalog index rebuilt"
        );

        Self {
            items,
            positions,
            top_level,
            tag_keys: tag_keys.into_iter().collect(),
            loaded: true,
        }
    }

    /// `false` until both the catalog and its metadata have been supplied.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Every indexed item, in catalog order.
    #[must_use]
    pub fn items(&self) -> &[ItemRef] {
        &self.items
    }

    /// Items flagged `is_top_level`, in catalog order.
    #[must_use]
    pub fn top_level(&self) -> &[ItemRef] {
        &self.top_level
    }

    /// Tag keys in first-seen order.
    #[must_use]
    pub fn tag_keys(&self) -> &[String] {
        &self.tag_keys
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ItemRef> {
        self.positions.get(id).map(|&pos| &self.items[pos])
    }
}
