//! Free-text search
//!
//! A query is trimmed, lowercased, and split on spaces. An item matches when
//! every part is a substring of its searchable text (mod label, item label,
//! and every `key=value` tag pair). Matching is case-insensitive and not
//! word-bounded; there is no ranking.

use catalog_lens_core::{CatalogItem, OwningGroup};
use serde::{Deserialize, Serialize};

use crate::index::{CatalogIndex, ItemRef};

/// A tokenized free-text query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    raw: String,
    parts: Vec<String>,
}

impl SearchQuery {
    /// Tokenize a raw query. Runs of spaces never produce empty parts.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let parts = raw
            .trim()
            .to_lowercase()
            .split(' ')
            .filter(|part| !part.is_empty())
            .map(str::to_owned)
            .collect();
        Self {
            raw: raw.to_owned(),
            parts,
        }
    }

    /// `true` when the query has at least one part.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.parts.is_empty()
    }

    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// AND-of-substring match against a precomputed haystack.
    #[must_use]
    pub fn matches_text(&self, haystack: &str) -> bool {
        self.parts.iter().all(|part| haystack.contains(part.as_str()))
    }
}

/// Lowercased `"{mod label} {item label} {k=v k=v ...}"`.
#[must_use]
pub fn searchable_text(item: &CatalogItem, owning_group: &OwningGroup) -> String {
    let tags = item
        .tags
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "{} {} {}",
        owning_group.label().unwrap_or(""),
        item.label(),
        tags
    )
    .to_lowercase()
}

/// Keep the items matching `query`, in input order.
///
/// An inactive query keeps everything.
pub fn search_items<'a, I>(items: I, query: &SearchQuery) -> Vec<ItemRef>
where
    I: IntoIterator<Item = &'a ItemRef>,
{
    items
        .into_iter()
        .filter(|entry| query.matches_text(&entry.search_text))
        .cloned()
        .collect()
}

impl CatalogIndex {
    /// Search the base set appropriate for `query`.
    ///
    /// Without an active query the base set is the top-level subset, returned
    /// unfiltered; with one, the full index is searched.
    #[must_use]
    pub fn search(&self, query: &SearchQuery) -> Vec<ItemRef> {
        if !query.is_active() {
            return self.top_level().to_vec();
        }
        let matched = search_items(self.items(), query);
        tracing::debug!(
            parts = ?query.parts(),
            searched = self.len(),
            matched = matched.len(),
            "catalog search"
        );
        matched
    }
}
