//! Composed catalog view
//!
//! [`CatalogView::compute`] runs search, breadcrumb sort, and grouping against
//! one index snapshot. Running it twice with the same inputs yields equal
//! output.

use serde::Serialize;

use catalog_lens_core::GroupBy;

use crate::breadcrumb::breadcrumb_sort;
use crate::grouping::{CatalogSection, group_items};
use crate::index::{CatalogIndex, ItemRef};
use crate::query::SearchQuery;

/// What a renderer should show for the current inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListState {
    /// Catalog or metadata not supplied yet.
    Loading,
    /// Loaded, but the catalog has no items.
    Empty,
    /// An active query matched nothing.
    NoResults,
    Ready,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogView {
    pub query: SearchQuery,
    pub group_by: GroupBy,
    pub state: ListState,
    /// Search results (breadcrumb-sorted) or the top-level subset.
    pub results: Vec<ItemRef>,
    pub sections: Vec<CatalogSection>,
}

impl CatalogView {
    /// A view with no results, used before anything is loaded.
    #[must_use]
    pub fn loading(query: SearchQuery, group_by: GroupBy) -> Self {
        Self {
            query,
            group_by,
            state: ListState::Loading,
            results: Vec::new(),
            sections: Vec::new(),
        }
    }

    #[must_use]
    pub fn compute(index: &CatalogIndex, raw_query: &str, group_by: &GroupBy) -> Self {
        let query = SearchQuery::parse(raw_query);
        if !index.is_loaded() {
            return Self::loading(query, group_by.clone());
        }

        let results = if query.is_active() {
            breadcrumb_sort(index.search(&query), index)
        } else {
            index.search(&query)
        };
        let sections = group_items(&results, group_by);

        let state = if query.is_active() {
            if results.is_empty() {
                ListState::NoResults
            } else {
                ListState::Ready
            }
        } else if index.is_empty() {
            ListState::Empty
        } else {
            ListState::Ready
        };

        tracing::trace!(
            ?state,
            results = results.len(),
            sections = sections.len(),
            group_by = %group_by,
            "catalog view computed"
        );

        Self {
            query,
            group_by: group_by.clone(),
            state,
            results,
            sections,
        }
    }

    /// Section titles in display order.
    #[must_use]
    pub fn section_titles(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.title.as_str()).collect()
    }
}
