//! Push-based catalog session
//!
//! [`CatalogSession`] owns the raw inputs (catalog, metadata, query, grouping
//! mode) and recomputes derived state in dependency order whenever one of
//! them changes:
//!
//! ```text
//! catalog / metadata ──► index ──► search ──► sort ──► group
//! query / group-by   ─────────────┘
//! ```
//!
//! Readers only ever see a view computed against the current index.

use catalog_lens_core::{CatalogItem, GroupBy, ServerMetadata};

use crate::index::CatalogIndex;
use crate::query::SearchQuery;
use crate::quick_filter::merge_tag_into_query;
use crate::view::CatalogView;

/// Notifications pushed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEvent {
    /// Tag keys discovered by the latest index rebuild, first-seen order.
    TagKeysDiscovered(Vec<String>),
    /// The free-text query changed through a quick-filter tag.
    SearchValueChanged(String),
}

/// Receiver for [`CatalogEvent`]s.
pub trait CatalogEvents {
    fn emit(&mut self, event: CatalogEvent);
}

impl<F> CatalogEvents for F
where
    F: FnMut(CatalogEvent),
{
    fn emit(&mut self, event: CatalogEvent) {
        self(event);
    }
}

impl CatalogEvents for Vec<CatalogEvent> {
    fn emit(&mut self, event: CatalogEvent) {
        self.push(event);
    }
}

pub struct CatalogSession<E: CatalogEvents> {
    events: E,
    catalog: Option<Vec<CatalogItem>>,
    metadata: Option<ServerMetadata>,
    query: String,
    group_by: GroupBy,
    index: CatalogIndex,
    view: CatalogView,
}

impl<E: CatalogEvents> CatalogSession<E> {
    #[must_use]
    pub fn new(group_by: GroupBy, events: E) -> Self {
        let view = CatalogView::loading(SearchQuery::default(), group_by.clone());
        Self {
            events,
            catalog: None,
            metadata: None,
            query: String::new(),
            group_by,
            index: CatalogIndex::empty(),
            view,
        }
    }

    pub fn set_catalog(&mut self, items: Vec<CatalogItem>) {
        self.catalog = Some(items);
        self.reindex();
    }

    pub fn set_metadata(&mut self, metadata: ServerMetadata) {
        self.metadata = Some(metadata);
        self.reindex();
    }

    pub fn set_query(&mut self, raw_query: impl Into<String>) {
        let raw_query = raw_query.into();
        if raw_query == self.query {
            return;
        }
        self.query = raw_query;
        self.refresh_view();
    }

    pub fn clear_query(&mut self) {
        self.set_query(String::new());
    }

    pub fn set_group_by(&mut self, group_by: GroupBy) {
        if group_by == self.group_by {
            return;
        }
        self.group_by = group_by;
        self.refresh_view();
    }

    /// Fold a quick-filter tag value into the query.
    ///
    /// Emits [`CatalogEvent::SearchValueChanged`] only when the query text
    /// actually changes.
    pub fn activate_tag(&mut self, tag_value: &str) {
        let merged = merge_tag_into_query(&self.query, tag_value);
        if merged == self.query {
            return;
        }
        self.events.emit(CatalogEvent::SearchValueChanged(merged.clone()));
        self.set_query(merged);
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub const fn group_by(&self) -> &GroupBy {
        &self.group_by
    }

    #[must_use]
    pub const fn index(&self) -> &CatalogIndex {
        &self.index
    }

    #[must_use]
    pub const fn view(&self) -> &CatalogView {
        &self.view
    }

    #[must_use]
    pub const fn events(&self) -> &E {
        &self.events
    }

    pub fn into_events(self) -> E {
        self.events
    }

    fn reindex(&mut self) {
        self.index = match (&self.catalog, &self.metadata) {
            (Some(catalog), Some(metadata)) => {
                let index = CatalogIndex::build(catalog.iter().cloned(), metadata);
                self.events
                    .emit(CatalogEvent::TagKeysDiscovered(index.tag_keys().to_vec()));
                index
            }
            _ => CatalogIndex::empty(),
        };
        self.refresh_view();
    }

    fn refresh_view(&mut self) {
        self.view = CatalogView::compute(&self.index, &self.query, &self.group_by);
    }
}
