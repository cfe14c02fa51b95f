//! Catalog search and grouping for catalog-lens
//!
//! The pipeline always runs in dependency order:
//! - [`CatalogIndex`]: items annotated with their owning mod, top-level subset, tag keys
//! - [`SearchQuery`] / [`search_items`]: AND-of-substring free-text match
//! - [`breadcrumb_sort`]: order results by their resolved ancestor chain
//! - [`group_items`]: partition into titled sections, `"Other"` last
//!
//! [`CatalogView`] composes the stages for one input snapshot and
//! [`CatalogSession`] recomputes them whenever an input changes.

#![forbid(unsafe_code)]

pub mod breadcrumb;
pub mod grouping;
pub mod index;
pub mod query;
pub mod quick_filter;
pub mod session;
pub mod view;

pub use breadcrumb::{breadcrumb_parts, breadcrumb_sort, sort_key};
pub use grouping::{CatalogSection, OTHER_SECTION, compare_section_titles, group_items, partition_key};
pub use index::{CatalogIndex, IndexedItem, ItemRef};
pub use query::{SearchQuery, search_items, searchable_text};
pub use quick_filter::{item_href, merge_tag_into_query, quick_filter_tags};
pub use session::{CatalogEvent, CatalogEvents, CatalogSession};
pub use view::{CatalogView, ListState};
