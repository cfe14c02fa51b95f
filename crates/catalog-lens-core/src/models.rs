//! Catalog data models
//!
//! These models mirror the JSON shapes served by the dashboard server: a flat
//! list of available items (dashboards, benchmarks, snapshots, controls) plus a
//! metadata record describing the current mod and its installed dependencies.
//! Field names on the wire keep the server's naming (`full_name`, `type`,
//! `mod_full_name`); the Rust side uses the catalog vocabulary.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Insertion-ordered tag map (`key -> value`).
pub type Tags = IndexMap<String, String>;

// =============================================================================
// ItemKind
// =============================================================================

/// The kind of a catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Dashboard,
    Benchmark,
    Snapshot,
    Control,
    /// Any kind this crate does not know about yet.
    #[serde(other)]
    Unknown,
}

impl ItemKind {
    /// Flat kinds never render (or sort) by their ancestor chain.
    #[must_use]
    pub const fn is_flat(self) -> bool {
        matches!(self, Self::Dashboard)
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dashboard => write!(f, "dashboard"),
            Self::Benchmark => write!(f, "benchmark"),
            Self::Snapshot => write!(f, "snapshot"),
            Self::Control => write!(f, "control"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

// =============================================================================
// OwningGroup
// =============================================================================

/// A mod that defines catalog items.
///
/// All fields are optional: unresolved lookups degrade to
/// [`OwningGroup::default()`], which has no title and no short name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwningGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
}

impl OwningGroup {
    /// Display label: title, then short name. Blank values count as missing.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        non_blank(self.title.as_deref()).or_else(|| non_blank(self.short_name.as_deref()))
    }
}

// =============================================================================
// ServerMetadata
// =============================================================================

/// Metadata describing the current mod and the mods installed alongside it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerMetadata {
    #[serde(rename = "mod", default)]
    pub current: OwningGroup,
    #[serde(default, deserialize_with = "null_as_default")]
    pub installed_mods: HashMap<String, OwningGroup>,
}

impl ServerMetadata {
    /// Resolve an owning-group id: the current mod first, then installed mods.
    #[must_use]
    pub fn resolve(&self, id: &str) -> Option<&OwningGroup> {
        if self.current.full_name.as_deref() == Some(id) {
            return Some(&self.current);
        }
        self.installed_mods.get(id)
    }
}

// =============================================================================
// CatalogItem
// =============================================================================

/// One indexable entity in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Stable unique key (the fully-qualified name).
    #[serde(rename = "full_name")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Tags,
    /// Ancestor id paths, each ordered from a root toward this item.
    #[serde(default, deserialize_with = "null_as_default")]
    pub trunks: Vec<Vec<String>>,
    #[serde(default)]
    pub is_top_level: bool,
    #[serde(rename = "mod_full_name", default)]
    pub owning_group_id: String,
}

impl CatalogItem {
    #[must_use]
    pub fn new(id: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id: id.into(),
            kind,
            title: None,
            short_name: None,
            tags: Tags::new(),
            trunks: Vec::new(),
            is_top_level: false,
            owning_group_id: String::new(),
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_short_name(mut self, short_name: impl Into<String>) -> Self {
        self.short_name = Some(short_name.into());
        self
    }

    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_trunk<I, S>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.trunks.push(path.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub const fn top_level(mut self) -> Self {
        self.is_top_level = true;
        self
    }

    #[must_use]
    pub fn owned_by(mut self, owning_group_id: impl Into<String>) -> Self {
        self.owning_group_id = owning_group_id.into();
        self
    }

    /// Display label: title, then short name, then the empty string.
    #[must_use]
    pub fn label(&self) -> &str {
        non_blank(self.title.as_deref())
            .or_else(|| non_blank(self.short_name.as_deref()))
            .unwrap_or("")
    }

    /// The first trunk path, if any.
    #[must_use]
    pub fn primary_trunk(&self) -> Option<&[String]> {
        self.trunks.first().map(Vec::as_slice)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Treat an explicit JSON `null` the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
