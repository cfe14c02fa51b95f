//! Field catalog
//!
//! The set of filterable field types is not fixed in code. It is read from a
//! value-statistics context supplied by the server, where each field type maps
//! to count data in one of three shapes:
//!
//! ```json
//! {
//!   "status":      { "ok": 12, "alarm": 3, "skip": 0 },
//!   "control_tag": { "key": { "service": { "AWS/S3": 4, "AWS/IAM": 2 } } },
//!   "benchmark":   { "value": { "aws.cis": { "title": "CIS v1.5.0", "count": 40 } } },
//!   "resource":    { "value": { "arn:aws:s3:::logs": 3 } }
//! }
//! ```
//!
//! [`FieldCatalog::from_context`] turns that into a capability table once per
//! context update. How a type's values are offered is decided by the shape of
//! its entry, never by its name, so new field types need no code change.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::expression::{FilterGroup, FilterLeaf};

/// `value -> occurrences`
pub type ValueCounts = IndexMap<String, i64>;

/// Field type name to its count data, in server order.
pub type ValueContext = IndexMap<String, FieldValues>;

/// One identifier in a listed entry: a bare count or a titled count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListedValue {
    Count(i64),
    Titled {
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        count: i64,
    },
}

impl ListedValue {
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Count(_) => None,
            Self::Titled { title, .. } => title.as_deref().filter(|t| !t.is_empty()),
        }
    }

    #[must_use]
    pub const fn count(&self) -> i64 {
        match self {
            Self::Count(count) | Self::Titled { count, .. } => *count,
        }
    }
}

/// Count data for one field type.
///
/// Variants are tried in declaration order, so an object with a `key`
/// sub-map is keyed, one with a `value` sub-map is listed, and any other map
/// of counts is flat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValues {
    Keyed {
        key: IndexMap<String, ValueCounts>,
    },
    Listed {
        value: IndexMap<String, ListedValue>,
    },
    Flat(ValueCounts),
    /// Anything else. The field type is listed but offers no values.
    Opaque(serde_json::Value),
}

impl FieldValues {
    #[must_use]
    pub const fn is_keyed(&self) -> bool {
        matches!(self, Self::Keyed { .. })
    }

    #[must_use]
    pub fn strategy(&self) -> ValueStrategy {
        match self {
            Self::Keyed { .. } => ValueStrategy::ScopedByKey,
            Self::Listed { value } if value.values().any(|v| v.title().is_some()) => {
                ValueStrategy::TitledIds
            }
            Self::Listed { .. } => ValueStrategy::IdAsLabel,
            Self::Flat(_) => ValueStrategy::PositiveCounts,
            Self::Opaque(_) => ValueStrategy::Unavailable,
        }
    }
}

/// How values of a field type are resolved into options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueStrategy {
    /// Flat counts; only values seen at least once.
    PositiveCounts,
    /// Values live under a key; the leaf's key selects them.
    ScopedByKey,
    /// Identifiers with display titles.
    TitledIds,
    /// Identifiers used as their own label.
    IdAsLabel,
    Unavailable,
}

// =============================================================================
// Options
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldTypeOption {
    pub field_key: String,
    pub label: String,
    pub keyed: bool,
    pub strategy: ValueStrategy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// An entry in the field-type picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TypeOption {
    /// A non-keyed type, valued with the type name.
    Single(SelectOption),
    /// A keyed type: one `"<type>|<key>"` option per observed key.
    Group {
        label: String,
        field_key: String,
        options: Vec<SelectOption>,
    },
}

impl TypeOption {
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Single(option) => &option.label,
            Self::Group { label, .. } => label,
        }
    }

    /// Every selectable option, groups flattened.
    #[must_use]
    pub fn options(&self) -> Vec<&SelectOption> {
        match self {
            Self::Single(option) => vec![option],
            Self::Group { options, .. } => options.iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueOption {
    pub value: String,
    pub label: String,
    pub occurrences: i64,
}

impl ValueOption {
    fn plain(value: &str, occurrences: i64) -> Self {
        Self {
            value: value.to_owned(),
            label: value.to_owned(),
            occurrences,
        }
    }
}

// =============================================================================
// FieldToken
// =============================================================================

/// Separator inside a composite `"<type>|<key>"` picker value.
pub const TOKEN_SEPARATOR: char = '|';

/// A picker value: a field type, optionally scoped to a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldToken {
    pub field_type: String,
    pub key: Option<String>,
}

impl FieldToken {
    /// Split on the first separator. An empty key is treated as absent.
    #[must_use]
    pub fn parse(token: &str) -> Self {
        match token.split_once(TOKEN_SEPARATOR) {
            Some((field_type, key)) => Self {
                field_type: field_type.to_owned(),
                key: Some(key.to_owned()).filter(|k| !k.is_empty()),
            },
            None => Self {
                field_type: token.to_owned(),
                key: None,
            },
        }
    }

    /// The token a leaf is currently selected under, if it has a type.
    #[must_use]
    pub fn for_leaf(leaf: &FilterLeaf) -> Option<Self> {
        leaf.field_type().map(|field_type| Self {
            field_type: field_type.to_owned(),
            key: leaf.key.clone().filter(|k| !k.is_empty()),
        })
    }
}

impl fmt::Display for FieldToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) => write!(f, "{}{TOKEN_SEPARATOR}{key}", self.field_type),
            None => f.write_str(&self.field_type),
        }
    }
}

// =============================================================================
// Labels
// =============================================================================

/// Display label for a field type name.
#[must_use]
pub fn field_label(field_key: &str) -> String {
    let fixed = match field_key {
        "benchmark" => "Benchmark",
        "control" => "Control",
        "control_tag" => "Control Tag",
        "dimension" => "Dimension",
        "reason" => "Reason",
        "resource" => "Resource",
        "severity" => "Severity",
        "status" => "Status",
        _ => return title_case(field_key),
    };
    fixed.to_owned()
}

fn title_case(snake: &str) -> String {
    snake
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// =============================================================================
// FieldCatalog
// =============================================================================

/// Capability table over one value-statistics context.
#[derive(Debug, Clone, Default)]
pub struct FieldCatalog {
    context: ValueContext,
    fields: IndexMap<String, FieldTypeOption>,
}

impl FieldCatalog {
    #[must_use]
    pub fn from_context(context: ValueContext) -> Self {
        let fields: IndexMap<String, FieldTypeOption> = context
            .iter()
            .map(|(field_key, values)| {
                let option = FieldTypeOption {
                    field_key: field_key.clone(),
                    label: field_label(field_key),
                    keyed: values.is_keyed(),
                    strategy: values.strategy(),
                };
                (field_key.clone(), option)
            })
            .collect();

        tracing::debug!(
            field_types = fields.len(),
            keyed = fields.values().filter(|f| f.keyed).count(),
            "field catalog rebuilt"
        );

        Self { context, fields }
    }

    #[must_use]
    pub fn context(&self) -> &ValueContext {
        &self.context
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[must_use]
    pub fn field(&self, field_key: &str) -> Option<&FieldTypeOption> {
        self.fields.get(field_key)
    }

    /// Every field type, in context order.
    #[must_use]
    pub fn field_types(&self) -> Vec<FieldTypeOption> {
        self.fields.values().cloned().collect()
    }

    /// The field-type picker, sorted by label.
    #[must_use]
    pub fn type_options(&self) -> Vec<TypeOption> {
        let mut options: Vec<TypeOption> = self
            .fields
            .values()
            .map(|field| match self.context.get(&field.field_key) {
                Some(FieldValues::Keyed { key }) => TypeOption::Group {
                    label: field.label.clone(),
                    field_key: field.field_key.clone(),
                    options: key
                        .keys()
                        .map(|k| SelectOption {
                            value: FieldToken {
                                field_type: field.field_key.clone(),
                                key: Some(k.clone()),
                            }
                            .to_string(),
                            label: k.clone(),
                        })
                        .collect(),
                },
                _ => TypeOption::Single(SelectOption {
                    value: field.field_key.clone(),
                    label: field.label.clone(),
                }),
            })
            .collect();
        options.sort_by(|a, b| a.label().cmp(b.label()));
        options
    }

    /// Picker entries for the leaf at `index` of `group`.
    ///
    /// A non-keyed type already used by a sibling is left out unless it is
    /// the edited leaf's own type. Keyed types always stay, since siblings
    /// can differ by key.
    #[must_use]
    pub fn selectable_options(&self, group: &FilterGroup, index: usize) -> Vec<TypeOption> {
        let own = group.leaf(index).and_then(FilterLeaf::field_type);
        let used = group.used_field_types();
        self.type_options()
            .into_iter()
            .filter(|option| match option {
                TypeOption::Group { .. } => true,
                TypeOption::Single(single) => {
                    own == Some(single.value.as_str()) || !used.contains(&single.value.as_str())
                }
            })
            .collect()
    }

    /// Keys observed for a keyed type, with the total count under each key.
    #[must_use]
    pub fn keys(&self, field_type: &str) -> Vec<ValueOption> {
        match self.context.get(field_type) {
            Some(FieldValues::Keyed { key }) => key
                .iter()
                .map(|(k, values)| {
                    let total = values
                        .values()
                        .fold(0i64, |sum, &count| sum.saturating_add(count));
                    ValueOption::plain(k, total)
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Value options for `field_type`, resolved by the entry's shape.
    ///
    /// Unknown types, keyed types without a matching key, and opaque entries
    /// all yield an empty list.
    #[must_use]
    pub fn values(&self, field_type: &str, key: Option<&str>) -> Vec<ValueOption> {
        let Some(entry) = self.context.get(field_type) else {
            tracing::trace!(field_type, "no value statistics for field type");
            return Vec::new();
        };
        match entry {
            FieldValues::Flat(counts) => counts
                .iter()
                .filter(|&(_, &count)| count > 0)
                .map(|(value, &count)| ValueOption::plain(value, count))
                .collect(),
            FieldValues::Keyed { key: by_key } => key
                .and_then(|k| by_key.get(k))
                .map(|counts| {
                    counts
                        .iter()
                        .map(|(value, &count)| ValueOption::plain(value, count))
                        .collect()
                })
                .unwrap_or_default(),
            FieldValues::Listed { value } => value
                .iter()
                .map(|(id, listed)| ValueOption {
                    value: id.clone(),
                    label: listed.title().unwrap_or(id).to_owned(),
                    occurrences: listed.count(),
                })
                .collect(),
            FieldValues::Opaque(_) => Vec::new(),
        }
    }

    /// Value options for a leaf's current type and key.
    #[must_use]
    pub fn values_for_leaf(&self, leaf: &FilterLeaf) -> Vec<ValueOption> {
        leaf.field_type()
            .map(|field_type| self.values(field_type, leaf.key.as_deref()))
            .unwrap_or_default()
    }
}
