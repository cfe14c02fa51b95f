//! Check filter expressions
//!
//! A filter is a shallow boolean tree: an `and` group whose children are
//! `equal` leaves. The wire shape is tagged on `operator`:
//!
//! ```json
//! { "operator": "and", "expressions": [
//!     { "operator": "equal", "type": "status", "value": "alarm" },
//!     { "operator": "equal", "type": "control_tag", "key": "service", "value": "AWS/S3" }
//! ] }
//! ```
//!
//! Groups may nest even though the editor never produces nested groups; the
//! validator recurses regardless.

use serde::{Deserialize, Serialize};

use crate::error::{FilterIssue, Result};

/// One equality test.
///
/// `key` only matters for keyed field types (tag or dimension namespaces).
/// `title` is the display label of the chosen value, when it has one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterLeaf {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl FilterLeaf {
    #[must_use]
    pub fn new(field_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field_type: Some(field_type.into()),
            value: Some(value.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// The field type, if set and not blank.
    #[must_use]
    pub fn field_type(&self) -> Option<&str> {
        non_blank(self.field_type.as_deref())
    }

    /// Leaf validity: a non-blank value and a non-blank type.
    ///
    /// A key never changes the outcome.
    pub fn check(&self) -> Result<()> {
        if non_blank(self.value.as_deref()).is_none() {
            return Err(FilterIssue::MissingValue);
        }
        if self.field_type().is_none() {
            return Err(FilterIssue::MissingType);
        }
        Ok(())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

// =============================================================================
// FilterExpression
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "operator", rename_all = "snake_case")]
pub enum FilterExpression {
    And {
        #[serde(default)]
        expressions: Vec<FilterExpression>,
    },
    Equal(FilterLeaf),
    /// Any operator this crate does not understand. Always invalid.
    #[serde(other)]
    Unsupported,
}

impl FilterExpression {
    /// A leaf with every field unset, as appended by "add filter".
    #[must_use]
    pub fn empty_leaf() -> Self {
        Self::Equal(FilterLeaf::default())
    }

    #[must_use]
    pub const fn as_leaf(&self) -> Option<&FilterLeaf> {
        match self {
            Self::Equal(leaf) => Some(leaf),
            _ => None,
        }
    }

    pub fn as_leaf_mut(&mut self) -> Option<&mut FilterLeaf> {
        match self {
            Self::Equal(leaf) => Some(leaf),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        validate_filter(self)
    }
}

impl From<FilterLeaf> for FilterExpression {
    fn from(leaf: FilterLeaf) -> Self {
        Self::Equal(leaf)
    }
}

/// Check a filter tree, reporting the first issue found (depth-first).
pub fn check_filter(expr: &FilterExpression) -> Result<()> {
    match expr {
        FilterExpression::And { expressions } => check_children(expressions),
        FilterExpression::Equal(leaf) => leaf.check(),
        FilterExpression::Unsupported => Err(FilterIssue::UnsupportedOperator),
    }
}

/// `true` when [`check_filter`] finds no issue. Never panics.
#[must_use]
pub fn validate_filter(expr: &FilterExpression) -> bool {
    check_filter(expr).is_ok()
}

fn check_children(expressions: &[FilterExpression]) -> Result<()> {
    if expressions.is_empty() {
        return Err(FilterIssue::EmptyGroup);
    }
    expressions.iter().try_for_each(check_filter)
}

// =============================================================================
// FilterGroup
// =============================================================================

/// The root of a filter: an `and` group.
///
/// Serializes exactly like [`FilterExpression::And`]; decoding any other
/// root operator fails with [`FilterIssue::NotAGroup`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "FilterExpression", into = "FilterExpression")]
pub struct FilterGroup {
    pub expressions: Vec<FilterExpression>,
}

impl FilterGroup {
    #[must_use]
    pub const fn new(expressions: Vec<FilterExpression>) -> Self {
        Self { expressions }
    }

    /// One unset leaf: the tree produced by "clear".
    #[must_use]
    pub fn cleared() -> Self {
        Self::new(vec![FilterExpression::empty_leaf()])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.expressions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }

    #[must_use]
    pub fn leaf(&self, index: usize) -> Option<&FilterLeaf> {
        self.expressions.get(index).and_then(FilterExpression::as_leaf)
    }

    /// Non-blank field types of the direct leaf children, in order.
    #[must_use]
    pub fn used_field_types(&self) -> Vec<&str> {
        self.expressions
            .iter()
            .filter_map(FilterExpression::as_leaf)
            .filter_map(FilterLeaf::field_type)
            .collect()
    }

    pub fn check(&self) -> Result<()> {
        check_children(&self.expressions)
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.check().is_ok()
    }
}

impl TryFrom<FilterExpression> for FilterGroup {
    type Error = FilterIssue;

    fn try_from(expr: FilterExpression) -> Result<Self> {
        match expr {
            FilterExpression::And { expressions } => Ok(Self { expressions }),
            _ => Err(FilterIssue::NotAGroup),
        }
    }
}

impl From<FilterGroup> for FilterExpression {
    fn from(group: FilterGroup) -> Self {
        Self::And {
            expressions: group.expressions,
        }
    }
}
