//! Filter editor state
//!
//! [`FilterEditor`] stages edits on a working copy of the committed filter.
//! Nothing escapes until [`FilterEditor::apply`] (or [`FilterEditor::clear`])
//! hands a tree to a [`FilterSink`]. The collaborator that owns the committed
//! filter reflects its accepted value back through
//! [`FilterEditor::sync_committed`], which is what clears dirtiness.

use serde::Serialize;

use crate::expression::{FilterExpression, FilterGroup, FilterLeaf};
use crate::field_catalog::FieldToken;

/// Receiver of committed filters.
pub trait FilterSink {
    fn commit(&mut self, filter: &FilterGroup);
}

impl<F> FilterSink for F
where
    F: FnMut(&FilterGroup),
{
    fn commit(&mut self, filter: &FilterGroup) {
        self(filter);
    }
}

impl FilterSink for Vec<FilterGroup> {
    fn commit(&mut self, filter: &FilterGroup) {
        self.push(filter.clone());
    }
}

/// Validity flag plus the first issue found, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Validity {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FilterEditor {
    committed: FilterGroup,
    working: FilterGroup,
}

impl FilterEditor {
    #[must_use]
    pub fn new(committed: FilterGroup) -> Self {
        let working = committed.clone();
        Self { committed, working }
    }

    #[must_use]
    pub const fn committed(&self) -> &FilterGroup {
        &self.committed
    }

    #[must_use]
    pub const fn working(&self) -> &FilterGroup {
        &self.working
    }

    /// Append an unset leaf.
    pub fn add(&mut self) {
        self.working.expressions.push(FilterExpression::empty_leaf());
    }

    /// Remove the child at `index`; out of range is a no-op.
    ///
    /// Removing the last child is allowed here. Callers gate the affordance
    /// with [`FilterEditor::can_remove`].
    pub fn remove(&mut self, index: usize) {
        if index < self.working.len() {
            self.working.expressions.remove(index);
        } else {
            tracing::trace!(index, len = self.working.len(), "remove out of range");
        }
    }

    /// Replace the child at `index`.
    pub fn update(&mut self, index: usize, leaf: FilterLeaf) {
        if let Some(slot) = self.working.expressions.get_mut(index) {
            *slot = FilterExpression::Equal(leaf);
        } else {
            tracing::trace!(index, len = self.working.len(), "update out of range");
        }
    }

    /// Replace the children wholesale (drag reorder). The sequence is not
    /// checked against the current children.
    pub fn reorder(&mut self, expressions: Vec<FilterExpression>) {
        self.working.expressions = expressions;
    }

    /// Pick a field type from the picker.
    ///
    /// The value is reset and the stale value title dropped; a composite
    /// `"<type>|<key>"` token also sets the key, a plain one clears it.
    pub fn select_field_type(&mut self, index: usize, token: &str) {
        let token = FieldToken::parse(token);
        self.edit_leaf(index, |leaf| {
            leaf.field_type = Some(token.field_type);
            leaf.key = token.key;
            leaf.value = Some(String::new());
            leaf.title = None;
        });
    }

    pub fn select_key(&mut self, index: usize, key: impl Into<String>) {
        let key = key.into();
        self.edit_leaf(index, |leaf| leaf.key = Some(key));
    }

    pub fn select_value(&mut self, index: usize, value: impl Into<String>, title: Option<String>) {
        let value = value.into();
        self.edit_leaf(index, |leaf| {
            leaf.value = Some(value);
            leaf.title = title;
        });
    }

    /// Deep, order-sensitive comparison of the working and committed trees.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.working != self.committed
    }

    #[must_use]
    pub fn validity(&self) -> Validity {
        match self.working.check() {
            Ok(()) => Validity {
                valid: true,
                reason: None,
            },
            Err(issue) => Validity {
                valid: false,
                reason: Some(issue.to_string()),
            },
        }
    }

    #[must_use]
    pub fn can_remove(&self) -> bool {
        self.working.len() > 1
    }

    #[must_use]
    pub fn can_apply(&self) -> bool {
        self.is_dirty() && self.working.is_valid()
    }

    /// Hand the working tree to `sink` if it is valid.
    ///
    /// Returns whether anything was committed. The committed tree is left
    /// as is until the collaborator reflects it back.
    pub fn apply<S: FilterSink + ?Sized>(&self, sink: &mut S) -> bool {
        if let Err(issue) = self.working.check() {
            tracing::debug!(%issue, "filter apply blocked");
            return false;
        }
        tracing::debug!(expressions = self.working.len(), "filter applied");
        sink.commit(&self.working);
        true
    }

    /// Reset to a single unset leaf and commit it immediately.
    pub fn clear<S: FilterSink + ?Sized>(&mut self, sink: &mut S) {
        self.working = FilterGroup::cleared();
        tracing::debug!("filter cleared");
        sink.commit(&self.working);
    }

    /// Reflect a newly committed tree from the collaborator.
    ///
    /// The working copy is replaced only when `committed` differs from the
    /// last committed tree; re-sending the same tree keeps staged edits.
    pub fn sync_committed(&mut self, committed: FilterGroup) {
        if committed == self.committed {
            return;
        }
        self.working = committed.clone();
        self.committed = committed;
    }

    fn edit_leaf(&mut self, index: usize, edit: impl FnOnce(&mut FilterLeaf)) {
        match self
            .working
            .expressions
            .get_mut(index)
            .and_then(FilterExpression::as_leaf_mut)
        {
            Some(leaf) => edit(leaf),
            None => {
                tracing::trace!(index, "no leaf to edit");
            }
        }
    }
}
