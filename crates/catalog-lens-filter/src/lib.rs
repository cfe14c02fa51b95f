//! Check filter model for catalog-lens
//!
//! This crate provides:
//! - The filter expression tree and its validator (`FilterExpression`, `validate_filter`)
//! - A field catalog built from server value statistics (`FieldCatalog`)
//! - Editor state with staged edits and explicit commit (`FilterEditor`)

#![forbid(unsafe_code)]

pub mod editor;
pub mod error;
pub mod expression;
pub mod field_catalog;

pub use editor::{FilterEditor, FilterSink, Validity};
pub use error::{FilterIssue, Result as FilterResult};
pub use expression::{FilterExpression, FilterGroup, FilterLeaf, check_filter, validate_filter};
pub use field_catalog::{
    FieldCatalog, FieldToken, FieldTypeOption, FieldValues, ListedValue, SelectOption,
    TOKEN_SEPARATOR, TypeOption, ValueContext, ValueCounts, ValueOption, ValueStrategy,
    field_label,
};
