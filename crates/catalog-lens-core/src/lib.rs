//! Core types, configuration, and errors for catalog-lens
//!
//! This crate provides:
//! - Catalog data models (`CatalogItem`, `OwningGroup`, `ServerMetadata`)
//! - Configuration management (`LensConfig`, environment parsing)
//! - Grouping mode selection (`GroupBy`)
//! - Common error types

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod models;

// Re-export key types for convenience
pub use config::{GroupBy, LensConfig};
pub use error::{LensError, Result as LensResult};
pub use models::{CatalogItem, ItemKind, OwningGroup, ServerMetadata, Tags};
