//! Configuration
//!
//! [`LensConfig`] is loaded from the process environment. Every value has a
//! default, so an empty environment yields a usable configuration; malformed
//! values fall back to the default and are logged at `warn`.

use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LensError;

/// Grouping mode environment variable (`mod` or `tag:<key>`).
pub const GROUP_BY_ENV: &str = "LENS_GROUP_BY";
/// Comma-separated tag keys offered as quick-filter chips.
pub const QUICK_FILTER_TAGS_ENV: &str = "LENS_QUICK_FILTER_TAGS";
/// Comma-separated search path prefix appended to item links.
pub const SEARCH_PATH_PREFIX_ENV: &str = "LENS_SEARCH_PATH_PREFIX";
/// Log filter directive (falls back to `RUST_LOG`).
pub const LOG_ENV: &str = "LENS_LOG";

/// Tag keys shown as quick-filter chips unless overridden.
pub const DEFAULT_QUICK_FILTER_TAGS: [&str; 3] = ["category", "service", "type"];
pub const DEFAULT_LOG_FILTER: &str = "info";

// =============================================================================
// GroupBy
// =============================================================================

/// How catalog items are partitioned into sections.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "by", content = "tag", rename_all = "snake_case")]
pub enum GroupBy {
    /// Partition by the owning mod's title.
    #[default]
    #[serde(rename = "mod")]
    OwningGroup,
    /// Partition by the value of one tag key.
    Tag(String),
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OwningGroup => write!(f, "mod"),
            Self::Tag(key) => write!(f, "tag:{key}"),
        }
    }
}

impl FromStr for GroupBy {
    type Err = LensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("mod") {
            return Ok(Self::OwningGroup);
        }
        match trimmed.split_once(':') {
            Some((by, key)) if by.eq_ignore_ascii_case("tag") && !key.trim().is_empty() => {
                Ok(Self::Tag(key.trim().to_owned()))
            }
            _ => Err(LensError::InvalidGroupBy(s.to_owned())),
        }
    }
}

// =============================================================================
// LensConfig
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LensConfig {
    pub group_by: GroupBy,
    pub quick_filter_tag_keys: Vec<String>,
    pub search_path_prefix: Vec<String>,
    pub log_filter: String,
}

impl Default for LensConfig {
    fn default() -> Self {
        Self {
            group_by: GroupBy::default(),
            quick_filter_tag_keys: DEFAULT_QUICK_FILTER_TAGS
                .iter()
                .map(|k| (*k).to_owned())
                .collect(),
            search_path_prefix: Vec::new(),
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
        }
    }
}

impl LensConfig {
    /// Load configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(GROUP_BY_ENV) {
            match raw.parse::<GroupBy>() {
                Ok(group_by) => config.group_by = group_by,
                Err(err) => tracing::warn!(%err, var = GROUP_BY_ENV, "ignoring malformed value"),
            }
        }
        if let Some(raw) = lookup(QUICK_FILTER_TAGS_ENV) {
            config.quick_filter_tag_keys = split_list(&raw);
        }
        if let Some(raw) = lookup(SEARCH_PATH_PREFIX_ENV) {
            config.search_path_prefix = split_list(&raw);
        }
        if let Some(raw) = lookup(LOG_ENV).or_else(|| lookup("RUST_LOG")) {
            if !raw.trim().is_empty() {
                config.log_filter = raw.trim().to_owned();
            }
        }

        config
    }

    /// Whether a tag key is offered as a quick-filter chip.
    #[must_use]
    pub fn is_quick_filter_tag(&self, key: &str) -> bool {
        self.quick_filter_tag_keys.iter().any(|k| k == key)
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}
