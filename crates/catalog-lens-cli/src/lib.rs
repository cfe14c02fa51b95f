//! `lens` command-line front end
//!
//! Loads catalog, metadata, value-statistics, and filter documents from disk
//! (JSON, or JSON5 as a fallback) and prints JSON reports to stdout. Logs go
//! to stderr.

#![forbid(unsafe_code)]

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use indexmap::IndexMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use catalog_lens_core::{CatalogItem, GroupBy, ItemKind, LensConfig, LensError, ServerMetadata};
use catalog_lens_filter::{
    FieldCatalog, FieldTypeOption, FilterExpression, FilterGroup, TypeOption, ValueContext,
    ValueOption,
};
use catalog_lens_search::{
    CatalogEvent, CatalogSession, ListState, breadcrumb_parts, item_href, quick_filter_tags,
};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path} (json: {json_error}; json5: {json5_error})")]
    Parse {
        path: PathBuf,
        json_error: String,
        json5_error: String,
    },
    #[error("unexpected document shape in {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Lens(#[from] LensError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("exit code {0}")]
    ExitCode(i32),
}

pub type CliResult<T> = Result<T, CliError>;

#[derive(Parser, Debug)]
#[command(name = "lens", version, about = "Search, group, and filter a mod catalog")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log filter directive (overrides LENS_LOG / RUST_LOG)
    #[arg(long, global = true)]
    pub log: Option<String>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search the catalog and print grouped sections
    Search {
        /// Catalog items (JSON array or `{ "items": [...] }`)
        #[arg(long)]
        catalog: PathBuf,
        /// Server metadata (`mod` + `installed_mods`)
        #[arg(long)]
        metadata: Option<PathBuf>,
        #[arg(long, default_value = "")]
        query: String,
        /// `mod` or `tag:<key>` (overrides LENS_GROUP_BY)
        #[arg(long)]
        group_by: Option<String>,
        /// Tag values to fold into the query, in order
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Comma-separated search path prefix for item links
        #[arg(long, value_delimiter = ',')]
        search_path_prefix: Option<Vec<String>>,
    },
    /// Print tag keys in first-seen order
    Tags {
        #[arg(long)]
        catalog: PathBuf,
        #[arg(long)]
        metadata: Option<PathBuf>,
    },
    /// Print filterable field types from a value-statistics context
    Fields {
        #[arg(long)]
        context: PathBuf,
        /// Filter being edited; with `--index`, limits the picker to what
        /// that leaf may select
        #[arg(long, requires = "index")]
        filter: Option<PathBuf>,
        #[arg(long)]
        index: Option<usize>,
    },
    /// Print selectable values (or keys) for one field type
    Values {
        #[arg(long)]
        context: PathBuf,
        #[arg(long = "type")]
        field_type: String,
        #[arg(long)]
        key: Option<String>,
    },
    /// Validate a filter document rooted at an `and` group; exits 1 when invalid
    Validate {
        #[arg(long)]
        filter: PathBuf,
    },
}

/// Parse arguments, run, and return the process exit code.
#[must_use]
pub fn run() -> i32 {
    let cli = Cli::parse();
    let config = LensConfig::from_env();
    init_tracing(cli.log.as_deref().unwrap_or(&config.log_filter));

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match execute(cli, &config, &mut out) {
        Ok(()) => 0,
        Err(CliError::ExitCode(code)) => code,
        Err(err) => {
            tracing::debug!(error = %err, "command failed");
            eprintln!("error: {err}");
            2
        }
    }
}

fn init_tracing(directive: &str) {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Run one parsed command, writing its report to `out`.
pub fn execute(cli: Cli, config: &LensConfig, out: &mut dyn Write) -> CliResult<()> {
    let pretty = cli.pretty;
    match cli.command {
        Commands::Search {
            catalog,
            metadata,
            query,
            group_by,
            tags,
            search_path_prefix,
        } => {
            let mut config = config.clone();
            if let Some(raw) = group_by {
                config.group_by = raw.parse::<GroupBy>()?;
            }
            if let Some(prefix) = search_path_prefix {
                config.search_path_prefix = prefix;
            }
            let report = search(&catalog, metadata.as_deref(), &query, &tags, &config)?;
            write_json(out, &report, pretty)
        }
        Commands::Tags { catalog, metadata } => {
            let session = load_session(&catalog, metadata.as_deref(), GroupBy::default())?;
            write_json(out, session.index().tag_keys(), pretty)
        }
        Commands::Fields {
            context,
            filter,
            index,
        } => {
            let catalog = FieldCatalog::from_context(load_document::<ValueContext>(&context)?);
            let options = match (filter, index) {
                (Some(path), Some(index)) => {
                    let group = load_document::<FilterGroup>(&path)?;
                    if index >= group.len() {
                        return Err(CliError::InvalidArgument(format!(
                            "--index {index} is out of range for a filter with {} expressions",
                            group.len()
                        )));
                    }
                    catalog.selectable_options(&group, index)
                }
                _ => catalog.type_options(),
            };
            let report = FieldsReport {
                field_types: catalog.field_types(),
                options,
            };
            write_json(out, &report, pretty)
        }
        Commands::Values {
            context,
            field_type,
            key,
        } => {
            let catalog = FieldCatalog::from_context(load_document::<ValueContext>(&context)?);
            let keyed = catalog.field(&field_type).is_some_and(|f| f.keyed);
            let report = if keyed && key.is_none() {
                ValuesReport {
                    keys: Some(catalog.keys(&field_type)),
                    values: None,
                    field_type,
                    key,
                }
            } else {
                ValuesReport {
                    values: Some(catalog.values(&field_type, key.as_deref())),
                    keys: None,
                    field_type,
                    key,
                }
            };
            write_json(out, &report, pretty)
        }
        Commands::Validate { filter } => {
            let expr = load_document::<FilterExpression>(&filter)?;
            let checked = FilterGroup::try_from(expr).and_then(|group| group.check());
            let report = match checked {
                Ok(()) => ValidateReport {
                    valid: true,
                    reason: None,
                    error_type: None,
                },
                Err(issue) => ValidateReport {
                    valid: false,
                    reason: Some(issue.to_string()),
                    error_type: Some(issue.error_type()),
                },
            };
            write_json(out, &report, pretty)?;
            if report.valid {
                Ok(())
            } else {
                Err(CliError::ExitCode(1))
            }
        }
    }
}

// ── Reports ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SearchReport {
    pub query: String,
    pub group_by: String,
    pub state: ListState,
    pub total: usize,
    pub sections: Vec<SectionReport>,
}

#[derive(Debug, Serialize)]
pub struct SectionReport {
    pub title: String,
    pub items: Vec<ItemReport>,
}

#[derive(Debug, Serialize)]
pub struct ItemReport {
    pub id: String,
    pub label: String,
    pub kind: ItemKind,
    pub href: String,
    pub breadcrumb: Vec<String>,
    pub quick_filters: IndexMap<String, String>,
}

#[derive(Debug, Serialize)]
struct FieldsReport {
    field_types: Vec<FieldTypeOption>,
    options: Vec<TypeOption>,
}

#[derive(Debug, Serialize)]
struct ValuesReport {
    field_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    keys: Option<Vec<ValueOption>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    values: Option<Vec<ValueOption>>,
}

#[derive(Debug, Serialize)]
struct ValidateReport {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_type: Option<&'static str>,
}

/// Run a search through a catalog session and flatten the view.
pub fn search(
    catalog: &Path,
    metadata: Option<&Path>,
    query: &str,
    tags: &[String],
    config: &LensConfig,
) -> CliResult<SearchReport> {
    let mut session = load_session(catalog, metadata, config.group_by.clone())?;
    session.set_query(query);
    for tag in tags {
        session.activate_tag(tag);
    }

    let index = session.index();
    let view = session.view();
    let sections = view
        .sections
        .iter()
        .map(|section| SectionReport {
            title: section.title.clone(),
            items: section
                .items
                .iter()
                .map(|entry| ItemReport {
                    id: entry.id().to_owned(),
                    label: entry.label().to_owned(),
                    kind: entry.item.kind,
                    href: item_href(&entry.item, &config.search_path_prefix),
                    breadcrumb: breadcrumb_parts(entry, index)
                        .into_iter()
                        .map(|part| part.label().to_owned())
                        .collect(),
                    quick_filters: quick_filter_tags(&entry.item, config)
                        .into_iter()
                        .map(|(k, v)| (k.to_owned(), v.to_owned()))
                        .collect(),
                })
                .collect(),
        })
        .collect();

    Ok(SearchReport {
        query: session.query().to_owned(),
        group_by: view.group_by.to_string(),
        state: view.state,
        total: view.results.len(),
        sections,
    })
}

fn load_session(
    catalog: &Path,
    metadata: Option<&Path>,
    group_by: GroupBy,
) -> CliResult<CatalogSession<Vec<CatalogEvent>>> {
    let items = load_catalog(catalog)?;
    let metadata = match metadata {
        Some(path) => load_document::<ServerMetadata>(path)?,
        None => ServerMetadata::default(),
    };
    let mut session = CatalogSession::new(group_by, Vec::new());
    session.set_catalog(items);
    session.set_metadata(metadata);
    Ok(session)
}

/// Accepts either a bare array of items or an object with an `items` array.
fn load_catalog(path: &Path) -> CliResult<Vec<CatalogItem>> {
    let mut doc = load_value(path)?;
    if let Some(items) = doc.get_mut("items").map(Value::take) {
        doc = items;
    }
    serde_json::from_value(doc).map_err(|source| CliError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

fn load_document<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    serde_json::from_value(load_value(path)?).map_err(|source| CliError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

fn load_value(path: &Path) -> CliResult<Value> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_json_or_json5(&text).map_err(|(json_error, json5_error)| CliError::Parse {
        path: path.to_path_buf(),
        json_error,
        json5_error,
    })
}

fn parse_json_or_json5(text: &str) -> Result<Value, (String, String)> {
    match serde_json::from_str::<Value>(text) {
        Ok(doc) => Ok(doc),
        Err(json_error) => json5::from_str::<Value>(text)
            .map_err(|json5_error| (json_error.to_string(), json5_error.to_string())),
    }
}

fn write_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T, pretty: bool) -> CliResult<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, value).map_err(io::Error::from)?;
    } else {
        serde_json::to_writer(&mut *out, value).map_err(io::Error::from)?;
    }
    writeln!(out)?;
    Ok(())
}
