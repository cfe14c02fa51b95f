#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};
use std::process::Command;

use catalog_lens_cli::{Cli, CliError, execute};
use catalog_lens_core::LensConfig;
use clap::Parser;
use serde_json::{Value, json};
use tempfile::TempDir;

fn lens_bin() -> PathBuf {
    // Cargo sets this for integration tests.
    PathBuf::from(env!("CARGO_BIN_EXE_lens"))
}

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("write fixture");
    path
}

fn fixtures() -> (TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let catalog = json!([
        {
            "full_name": "aws_compliance.benchmark.cis",
            "type": "benchmark",
            "title": "CIS v1.5.0",
            "tags": {"category": "Compliance", "plugin": "aws"},
            "trunks": [["aws_compliance.benchmark.cis"]],
            "is_top_level": true,
            "mod_full_name": "mod.aws_compliance"
        },
        {
            "full_name": "aws_compliance.benchmark.cis_1",
            "type": "benchmark",
            "title": "1 Identity and Access Management",
            "tags": {"service": "AWS/IAM"},
            "trunks": [["aws_compliance.benchmark.cis", "aws_compliance.benchmark.cis_1"]],
            "is_top_level": false,
            "mod_full_name": "mod.aws_compliance"
        },
        {
            "full_name": "local.dashboard.s3",
            "type": "dashboard",
            "title": "S3 Bucket Report",
            "tags": {"service": "AWS/S3", "type": "Report"},
            "trunks": null,
            "is_top_level": true,
            "mod_full_name": "mod.local"
        }
    ]);
    let metadata = json!({
        "mod": {"full_name": "mod.local", "title": "Local"},
        "installed_mods": {
            "mod.aws_compliance": {"full_name": "mod.aws_compliance", "title": "AWS Compliance"}
        }
    });
    let catalog = write(&dir, "catalog.json", &catalog.to_string());
    let metadata = write(&dir, "metadata.json", &metadata.to_string());
    (dir, catalog, metadata)
}

fn run_in_process(args: &[&str], config: &LensConfig) -> Result<Value, CliError> {
    let cli = Cli::try_parse_from(std::iter::once("lens").chain(args.iter().copied()))
        .expect("arguments parse");
    let mut out = Vec::new();
    execute(cli, config, &mut out)?;
    Ok(serde_json::from_slice(&out).expect("json output"))
}

fn path(p: &Path) -> &str {
    p.to_str().expect("utf-8 temp path")
}

#[test]
fn search_without_query_groups_top_level_by_mod() {
    let (_dir, catalog, metadata) = fixtures();
    let report = run_in_process(
        &["search", "--catalog", path(&catalog), "--metadata", path(&metadata)],
        &LensConfig::default(),
    )
    .unwrap();
    assert_eq!(report["state"], "ready");
    assert_eq!(report["group_by"], "mod");
    assert_eq!(report["total"], 2);
    let titles: Vec<&str> = report["sections"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["AWS Compliance", "Local"]);
}

#[test]
fn search_with_query_reports_breadcrumbs_links_and_chips() {
    let (_dir, catalog, metadata) = fixtures();
    let report = run_in_process(
        &[
            "search",
            "--catalog",
            path(&catalog),
            "--metadata",
            path(&metadata),
            "--query",
            "identity",
            "--search-path-prefix",
            "aws,gcp",
        ],
        &LensConfig::default(),
    )
    .unwrap();
    let item = &report["sections"][0]["items"][0];
    assert_eq!(item["id"], "aws_compliance.benchmark.cis_1");
    assert_eq!(
        item["breadcrumb"],
        json!(["CIS v1.5.0", "1 Identity and Access Management"])
    );
    assert_eq!(
        item["href"],
        "/aws_compliance.benchmark.cis_1?search_path_prefix=aws,gcp"
    );
    assert_eq!(item["quick_filters"], json!({"service": "AWS/IAM"}));
}

#[test]
fn tag_activation_folds_into_query_and_groups_by_tag() {
    let (_dir, catalog, metadata) = fixtures();
    let report = run_in_process(
        &[
            "search",
            "--catalog",
            path(&catalog),
            "--metadata",
            path(&metadata),
            "--group-by",
            "tag:service",
            "--tag",
            "AWS/S3",
            "--tag",
            "AWS/S3",
        ],
        &LensConfig::default(),
    )
    .unwrap();
    assert_eq!(report["query"], "AWS/S3");
    assert_eq!(report["group_by"], "tag:service");
    assert_eq!(report["sections"][0]["title"], "AWS/S3");
    assert_eq!(report["total"], 1);
}

#[test]
fn no_results_state() {
    let (_dir, catalog, metadata) = fixtures();
    let report = run_in_process(
        &[
            "search",
            "--catalog",
            path(&catalog),
            "--metadata",
            path(&metadata),
            "--query",
            "zzz",
        ],
        &LensConfig::default(),
    )
    .unwrap();
    assert_eq!(report["state"], "no_results");
    assert_eq!(report["sections"], json!([]));
}

#[test]
fn malformed_group_by_is_an_error() {
    let (_dir, catalog, _metadata) = fixtures();
    let err = run_in_process(
        &["search", "--catalog", path(&catalog), "--group-by", "owner"],
        &LensConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, CliError::Lens(_)), "{err:?}");
}

#[test]
fn tags_in_first_seen_order() {
    let (_dir, catalog, metadata) = fixtures();
    let report = run_in_process(
        &["tags", "--catalog", path(&catalog), "--metadata", path(&metadata)],
        &LensConfig::default(),
    )
    .unwrap();
    assert_eq!(report, json!(["category", "plugin", "service", "type"]));
}

#[test]
fn catalog_wrapped_in_items_object_and_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let wrapped = write(
        &dir,
        "wrapped.json",
        r#"{"items": [{"full_name": "a", "type": "dashboard", "title": "A", "is_top_level": true}]}"#,
    );
    let report = run_in_process(&["tags", "--catalog", path(&wrapped)], &LensConfig::default())
        .unwrap();
    assert_eq!(report, json!([]));

    let missing = dir.path().join("missing.json");
    let err = run_in_process(&["tags", "--catalog", path(&missing)], &LensConfig::default())
        .unwrap_err();
    assert!(matches!(err, CliError::Read { .. }), "{err:?}");
}

#[test]
fn fields_and_values_from_context() {
    let dir = tempfile::tempdir().unwrap();
    let context = write(
        &dir,
        "context.json",
        &json!({
            "status": {"ok": 2, "alarm": 0},
            "control_tag": {"key": {"service": {"AWS/S3": 3}}}
        })
        .to_string(),
    );
    let filter = write(
        &dir,
        "filter.json5",
        "{ operator: 'and', expressions: [ { operator: 'equal', type: 'status', value: 'ok' }, { operator: 'equal' } ] }",
    );

    let fields = run_in_process(
        &["fields", "--context", path(&context), "--filter", path(&filter), "--index", "1"],
        &LensConfig::default(),
    )
    .unwrap();
    assert_eq!(fields["field_types"].as_array().unwrap().len(), 2);
    let labels: Vec<&str> = fields["options"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["Control Tag"]);

    let values = run_in_process(
        &["values", "--context", path(&context), "--type", "status"],
        &LensConfig::default(),
    )
    .unwrap();
    assert_eq!(values["values"], json!([{"value": "ok", "label": "ok", "occurrences": 2}]));

    let keys = run_in_process(
        &["values", "--context", path(&context), "--type", "control_tag"],
        &LensConfig::default(),
    )
    .unwrap();
    assert_eq!(keys["keys"][0]["value"], "service");
    assert!(keys.get("values").is_none());
}

#[test]
fn validate_accepts_json5_and_reports_issue() {
    let dir = tempfile::tempdir().unwrap();
    let ok = write(
        &dir,
        "ok.json5",
        "{operator: 'and', expressions: [{operator: 'equal', type: 'status', value: 'alarm'}],}",
    );
    let report = run_in_process(&["validate", "--filter", path(&ok)], &LensConfig::default())
        .unwrap();
    assert_eq!(report, json!({"valid": true}));

    let bad = write(&dir, "bad.json", r#"{"operator": "and", "expressions": []}"#);
    let err = run_in_process(&["validate", "--filter", path(&bad)], &LensConfig::default())
        .unwrap_err();
    assert!(matches!(err, CliError::ExitCode(1)));
}

#[test]
fn binary_validate_exit_codes() {
    let dir = tempfile::tempdir().unwrap();
    let bad = write(
        &dir,
        "bad.json",
        r#"{"operator": "and", "expressions": [{"operator": "equal", "type": "status"}]}"#,
    );
    let output = Command::new(lens_bin())
        .args(["validate", "--filter", path(&bad)])
        .env("LENS_LOG", "off")
        .output()
        .expect("spawn lens");
    assert_eq!(output.status.code(), Some(1));
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["valid"], false);
    assert_eq!(report["error_type"], "MISSING_VALUE");

    let unreadable = dir.path().join("nope.json");
    let output = Command::new(lens_bin())
        .args(["validate", "--filter", path(&unreadable)])
        .env("LENS_LOG", "off")
        .output()
        .expect("spawn lens");
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to read"));
}

#[test]
fn validate_rejects_leaf_at_root() {
    let dir = tempfile::tempdir().unwrap();
    let leaf = write(
        &dir,
        "leaf.json",
        r#"{"operator": "equal", "type": "status", "value": "ok"}"#,
    );
    let err = run_in_process(&["validate", "--filter", path(&leaf)], &LensConfig::default())
        .unwrap_err();
    assert!(matches!(err, CliError::ExitCode(1)), "{err:?}");

    let output = Command::new(lens_bin())
        .args(["validate", "--filter", path(&leaf)])
        .env("LENS_LOG", "off")
        .output()
        .expect("spawn lens");
    assert_eq!(output.status.code(), Some(1));
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["valid"], false);
    assert_eq!(report["error_type"], "NOT_A_GROUP");
}
