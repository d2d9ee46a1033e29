//! Integration tests for datagrid CLI

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

const PAGE: &str = r#"<html><body>
<script type="application/json" class="datagrid-config">
{"people": {"config": {"groupby": ["lastname"], "sort": [{"column": "age", "direction": "desc"}]}, "meta": {"owner": "hr"}}}
</script>
<table id="people" class="datagrid">
<thead><tr><th>Last</th><th>First</th><th>Age</th></tr></thead>
<tbody>
<tr class="l-1"><td>Smith</td><td></td><td>28.5</td></tr>
<tr class="l-0"><td></td><td>Bob</td><td>32</td></tr>
<tr class="l-0"><td></td><td>Fred</td><td>25</td></tr>
<tr class="l-1"><td>Doe</td><td></td><td>53</td></tr>
<tr class="l-0"><td></td><td>John</td><td>53</td></tr>
</tbody>
</table>
<table id="empty" class="datagrid"><tbody></tbody></table>
</body></html>"#;

fn run_datagrid(args: &[&str]) -> (String, String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_datagrid"))
        .args(args)
        .env_remove("DATAGRID_EXECUTABLE")
        .env_remove("DATAGRID_LOG_FORMAT")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();

    (stdout, stderr, success)
}

fn write_file(dir: &TempDir, name: &str, contents: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path_str(&path)
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

#[test]
fn test_cli_help() {
    let (stdout, _, success) = run_datagrid(&["--help"]);

    assert!(success);
    assert!(stdout.contains("datagrid"));
    assert!(stdout.contains("render"));
    assert!(stdout.contains("outline"));
}

#[test]
fn test_cli_version() {
    let (stdout, _, success) = run_datagrid(&["--version"]);

    assert!(success);
    assert!(stdout.contains("datagrid"));
}

#[test]
fn test_render_help_lists_flags() {
    let (stdout, _, success) = run_datagrid(&["render", "--help"]);

    assert!(success);
    assert!(stdout.contains("--aggregate"));
    assert!(stdout.contains("--sort"));
    assert!(stdout.contains("--suppressdetail"));
    assert!(stdout.contains("--dry-run"));
}

#[test]
fn test_render_dry_run() {
    let (stdout, _, success) = run_datagrid(&[
        "render",
        "people.csv",
        "--executable",
        "rendergrid",
        "--aggregate",
        "lastname",
        "--aggregate",
        "firstname",
        "--suppressdetail",
        "--flag",
        "title=It's here",
        "--dry-run",
    ]);

    assert!(success);
    assert_eq!(
        stdout.trim_end(),
        "rendergrid --renderer='datagrid.html' --aggregate='lastname' --aggregate='firstname' \
         --suppressdetail --title='It\\'s here' people.csv 2>&1"
    );
}

#[test]
fn test_render_captures_output() {
    let dir = TempDir::new().unwrap();
    let data = write_file(&dir, "people.csv", "lastname,age\nSmith,32\n");

    let (stdout, _, success) = run_datagrid(&[
        "render",
        &data,
        "--executable",
        "echo",
        "--renderer",
        "datagrid.ascii",
        "--autocolumn",
    ]);

    assert!(success);
    assert!(stdout.contains("--renderer=datagrid.ascii"));
    assert!(stdout.contains("--autocolumn"));
    assert!(stdout.contains("people.csv"));
}

#[test]
fn test_render_failure_reports_error() {
    let (stdout, stderr, success) =
        run_datagrid(&["render", "people.csv", "--executable", "false"]);

    assert!(!success);
    assert!(stdout.is_empty());
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("exit status 1"));
}

#[test]
fn test_outline_text() {
    let dir = TempDir::new().unwrap();
    let page = write_file(&dir, "page.html", PAGE);

    let (stdout, _, success) = run_datagrid(&["outline", &page, "--table", "people"]);

    assert!(success);
    assert!(stdout.contains("people"));
    assert!(stdout.contains("▾ Smith"));
    assert!(stdout.contains("Bob"));
    assert!(stdout.contains("5 rows (0 hidden)"));
    assert!(!stdout.contains("empty"));
}

#[test]
fn test_outline_collapse() {
    let dir = TempDir::new().unwrap();
    let page = write_file(&dir, "page.html", PAGE);

    let (stdout, _, success) =
        run_datagrid(&["outline", &page, "--table", "people", "--collapse", "0"]);

    assert!(success);
    assert!(stdout.contains("▸ Smith"));
    assert!(!stdout.contains("Bob"));
    assert!(stdout.contains("John"));
    assert!(stdout.contains("5 rows (2 hidden)"));
}

#[test]
fn test_outline_collapse_is_not_a_toggle() {
    let dir = TempDir::new().unwrap();
    let page = write_file(&dir, "page.html", PAGE);

    let (stdout, _, success) = run_datagrid(&[
        "outline",
        &page,
        "--table",
        "people",
        "--collapse-all",
        "--collapse",
        "0",
        "--collapse",
        "0",
    ]);

    assert!(success);
    assert!(stdout.contains("▸ Smith"));
    assert!(stdout.contains("▸ Doe"));
    assert!(!stdout.contains("Bob"));
    assert!(stdout.contains("5 rows (3 hidden)"));
}

#[test]
fn test_outline_json_collapse_all() {
    let dir = TempDir::new().unwrap();
    let page = write_file(&dir, "page.html", PAGE);

    let (stdout, _, success) = run_datagrid(&[
        "outline",
        &page,
        "--collapse-all",
        "--output",
        "json",
    ]);

    assert!(success);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON");
    let outlines = json.as_array().unwrap();
    assert_eq!(outlines.len(), 2);
    assert_eq!(outlines[0]["title"], "people");
    assert_eq!(outlines[1]["title"], "empty");
    assert_eq!(outlines[1]["footer"], "0 rows (0 hidden)");

    let rows = outlines[0]["rows"].as_array().unwrap();
    let indices: Vec<u64> = rows.iter().map(|r| r["index"].as_u64().unwrap()).collect();
    assert_eq!(indices, vec![0, 3]);
    assert_eq!(rows[0]["expanded"], false);
    assert_eq!(outlines[0]["footer"], "5 rows (3 hidden)");
}

#[test]
fn test_outline_unknown_table() {
    let dir = TempDir::new().unwrap();
    let page = write_file(&dir, "page.html", PAGE);

    let (_, stderr, success) = run_datagrid(&["outline", &page, "--table", "missing"]);

    assert!(!success);
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("missing"));
}

#[test]
fn test_outline_missing_file() {
    let (_, stderr, success) = run_datagrid(&["outline", "/nonexistent/page.html"]);

    assert!(!success);
    assert!(stderr.contains("Error:"));
}

#[test]
fn test_invalid_log_format() {
    let output = Command::new(env!("CARGO_BIN_EXE_datagrid"))
        .args(["--version"])
        .env("DATAGRID_LOG_FORMAT", "xml")
        .output()
        .expect("Failed to execute command");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("unsupported log format"));
}
