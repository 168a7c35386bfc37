//! Integration tests for the auditlens binary
//!
//! These tests run the CLI as a subprocess against local HTML files, so no
//! network access is needed.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Acme Plumbing Brisbane | 24/7 Emergency Plumbers</title>
  <meta name="description" content="Licensed emergency plumbers in Brisbane. Blocked drains, burst pipes and hot water repairs, available around the clock.">
  <link rel="canonical" href="https://acme.example/">
</head>
<body>
  <nav><a href="/">Home</a><a href="/services">Services</a><a href="/contact">Contact</a></nav>
  <h1>Emergency Plumber in Brisbane</h1>
  <p>Acme Plumbing fixes blocked drains and burst pipes across Brisbane.</p>
  <footer><a href="/privacy">Privacy</a></footer>
</body>
</html>"#;

fn auditlens(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_auditlens"))
        .args(args)
        .current_dir(dir)
        .env_remove("OPENROUTER_API_KEY")
        .env_remove("DEEPSEEK_API_KEY")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run CLI")
}

fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("page.html"), PAGE).unwrap();
    dir
}

#[test]
fn test_cli_help() {
    let dir = workspace();
    let output = auditlens(dir.path(), &["--help"]);
    let stdout = String::from_utf8(output.stdout).unwrap();

    assert!(output.status.success());
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("--no-local-seo"));
    assert!(stdout.contains("Developed by Pon Datalab"));
}

#[test]
fn test_cli_version() {
    let dir = workspace();
    let output = auditlens(dir.path(), &["--version"]);
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(&format!("auditlens {}", env!("CARGO_PKG_VERSION"))));
}

#[test]
fn test_cli_text_report_for_local_file() {
    let dir = workspace();
    let output = auditlens(
        dir.path(),
        &["page.html", "--html", "--url", "https://acme.example/", "--no-ai"],
    );
    let stdout = String::from_utf8(output.stdout).unwrap();

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("📊 Audit Overview"));
    assert!(stdout.contains("https://acme.example/"));
    assert!(stdout.contains("✅ Actionable Tasks"));
}

#[test]
fn test_cli_json_report_and_save() {
    let dir = workspace();
    let output = auditlens(
        dir.path(),
        &[
            "page.html",
            "--html",
            "--url",
            "https://acme.example/",
            "--no-ai",
            "--no-local-seo",
            "--max-tasks",
            "3",
            "-f",
            "json",
            "-s",
            "reports",
        ],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["url"], "https://acme.example/");
    assert_eq!(json["stage"], "Done");
    assert_eq!(json["taskSource"], "Fallback");
    assert!(json["overallScore"].as_u64().unwrap() <= 86);
    assert!(json["actionableTasks"].as_array().unwrap().len() <= 3);
    assert_eq!(json["analysis"]["localSEO"]["skipped"], true);

    let saved = dir.path().join("reports").join("acme_example__index__audit.json");
    assert!(saved.exists());
}

#[test]
fn test_cli_reports_stages_and_data_sources() {
    let dir = workspace();
    fs::write(
        dir.path().join("business.json"),
        r#"{"name": "Acme Plumbing", "verified": true, "completeness": 90}"#,
    )
    .unwrap();

    let output = auditlens(
        dir.path(),
        &[
            "page.html",
            "--html",
            "--url",
            "https://acme.example/",
            "--no-ai",
            "--business",
            "business.json",
            "-f",
            "json",
        ],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let stages: Vec<&str> = json["stageHistory"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s.as_str().unwrap())
        .collect();
    assert_eq!(
        stages,
        ["Pending", "Crawling", "Analyzing", "Prioritizing", "Estimating", "Done"]
    );
    assert_eq!(json["dataSources"]["page"], true);
    assert_eq!(json["dataSources"]["business"], true);
    assert_eq!(json["dataSources"]["performance"], false);
}

#[test]
fn test_cli_reads_config_file() {
    let dir = workspace();
    fs::write(
        dir.path().join("auditlens.toml"),
        "max_tasks = 2\n\n[ai]\nenabled = false\n",
    )
    .unwrap();

    let output = auditlens(
        dir.path(),
        &["page.html", "--html", "--url", "https://acme.example/", "-f", "json"],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(json["actionableTasks"].as_array().unwrap().len() <= 2);
}

#[test]
fn test_cli_missing_file_fails() {
    let dir = workspace();
    let output = auditlens(
        dir.path(),
        &["missing.html", "--html", "--url", "https://acme.example/", "--no-ai"],
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read HTML file missing.html"));
}

#[test]
fn test_cli_rejects_bad_arguments() {
    let dir = workspace();
    assert!(!auditlens(dir.path(), &["page.html", "--html"]).status.success());
    assert!(!auditlens(dir.path(), &["https://acme.example/", "--max-tasks", "0"]).status.success());
    assert!(!auditlens(dir.path(), &["ftp://acme.example/", "--no-ai"]).status.success());
}
