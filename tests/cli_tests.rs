//! Integration tests for the typist binary
//!
//! These run the compiled CLI against the bundled demo scripts:
//! - check: validation and effective step listing
//! - commands: built-in command listing
//! - error reporting for bad scripts

use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn typist(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_typist"))
        .args(args)
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run typist")
}

fn demo(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("demos").join(name)
}

fn check_report(name: &str) -> Value {
    let path = demo(name);
    let output = typist(&["check", path.to_str().unwrap()]);
    assert!(
        output.status.success(),
        "check failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("check output is JSON")
}

// ============================================================================
// check
// ============================================================================

#[test]
fn test_check_toml_demo() {
    let report = check_report("intro.toml");

    assert_eq!(report["longestText"], "Hello World");
    assert_eq!(report["options"]["target"], "#typist");
    assert_eq!(report["options"]["fixedWidth"], true);
    assert_eq!(report["options"]["stepDelay"], 90);

    let steps = report["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 7);
    assert_eq!(steps[0], "addAnimatedCursor");
    assert_eq!(steps[3]["to"], "Hello World");
}

#[test]
fn test_check_json_demo() {
    let report = check_report("loop.json");

    assert_eq!(report["longestText"], "cargo build");
    assert_eq!(report["options"]["loop"], true);
    assert_eq!(report["options"]["loopDelay"], 1500);
}

#[test]
fn test_check_reports_mirrored_steps() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("revert.json");
    std::fs::write(
        &path,
        r#"{"options": {"revert": true}, "steps": [{"text": "a"}, {"wait": 10}, {"text": "b"}]}"#,
    )
    .unwrap();

    let output = typist(&["check", path.to_str().unwrap()]);
    assert!(output.status.success());
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();

    let texts: Vec<&str> = report["steps"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|s| s["text"].as_str())
        .collect();
    assert_eq!(texts, vec!["a", "b", "b", "a"]);
}

#[test]
fn test_check_rejects_bad_argument() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, r#"{"steps": [{"wait": "soon"}]}"#).unwrap();

    let output = typist(&["check", path.to_str().unwrap()]);
    assert!(!output.status.success());
}

#[test]
fn test_check_rejects_unknown_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("intro.yaml");
    std::fs::write(&path, "steps: []").unwrap();

    let output = typist(&["check", path.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unsupported script format"));
}

// ============================================================================
// commands
// ============================================================================

#[test]
fn test_commands_lists_builtins() {
    let output = typist(&["commands"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let names: Vec<&str> = stdout
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .collect();
    for name in [
        "addAnimatedCursor",
        "addCursor",
        "from",
        "removeAnimatedCursor",
        "removeCursor",
        "text",
        "to",
        "wait",
    ] {
        assert!(names.contains(&name), "missing {name}");
    }
}
