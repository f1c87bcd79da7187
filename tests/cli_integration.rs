//! CLI integration tests: stdout carries only JSON, logs go to stderr.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

fn toolhost() -> Command {
    let mut cmd = Command::cargo_bin("toolhost").unwrap();
    cmd.env_remove("RUST_LOG")
        .env("TOOLHOST_LOG_LEVEL", "debug")
        .env("TOOLHOST_LOG_FORMAT", "text");
    cmd
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_run_stdout_is_exactly_the_envelope() {
    let assert = toolhost()
        .args([
            "run",
            "RAD/ingestor/timeline",
            "--params",
            r#"{"desk":"FXG","date":"2024-01-15"}"#,
            "--user",
            "u1",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("tool execution started"))
        .stdout(predicate::str::contains("tool execution").not());

    let envelope = stdout_json(assert.get_output());
    assert_eq!(envelope["status"], "success");
    assert_eq!(envelope["payload"]["summary"]["total_records"], 10);
    assert!(envelope["correlation_id"].is_string());
}

#[test]
fn test_run_failure_prints_envelope_and_exits_nonzero() {
    let assert = toolhost()
        .args(["run", "RAD/ingestor/missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("tool not found"));

    let envelope = stdout_json(assert.get_output());
    assert_eq!(envelope["status"], "failure");
    assert_eq!(envelope["kind"], "not_found");
    assert_eq!(
        envelope["user_message"],
        "Tool 'RAD/ingestor/missing' does not exist"
    );
}

#[test]
fn test_json_logs_stay_on_stderr() {
    let assert = toolhost()
        .env("TOOLHOST_LOG_FORMAT", "json")
        .args(["run", "RAD/ingestor/force_load", "--params"])
        .arg(r#"{"table_name":"Inflation Env","action":"get_default"}"#)
        .assert()
        .success();

    let output = assert.get_output();
    let envelope = stdout_json(output);
    assert_eq!(envelope["payload"]["config"].as_array().unwrap().len(), 3);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr
        .lines()
        .filter(|l| !l.trim().is_empty())
        .all(|l| serde_json::from_str::<Value>(l).is_ok()));
}

#[test]
fn test_list_and_tree_print_json() {
    let assert = toolhost().arg("list").assert().success();
    let catalog = stdout_json(assert.get_output());
    assert_eq!(catalog.as_array().unwrap().len(), 2);

    let assert = toolhost().arg("tree").assert().success();
    let tree = stdout_json(assert.get_output());
    assert_eq!(tree["children"][0]["segment"], "RAD");
}
