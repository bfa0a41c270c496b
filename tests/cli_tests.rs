use std::{fs, path::Path};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::tempdir;

const HEADER: &str = "Case Name,Benchmarking Module Name,Execution Time,Peak Memory (KB)\n";

fn write_csv(dir: &Path, name: &str, rows: &[(&str, f64, f64)]) {
    fs::create_dir_all(dir).unwrap();
    let mut body = String::from(HEADER);
    for (case, time, mem) in rows {
        body.push_str(&format!("{case},ops,{time},{mem}\n"));
    }
    fs::write(dir.join(name), body).expect("write csv");
}

#[test]
fn test_cli_exits_with_success_on_help() {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_benchdiff"));
    cmd.arg("--help");
    let assert = cmd.assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8");
    assert!(stdout.contains("--benchmark-type"));
}

#[test]
fn test_cli_rejects_unknown_flag() {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_benchdiff"));
    cmd.arg("--frobnicate");
    let assert = cmd.assert().code(2);
    let stderr = String::from_utf8(assert.get_output().stderr.clone()).expect("utf8");
    assert!(stderr.contains("unknown flag --frobnicate"));
}

#[test]
fn test_cli_missing_directory_fails() {
    let dir = tempdir().unwrap();
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_benchdiff"));
    cmd.current_dir(dir.path())
        .args(["--baseline-dir", "nope", "--new-dir", "also-nope"]);
    let assert = cmd.assert().code(1);
    let stderr = String::from_utf8(assert.get_output().stderr.clone()).expect("utf8");
    assert!(stderr.lines().any(|line| line.starts_with("error: ")));
}

#[test]
fn test_cli_eager_run_without_regressions_succeeds() {
    let dir = tempdir().unwrap();
    write_csv(&dir.path().join("baseline"), "a.csv", &[("mm", 100.0, 50.0)]);
    write_csv(&dir.path().join("new"), "a.csv", &[("mm", 104.0, 50.0)]);
    write_csv(&dir.path().join("new"), "a_compile.csv", &[("mm", 130.0, 50.0)]);

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_benchdiff"));
    cmd.current_dir(dir.path())
        .args(["--benchmark-type", "eager", "--output", "out.csv"]);
    let assert = cmd.assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8");
    assert!(stdout.contains("No regressions found!"));
    assert!(!dir.path().join("out_eager.csv").exists());
    assert!(dir.path().join("out_eager_full_comparison.csv").exists());
}

#[test]
fn test_cli_compile_branch_without_baseline_data_fails() {
    let dir = tempdir().unwrap();
    write_csv(&dir.path().join("baseline"), "a.csv", &[("mm", 100.0, 50.0)]);
    write_csv(&dir.path().join("new"), "a_compile.csv", &[("mm", 130.0, 50.0)]);

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_benchdiff"));
    cmd.current_dir(dir.path())
        .args(["--benchmark-type", "compile"]);
    let assert = cmd.assert().code(1);
    let stderr = String::from_utf8(assert.get_output().stderr.clone()).expect("utf8");
    assert!(stderr.contains("No compile CSV files found"));
}

#[test]
fn test_cli_json_summary() {
    let dir = tempdir().unwrap();
    write_csv(&dir.path().join("v1"), "ops.csv", &[("mm", 10.0, 10.0)]);
    write_csv(&dir.path().join("v2"), "ops.csv", &[("mm", 20.0, 10.0)]);
    write_csv(&dir.path().join("v1"), "ops_compile.csv", &[("mm", 10.0, 10.0)]);
    write_csv(&dir.path().join("v2"), "ops_compile.csv", &[("mm", 10.0, 10.0)]);

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_benchdiff"));
    cmd.current_dir(dir.path()).args([
        "--baseline-dir",
        "v1",
        "--new-dir",
        "v2",
        "--generate-markdown",
        "--json",
    ]);
    let assert = cmd.assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8");
    let value: Value = serde_json::from_str(stdout.trim()).expect("json");
    let categories = value["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0]["category"], Value::String("eager".into()));
    assert_eq!(categories[0]["regressions"]["total_regressions"], 1);
    assert_eq!(categories[1]["regressions"], Value::Null);
    assert!(dir.path().join("regression_report_summary_report.md").exists());
    assert!(dir.path().join("regression_report_eager.csv").exists());
}
