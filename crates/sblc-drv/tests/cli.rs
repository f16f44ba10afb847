//! CLI contract tests for the `sblc` binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn sblc() -> Command {
    Command::cargo_bin("sblc").expect("sblc binary builds")
}

#[test]
fn test_help_prints_usage_and_exits_zero() {
    sblc()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("usage: sblc"));
}

#[test]
fn test_missing_arguments_fail_with_hint() {
    sblc()
        .assert()
        .failure()
        .stderr(predicate::str::contains("INPUT"));
}

#[test]
fn test_compile_writes_python_module() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("minimal.sbl");
    let output = dir.path().join("minimal.py");
    std::fs::write(
        &input,
        "externals ( stem ) define stem as ( backwards ( ['ly'] delete ) )",
    )
    .unwrap();

    sblc().arg(&input).arg(&output).assert().success();

    let python = std::fs::read_to_string(&output).unwrap();
    assert!(python.contains("def stem(word):"));
    assert!(python.contains("class _Env(object):"));
}

#[test]
fn test_compile_subcommand_form() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("minimal.sbl");
    let output = dir.path().join("minimal.py");
    std::fs::write(
        &input,
        "externals ( stem ) define stem as ( backwards ( ['ly'] delete ) )",
    )
    .unwrap();

    sblc()
        .arg("compile")
        .arg(&input)
        .arg(&output)
        .assert()
        .success();
    assert!(output.exists());
}

#[test]
fn test_missing_input_fails_with_diagnostic() {
    let dir = tempfile::tempdir().unwrap();
    sblc()
        .arg(dir.path().join("absent.sbl"))
        .arg(dir.path().join("out.py"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn test_bad_source_reports_one_line_diagnostic() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.sbl");
    std::fs::write(&input, "externals ( stem ) define stem as (").unwrap();

    let assert = sblc()
        .arg(&input)
        .arg(dir.path().join("out.py"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("parse error at "));

    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).into_owned();
    assert_eq!(stderr.trim_end().lines().count(), 1, "stderr: {}", stderr);
}

#[test]
fn test_semantic_error_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("dup.sbl");
    std::fs::write(
        &input,
        "externals ( stem ) integers ( stem ) define stem as next",
    )
    .unwrap();

    sblc()
        .arg(&input)
        .arg(dir.path().join("out.py"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate declaration"));
}
