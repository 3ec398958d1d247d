//! CLI behaviour of the `shellac` binary

use assert_cmd::Command;
use predicates::prelude::*;

fn shellac() -> Command {
    let mut cmd = Command::cargo_bin("shellac").expect("binary should build");
    // keep user config out of the way
    cmd.env("HOME", std::env::temp_dir());
    cmd.env("XDG_CONFIG_HOME", std::env::temp_dir().join("shellac-test-config"));
    cmd
}

#[test]
fn test_prints_captured_output() {
    shellac()
        .arg("echo hello")
        .assert()
        .success()
        .stdout("hello\n");
}

#[test]
fn test_chains_commands() {
    shellac()
        .args(["echo a", "echo b"])
        .assert()
        .success()
        .stdout("a\nb\n");
}

#[test]
fn test_runs_in_directory() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("marker.txt"), "found\n").unwrap();

    shellac()
        .arg("-C")
        .arg(dir.path())
        .arg("cat marker.txt")
        .assert()
        .success()
        .stdout("found\n");
}

#[test]
fn test_propagates_exit_code() {
    shellac()
        .arg("echo oops >&2; exit 3")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("oops"));
}

#[test]
fn test_timeout_exit_code() {
    shellac()
        .args(["-t", "0.1", "sleep 5"])
        .assert()
        .code(124)
        .stderr(predicate::str::contains("timed out"));
}

#[test]
fn test_json_success() {
    shellac()
        .args(["-f", "json", "echo hello"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"success\": true"))
        .stdout(predicate::str::contains("\"output\": \"hello\""));
}

#[test]
fn test_json_failure() {
    shellac()
        .args(["-f", "json", "cd notADirectory"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"error_type\": \"exit\""))
        .stdout(predicate::str::contains("notADirectory"));
}

#[test]
fn test_stream_tees_without_reprinting() {
    shellac()
        .args(["--stream", "echo live"])
        .assert()
        .success()
        .stdout("live\n");
}

#[test]
fn test_stdout_file_receives_copy() {
    let dir = tempfile::TempDir::new().unwrap();
    let out = dir.path().join("out.log");

    shellac()
        .arg("--stdout-file")
        .arg(&out)
        .arg("echo copied")
        .assert()
        .success()
        .stdout("copied\n");

    assert_eq!(std::fs::read_to_string(out).unwrap(), "copied\n");
}

#[test]
fn test_missing_shell_fails() {
    shellac()
        .args(["--shell", "/nonexistent/shell", "echo hi"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to launch shell"));
}

#[test]
fn test_config_file_sets_shell() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "[defaults]\nshell = \"/nonexistent/from-config\"\n").unwrap();

    shellac()
        .arg("-c")
        .arg(&config)
        .arg("echo hi")
        .assert()
        .failure()
        .stderr(predicate::str::contains("/nonexistent/from-config"));
}
