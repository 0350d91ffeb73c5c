#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use serde_json::Value;
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn rtt() -> Command {
    cargo_bin_cmd!("rtimetrack")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rtimetrack.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rtimetrack_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// `init` in test mode: schema only, config file untouched
pub fn init_db(db_path: &str) {
    rtt()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

/// Run a command with `--json` and parse the envelope printed on stdout.
/// Returns the exit status alongside the body.
pub fn run_json(db_path: &str, args: &[&str]) -> (bool, Value) {
    let output = rtt()
        .args(["--db", db_path, "--json"])
        .args(args)
        .output()
        .expect("run rtimetrack");

    let body: Value = serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not JSON ({e}): {}",
            String::from_utf8_lossy(&output.stdout)
        )
    });
    (output.status.success(), body)
}

/// Clock `employee` in and return the new work session id
pub fn clock_in(db_path: &str, employee: &str) -> i64 {
    let (ok, body) = run_json(db_path, &["clock-in", employee]);
    assert!(ok, "clock-in failed: {body}");
    body["data"]["id"].as_i64().expect("work session id")
}
