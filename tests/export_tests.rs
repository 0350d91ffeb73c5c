use predicates::str::contains;
use std::fs;

mod common;
use common::{clock_in, init_db, rtt, run_json, setup_test_db, temp_out};

fn today() -> String {
    chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

#[test]
fn test_export_csv_today() {
    let db_path = setup_test_db("export_csv_today");
    let out = temp_out("export_csv_today", "csv");
    init_db(&db_path);

    clock_in(&db_path, "emp-1");
    let (ok, _) = run_json(&db_path, &["clock-out", "emp-1"]);
    assert!(ok);

    let day = today();
    rtt()
        .args([
            "--db", &db_path, "export", "emp-1", "--format", "csv", "--file", &out, "--from", &day,
        ])
        .assert()
        .success()
        .stdout(contains("CSV export completed"));

    let content = fs::read_to_string(&out).expect("read csv");
    let mut lines = content.lines();
    let header = lines.next().expect("header");
    assert!(header.contains("employee_id"));
    assert!(lines.next().expect("row").contains("emp-1"));
}

#[test]
fn test_export_json_range() {
    let db_path = setup_test_db("export_json_range");
    let out = temp_out("export_json_range", "json");
    init_db(&db_path);

    clock_in(&db_path, "emp-1");

    let day = today();
    rtt()
        .args([
            "--db", &db_path, "export", "emp-1", "--format", "json", "--file", &out, "--from",
            &day, "--to", &day,
        ])
        .assert()
        .success();

    let rows: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).expect("read json")).expect("parse");
    assert_eq!(rows.as_array().unwrap().len(), 1);
    assert_eq!(rows[0]["status"], "active");
}

#[test]
fn test_export_refuses_overwrite_without_force() {
    let db_path = setup_test_db("export_no_overwrite");
    let out = temp_out("export_no_overwrite", "csv");
    init_db(&db_path);
    clock_in(&db_path, "emp-1");

    fs::write(&out, "keep me").unwrap();

    rtt()
        .args(["--db", &db_path, "export", "emp-1", "--file", &out])
        .write_stdin("n\n")
        .assert()
        .failure();
    assert_eq!(fs::read_to_string(&out).unwrap(), "keep me");

    rtt()
        .args(["--db", &db_path, "export", "emp-1", "--file", &out, "--force"])
        .assert()
        .success();
    assert_ne!(fs::read_to_string(&out).unwrap(), "keep me");
}

#[test]
fn test_export_empty_range_writes_nothing() {
    let db_path = setup_test_db("export_empty_range");
    let out = temp_out("export_empty_range", "csv");
    init_db(&db_path);

    rtt()
        .args([
            "--db", &db_path, "export", "emp-1", "--file", &out, "--from", "2020-01-01", "--to",
            "2020-01-31",
        ])
        .assert()
        .success()
        .stdout(contains("Nothing to export"));

    assert!(!std::path::Path::new(&out).exists());
}
