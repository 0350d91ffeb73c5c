use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{clock_in, init_db, rtt, run_json, setup_test_db};

#[test]
fn test_init_creates_schema() {
    let db_path = setup_test_db("init_creates_schema");

    rtt()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    assert!(std::path::Path::new(&db_path).exists());
}

#[test]
fn test_full_day_flow_json() {
    let db_path = setup_test_db("full_day_flow_json");
    init_db(&db_path);

    let ws = clock_in(&db_path, "emp-1");
    let ws_arg = ws.to_string();

    let (ok, body) = run_json(&db_path, &["break", "start", &ws_arg, "--notes", "lunch"]);
    assert!(ok);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["workSessionId"], ws);
    assert_eq!(body["data"]["status"], "active");

    let (ok, body) = run_json(&db_path, &["status", "emp-1"]);
    assert!(ok);
    assert_eq!(body["data"]["state"], "on_break");

    let (ok, body) = run_json(&db_path, &["break", "end", "--session", &ws_arg]);
    assert!(ok);
    assert_eq!(body["data"]["status"], "completed");
    assert!(body["data"]["duration"].as_i64().is_some());

    let (ok, body) = run_json(&db_path, &["clock-out", "emp-1", "--notes", "done"]);
    assert!(ok);
    assert_eq!(body["data"]["status"], "completed");
    assert!(body["data"]["clockOutTime"].is_string());
    assert!(body["data"]["totalWorkTime"].as_i64().unwrap() >= 0);

    let (ok, body) = run_json(&db_path, &["status", "emp-1"]);
    assert!(ok);
    assert_eq!(body["data"]["state"], "clocked_out");
    assert!(body["data"]["workSession"].is_null());
}

#[test]
fn test_double_clock_in_is_conflict() {
    let db_path = setup_test_db("double_clock_in");
    init_db(&db_path);

    clock_in(&db_path, "emp-1");

    let (ok, body) = run_json(&db_path, &["clock-in", "emp-1"]);
    assert!(!ok);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("already clocked in")
    );

    // a different employee is unaffected
    clock_in(&db_path, "emp-2");
}

#[test]
fn test_clock_out_without_session_is_not_found() {
    let db_path = setup_test_db("clock_out_without_session");
    init_db(&db_path);

    rtt()
        .args(["--db", &db_path, "clock-out", "ghost"])
        .assert()
        .failure()
        .stderr(contains("Error:").and(contains("ghost")));
}

#[test]
fn test_clock_out_while_on_break_is_rejected() {
    let db_path = setup_test_db("clock_out_on_break");
    init_db(&db_path);

    let ws = clock_in(&db_path, "emp-1").to_string();
    let (ok, _) = run_json(&db_path, &["break", "start", &ws]);
    assert!(ok);

    let (ok, body) = run_json(&db_path, &["clock-out", "emp-1"]);
    assert!(!ok);
    assert!(body["error"].as_str().unwrap().contains("break"));
}

#[test]
fn test_idle_and_activity_are_recorded() {
    let db_path = setup_test_db("idle_and_activity");
    init_db(&db_path);

    let ws = clock_in(&db_path, "emp-1").to_string();

    let (ok, _) = run_json(&db_path, &["idle", "start", &ws]);
    assert!(ok);
    let (ok, body) = run_json(&db_path, &["idle", "start", &ws]);
    assert!(!ok);
    assert!(body["error"].is_string());
    let (ok, _) = run_json(&db_path, &["idle", "end", &ws]);
    assert!(ok);

    let (ok, body) = run_json(
        &db_path,
        &[
            "activity", "web", &ws, "https://www.example.com/docs", "--duration", "90",
        ],
    );
    assert!(ok);
    assert_eq!(body["data"]["domain"], "example.com");

    let (ok, _) = run_json(
        &db_path,
        &["activity", "app", &ws, "Editor", "--title", "main.rs", "--duration", "30"],
    );
    assert!(ok);

    let (ok, body) = run_json(&db_path, &["sessions", "emp-1", "--details"]);
    assert!(ok);
    let first = &body["data"][0];
    assert_eq!(first["idleSessions"].as_array().unwrap().len(), 1);
    assert_eq!(first["applications"][0]["applicationName"], "Editor");
    assert_eq!(first["websites"][0]["duration"], 90);
}

#[test]
fn test_negative_activity_duration_is_rejected() {
    let db_path = setup_test_db("negative_activity_duration");
    init_db(&db_path);

    let ws = clock_in(&db_path, "emp-1").to_string();
    let (ok, body) = run_json(
        &db_path,
        &["activity", "app", &ws, "Editor", "--duration=-5"],
    );
    assert!(!ok);
    assert!(body["error"].as_str().unwrap().contains("duration"));
}

#[test]
fn test_summary_for_empty_day() {
    let db_path = setup_test_db("summary_empty_day");
    init_db(&db_path);

    let (ok, body) = run_json(&db_path, &["summary", "nobody", "--date", "2025-01-15"]);
    assert!(ok);
    assert_eq!(body["data"]["sessionCount"], 0);
    assert_eq!(body["data"]["totalWorkTime"], 0);
}

#[test]
fn test_summary_rejects_bad_date() {
    let db_path = setup_test_db("summary_bad_date");
    init_db(&db_path);

    rtt()
        .args(["--db", &db_path, "summary", "emp-1", "--date", "15/01/2025"])
        .assert()
        .failure()
        .stderr(contains("Invalid date"));
}

#[test]
fn test_log_print_shows_transitions() {
    let db_path = setup_test_db("log_print_transitions");
    init_db(&db_path);

    clock_in(&db_path, "emp-1");

    rtt()
        .args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("clock_in").and(contains("emp-1")));
}

#[test]
fn test_db_info_and_check() {
    let db_path = setup_test_db("db_info_and_check");
    init_db(&db_path);
    clock_in(&db_path, "emp-1");

    rtt()
        .args(["--db", &db_path, "db", "--info", "--check"])
        .assert()
        .success()
        .stdout(
            contains("Integrity check passed")
                .and(contains("Foreign keys OK"))
                .and(contains("Active-session indexes present")),
        );
}
