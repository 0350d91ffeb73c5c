use predicates::str::contains;

mod common;
use common::{init_db, rtt, setup_test_db};

fn api(db_path: &str, method: &str, path: &str, body: Option<&str>) -> (bool, serde_json::Value) {
    let mut cmd = rtt();
    cmd.args(["--db", db_path, "api", "--method", method, "--path", path]);
    if let Some(b) = body {
        cmd.args(["--body", b]);
    }
    let output = cmd.output().expect("run rtimetrack");
    let value = serde_json::from_slice(&output.stdout).expect("JSON envelope on stdout");
    (output.status.success(), value)
}

#[test]
fn test_api_clock_in_then_status() {
    let db_path = setup_test_db("api_clock_in_then_status");
    init_db(&db_path);

    let (ok, body) = api(
        &db_path,
        "POST",
        "/api/time-tracking/clock-in",
        Some(r#"{"employeeId":"emp-9","location":"remote"}"#),
    );
    assert!(ok);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["location"], "remote");

    let (ok, body) = api(
        &db_path,
        "GET",
        "/api/time-tracking/status?employeeId=emp-9",
        None,
    );
    assert!(ok);
    assert_eq!(body["data"]["state"], "clocked_in");
}

#[test]
fn test_api_unknown_route_is_404() {
    let db_path = setup_test_db("api_unknown_route");
    init_db(&db_path);

    let (ok, body) = api(&db_path, "GET", "/api/time-tracking/nope", None);
    assert!(!ok);
    assert_eq!(body["error"], "Route not found");
}

#[test]
fn test_api_wrong_method_is_405() {
    let db_path = setup_test_db("api_wrong_method");
    init_db(&db_path);

    let (ok, body) = api(&db_path, "GET", "/api/time-tracking/clock-in", None);
    assert!(!ok);
    assert_eq!(body["error"], "Method not allowed");
}

#[test]
fn test_api_missing_employee_is_validation_error() {
    let db_path = setup_test_db("api_missing_employee");
    init_db(&db_path);

    let (ok, body) = api(
        &db_path,
        "POST",
        "/api/time-tracking/clock-in",
        Some(r#"{"employeeId":"   "}"#),
    );
    assert!(!ok);
    assert!(body["error"].as_str().unwrap().contains("employeeId"));
}

#[test]
fn test_api_malformed_body() {
    let db_path = setup_test_db("api_malformed_body");
    init_db(&db_path);

    rtt()
        .args([
            "--db",
            &db_path,
            "api",
            "--method",
            "POST",
            "--path",
            "/api/time-tracking/clock-in",
            "--body",
            "{not json",
        ])
        .assert()
        .failure()
        .stdout(contains("Invalid JSON"));
}
