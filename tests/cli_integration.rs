use assert_cmd::Command;
use base64::{engine::general_purpose::STANDARD, Engine};
use predicates::prelude::*;
use serde_json::Value;

fn binday_cmd() -> Command {
    Command::cargo_bin("binday").expect("binary binday is built")
}

fn read_json(stdout: &[u8]) -> Value {
    serde_json::from_slice(stdout).expect("valid json")
}

fn setup_organic_thu(db: &str) {
    // 2026-08-06 is a Thursday; arming on Wednesday evening targets it.
    binday_cmd()
        .args(["--db", db, "add", "--category", "organic", "--days", "thu"])
        .assert()
        .success();
}

#[test]
fn arm_requires_notification_permission() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("db.json");
    let db = db.to_str().unwrap();
    setup_organic_thu(db);

    binday_cmd()
        .args(["--db", db, "remind", "arm", "--ts", "2026-08-05T18:00:00Z"])
        .assert()
        .failure()
        .code(6)
        .stderr(predicate::str::contains("remind enable"));
}

#[test]
fn arm_is_idempotent_per_day() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("db.json");
    let db = db.to_str().unwrap();
    setup_organic_thu(db);

    binday_cmd()
        .args(["--db", db, "remind", "enable"])
        .assert()
        .success();

    let out = binday_cmd()
        .args([
            "--db", db, "--format", "json", "remind", "arm", "--ts", "2026-08-05T18:00:00Z",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v = read_json(&out);
    assert_eq!(v["outcome"], "armed");
    assert_eq!(v["fire_at"], "2026-08-05T19:00:00");
    assert_eq!(v["names"], serde_json::json!(["Organic"]));

    let out = binday_cmd()
        .args([
            "--db", db, "--format", "json", "remind", "arm", "--ts", "2026-08-05T18:30:00Z",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(read_json(&out)["outcome"], "already-armed");

    // Exactly one pending notification.
    let out = binday_cmd()
        .args(["--db", db, "--format", "json", "remind", "status"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v = read_json(&out);
    assert_eq!(v["scheduled"], true);
    assert_eq!(v["last_armed_date"], "2026-08-05");
    assert_eq!(v["pending"]["fire_at"], "2026-08-05T19:00:00");
    assert!(v["pending"]["body"]
        .as_str()
        .unwrap()
        .contains("Organic"));
}

#[test]
fn missed_evening_slot_falls_back_to_next_morning() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("db.json");
    let db = db.to_str().unwrap();
    setup_organic_thu(db);

    binday_cmd()
        .args(["--db", db, "remind", "enable"])
        .assert()
        .success();

    let out = binday_cmd()
        .args([
            "--db", db, "--format", "json", "remind", "arm", "--ts", "2026-08-05T20:30:00Z",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v = read_json(&out);
    assert_eq!(v["outcome"], "armed");
    assert_eq!(v["fire_at"], "2026-08-06T08:00:00");
}

#[test]
fn nothing_due_tomorrow_does_not_arm() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("db.json");
    let db = db.to_str().unwrap();
    setup_organic_thu(db);

    binday_cmd()
        .args(["--db", db, "remind", "enable"])
        .assert()
        .success();

    // Thursday evening: nothing due on Friday.
    let out = binday_cmd()
        .args([
            "--db", db, "--format", "json", "remind", "arm", "--ts", "2026-08-06T18:00:00Z",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(read_json(&out)["outcome"], "nothing-due");

    let out = binday_cmd()
        .args(["--db", db, "--format", "json", "remind", "status"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert!(read_json(&out)["pending"].is_null());
}

#[test]
fn changing_the_hour_rearms_with_the_new_slot() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("db.json");
    let db = db.to_str().unwrap();
    setup_organic_thu(db);

    binday_cmd()
        .args(["--db", db, "remind", "enable"])
        .assert()
        .success();
    binday_cmd()
        .args(["--db", db, "remind", "arm", "--ts", "2026-08-05T17:00:00Z"])
        .assert()
        .success();

    binday_cmd()
        .args(["--db", db, "remind", "hour", "18"])
        .assert()
        .success()
        .stdout(predicate::str::contains("18:00"));

    // Reconfigure cancelled the pending handle and cleared the day flag.
    let out = binday_cmd()
        .args(["--db", db, "--format", "json", "remind", "status"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v = read_json(&out);
    assert_eq!(v["scheduled"], false);
    assert!(v["pending"].is_null());
    assert_eq!(v["hour"], 18);

    let out = binday_cmd()
        .args([
            "--db", db, "--format", "json", "remind", "arm", "--ts", "2026-08-05T17:00:00Z",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(read_json(&out)["fire_at"], "2026-08-05T18:00:00");

    binday_cmd()
        .args(["--db", db, "remind", "hour", "24"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn vacation_window_suppresses_reminders() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("db.json");
    let db = db.to_str().unwrap();
    setup_organic_thu(db);

    binday_cmd()
        .args(["--db", db, "remind", "enable"])
        .assert()
        .success();
    binday_cmd()
        .args(["--db", db, "remind", "arm", "--ts", "2026-08-05T18:00:00Z"])
        .assert()
        .success();

    // Setting the window cancels the pending reminder immediately.
    binday_cmd()
        .args([
            "--db", db, "vacation", "set", "--start", "2026-08-05", "--end", "2026-08-12",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("suppressed"));

    let out = binday_cmd()
        .args(["--db", db, "--format", "json", "remind", "status"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert!(read_json(&out)["pending"].is_null());

    // Arming inside the window stays suppressed.
    let out = binday_cmd()
        .args([
            "--db", db, "--format", "json", "remind", "arm", "--ts", "2026-08-05T18:30:00Z",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(read_json(&out)["outcome"], "vacation-suppressed");

    // After the window, arming works again.
    binday_cmd()
        .args(["--db", db, "vacation", "clear"])
        .assert()
        .success();
    let out = binday_cmd()
        .args([
            "--db", db, "--format", "json", "remind", "arm", "--ts", "2026-08-05T18:30:00Z",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(read_json(&out)["outcome"], "armed");
}

#[test]
fn vacation_window_validation() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("db.json");
    let db = db.to_str().unwrap();

    binday_cmd()
        .args([
            "--db", db, "vacation", "set", "--start", "2026-08-12", "--end", "2026-08-12",
        ])
        .assert()
        .failure()
        .code(2);

    binday_cmd()
        .args([
            "--db", db, "vacation", "set", "--start", "2026-08-12", "--end", "2026-08-10",
        ])
        .assert()
        .failure()
        .code(2);

    binday_cmd()
        .args(["--db", db, "--today", "2026-08-13", "--format", "json", "vacation", "status"])
        .assert()
        .success();
}

#[test]
fn share_roundtrip_with_emoji_icons() {
    let dir = tempfile::tempdir().unwrap();
    let db1 = dir.path().join("db1.json");
    let db1 = db1.to_str().unwrap();
    let db2 = dir.path().join("db2.json");
    let db2 = db2.to_str().unwrap();

    binday_cmd()
        .args(["--db", db1, "add", "--category", "glass", "--days", "sat"])
        .assert()
        .success();
    binday_cmd()
        .args([
            "--db", db1, "add", "Batteries", "--category", "custom", "--days", "mon,fri",
            "--icon", "🔋", "--color", "red",
        ])
        .assert()
        .success();

    let out = binday_cmd()
        .args([
            "--db",
            db1,
            "--format",
            "json",
            "share",
            "create",
            "--ts",
            "2026-08-05T12:00:00Z",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v = read_json(&out);
    let code = v["code"].as_str().unwrap().to_string();
    let token = v["token"].as_str().unwrap().to_string();
    assert_eq!(code.len(), 6);
    assert!(code
        .bytes()
        .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()));
    assert_eq!(v["schedules"], 2);

    // The raw token is portable to another device.
    let out = binday_cmd()
        .args(["--db", db2, "--format", "json", "share", "import", &token])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v = read_json(&out);
    assert_eq!(v["imported"], 2);
    let schedules = v["schedules"].as_array().unwrap();
    assert_eq!(schedules[0]["id"], "s0001");
    assert_eq!(schedules[0]["name"], "Glass");
    assert_eq!(schedules[0]["icon"], "🫙");
    assert_eq!(schedules[1]["name"], "Batteries");
    assert_eq!(schedules[1]["icon"], "🔋");
    assert_eq!(schedules[1]["days"], serde_json::json!([1, 5]));

    // The family code resolves through the local code store; merged copies
    // get fresh ids.
    let out = binday_cmd()
        .args(["--db", db1, "--format", "json", "share", "import", &code])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v = read_json(&out);
    assert_eq!(v["imported"], 2);
    assert_eq!(v["schedules"][0]["id"], "s0003");
}

#[test]
fn share_import_rejects_bad_input() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("db.json");
    let db = db.to_str().unwrap();

    // Unknown family code.
    binday_cmd()
        .args(["--db", db, "share", "import", "ABC123"])
        .assert()
        .failure()
        .code(3);

    // Not a token at all.
    binday_cmd()
        .args(["--db", db, "share", "import", "!!definitely-not-base64!!"])
        .assert()
        .failure()
        .code(5);

    // Valid base64, wrong payload shape.
    let bogus = STANDARD.encode(br#"{"timestamp":1}"#);
    binday_cmd()
        .args(["--db", db, "share", "import", &bogus])
        .assert()
        .failure()
        .code(5)
        .stderr(predicate::str::contains("schedules"));
}

#[test]
fn legacy_share_token_still_imports() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("db.json");
    let db = db.to_str().unwrap();

    // A token from the old encoder: base64 over one byte per code unit.
    let json = r#"{"schedules":[{"type":"paper","name":"Paper","days":[3],"color":"yellow","icon":"P"}],"timestamp":1700000000000}"#;
    let legacy = STANDARD.encode(json.as_bytes());

    let out = binday_cmd()
        .args(["--db", db, "--format", "json", "share", "import", &legacy])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v = read_json(&out);
    assert_eq!(v["imported"], 1);
    assert_eq!(v["schedules"][0]["name"], "Paper");
    assert_eq!(v["schedules"][0]["days"], serde_json::json!([3]));
}

#[test]
fn share_create_requires_schedules() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("db.json");
    let db = db.to_str().unwrap();

    binday_cmd()
        .args(["--db", db, "share", "create"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn backup_export_and_import() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("db.json");
    let db = db.to_str().unwrap();
    let backup = dir.path().join("backup.json");
    let backup = backup.to_str().unwrap();

    binday_cmd()
        .args(["--db", db, "add", "--category", "mixed", "--days", "weekends"])
        .assert()
        .success();

    let out = binday_cmd()
        .args([
            "--db",
            db,
            "--today",
            "2026-08-05",
            "--format",
            "json",
            "export",
            "--out",
            backup,
            "--ts",
            "2026-08-05T12:00:00Z",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v = read_json(&out);
    assert_eq!(v["schedules"], 1);

    // The document has the interchange shape.
    let doc: Value = serde_json::from_str(&std::fs::read_to_string(backup).unwrap()).unwrap();
    assert_eq!(doc["exportDate"], "2026-08-05T12:00:00Z");
    assert!(doc["appVersion"].is_string());
    assert_eq!(doc["schedules"][0]["category"], "mixed");

    // Importing back into the same DB mints a fresh id.
    let out = binday_cmd()
        .args(["--db", db, "--format", "json", "import", backup])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v = read_json(&out);
    assert_eq!(v["imported"], 1);
    assert_eq!(v["schedules"][0]["id"], "s0002");
    assert_eq!(v["schedules"][0]["days"], serde_json::json!([0, 6]));
}

#[test]
fn backup_import_failures() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("db.json");
    let db = db.to_str().unwrap();

    let missing = dir.path().join("nope.json");
    binday_cmd()
        .args(["--db", db, "import", missing.to_str().unwrap()])
        .assert()
        .failure()
        .code(7);

    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, "not json").unwrap();
    binday_cmd()
        .args(["--db", db, "import", bad.to_str().unwrap()])
        .assert()
        .failure()
        .code(5);

    // Entries with missing critical fields are enumerated, nothing imports.
    let partial = dir.path().join("partial.json");
    std::fs::write(
        &partial,
        r#"{"schedules":[{"type":"organic","days":[1]},{"type":"plastic"}]}"#,
    )
    .unwrap();
    binday_cmd()
        .args(["--db", db, "import", partial.to_str().unwrap()])
        .assert()
        .failure()
        .code(5)
        .stderr(predicate::str::contains("schedule 2"));

    binday_cmd()
        .args(["--db", db, "--format", "json", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"schedules\": []"));
}
