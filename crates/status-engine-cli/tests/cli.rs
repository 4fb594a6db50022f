use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn status_engine() -> Command {
    Command::cargo_bin("status-engine").unwrap()
}

#[test]
fn test_eval_text_output() {
    status_engine()
        .args(["eval", &fixture("personalities.json")])
        .assert()
        .success()
        .stdout(predicate::str::contains("mask: 0b11 (3)"))
        .stdout(predicate::str::contains("statuses: upholder, questioner"));
}

#[test]
fn test_eval_json_output() {
    let output = status_engine()
        .args(["eval", "--format", "json", &fixture("personalities.json")])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["mask"], 3);
    assert_eq!(value["names"], serde_json::json!(["upholder", "questioner"]));
    assert_eq!(value["unnamed_bits"], 0);
    assert!(value.get("verdicts").is_none());
}

#[test]
fn test_eval_explain() {
    status_engine()
        .args(["eval", "--explain", &fixture("personalities.json")])
        .assert()
        .success()
        .stdout(predicate::str::contains("record #0: applies (2017-01-01)"))
        .stdout(predicate::str::contains("record #2: no_matching_day"))
        .stdout(predicate::str::contains("record #3: starts_after_query"))
        .stdout(predicate::str::contains("record #4: empty_status"));
}

#[test]
fn test_eval_explain_json_includes_verdicts() {
    let output = status_engine()
        .args([
            "eval",
            "--explain",
            "--format",
            "json",
            &fixture("personalities.json"),
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let verdicts = value["verdicts"].as_array().unwrap();
    assert_eq!(verdicts.len(), 5);
    assert_eq!(verdicts[0]["verdict"], "applies");
    assert_eq!(verdicts[0]["day"], "2017-01-01");
    assert_eq!(verdicts[3]["verdict"], "starts_after_query");
}

#[test]
fn test_eval_interval_override() {
    // Through the following Sunday: the Sunday-night record and the record
    // starting on the 4th both come into range.
    status_engine()
        .args([
            "eval",
            "--end",
            "2017-01-08 02:00",
            &fixture("personalities.json"),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("mask: 0b1111 (15)"))
        .stdout(predicate::str::contains(
            "statuses: upholder, questioner, obliger, rebel",
        ));
}

#[test]
fn test_eval_reads_stdin() {
    status_engine()
        .arg("eval")
        .write_stdin(
            r#"{"start": "2017-01-01 03:00", "end": "2017-01-03 02:00",
                "records": [{"status": 64}]}"#,
        )
        .assert()
        .success()
        .stdout(predicate::str::contains("mask: 0b1000000 (64)"))
        .stdout(predicate::str::contains("unnamed bits: 0b1000000"));
}

#[test]
fn test_eval_padded_days() {
    let doc = r#"{"start": "2017-01-01 03:00", "end": "2017-01-02 00:00",
                  "records": [{"status": 1, "end_time": "01:00"}]}"#;

    status_engine()
        .arg("eval")
        .write_stdin(doc)
        .assert()
        .success()
        .stdout(predicate::str::contains("mask: 0b0 (0)"));

    status_engine()
        .args(["eval", "--padded-days", "-"])
        .write_stdin(doc)
        .assert()
        .success()
        .stdout(predicate::str::contains("mask: 0b1 (1)"));
}

#[test]
fn test_eval_week_start_sunday() {
    // Bit 0 is Sunday with a Sunday origin, and 2017-01-01 is a Sunday.
    let doc = r#"{"start": "2017-01-01 03:00", "end": "2017-01-01 04:00",
                  "records": [{"status": 2, "days": 1}]}"#;

    status_engine()
        .args(["eval", "--week-start", "sunday"])
        .write_stdin(doc)
        .assert()
        .success()
        .stdout(predicate::str::contains("mask: 0b10 (2)"));

    status_engine()
        .arg("eval")
        .write_stdin(doc)
        .assert()
        .success()
        .stdout(predicate::str::contains("mask: 0b0 (0)"));
}

#[test]
fn test_eval_rejects_inverted_interval() {
    status_engine()
        .args([
            "eval",
            "--end",
            "2016-12-31 00:00",
            &fixture("personalities.json"),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid interval"));
}

#[test]
fn test_eval_rejects_malformed_document() {
    status_engine()
        .arg("eval")
        .write_stdin("{ not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse query document"));
}

#[test]
fn test_eval_missing_file() {
    status_engine()
        .args(["eval", "/nonexistent/records.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn test_check_counts_records() {
    status_engine()
        .args(["check", &fixture("personalities.json")])
        .assert()
        .success()
        .stdout(predicate::str::contains("ok: 5 record(s), 4 named status(es)"));
}

#[test]
fn test_check_reports_unknown_status() {
    status_engine()
        .arg("check")
        .write_stdin(r#"{"records": [{"status": "skeptic"}]}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown status"));
}
