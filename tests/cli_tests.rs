//! Command-line tests for the forecast-match binary

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use chrono::{TimeZone, Utc};
use predicates::prelude::*;
use tempfile::TempDir;

use forecast_match::integrity::verifier::{digest, forecast_digest};
use forecast_match::{Category, EventCatalog, Forecast, Framework, ObservedEvent, SkyPosition};

const PREDICTION: &str = "Framework: CIA\nConfidence: 85%\nDate: 01/15/2025\nFrequency: 120 Hz\n\
                          RA: 180.5\nDec: 30.2\nBinary black hole merger expected.\n#merger";

fn bin() -> Command {
    Command::cargo_bin("forecast-match").expect("binary should build")
}

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write test file");
    path
}

fn write_events(dir: &TempDir) -> PathBuf {
    let mut catalog = EventCatalog::new();
    catalog.add_event(
        ObservedEvent::new("S250115a", Utc.with_ymd_and_hms(2025, 1, 15, 6, 0, 0).unwrap())
            .with_position(182.0, 31.5)
            .with_peak_frequency(130.0),
    );
    catalog.add_event(
        ObservedEvent::new("S250301c", Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap())
            .with_position(10.0, -5.0),
    );
    write(dir, "events.json", &catalog.to_json().unwrap())
}

fn saved_forecast() -> Forecast {
    Forecast::builder(
        "PRED-saved",
        Category::WaveBurst,
        Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2025, 1, 16, 0, 0, 0).unwrap(),
    )
    .created_at(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap())
    .framework(Framework::Sia)
    .confidence(0.6)
    .description("Saved forecast")
    .sky_position(Some(SkyPosition::with_uncertainty(180.5, 30.2, 5.0).unwrap()))
    .build()
    .unwrap()
}

#[test]
fn test_extract_text_report() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "GW_prediction_0115.md", PREDICTION);

    bin()
        .arg("extract")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Forecast: PRED-GW_prediction_0115"))
        .stdout(predicate::str::contains("Framework: CIA"))
        .stdout(predicate::str::contains("Confidence: 85.0%"))
        .stdout(predicate::str::contains("2025-01-15T00:00:00Z"))
        .stdout(predicate::str::contains("Status: pending"));
}

#[test]
fn test_extract_json_loads_back_as_forecast() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "prediction.md", PREDICTION);

    let output = bin()
        .args(["extract", "--format", "json", "--label", "custom"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let forecast: Forecast = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(forecast.id(), "PRED-custom");
    assert_eq!(forecast.framework(), Framework::Cia);
    assert!(forecast.signal().is_some());
}

#[test]
fn test_extract_reports_warnings_for_sparse_text() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "sparse.txt", "Something will happen");

    bin()
        .arg("extract")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Warnings:"))
        .stdout(predicate::str::contains("Category: Wave burst"));
}

#[test]
fn test_extract_batch_continues_and_fails_at_end() {
    let dir = TempDir::new().unwrap();
    let good = write(&dir, "good.md", PREDICTION);
    let empty = write(&dir, "empty.md", "  \n");

    bin()
        .args(["extract", "--format", "tsv"])
        .arg(&empty)
        .arg(&good)
        .assert()
        .failure()
        .stdout(predicate::str::contains("PRED-good"))
        .stderr(predicate::str::contains("Empty prediction content"))
        .stderr(predicate::str::contains("1 of 2 inputs could not be parsed"));
}

#[test]
fn test_extract_label_requires_single_input() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.md", PREDICTION);
    let b = write(&dir, "b.md", PREDICTION);

    bin()
        .args(["extract", "--label", "x"])
        .arg(&a)
        .arg(&b)
        .assert()
        .failure()
        .stderr(predicate::str::contains("single input"));
}

#[test]
fn test_digest_json_matches_library() {
    let dir = TempDir::new().unwrap();
    let forecast = saved_forecast();
    let json = serde_json::to_string_pretty(&forecast).unwrap();
    let input = write(&dir, "forecast.json", &json);

    let output = bin()
        .args(["digest", "--format", "json"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let record: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(record["forecast_id"], "PRED-saved");
    assert_eq!(record["framework"], "SIA");
    assert_eq!(record["forecast_digest"], forecast_digest(&forecast).as_str());
    assert_eq!(record["file_digest"], digest(&json).as_str());
}

#[test]
fn test_verify_accepts_recorded_digest() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "prediction.md", PREDICTION);
    let expected = digest(PREDICTION).to_uppercase();

    bin()
        .arg("verify")
        .arg(&input)
        .arg(&expected)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("OK:"));
}

#[test]
fn test_verify_mismatch_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "prediction.md", PREDICTION);
    let expected = digest(PREDICTION);
    fs::write(&input, format!("{PREDICTION}\nedited")).unwrap();

    bin()
        .arg("verify")
        .arg(&input)
        .arg(&expected)
        .assert()
        .failure()
        .stdout(predicate::str::contains("MISMATCH"))
        .stderr(predicate::str::contains("Digest verification failed"));
}

#[test]
fn test_verify_missing_file_is_mismatch() {
    let dir = TempDir::new().unwrap();

    bin()
        .args(["verify", "--format", "json"])
        .arg(dir.path().join("absent.md"))
        .arg(digest("anything"))
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"verified\": false"));
}

#[test]
fn test_match_validates_forecast() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "prediction.md", PREDICTION);
    let events = write_events(&dir);

    bin()
        .arg("match")
        .arg(&input)
        .arg("--events")
        .arg(&events)
        .assert()
        .success()
        .stdout(predicate::str::contains("#1 S250115a"))
        .stdout(predicate::str::contains("S250301c").not())
        .stdout(predicate::str::contains("Status: validated (S250115a)"));
}

#[test]
fn test_match_without_candidates_invalidates() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "prediction.md", PREDICTION);
    let events = write_events(&dir);

    let output = bin()
        .args(["match", "--format", "json", "--sky-tolerance", "0.5"])
        .arg(&input)
        .arg("--events")
        .arg(&events)
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["status"], "invalidated");
    assert!(report["matches"].as_array().unwrap().is_empty());
    assert_eq!(report["tolerances"]["sky_degrees"], 0.5);
}

#[test]
fn test_match_tolerances_file_and_override() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "prediction.md", PREDICTION);
    let events = write_events(&dir);
    let tolerances = write(&dir, "tolerances.json", r#"{"time_hours": 12, "sky_degrees": 20}"#);

    bin()
        .args(["match", "--format", "tsv", "--frequency-tolerance", "5"])
        .arg(&input)
        .arg("--events")
        .arg(&events)
        .arg("--tolerances")
        .arg(&tolerances)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("rank\tevent_id\tscore"))
        // 130 Hz observed vs 120 Hz predicted is outside 5%
        .stdout(predicate::str::contains("S250115a").not());
}

#[test]
fn test_match_rejects_negative_tolerance() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "prediction.md", PREDICTION);
    let events = write_events(&dir);

    bin()
        .args(["match", "--time-tolerance=-1"])
        .arg(&input)
        .arg("--events")
        .arg(&events)
        .assert()
        .failure()
        .stderr(predicate::str::contains("time tolerance must be a non-negative number"));
}

#[test]
fn test_match_unknown_event_fails() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "prediction.md", PREDICTION);
    let events = write_events(&dir);

    bin()
        .args(["match", "--event", "S999999z"])
        .arg(&input)
        .arg("--events")
        .arg(&events)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Event not found: S999999z"));
}

#[test]
fn test_match_huge_time_tolerance_is_an_error() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "prediction.md", PREDICTION);
    let events = write_events(&dir);

    bin()
        .args(["match", "--time-tolerance", "1e15"])
        .arg(&input)
        .arg("--events")
        .arg(&events)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("too large"))
        .stderr(predicate::str::contains("panicked").not());

    // Explicit bounds do not need a derived window
    bin()
        .args(["match", "--time-tolerance", "1e15"])
        .args(["--start", "2025-01-01", "--end", "2025-02-01"])
        .arg(&input)
        .arg("--events")
        .arg(&events)
        .assert()
        .success()
        .stdout(predicate::str::contains("#1 S250115a"));
}
