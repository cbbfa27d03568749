//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::io::Write;

use gradelens_core::insights::AnalysisStatus;
use gradelens_core::test_utils::Fixture;
use gradelens_core::InsightEngine;

use crate::commands::{self, truncate, Output};

/// Two classes with enough history for every analysis to produce a result
fn setup_fixture() -> Fixture {
    let fx = Fixture::new();
    fx.student("S1001", "Amara Obi", "JSS2A");
    fx.student("S1002", "Bola Ade", "JSS2A");
    fx.student("S2001", "Dayo Ola", "JSS2B");

    fx.scores("S1001", "MATH", &[50.0, 60.0, 70.0, 72.0]);
    fx.scores("S1001", "ENG", &[30.0, 99.0, 100.0, 99.5]);
    fx.scores("S1002", "MATH", &[42.0, 38.0]);
    fx.scores("S2001", "MATH", &[65.0]);
    fx
}

// ========== Core Command Tests ==========

#[test]
fn test_open_db_unencrypted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grades.db");

    let db = commands::open_db(&path, true).unwrap();
    assert_eq!(db.counts().unwrap().students, 0);
    assert!(path.exists());
}

#[test]
fn test_cmd_init_and_status() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grades.db");

    assert!(commands::cmd_init(&path, true).is_ok());
    assert!(commands::cmd_status(&path, true).is_ok());
}

#[test]
fn test_cmd_status_without_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.db");

    assert!(commands::cmd_status(&path, true).is_ok());
    assert!(!path.exists());
}

#[test]
fn test_print_counts() {
    let fx = setup_fixture();
    assert!(commands::print_counts(&fx.db).is_ok());
}

#[test]
fn test_load_config_explicit_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[risk]\nfailing_threshold = 45.0").unwrap();

    let config = commands::load_config(Some(file.path())).unwrap();
    assert_eq!(config.failing_threshold, 45.0);
    assert_eq!(config.pass_mark, 50.0);
}

#[test]
fn test_load_config_malformed() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[risk\nfailing_threshold =").unwrap();

    assert!(commands::load_config(Some(file.path())).is_err());
}

// ========== Insight Command Tests ==========

#[test]
fn test_insight_commands_both_outputs() {
    let fx = setup_fixture();
    let engine = fx.engine();

    for output in [Output::Table, Output::Json] {
        assert!(commands::cmd_predict(&engine, "S1001", output).is_ok());
        assert!(commands::cmd_risk(&engine, None, None, output).is_ok());
        assert!(commands::cmd_risk(&engine, Some(50.0), Some("JSS2A"), output).is_ok());
        assert!(commands::cmd_recommend(&engine, "S1001", output).is_ok());
        assert!(commands::cmd_anomalies(&engine, output).is_ok());
        assert!(commands::cmd_compare(&engine, "S1001", output).is_ok());
        assert!(commands::cmd_final_grade(&engine, "S1001", "MATH", output).is_ok());
        assert!(commands::cmd_check_grade(&engine, "S1001", "MATH", 95.0, output).is_ok());
        assert!(commands::cmd_class(&engine, "JSS2A", output).is_ok());
    }
}

#[test]
fn test_insight_commands_without_data() {
    let fx = Fixture::new();
    let engine = fx.engine();

    // Empty and not-found reports are printed, not raised
    assert!(commands::cmd_predict(&engine, "NOBODY", Output::Table).is_ok());
    assert!(commands::cmd_risk(&engine, None, None, Output::Table).is_ok());
    assert!(commands::cmd_recommend(&engine, "NOBODY", Output::Table).is_ok());
    assert!(commands::cmd_anomalies(&engine, Output::Table).is_ok());
    assert!(commands::cmd_compare(&engine, "NOBODY", Output::Table).is_ok());
    assert!(commands::cmd_final_grade(&engine, "NOBODY", "MATH", Output::Table).is_ok());
    assert!(commands::cmd_check_grade(&engine, "NOBODY", "MATH", 50.0, Output::Table).is_ok());
    assert!(commands::cmd_class(&engine, "NONE", Output::Table).is_ok());
}

#[test]
fn test_cmd_check_grade_rejects_out_of_range_score() {
    let fx = setup_fixture();
    let engine = fx.engine();

    assert!(commands::cmd_check_grade(&engine, "S1001", "MATH", 101.0, Output::Table).is_err());
    assert!(commands::cmd_check_grade(&engine, "S1001", "MATH", -1.0, Output::Json).is_err());
}

#[test]
fn test_json_report_shape() {
    let fx = setup_fixture();
    let engine = InsightEngine::new(&fx.db);

    let report = engine.comparative_insights("S1001").unwrap();
    assert_eq!(report.status, AnalysisStatus::Ok);

    let json: serde_json::Value =
        serde_json::from_str(&commands::to_json(&report).unwrap()).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["student_class"], "JSS2A");
    assert!(json["insights"].is_array());
    assert!(json["message"].is_string());

    let report = engine.detect_anomalies().unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&commands::to_json(&report).unwrap()).unwrap();
    let kinds: Vec<&str> = json["anomalies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["type"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["sudden_improvement", "multiple_perfect_scores"]);
}

// ========== Helper Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("Mathematics", 20), "Mathematics");
    assert_eq!(truncate("Further Mathematics", 10), "Further...");
    assert_eq!(truncate("Économie générale", 8), "Écono...");
}
