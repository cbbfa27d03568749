//! Fixture helpers for tests
//!
//! `Fixture` wraps a throwaway database and hands out strictly increasing
//! timestamps so records land in the order they are staged.
//!
//! ```rust,ignore
//! let fx = Fixture::new();
//! fx.student("S1", "Ada", "10A");
//! fx.scores("S1", "MATH", &[50.0, 60.0, 70.0]);
//! let report = fx.engine().predict_performance("S1")?;
//! ```

use std::cell::Cell;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::config::InsightConfig;
use crate::db::Database;
use crate::insights::InsightEngine;
use crate::models::ResultStatus;

/// Subjects every fixture starts with
pub const DEFAULT_SUBJECTS: &[(&str, &str)] = &[
    ("MATH", "Mathematics"),
    ("ENG", "English"),
    ("SCI", "Science"),
];

/// A throwaway store plus a monotonic clock for staging results
pub struct Fixture {
    pub db: Database,
    tick: Cell<i64>,
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Fixture {
    /// Fresh database with the default subjects registered
    pub fn new() -> Self {
        let db = Database::in_memory().expect("Failed to create test database");
        for (code, name) in DEFAULT_SUBJECTS {
            db.upsert_subject(code, name).expect("Failed to seed subject");
        }
        Self::with_db(db)
    }

    /// Wrap an existing database (subjects are not seeded)
    pub fn with_db(db: Database) -> Self {
        Self {
            db,
            tick: Cell::new(0),
        }
    }

    /// Timestamp for the next staged record
    pub fn next_timestamp(&self) -> DateTime<Utc> {
        let tick = self.tick.get();
        self.tick.set(tick + 1);
        base_time() + Duration::hours(tick)
    }

    pub fn student(&self, student_id: &str, name: &str, class: &str) {
        self.db
            .upsert_student(student_id, name, class)
            .expect("Failed to insert student");
    }

    pub fn subject(&self, subject_code: &str, subject_name: &str) {
        self.db
            .upsert_subject(subject_code, subject_name)
            .expect("Failed to insert subject");
    }

    /// Stage one approved result
    pub fn approved(&self, student_id: &str, subject_code: &str, score: f64) -> i64 {
        self.result(student_id, subject_code, score, ResultStatus::Approved)
    }

    /// Stage one result with an explicit status
    pub fn result(
        &self,
        student_id: &str,
        subject_code: &str,
        score: f64,
        status: ResultStatus,
    ) -> i64 {
        let at = self.next_timestamp();
        self.db
            .insert_result(student_id, subject_code, score, status, at)
            .expect("Failed to insert result")
    }

    /// Stage approved results in order
    pub fn scores(&self, student_id: &str, subject_code: &str, scores: &[f64]) {
        for score in scores {
            self.approved(student_id, subject_code, *score);
        }
    }

    /// Engine with default thresholds
    pub fn engine(&self) -> InsightEngine<'_> {
        InsightEngine::new(&self.db)
    }

    /// Engine with custom thresholds
    pub fn engine_with(&self, config: InsightConfig) -> InsightEngine<'_> {
        InsightEngine::with_config(&self.db, config)
    }
}

fn base_time() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(2024, 9, 2)
        .and_then(|d| d.and_hms_opt(8, 0, 0))
        .map(|dt| dt.and_utc())
        .expect("valid base time")
}

/// Assert two floats agree to within 1e-9
#[track_caller]
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
