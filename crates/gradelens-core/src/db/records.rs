//! Assessment record reads, plus the write helpers used to stage records

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};
use serde::Serialize;

use super::{parse_datetime, Database, TIMESTAMP_FORMAT};
use crate::error::{Error, Result};
use crate::models::{AssessmentRecord, NamedAssessment, ResultStatus, StudentProfile};

/// Row counts for status output
#[derive(Debug, Clone, Default, Serialize)]
pub struct StoreCounts {
    pub students: i64,
    pub subjects: i64,
    pub approved_results: i64,
    pub pending_results: i64,
}

/// Record row as read from SQLite, before timestamp/status parsing
struct RawRecord {
    id: i64,
    student_id: String,
    subject_code: String,
    subject_name: String,
    score: f64,
    status: String,
    created_at: String,
}

impl RawRecord {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            student_id: row.get(1)?,
            subject_code: row.get(2)?,
            subject_name: row.get(3)?,
            score: row.get(4)?,
            status: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    fn into_record(self) -> Result<AssessmentRecord> {
        let status: ResultStatus = self.status.parse().map_err(Error::InvalidData)?;
        Ok(AssessmentRecord {
            id: self.id,
            student_id: self.student_id,
            subject_code: self.subject_code,
            subject_name: self.subject_name,
            score: self.score,
            status,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl Database {
    /// Insert or update a student in the registry tables
    pub fn upsert_student(&self, student_id: &str, name: &str, class: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO students (student_id, name, class) VALUES (?1, ?2, ?3)
            ON CONFLICT(student_id) DO UPDATE SET name = excluded.name, class = excluded.class
            "#,
            params![student_id, name, class],
        )?;
        Ok(())
    }

    /// Insert or update a subject
    pub fn upsert_subject(&self, subject_code: &str, subject_name: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO subjects (subject_code, subject_name) VALUES (?1, ?2)
            ON CONFLICT(subject_code) DO UPDATE SET subject_name = excluded.subject_name
            "#,
            params![subject_code, subject_name],
        )?;
        Ok(())
    }

    /// Insert an assessment result with an explicit status and timestamp
    pub fn insert_result(
        &self,
        student_id: &str,
        subject_code: &str,
        score: f64,
        status: ResultStatus,
        created_at: DateTime<Utc>,
    ) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO results (student_id, subject_code, marks, status, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                student_id,
                subject_code,
                score,
                status.as_str(),
                created_at.format(TIMESTAMP_FORMAT).to_string()
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Look up a student profile
    pub fn get_student(&self, student_id: &str) -> Result<Option<StudentProfile>> {
        let conn = self.conn()?;
        let student = conn
            .query_row(
                "SELECT student_id, name, class FROM students WHERE student_id = ?",
                params![student_id],
                |row| {
                    Ok(StudentProfile {
                        student_id: row.get(0)?,
                        name: row.get(1)?,
                        class: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(student)
    }

    /// Class/cohort label of a student, if the student exists
    pub fn student_class(&self, student_id: &str) -> Result<Option<String>> {
        let conn = self.conn()?;
        let class = conn
            .query_row(
                "SELECT class FROM students WHERE student_id = ?",
                params![student_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(class)
    }

    /// All approved records for a student, oldest first, with subject names
    pub fn approved_records_for_student(&self, student_id: &str) -> Result<Vec<AssessmentRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT r.id, r.student_id, r.subject_code, s.subject_name, r.marks, r.status, r.created_at
            FROM results r
            JOIN subjects s ON r.subject_code = s.subject_code
            WHERE r.student_id = ? AND r.status = 'approved'
            ORDER BY r.created_at, r.id
            "#,
        )?;

        let rows = stmt.query_map(params![student_id], RawRecord::from_row)?;
        let raw: std::result::Result<Vec<_>, _> = rows.collect();
        raw?.into_iter().map(RawRecord::into_record).collect()
    }

    /// Approved scores for one (student, subject) pair, oldest first
    pub fn approved_scores_for_subject(
        &self,
        student_id: &str,
        subject_code: &str,
    ) -> Result<Vec<f64>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT marks
            FROM results
            WHERE student_id = ? AND subject_code = ? AND status = 'approved'
            ORDER BY created_at, id
            "#,
        )?;

        let rows = stmt.query_map(params![student_id, subject_code], |row| row.get(0))?;
        let scores: std::result::Result<Vec<f64>, _> = rows.collect();
        Ok(scores?)
    }

    /// Every approved record with student and subject names, grouped by
    /// student and oldest first within each student
    pub fn all_approved_records(&self) -> Result<Vec<NamedAssessment>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT r.id, r.student_id, r.subject_code, sub.subject_name, r.marks, r.status,
                   r.created_at, st.name
            FROM results r
            JOIN students st ON r.student_id = st.student_id
            JOIN subjects sub ON r.subject_code = sub.subject_code
            WHERE r.status = 'approved'
            ORDER BY r.student_id, r.created_at, r.id
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            let name: String = row.get(7)?;
            Ok((name, RawRecord::from_row(row)?))
        })?;
        let raw: std::result::Result<Vec<_>, _> = rows.collect();

        raw?.into_iter()
            .map(|(student_name, record)| {
                Ok(NamedAssessment {
                    student_name,
                    record: record.into_record()?,
                })
            })
            .collect()
    }

    /// Row counts for status output
    pub fn counts(&self) -> Result<StoreCounts> {
        let conn = self.conn()?;
        let count = |sql: &str| -> Result<i64> { Ok(conn.query_row(sql, [], |row| row.get(0))?) };

        Ok(StoreCounts {
            students: count("SELECT COUNT(*) FROM students")?,
            subjects: count("SELECT COUNT(*) FROM subjects")?,
            approved_results: count("SELECT COUNT(*) FROM results WHERE status = 'approved'")?,
            pending_results: count("SELECT COUNT(*) FROM results WHERE status = 'pending'")?,
        })
    }
}
