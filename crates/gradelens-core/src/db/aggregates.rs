//! Aggregation queries over approved results

use rusqlite::params;

use super::Database;
use crate::error::Result;
use crate::models::{ComparativeAggregate, StudentAggregate, SubjectAggregate};

impl Database {
    /// Per-student average, result count and count of results below
    /// `threshold`, optionally limited to one class
    ///
    /// Students without approved results are included with no average.
    /// Rows come back ordered by student id.
    pub fn student_aggregates(
        &self,
        threshold: f64,
        class_filter: Option<&str>,
    ) -> Result<Vec<StudentAggregate>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT s.student_id, s.name, s.class,
                   AVG(r.marks) AS avg_marks,
                   COUNT(r.id) AS total_results,
                   COALESCE(SUM(CASE WHEN r.marks < ?1 THEN 1 ELSE 0 END), 0) AS failing_count
            FROM students s
            LEFT JOIN results r ON s.student_id = r.student_id AND r.status = 'approved'
            WHERE ?2 IS NULL OR s.class = ?2
            GROUP BY s.student_id, s.name, s.class
            ORDER BY s.student_id
            "#,
        )?;

        let rows = stmt.query_map(params![threshold, class_filter], |row| {
            Ok(StudentAggregate {
                student_id: row.get(0)?,
                name: row.get(1)?,
                class: row.get(2)?,
                average: row.get(3)?,
                total_results: row.get(4)?,
                failing_count: row.get(5)?,
            })
        })?;

        let aggregates: std::result::Result<Vec<_>, _> = rows.collect();
        Ok(aggregates?)
    }

    /// Per-subject mean, count, best and worst score for one student,
    /// ordered by subject code
    pub fn subject_aggregates_for_student(&self, student_id: &str) -> Result<Vec<SubjectAggregate>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT r.subject_code, sub.subject_name,
                   AVG(r.marks), COUNT(r.id), MAX(r.marks), MIN(r.marks)
            FROM results r
            JOIN subjects sub ON r.subject_code = sub.subject_code
            WHERE r.student_id = ? AND r.status = 'approved'
            GROUP BY r.subject_code, sub.subject_name
            ORDER BY r.subject_code
            "#,
        )?;

        let rows = stmt.query_map(params![student_id], |row| {
            Ok(SubjectAggregate {
                subject_code: row.get(0)?,
                subject_name: row.get(1)?,
                average: row.get(2)?,
                count: row.get(3)?,
                max: row.get(4)?,
                min: row.get(5)?,
            })
        })?;

        let aggregates: std::result::Result<Vec<_>, _> = rows.collect();
        Ok(aggregates?)
    }

    /// Per-subject averages for one student, their class and everyone, with
    /// the global best and worst score, ordered by subject code
    pub fn comparative_aggregates(
        &self,
        student_id: &str,
        class: &str,
    ) -> Result<Vec<ComparativeAggregate>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT r.subject_code, sub.subject_name,
                   AVG(CASE WHEN r.student_id = ?1 THEN r.marks END) AS student_avg,
                   AVG(CASE WHEN s.class = ?2 THEN r.marks END) AS class_avg,
                   AVG(r.marks) AS overall_avg,
                   MAX(r.marks) AS highest_marks,
                   MIN(r.marks) AS lowest_marks
            FROM results r
            JOIN students s ON r.student_id = s.student_id
            JOIN subjects sub ON r.subject_code = sub.subject_code
            WHERE r.status = 'approved'
            GROUP BY r.subject_code, sub.subject_name
            ORDER BY r.subject_code
            "#,
        )?;

        let rows = stmt.query_map(params![student_id, class], |row| {
            Ok(ComparativeAggregate {
                subject_code: row.get(0)?,
                subject_name: row.get(1)?,
                student_avg: row.get(2)?,
                class_avg: row.get(3)?,
                overall_avg: row.get(4)?,
                highest: row.get(5)?,
                lowest: row.get(6)?,
            })
        })?;

        let aggregates: std::result::Result<Vec<_>, _> = rows.collect();
        Ok(aggregates?)
    }
}
