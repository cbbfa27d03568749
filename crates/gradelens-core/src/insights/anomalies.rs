//! Anomaly Detector
//!
//! Scans every student's approved results for two patterns worth a second
//! look: a large jump between consecutive results, and a run of near-perfect
//! scores.
//!
//! Consecutive results are compared across the student's whole record
//! stream, not per subject, so a weak subject followed by a strong one can
//! register as an improvement.

use tracing::debug;

use crate::error::Result;
use crate::models::NamedAssessment;

use super::engine::InsightEngine;
use super::stats::round2;
use super::types::{AnalysisStatus, AnomalyEntry, AnomalyReport, AnomalySeverity, PERFECT_SCORE_NOTE};

impl InsightEngine<'_> {
    /// Unusual patterns across all students' approved results
    pub fn detect_anomalies(&self) -> Result<AnomalyReport> {
        let records = self.db.all_approved_records()?;

        let mut anomalies = Vec::new();
        for stream in student_streams(&records) {
            anomalies.extend(self.sudden_improvements(stream));
            anomalies.extend(self.perfect_scores(stream));
        }

        debug!(
            scanned = records.len(),
            anomalies = anomalies.len(),
            "Anomaly scan complete"
        );

        let (status, message) = if anomalies.is_empty() {
            (
                AnalysisStatus::EmptyResult,
                "No anomalies detected".to_string(),
            )
        } else {
            (
                AnalysisStatus::Ok,
                format!("{} anomalies detected", anomalies.len()),
            )
        };

        Ok(AnomalyReport {
            status,
            anomalies,
            message,
        })
    }

    /// Consecutive pairs where the score rose by more than the configured jump
    fn sudden_improvements(&self, stream: &[NamedAssessment]) -> Vec<AnomalyEntry> {
        stream
            .windows(2)
            .filter_map(|pair| {
                let (prev, curr) = (&pair[0].record, &pair[1]);
                let increase = curr.record.score - prev.score;
                if increase <= self.config.sudden_improvement_increase {
                    return None;
                }

                let severity = if increase > self.config.high_severity_increase {
                    AnomalySeverity::High
                } else {
                    AnomalySeverity::Medium
                };

                Some(AnomalyEntry::SuddenImprovement {
                    student_id: curr.record.student_id.clone(),
                    student_name: curr.student_name.clone(),
                    subject_code: curr.record.subject_code.clone(),
                    subject: curr.record.subject_name.clone(),
                    previous_score: round2(prev.score),
                    current_score: round2(curr.record.score),
                    increase: round2(increase),
                    severity,
                    date: curr.record.created_at,
                })
            })
            .collect()
    }

    fn perfect_scores(&self, stream: &[NamedAssessment]) -> Option<AnomalyEntry> {
        let first = stream.first()?;
        let count = stream
            .iter()
            .filter(|r| r.record.score >= self.config.perfect_score)
            .count();

        if count < self.config.perfect_score_count {
            return None;
        }

        Some(AnomalyEntry::MultiplePerfectScores {
            student_id: first.record.student_id.clone(),
            student_name: first.student_name.clone(),
            count,
            severity: AnomalySeverity::Low,
            note: PERFECT_SCORE_NOTE.to_string(),
        })
    }
}

/// Split records (ordered by student, then time) into one slice per student
fn student_streams(records: &[NamedAssessment]) -> Vec<&[NamedAssessment]> {
    let mut streams = Vec::new();
    let mut start = 0;
    for i in 1..=records.len() {
        if i == records.len() || records[i].record.student_id != records[start].record.student_id {
            streams.push(&records[start..i]);
            start = i;
        }
    }
    streams
}
