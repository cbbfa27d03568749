//! Risk Identifier
//!
//! Flags students whose average is below the failing threshold, or who have
//! failed at least one assessment.

use tracing::debug;

use crate::error::Result;
use crate::models::StudentAggregate;

use super::engine::InsightEngine;
use super::stats::round2;
use super::types::{AnalysisStatus, RiskEntry, RiskLevel, RiskReport};

impl InsightEngine<'_> {
    /// Students at risk of failing, worst average first
    ///
    /// `threshold` defaults to the configured failing threshold (60).
    pub fn identify_at_risk(
        &self,
        threshold: Option<f64>,
        class_filter: Option<&str>,
    ) -> Result<RiskReport> {
        let threshold = threshold.unwrap_or(self.config.failing_threshold);
        let aggregates = self.db.student_aggregates(threshold, class_filter)?;

        // (unrounded average, entry) so ordering ignores display rounding
        let mut ranked: Vec<(f64, RiskEntry)> = aggregates
            .iter()
            .filter_map(|agg| self.assess(agg, threshold))
            .collect();

        // Stable sort keeps student id order among equal averages
        ranked.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        let students: Vec<RiskEntry> = ranked.into_iter().map(|(_, entry)| entry).collect();

        debug!(
            threshold,
            class = class_filter.unwrap_or("all"),
            scanned = aggregates.len(),
            at_risk = students.len(),
            "Risk identification complete"
        );

        let (status, message) = if students.is_empty() {
            (
                AnalysisStatus::EmptyResult,
                "No students at risk".to_string(),
            )
        } else {
            (
                AnalysisStatus::Ok,
                format!("{} students at risk", students.len()),
            )
        };

        Ok(RiskReport {
            status,
            threshold,
            class: class_filter.map(str::to_string),
            students,
            message,
        })
    }

    /// Raw average and risk entry for one student, or `None` if they are not at risk
    fn assess(&self, agg: &StudentAggregate, threshold: f64) -> Option<(f64, RiskEntry)> {
        // No approved results means nothing to judge
        let average = agg.average?;

        if !(average < threshold || agg.failing_count > 0) {
            return None;
        }

        let entry = RiskEntry {
            student_id: agg.student_id.clone(),
            name: agg.name.clone(),
            class: agg.class.clone(),
            average_score: round2(average),
            total_results: agg.total_results,
            failing_count: agg.failing_count,
            risk_level: risk_level(average, threshold, self.config.high_risk_below),
        };
        Some((average, entry))
    }
}

/// High below `high_risk_below`, medium below `threshold`, otherwise low
pub fn risk_level(average: f64, threshold: f64, high_risk_below: f64) -> RiskLevel {
    if average < high_risk_below {
        RiskLevel::High
    } else if average < threshold {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::Fixture;

    #[test]
    fn test_risk_levels() {
        assert_eq!(risk_level(45.0, 60.0, 50.0), RiskLevel::High);
        assert_eq!(risk_level(50.0, 60.0, 50.0), RiskLevel::Medium);
        assert_eq!(risk_level(59.9, 60.0, 50.0), RiskLevel::Medium);
        assert_eq!(risk_level(60.0, 60.0, 50.0), RiskLevel::Low);
    }

    #[test]
    fn test_medium_and_high_risk_students() {
        let fx = Fixture::new();
        fx.student("S1", "Ada", "10A");
        fx.student("S2", "Ben", "10A");
        // average 55 across 3 results, one below 60
        fx.scores("S1", "MATH", &[45.0, 60.0, 60.0]);
        fx.scores("S2", "MATH", &[45.0, 45.0]);

        let report = fx.engine().identify_at_risk(Some(60.0), None).unwrap();
        assert_eq!(report.status, AnalysisStatus::Ok);
        assert_eq!(report.students.len(), 2);

        // worst first
        assert_eq!(report.students[0].student_id, "S2");
        assert_eq!(report.students[0].risk_level, RiskLevel::High);
        assert_eq!(report.students[0].average_score, 45.0);

        assert_eq!(report.students[1].student_id, "S1");
        assert_eq!(report.students[1].risk_level, RiskLevel::Medium);
        assert_eq!(report.students[1].average_score, 55.0);
        assert_eq!(report.students[1].total_results, 3);
        assert_eq!(report.students[1].failing_count, 1);
    }

    #[test]
    fn test_order_uses_unrounded_average() {
        let fx = Fixture::new();
        fx.student("S1", "Ada", "10A");
        fx.student("S2", "Ben", "10A");
        fx.scores("S1", "MATH", &[45.004]);
        fx.scores("S2", "MATH", &[45.001]);

        let report = fx.engine().identify_at_risk(None, None).unwrap();
        let ids: Vec<&str> = report
            .students
            .iter()
            .map(|s| s.student_id.as_str())
            .collect();
        assert_eq!(ids, vec!["S2", "S1"]);

        // Both display the same rounded average
        assert_eq!(report.students[0].average_score, 45.0);
        assert_eq!(report.students[1].average_score, 45.0);
    }

    #[test]
    fn test_low_risk_via_single_failure() {
        let fx = Fixture::new();
        fx.student("S1", "Ada", "10A");
        fx.scores("S1", "MATH", &[90.0, 85.0, 55.0]);

        let report = fx.engine().identify_at_risk(None, None).unwrap();
        assert_eq!(report.threshold, 60.0);
        assert_eq!(report.students.len(), 1);
        assert_eq!(report.students[0].risk_level, RiskLevel::Low);
        assert_eq!(report.students[0].failing_count, 1);
    }

    #[test]
    fn test_passing_students_and_empty_students_excluded() {
        let fx = Fixture::new();
        fx.student("S1", "Ada", "10A");
        fx.student("S2", "Ben", "10A");
        fx.scores("S1", "MATH", &[70.0, 80.0]);

        let report = fx.engine().identify_at_risk(None, None).unwrap();
        assert_eq!(report.status, AnalysisStatus::EmptyResult);
        assert!(report.students.is_empty());
    }

    #[test]
    fn test_class_filter() {
        let fx = Fixture::new();
        fx.student("S1", "Ada", "10A");
        fx.student("S2", "Ben", "10B");
        fx.scores("S1", "MATH", &[40.0]);
        fx.scores("S2", "MATH", &[30.0]);

        let report = fx.engine().identify_at_risk(None, Some("10B")).unwrap();
        assert_eq!(report.class.as_deref(), Some("10B"));
        assert_eq!(report.students.len(), 1);
        assert_eq!(report.students[0].student_id, "S2");
    }

    #[test]
    fn test_configured_threshold_is_default() {
        let fx = Fixture::new();
        fx.student("S1", "Ada", "10A");
        fx.scores("S1", "MATH", &[72.0, 74.0]);

        let config = crate::config::InsightConfig {
            failing_threshold: 75.0,
            ..Default::default()
        };
        let report = fx.engine_with(config).identify_at_risk(None, None).unwrap();
        assert_eq!(report.students.len(), 1);
        assert_eq!(report.students[0].risk_level, RiskLevel::Medium);
    }
}
