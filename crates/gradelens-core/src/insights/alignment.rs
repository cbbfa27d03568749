//! Grade-Alignment Checker
//!
//! Compares a proposed score with the student's history in the subject and
//! suggests whether to accept it as is, review it, or verify it.

use tracing::debug;

use crate::error::Result;

use super::engine::InsightEngine;
use super::stats::{mean, population_std_dev, round2};
use super::types::{AlignmentReport, AnalysisStatus, Confidence, Suggestion};

const NO_HISTORY: &str = "No historical data available";

impl InsightEngine<'_> {
    /// Check a proposed score against the student's past results in a subject
    pub fn check_grade_alignment(
        &self,
        student_id: &str,
        subject_code: &str,
        proposed_score: f64,
    ) -> Result<AlignmentReport> {
        let history = self.db.approved_scores_for_subject(student_id, subject_code)?;
        let check = assess_alignment(&history, proposed_score);

        debug!(
            student_id,
            subject_code,
            proposed_score,
            history = history.len(),
            suggestion = check.suggestion.as_str(),
            "Grade alignment checked"
        );

        let (status, message) = if history.is_empty() {
            (AnalysisStatus::InsufficientData, NO_HISTORY)
        } else {
            (AnalysisStatus::Ok, "Grade check completed")
        };

        Ok(AlignmentReport {
            status,
            student_id: student_id.to_string(),
            subject_code: subject_code.to_string(),
            proposed_score,
            suggestion: check.suggestion,
            confidence: check.confidence,
            reason: check.reason,
            typical_average: check.mean.map(round2),
            standard_deviation: check.std_dev.map(round2),
            history_count: history.len(),
            message: message.to_string(),
        })
    }
}

/// Outcome of comparing one score with a history
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentCheck {
    pub suggestion: Suggestion,
    pub confidence: Confidence,
    pub reason: String,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
}

/// Beyond two standard deviations: verify; beyond one: review; else accept
pub fn assess_alignment(history: &[f64], proposed: f64) -> AlignmentCheck {
    let (Some(m), Some(sd)) = (mean(history), population_std_dev(history)) else {
        return AlignmentCheck {
            suggestion: Suggestion::Accept,
            confidence: Confidence::Low,
            reason: NO_HISTORY.to_string(),
            mean: None,
            std_dev: None,
        };
    };

    let deviation = proposed - m;

    let (suggestion, confidence, reason) = if deviation.abs() > 2.0 * sd {
        let direction = if deviation > 0.0 { "higher" } else { "lower" };
        (
            Suggestion::Verify,
            Confidence::High,
            format!(
                "Marks significantly {} than usual (typical: {:.1}±{:.1})",
                direction, m, sd
            ),
        )
    } else if deviation.abs() > sd {
        (
            Suggestion::Review,
            Confidence::Medium,
            format!(
                "Marks somewhat different from typical performance (usual: {:.1}±{:.1})",
                m, sd
            ),
        )
    } else {
        (
            Suggestion::Accept,
            Confidence::High,
            format!(
                "Marks align with typical performance (usual: {:.1}±{:.1})",
                m, sd
            ),
        )
    };

    AlignmentCheck {
        suggestion,
        confidence,
        reason,
        mean: Some(m),
        std_dev: Some(sd),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::Fixture;

    const HISTORY: [f64; 4] = [70.0, 72.0, 68.0, 71.0];

    #[test]
    fn test_far_above_history_needs_verification() {
        let check = assess_alignment(&HISTORY, 95.0);
        assert_eq!(check.suggestion, Suggestion::Verify);
        assert_eq!(check.confidence, Confidence::High);
        assert!(check.reason.starts_with("Marks significantly higher than usual (typical: 70."));
        assert!(check.reason.ends_with("±1.5)"));
    }

    #[test]
    fn test_far_below_history_mentions_direction() {
        let check = assess_alignment(&HISTORY, 40.0);
        assert_eq!(check.suggestion, Suggestion::Verify);
        assert!(check.reason.contains("lower"));
    }

    #[test]
    fn test_between_one_and_two_deviations_needs_review() {
        // mean 70.25, sd ~1.479: 72.5 is 2.25 away
        let check = assess_alignment(&HISTORY, 72.5);
        assert_eq!(check.suggestion, Suggestion::Review);
        assert_eq!(check.confidence, Confidence::Medium);
        assert!(check
            .reason
            .starts_with("Marks somewhat different from typical performance (usual: 70."));
        assert!(check.reason.ends_with("±1.5)"));
    }

    #[test]
    fn test_within_one_deviation_accepted() {
        let check = assess_alignment(&HISTORY, 71.0);
        assert_eq!(check.suggestion, Suggestion::Accept);
        assert_eq!(check.confidence, Confidence::High);
        assert!(check
            .reason
            .starts_with("Marks align with typical performance (usual: 70."));
    }

    #[test]
    fn test_flat_history_flags_any_change() {
        let check = assess_alignment(&[60.0, 60.0], 61.0);
        assert_eq!(check.suggestion, Suggestion::Verify);

        let check = assess_alignment(&[60.0, 60.0], 60.0);
        assert_eq!(check.suggestion, Suggestion::Accept);
    }

    #[test]
    fn test_no_history_accepts_with_low_confidence() {
        let check = assess_alignment(&[], 88.0);
        assert_eq!(check.suggestion, Suggestion::Accept);
        assert_eq!(check.confidence, Confidence::Low);
        assert_eq!(check.reason, "No historical data available");
        assert_eq!(check.mean, None);
        assert_eq!(check.std_dev, None);
    }

    #[test]
    fn test_report_carries_statistics() {
        let fx = Fixture::new();
        fx.student("S1", "Ada", "10A");
        fx.scores("S1", "MATH", &HISTORY);

        let report = fx
            .engine()
            .check_grade_alignment("S1", "MATH", 95.0)
            .unwrap();
        assert_eq!(report.status, AnalysisStatus::Ok);
        assert_eq!(report.suggestion, Suggestion::Verify);
        assert_eq!(report.typical_average, Some(70.25));
        assert_eq!(report.standard_deviation, Some(1.48));
        assert_eq!(report.history_count, 4);
        assert_eq!(report.proposed_score, 95.0);
        assert_eq!(report.message, "Grade check completed");
    }

    #[test]
    fn test_report_without_history() {
        let fx = Fixture::new();
        fx.student("S1", "Ada", "10A");

        let report = fx
            .engine()
            .check_grade_alignment("S1", "MATH", 50.0)
            .unwrap();
        assert_eq!(report.status, AnalysisStatus::InsufficientData);
        assert_eq!(report.suggestion, Suggestion::Accept);
        assert_eq!(report.confidence, Confidence::Low);
        assert_eq!(report.history_count, 0);
        assert_eq!(report.message, "No historical data available");
    }
}
