//! Final-Grade Predictor
//!
//! Weighted average of a subject's results (later results count more) plus
//! a fraction of the first-to-last change, mapped onto the letter scale.

use tracing::debug;

use crate::error::Result;
use crate::grading::Grade;

use super::engine::InsightEngine;
use super::performance::MIN_RESULTS_FOR_PREDICTION;
use super::stats::{clamp_score, linspace, mean, round2, weighted_mean};
use super::types::{AnalysisStatus, Confidence, FinalGradePrediction, FinalGradeReport, GradeTrend};

/// Weight of the oldest and newest result
const FIRST_WEIGHT: f64 = 0.5;
const LAST_WEIGHT: f64 = 1.5;

/// Share of the first-to-last change added on top of the weighted average
const TREND_FACTOR: f64 = 0.2;

impl InsightEngine<'_> {
    /// Predict the final grade for one student in one subject
    pub fn predict_final_grade(
        &self,
        student_id: &str,
        subject_code: &str,
    ) -> Result<FinalGradeReport> {
        let scores = self.db.approved_scores_for_subject(student_id, subject_code)?;

        let prediction = predict_from_scores(&scores);
        debug!(
            student_id,
            subject_code,
            results = scores.len(),
            predicted = prediction.is_some(),
            "Final grade prediction"
        );

        let (status, message) = match &prediction {
            Some(_) => (
                AnalysisStatus::Ok,
                "Final grade predicted successfully".to_string(),
            ),
            None => (
                AnalysisStatus::InsufficientData,
                "Not enough data for prediction".to_string(),
            ),
        };

        Ok(FinalGradeReport {
            status,
            student_id: student_id.to_string(),
            subject_code: subject_code.to_string(),
            prediction,
            message,
        })
    }
}

/// Prediction from chronological scores; `None` with fewer than 2
pub fn predict_from_scores(scores: &[f64]) -> Option<FinalGradePrediction> {
    if scores.len() < MIN_RESULTS_FOR_PREDICTION {
        return None;
    }

    let weights = linspace(FIRST_WEIGHT, LAST_WEIGHT, scores.len());
    let weighted = weighted_mean(scores, &weights)?;

    let first = *scores.first()?;
    let last = *scores.last()?;
    let change = last - first;

    let predicted = clamp_score(weighted + change * TREND_FACTOR);
    let grade = Grade::from_score(predicted);

    let trend = if last > first {
        GradeTrend::Positive
    } else if last < first {
        GradeTrend::Negative
    } else {
        GradeTrend::Stable
    };

    let confidence = if scores.len() >= 4 {
        Confidence::High
    } else {
        Confidence::Medium
    };

    Some(FinalGradePrediction {
        predicted_score: round2(predicted),
        predicted_grade: grade,
        grade_points: grade.points(),
        current_average: round2(mean(scores)?),
        trend,
        confidence,
        results_count: scores.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::Fixture;

    #[test]
    fn test_two_scores_weighted_with_trend() {
        // (50*0.5 + 70*1.5) / 2 = 65, plus (70 - 50) * 0.2 = 69
        let p = predict_from_scores(&[50.0, 70.0]).unwrap();
        assert_eq!(p.predicted_score, 69.0);
        assert_eq!(p.predicted_grade, Grade::B);
        assert_eq!(p.grade_points, 4);
        assert_eq!(p.current_average, 60.0);
        assert_eq!(p.trend, GradeTrend::Positive);
        assert_eq!(p.confidence, Confidence::Medium);
        assert_eq!(p.results_count, 2);
    }

    #[test]
    fn test_confidence_high_from_four() {
        let p = predict_from_scores(&[60.0, 60.0, 60.0]).unwrap();
        assert_eq!(p.confidence, Confidence::Medium);
        assert_eq!(p.trend, GradeTrend::Stable);
        assert_eq!(p.predicted_score, 60.0);

        let p = predict_from_scores(&[60.0, 60.0, 60.0, 60.0]).unwrap();
        assert_eq!(p.confidence, Confidence::High);
    }

    #[test]
    fn test_clamped_to_scale() {
        // weighted 275 / 3 plus 10 -> 101.67
        let p = predict_from_scores(&[50.0, 100.0, 100.0]).unwrap();
        assert_eq!(p.predicted_score, 100.0);
        assert_eq!(p.predicted_grade, Grade::A);

        let p = predict_from_scores(&[40.0, 0.0]).unwrap();
        // weighted 10 - 8 = 2
        assert_eq!(p.predicted_score, 2.0);
        assert_eq!(p.trend, GradeTrend::Negative);
        assert_eq!(p.predicted_grade, Grade::F);
    }

    #[test]
    fn test_needs_two_scores() {
        assert!(predict_from_scores(&[]).is_none());
        assert!(predict_from_scores(&[88.0]).is_none());
    }

    #[test]
    fn test_report_from_store() {
        let fx = Fixture::new();
        fx.student("S1", "Ada", "10A");
        fx.scores("S1", "MATH", &[50.0, 70.0]);
        // other subjects do not leak in
        fx.scores("S1", "ENG", &[10.0, 10.0, 10.0]);

        let report = fx.engine().predict_final_grade("S1", "MATH").unwrap();
        assert_eq!(report.status, AnalysisStatus::Ok);
        assert_eq!(report.subject_code, "MATH");
        let p = report.prediction.unwrap();
        assert_eq!(p.predicted_score, 69.0);
        assert_eq!(p.predicted_grade, Grade::B);
    }

    #[test]
    fn test_report_insufficient_data() {
        let fx = Fixture::new();
        fx.student("S1", "Ada", "10A");
        fx.scores("S1", "MATH", &[50.0]);

        let report = fx.engine().predict_final_grade("S1", "MATH").unwrap();
        assert_eq!(report.status, AnalysisStatus::InsufficientData);
        assert!(report.prediction.is_none());
        assert_eq!(report.message, "Not enough data for prediction");
    }
}
