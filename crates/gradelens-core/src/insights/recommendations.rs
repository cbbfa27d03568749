//! Recommendation Generator
//!
//! One piece of advice per subject, banded by the subject average, plus a
//! note on how consistent the student's scores have been.

use tracing::debug;

use crate::error::Result;
use crate::models::SubjectAggregate;

use super::engine::InsightEngine;
use super::stats::{mean, round2};
use super::types::{AnalysisStatus, Priority, RecommendationEntry, RecommendationReport};

impl InsightEngine<'_> {
    /// Per-subject study recommendations, most urgent first
    pub fn recommendations(&self, student_id: &str) -> Result<RecommendationReport> {
        let subjects = self.db.subject_aggregates_for_student(student_id)?;

        if subjects.is_empty() {
            debug!(student_id, "No approved results for recommendations");
            return Ok(RecommendationReport {
                status: AnalysisStatus::EmptyResult,
                student_id: student_id.to_string(),
                recommendations: Vec::new(),
                overall_average: None,
                message: "No results found for this student".to_string(),
            });
        }

        let mut recommendations: Vec<RecommendationEntry> = subjects
            .iter()
            .map(|agg| self.recommend_subject(agg))
            .collect();

        // sort_by_key is stable, so equal priorities keep subject order
        recommendations.sort_by_key(|r| r.priority);

        let averages: Vec<f64> = subjects.iter().map(|s| s.average).collect();
        let overall_average = mean(&averages).map(round2);

        debug!(
            student_id,
            subjects = recommendations.len(),
            "Recommendations generated"
        );

        Ok(RecommendationReport {
            status: AnalysisStatus::Ok,
            student_id: student_id.to_string(),
            recommendations,
            overall_average,
            message: "Recommendations generated successfully".to_string(),
        })
    }

    fn recommend_subject(&self, agg: &SubjectAggregate) -> RecommendationEntry {
        let priority = Priority::from_average(agg.average);
        let range = agg.max - agg.min;

        let consistency = if range > self.config.variability_range {
            format!(
                "Performance varies significantly (range: {:.1}). Work on maintaining consistency.",
                range
            )
        } else {
            "Performance is consistent. Keep up the good work!".to_string()
        };

        RecommendationEntry {
            subject_code: agg.subject_code.clone(),
            subject: agg.subject_name.clone(),
            average: round2(agg.average),
            priority,
            advice: priority.advice(&agg.subject_name),
            consistency,
            best_score: round2(agg.max),
            worst_score: round2(agg.min),
            improvement_potential: round2(100.0 - agg.average),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::Fixture;

    #[test]
    fn test_no_results_is_empty() {
        let fx = Fixture::new();
        fx.student("S1", "Ada", "10A");

        let report = fx.engine().recommendations("S1").unwrap();
        assert_eq!(report.status, AnalysisStatus::EmptyResult);
        assert!(report.recommendations.is_empty());
        assert_eq!(report.overall_average, None);
        assert_eq!(report.message, "No results found for this student");
    }

    #[test]
    fn test_sorted_by_priority() {
        let fx = Fixture::new();
        fx.student("S1", "Ada", "10A");
        fx.scores("S1", "ENG", &[80.0, 90.0]);
        fx.scores("S1", "MATH", &[40.0, 45.0]);
        fx.scores("S1", "SCI", &[50.0, 60.0]);

        let report = fx.engine().recommendations("S1").unwrap();
        assert_eq!(report.status, AnalysisStatus::Ok);

        let order: Vec<(&str, Priority)> = report
            .recommendations
            .iter()
            .map(|r| (r.subject_code.as_str(), r.priority))
            .collect();
        assert_eq!(
            order,
            vec![
                ("MATH", Priority::Critical),
                ("SCI", Priority::High),
                ("ENG", Priority::Low),
            ]
        );

        let math = &report.recommendations[0];
        assert_eq!(math.average, 42.5);
        assert_eq!(math.improvement_potential, 57.5);
        assert_eq!(math.best_score, 45.0);
        assert_eq!(math.worst_score, 40.0);
        assert!(math.advice.contains("Mathematics"));
        assert!(math.advice.starts_with("Requires immediate attention"));

        // (85 + 42.5 + 55) / 3
        assert_eq!(report.overall_average, Some(60.83));
    }

    #[test]
    fn test_equal_priorities_keep_subject_order() {
        let fx = Fixture::new();
        fx.student("S1", "Ada", "10A");
        fx.scores("S1", "SCI", &[62.0]);
        fx.scores("S1", "ENG", &[70.0]);
        fx.scores("S1", "MATH", &[64.0]);

        let report = fx.engine().recommendations("S1").unwrap();
        let codes: Vec<&str> = report
            .recommendations
            .iter()
            .map(|r| r.subject_code.as_str())
            .collect();
        // all medium; aggregation order is by subject code
        assert_eq!(codes, vec!["ENG", "MATH", "SCI"]);
    }

    #[test]
    fn test_consistency_note() {
        let fx = Fixture::new();
        fx.student("S1", "Ada", "10A");
        fx.scores("S1", "MATH", &[40.0, 90.0]);
        fx.scores("S1", "ENG", &[60.0, 90.0]);

        let report = fx.engine().recommendations("S1").unwrap();
        let eng = report
            .recommendations
            .iter()
            .find(|r| r.subject_code == "ENG")
            .unwrap();
        let math = report
            .recommendations
            .iter()
            .find(|r| r.subject_code == "MATH")
            .unwrap();

        // a range of exactly 30 is still consistent
        assert_eq!(
            eng.consistency,
            "Performance is consistent. Keep up the good work!"
        );
        assert_eq!(
            math.consistency,
            "Performance varies significantly (range: 50.0). Work on maintaining consistency."
        );
    }

    #[test]
    fn test_pending_results_ignored() {
        let fx = Fixture::new();
        fx.student("S1", "Ada", "10A");
        fx.result("S1", "MATH", 20.0, crate::models::ResultStatus::Pending);

        let report = fx.engine().recommendations("S1").unwrap();
        assert_eq!(report.status, AnalysisStatus::EmptyResult);
    }
}
