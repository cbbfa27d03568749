//! Comparative Insight
//!
//! Places a student against their class and against everyone, per subject.

use tracing::debug;

use crate::error::Result;
use crate::models::ComparativeAggregate;

use super::engine::InsightEngine;
use super::stats::round2;
use super::types::{AnalysisStatus, ComparativeInsight, ComparativeReport, Standing};

impl InsightEngine<'_> {
    /// Per-subject standing of one student relative to their class
    pub fn comparative_insights(&self, student_id: &str) -> Result<ComparativeReport> {
        let Some(class) = self.db.student_class(student_id)? else {
            debug!(student_id, "Comparative insight for unknown student");
            return Ok(ComparativeReport {
                status: AnalysisStatus::NotFound,
                student_id: student_id.to_string(),
                student_class: None,
                insights: Vec::new(),
                message: "Student not found".to_string(),
            });
        };

        let insights: Vec<ComparativeInsight> = self
            .db
            .comparative_aggregates(student_id, &class)?
            .iter()
            .filter_map(compare_subject)
            .collect();

        debug!(
            student_id,
            class = class.as_str(),
            subjects = insights.len(),
            "Comparative analysis complete"
        );

        let (status, message) = if insights.is_empty() {
            (
                AnalysisStatus::EmptyResult,
                "No results found for this student".to_string(),
            )
        } else {
            (
                AnalysisStatus::Ok,
                "Comparative analysis completed".to_string(),
            )
        };

        Ok(ComparativeReport {
            status,
            student_id: student_id.to_string(),
            student_class: Some(class),
            insights,
            message,
        })
    }
}

/// Insight for one subject; `None` when the student has no result in it
fn compare_subject(agg: &ComparativeAggregate) -> Option<ComparativeInsight> {
    let student_avg = agg.student_avg?;
    // The student is in the class, so a class average exists whenever theirs does
    let class_avg = agg.class_avg.unwrap_or(student_avg);

    let standing = Standing::classify(student_avg, class_avg);

    Some(ComparativeInsight {
        subject_code: agg.subject_code.clone(),
        subject: agg.subject_name.clone(),
        student_average: round2(student_avg),
        class_average: round2(class_avg),
        overall_average: round2(agg.overall_avg),
        difference_from_class: round2(student_avg - class_avg),
        percentile: round2(percentile(student_avg, agg.lowest, agg.highest)),
        standing,
        class_rank_estimate: standing.rank_estimate().to_string(),
    })
}

/// Position of `value` between `lowest` (0) and `highest` (100); 50 when
/// every score is the same
pub fn percentile(value: f64, lowest: f64, highest: f64) -> f64 {
    if highest == lowest {
        return 50.0;
    }
    (value - lowest) / (highest - lowest) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::test_utils::Fixture;

    #[test]
    fn test_percentile() {
        assert_eq!(percentile(70.0, 70.0, 70.0), 50.0);
        assert_eq!(percentile(40.0, 40.0, 90.0), 0.0);
        assert_eq!(percentile(90.0, 40.0, 90.0), 100.0);
        assert_eq!(percentile(65.0, 40.0, 90.0), 50.0);
    }

    #[test]
    fn test_unknown_student_not_found() {
        let fx = Fixture::new();
        let report = fx.engine().comparative_insights("NOPE").unwrap();
        assert_eq!(report.status, AnalysisStatus::NotFound);
        assert_eq!(report.message, "Student not found");
        assert!(report.insights.is_empty());
    }

    #[test]
    fn test_known_student_without_results() {
        let fx = Fixture::new();
        fx.student("S1", "Ada", "10A");
        fx.student("S2", "Ben", "10A");
        fx.scores("S2", "MATH", &[70.0]);

        let report = fx.engine().comparative_insights("S1").unwrap();
        assert_eq!(report.status, AnalysisStatus::EmptyResult);
        assert_eq!(report.student_class.as_deref(), Some("10A"));
        assert!(report.insights.is_empty());
    }

    #[test]
    fn test_class_and_global_averages() {
        let fx = Fixture::new();
        fx.student("S1", "Ada", "10A");
        fx.student("S2", "Ben", "10A");
        fx.student("S3", "Cy", "10B");
        fx.scores("S1", "MATH", &[90.0, 80.0]);
        fx.scores("S2", "MATH", &[60.0]);
        fx.scores("S3", "MATH", &[40.0]);
        // S1 has no English result, so English is skipped
        fx.scores("S2", "ENG", &[55.0]);

        let report = fx.engine().comparative_insights("S1").unwrap();
        assert_eq!(report.status, AnalysisStatus::Ok);
        assert_eq!(report.message, "Comparative analysis completed");
        assert_eq!(report.insights.len(), 1);

        let math = &report.insights[0];
        assert_eq!(math.subject_code, "MATH");
        assert_eq!(math.subject, "Mathematics");
        assert_eq!(math.student_average, 85.0);
        // (90 + 80 + 60) / 3
        assert_eq!(math.class_average, 76.67);
        // (90 + 80 + 60 + 40) / 4
        assert_eq!(math.overall_average, 67.5);
        assert_eq!(math.difference_from_class, 8.33);
        // (85 - 40) / (90 - 40)
        assert_eq!(math.percentile, 90.0);
        assert_eq!(math.standing, Standing::AboveAverage);
        assert_eq!(math.class_rank_estimate, "Top 25%");
    }

    #[test]
    fn test_rank_estimate_follows_standing_not_percentile() {
        let fx = Fixture::new();
        fx.student("S1", "Ada", "10A");
        fx.student("S2", "Ben", "10A");
        fx.scores("S1", "MATH", &[50.0]);
        fx.scores("S2", "MATH", &[90.0]);

        let report = fx.engine().comparative_insights("S1").unwrap();
        let math = &report.insights[0];
        // class average 70, 20 below
        assert_eq!(math.standing, Standing::BelowAverage);
        assert_eq!(math.class_rank_estimate, "Bottom 50%");
        assert_eq!(math.percentile, 0.0);

        let report = fx.engine().comparative_insights("S2").unwrap();
        let math = &report.insights[0];
        assert_eq!(math.standing, Standing::Excellent);
        assert_eq!(math.class_rank_estimate, "Top 10%");
        assert_eq!(math.percentile, 100.0);
    }

    #[test]
    fn test_identical_scores_degenerate_percentile() {
        let fx = Fixture::new();
        fx.student("S1", "Ada", "10A");
        fx.student("S2", "Ben", "10A");
        fx.scores("S1", "MATH", &[72.0]);
        fx.scores("S2", "MATH", &[72.0]);

        let report = fx.engine().comparative_insights("S1").unwrap();
        let math = &report.insights[0];
        assert_eq!(math.percentile, 50.0);
        assert_eq!(math.difference_from_class, 0.0);
        // a difference of 0 meets the ">= 0" band
        assert_eq!(math.standing, Standing::AboveAverage);
    }
}
