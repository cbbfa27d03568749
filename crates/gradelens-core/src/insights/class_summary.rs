//! Class Summary
//!
//! Cohort-level view: class average, best performers, students who need
//! attention, how averages spread across bands, and the pass rate.
//!
//! Students with no approved results count toward the class size (and so the
//! pass-rate denominator) but not toward averages or bands.

use std::cmp::Ordering;

use tracing::debug;

use crate::error::Result;
use crate::models::StudentAggregate;

use super::engine::InsightEngine;
use super::stats::{mean, round2};
use super::types::{
    AnalysisStatus, AttentionSummary, ClassSummaryReport, PerformanceDistribution,
    PerformerSummary,
};

/// How many top performers to list
const TOP_PERFORMERS: usize = 3;

/// Band lower bounds
const EXCELLENT_FROM: f64 = 85.0;
const GOOD_FROM: f64 = 70.0;

impl InsightEngine<'_> {
    /// Summary of one class
    pub fn class_summary(&self, class_name: &str) -> Result<ClassSummaryReport> {
        let pass_mark = self.config.pass_mark;
        let students = self.db.student_aggregates(pass_mark, Some(class_name))?;

        if students.is_empty() {
            debug!(class = class_name, "No students in class");
            return Ok(ClassSummaryReport {
                status: AnalysisStatus::EmptyResult,
                class_name: class_name.to_string(),
                total_students: 0,
                class_average: None,
                top_performers: Vec::new(),
                students_needing_attention: Vec::new(),
                performance_distribution: PerformanceDistribution::default(),
                pass_rate: 0.0,
                message: "No data found for this class".to_string(),
            });
        }

        // (aggregate, average) for students that have results
        let mut graded: Vec<(&StudentAggregate, f64)> = students
            .iter()
            .filter_map(|s| s.average.map(|avg| (s, avg)))
            .collect();

        let averages: Vec<f64> = graded.iter().map(|(_, avg)| *avg).collect();
        let class_average = mean(&averages).map(round2);

        let mut distribution = PerformanceDistribution::default();
        for avg in &averages {
            match *avg {
                a if a >= EXCELLENT_FROM => distribution.excellent += 1,
                a if a >= GOOD_FROM => distribution.good += 1,
                a if a >= pass_mark => distribution.average += 1,
                _ => distribution.poor += 1,
            }
        }

        let passing = averages.iter().filter(|a| **a >= pass_mark).count();
        let pass_rate = round2(passing as f64 / students.len() as f64 * 100.0);

        // aggregates arrive in student id order
        let students_needing_attention: Vec<AttentionSummary> = graded
            .iter()
            .filter(|(_, avg)| *avg < self.config.attention_below)
            .map(|(s, avg)| AttentionSummary {
                student_id: s.student_id.clone(),
                name: s.name.clone(),
                average: round2(*avg),
                failing: s.failing_count,
            })
            .collect();

        // best first; stable sort keeps student id order on ties
        graded.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        let top_performers: Vec<PerformerSummary> = graded
            .iter()
            .take(TOP_PERFORMERS)
            .map(|(s, avg)| PerformerSummary {
                student_id: s.student_id.clone(),
                name: s.name.clone(),
                average: round2(*avg),
            })
            .collect();

        debug!(
            class = class_name,
            students = students.len(),
            graded = averages.len(),
            attention = students_needing_attention.len(),
            "Class summary complete"
        );

        Ok(ClassSummaryReport {
            status: AnalysisStatus::Ok,
            class_name: class_name.to_string(),
            total_students: students.len(),
            class_average,
            top_performers,
            students_needing_attention,
            performance_distribution: distribution,
            pass_rate,
            message: "Class insights generated successfully".to_string(),
        })
    }
}
