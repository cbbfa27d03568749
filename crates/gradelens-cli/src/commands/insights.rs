//! Insight command implementations
//!
//! Each command runs one analysis and prints the report as a table, or as
//! pretty JSON with `--json`.

use anyhow::{Context, Result};
use gradelens_core::insights::{
    AlignmentReport, AnomalyEntry, AnomalyReport, ClassSummaryReport, ComparativeReport,
    FinalGradeReport, PredictionReport, RecommendationReport, RiskReport,
};
use gradelens_core::InsightEngine;
use serde::Serialize;

use super::{truncate, Output};

/// Serialize a report as pretty JSON
pub fn to_json<T: Serialize>(report: &T) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize report")
}

/// Print a report in the requested format
fn emit<T: Serialize>(report: &T, output: Output, table: impl FnOnce(&T)) -> Result<()> {
    match output {
        Output::Json => println!("{}", to_json(report)?),
        Output::Table => table(report),
    }
    Ok(())
}

/// Status message line shown under every table
fn print_message(message: &str) {
    println!();
    println!("   {}", message);
    println!();
}

pub fn cmd_predict(engine: &InsightEngine<'_>, student_id: &str, output: Output) -> Result<()> {
    let report = engine.predict_performance(student_id)?;
    emit(&report, output, print_prediction)
}

fn print_prediction(report: &PredictionReport) {
    println!();
    println!("📈 Performance Prediction: {}", report.student_id);
    println!("   ─────────────────────────────────────────────────────────────");

    if let Some(predictions) = &report.predictions {
        println!("   Overall trend: {}", report.overall_trend);
        println!();
        println!(
            "   {:20} │ {:>9} │ {:>7} │ {:10} │ {:6}",
            "Subject", "Predicted", "Average", "Trend", "Conf."
        );
        println!("   ─────────────────────┼───────────┼─────────┼────────────┼───────");
        for (subject, p) in predictions {
            println!(
                "   {:20} │ {:>9.2} │ {:>7.2} │ {:10} │ {:6}",
                truncate(subject, 20),
                p.predicted_score,
                p.current_average,
                p.trend.as_str(),
                p.confidence.as_str()
            );
        }
    }

    print_message(&report.message);
}

pub fn cmd_risk(
    engine: &InsightEngine<'_>,
    threshold: Option<f64>,
    class: Option<&str>,
    output: Output,
) -> Result<()> {
    let report = engine.identify_at_risk(threshold, class)?;
    emit(&report, output, print_risk)
}

fn print_risk(report: &RiskReport) {
    println!();
    match &report.class {
        Some(class) => println!(
            "⚠️  Students at Risk in {} (threshold {:.1})",
            class, report.threshold
        ),
        None => println!("⚠️  Students at Risk (threshold {:.1})", report.threshold),
    }
    println!("   ─────────────────────────────────────────────────────────────");

    if !report.students.is_empty() {
        println!(
            "   {:10} │ {:20} │ {:6} │ {:>7} │ {:>7} │ {:6}",
            "ID", "Name", "Class", "Average", "Failing", "Risk"
        );
        println!("   ───────────┼──────────────────────┼────────┼─────────┼─────────┼───────");
        for s in &report.students {
            println!(
                "   {:10} │ {:20} │ {:6} │ {:>7.2} │ {:>3}/{:<3} │ {:6}",
                truncate(&s.student_id, 10),
                truncate(&s.name, 20),
                truncate(&s.class, 6),
                s.average_score,
                s.failing_count,
                s.total_results,
                s.risk_level.as_str()
            );
        }
    }

    print_message(&report.message);
}

pub fn cmd_recommend(engine: &InsightEngine<'_>, student_id: &str, output: Output) -> Result<()> {
    let report = engine.recommendations(student_id)?;
    emit(&report, output, print_recommendations)
}

fn print_recommendations(report: &RecommendationReport) {
    println!();
    println!("💡 Recommendations: {}", report.student_id);
    println!("   ─────────────────────────────────────────────────────────────");

    if let Some(avg) = report.overall_average {
        println!("   Overall average: {:.2}", avg);
    }

    for r in &report.recommendations {
        println!();
        println!(
            "   [{}] {} (average {:.2}, best {:.1}, worst {:.1})",
            r.priority.as_str().to_uppercase(),
            r.subject,
            r.average,
            r.best_score,
            r.worst_score
        );
        println!("      {}", r.advice);
        println!("      {}", r.consistency);
        println!("      Room to improve: {:.2} points", r.improvement_potential);
    }

    print_message(&report.message);
}

pub fn cmd_anomalies(engine: &InsightEngine<'_>, output: Output) -> Result<()> {
    let report = engine.detect_anomalies()?;
    emit(&report, output, print_anomalies)
}

fn print_anomalies(report: &AnomalyReport) {
    println!();
    println!("🔎 Anomalies");
    println!("   ─────────────────────────────────────────────────────────────");

    for anomaly in &report.anomalies {
        match anomaly {
            AnomalyEntry::SuddenImprovement {
                student_id,
                student_name,
                subject,
                previous_score,
                current_score,
                increase,
                severity,
                date,
                ..
            } => println!(
                "   [{}] {} ({}): {:.1} → {:.1} (+{:.1}) in {} on {}",
                severity,
                student_name,
                student_id,
                previous_score,
                current_score,
                increase,
                subject,
                date.format("%Y-%m-%d")
            ),
            AnomalyEntry::MultiplePerfectScores {
                student_id,
                student_name,
                count,
                severity,
                note,
            } => println!(
                "   [{}] {} ({}): {} perfect scores. {}",
                severity, student_name, student_id, count, note
            ),
        }
    }

    print_message(&report.message);
}

pub fn cmd_compare(engine: &InsightEngine<'_>, student_id: &str, output: Output) -> Result<()> {
    let report = engine.comparative_insights(student_id)?;
    emit(&report, output, print_comparative)
}

fn print_comparative(report: &ComparativeReport) {
    println!();
    println!("📊 Comparative Insight: {}", report.student_id);
    println!("   ─────────────────────────────────────────────────────────────");

    if let Some(class) = &report.student_class {
        println!("   Class: {}", class);
    }

    if !report.insights.is_empty() {
        println!();
        println!(
            "   {:16} │ {:>7} │ {:>7} │ {:>7} │ {:>6} │ {:>6} │ {:14} │ {:10}",
            "Subject", "Student", "Class", "All", "Diff", "Pctl", "Standing", "Rank"
        );
        println!(
            "   ─────────────────┼─────────┼─────────┼─────────┼────────┼────────┼────────────────┼───────────"
        );
        for i in &report.insights {
            println!(
                "   {:16} │ {:>7.2} │ {:>7.2} │ {:>7.2} │ {:>+6.2} │ {:>6.2} │ {:14} │ {:10}",
                truncate(&i.subject, 16),
                i.student_average,
                i.class_average,
                i.overall_average,
                i.difference_from_class,
                i.percentile,
                i.standing.as_str(),
                i.class_rank_estimate
            );
        }
    }

    print_message(&report.message);
}

pub fn cmd_final_grade(
    engine: &InsightEngine<'_>,
    student_id: &str,
    subject_code: &str,
    output: Output,
) -> Result<()> {
    let report = engine.predict_final_grade(student_id, subject_code)?;
    emit(&report, output, print_final_grade)
}

fn print_final_grade(report: &FinalGradeReport) {
    println!();
    println!(
        "🎓 Final Grade Prediction: {} / {}",
        report.student_id, report.subject_code
    );
    println!("   ─────────────────────────────────────────────────────────────");

    if let Some(p) = &report.prediction {
        println!(
            "   Predicted: {:.2} ({}, {} points)",
            p.predicted_score, p.predicted_grade, p.grade_points
        );
        println!("   Current average: {:.2}", p.current_average);
        println!("   Trend: {}", p.trend);
        println!(
            "   Confidence: {} ({} results)",
            p.confidence, p.results_count
        );
    }

    print_message(&report.message);
}

pub fn cmd_check_grade(
    engine: &InsightEngine<'_>,
    student_id: &str,
    subject_code: &str,
    score: f64,
    output: Output,
) -> Result<()> {
    if !(0.0..=100.0).contains(&score) {
        anyhow::bail!("Score must be between 0 and 100, got {}", score);
    }
    let report = engine.check_grade_alignment(student_id, subject_code, score)?;
    emit(&report, output, print_alignment)
}

fn print_alignment(report: &AlignmentReport) {
    println!();
    println!(
        "✔️  Grade Check: {} / {} = {:.1}",
        report.student_id, report.subject_code, report.proposed_score
    );
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   Suggestion: {} ({} confidence)",
        report.suggestion.as_str().to_uppercase(),
        report.confidence
    );
    println!("   Reason: {}", report.reason);
    if let (Some(mean), Some(sd)) = (report.typical_average, report.standard_deviation) {
        println!(
            "   History: {} results, mean {:.2}, std dev {:.2}",
            report.history_count, mean, sd
        );
    }

    print_message(&report.message);
}

pub fn cmd_class(engine: &InsightEngine<'_>, class_name: &str, output: Output) -> Result<()> {
    let report = engine.class_summary(class_name)?;
    emit(&report, output, print_class_summary)
}

fn print_class_summary(report: &ClassSummaryReport) {
    println!();
    println!("🏫 Class Summary: {}", report.class_name);
    println!("   ─────────────────────────────────────────────────────────────");

    if report.total_students > 0 {
        println!("   Students: {}", report.total_students);
        if let Some(avg) = report.class_average {
            println!("   Class average: {:.2}", avg);
        }
        println!("   Pass rate: {:.1}%", report.pass_rate);

        let d = &report.performance_distribution;
        println!(
            "   Distribution: {} excellent, {} good, {} average, {} poor",
            d.excellent, d.good, d.average, d.poor
        );

        if !report.top_performers.is_empty() {
            println!();
            println!("   Top performers:");
            for (rank, p) in report.top_performers.iter().enumerate() {
                println!(
                    "     {}. {} ({}) {:.2}",
                    rank + 1,
                    p.name,
                    p.student_id,
                    p.average
                );
            }
        }

        if !report.students_needing_attention.is_empty() {
            println!();
            println!("   Needs attention:");
            for s in &report.students_needing_attention {
                println!(
                    "     {} ({}) {:.2}, {} results below pass mark",
                    s.name, s.student_id, s.average, s.failing
                );
            }
        }
    }

    print_message(&report.message);
}
