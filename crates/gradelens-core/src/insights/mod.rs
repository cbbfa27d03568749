//! Insight Engine - statistical analyses over approved assessment records
//!
//! Every analysis is a pure function of the current approved-record set: it
//! issues its own read queries, computes in memory and returns a report. The
//! engine keeps no cache and no state between calls.
//!
//! ## Analyses
//!
//! - **Performance Predictor** - per-subject regression plus overall trend
//! - **Risk Identifier** - students below a failing threshold
//! - **Recommendation Generator** - per-subject priority and advice
//! - **Anomaly Detector** - sudden jumps and repeated perfect scores
//! - **Comparative Insight** - student vs class vs everyone, per subject
//! - **Final-Grade Predictor** - recency-weighted grade projection
//! - **Grade-Alignment Checker** - is a proposed score typical for the student
//! - **Class Summary** - cohort averages, bands and pass rate
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gradelens_core::{Database, InsightEngine};
//!
//! let engine = InsightEngine::new(&db);
//! let report = engine.predict_performance("S1001")?;
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! ```

pub mod alignment;
pub mod anomalies;
pub mod class_summary;
pub mod comparative;
pub mod engine;
pub mod final_grade;
pub mod performance;
pub mod recommendations;
pub mod risk;
pub mod stats;
pub mod types;

pub use engine::InsightEngine;
pub use types::{
    AlignmentReport, AnalysisStatus, AnomalyEntry, AnomalyReport, AnomalySeverity,
    AttentionSummary, ClassSummaryReport, ComparativeInsight, ComparativeReport, Confidence,
    FinalGradePrediction, FinalGradeReport, GradeTrend, OverallTrend, PerformanceDistribution,
    PerformerSummary, PredictionReport, Priority, RecommendationEntry, RecommendationReport,
    RiskEntry, RiskLevel, RiskReport, Standing, SubjectPrediction, SubjectTrend, Suggestion,
};
