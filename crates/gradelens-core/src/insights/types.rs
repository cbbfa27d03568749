//! Report types produced by the insight engine
//!
//! Every report carries an [`AnalysisStatus`] and a human-readable message.
//! Numeric fields are rounded to 2 decimal places when a report is assembled.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::grading::Grade;

/// Outcome of an analysis
///
/// None of these are faults: an analysis with too little data still returns
/// a report, just without a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    /// Result computed
    Ok,
    /// Fewer historical records than the analysis needs
    InsufficientData,
    /// The referenced student does not exist
    NotFound,
    /// No approved records to analyse
    EmptyResult,
}

impl AnalysisStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::InsufficientData => "insufficient_data",
            Self::NotFound => "not_found",
            Self::EmptyResult => "empty_result",
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How much history backs a prediction
///
/// A coarse label, not a statistical confidence interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// 4+ records: high, 2-3: medium, fewer: low
    pub fn from_history(count: usize) -> Self {
        if count >= 4 {
            Self::High
        } else if count >= 2 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ========== Performance prediction ==========

/// Direction of a single subject's recent results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectTrend {
    Improving,
    Declining,
    Stable,
}

impl SubjectTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Improving => "improving",
            Self::Declining => "declining",
            Self::Stable => "stable",
        }
    }
}

impl fmt::Display for SubjectTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Direction of a student's results across all subjects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallTrend {
    StronglyImproving,
    Improving,
    Stable,
    Declining,
    StronglyDeclining,
    InsufficientData,
}

impl OverallTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StronglyImproving => "strongly_improving",
            Self::Improving => "improving",
            Self::Stable => "stable",
            Self::Declining => "declining",
            Self::StronglyDeclining => "strongly_declining",
            Self::InsufficientData => "insufficient_data",
        }
    }
}

impl fmt::Display for OverallTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Next-result prediction for one subject
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectPrediction {
    pub subject_code: String,
    pub predicted_score: f64,
    pub current_average: f64,
    pub trend: SubjectTrend,
    pub confidence: Confidence,
    pub results_count: usize,
}

/// Per-subject predictions keyed by subject display name
///
/// Subjects sharing a display name are keyed "Name (CODE)" instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionReport {
    pub status: AnalysisStatus,
    pub student_id: String,
    /// Absent when the student has fewer than 2 approved results
    pub predictions: Option<BTreeMap<String, SubjectPrediction>>,
    pub overall_trend: OverallTrend,
    pub message: String,
}

// ========== Risk ==========

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A student flagged by the risk identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskEntry {
    pub student_id: String,
    pub name: String,
    pub class: String,
    pub average_score: f64,
    pub total_results: i64,
    /// Results scoring below the threshold
    pub failing_count: i64,
    pub risk_level: RiskLevel,
}

/// At-risk students, worst average first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    pub status: AnalysisStatus,
    pub threshold: f64,
    pub class: Option<String>,
    pub students: Vec<RiskEntry>,
    pub message: String,
}

// ========== Recommendations ==========

/// Urgency of a recommendation; sorts most urgent first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    /// Band a subject average into a priority tier
    pub fn from_average(average: f64) -> Self {
        if average < 50.0 {
            Self::Critical
        } else if average < 60.0 {
            Self::High
        } else if average < 75.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Canned advice for this tier
    pub fn advice(&self, subject: &str) -> String {
        match self {
            Self::Critical => format!(
                "Requires immediate attention in {}. Consider extra tutoring and practice.",
                subject
            ),
            Self::High => format!(
                "Focus on improving {} fundamentals. Regular practice recommended.",
                subject
            ),
            Self::Medium => format!(
                "Good progress in {}. Work on advanced topics for better grades.",
                subject
            ),
            Self::Low => format!(
                "Excellent performance in {}. Maintain consistency and challenge yourself.",
                subject
            ),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Advice for one subject
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationEntry {
    pub subject_code: String,
    pub subject: String,
    pub average: f64,
    pub priority: Priority,
    pub advice: String,
    /// Variability warning or consistency note
    pub consistency: String,
    pub best_score: f64,
    pub worst_score: f64,
    pub improvement_potential: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationReport {
    pub status: AnalysisStatus,
    pub student_id: String,
    pub recommendations: Vec<RecommendationEntry>,
    /// Mean of the per-subject averages; absent without records
    pub overall_average: Option<f64>,
    pub message: String,
}

// ========== Anomalies ==========

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalySeverity {
    High,
    Medium,
    Low,
}

impl AnomalySeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for AnomalySeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Note attached to multiple-perfect-score anomalies
pub const PERFECT_SCORE_NOTE: &str = "Exceptional performance - verify if genuine";

/// An unusual pattern in a student's approved results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnomalyEntry {
    /// Large jump between two consecutive results (any subjects)
    SuddenImprovement {
        student_id: String,
        student_name: String,
        /// Subject of the later result
        subject_code: String,
        subject: String,
        previous_score: f64,
        current_score: f64,
        increase: f64,
        severity: AnomalySeverity,
        /// Timestamp of the later result
        date: DateTime<Utc>,
    },
    /// Several near-perfect scores
    MultiplePerfectScores {
        student_id: String,
        student_name: String,
        count: usize,
        severity: AnomalySeverity,
        note: String,
    },
}

impl AnomalyEntry {
    pub fn student_id(&self) -> &str {
        match self {
            Self::SuddenImprovement { student_id, .. }
            | Self::MultiplePerfectScores { student_id, .. } => student_id,
        }
    }

    pub fn severity(&self) -> AnomalySeverity {
        match self {
            Self::SuddenImprovement { severity, .. }
            | Self::MultiplePerfectScores { severity, .. } => *severity,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::SuddenImprovement { .. } => "sudden_improvement",
            Self::MultiplePerfectScores { .. } => "multiple_perfect_scores",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyReport {
    pub status: AnalysisStatus,
    pub anomalies: Vec<AnomalyEntry>,
    pub message: String,
}

// ========== Comparative ==========

/// Where a student sits relative to their class average
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Standing {
    Excellent,
    AboveAverage,
    Average,
    BelowAverage,
}

impl Standing {
    pub fn classify(student_avg: f64, class_avg: f64) -> Self {
        if student_avg >= class_avg + 10.0 {
            Self::Excellent
        } else if student_avg >= class_avg {
            Self::AboveAverage
        } else if student_avg >= class_avg - 10.0 {
            Self::Average
        } else {
            Self::BelowAverage
        }
    }

    /// Coarse rank label; a lookup on the tier, not derived from percentile
    pub fn rank_estimate(&self) -> &'static str {
        match self {
            Self::Excellent => "Top 10%",
            Self::AboveAverage => "Top 25%",
            Self::Average => "Top 50%",
            Self::BelowAverage => "Bottom 50%",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::AboveAverage => "above_average",
            Self::Average => "average",
            Self::BelowAverage => "below_average",
        }
    }
}

impl fmt::Display for Standing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One subject of a comparative report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparativeInsight {
    pub subject_code: String,
    pub subject: String,
    pub student_average: f64,
    pub class_average: f64,
    pub overall_average: f64,
    pub difference_from_class: f64,
    /// Position between the global worst (0) and best (100) score
    pub percentile: f64,
    pub standing: Standing,
    pub class_rank_estimate: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparativeReport {
    pub status: AnalysisStatus,
    pub student_id: String,
    pub student_class: Option<String>,
    pub insights: Vec<ComparativeInsight>,
    pub message: String,
}

// ========== Final grade ==========

/// Sign of last-minus-first score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeTrend {
    Positive,
    Negative,
    Stable,
}

impl GradeTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Stable => "stable",
        }
    }
}

impl fmt::Display for GradeTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalGradePrediction {
    pub predicted_score: f64,
    pub predicted_grade: Grade,
    pub grade_points: u8,
    pub current_average: f64,
    pub trend: GradeTrend,
    pub confidence: Confidence,
    pub results_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalGradeReport {
    pub status: AnalysisStatus,
    pub student_id: String,
    pub subject_code: String,
    /// Absent with fewer than 2 approved results
    pub prediction: Option<FinalGradePrediction>,
    pub message: String,
}

// ========== Grade alignment ==========

/// What to do with a proposed score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Suggestion {
    Accept,
    Review,
    Verify,
}

impl Suggestion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Review => "review",
            Self::Verify => "verify",
        }
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentReport {
    pub status: AnalysisStatus,
    pub student_id: String,
    pub subject_code: String,
    pub proposed_score: f64,
    pub suggestion: Suggestion,
    pub confidence: Confidence,
    pub reason: String,
    /// Mean of the historical scores; absent without history
    pub typical_average: Option<f64>,
    /// Population standard deviation of the historical scores
    pub standard_deviation: Option<f64>,
    pub history_count: usize,
    pub message: String,
}

// ========== Class summary ==========

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformerSummary {
    pub student_id: String,
    pub name: String,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttentionSummary {
    pub student_id: String,
    pub name: String,
    pub average: f64,
    /// Results below the pass mark
    pub failing: i64,
}

/// Student counts per average band
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceDistribution {
    /// 85 and above
    pub excellent: usize,
    /// 70 to under 85
    pub good: usize,
    /// 50 to under 70
    pub average: usize,
    /// under 50
    pub poor: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassSummaryReport {
    pub status: AnalysisStatus,
    pub class_name: String,
    pub total_students: usize,
    pub class_average: Option<f64>,
    pub top_performers: Vec<PerformerSummary>,
    pub students_needing_attention: Vec<AttentionSummary>,
    pub performance_distribution: PerformanceDistribution,
    pub pass_rate: f64,
    pub message: String,
}
