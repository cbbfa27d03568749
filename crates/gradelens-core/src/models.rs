//! Domain models for Gradelens
//!
//! These are the typed rows the record store hands to the insight engine.
//! Aggregates keep SQL `NULL` as `Option` instead of defaulting to zero.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Review status of an assessment result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    /// Entered but not yet reviewed
    #[default]
    Pending,
    /// Passed review, eligible for analytics
    Approved,
    /// Sent back by the reviewer
    Rejected,
}

impl ResultStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl std::str::FromStr for ResultStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(format!("Unknown result status: {}", s)),
        }
    }
}

impl std::fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A student as known to the registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentProfile {
    pub student_id: String,
    pub name: String,
    /// Class/cohort label shared by classmates
    pub class: String,
}

/// One assessment result joined with its subject name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub id: i64,
    pub student_id: String,
    pub subject_code: String,
    pub subject_name: String,
    /// Score on a 0-100 scale
    pub score: f64,
    pub status: ResultStatus,
    pub created_at: DateTime<Utc>,
}

/// An assessment record with the owning student's display name (anomaly scan)
#[derive(Debug, Clone)]
pub struct NamedAssessment {
    pub student_name: String,
    pub record: AssessmentRecord,
}

/// Per-student aggregate over approved results
#[derive(Debug, Clone)]
pub struct StudentAggregate {
    pub student_id: String,
    pub name: String,
    pub class: String,
    /// Absent when the student has no approved results
    pub average: Option<f64>,
    pub total_results: i64,
    /// Results scoring below the failing threshold
    pub failing_count: i64,
}

/// Per-subject aggregate of one student's approved results
#[derive(Debug, Clone)]
pub struct SubjectAggregate {
    pub subject_code: String,
    pub subject_name: String,
    pub average: f64,
    pub count: i64,
    pub max: f64,
    pub min: f64,
}

/// Per-subject comparison figures across student, class and everyone
#[derive(Debug, Clone)]
pub struct ComparativeAggregate {
    pub subject_code: String,
    pub subject_name: String,
    /// Absent when the student has no approved result in this subject
    pub student_avg: Option<f64>,
    /// Absent when nobody in the class has an approved result in this subject
    pub class_avg: Option<f64>,
    pub overall_avg: f64,
    pub highest: f64,
    pub lowest: f64,
}
