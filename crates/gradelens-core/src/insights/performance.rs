//! Performance Predictor
//!
//! Predicts each subject's next score from a least-squares line over the
//! subject's own result sequence (1, 2, 3, ...), and labels the student's
//! overall direction by comparing the earlier and later halves of their
//! whole chronological record.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::Result;

use super::engine::InsightEngine;
use super::stats::{clamp_score, mean, round2, LinearFit};
use super::types::{
    AnalysisStatus, Confidence, OverallTrend, PredictionReport, SubjectPrediction, SubjectTrend,
};

/// Minimum results, overall and per subject, before predicting
pub const MIN_RESULTS_FOR_PREDICTION: usize = 2;

/// Mean difference between halves beyond which a trend is "strong"
const STRONG_TREND_DELTA: f64 = 5.0;

impl InsightEngine<'_> {
    /// Predict the next score in every subject with enough history
    pub fn predict_performance(&self, student_id: &str) -> Result<PredictionReport> {
        let records = self.db.approved_records_for_student(student_id)?;

        if records.len() < MIN_RESULTS_FOR_PREDICTION {
            debug!(
                student_id,
                records = records.len(),
                "Not enough results for performance prediction"
            );
            return Ok(PredictionReport {
                status: AnalysisStatus::InsufficientData,
                student_id: student_id.to_string(),
                predictions: None,
                overall_trend: OverallTrend::InsufficientData,
                message: "Not enough data for prediction (minimum 2 results needed)".to_string(),
            });
        }

        // subject code -> (display name, scores oldest first)
        let mut by_subject: BTreeMap<&str, (&str, Vec<f64>)> = BTreeMap::new();
        for record in &records {
            by_subject
                .entry(record.subject_code.as_str())
                .or_insert_with(|| (record.subject_name.as_str(), Vec::new()))
                .1
                .push(record.score);
        }

        let mut name_uses: BTreeMap<&str, usize> = BTreeMap::new();
        for (name, _) in by_subject.values() {
            *name_uses.entry(*name).or_default() += 1;
        }

        let mut predictions = BTreeMap::new();
        for (code, (name, scores)) in &by_subject {
            if let Some(prediction) = predict_subject(code, scores) {
                predictions.insert(prediction_key(code, name, &name_uses), prediction);
            }
        }

        let all_scores: Vec<f64> = records.iter().map(|r| r.score).collect();
        let overall_trend = overall_trend(&all_scores);

        debug!(
            student_id,
            records = records.len(),
            subjects = predictions.len(),
            overall_trend = overall_trend.as_str(),
            "Performance prediction complete"
        );

        Ok(PredictionReport {
            status: AnalysisStatus::Ok,
            student_id: student_id.to_string(),
            predictions: Some(predictions),
            overall_trend,
            message: "Predictions generated successfully".to_string(),
        })
    }
}

/// Display name, or "Name (CODE)" when several subject codes share the name
fn prediction_key(code: &str, name: &str, name_uses: &BTreeMap<&str, usize>) -> String {
    if name_uses.get(name).copied().unwrap_or(0) > 1 {
        format!("{} ({})", name, code)
    } else {
        name.to_string()
    }
}

/// Prediction for one subject's chronological scores, if there are enough
pub fn predict_subject(subject_code: &str, scores: &[f64]) -> Option<SubjectPrediction> {
    if scores.len() < MIN_RESULTS_FOR_PREDICTION {
        return None;
    }

    let fit = LinearFit::fit_sequence(scores)?;
    let next_index = (scores.len() + 1) as f64;
    let predicted = clamp_score(fit.predict(next_index));

    Some(SubjectPrediction {
        subject_code: subject_code.to_string(),
        predicted_score: round2(predicted),
        current_average: round2(mean(scores)?),
        trend: subject_trend(scores),
        confidence: Confidence::from_history(scores.len()),
        results_count: scores.len(),
    })
}

/// Compare the mean of the last two scores against the all-time mean
pub fn subject_trend(scores: &[f64]) -> SubjectTrend {
    let recent = mean(&scores[scores.len().saturating_sub(2)..]);
    let overall = mean(scores);

    match (recent, overall) {
        (Some(recent), Some(overall)) if recent > overall => SubjectTrend::Improving,
        (Some(recent), Some(overall)) if recent < overall => SubjectTrend::Declining,
        _ => SubjectTrend::Stable,
    }
}

/// Compare the first ⌊n/2⌋ scores with the last ⌊n/2⌋ scores
///
/// With an odd count the middle score belongs to neither half.
pub fn overall_trend(scores: &[f64]) -> OverallTrend {
    if scores.len() < MIN_RESULTS_FOR_PREDICTION {
        return OverallTrend::InsufficientData;
    }

    let half = scores.len() / 2;
    let (Some(earlier), Some(recent)) = (
        mean(&scores[..half]),
        mean(&scores[scores.len() - half..]),
    ) else {
        return OverallTrend::InsufficientData;
    };

    if recent > earlier + STRONG_TREND_DELTA {
        OverallTrend::StronglyImproving
    } else if recent > earlier {
        OverallTrend::Improving
    } else if recent < earlier - STRONG_TREND_DELTA {
        OverallTrend::StronglyDeclining
    } else if recent < earlier {
        OverallTrend::Declining
    } else {
        OverallTrend::Stable
    }
}
