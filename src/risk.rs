use tracing::debug;

use crate::difficulty::round_one_decimal;
use crate::error::AnalysisError;
use crate::models::{Batch, PredictedOutcome, PredictionPair, RiskEntry};

/// Scores strictly below this are flagged whatever the model says.
pub const OVERRIDE_SCORE_THRESHOLD: f64 = 40.0;

/// Pairs each row with the model output at the same position.
pub fn pair_predictions(
    batch: &Batch,
    predictions: &[u8],
    probabilities: &[f64],
) -> Result<Vec<PredictionPair>, AnalysisError> {
    if predictions.len() != batch.len() || probabilities.len() != batch.len() {
        return Err(AnalysisError::ContractViolation {
            rows: batch.len(),
            predictions: predictions.len(),
            probabilities: probabilities.len(),
        });
    }

    Ok(predictions
        .iter()
        .zip(probabilities)
        .map(|(&label, &confidence)| PredictionPair {
            completes: label != 0,
            confidence,
        })
        .collect())
}

/// Either condition alone flags the student.
pub fn is_at_risk(avg_score: f64, prediction: &PredictionPair) -> bool {
    !prediction.completes || avg_score < OVERRIDE_SCORE_THRESHOLD
}

/// `(1 - confidence) * 100` with one decimal and a percent sign.
///
/// Always derived from the model confidence, including for students flagged
/// only by the score override.
pub fn risk_percentage(confidence: f64) -> String {
    format!("{:.1}%", round_one_decimal((1.0 - confidence) * 100.0))
}

/// Flagged students only, in batch order.
pub fn classify(
    batch: &Batch,
    predictions: &[u8],
    probabilities: &[f64],
) -> Result<Vec<RiskEntry>, AnalysisError> {
    let pairs = pair_predictions(batch, predictions, probabilities)?;
    let mut entries = Vec::new();

    for (record, prediction) in batch.records().iter().zip(pairs.iter()) {
        if !is_at_risk(record.avg_score, prediction) {
            continue;
        }

        if prediction.completes {
            debug!(
                student_id = record.student_id,
                avg_score = record.avg_score,
                "flagged by score override against model prediction"
            );
        }

        entries.push(RiskEntry {
            student_id: record.student_id,
            predicted_outcome: PredictedOutcome::Dropout,
            risk_probability: risk_percentage(prediction.confidence),
            current_score: record.avg_score,
        });
    }

    Ok(entries)
}
