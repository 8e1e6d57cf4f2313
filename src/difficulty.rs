use tracing::debug;

use crate::error::AnalysisError;
use crate::models::{Batch, Difficulty, DifficultyReport};

/// Index points contributed by each average retry.
pub const RETRY_WEIGHT: f64 = 20.0;
pub const HARD_ABOVE: f64 = 60.0;
pub const EASY_BELOW: f64 = 30.0;

fn mean(values: impl ExactSizeIterator<Item = f64>) -> Result<f64, AnalysisError> {
    let count = values.len();
    if count == 0 {
        return Err(AnalysisError::EmptyBatch);
    }
    Ok(values.sum::<f64>() / count as f64)
}

/// Scales by ten, rounds half to even, and scales back.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

pub fn difficulty_index(avg_retries: f64, avg_score: f64) -> f64 {
    (avg_retries * RETRY_WEIGHT) + (100.0 - avg_score)
}

/// Both thresholds are exclusive, so 30 and 60 land on `Medium`.
pub fn classify_index(index: f64) -> Difficulty {
    if index > HARD_ABOVE {
        Difficulty::Hard
    } else if index < EASY_BELOW {
        Difficulty::Easy
    } else {
        Difficulty::Medium
    }
}

pub fn estimate(batch: &Batch) -> Result<DifficultyReport, AnalysisError> {
    let records = batch.records();
    let avg_score = mean(records.iter().map(|r| r.avg_score))?;
    let avg_retries = mean(records.iter().map(|r| r.chapter_retries as f64))?;

    let index = difficulty_index(avg_retries, avg_score);
    let overall_difficulty = classify_index(index);
    debug!(index, %overall_difficulty, "estimated course difficulty");

    Ok(DifficultyReport {
        overall_difficulty,
        avg_student_score: round_one_decimal(avg_score),
        avg_retries_per_chapter: round_one_decimal(avg_retries),
    })
}
