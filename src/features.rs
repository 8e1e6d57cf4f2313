use crate::error::AnalysisError;
use crate::models::Batch;

/// Columns the model is scored on, in fitted order.
pub const SCORING_FEATURES: [&str; 3] = ["avg_score", "avg_time_spent", "chapter_retries"];

/// Scoring columns plus the identifier risk entries are reported under.
pub const ANALYSIS_FEATURES: [&str; 4] = [
    "student_id",
    "avg_score",
    "avg_time_spent",
    "chapter_retries",
];

/// Names every required column absent from `columns`, in `required` order.
pub fn missing_columns<S: AsRef<str>>(columns: &[S], required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|name| !columns.iter().any(|c| c.as_ref() == **name))
        .map(|name| name.to_string())
        .collect()
}

/// Checks the column set first, then that there is at least one row.
///
/// Values are not coerced or range checked.
pub fn validate_columns<S: AsRef<str>>(
    columns: &[S],
    rows: usize,
    required: &[&str],
) -> Result<(), AnalysisError> {
    let missing = missing_columns(columns, required);
    if !missing.is_empty() {
        return Err(AnalysisError::Schema { missing });
    }
    if rows == 0 {
        return Err(AnalysisError::EmptyBatch);
    }
    Ok(())
}

pub fn validate(batch: &Batch, required: &[&str]) -> Result<(), AnalysisError> {
    validate_columns(batch.columns(), batch.len(), required)
}
