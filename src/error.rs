use thiserror::Error;

/// Errors raised by the scoring pipeline. None of them are retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("missing required columns: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("batch has no rows to analyze")]
    EmptyBatch,

    #[error(
        "row count mismatch: {rows} rows, {predictions} predictions, {probabilities} probabilities"
    )]
    ContractViolation {
        rows: usize,
        predictions: usize,
        probabilities: usize,
    },

    #[error("model inference failed: {0}")]
    Inference(#[from] ModelError),
}

/// Errors from loading or running a completion model backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("failed to read model file: {0}")]
    Io(String),

    #[error("failed to parse model file: {0}")]
    Parse(String),

    #[error("expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("probability {0} is outside [0, 1]")]
    InvalidProbability(f64),
}
