//! Student completion-risk and course-difficulty analytics.
//!
//! The scoring pipeline is a set of pure functions over a validated
//! [`Batch`]: the feature contract, the risk classifier, the difficulty
//! estimator and the report assembler. Every front-end goes through
//! [`Analyzer::analyze`] so the same input always yields the same report.

pub mod difficulty;
pub mod error;
pub mod features;
pub mod ingest;
pub mod model;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod risk;

pub use error::{AnalysisError, ModelError};
pub use models::{
    AnalysisReport, Batch, Difficulty, DifficultyReport, PredictedOutcome, PredictionPair,
    RiskEntry, StampedReport, StudentRecord, Summary,
};
pub use pipeline::{score, Analyzer};
