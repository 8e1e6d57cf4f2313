use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::features::ANALYSIS_FEATURES;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub student_id: i64,
    pub avg_score: f64,
    pub avg_time_spent: f64,
    pub chapter_retries: i64,
}

impl StudentRecord {
    /// Model input row, in the order the scaler and model were fitted on.
    pub fn feature_row(&self) -> [f64; 3] {
        [
            self.avg_score,
            self.avg_time_spent,
            self.chapter_retries as f64,
        ]
    }
}

/// Ordered rows plus the column names they were read with.
///
/// Row position is the only link between a record and its model output.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    columns: Vec<String>,
    records: Vec<StudentRecord>,
}

impl Batch {
    pub fn new(columns: Vec<String>, records: Vec<StudentRecord>) -> Self {
        Self { columns, records }
    }

    /// A batch built in memory carries every column of the record type.
    pub fn from_records(records: Vec<StudentRecord>) -> Self {
        let columns = ANALYSIS_FEATURES.iter().map(|c| c.to_string()).collect();
        Self { columns, records }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[StudentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn feature_rows(&self) -> Vec<[f64; 3]> {
        self.records.iter().map(StudentRecord::feature_row).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionPair {
    pub completes: bool,
    /// Model probability of completing, in [0, 1].
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PredictedOutcome {
    Dropout,
}

impl std::fmt::Display for PredictedOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PredictedOutcome::Dropout => f.write_str("Dropout"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskEntry {
    pub student_id: i64,
    pub predicted_outcome: PredictedOutcome,
    pub risk_probability: String,
    pub current_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyReport {
    pub overall_difficulty: Difficulty,
    pub avg_student_score: f64,
    pub avg_retries_per_chapter: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_students: usize,
    pub at_risk_count: usize,
    pub predicted_completion_rate: String,
}

/// The report every front-end returns. Its JSON shape is the wire contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub summary: Summary,
    pub course_insights: DifficultyReport,
    pub high_risk_students: Vec<RiskEntry>,
}

/// Exported form of a report with the time it was produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StampedReport {
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub report: AnalysisReport,
}

impl StampedReport {
    pub fn now(report: AnalysisReport) -> Self {
        Self {
            generated_at: Utc::now(),
            report,
        }
    }
}
