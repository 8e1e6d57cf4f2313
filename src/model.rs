//! Completion model capabilities.
//!
//! The pipeline only needs `scale`, `predict` and `predict_proba`. Backends
//! are loaded once, before the first batch, and are only read afterwards,
//! so implementations must be `Send + Sync`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ModelError;
use crate::features::SCORING_FEATURES;

/// Maps raw feature rows into the space the model was fitted in.
pub trait FeatureScaler: Send + Sync {
    fn scale(&self, rows: &[[f64; 3]]) -> Result<Vec<Vec<f64>>, ModelError>;
}

/// Binary completion classifier. Label 1 means the student completes.
pub trait CompletionModel: Send + Sync {
    fn name(&self) -> &str;

    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<u8>, ModelError>;

    /// `[P(dropout), P(complete)]` per row.
    fn predict_proba(&self, rows: &[Vec<f64>]) -> Result<Vec<[f64; 2]>, ModelError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl FeatureScaler for StandardScaler {
    fn scale(&self, rows: &[[f64; 3]]) -> Result<Vec<Vec<f64>>, ModelError> {
        if self.mean.len() != 3 || self.scale.len() != 3 {
            return Err(ModelError::DimensionMismatch {
                expected: 3,
                actual: self.mean.len().min(self.scale.len()),
            });
        }

        Ok(rows
            .iter()
            .map(|row| {
                row.iter()
                    .zip(self.mean.iter().zip(self.scale.iter()))
                    .map(|(x, (mean, scale))| {
                        // Constant features are fitted with a zero spread.
                        let scale = if *scale == 0.0 { 1.0 } else { *scale };
                        (x - mean) / scale
                    })
                    .collect()
            })
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub model_name: String,
    pub weights: Vec<f64>,
    pub intercept: f64,
}

impl LogisticModel {
    fn completion_probability(&self, row: &[f64]) -> Result<f64, ModelError> {
        if row.len() != self.weights.len() {
            return Err(ModelError::DimensionMismatch {
                expected: self.weights.len(),
                actual: row.len(),
            });
        }
        let z: f64 = self
            .weights
            .iter()
            .zip(row.iter())
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept;
        let p = 1.0 / (1.0 + (-z).exp());
        if !(0.0..=1.0).contains(&p) {
            return Err(ModelError::InvalidProbability(p));
        }
        Ok(p)
    }
}

impl CompletionModel for LogisticModel {
    fn name(&self) -> &str {
        &self.model_name
    }

    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<u8>, ModelError> {
        rows.iter()
            .map(|row| self.completion_probability(row).map(|p| u8::from(p > 0.5)))
            .collect()
    }

    fn predict_proba(&self, rows: &[Vec<f64>]) -> Result<Vec<[f64; 2]>, ModelError> {
        rows.iter()
            .map(|row| self.completion_probability(row).map(|p| [1.0 - p, p]))
            .collect()
    }
}

/// On-disk model file: fitted scaler plus classifier parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelBundle {
    pub model_type: String,
    #[serde(default)]
    pub n_estimators: Option<u32>,
    pub features: Vec<String>,
    pub scaler: StandardScaler,
    pub weights: Vec<f64>,
    pub intercept: f64,
}

impl ModelBundle {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ModelError::Io(format!("{}: {e}", path.display())))?;
        let bundle: ModelBundle =
            serde_json::from_str(&content).map_err(|e| ModelError::Parse(e.to_string()))?;
        bundle.check()?;
        Ok(bundle)
    }

    fn check(&self) -> Result<(), ModelError> {
        for len in [self.weights.len(), self.scaler.mean.len(), self.scaler.scale.len()] {
            if len != SCORING_FEATURES.len() {
                return Err(ModelError::DimensionMismatch {
                    expected: SCORING_FEATURES.len(),
                    actual: len,
                });
            }
        }
        if self.features.iter().map(String::as_str).ne(SCORING_FEATURES) {
            warn!(
                features = ?self.features,
                "model lists features in a different order; rows are scaled in {:?} order",
                SCORING_FEATURES
            );
        }
        Ok(())
    }

    pub fn into_parts(self) -> (StandardScaler, LogisticModel) {
        (
            self.scaler,
            LogisticModel {
                model_name: self.model_type,
                weights: self.weights,
                intercept: self.intercept,
            },
        )
    }

    pub fn info(&self) -> ModelInfo {
        let feature_descriptions = self
            .features
            .iter()
            .map(|name| (name.clone(), describe_feature(name).to_string()))
            .collect();

        ModelInfo {
            model_type: self.model_type.clone(),
            n_estimators: self.n_estimators,
            features: self.features.clone(),
            feature_descriptions,
            output: "Completion probability (0-1)".to_string(),
        }
    }
}

fn describe_feature(name: &str) -> &'static str {
    match name {
        "avg_score" => "Average student score (0-100)",
        "avg_time_spent" => "Average hours spent per chapter",
        "chapter_retries" => "Number of chapter retakes/failures",
        _ => "Undocumented feature",
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub model_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_estimators: Option<u32>,
    pub features: Vec<String>,
    pub feature_descriptions: BTreeMap<String, String>,
    pub output: String,
}
