use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::error::{AnalysisError, ModelError};
use crate::features::{self, ANALYSIS_FEATURES};
use crate::model::{CompletionModel, FeatureScaler, ModelBundle};
use crate::models::{AnalysisReport, Batch};
use crate::{difficulty, report, risk};

/// Builds a report from a batch and the model output for each of its rows.
///
/// Callers outside [`Analyzer`] hand in unchecked batches, so the feature
/// contract is enforced here too.
pub fn score(
    batch: &Batch,
    predictions: &[u8],
    probabilities: &[f64],
) -> Result<AnalysisReport, AnalysisError> {
    features::validate(batch, &ANALYSIS_FEATURES)?;
    score_validated(batch, predictions, probabilities)
}

fn score_validated(
    batch: &Batch,
    predictions: &[u8],
    probabilities: &[f64],
) -> Result<AnalysisReport, AnalysisError> {
    let risk_entries = risk::classify(batch, predictions, probabilities)?;
    let difficulty = difficulty::estimate(batch)?;
    let report = report::assemble(batch, risk_entries, difficulty)?;

    info!(
        total_students = report.summary.total_students,
        at_risk = report.summary.at_risk_count,
        difficulty = %report.course_insights.overall_difficulty,
        "analyzed batch"
    );
    Ok(report)
}

/// Shared, read-only scoring state. Build it once and hand out references.
#[derive(Clone)]
pub struct Analyzer {
    scaler: Arc<dyn FeatureScaler>,
    model: Arc<dyn CompletionModel>,
}

impl Analyzer {
    pub fn new(
        scaler: impl FeatureScaler + 'static,
        model: impl CompletionModel + 'static,
    ) -> Self {
        Self {
            scaler: Arc::new(scaler),
            model: Arc::new(model),
        }
    }

    pub fn from_bundle(bundle: ModelBundle) -> Self {
        let (scaler, model) = bundle.into_parts();
        Self::new(scaler, model)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        ModelBundle::load(path).map(Self::from_bundle)
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Validates before inference so a bad batch never reaches the model.
    pub fn analyze(&self, batch: &Batch) -> Result<AnalysisReport, AnalysisError> {
        features::validate(batch, &ANALYSIS_FEATURES)?;

        let scaled = self.scaler.scale(&batch.feature_rows())?;
        let predictions = self.model.predict(&scaled)?;
        let probabilities: Vec<f64> = self
            .model
            .predict_proba(&scaled)?
            .iter()
            .map(|pair| pair[1])
            .collect();

        score_validated(batch, &predictions, &probabilities)
    }
}
