use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::triage::TriageSummary;

#[derive(Error, Debug)]
pub enum PredictError {
    #[error("predictor exposes no feature columns")]
    NoFeatureColumns,

    #[error("prediction backend failure: {0}")]
    Backend(String),
}

/// One candidate disease from the external classifier. `probability` is None
/// when the backend does not expose confidence scores.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiseasePrediction {
    pub disease: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
}

/// Boundary to the external disease classifier. The model itself (loading,
/// inference) lives outside this crate; implementations adapt whatever
/// backend serves predictions. Whether confidence scores exist is a declared
/// capability, checked up front rather than discovered through failures.
pub trait DiseasePredictor: Send + Sync {
    /// Feature column names in the order the backend was trained with.
    fn feature_columns(&self) -> &[String];

    /// Whether `predict` returns calibrated probabilities.
    fn supports_confidence(&self) -> bool;

    fn predict(
        &self,
        features: &[u8],
        top_k: usize,
    ) -> Result<Vec<DiseasePrediction>, PredictError>;
}

/// Turn positive symptom names into the backend's 0/1 feature vector,
/// preserving column order. Unknown symptoms are simply absent.
pub fn build_feature_vector(feature_columns: &[String], positive_symptoms: &[String]) -> Vec<u8> {
    feature_columns
        .iter()
        .map(|col| u8::from(positive_symptoms.iter().any(|s| s == col)))
        .collect()
}

/// Convenience: feed a combined triage summary to a predictor.
pub fn predict_from_summary(
    predictor: &dyn DiseasePredictor,
    summary: &TriageSummary,
    top_k: usize,
) -> Result<Vec<DiseasePrediction>, PredictError> {
    let columns = predictor.feature_columns();
    if columns.is_empty() {
        return Err(PredictError::NoFeatureColumns);
    }
    let names: Vec<String> = summary
        .symptoms
        .iter()
        .flatten()
        .map(|s| s.name.clone())
        .collect();
    let features = build_feature_vector(columns, &names);
    predictor.predict(&features, top_k)
}
