//! Two-stage inference pipeline: scale, then predict.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;

use crate::features::{FeatureExtractor, FeatureSchema};
use crate::models::{FeatureTransform, RegressionModel};
use crate::types::prediction::{MobilityLevel, MobilityThresholds, PredictionResponse};
use crate::types::profile::IndicatorProfile;

/// Errors raised while running a prediction.
#[derive(Debug, Error)]
pub enum InferenceError {
    /// Feature vector length differs from the fitted dimensionality.
    #[error("feature vector has {actual} values but the artifacts were fitted on {expected}")]
    Mismatch { expected: usize, actual: usize },

    /// The artifact pair cannot serve predictions together.
    #[error("artifacts are incompatible: {0}")]
    Incompatible(String),

    /// Any other failure, with the underlying message.
    #[error("prediction failed: {0}")]
    Unknown(String),
}

impl InferenceError {
    /// Short class label used for failure counters.
    pub fn class(&self) -> &'static str {
        match self {
            Self::Mismatch { .. } => "mismatch",
            Self::Incompatible(_) => "incompatible",
            Self::Unknown(_) => "unknown",
        }
    }
}

/// Result of one inference call.
#[derive(Debug, Clone)]
pub struct Prediction {
    /// Predicted intergenerational income elasticity.
    pub elasticity: f64,
    /// Version tag of the model that produced the value.
    pub model_version: String,
    /// When the prediction was computed.
    pub predicted_at: DateTime<Utc>,
}

impl Prediction {
    /// Convert the prediction into a wire response for one request.
    pub fn to_response(
        &self,
        request_id: &str,
        thresholds: &MobilityThresholds,
    ) -> PredictionResponse {
        let level = MobilityLevel::from_elasticity(self.elasticity, thresholds);
        PredictionResponse::success(
            request_id.to_string(),
            self.elasticity,
            level,
            self.model_version.clone(),
        )
    }
}

/// Inference pipeline over a fitted scaler and a fitted regression model.
///
/// Assembly verifies that both artifacts carry the same fitted schema; after
/// that a prediction is a pure two-stage computation with no state of its
/// own. NaN or infinity emitted by either stage passes through unchanged.
pub struct InferencePipeline {
    scaler: Arc<dyn FeatureTransform>,
    model: Arc<dyn RegressionModel>,
    schema: FeatureSchema,
    extractor: FeatureExtractor,
    model_version: String,
}

impl std::fmt::Debug for InferencePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferencePipeline")
            .field("schema", &self.schema)
            .field("model_version", &self.model_version)
            .finish_non_exhaustive()
    }
}

impl InferencePipeline {
    /// Assemble a pipeline from a loaded scaler and model.
    ///
    /// Fails with [`InferenceError::Incompatible`] when the two artifacts
    /// were fitted on different feature schemas.
    pub fn new(
        scaler: Arc<dyn FeatureTransform>,
        model: Arc<dyn RegressionModel>,
    ) -> Result<Self, InferenceError> {
        if scaler.feature_names() != model.feature_names() {
            return Err(InferenceError::Incompatible(format!(
                "scaler was fitted on [{}] but model on [{}]",
                scaler.feature_names().join(", "),
                model.feature_names().join(", ")
            )));
        }

        let schema = FeatureSchema::new(scaler.feature_names().to_vec());
        let model_version = model.version().to_string();

        Ok(Self {
            scaler,
            model,
            schema,
            extractor: FeatureExtractor::new(),
            model_version,
        })
    }

    /// The fitted feature schema both artifacts agree on.
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Version tag of the loaded model.
    pub fn model_version(&self) -> &str {
        &self.model_version
    }

    /// Run inference on a raw feature vector in schema order.
    pub fn predict(&self, features: &[f64]) -> Result<Prediction, InferenceError> {
        self.schema.check_len(features.len())?;

        let scaled = self.scaler.transform(features)?;
        let elasticity = self.model.predict(&scaled)?;

        debug!(
            elasticity = elasticity,
            model_version = %self.model_version,
            "Inference complete"
        );

        Ok(Prediction {
            elasticity,
            model_version: self.model_version.clone(),
            predicted_at: Utc::now(),
        })
    }

    /// Run inference on a named profile, ordering features by the fitted
    /// schema.
    pub fn predict_profile(&self, profile: &IndicatorProfile) -> Result<Prediction, InferenceError> {
        let features = self.extractor.extract_for(profile, &self.schema)?;
        self.predict(&features)
    }
}
