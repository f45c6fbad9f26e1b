//! Fitted model artifacts and the inference pipeline.

pub mod inference;
pub mod regressor;
pub mod scaler;

pub use inference::InferencePipeline;
pub use regressor::LinearRegressor;
pub use scaler::StandardScaler;

use crate::models::inference::InferenceError;

/// Fitted transform applied to a raw feature vector before inference.
///
/// Implement this trait to supply substitute transforms (for example an
/// identity pass-through in tests) without coupling the pipeline to the
/// serialized artifact types.
pub trait FeatureTransform: Send + Sync {
    /// Ordered names of the features the transform was fitted on.
    fn feature_names(&self) -> &[String];

    /// Apply the forward transform. The output has the same length as the
    /// input.
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError>;
}

/// Fitted estimator mapping a scaled feature vector to one value.
pub trait RegressionModel: Send + Sync {
    /// Ordered names of the features the estimator was fitted on.
    fn feature_names(&self) -> &[String];

    /// Predict a single value for one feature vector.
    fn predict(&self, features: &[f64]) -> Result<f64, InferenceError>;

    /// Version tag recorded when the estimator was fitted.
    fn version(&self) -> &str;
}
