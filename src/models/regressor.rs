//! Fitted linear regression estimator.

use serde::{Deserialize, Serialize};

use crate::models::inference::InferenceError;
use crate::models::RegressionModel;

/// Linear regression model (one weight per feature plus an intercept).
///
/// Predicts `intercept + Σ weights[i] * x[i]` over an already-scaled feature
/// vector. The ordered feature names and a version tag travel with the fitted
/// coefficients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressor {
    feature_names: Vec<String>,
    weights: Vec<f64>,
    intercept: f64,
    version: String,
}

impl LinearRegressor {
    /// Create a regressor from fitted coefficients.
    ///
    /// # Panics
    ///
    /// Panics if `weights` and `feature_names` differ in length.
    pub fn new(
        feature_names: Vec<String>,
        weights: Vec<f64>,
        intercept: f64,
        version: impl Into<String>,
    ) -> Self {
        assert_eq!(
            feature_names.len(),
            weights.len(),
            "feature names and weights differ in length"
        );

        Self {
            feature_names,
            weights,
            intercept,
            version: version.into(),
        }
    }

    /// Number of features the model was fitted on.
    pub fn num_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Check that deserialized coefficients form a usable model.
    pub fn validate(&self) -> Result<(), String> {
        if self.feature_names.len() != self.weights.len() {
            return Err(format!(
                "coefficient lengths disagree: {} names, {} weights",
                self.feature_names.len(),
                self.weights.len()
            ));
        }
        if self.weights.iter().any(|w| !w.is_finite()) || !self.intercept.is_finite() {
            return Err("coefficients must be finite".to_string());
        }
        Ok(())
    }
}

impl RegressionModel for LinearRegressor {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, features: &[f64]) -> Result<f64, InferenceError> {
        if features.len() != self.num_features() {
            return Err(InferenceError::Mismatch {
                expected: self.num_features(),
                actual: features.len(),
            });
        }

        let mut sum = self.intercept;
        for (x, w) in features.iter().zip(self.weights.iter()) {
            sum += x * w;
        }
        Ok(sum)
    }

    fn version(&self) -> &str {
        &self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: &[&str]) -> Vec<String> {
        n.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn predict_is_dot_product_plus_intercept() {
        // y = 0.5 * x0 + 0.3 * x1 + 0.1
        let model = LinearRegressor::new(names(&["x0", "x1"]), vec![0.5, 0.3], 0.1, "test-1");

        let y = model.predict(&[2.0, 3.0]).unwrap();
        assert!((y - 2.0).abs() < 1e-12);
    }

    #[test]
    fn predict_rejects_wrong_length() {
        let model = LinearRegressor::new(names(&["x0", "x1"]), vec![0.5, 0.3], 0.1, "test-1");

        let err = model.predict(&[1.0]).unwrap_err();
        assert!(matches!(
            err,
            InferenceError::Mismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn version_tag_is_preserved() {
        let model = LinearRegressor::new(names(&["x0"]), vec![1.0], 0.0, "ige-ols-1.2");
        assert_eq!(model.version(), "ige-ols-1.2");
    }

    #[test]
    fn validate_rejects_non_finite_weights() {
        let model = LinearRegressor::new(names(&["x0"]), vec![f64::NAN], 0.0, "bad");
        assert!(model.validate().is_err());
    }

    #[test]
    #[should_panic(expected = "differ in length")]
    fn new_rejects_mismatched_lengths() {
        LinearRegressor::new(names(&["x0", "x1"]), vec![0.5], 0.0, "test-1");
    }
}
