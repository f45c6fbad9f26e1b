//! Fitted per-feature standard scaler.

use serde::{Deserialize, Serialize};

use crate::models::inference::InferenceError;
use crate::models::FeatureTransform;

/// Per-feature affine normalization fitted ahead of time.
///
/// Each feature `i` is transformed as `(x[i] - means[i]) / scales[i]`. The
/// ordered feature names travel with the fitted parameters so callers can be
/// validated against the fitted schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    feature_names: Vec<String>,
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl StandardScaler {
    /// Create a scaler from fitted parameters.
    ///
    /// # Panics
    ///
    /// Panics if the three vectors differ in length.
    pub fn new(feature_names: Vec<String>, means: Vec<f64>, scales: Vec<f64>) -> Self {
        assert_eq!(
            feature_names.len(),
            means.len(),
            "feature names and means differ in length"
        );
        assert_eq!(
            means.len(),
            scales.len(),
            "means and scales differ in length"
        );

        Self {
            feature_names,
            means,
            scales,
        }
    }

    /// Create a pass-through scaler (mean 0, scale 1 for every feature).
    pub fn identity(feature_names: Vec<String>) -> Self {
        let n = feature_names.len();
        Self {
            feature_names,
            means: vec![0.0; n],
            scales: vec![1.0; n],
        }
    }

    /// Number of features the scaler was fitted on.
    pub fn num_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Check that deserialized parameters form a usable scaler.
    pub fn validate(&self) -> Result<(), String> {
        if self.feature_names.len() != self.means.len()
            || self.means.len() != self.scales.len()
        {
            return Err(format!(
                "parameter lengths disagree: {} names, {} means, {} scales",
                self.feature_names.len(),
                self.means.len(),
                self.scales.len()
            ));
        }
        if self.means.iter().any(|m| !m.is_finite()) {
            return Err("mean entries must be finite".to_string());
        }
        if self.scales.iter().any(|s| !s.is_finite() || *s == 0.0) {
            return Err("scale entries must be finite and non-zero".to_string());
        }
        Ok(())
    }
}

impl FeatureTransform for StandardScaler {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError> {
        if features.len() != self.num_features() {
            return Err(InferenceError::Mismatch {
                expected: self.num_features(),
                actual: features.len(),
            });
        }

        Ok(features
            .iter()
            .zip(self.means.iter().zip(self.scales.iter()))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: &[&str]) -> Vec<String> {
        n.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn transform_normalizes_each_feature() {
        let scaler = StandardScaler::new(
            names(&["income", "age"]),
            vec![40000.0, 40.0],
            vec![10000.0, 10.0],
        );

        let out = scaler.transform(&[30000.0, 30.0]).unwrap();

        assert_eq!(out.len(), 2);
        assert!((out[0] - (-1.0)).abs() < 1e-12);
        assert!((out[1] - (-1.0)).abs() < 1e-12);
    }

    #[test]
    fn identity_is_pass_through() {
        let scaler = StandardScaler::identity(names(&["a", "b", "c"]));

        let out = scaler.transform(&[1.5, -2.0, 0.0]).unwrap();
        assert_eq!(out, vec![1.5, -2.0, 0.0]);
    }

    #[test]
    fn transform_rejects_wrong_length() {
        let scaler = StandardScaler::identity(names(&["a", "b", "c"]));

        let err = scaler.transform(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            InferenceError::Mismatch {
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn validate_rejects_zero_scale() {
        let scaler = StandardScaler::new(names(&["a", "b"]), vec![0.0, 0.0], vec![1.0, 0.0]);
        assert!(scaler.validate().is_err());
    }

    #[test]
    fn validate_accepts_fitted_parameters() {
        let scaler = StandardScaler::new(names(&["a"]), vec![12.5], vec![3.0]);
        assert!(scaler.validate().is_ok());
    }

    #[test]
    #[should_panic(expected = "differ in length")]
    fn new_rejects_mismatched_lengths() {
        StandardScaler::new(names(&["a", "b"]), vec![0.0], vec![1.0]);
    }
}
