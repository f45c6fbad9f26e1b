//! Feature schema and vector construction for model inference.
//!
//! Feature order is fixed at artifact-fitting time. The fitted schema travels
//! inside each artifact, and vectors are built by looking each schema name up
//! in the submitted profile rather than trusting the caller's field order.

use serde::{Deserialize, Serialize};

use crate::models::inference::InferenceError;
use crate::types::profile::IndicatorProfile;

/// Canonical indicator order used by the demo artifacts.
pub const DEFAULT_FEATURES: [&str; 6] = [
    "parental_income",
    "education_years",
    "gender",
    "urban_residence",
    "minority_status",
    "age",
];

/// Ordered list of feature names a pair of artifacts was fitted on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    names: Vec<String>,
}

impl FeatureSchema {
    /// Create a schema from an ordered name list.
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// The canonical six-feature schema.
    pub fn default_schema() -> Self {
        Self::new(DEFAULT_FEATURES.iter().map(|s| s.to_string()).collect())
    }

    /// Number of features in the schema.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the schema is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Ordered feature names.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Check a raw vector length against the fitted dimensionality.
    pub fn check_len(&self, actual: usize) -> Result<(), InferenceError> {
        if actual != self.len() {
            return Err(InferenceError::Mismatch {
                expected: self.len(),
                actual,
            });
        }
        Ok(())
    }
}

/// Builds fixed-order feature vectors from named indicator profiles.
pub struct FeatureExtractor;

impl FeatureExtractor {
    /// Create a new feature extractor.
    pub fn new() -> Self {
        Self
    }

    /// Build a vector in canonical order.
    pub fn extract(&self, profile: &IndicatorProfile) -> Vec<f64> {
        DEFAULT_FEATURES
            .iter()
            .filter_map(|name| profile.value_of(name))
            .collect()
    }

    /// Build a vector in the order a fitted schema demands.
    ///
    /// Fails when the schema names an indicator the profile does not define,
    /// which means the artifacts were fitted for a different input set.
    pub fn extract_for(
        &self,
        profile: &IndicatorProfile,
        schema: &FeatureSchema,
    ) -> Result<Vec<f64>, InferenceError> {
        schema
            .names()
            .iter()
            .map(|name| {
                profile.value_of(name).ok_or_else(|| {
                    InferenceError::Incompatible(format!(
                        "fitted schema requests unknown indicator \"{name}\""
                    ))
                })
            })
            .collect()
    }

    /// Number of features in the canonical order.
    pub fn feature_count(&self) -> usize {
        DEFAULT_FEATURES.len()
    }

    /// Canonical feature names.
    pub fn feature_names(&self) -> Vec<&'static str> {
        DEFAULT_FEATURES.to_vec()
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_profile() -> IndicatorProfile {
        let mut profile = IndicatorProfile::new("req_1".to_string(), 30000.0, 30);
        profile.education_years = 12.0;
        profile.gender = 1;
        profile.urban_residence = 1;
        profile.minority_status = 0;
        profile
    }

    #[test]
    fn canonical_extraction_order() {
        let extractor = FeatureExtractor::new();
        let features = extractor.extract(&sample_profile());

        assert_eq!(features, vec![30000.0, 12.0, 1.0, 1.0, 0.0, 30.0]);
        assert_eq!(features.len(), extractor.feature_count());
    }

    #[test]
    fn schema_order_overrides_canonical_order() {
        let extractor = FeatureExtractor::new();
        let schema = FeatureSchema::new(vec![
            "age".to_string(),
            "parental_income".to_string(),
            "education_years".to_string(),
        ]);

        let features = extractor.extract_for(&sample_profile(), &schema).unwrap();
        assert_eq!(features, vec![30.0, 30000.0, 12.0]);
    }

    #[test]
    fn unknown_schema_name_is_incompatible() {
        let extractor = FeatureExtractor::new();
        let schema = FeatureSchema::new(vec!["credit_score".to_string()]);

        let err = extractor
            .extract_for(&sample_profile(), &schema)
            .unwrap_err();
        assert!(matches!(err, InferenceError::Incompatible(_)));
    }

    #[test]
    fn check_len_flags_wrong_vector_size() {
        let schema = FeatureSchema::default_schema();

        assert!(schema.check_len(6).is_ok());
        assert!(matches!(
            schema.check_len(5),
            Err(InferenceError::Mismatch {
                expected: 6,
                actual: 5
            })
        ));
    }

    #[test]
    fn default_schema_matches_canonical_names() {
        let extractor = FeatureExtractor::new();
        let schema = FeatureSchema::default_schema();

        assert_eq!(schema.len(), extractor.feature_count());
        for (a, b) in schema.names().iter().zip(extractor.feature_names()) {
            assert_eq!(a, b);
        }
    }
}
