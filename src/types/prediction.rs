//! Prediction response data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Mobility classification derived from a predicted elasticity.
///
/// Elasticity runs from 0 (child income independent of parental income) to 1
/// (fully determined by it), so low elasticity means high mobility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MobilityLevel {
    High,
    Moderate,
    Low,
}

impl MobilityLevel {
    /// Classify a predicted elasticity against configured thresholds
    pub fn from_elasticity(elasticity: f64, thresholds: &MobilityThresholds) -> Self {
        if elasticity >= thresholds.low {
            MobilityLevel::Low
        } else if elasticity >= thresholds.moderate {
            MobilityLevel::Moderate
        } else {
            MobilityLevel::High
        }
    }

    /// Canned interpretation text shown alongside the numeric result
    pub fn interpretation(&self) -> &'static str {
        match self {
            MobilityLevel::High => {
                "High mobility: predicted income is largely independent of parental income."
            }
            MobilityLevel::Moderate => {
                "Moderate mobility: parental income has a noticeable influence on predicted income."
            }
            MobilityLevel::Low => {
                "Low mobility: predicted income is strongly tied to parental income."
            }
        }
    }
}

/// Configurable elasticity cutoffs for the mobility levels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MobilityThresholds {
    /// Elasticity at or above which mobility is considered moderate
    pub moderate: f64,
    /// Elasticity at or above which mobility is considered low
    pub low: f64,
}

impl Default for MobilityThresholds {
    fn default() -> Self {
        Self {
            moderate: 0.3,
            low: 0.5,
        }
    }
}

/// Outcome marker for a prediction response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Failure,
}

/// Response published for every prediction request.
///
/// Carries either a predicted elasticity with its interpretation, or the
/// error message explaining why no prediction was produced. The service never
/// leaves a request unanswered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// Unique response identifier
    pub response_id: String,

    /// Associated request identifier
    pub request_id: String,

    /// Whether a prediction was produced
    pub status: ResponseStatus,

    /// Predicted intergenerational income elasticity (0.0 - 1.0 for typical fits)
    pub elasticity: Option<f64>,

    /// Mobility classification of the elasticity
    pub mobility_level: Option<MobilityLevel>,

    /// Canned interpretation text for display
    pub interpretation: Option<String>,

    /// Version tag of the model that produced the value
    pub model_version: Option<String>,

    /// Error message when no prediction was produced
    pub error: Option<String>,

    /// Response generation timestamp
    pub timestamp: DateTime<Utc>,
}

impl PredictionResponse {
    /// Build a successful response
    pub fn success(
        request_id: String,
        elasticity: f64,
        level: MobilityLevel,
        model_version: String,
    ) -> Self {
        Self {
            response_id: uuid::Uuid::new_v4().to_string(),
            request_id,
            status: ResponseStatus::Success,
            elasticity: Some(elasticity),
            mobility_level: Some(level),
            interpretation: Some(level.interpretation().to_string()),
            model_version: Some(model_version),
            error: None,
            timestamp: Utc::now(),
        }
    }

    /// Build a failure response carrying the user-facing error message
    pub fn failure(request_id: String, error: String) -> Self {
        Self {
            response_id: uuid::Uuid::new_v4().to_string(),
            request_id,
            status: ResponseStatus::Failure,
            elasticity: None,
            mobility_level: None,
            interpretation: None,
            model_version: None,
            error: Some(error),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mobility_level_from_elasticity() {
        let thresholds = MobilityThresholds::default();

        assert_eq!(
            MobilityLevel::from_elasticity(0.1, &thresholds),
            MobilityLevel::High
        );
        assert_eq!(
            MobilityLevel::from_elasticity(0.3, &thresholds),
            MobilityLevel::Moderate
        );
        assert_eq!(
            MobilityLevel::from_elasticity(0.45, &thresholds),
            MobilityLevel::Moderate
        );
        assert_eq!(
            MobilityLevel::from_elasticity(0.8, &thresholds),
            MobilityLevel::Low
        );
    }

    #[test]
    fn interpretations_are_distinct() {
        let texts = [
            MobilityLevel::High.interpretation(),
            MobilityLevel::Moderate.interpretation(),
            MobilityLevel::Low.interpretation(),
        ];
        assert_ne!(texts[0], texts[1]);
        assert_ne!(texts[1], texts[2]);
    }

    #[test]
    fn success_response_serialization() {
        let response = PredictionResponse::success(
            "req_123".to_string(),
            0.42,
            MobilityLevel::Moderate,
            "ige-ols-1.0".to_string(),
        );

        let json = serde_json::to_string(&response).unwrap();
        let deserialized: PredictionResponse = serde_json::from_str(&json).unwrap();

        assert_eq!(response.request_id, deserialized.request_id);
        assert_eq!(deserialized.status, ResponseStatus::Success);
        assert_eq!(deserialized.elasticity, Some(0.42));
        assert!(deserialized.error.is_none());
    }

    #[test]
    fn failure_response_carries_message() {
        let response = PredictionResponse::failure(
            "req_9".to_string(),
            "artifact file artifacts/best_ige_model.igea was not found".to_string(),
        );

        assert_eq!(response.status, ResponseStatus::Failure);
        assert!(response.elasticity.is_none());
        assert!(response.error.as_deref().unwrap().contains("not found"));
    }
}
